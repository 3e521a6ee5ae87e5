//! Display names for the core enumerations, keyed by language.
//!
//! The core types carry no presentation data; anything a user reads goes
//! through these tables.

use serde::{Deserialize, Serialize};

use crate::db::{ReportCategory, ReportStatus};

pub const DEFAULT_LANGUAGE_CODE: &str = "en";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Ru,
    #[default]
    En,
    Kk,
}

impl Language {
    pub const ALL: [Language; 3] = [Language::Ru, Language::En, Language::Kk];

    /// Matches on the primary subtag, so `ru-RU` and `kk_KZ.UTF-8` work.
    /// Unknown codes fall back to English.
    pub fn from_code(code: &str) -> Self {
        let primary = code
            .split(|c: char| c == '-' || c == '_' || c == '.')
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();
        match primary.as_str() {
            "ru" => Language::Ru,
            "kk" => Language::Kk,
            _ => Language::En,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Language::Ru => "ru",
            Language::En => "en",
            Language::Kk => "kk",
        }
    }

    pub fn category_name(&self, category: ReportCategory) -> &'static str {
        match (self, category) {
            (Language::En, ReportCategory::Trash) => "Trash",
            (Language::En, ReportCategory::OilSpot) => "Oil spot",
            (Language::En, ReportCategory::IndustrialWaste) => "Industrial waste",
            (Language::En, ReportCategory::Other) => "Other",
            (Language::Ru, ReportCategory::Trash) => "Мусор",
            (Language::Ru, ReportCategory::OilSpot) => "Нефтяное пятно",
            (Language::Ru, ReportCategory::IndustrialWaste) => "Промышленные отходы",
            (Language::Ru, ReportCategory::Other) => "Другое",
            (Language::Kk, ReportCategory::Trash) => "Қоқыс",
            (Language::Kk, ReportCategory::OilSpot) => "Мұнай дағы",
            (Language::Kk, ReportCategory::IndustrialWaste) => "Өнеркәсіп қалдықтары",
            (Language::Kk, ReportCategory::Other) => "Басқа",
        }
    }

    pub fn status_name(&self, status: ReportStatus) -> &'static str {
        match (self, status) {
            (Language::En, ReportStatus::Detected) => "Detected",
            (Language::En, ReportStatus::InProgress) => "In progress",
            (Language::En, ReportStatus::Cleared) => "Cleared",
            (Language::Ru, ReportStatus::Detected) => "Обнаружено",
            (Language::Ru, ReportStatus::InProgress) => "В работе",
            (Language::Ru, ReportStatus::Cleared) => "Очищено",
            (Language::Kk, ReportStatus::Detected) => "Анықталды",
            (Language::Kk, ReportStatus::InProgress) => "Жұмыста",
            (Language::Kk, ReportStatus::Cleared) => "Тазартылды",
        }
    }

    pub fn csv_header(&self) -> &'static str {
        match self {
            Language::En => "ID,Type,Status,Description,Latitude,Longitude,Photo (Base64)",
            Language::Ru => "ID,Тип,Статус,Описание,Широта,Долгота,Фото (Base64)",
            Language::Kk => "ID,Түрі,Мәртебесі,Сипаттамасы,Ендік,Бойлық,Фото (Base64)",
        }
    }

    pub fn new_report_notification(&self, category: ReportCategory) -> String {
        let name = self.category_name(category);
        match self {
            Language::En => format!("New report: {name}"),
            Language::Ru => format!("Новая точка: {name}"),
            Language::Kk => format!("Жаңа нүкте: {name}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_code_uses_primary_subtag() {
        assert_eq!(Language::from_code("ru"), Language::Ru);
        assert_eq!(Language::from_code("ru-RU"), Language::Ru);
        assert_eq!(Language::from_code("kk_KZ.UTF-8"), Language::Kk);
        assert_eq!(Language::from_code("EN"), Language::En);
        assert_eq!(Language::from_code("de"), Language::En);
        assert_eq!(Language::from_code(""), Language::En);
    }

    #[test]
    fn every_language_names_every_value() {
        for language in Language::ALL {
            assert_eq!(Language::from_code(language.code()), language);
            for category in ReportCategory::ALL {
                assert!(!language.category_name(category).is_empty());
            }
            for status in ReportStatus::ALL {
                assert!(!language.status_name(status).is_empty());
            }
            assert_eq!(language.csv_header().split(',').count(), 7);
        }
    }
}
