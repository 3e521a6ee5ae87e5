use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::{
    reports::photo::{DEFAULT_JPEG_QUALITY, DEFAULT_MAX_EDGE},
    session::DEFAULT_ADMIN_EMAIL,
};

const DEFAULT_DATA_DIR: &str = "cleansea-data";

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// Holds `cleansea.sqlite3` and `settings.json`.
    pub data_dir: PathBuf,
    pub admin_emails: Vec<String>,
    pub photo_max_edge: u32,
    pub photo_jpeg_quality: u8,
    /// Serve seeded in-memory reports instead of the SQLite collection.
    pub demo_mode: bool,
    pub export_path: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            admin_emails: vec![DEFAULT_ADMIN_EMAIL.to_string()],
            photo_max_edge: DEFAULT_MAX_EDGE,
            photo_jpeg_quality: DEFAULT_JPEG_QUALITY,
            demo_mode: false,
            export_path: None,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(dir) = lookup("CLEANSEA_DATA_DIR") {
            config.data_dir = PathBuf::from(dir);
        }
        if let Some(emails) = lookup("CLEANSEA_ADMIN_EMAILS") {
            config.admin_emails = emails
                .split(',')
                .map(|email| email.trim().to_string())
                .filter(|email| !email.is_empty())
                .collect();
        }
        if let Some(edge) = lookup("CLEANSEA_PHOTO_MAX_EDGE") {
            config.photo_max_edge = edge
                .trim()
                .parse()
                .with_context(|| format!("invalid CLEANSEA_PHOTO_MAX_EDGE '{edge}'"))?;
        }
        if let Some(quality) = lookup("CLEANSEA_PHOTO_QUALITY") {
            config.photo_jpeg_quality = quality
                .trim()
                .parse()
                .with_context(|| format!("invalid CLEANSEA_PHOTO_QUALITY '{quality}'"))?;
        }
        config.demo_mode = lookup("CLEANSEA_DEMO")
            .map(|value| value == "1" || value.eq_ignore_ascii_case("true"))
            .unwrap_or(false);
        config.export_path = lookup("CLEANSEA_EXPORT_PATH").map(PathBuf::from);

        Ok(config)
    }

    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join("cleansea.sqlite3")
    }

    pub fn settings_path(&self) -> PathBuf {
        self.data_dir.join("settings.json")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn defaults_without_env() {
        let config = AppConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.admin_emails, vec!["admin@example.com"]);
        assert_eq!(config.photo_max_edge, 1024);
        assert_eq!(config.db_path(), PathBuf::from("cleansea-data/cleansea.sqlite3"));
    }

    #[test]
    fn reads_overrides() {
        let config = AppConfig::from_lookup(lookup(&[
            ("CLEANSEA_DATA_DIR", "/tmp/cs"),
            ("CLEANSEA_ADMIN_EMAILS", "a@x.kz, b@x.kz,,"),
            ("CLEANSEA_PHOTO_MAX_EDGE", "512"),
            ("CLEANSEA_PHOTO_QUALITY", "70"),
            ("CLEANSEA_DEMO", "TRUE"),
            ("CLEANSEA_EXPORT_PATH", "/tmp/out.csv"),
        ]))
        .unwrap();

        assert_eq!(config.settings_path(), PathBuf::from("/tmp/cs/settings.json"));
        assert_eq!(config.admin_emails, vec!["a@x.kz", "b@x.kz"]);
        assert_eq!(config.photo_max_edge, 512);
        assert_eq!(config.photo_jpeg_quality, 70);
        assert!(config.demo_mode);
        assert_eq!(config.export_path, Some(PathBuf::from("/tmp/out.csv")));
    }

    #[test]
    fn rejects_bad_numbers() {
        assert!(AppConfig::from_lookup(lookup(&[("CLEANSEA_PHOTO_MAX_EDGE", "big")])).is_err());
        assert!(AppConfig::from_lookup(lookup(&[("CLEANSEA_PHOTO_QUALITY", "300")])).is_err());
    }
}
