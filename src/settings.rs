use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
    sync::{PoisonError, RwLock},
};

use crate::i18n::{Language, DEFAULT_LANGUAGE_CODE};

// Set to true to enable verbose logging in this module
const ENABLE_LOGS: bool = true;

use crate::log_warn;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UserSettings {
    pub is_volunteer: bool,
    pub language: String,
}

impl Default for UserSettings {
    fn default() -> Self {
        Self {
            is_volunteer: false,
            language: system_language(),
        }
    }
}

impl UserSettings {
    pub fn language(&self) -> Language {
        Language::from_code(&self.language)
    }
}

/// Two-letter prefix of `LANG`, or English.
fn system_language() -> String {
    std::env::var("LANG")
        .ok()
        .and_then(|lang| {
            let primary: String = lang.chars().take_while(|c| c.is_ascii_alphabetic()).collect();
            (primary.len() == 2).then(|| primary.to_ascii_lowercase())
        })
        .unwrap_or_else(|| DEFAULT_LANGUAGE_CODE.to_string())
}

/// Preferences persisted as JSON next to the database. Read once at startup,
/// written on every change.
pub struct SettingsStore {
    path: PathBuf,
    data: RwLock<UserSettings>,
}

impl SettingsStore {
    /// An unreadable or corrupt file yields defaults; the next change
    /// overwrites it.
    pub fn new(path: PathBuf) -> Result<Self> {
        let data = if path.exists() {
            match Self::load(&path) {
                Ok(data) => data,
                Err(err) => {
                    log_warn!("Ignoring settings file: {err:#}");
                    UserSettings::default()
                }
            }
        } else {
            UserSettings::default()
        };

        Ok(Self {
            path,
            data: RwLock::new(data),
        })
    }

    fn load(path: &Path) -> Result<UserSettings> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings from {}", path.display()))?;
        serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse settings in {}", path.display()))
    }

    pub fn get(&self) -> UserSettings {
        self.data
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn is_volunteer(&self) -> bool {
        self.get().is_volunteer
    }

    pub fn language(&self) -> Language {
        self.get().language()
    }

    /// Flip the volunteer opt-in and return the new value.
    pub fn toggle_volunteer(&self) -> Result<bool> {
        self.update(|settings| {
            settings.is_volunteer = !settings.is_volunteer;
            settings.is_volunteer
        })
    }

    pub fn set_language(&self, code: &str) -> Result<()> {
        let code = code.trim().to_ascii_lowercase();
        self.update(|settings| settings.language = code)
    }

    fn update<T>(&self, change: impl FnOnce(&mut UserSettings) -> T) -> Result<T> {
        let mut guard = self.data.write().unwrap_or_else(PoisonError::into_inner);
        let mut next = guard.clone();
        let value = change(&mut next);
        self.persist(&next)?;
        *guard = next;
        Ok(value)
    }

    fn persist(&self, data: &UserSettings) -> Result<()> {
        let serialized = serde_json::to_string_pretty(data)?;
        fs::write(&self.path, serialized)
            .with_context(|| format!("Failed to write settings to {}", self.path.display()))
    }
}
