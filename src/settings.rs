use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, VerifierError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub filters_path: Option<String>,
    /// Days either side of a bank posting date that a budget entry may sit.
    #[serde(default = "default_window_days")]
    pub window_days: i64,
    /// Days either side of a dated filter's date that the filter applies.
    #[serde(default = "default_filter_window_days")]
    pub filter_window_days: i64,
}

/// Upper bound for either window; ten years is already far beyond any export.
pub const MAX_WINDOW_DAYS: i64 = 3650;

fn default_window_days() -> i64 {
    5
}

fn default_filter_window_days() -> i64 {
    1
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            filters_path: None,
            window_days: default_window_days(),
            filter_window_days: default_filter_window_days(),
        }
    }
}

impl Settings {
    /// Both windows must be between 1 and `MAX_WINDOW_DAYS`. Values from
    /// settings.json reach here without passing through clap.
    pub fn validate(&self) -> Result<()> {
        for (name, days) in [
            ("window_days", self.window_days),
            ("filter_window_days", self.filter_window_days),
        ] {
            if !(1..=MAX_WINDOW_DAYS).contains(&days) {
                return Err(VerifierError::Settings(format!(
                    "{name} must be between 1 and {MAX_WINDOW_DAYS}, got {days}"
                )));
            }
        }
        Ok(())
    }

    /// The configured filter file, or `filters.json` in the config dir.
    pub fn resolve_filters_path(&self) -> PathBuf {
        self.filters_path
            .as_deref()
            .map(|p| PathBuf::from(shellexpand_path(p)))
            .unwrap_or_else(|| config_dir().join("filters.json"))
    }
}

fn config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("budget-verifier")
}

fn settings_path() -> PathBuf {
    config_dir().join("settings.json")
}

pub fn load_settings() -> Settings {
    load_settings_from(&settings_path())
}

pub fn load_settings_from(path: &Path) -> Settings {
    if !path.exists() {
        return Settings::default();
    }
    let content = std::fs::read_to_string(path).unwrap_or_default();
    serde_json::from_str(&content).unwrap_or_else(|e| {
        tracing::warn!("ignoring malformed settings {}: {e}", path.display());
        Settings::default()
    })
}

pub fn save_settings(settings: &Settings) -> Result<()> {
    save_settings_to(&config_dir(), settings)
}

pub fn save_settings_to(dir: &Path, settings: &Settings) -> Result<()> {
    std::fs::create_dir_all(dir)?;
    let json = serde_json::to_string_pretty(settings)
        .map_err(|e| VerifierError::Settings(e.to_string()))?;
    std::fs::write(dir.join("settings.json"), format!("{json}\n"))?;
    Ok(())
}

pub fn shellexpand_path(path: &str) -> String {
    if path.starts_with('~') {
        if let Some(home) = dirs::home_dir() {
            return path.replacen('~', &home.to_string_lossy(), 1);
        }
    }
    path.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings {
            filters_path: Some("/tmp/filters.json".to_string()),
            window_days: 7,
            filter_window_days: 2,
        };
        save_settings_to(dir.path(), &settings).unwrap();
        let loaded = load_settings_from(&dir.path().join("settings.json"));
        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_load_returns_defaults_when_missing() {
        let dir = tempfile::tempdir().unwrap();
        let s = load_settings_from(&dir.path().join("nope.json"));
        assert_eq!(s, Settings::default());
        assert_eq!(s.window_days, 5);
        assert_eq!(s.filter_window_days, 1);
    }

    #[test]
    fn test_load_merges_with_defaults() {
        let json = r#"{"window_days": 7}"#;
        let s: Settings = serde_json::from_str(json).unwrap();
        assert_eq!(s.window_days, 7);
        assert_eq!(s.filter_window_days, 1);
        assert!(s.filters_path.is_none());
    }

    #[test]
    fn test_malformed_settings_fall_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert_eq!(load_settings_from(&path), Settings::default());
    }

    #[test]
    fn test_save_creates_config_dir() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("deep").join("nested");
        save_settings_to(&nested, &Settings::default()).unwrap();
        assert!(nested.join("settings.json").exists());
    }

    #[test]
    fn test_validate_accepts_defaults_and_bounds() {
        assert!(Settings::default().validate().is_ok());
        let s = Settings {
            window_days: MAX_WINDOW_DAYS,
            filter_window_days: 1,
            ..Settings::default()
        };
        assert!(s.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_out_of_range_windows() {
        for days in [0, -3, MAX_WINDOW_DAYS + 1, i64::MAX, i64::MIN] {
            let s = Settings { window_days: days, ..Settings::default() };
            assert!(matches!(s.validate(), Err(VerifierError::Settings(_))), "window_days {days}");
            let s = Settings { filter_window_days: days, ..Settings::default() };
            assert!(matches!(s.validate(), Err(VerifierError::Settings(_))), "filter_window_days {days}");
        }
    }

    #[test]
    fn test_out_of_range_window_from_file_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, r#"{"window_days": 0, "filter_window_days": 1000000000000}"#).unwrap();
        let s = load_settings_from(&path);
        assert_eq!(s.window_days, 0);
        assert!(s.validate().is_err());
    }

    #[test]
    fn test_resolve_filters_path() {
        let s = Settings {
            filters_path: Some("/etc/configured.json".to_string()),
            ..Settings::default()
        };
        assert_eq!(s.resolve_filters_path(), PathBuf::from("/etc/configured.json"));
        assert!(Settings::default()
            .resolve_filters_path()
            .ends_with("budget-verifier/filters.json"));
    }
}
