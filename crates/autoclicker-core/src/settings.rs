//! Application settings file

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Directory under `$HOME` holding the action and settings files
pub const DATA_DIR: &str = ".autoclicker";
pub const SETTINGS_FILE: &str = "app_settings.json";
pub const ACTIONS_FILE: &str = "click_locations.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    pub always_on_top: bool,
    pub transparency: f64,
    pub mouse_move_duration: f64,
    pub default_interval: f64,
    pub default_repetitions: u32,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            always_on_top: false,
            transparency: 0.9,
            mouse_move_duration: 1.0,
            default_interval: 1.0,
            default_repetitions: 1,
        }
    }
}

impl AppSettings {
    /// Read settings, falling back to defaults for anything missing.
    ///
    /// A missing or unreadable file is not an error for the caller.
    pub fn load(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }
        match Self::read(path) {
            Ok(s) => s,
            Err(e) => {
                tracing::warn!("Failed to load settings: {:#}", e);
                Self::default()
            }
        }
    }

    fn read(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
        Ok(())
    }
}

/// `$HOME/.autoclicker`
pub fn data_dir() -> Result<PathBuf> {
    let home = std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .context("HOME not set")?;
    Ok(PathBuf::from(home).join(DATA_DIR))
}

pub fn default_settings_path() -> Result<PathBuf> {
    Ok(data_dir()?.join(SETTINGS_FILE))
}

pub fn default_actions_path() -> Result<PathBuf> {
    Ok(data_dir()?.join(ACTIONS_FILE))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        assert_eq!(AppSettings::load(&dir.path().join("nope.json")), AppSettings::default());
    }

    #[test]
    fn missing_keys_fall_back() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("s.json");
        fs::write(&path, r#"{"default_interval": 0.25, "theme": "dark"}"#).unwrap();
        let s = AppSettings::load(&path);
        assert_eq!(s.default_interval, 0.25);
        assert_eq!(s.default_repetitions, 1);
        assert_eq!(s.transparency, 0.9);
    }

    #[test]
    fn garbage_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("s.json");
        fs::write(&path, "{ not json").unwrap();
        assert_eq!(AppSettings::load(&path), AppSettings::default());
    }

    #[test]
    fn save_creates_parent() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("a/b/app_settings.json");
        let s = AppSettings {
            always_on_top: true,
            ..Default::default()
        };
        s.save(&path).unwrap();
        assert_eq!(AppSettings::load(&path), s);
    }
}
