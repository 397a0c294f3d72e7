//! Runtime settings
//!
//! Loaded from a JSON file next to the binary. A missing file means
//! defaults; unknown fields are ignored and missing ones take their
//! default value.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;
use crate::persistence::AssetPaths;
use crate::sim::Arena;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("could not read settings {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed settings {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid settings: {0}")]
    Invalid(String),
}

/// Game settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Arena size in pixels
    pub arena_width: f64,
    pub arena_height: f64,

    /// Directory holding `levels/`, `saves/` and `highscores/`
    pub asset_root: PathBuf,

    /// Simulation ticks per second for the headless driver
    pub tick_hz: u32,

    /// Default log filter when `RUST_LOG` is unset
    pub log_level: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            arena_width: ARENA_WIDTH,
            arena_height: ARENA_HEIGHT,
            asset_root: PathBuf::from("assets"),
            tick_hz: DEFAULT_TICK_HZ,
            log_level: "info".to_string(),
        }
    }
}

impl Settings {
    /// Load settings from `path`, falling back to defaults if it does not exist
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let json = match fs::read_to_string(path) {
            Ok(json) => json,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                log::info!("No settings at {}, using defaults", path.display());
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(SettingsError::Io {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };
        let settings: Settings =
            serde_json::from_str(&json).map_err(|source| SettingsError::Json {
                path: path.to_path_buf(),
                source,
            })?;
        settings.validate()?;
        Ok(settings)
    }

    /// Write settings to `path` as pretty JSON
    pub fn save(&self, path: &Path) -> Result<(), SettingsError> {
        let json = serde_json::to_string_pretty(self).map_err(|source| SettingsError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        fs::write(path, json).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        if !(self.arena_width > 0.0 && self.arena_height > 0.0) {
            return Err(SettingsError::Invalid(format!(
                "arena must have positive size, got {}x{}",
                self.arena_width, self.arena_height
            )));
        }
        if self.tick_hz == 0 {
            return Err(SettingsError::Invalid("tick_hz must be at least 1".into()));
        }
        Ok(())
    }

    pub fn arena(&self) -> Arena {
        Arena {
            width: self.arena_width,
            height: self.arena_height,
        }
    }

    pub fn asset_paths(&self) -> AssetPaths {
        AssetPaths::new(&self.asset_root)
    }

    /// Wall-clock time between driver ticks
    pub fn tick_interval(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.tick_hz.max(1) as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.arena(), Arena::default());
        assert!(settings.validate().is_ok());
        assert_eq!(
            settings.asset_paths().level_file(0),
            Path::new("assets/levels/level_0.txt")
        );
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let settings: Settings = serde_json::from_str(r#"{ "tick_hz": 30 }"#).unwrap();
        assert_eq!(settings.tick_hz, 30);
        assert_eq!(settings.arena_width, ARENA_WIDTH);
        assert_eq!(settings.tick_interval(), Duration::from_secs_f64(1.0 / 30.0));
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let settings = Settings::load(Path::new("/definitely/not/here/settings.json")).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pac-catch.json");
        let settings = Settings {
            arena_width: 800.0,
            tick_hz: 120,
            log_level: "debug".to_string(),
            ..Default::default()
        };
        settings.save(&path).unwrap();
        assert_eq!(Settings::load(&path).unwrap(), settings);

        fs::write(&path, "{ not json").unwrap();
        assert!(matches!(Settings::load(&path), Err(SettingsError::Json { .. })));
    }

    #[test]
    fn test_rejects_empty_arena() {
        let settings = Settings {
            arena_width: 0.0,
            ..Default::default()
        };
        assert!(matches!(settings.validate(), Err(SettingsError::Invalid(_))));
    }
}
