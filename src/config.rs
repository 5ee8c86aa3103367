//! Engine settings persisted in the OS configuration directory.

use std::path::{Path, PathBuf};

use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

const SETTINGS_FILE: &str = "settings.json";

/// Tunables for gap rules, gesture thresholds and auto-scroll.
///
/// Column geometry is deliberately absent: the 52/22/21px widths are constants
/// of the grid model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Minimum days between two items sharing a track, measured end to start.
    pub min_gap_days: i64,
    /// Minimum days between two blackout periods. 1 lets them touch.
    pub blackout_min_gap_days: i64,
    /// Shortest span (`end - start`) a resize may leave.
    pub min_duration_days: i64,
    /// Smallest rendered bar width as a percentage of one day slot.
    pub min_bar_width_percent: i32,
    /// Distance from a viewport edge that starts auto-scroll.
    pub autoscroll_margin_px: i32,
    /// A release sooner than this with no day change counts as a click.
    pub click_max_ms: u64,
    /// A release closer than this with no day change counts as a click.
    pub click_max_px: i32,
    pub log_level: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            min_gap_days: 2,
            blackout_min_gap_days: 1,
            min_duration_days: 1,
            min_bar_width_percent: 80,
            autoscroll_margin_px: 60,
            click_max_ms: 200,
            click_max_px: 3,
            log_level: "info".into(),
        }
    }
}

impl EngineConfig {
    /// Default location: `<config dir>/TimelinePlanner/settings.json`.
    pub fn default_path() -> Result<PathBuf, ConfigError> {
        directories::ProjectDirs::from("", "", "TimelinePlanner")
            .map(|dirs| dirs.config_dir().join(SETTINGS_FILE))
            .ok_or(ConfigError::NoConfigDir)
    }

    /// Read settings from `path`. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            info!("settings file {} not found, using defaults", path.display());
            return Ok(Self::default());
        }
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_str(&json).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(config.sanitized())
    }

    /// Load from the default location, falling back to defaults on any error.
    pub fn load_or_default() -> Self {
        match Self::default_path().and_then(|p| Self::load(&p)) {
            Ok(config) => config,
            Err(e) => {
                warn!("using default engine settings: {e}");
                Self::default()
            }
        }
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir).map_err(|source| ConfigError::Write {
                path: dir.to_path_buf(),
                source,
            })?;
        }
        let json = serde_json::to_string_pretty(self).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        std::fs::write(path, json).map_err(|source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Clamp values a hand-edited file could push out of range.
    fn sanitized(mut self) -> Self {
        self.min_gap_days = self.min_gap_days.max(0);
        self.blackout_min_gap_days = self.blackout_min_gap_days.max(1);
        self.min_duration_days = self.min_duration_days.max(1);
        self.min_bar_width_percent = self.min_bar_width_percent.clamp(1, 100);
        self.autoscroll_margin_px = self.autoscroll_margin_px.max(0);
        self.click_max_px = self.click_max_px.max(0);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = EngineConfig::load(&dir.path().join("nope.json")).unwrap();
        assert_eq!(config, EngineConfig::default());
    }

    #[test]
    fn partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(SETTINGS_FILE);
        std::fs::write(&path, r#"{ "min_gap_days": 5, "min_duration_days": 0 }"#).unwrap();
        let config = EngineConfig::load(&path).unwrap();
        assert_eq!(config.min_gap_days, 5);
        assert_eq!(config.min_duration_days, 1);
        assert_eq!(config.autoscroll_margin_px, 60);
    }

    #[test]
    fn invalid_json_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(SETTINGS_FILE);
        std::fs::write(&path, "{ not json").unwrap();
        assert!(matches!(EngineConfig::load(&path), Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join(SETTINGS_FILE);
        let config = EngineConfig {
            autoscroll_margin_px: 40,
            ..Default::default()
        };
        config.save(&path).unwrap();
        assert_eq!(EngineConfig::load(&path).unwrap(), config);
    }
}
