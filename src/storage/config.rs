use chrono::FixedOffset;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

use crate::calendar::CalendarView;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Failed to serialize config: {0}")]
    SerializeError(#[from] toml::ser::Error),
    #[error("UTC offset of {0} minutes is out of range")]
    InvalidOffset(i32),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    pub storage: StorageConfig,
    pub ui: UiConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StorageConfig {
    pub database_path: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UiConfig {
    pub default_view: CalendarView,
    pub default_color: String,
    pub utc_offset_minutes: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl UiConfig {
    pub fn offset(&self) -> Result<FixedOffset, ConfigError> {
        self.utc_offset_minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .ok_or(ConfigError::InvalidOffset(self.utc_offset_minutes))
    }
}

impl Config {
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(ConfigError::from)
    }

    pub fn load_or_create() -> Result<Self, ConfigError> {
        let config_path = Self::config_path();

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            Self::from_toml(&content)
        } else {
            let config = Self::default();
            config.save()?;
            Ok(config)
        }
    }

    pub fn config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("gridcal")
    }

    pub fn config_path() -> PathBuf {
        Self::config_dir().join("config.toml")
    }

    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, config_path: &std::path::Path) -> Result<(), ConfigError> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        let data_dir = dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("gridcal");

        Self {
            storage: StorageConfig {
                database_path: data_dir.join("gridcal.db"),
            },
            ui: UiConfig {
                default_view: CalendarView::DayGridMonth,
                default_color: crate::calendar::draft::DEFAULT_COLOR.to_string(),
                utc_offset_minutes: 0,
            },
            logging: LoggingConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_shows_month_view() {
        let config = Config::default();
        assert_eq!(config.ui.default_view, CalendarView::DayGridMonth);
    }

    #[test]
    fn default_config_uses_utc() {
        let config = Config::default();
        assert_eq!(config.ui.offset().unwrap().local_minus_utc(), 0);
    }

    #[test]
    fn parse_valid_toml_config() {
        let toml_content = r##"
            [storage]
            database_path = "/tmp/gridcal.db"

            [ui]
            default_view = "timeGridWeek"
            default_color = "#3B86FF"
            utc_offset_minutes = 120

            [logging]
            level = "debug"
        "##;

        let config = Config::from_toml(toml_content).unwrap();

        assert_eq!(config.storage.database_path, PathBuf::from("/tmp/gridcal.db"));
        assert_eq!(config.ui.default_view, CalendarView::TimeGridWeek);
        assert_eq!(config.ui.default_color, "#3B86FF");
        assert_eq!(config.ui.offset().unwrap().local_minus_utc(), 7200);
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn logging_section_is_optional() {
        let toml_content = r##"
            [storage]
            database_path = "gridcal.db"

            [ui]
            default_view = "dayGridMonth"
            default_color = "#000"
            utc_offset_minutes = 0
        "##;

        let config = Config::from_toml(toml_content).unwrap();

        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn out_of_range_offset_is_rejected() {
        let mut config = Config::default();
        config.ui.utc_offset_minutes = 24 * 60;

        assert!(matches!(config.ui.offset(), Err(ConfigError::InvalidOffset(1440))));
    }

    #[test]
    fn huge_offset_is_rejected_without_overflow() {
        let mut config = Config::default();
        config.ui.utc_offset_minutes = 40_000_000;

        assert!(matches!(config.ui.offset(), Err(ConfigError::InvalidOffset(40_000_000))));

        config.ui.utc_offset_minutes = i32::MIN;
        assert!(config.ui.offset().is_err());
    }

    #[test]
    fn parse_invalid_toml_returns_error() {
        let invalid_toml = "this is not valid toml";
        let result = Config::from_toml(invalid_toml);
        assert!(result.is_err());
    }

    #[test]
    fn saved_config_can_be_read_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let config = Config::default();

        config.save_to(&path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(Config::from_toml(&content).unwrap(), config);
    }
}
