//! Runtime configuration types for the logger

use std::path::PathBuf;
use std::str::FromStr;

use jiff::SignedDuration;
use serde::{Deserialize, Serialize};
use tracing::Level;

use crate::logger::error::LoggerError;

/// Main logger configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggerConfig {
    /// Level name understood by `tracing`, e.g. "info"
    pub level: String,
    pub console: ConsoleConfig,
    pub file: FileConfig,
}

impl LoggerConfig {
    pub fn validate(&self) -> Result<(), LoggerError> {
        self.parse_level()?;

        if !self.console.enabled && !self.file.enabled {
            return Err(LoggerError::config(
                "At least one output (console or file) must be enabled",
            ));
        }

        if self.file.enabled {
            self.file.validate()?;
        }

        Ok(())
    }

    pub fn parse_level(&self) -> Result<Level, LoggerError> {
        Level::from_str(&self.level).map_err(|_| {
            LoggerError::config(format!(
                "Invalid log level '{}'. Valid levels are: trace, debug, info, warn, error",
                self.level
            ))
        })
    }
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            console: ConsoleConfig::default(),
            file: FileConfig::default(),
        }
    }
}

/// Console output configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsoleConfig {
    pub enabled: bool,
    pub colored: bool,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            colored: true,
        }
    }
}

/// File output configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileConfig {
    pub enabled: bool,
    pub path: PathBuf,
    /// Keep existing content when the file is reopened at startup
    pub append: bool,
    pub format: LogFormat,
    pub rotation: RotationConfig,
}

impl FileConfig {
    fn validate(&self) -> Result<(), LoggerError> {
        if self.path.as_os_str().is_empty() {
            return Err(LoggerError::config(
                "File path cannot be empty when file output is enabled",
            ));
        }
        self.rotation.validate()
    }
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            path: PathBuf::from("logs/catalog.log"),
            append: true,
            format: LogFormat::Json,
            rotation: RotationConfig::default(),
        }
    }
}

/// Line format of the file output
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogFormat {
    #[default]
    Full,
    Compact,
    Json,
}

impl FromStr for LogFormat {
    type Err = LoggerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "full" => Ok(LogFormat::Full),
            "compact" => Ok(LogFormat::Compact),
            "json" => Ok(LogFormat::Json),
            _ => Err(LoggerError::config(format!(
                "Invalid log format '{}'. Valid formats are: full, compact, json",
                s
            ))),
        }
    }
}

/// File rotation configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RotationConfig {
    pub strategy: RotationStrategy,
    /// Size threshold in bytes for size-based strategies
    pub max_size: u64,
    /// Number of rotated files kept next to the active one
    pub max_files: usize,
    /// Gzip files once they are rotated out
    pub compress: bool,
}

impl RotationConfig {
    pub fn validate(&self) -> Result<(), LoggerError> {
        if self.max_size == 0 {
            return Err(LoggerError::config("Maximum file size must be greater than 0"));
        }
        if self.max_files == 0 {
            return Err(LoggerError::config(
                "Maximum number of files must be greater than 0",
            ));
        }
        Ok(())
    }
}

impl Default for RotationConfig {
    fn default() -> Self {
        Self {
            strategy: RotationStrategy::Size,
            max_size: 10 * 1024 * 1024,
            max_files: 5,
            compress: false,
        }
    }
}

/// When the active log file is rotated
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum RotationStrategy {
    /// Once the file reaches `max_size`
    #[default]
    Size,
    /// Once the period has elapsed since the file was opened
    Time(TimeUnit),
    /// Whichever of size or a daily period comes first
    Combined,
}

impl FromStr for RotationStrategy {
    type Err = LoggerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "size" => Ok(RotationStrategy::Size),
            "time" | "daily" => Ok(RotationStrategy::Time(TimeUnit::Daily)),
            "hourly" => Ok(RotationStrategy::Time(TimeUnit::Hourly)),
            "weekly" => Ok(RotationStrategy::Time(TimeUnit::Weekly)),
            "combined" => Ok(RotationStrategy::Combined),
            _ => Err(LoggerError::config(format!(
                "Invalid rotation strategy '{}'. Valid strategies are: size, time, hourly, daily, weekly, combined",
                s
            ))),
        }
    }
}

/// Periods for time-based rotation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimeUnit {
    Hourly,
    Daily,
    Weekly,
}

impl TimeUnit {
    pub fn period(&self) -> SignedDuration {
        match self {
            TimeUnit::Hourly => SignedDuration::from_secs(60 * 60),
            TimeUnit::Daily => SignedDuration::from_secs(24 * 60 * 60),
            TimeUnit::Weekly => SignedDuration::from_secs(7 * 24 * 60 * 60),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(LoggerConfig::default().validate().is_ok());
    }

    #[test]
    fn test_invalid_log_level() {
        let config = LoggerConfig {
            level: "loud".to_string(),
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(LoggerError::Config { .. })));
    }

    #[test]
    fn test_both_outputs_disabled() {
        let config = LoggerConfig {
            console: ConsoleConfig {
                enabled: false,
                colored: false,
            },
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_disabled_file_output_is_not_checked() {
        let mut config = LoggerConfig::default();
        config.file.path = PathBuf::new();
        config.file.rotation.max_files = 0;
        assert!(config.validate().is_ok());

        config.file.enabled = true;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rotation_config_validation() {
        let mut rotation = RotationConfig::default();
        assert!(rotation.validate().is_ok());

        rotation.max_size = 0;
        assert!(rotation.validate().is_err());

        rotation.max_size = 1024;
        rotation.max_files = 0;
        assert!(rotation.validate().is_err());
    }

    #[test]
    fn test_log_format_parsing() {
        assert_eq!("full".parse::<LogFormat>().unwrap(), LogFormat::Full);
        assert_eq!("Compact".parse::<LogFormat>().unwrap(), LogFormat::Compact);
        assert_eq!("JSON".parse::<LogFormat>().unwrap(), LogFormat::Json);
        assert!("xml".parse::<LogFormat>().is_err());
    }

    #[test]
    fn test_rotation_strategy_parsing() {
        assert_eq!("size".parse::<RotationStrategy>().unwrap(), RotationStrategy::Size);
        assert_eq!(
            "time".parse::<RotationStrategy>().unwrap(),
            RotationStrategy::Time(TimeUnit::Daily)
        );
        assert_eq!(
            "weekly".parse::<RotationStrategy>().unwrap(),
            RotationStrategy::Time(TimeUnit::Weekly)
        );
        assert_eq!(
            "combined".parse::<RotationStrategy>().unwrap(),
            RotationStrategy::Combined
        );
        assert!("monthly".parse::<RotationStrategy>().is_err());
    }

    #[test]
    fn test_time_unit_periods() {
        assert_eq!(TimeUnit::Hourly.period().as_secs(), 3600);
        assert_eq!(TimeUnit::Daily.period().as_secs(), 86_400);
        assert_eq!(TimeUnit::Weekly.period(), TimeUnit::Daily.period() * 7);
    }
}
