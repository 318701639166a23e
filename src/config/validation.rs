//! Semantic checks on a deserialized [`Settings`] tree
//!
//! Serde only guarantees shape. The rules here reject values that parse but
//! cannot work, and name the offending key by its dotted path.

use crate::config::error::ConfigError;
use crate::config::settings::{
    DatabaseBackend, DatabaseConfig, FileSettings, LoggerSettings, ServerConfig, Settings,
};
use crate::logger::{LogFormat, RotationStrategy};

const VALID_LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// URL schemes accepted by libpq
const POSTGRES_SCHEMES: &[&str] = &["postgres://", "postgresql://"];

/// Fails with `message` on `field` when `value` is zero.
fn non_zero<T>(field: &str, value: T, message: &str) -> Result<(), ConfigError>
where
    T: PartialEq + Default,
{
    if value == T::default() {
        Err(ConfigError::validation(field, message))
    } else {
        Ok(())
    }
}

impl ServerConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        non_zero(
            "server.port",
            self.port,
            "Port must be between 1 and 65535. Please specify a valid port number.",
        )?;
        non_zero(
            "server.request_timeout",
            self.request_timeout,
            "Request timeout must be greater than 0 seconds.",
        )?;
        non_zero(
            "server.keep_alive_timeout",
            self.keep_alive_timeout,
            "Keep-alive timeout must be greater than 0 seconds.",
        )
    }
}

impl DatabaseConfig {
    /// The memory backend has nothing to check. PostgreSQL needs a URL with
    /// a libpq scheme and pool bounds with `0 < min <= max`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.backend == DatabaseBackend::Memory {
            return Ok(());
        }

        let url = self.url.trim();
        if url.is_empty() {
            return Err(ConfigError::validation(
                "database.url",
                "Database URL is required for the postgres backend. Set database.url or CATALOG_DATABASE__URL.",
            ));
        }
        if !POSTGRES_SCHEMES.iter().any(|scheme| url.starts_with(scheme)) {
            return Err(ConfigError::validation(
                "database.url",
                "Invalid database URL format. Expected format: postgres://[user:password@]host[:port]/database",
            ));
        }

        non_zero(
            "database.max_connections",
            self.max_connections,
            "Max connections must be greater than 0.",
        )?;
        non_zero(
            "database.min_connections",
            self.min_connections,
            "Min connections must be greater than 0.",
        )?;
        if self.min_connections > self.max_connections {
            return Err(ConfigError::validation(
                "database.min_connections",
                format!(
                    "Min connections ({}) cannot exceed max connections ({}).",
                    self.min_connections, self.max_connections
                ),
            ));
        }
        non_zero(
            "database.connection_timeout",
            self.connection_timeout,
            "Connection timeout must be greater than 0 seconds.",
        )
    }
}

impl FileSettings {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.enabled && self.path.trim().is_empty() {
            return Err(ConfigError::validation(
                "logger.file.path",
                "File path is required when file logging is enabled.",
            ));
        }

        // Parsed again by into_file_config; checked here so `serve --dry-run`
        // reports it without building the logger.
        self.format
            .parse::<LogFormat>()
            .map_err(|e| ConfigError::validation("logger.file.format", e.to_string()))?;
        self.rotation
            .strategy
            .parse::<RotationStrategy>()
            .map_err(|e| ConfigError::validation("logger.file.rotation.strategy", e.to_string()))?;

        non_zero(
            "logger.file.rotation.max_files",
            self.rotation.max_files,
            "At least one rotated file must be kept.",
        )
    }
}

impl LoggerSettings {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let level = self.level.to_lowercase();
        if !VALID_LOG_LEVELS.contains(&level.as_str()) {
            return Err(ConfigError::validation(
                "logger.level",
                format!(
                    "Invalid log level '{}'. Valid levels are: {}",
                    self.level,
                    VALID_LOG_LEVELS.join(", ")
                ),
            ));
        }

        if !(self.console.enabled || self.file.enabled) {
            return Err(ConfigError::validation(
                "logger",
                "At least one output (console or file) must be enabled.",
            ));
        }

        self.file.validate()
    }
}

impl Settings {
    /// Sections are checked in file order; the first failure wins.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.server.validate()?;
        self.database.validate()?;
        self.logger.validate()
    }
}
