//! Typed settings tree for catalog-rs
//!
//! Each section carries `#[serde(default)]`, so a partial TOML file or a
//! handful of `CATALOG_*` variables still yields a complete [`Settings`].

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::config::error::ConfigError;
use crate::logger::{ConsoleConfig, FileConfig, LogFormat, LoggerConfig, RotationConfig, RotationStrategy};

/// Root of the settings tree, one field per TOML table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Settings {
    pub application: ApplicationConfig,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub logger: LoggerSettings,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApplicationConfig {
    pub name: String,
    /// Reported by the health endpoint, defaults to the crate version
    pub version: String,
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            name: env!("CARGO_PKG_NAME").to_string(),
            version: crate::pkg_version().to_string(),
        }
    }
}

/// Listener settings for the HTTP server
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Seconds before an in-flight request is answered with 408
    pub request_timeout: u64,
    /// Seconds an idle keep-alive connection is held open
    pub keep_alive_timeout: u64,
}

impl ServerConfig {
    /// `host:port`, ready for `TcpListener::bind`
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            request_timeout: 30,
            keep_alive_timeout: 75,
        }
    }
}

/// Where categories are persisted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseBackend {
    /// PostgreSQL through the diesel-async pool
    #[default]
    Postgres,
    /// Process-local store, lost on restart
    Memory,
}

impl DatabaseBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            DatabaseBackend::Postgres => "postgres",
            DatabaseBackend::Memory => "memory",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub backend: DatabaseBackend,
    /// Connection URL, only read by the postgres backend
    pub url: String,
    pub max_connections: u32,
    /// Idle connections the pool keeps warm
    pub min_connections: u32,
    /// Seconds to wait for a pooled connection
    pub connection_timeout: u64,
    /// Apply pending migrations before the listener starts
    pub auto_migrate: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            backend: DatabaseBackend::Postgres,
            url: String::new(),
            max_connections: 10,
            min_connections: 1,
            connection_timeout: 30,
            auto_migrate: false,
        }
    }
}

/// `[logger]` table as written in TOML. Strings are parsed into the
/// logger's own types by [`LoggerSettings::into_logger_config`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggerSettings {
    /// Level name or a full `EnvFilter` directive
    pub level: String,
    pub console: ConsoleSettings,
    pub file: FileSettings,
}

impl Default for LoggerSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            console: ConsoleSettings::default(),
            file: FileSettings::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsoleSettings {
    pub enabled: bool,
    /// Ignored when stdout is not a terminal
    pub colored: bool,
}

impl Default for ConsoleSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            colored: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileSettings {
    pub enabled: bool,
    pub path: String,
    pub append: bool,
    /// One of `full`, `compact`, `json`
    pub format: String,
    pub rotation: RotationSettings,
}

impl Default for FileSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            path: "logs/catalog.log".to_string(),
            append: true,
            format: "json".to_string(),
            rotation: RotationSettings::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RotationSettings {
    /// `size`, `time`, `hourly`, `daily`, `weekly` or `combined`
    pub strategy: String,
    /// Bytes
    pub max_size: u64,
    pub max_files: usize,
    pub compress: bool,
}

impl Default for RotationSettings {
    fn default() -> Self {
        Self {
            strategy: "size".to_string(),
            max_size: 10 * 1024 * 1024,
            max_files: 5,
            compress: false,
        }
    }
}

impl LoggerSettings {
    /// Parse the string fields and check the result with
    /// [`LoggerConfig::validate`].
    pub fn into_logger_config(self) -> Result<LoggerConfig, ConfigError> {
        let LoggerSettings {
            level,
            console,
            file,
        } = self;

        let config = LoggerConfig {
            level,
            console: ConsoleConfig {
                enabled: console.enabled,
                colored: console.colored,
            },
            file: file.into_file_config()?,
        };
        config
            .validate()
            .map_err(|e| ConfigError::validation("logger", e.to_string()))?;
        Ok(config)
    }
}

impl FileSettings {
    pub fn into_file_config(self) -> Result<FileConfig, ConfigError> {
        let format: LogFormat = self
            .format
            .parse()
            .map_err(|e: crate::logger::LoggerError| {
                ConfigError::validation("logger.file.format", e.to_string())
            })?;

        Ok(FileConfig {
            enabled: self.enabled,
            path: PathBuf::from(self.path),
            append: self.append,
            format,
            rotation: self.rotation.into_rotation_config()?,
        })
    }
}

impl RotationSettings {
    pub fn into_rotation_config(self) -> Result<RotationConfig, ConfigError> {
        let strategy: RotationStrategy = self.strategy.parse().map_err(
            |e: crate::logger::LoggerError| {
                ConfigError::validation("logger.file.rotation.strategy", e.to_string())
            },
        )?;

        Ok(RotationConfig {
            strategy,
            max_size: self.max_size,
            max_files: self.max_files,
            compress: self.compress,
        })
    }
}
