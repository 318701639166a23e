//! Logger module
//!
//! Builds the global `tracing` subscriber from [`LoggerConfig`]:
//! - console output with color control
//! - file output in full, compact or JSON format
//! - size and time based rotation with optional gzip compression
//! - fallback to stderr when the log file becomes unwritable
//! - runtime level changes through [`LogLevelHandle`]

pub mod compression;
pub mod config;
pub mod error;
pub mod rotation;
pub(crate) mod writer;

pub use config::{
    ConsoleConfig, FileConfig, LogFormat, LoggerConfig, RotationConfig, RotationStrategy, TimeUnit,
};
pub use error::LoggerError;

use std::io::IsTerminal;

use tracing_subscriber::layer::{Layered, SubscriberExt};
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry, fmt, reload};
use writer::RotatingFileWriter;

type FilteredRegistry = Layered<reload::Layer<EnvFilter, Registry>, Registry>;
type BoxedLayer = Box<dyn Layer<FilteredRegistry> + Send + Sync + 'static>;

/// Changes the active level filter of an installed subscriber.
#[derive(Clone)]
pub struct LogLevelHandle {
    inner: reload::Handle<EnvFilter, Registry>,
}

impl LogLevelHandle {
    pub(crate) fn new(inner: reload::Handle<EnvFilter, Registry>) -> Self {
        Self { inner }
    }

    /// Replace the filter with `directive`, e.g. `"debug"` or
    /// `"info,catalog_rs=trace"`.
    pub fn set_level(&self, directive: &str) -> Result<(), LoggerError> {
        let filter = EnvFilter::try_new(directive).map_err(|e| LoggerError::Reload {
            message: format!("invalid filter '{}': {}", directive, e),
        })?;
        self.inner.reload(filter).map_err(|e| LoggerError::Reload {
            message: e.to_string(),
        })
    }

    /// The active filter rendered as a directive string.
    pub fn current_level(&self) -> Option<String> {
        self.inner.with_current(|filter| filter.to_string()).ok()
    }
}

/// Install the global subscriber described by `config`.
///
/// Can only succeed once per process.
pub fn init_logger(config: LoggerConfig) -> anyhow::Result<LogLevelHandle> {
    config.validate()?;

    let filter = EnvFilter::try_new(&config.level)?;
    let (filter_layer, handle) = reload::Layer::new(filter);

    // The file layer must come before the console layer, otherwise span
    // fields are formatted with ANSI codes and leak into the file.
    // See https://github.com/tokio-rs/tracing/issues/1817
    let mut layers: Vec<BoxedLayer> = Vec::with_capacity(2);
    if config.file.enabled {
        layers.push(file_layer(&config.file)?);
    }
    if config.console.enabled {
        layers.push(console_layer(&config.console));
    }

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(layers)
        .try_init()?;

    Ok(LogLevelHandle::new(handle))
}

fn console_layer(config: &ConsoleConfig) -> BoxedLayer {
    let use_ansi = config.colored && std::io::stdout().is_terminal();
    fmt::layer()
        .with_ansi(use_ansi)
        .with_target(true)
        .with_level(true)
        .boxed()
}

fn file_layer(config: &FileConfig) -> Result<BoxedLayer, LoggerError> {
    let writer = RotatingFileWriter::new(config)?;
    let layer = fmt::layer()
        .with_ansi(false)
        .with_target(true)
        .with_writer(writer);

    Ok(match config.format {
        LogFormat::Full => layer.boxed(),
        LogFormat::Compact => layer.compact().boxed(),
        LogFormat::Json => layer.json().boxed(),
    })
}
