//! Rotating file writer for the logger

use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use tracing_subscriber::fmt::MakeWriter;

use crate::logger::config::FileConfig;
use crate::logger::error::LoggerError;
use crate::logger::rotation::RotationManager;

/// `MakeWriter` that appends to a log file and rotates it in place.
///
/// When the file cannot be written the writer switches to stderr for the
/// rest of the process so log lines are never silently lost.
#[derive(Clone)]
pub struct RotatingFileWriter {
    state: Arc<Mutex<WriterState>>,
}

struct WriterState {
    path: PathBuf,
    /// `None` once the writer has fallen back to stderr
    file: Option<BufWriter<File>>,
    size: u64,
    rotation: RotationManager,
}

impl RotatingFileWriter {
    pub fn new(config: &FileConfig) -> Result<Self, LoggerError> {
        if let Some(parent) = config.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }

        let file = open_log_file(&config.path, config.append)?;
        let size = if config.append {
            file.get_ref().metadata().map(|m| m.len()).unwrap_or(0)
        } else {
            0
        };

        Ok(Self {
            state: Arc::new(Mutex::new(WriterState {
                path: config.path.clone(),
                file: Some(file),
                size,
                rotation: RotationManager::new(config.rotation.clone()),
            })),
        })
    }

    pub fn is_in_fallback_mode(&self) -> bool {
        self.lock().file.is_none()
    }

    fn lock(&self) -> MutexGuard<'_, WriterState> {
        // A panic while logging must not disable logging for everyone else
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl<'a> MakeWriter<'a> for RotatingFileWriter {
    type Writer = RotatingWriterGuard<'a>;

    fn make_writer(&'a self) -> Self::Writer {
        RotatingWriterGuard { writer: self }
    }
}

/// Per-event handle returned by [`RotatingFileWriter::make_writer`]
pub struct RotatingWriterGuard<'a> {
    writer: &'a RotatingFileWriter,
}

impl Write for RotatingWriterGuard<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut state = self.writer.lock();
        state.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        let mut state = self.writer.lock();
        match state.file.as_mut() {
            Some(file) => file.flush(),
            None => io::stderr().flush(),
        }
    }
}

impl Drop for RotatingWriterGuard<'_> {
    fn drop(&mut self) {
        let _ = self.flush();
    }
}

impl WriterState {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.file.is_some() && self.rotation.should_rotate(self.size) {
            if let Err(e) = self.rotate() {
                return self.fall_back(buf, &e.to_string());
            }
        }

        let Some(file) = self.file.as_mut() else {
            return io::stderr().write(buf);
        };

        match file.write(buf) {
            Ok(written) => {
                self.size += written as u64;
                Ok(written)
            }
            Err(e) => self.fall_back(buf, &e.to_string()),
        }
    }

    /// Only moving the active file aside is fatal. Compression and pruning
    /// run after the new file is open, and their failures are reported on
    /// stderr without leaving file output.
    fn rotate(&mut self) -> Result<(), LoggerError> {
        if let Some(file) = self.file.as_mut() {
            file.flush()?;
        }
        self.file = None;
        let rotated = self.rotation.rotate(&self.path)?;
        self.file = Some(open_log_file(&self.path, false)?);
        self.size = 0;

        if let Err(e) = self.rotation.retire(rotated.as_deref(), &self.path) {
            eprintln!(
                "[logger] cleaning up rotated files next to {} failed: {}",
                self.path.display(),
                e
            );
        }
        Ok(())
    }

    fn fall_back(&mut self, buf: &[u8], reason: &str) -> io::Result<usize> {
        self.file = None;
        eprintln!(
            "[logger] writing to {} failed, falling back to stderr: {}",
            self.path.display(),
            reason
        );
        io::stderr().write(buf)
    }
}

fn open_log_file(path: &Path, append: bool) -> io::Result<BufWriter<File>> {
    let file = OpenOptions::new()
        .create(true)
        .write(true)
        .append(append)
        .truncate(!append)
        .open(path)?;

    Ok(BufWriter::new(file))
}
