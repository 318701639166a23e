//! File rotation management for the logger

use std::fs;
use std::path::{Path, PathBuf};

use jiff::{Timestamp, Zoned};

use crate::logger::compression::gzip_in_place;
use crate::logger::config::{RotationConfig, RotationStrategy, TimeUnit};
use crate::logger::error::LoggerError;

/// Decides when the active log file rotates and retires old files.
pub struct RotationManager {
    config: RotationConfig,
    /// When the active file was opened or last rotated
    opened_at: Timestamp,
}

impl RotationManager {
    pub fn new(config: RotationConfig) -> Self {
        Self {
            config,
            opened_at: Timestamp::now(),
        }
    }

    pub fn should_rotate(&self, current_size: u64) -> bool {
        self.should_rotate_at(current_size, Timestamp::now())
    }

    /// Rotation check against an explicit clock reading.
    pub fn should_rotate_at(&self, current_size: u64, now: Timestamp) -> bool {
        let size_exceeded = current_size >= self.config.max_size;
        match self.config.strategy {
            RotationStrategy::Size => size_exceeded,
            RotationStrategy::Time(unit) => self.period_elapsed(unit, now),
            RotationStrategy::Combined => {
                size_exceeded || self.period_elapsed(TimeUnit::Daily, now)
            }
        }
    }

    fn period_elapsed(&self, unit: TimeUnit, now: Timestamp) -> bool {
        now.duration_since(self.opened_at) >= unit.period()
    }

    /// Moves `active` aside under a timestamped name and returns where it
    /// went, or `None` when there was no active file.
    pub fn rotate(&mut self, active: &Path) -> Result<Option<PathBuf>, LoggerError> {
        self.opened_at = Timestamp::now();
        if !active.exists() {
            return Ok(None);
        }

        let rotated = Self::rotated_path(active);
        fs::rename(active, &rotated)?;
        Ok(Some(rotated))
    }

    /// Compresses a freshly rotated file when configured, then prunes files
    /// beyond `max_files`. Never touches `active`.
    pub fn retire(&self, rotated: Option<&Path>, active: &Path) -> Result<(), LoggerError> {
        if let Some(rotated) = rotated
            && self.config.compress
        {
            gzip_in_place(rotated).map_err(|e| {
                LoggerError::rotation(format!(
                    "failed to compress {}: {}",
                    rotated.display(),
                    e
                ))
            })?;
        }

        self.prune(active)
    }

    /// `catalog.log` becomes `catalog.20260101_120000.log`, with a numeric
    /// suffix when a file of that name already exists.
    fn rotated_path(active: &Path) -> PathBuf {
        let stamp = Zoned::now().strftime("%Y%m%d_%H%M%S").to_string();
        let stem = active.file_stem().unwrap_or_default().to_string_lossy();
        let ext = active.extension().map(|e| e.to_string_lossy());

        let name_for = |attempt: u32| {
            let stamp = if attempt == 0 {
                stamp.clone()
            } else {
                format!("{}-{}", stamp, attempt)
            };
            match &ext {
                Some(ext) => format!("{}.{}.{}", stem, stamp, ext),
                None => format!("{}.{}", stem, stamp),
            }
        };

        let mut attempt = 0;
        loop {
            let candidate = active.with_file_name(name_for(attempt));
            let taken = candidate.exists() || {
                let mut gz = candidate.as_os_str().to_owned();
                gz.push(".gz");
                Path::new(&gz).exists()
            };
            if !taken {
                return candidate;
            }
            attempt += 1;
        }
    }

    /// Removes the oldest rotated files so at most `max_files` remain.
    pub fn prune(&self, active: &Path) -> Result<(), LoggerError> {
        let dir = match active.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let prefix = format!(
            "{}.",
            active.file_stem().unwrap_or_default().to_string_lossy()
        );

        let mut rotated: Vec<(std::time::SystemTime, PathBuf)> = fs::read_dir(dir)?
            .filter_map(Result::ok)
            .map(|entry| entry.path())
            .filter(|path| path != active)
            .filter(|path| {
                path.file_name()
                    .map(|name| name.to_string_lossy().starts_with(&prefix))
                    .unwrap_or(false)
            })
            .filter_map(|path| {
                let modified = fs::metadata(&path).and_then(|m| m.modified()).ok()?;
                Some((modified, path))
            })
            .collect();

        if rotated.len() <= self.config.max_files {
            return Ok(());
        }

        rotated.sort();
        let excess = rotated.len() - self.config.max_files;
        for (_, path) in rotated.into_iter().take(excess) {
            fs::remove_file(path)?;
        }
        Ok(())
    }
}
