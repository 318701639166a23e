//! Migrate command handler
//!
//! Applies, previews or reverts the embedded migrations against the
//! configured PostgreSQL database.

use crate::config::{DatabaseBackend, Settings};
use crate::db;
use crate::error::{AppError, AppResult};

pub struct MigrateCommandHandler {
    config: Settings,
}

impl MigrateCommandHandler {
    pub fn new(config: Settings) -> Self {
        Self { config }
    }

    /// # Errors
    /// - `Validation` when the in-memory backend is configured
    /// - `Database` on connection or migration failures
    pub async fn execute(&self, dry_run: bool, rollback: Option<u32>) -> AppResult<()> {
        if self.config.database.backend == DatabaseBackend::Memory {
            return Err(AppError::Validation {
                field: "database.backend".to_string(),
                reason: "Migrations require the postgres backend".to_string(),
            });
        }
        self.config.database.validate()?;

        let url = self.config.database.url.as_str();
        match (dry_run, rollback) {
            (true, _) => {
                println!("Checking for pending migrations...");
                let pending = db::pending_migrations(url).await?;
                if pending.is_empty() {
                    println!("✓ No pending migrations found - database is up to date");
                } else {
                    println!("Found {} pending migration(s):", pending.len());
                    for name in &pending {
                        println!("  - {}", name);
                    }
                    println!("\nRun without --dry-run to apply these migrations");
                }
            }
            (false, Some(steps)) => {
                println!("Rolling back {} migration(s)...", steps);
                let reverted = db::revert_migrations(url, steps).await?;
                println!("✓ Reverted {} migration(s):", reverted.len());
                for version in &reverted {
                    println!("  - {}", version);
                }
            }
            (false, None) => {
                println!("Running database migrations...");
                let applied = db::run_pending_migrations(url).await?;
                if applied.is_empty() {
                    println!("✓ No migrations to apply - database is already up to date");
                } else {
                    println!("✓ Applied {} migration(s):", applied.len());
                    for version in &applied {
                        println!("  - {}", version);
                    }
                }
            }
        }

        Ok(())
    }
}
