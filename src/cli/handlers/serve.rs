//! Serve command handler
//!
//! Only `--dry-run` is handled here; a real start returns to `main`, which
//! owns the server lifecycle.

use crate::config::{DatabaseBackend, Settings};
use crate::error::AppResult;

pub struct ServeCommandHandler {
    config: Settings,
}

impl ServeCommandHandler {
    pub fn new(config: Settings) -> Self {
        Self { config }
    }

    /// Validates configuration and prints what the server would do.
    pub fn validate_only(&self) -> AppResult<()> {
        self.config.validate()?;

        println!("✓ Configuration is valid");
        println!("✓ Server would bind to: {}", self.config.server.address());
        match self.config.database.backend {
            DatabaseBackend::Postgres => println!(
                "✓ Category store: postgres (pool {}..{} connections, auto_migrate = {})",
                self.config.database.min_connections,
                self.config.database.max_connections,
                self.config.database.auto_migrate
            ),
            DatabaseBackend::Memory => println!("✓ Category store: in-memory"),
        }
        println!("✓ Logger level: {}", self.config.logger.level);
        println!("Dry run completed successfully - configuration is ready for deployment");
        Ok(())
    }

    pub fn config(&self) -> &Settings {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn postgres_settings() -> Settings {
        let mut config = Settings::default();
        config.database.url = "postgres://localhost/catalog".to_string();
        config
    }

    #[test]
    fn test_dry_run_with_valid_config() {
        let handler = ServeCommandHandler::new(postgres_settings());
        assert!(handler.validate_only().is_ok());
        assert_eq!(handler.config(), &postgres_settings());
    }

    #[test]
    fn test_dry_run_postgres_requires_url() {
        let handler = ServeCommandHandler::new(Settings::default());
        assert!(handler.validate_only().is_err());
    }

    #[test]
    fn test_dry_run_with_invalid_config() {
        let mut config = postgres_settings();
        config.server.port = 0;

        let handler = ServeCommandHandler::new(config);
        assert!(handler.validate_only().is_err());
    }

    #[test]
    fn test_dry_run_memory_backend_without_url() {
        let mut config = Settings::default();
        config.database.backend = DatabaseBackend::Memory;
        config.database.url = String::new();

        assert!(ServeCommandHandler::new(config).validate_only().is_ok());
    }
}
