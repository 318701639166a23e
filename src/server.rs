//! HTTP server lifecycle: store selection, startup and graceful shutdown.

use anyhow::Context;
use tokio::net::TcpListener;
use tokio::signal;

use crate::api::routes::create_router;
use crate::config::{ConfigLoader, DatabaseBackend, Settings};
use crate::db::{establish_async_connection_pool, run_pending_migrations};
use crate::logger::LogLevelHandle;
use crate::repositories::Repositories;
use crate::state::AppState;

pub struct Server {
    settings: Settings,
    log_handle: Option<LogLevelHandle>,
    config_source: Option<ConfigLoader>,
}

impl Server {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            log_handle: None,
            config_source: None,
        }
    }

    /// Attach the handle of the installed logger so its active filter is
    /// reported at startup.
    pub fn with_log_handle(mut self, handle: LogLevelHandle) -> Self {
        self.log_handle = Some(handle);
        self
    }

    /// Configuration sources re-read on SIGHUP. Together with a log handle
    /// this lets `logger.level` change without a restart.
    pub fn with_config_source(mut self, loader: ConfigLoader) -> Self {
        self.config_source = Some(loader);
        self
    }

    /// Start the server and run until a shutdown signal arrives.
    ///
    /// # Errors
    /// - connection pool or migration failures for the postgres backend
    /// - the address cannot be bound
    pub async fn run(self) -> anyhow::Result<()> {
        let settings = &self.settings;

        tracing::info!(
            app_name = %settings.application.name,
            app_version = %settings.application.version,
            "Application starting"
        );
        tracing::info!(
            host = %settings.server.host,
            port = settings.server.port,
            request_timeout = settings.server.request_timeout,
            "Server configuration loaded"
        );
        if let Some(filter) = self.log_handle.as_ref().and_then(|h| h.current_level()) {
            tracing::info!(
                filter = %filter,
                console_enabled = settings.logger.console.enabled,
                file_enabled = settings.logger.file.enabled,
                "Logger active"
            );
        }

        #[cfg(unix)]
        if let (Some(handle), Some(loader)) = (&self.log_handle, &self.config_source) {
            tokio::spawn(watch_reload_signal(handle.clone(), loader.clone()));
        }

        let repos = self.build_repositories().await?;
        tracing::info!(backend = repos.categories.backend(), "Category store ready");

        let router = create_router(AppState::new(repos), &settings.server);

        let address = settings.server.address();
        let listener = TcpListener::bind(&address).await.map_err(|e| {
            tracing::error!(error = %e, address = %address, "Failed to bind to address");
            anyhow::anyhow!("Failed to bind to {}: {}", address, e)
        })?;
        tracing::info!(address = %address, "Server listening");

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");
        Ok(())
    }

    async fn build_repositories(&self) -> anyhow::Result<Repositories> {
        let database = &self.settings.database;

        match database.backend {
            DatabaseBackend::Memory => {
                tracing::warn!("Using the in-memory category store; data is lost on shutdown");
                Ok(Repositories::in_memory())
            }
            DatabaseBackend::Postgres => {
                if database.auto_migrate {
                    let applied = run_pending_migrations(&database.url).await?;
                    tracing::info!(count = applied.len(), migrations = ?applied, "Migrations applied");
                }

                tracing::info!(
                    max_connections = database.max_connections,
                    min_connections = database.min_connections,
                    connection_timeout = database.connection_timeout,
                    "Initializing database connection pool"
                );
                let pool = establish_async_connection_pool(database).await?;
                Ok(Repositories::new(pool))
            }
        }
    }
}

/// Re-reads the configuration and applies its `logger.level`. On failure the
/// active filter is left as it was.
pub fn reload_log_level(handle: &LogLevelHandle, loader: &ConfigLoader) -> anyhow::Result<String> {
    let settings = loader.load().context("Failed to reload configuration")?;
    handle
        .set_level(&settings.logger.level)
        .context("Failed to apply log level")?;
    Ok(settings.logger.level)
}

#[cfg(unix)]
async fn watch_reload_signal(handle: LogLevelHandle, loader: ConfigLoader) {
    let mut hangup = match signal::unix::signal(signal::unix::SignalKind::hangup()) {
        Ok(hangup) => hangup,
        Err(e) => {
            tracing::error!(error = %e, "Failed to install SIGHUP handler, log level reload disabled");
            return;
        }
    };

    while hangup.recv().await.is_some() {
        match reload_log_level(&handle, &loader) {
            Ok(level) => tracing::info!(level = %level, "Log level reloaded"),
            Err(e) => tracing::warn!(error = %format!("{:#}", e), "Log level reload failed"),
        }
    }
}

/// Resolves on Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received Ctrl+C, initiating graceful shutdown"),
        _ = terminate => tracing::info!("Received SIGTERM, initiating graceful shutdown"),
    }
}
