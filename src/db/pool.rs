//! Async database connection pool implementation.
//!
//! Uses the bb8 pool manager with diesel_async for PostgreSQL connections.

use std::time::Duration;

use diesel_async::AsyncPgConnection;
use diesel_async::pooled_connection::AsyncDieselConnectionManager;
use diesel_async::pooled_connection::bb8::Pool;

use crate::config::DatabaseConfig;
use crate::error::AppError;

/// Async connection pool type alias.
///
/// bb8::Pool is reference counted internally, so cloning it is cheap and
/// holders can derive Clone without another Arc.
pub type AsyncDbPool = Pool<AsyncPgConnection>;

/// Builds the connection pool described by `config`.
///
/// Connections are opened lazily up to `min_connections` in the background,
/// so an unreachable server surfaces on first checkout rather than here.
///
/// # Errors
///
/// `AppError::ConnectionPool` if the pool cannot be constructed.
pub async fn establish_async_connection_pool(
    config: &DatabaseConfig,
) -> Result<AsyncDbPool, AppError> {
    let manager = AsyncDieselConnectionManager::<AsyncPgConnection>::new(config.url.as_str());

    Pool::builder()
        .max_size(config.max_connections)
        .min_idle(Some(config.min_connections))
        .connection_timeout(Duration::from_secs(config.connection_timeout))
        .build(manager)
        .await
        .map_err(|e| AppError::ConnectionPool {
            source: anyhow::anyhow!("failed to build connection pool: {}", e),
        })
}
