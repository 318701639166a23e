//! Application state for Axum web framework.

use crate::repositories::Repositories;
use crate::services::Services;

/// Shared services and stores handed to every handler.
///
/// Cloning is cheap since everything inside is reference counted.
#[derive(Clone)]
pub struct AppState {
    pub services: Services,
    /// Direct store access for health probes
    pub repos: Repositories,
}

impl AppState {
    pub fn new(repos: Repositories) -> Self {
        Self {
            services: Services::new(repos.clone()),
            repos,
        }
    }

    /// State backed by the in-memory store.
    pub fn in_memory() -> Self {
        Self::new(Repositories::in_memory())
    }
}
