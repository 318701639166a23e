//! Service layer for business logic operations.
//!
//! Services encapsulate business logic and coordinate between
//! repositories and handlers.

mod category_service;

pub use category_service::CategoryService;

use crate::repositories::Repositories;

/// Aggregates all services for convenient access.
///
/// Cloning is cheap since stores are shared behind `Arc`.
#[derive(Clone)]
pub struct Services {
    pub categories: CategoryService,
}

impl Services {
    /// Creates a new Services instance from Repositories.
    pub fn new(repos: Repositories) -> Self {
        Self {
            categories: CategoryService::new(repos.categories),
        }
    }
}
