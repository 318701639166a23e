//! Repository layer for data access operations.
//!
//! Category persistence sits behind the [`CategoryStore`] trait so the
//! service layer runs unchanged against PostgreSQL or the in-memory store.

mod category_repo;
mod memory;

pub use category_repo::CategoryRepository;
pub use memory::InMemoryCategoryStore;

use std::sync::Arc;

use async_trait::async_trait;

use crate::db::AsyncDbPool;
use crate::error::AppResult;
use crate::models::{Category, NewCategory};

/// Persistence operations for categories.
///
/// Implementations enforce uniqueness of `category_name` and `image_url`
/// themselves and report violations as `AppError::Duplicate` with the
/// offending column in `field`.
#[async_trait]
pub trait CategoryStore: Send + Sync {
    /// Finds a category by its exact name.
    async fn find_by_name(&self, name: &str) -> AppResult<Option<Category>>;

    /// All categories ordered by id.
    async fn find_all(&self) -> AppResult<Vec<Category>>;

    /// Inserts a new row and returns it with its generated id.
    async fn insert(&self, new_category: NewCategory) -> AppResult<Category>;

    /// Overwrites the row with `category.id`.
    ///
    /// Fails with `AppError::NotFound` when no row has that id.
    async fn update(&self, category: Category) -> AppResult<Category>;

    /// Inserts when `id` is `None`, otherwise updates the row with that id.
    async fn save(&self, category: NewCategory, id: Option<i64>) -> AppResult<Category> {
        match id {
            Some(id) => self.update(category.with_id(id)).await,
            None => self.insert(category).await,
        }
    }

    /// Verifies the store is reachable.
    async fn health_check(&self) -> AppResult<()>;

    /// Short backend name for logs and health reports.
    fn backend(&self) -> &'static str;
}

/// Aggregates all repositories for convenient access.
///
/// Cloning is cheap: every store is shared behind an `Arc`.
#[derive(Clone)]
pub struct Repositories {
    pub categories: Arc<dyn CategoryStore>,
}

impl Repositories {
    /// Repositories backed by PostgreSQL.
    pub fn new(pool: AsyncDbPool) -> Self {
        Self::with_store(Arc::new(CategoryRepository::new(pool)))
    }

    /// Repositories backed by process-local memory.
    pub fn in_memory() -> Self {
        Self::with_store(Arc::new(InMemoryCategoryStore::new()))
    }

    pub fn with_store(categories: Arc<dyn CategoryStore>) -> Self {
        Self { categories }
    }
}
