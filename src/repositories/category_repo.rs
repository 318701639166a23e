//! Category repository for async database operations.
//!
//! Provides CRUD operations for the category table using diesel_async.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::db::AsyncDbPool;
use crate::error::{AppError, AppResult};
use crate::models::{Category, NewCategory};
use crate::repositories::CategoryStore;

/// PostgreSQL category store holding an async connection pool.
///
/// `AsyncDbPool` is reference counted internally, so cloning is cheap.
#[derive(Clone)]
pub struct CategoryRepository {
    pool: AsyncDbPool,
}

impl CategoryRepository {
    pub fn new(pool: AsyncDbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CategoryStore for CategoryRepository {
    async fn find_by_name(&self, name: &str) -> AppResult<Option<Category>> {
        use crate::schema::category::dsl::*;
        let mut conn = self.pool.get().await?;

        category
            .filter(category_name.eq(name))
            .select(Category::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(AppError::from)
    }

    async fn find_all(&self) -> AppResult<Vec<Category>> {
        use crate::schema::category::dsl::*;
        let mut conn = self.pool.get().await?;

        category
            .order(id.asc())
            .select(Category::as_select())
            .load(&mut conn)
            .await
            .map_err(AppError::from)
    }

    async fn insert(&self, new_category: NewCategory) -> AppResult<Category> {
        use crate::schema::category::dsl::*;
        let mut conn = self.pool.get().await?;

        diesel::insert_into(category)
            .values(&new_category)
            .returning(Category::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(AppError::from)
    }

    async fn update(&self, changes: Category) -> AppResult<Category> {
        use crate::schema::category::dsl::*;
        let mut conn = self.pool.get().await?;

        diesel::update(category.find(changes.id))
            .set(&changes)
            .returning(Category::as_returning())
            .get_result(&mut conn)
            .await
            .optional()?
            .ok_or_else(|| AppError::NotFound {
                entity: "category".to_string(),
                field: "id".to_string(),
                value: changes.id.to_string(),
            })
    }

    async fn health_check(&self) -> AppResult<()> {
        let mut conn = self.pool.get().await?;

        diesel::sql_query("SELECT 1")
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(AppError::from)
    }

    fn backend(&self) -> &'static str {
        "postgres"
    }
}
