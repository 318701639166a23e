//! Category business logic.
//!
//! Name uniqueness is checked here for early failure, but the store's own
//! constraints stay authoritative: a store rejection on the name column is
//! reported the same way as the service-level check.

use std::sync::Arc;

use crate::api::dto::{CategoryRequest, CategoryResponse, MessageResponse};
use crate::error::{AppError, AppResult};
use crate::models::NewCategory;
use crate::repositories::CategoryStore;

const NAME_COLUMN: &str = "category_name";

/// Service for category operations, holding the store it delegates to.
#[derive(Clone)]
pub struct CategoryService {
    store: Arc<dyn CategoryStore>,
}

impl CategoryService {
    pub fn new(store: Arc<dyn CategoryStore>) -> Self {
        Self { store }
    }

    /// Creates a category with a name not yet in use.
    ///
    /// # Errors
    /// - `CategoryNameAlreadyExists` if the name is taken
    /// - `Duplicate` if another category already uses the image URL
    pub async fn create(&self, request: CategoryRequest) -> AppResult<CategoryResponse> {
        let name = request.category_name.clone();

        if self.store.find_by_name(&name).await?.is_some() {
            tracing::warn!(category_name = %name, "Rejected category with existing name");
            return Err(AppError::CategoryNameAlreadyExists { name });
        }

        let saved = self
            .store
            .save(NewCategory::from(request), None)
            .await
            .map_err(|e| name_conflict(e, &name))?;

        tracing::info!(
            category_id = saved.id,
            category_name = %saved.category_name,
            "Category created"
        );
        Ok(CategoryResponse::from(saved))
    }

    /// All categories ordered by id.
    pub async fn list_all(&self) -> AppResult<Vec<CategoryResponse>> {
        let categories = self.store.find_all().await?;
        tracing::debug!(count = categories.len(), "Listed categories");
        Ok(categories.into_iter().map(CategoryResponse::from).collect())
    }

    /// # Errors
    /// `CategoryNotFound` carrying `name` when absent.
    pub async fn get_by_name(&self, name: &str) -> AppResult<CategoryResponse> {
        self.store
            .find_by_name(name)
            .await?
            .map(CategoryResponse::from)
            .ok_or_else(|| AppError::CategoryNotFound {
                name: name.to_string(),
            })
    }

    /// Overwrites the category currently named `current_name`, keeping its id.
    ///
    /// Renaming to the category's own name is allowed; renaming to the name
    /// of a different category is not.
    ///
    /// # Errors
    /// - `CategoryNotFound` carrying `current_name` when absent
    /// - `CategoryNameAlreadyExists` when another category holds the new name
    pub async fn update(
        &self,
        current_name: &str,
        request: CategoryRequest,
    ) -> AppResult<MessageResponse> {
        let existing = self.store.find_by_name(current_name).await?.ok_or_else(|| {
            AppError::CategoryNotFound {
                name: current_name.to_string(),
            }
        })?;

        let new_name = request.category_name.clone();
        if let Some(holder) = self.store.find_by_name(&new_name).await?
            && holder.id != existing.id
        {
            tracing::warn!(
                category_id = existing.id,
                category_name = %new_name,
                "Rejected rename to a name held by another category"
            );
            return Err(AppError::CategoryNameAlreadyExists { name: new_name });
        }

        let saved = self
            .store
            .save(NewCategory::from(request), Some(existing.id))
            .await
            .map_err(|e| name_conflict(e, &new_name))?;

        tracing::info!(
            category_id = saved.id,
            previous_name = %current_name,
            category_name = %saved.category_name,
            "Category updated"
        );
        Ok(MessageResponse::new(format!(
            "Category successfully updated with ID {}",
            saved.id
        )))
    }
}

/// Reports a store-level name uniqueness rejection as a name conflict.
fn name_conflict(error: AppError, name: &str) -> AppError {
    match error {
        AppError::Duplicate { ref field, .. } if field == NAME_COLUMN => {
            AppError::CategoryNameAlreadyExists {
                name: name.to_string(),
            }
        }
        other => other,
    }
}
