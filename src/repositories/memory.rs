//! Process-local category store.
//!
//! Mirrors the unique constraints of the `category` table so the rest of
//! the application behaves the same without a database. Column widths are
//! enforced earlier, by `CategoryRequest` validation.

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::{AppError, AppResult};
use crate::models::{Category, NewCategory};
use crate::repositories::CategoryStore;

const ENTITY: &str = "category";

#[derive(Default)]
struct Table {
    rows: BTreeMap<i64, Category>,
    last_id: i64,
}

impl Table {
    /// Rejects `candidate` if another row already holds its name or image URL.
    fn check_unique(&self, candidate: &Category) -> AppResult<()> {
        for row in self.rows.values().filter(|row| row.id != candidate.id) {
            if row.category_name == candidate.category_name {
                return Err(duplicate("category_name", &candidate.category_name));
            }
            if row.image_url == candidate.image_url {
                return Err(duplicate("image_url", &candidate.image_url));
            }
        }
        Ok(())
    }
}

fn duplicate(field: &str, value: &str) -> AppError {
    AppError::Duplicate {
        entity: ENTITY.to_string(),
        field: field.to_string(),
        value: value.to_string(),
    }
}

/// Category store kept in a `BTreeMap` keyed by id.
///
/// Ids start at 1 and are never reused. Uniqueness is checked under the
/// write lock, so concurrent writers cannot both claim a name.
#[derive(Default)]
pub struct InMemoryCategoryStore {
    table: RwLock<Table>,
}

impl InMemoryCategoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CategoryStore for InMemoryCategoryStore {
    async fn find_by_name(&self, name: &str) -> AppResult<Option<Category>> {
        let table = self.table.read().await;
        Ok(table
            .rows
            .values()
            .find(|row| row.category_name == name)
            .cloned())
    }

    async fn find_all(&self) -> AppResult<Vec<Category>> {
        let table = self.table.read().await;
        Ok(table.rows.values().cloned().collect())
    }

    async fn insert(&self, new_category: NewCategory) -> AppResult<Category> {
        let mut table = self.table.write().await;

        let row = new_category.with_id(table.last_id + 1);
        table.check_unique(&row)?;

        table.last_id = row.id;
        table.rows.insert(row.id, row.clone());
        Ok(row)
    }

    async fn update(&self, category: Category) -> AppResult<Category> {
        let mut table = self.table.write().await;

        if !table.rows.contains_key(&category.id) {
            return Err(AppError::NotFound {
                entity: ENTITY.to_string(),
                field: "id".to_string(),
                value: category.id.to_string(),
            });
        }
        table.check_unique(&category)?;

        table.rows.insert(category.id, category.clone());
        Ok(category)
    }

    async fn health_check(&self) -> AppResult<()> {
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn new_category(name: &str, image_url: &str) -> NewCategory {
        NewCategory {
            category_name: name.to_string(),
            category_description: format!("{} products", name),
            image_url: image_url.to_string(),
        }
    }

    #[tokio::test]
    async fn test_insert_assigns_increasing_ids() {
        let store = InMemoryCategoryStore::new();

        let first = store.insert(new_category("Soccer", "img/1")).await.unwrap();
        let second = store.insert(new_category("Tennis", "img/2")).await.unwrap();

        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
        assert_eq!(store.find_all().await.unwrap(), vec![first, second]);
    }

    #[tokio::test]
    async fn test_insert_rejects_duplicate_name() {
        let store = InMemoryCategoryStore::new();
        store.insert(new_category("Soccer", "img/1")).await.unwrap();

        let err = store.insert(new_category("Soccer", "img/2")).await.unwrap_err();

        match err {
            AppError::Duplicate { field, value, .. } => {
                assert_eq!(field, "category_name");
                assert_eq!(value, "Soccer");
            }
            other => panic!("unexpected error: {:?}", other),
        }
        assert_eq!(store.find_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_insert_rejects_duplicate_image_url() {
        let store = InMemoryCategoryStore::new();
        store.insert(new_category("Soccer", "img/1")).await.unwrap();

        let err = store.insert(new_category("Tennis", "img/1")).await.unwrap_err();
        assert!(matches!(err, AppError::Duplicate { ref field, .. } if field == "image_url"));
    }

    #[tokio::test]
    async fn test_update_keeps_id_and_allows_same_name() {
        let store = InMemoryCategoryStore::new();
        let soccer = store.insert(new_category("Soccer", "img/1")).await.unwrap();

        let updated = store
            .save(new_category("Soccer", "img/updated"), Some(soccer.id))
            .await
            .unwrap();

        assert_eq!(updated.id, soccer.id);
        assert_eq!(updated.image_url, "img/updated");
        assert_eq!(
            store.find_by_name("Soccer").await.unwrap(),
            Some(updated)
        );
    }

    #[tokio::test]
    async fn test_update_missing_row() {
        let store = InMemoryCategoryStore::new();
        let err = store
            .update(new_category("Soccer", "img/1").with_id(42))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_update_rejects_name_of_other_row() {
        let store = InMemoryCategoryStore::new();
        store.insert(new_category("Soccer", "img/1")).await.unwrap();
        let tennis = store.insert(new_category("Tennis", "img/2")).await.unwrap();

        let err = store
            .update(new_category("Soccer", "img/2").with_id(tennis.id))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Duplicate { .. }));
    }

    #[tokio::test]
    async fn test_concurrent_inserts_of_same_name() {
        let store = Arc::new(InMemoryCategoryStore::new());

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let store = store.clone();
                tokio::spawn(async move {
                    store
                        .insert(new_category("Soccer", &format!("img/{}", i)))
                        .await
                })
            })
            .collect();

        let mut succeeded = 0;
        for handle in handles {
            if handle.await.unwrap().is_ok() {
                succeeded += 1;
            }
        }

        assert_eq!(succeeded, 1);
        assert_eq!(store.find_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_health_and_backend() {
        let store = InMemoryCategoryStore::new();
        assert!(store.health_check().await.is_ok());
        assert_eq!(store.backend(), "memory");
    }
}
