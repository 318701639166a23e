use diesel::prelude::*;

/// Category row as stored in the `category` table.
///
/// Derives `AsChangeset` so a row carrying its id can be written back
/// in place by [`crate::repositories::CategoryStore::update`].
#[derive(Debug, Queryable, Selectable, Identifiable, AsChangeset, Clone, PartialEq, Eq)]
#[diesel(table_name = crate::schema::category)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Category {
    pub id: i64,
    pub category_name: String,
    pub category_description: String,
    pub image_url: String,
}

/// Category data before the store has assigned an id.
#[derive(Debug, Insertable, Clone, PartialEq, Eq)]
#[diesel(table_name = crate::schema::category)]
pub struct NewCategory {
    pub category_name: String,
    pub category_description: String,
    pub image_url: String,
}

impl NewCategory {
    /// Attaches a store-assigned id, producing the persisted shape.
    pub fn with_id(self, id: i64) -> Category {
        Category {
            id,
            category_name: self.category_name,
            category_description: self.category_description,
            image_url: self.image_url,
        }
    }
}

impl From<Category> for NewCategory {
    fn from(category: Category) -> Self {
        Self {
            category_name: category.category_name,
            category_description: category.category_description,
            image_url: category.image_url,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_id_keeps_fields() {
        let new_category = NewCategory {
            category_name: "Soccer".to_string(),
            category_description: "Soccer products".to_string(),
            image_url: "www.test.com".to_string(),
        };

        let category = new_category.clone().with_id(7);
        assert_eq!(category.id, 7);
        assert_eq!(NewCategory::from(category), new_category);
    }
}
