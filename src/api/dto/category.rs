//! Category request and response DTOs.
//!
//! Wire names are camelCase; conversions to and from the stored shapes are
//! plain field copies.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use crate::models::{Category, NewCategory};

/// Body of the create and update operations.
///
/// An `id` sent by the client is ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
#[schema(example = json!({
    "categoryName": "Soccer",
    "categoryDescription": "Soccer products",
    "imageUrl": "www.test.com/soccer.png"
}))]
pub struct CategoryRequest {
    #[validate(
        length(min = 2, max = 40, message = "Category name must be between 2 and 40 characters"),
        custom(function = "not_blank", message = "Category name is required")
    )]
    #[schema(min_length = 2, max_length = 40)]
    pub category_name: String,

    pub category_description: String,

    #[validate(
        length(max = 255, message = "Image URL must be at most 255 characters"),
        custom(function = "not_blank", message = "Image URL is required")
    )]
    #[schema(max_length = 255)]
    pub image_url: String,
}

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

/// A stored category as returned by create, get and list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategoryResponse {
    #[schema(example = 1)]
    pub id: i64,
    #[schema(example = "Soccer")]
    pub category_name: String,
    #[schema(example = "Soccer products")]
    pub category_description: String,
    #[schema(example = "www.test.com/soccer.png")]
    pub image_url: String,
}

/// Plain confirmation message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    #[schema(example = "Category successfully updated with ID 1")]
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<CategoryRequest> for NewCategory {
    fn from(request: CategoryRequest) -> Self {
        Self {
            category_name: request.category_name,
            category_description: request.category_description,
            image_url: request.image_url,
        }
    }
}

impl From<Category> for CategoryResponse {
    fn from(category: Category) -> Self {
        Self {
            id: category.id,
            category_name: category.category_name,
            category_description: category.category_description,
            image_url: category.image_url,
        }
    }
}

impl From<CategoryResponse> for CategoryRequest {
    fn from(response: CategoryResponse) -> Self {
        Self {
            category_name: response.category_name,
            category_description: response.category_description,
            image_url: response.image_url,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn valid_request() -> CategoryRequest {
        CategoryRequest {
            category_name: "Soccer".to_string(),
            category_description: "Soccer products".to_string(),
            image_url: "www.test.com".to_string(),
        }
    }

    #[test]
    fn test_deserialize_camel_case_and_ignore_id() {
        let json = r#"{
            "id": 99,
            "categoryName": "Soccer",
            "categoryDescription": "Soccer products",
            "imageUrl": "www.test.com"
        }"#;

        let request: CategoryRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request, valid_request());
    }

    #[test]
    fn test_missing_description_is_rejected() {
        let json = r#"{"categoryName": "Soccer", "imageUrl": "www.test.com"}"#;
        assert!(serde_json::from_str::<CategoryRequest>(json).is_err());
    }

    #[test]
    fn test_response_serializes_camel_case() {
        let response = CategoryResponse::from(NewCategory::from(valid_request()).with_id(3));
        let value = serde_json::to_value(&response).unwrap();

        assert_eq!(value["id"], 3);
        assert_eq!(value["categoryName"], "Soccer");
        assert_eq!(value["categoryDescription"], "Soccer products");
        assert_eq!(value["imageUrl"], "www.test.com");
    }

    #[test]
    fn test_valid_request_passes() {
        assert!(valid_request().validate().is_ok());
    }

    #[test]
    fn test_blank_name_and_image_url_fail() {
        let request = CategoryRequest {
            category_name: "   ".to_string(),
            image_url: " ".to_string(),
            ..valid_request()
        };

        let errors = request.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("category_name"));
        assert!(fields.contains_key("image_url"));
    }

    #[test]
    fn test_image_url_fits_column_width() {
        let request = CategoryRequest {
            image_url: "a".repeat(255),
            ..valid_request()
        };
        assert!(request.validate().is_ok());

        let request = CategoryRequest {
            image_url: "a".repeat(256),
            ..valid_request()
        };
        let errors = request.validate().unwrap_err();
        let image_errors = errors.field_errors()["image_url"];
        assert_eq!(
            image_errors[0].message.as_deref(),
            Some("Image URL must be at most 255 characters")
        );
    }

    #[test]
    fn test_empty_description_is_allowed() {
        let request = CategoryRequest {
            category_description: String::new(),
            ..valid_request()
        };
        assert!(request.validate().is_ok());
    }

    proptest! {
        #[test]
        fn prop_name_length_bounds(name in "[a-z]{0,60}") {
            let request = CategoryRequest {
                category_name: name.clone(),
                ..valid_request()
            };
            let in_range = (2..=40).contains(&name.chars().count());
            prop_assert_eq!(request.validate().is_ok(), in_range);
        }

        #[test]
        fn prop_transform_is_lossless(
            name in "\\PC{2,40}",
            description in "\\PC{0,100}",
            image_url in "\\PC{1,100}",
            id in 1i64..i64::MAX,
        ) {
            let request = CategoryRequest {
                category_name: name,
                category_description: description,
                image_url,
            };
            let stored = NewCategory::from(request);
            let response = CategoryResponse::from(stored.clone().with_id(id));

            prop_assert_eq!(response.id, id);
            prop_assert_eq!(NewCategory::from(CategoryRequest::from(response)), stored);
        }
    }
}
