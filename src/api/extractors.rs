//! Request extractors that validate their payload.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, Request};
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::error::{AppError, AppResult};

/// JSON body that has passed `validator` checks.
///
/// Malformed JSON becomes `AppError::BadRequest`, failed rules become
/// `AppError::ValidationErrors`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> AppResult<Self> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        value.validate()?;
        Ok(ValidatedJson(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::dto::CategoryRequest;
    use axum::body::Body;
    use axum::http::{Method, header};

    fn json_request(body: &str) -> Request {
        Request::builder()
            .method(Method::POST)
            .uri("/category/create")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_valid_body() {
        let request = json_request(
            r#"{"categoryName":"Soccer","categoryDescription":"Balls","imageUrl":"img/1"}"#,
        );

        let ValidatedJson(body) = ValidatedJson::<CategoryRequest>::from_request(request, &())
            .await
            .unwrap();
        assert_eq!(body.category_name, "Soccer");
    }

    #[tokio::test]
    async fn test_short_name_is_validation_error() {
        let request = json_request(
            r#"{"categoryName":"S","categoryDescription":"Balls","imageUrl":"img/1"}"#,
        );

        let error = ValidatedJson::<CategoryRequest>::from_request(request, &())
            .await
            .unwrap_err();
        match error {
            AppError::ValidationErrors { errors } => {
                assert_eq!(errors.len(), 1);
                assert_eq!(errors[0].field, "category_name");
                assert!(errors[0].message.contains("between 2 and 40"));
            }
            other => panic!("Expected ValidationErrors, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_every_failing_field_is_reported() {
        let request = json_request(&format!(
            r#"{{"categoryName":"{}","categoryDescription":"","imageUrl":"  "}}"#,
            "x".repeat(41)
        ));

        let error = ValidatedJson::<CategoryRequest>::from_request(request, &())
            .await
            .unwrap_err();
        match error {
            AppError::ValidationErrors { errors } => {
                let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
                assert_eq!(fields, vec!["category_name", "image_url"]);
            }
            other => panic!("Expected ValidationErrors, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_missing_field_is_bad_request() {
        let request = json_request(r#"{"categoryName":"Soccer"}"#);

        let error = ValidatedJson::<CategoryRequest>::from_request(request, &())
            .await
            .unwrap_err();
        assert!(matches!(error, AppError::BadRequest { .. }));
    }

    #[tokio::test]
    async fn test_wrong_content_type_is_bad_request() {
        let request = Request::builder()
            .method(Method::POST)
            .uri("/category/create")
            .header(header::CONTENT_TYPE, "text/plain")
            .body(Body::from("categoryName=Soccer"))
            .unwrap();

        let error = ValidatedJson::<CategoryRequest>::from_request(request, &())
            .await
            .unwrap_err();
        assert!(matches!(error, AppError::BadRequest { .. }));
    }
}
