//! Error handler for converting AppError to HTTP responses.
//!
//! Every error leaves the API as an [`ErrorResponse`] JSON body carrying the
//! request id of the request that produced it.

use axum::{
    Json,
    extract::Request,
    http::{StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde_json::json;

use super::current_request_id;
use crate::api::dto::ErrorResponse;
use crate::error::AppError;

impl AppError {
    /// HTTP status for this error.
    ///
    /// A category name conflict is reported as 500, unlike other unique
    /// violations which are 409.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::CategoryNotFound { .. } | AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::CategoryNameAlreadyExists { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Duplicate { .. } => StatusCode::CONFLICT,
            AppError::Validation { .. }
            | AppError::ValidationErrors { .. }
            | AppError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            AppError::ConnectionPool { .. } => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Database { .. }
            | AppError::Configuration { .. }
            | AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Stable machine readable code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::CategoryNotFound { .. } => "CATEGORY_NOT_FOUND",
            AppError::CategoryNameAlreadyExists { .. } => "CATEGORY_ALREADY_EXISTS",
            AppError::NotFound { .. } => "NOT_FOUND",
            AppError::Duplicate { .. } => "DUPLICATE_ENTRY",
            AppError::Validation { .. } | AppError::ValidationErrors { .. } => "VALIDATION_ERROR",
            AppError::BadRequest { .. } => "BAD_REQUEST",
            AppError::Database { .. } => "DATABASE_ERROR",
            AppError::Configuration { .. } => "CONFIGURATION_ERROR",
            AppError::ConnectionPool { .. } => "SERVICE_UNAVAILABLE",
            AppError::Internal { .. } => "INTERNAL_ERROR",
        }
    }

    fn to_error_response(&self) -> ErrorResponse {
        let code = self.error_code();
        match self {
            AppError::CategoryNotFound { name } | AppError::CategoryNameAlreadyExists { name } => {
                ErrorResponse::new(code, &self.to_string()).with_details(json!({ "name": name }))
            }
            AppError::NotFound {
                entity,
                field,
                value,
            } => ErrorResponse::not_found_error(entity, field, value),
            AppError::Duplicate {
                entity,
                field,
                value,
            } => ErrorResponse::duplicate_error(entity, field, value),
            AppError::Validation { field, reason } => ErrorResponse::validation_error(field, reason),
            AppError::ValidationErrors { errors } => {
                ErrorResponse::new(code, "Request validation failed")
                    .with_details(json!({ "errors": errors }))
            }
            AppError::BadRequest { message } => ErrorResponse::new(code, message),
            AppError::Database { operation, .. } => {
                ErrorResponse::new(code, &format!("Database operation failed: {}", operation))
            }
            AppError::Configuration { key, .. } => {
                ErrorResponse::new(code, &format!("Configuration error: {}", key))
            }
            AppError::ConnectionPool { .. } => {
                ErrorResponse::new(code, "Database connection unavailable")
            }
            AppError::Internal { .. } => ErrorResponse::new(code, "An internal error occurred"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // Sources of server-side failures are logged here and never sent
        match &self {
            AppError::Database { source, .. }
            | AppError::Configuration { source, .. }
            | AppError::ConnectionPool { source }
            | AppError::Internal { source } => {
                tracing::error!(error = %self, source = %source, "Request failed");
            }
            _ => tracing::debug!(error = %self, "Request rejected"),
        }

        let body = self
            .to_error_response()
            .with_request_id(current_request_id());
        (status, Json(body)).into_response()
    }
}

/// Rewrites error responses produced outside the handlers (unknown route,
/// wrong method, timeout) into the standard JSON error body.
pub async fn global_error_handler(request: Request, next: Next) -> Response {
    let response = next.run(request).await;
    let status = response.status();

    if !(status.is_client_error() || status.is_server_error()) {
        return response;
    }

    let is_json = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.contains("application/json"));
    if is_json {
        return response;
    }

    let (code, message) = match status {
        StatusCode::NOT_FOUND => ("NOT_FOUND", "The requested resource was not found"),
        StatusCode::METHOD_NOT_ALLOWED => {
            ("METHOD_NOT_ALLOWED", "HTTP method not allowed for this endpoint")
        }
        StatusCode::UNSUPPORTED_MEDIA_TYPE => ("UNSUPPORTED_MEDIA_TYPE", "Unsupported media type"),
        StatusCode::REQUEST_TIMEOUT => ("REQUEST_TIMEOUT", "Request timeout"),
        StatusCode::PAYLOAD_TOO_LARGE => ("PAYLOAD_TOO_LARGE", "Request payload too large"),
        StatusCode::SERVICE_UNAVAILABLE => {
            ("SERVICE_UNAVAILABLE", "Service temporarily unavailable")
        }
        s if s.is_client_error() => ("BAD_REQUEST", "Bad request"),
        _ => ("INTERNAL_ERROR", "An internal error occurred"),
    };

    let body = ErrorResponse::new(code, message).with_request_id(current_request_id());
    (status, Json(body)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationFieldError;

    async fn body_of(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn test_category_error_statuses() {
        let not_found = AppError::CategoryNotFound {
            name: "Soccer".to_string(),
        };
        let exists = AppError::CategoryNameAlreadyExists {
            name: "Soccer".to_string(),
        };
        let duplicate = AppError::Duplicate {
            entity: "category".to_string(),
            field: "image_url".to_string(),
            value: "img/1".to_string(),
        };

        assert_eq!(not_found.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(exists.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(duplicate.status_code(), StatusCode::CONFLICT);
        assert_eq!(exists.error_code(), "CATEGORY_ALREADY_EXISTS");
    }

    #[test]
    fn test_pool_error_is_unavailable() {
        let err = AppError::ConnectionPool {
            source: anyhow::anyhow!("timed out"),
        };
        assert_eq!(err.status_code(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(err.error_code(), "SERVICE_UNAVAILABLE");
    }

    #[tokio::test]
    async fn test_category_not_found_body() {
        let response = AppError::CategoryNotFound {
            name: "Chess".to_string(),
        }
        .into_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = body_of(response).await;
        assert_eq!(body["code"], "CATEGORY_NOT_FOUND");
        assert_eq!(body["message"], "Category with name Chess not found.");
        assert_eq!(body["details"]["name"], "Chess");
        assert!(body.get("request_id").is_none());
    }

    #[tokio::test]
    async fn test_validation_errors_body_lists_fields() {
        let response = AppError::ValidationErrors {
            errors: vec![ValidationFieldError {
                field: "category_name".to_string(),
                message: "Category name must be between 2 and 40 characters".to_string(),
            }],
        }
        .into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_of(response).await;
        assert_eq!(body["code"], "VALIDATION_ERROR");
        assert_eq!(body["details"]["errors"][0]["field"], "category_name");
    }

    #[tokio::test]
    async fn test_internal_error_hides_source() {
        let response = AppError::Internal {
            source: anyhow::anyhow!("secret connection string"),
        }
        .into_response();

        let body = body_of(response).await;
        assert_eq!(body["message"], "An internal error occurred");
        assert!(!body.to_string().contains("secret"));
    }
}
