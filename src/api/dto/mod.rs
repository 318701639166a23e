//! Data Transfer Objects for API requests and responses.
//!
//! DTOs are organized by domain:
//! - `category` - Category request/response DTOs
//! - `error` - Common error response DTOs
//! - `health` - Health check DTOs

mod category;
mod error;
mod health;

pub use category::{CategoryRequest, CategoryResponse, MessageResponse};
pub use error::ErrorResponse;
pub use health::{ComponentHealth, HealthResponse, HealthStatus};
