//! HTTP request handlers for API endpoints.

pub mod categories;
pub mod health;
