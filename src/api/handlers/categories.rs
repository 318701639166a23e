//! Category request handlers.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::api::doc::CATEGORY_TAG;
use crate::api::dto::{CategoryRequest, CategoryResponse, ErrorResponse, MessageResponse};
use crate::api::extractors::ValidatedJson;
use crate::error::AppResult;
use crate::state::AppState;

/// Creates category routes.
///
/// Paths are absolute so `/category` and `/category/{name}` can coexist
/// without a trailing-slash route.
pub fn category_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(list_categories))
        .routes(routes!(create_category))
        .routes(routes!(get_category))
        .routes(routes!(update_category))
}

/// Create a new category
#[utoipa::path(
    post,
    path = "/category/create",
    tag = CATEGORY_TAG,
    request_body = CategoryRequest,
    responses(
        (status = 201, description = "Category created", body = CategoryResponse),
        (status = 400, description = "Invalid request body", body = ErrorResponse),
        (status = 500, description = "Category name already exists", body = ErrorResponse)
    )
)]
async fn create_category(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<CategoryRequest>,
) -> AppResult<(StatusCode, Json<CategoryResponse>)> {
    let created = state.services.categories.create(request).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// List every category
#[utoipa::path(
    get,
    path = "/category",
    tag = CATEGORY_TAG,
    responses(
        (status = 200, description = "All categories ordered by id", body = Vec<CategoryResponse>)
    )
)]
async fn list_categories(State(state): State<AppState>) -> AppResult<Json<Vec<CategoryResponse>>> {
    Ok(Json(state.services.categories.list_all().await?))
}

/// Find a category by name
#[utoipa::path(
    get,
    path = "/category/{name}",
    tag = CATEGORY_TAG,
    params(
        ("name" = String, Path, description = "Category name")
    ),
    responses(
        (status = 200, description = "Category found", body = CategoryResponse),
        (status = 404, description = "Category not found", body = ErrorResponse)
    )
)]
async fn get_category(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> AppResult<Json<CategoryResponse>> {
    Ok(Json(state.services.categories.get_by_name(&name).await?))
}

/// Update the category currently named `name`
#[utoipa::path(
    post,
    path = "/category/{name}/update",
    tag = CATEGORY_TAG,
    params(
        ("name" = String, Path, description = "Current category name")
    ),
    request_body = CategoryRequest,
    responses(
        (status = 200, description = "Category updated", body = MessageResponse),
        (status = 400, description = "Invalid request body", body = ErrorResponse),
        (status = 404, description = "Category not found", body = ErrorResponse),
        (status = 500, description = "New name belongs to another category", body = ErrorResponse)
    )
)]
async fn update_category(
    State(state): State<AppState>,
    Path(name): Path<String>,
    ValidatedJson(request): ValidatedJson<CategoryRequest>,
) -> AppResult<Json<MessageResponse>> {
    Ok(Json(state.services.categories.update(&name, request).await?))
}
