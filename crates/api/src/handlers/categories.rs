//! Handlers for the `/categories` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use inventra_core::types::DbId;
use inventra_db::models::asset::CategoryAssetsResponse;
use inventra_db::models::category::{
    CategoryFlatResponse, CategoryResponse, CategoryTreeResponse, CreateCategory, UpdateCategory,
};

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::services::CategoryService;
use crate::state::AppState;

/// GET /api/v1/categories/tree
pub async fn tree(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<DataResponse<CategoryTreeResponse>>> {
    let data = CategoryService::from_state(&state).get_tree(auth.user_id).await?;
    Ok(Json(DataResponse { data }))
}

/// GET /api/v1/categories/flat
pub async fn flat(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<DataResponse<CategoryFlatResponse>>> {
    let data = CategoryService::from_state(&state).get_flat(auth.user_id).await?;
    Ok(Json(DataResponse { data }))
}

/// GET /api/v1/categories/parents
pub async fn parents(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<DataResponse<CategoryTreeResponse>>> {
    let data = CategoryService::from_state(&state)
        .get_parents(auth.user_id)
        .await?;
    Ok(Json(DataResponse { data }))
}

/// GET /api/v1/categories/{id}/children
pub async fn children(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<CategoryTreeResponse>>> {
    let data = CategoryService::from_state(&state)
        .get_children(auth.user_id, id)
        .await?;
    Ok(Json(DataResponse { data }))
}

/// GET /api/v1/categories/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<CategoryResponse>>> {
    let data = CategoryService::from_state(&state)
        .get_by_id(auth.user_id, id)
        .await?;
    Ok(Json(DataResponse { data }))
}

/// POST /api/v1/categories
pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(input): Json<CreateCategory>,
) -> AppResult<(StatusCode, Json<CategoryResponse>)> {
    let category = CategoryService::from_state(&state)
        .create(auth.user_id, &input)
        .await?;
    Ok((StatusCode::CREATED, Json(category)))
}

/// PUT /api/v1/categories/{id}
pub async fn update(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateCategory>,
) -> AppResult<Json<CategoryResponse>> {
    let category = CategoryService::from_state(&state)
        .update(auth.user_id, id, &input)
        .await?;
    Ok(Json(category))
}

/// DELETE /api/v1/categories/{id}
pub async fn delete(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    CategoryService::from_state(&state)
        .delete(auth.user_id, id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/categories/{id}/assets
pub async fn assets(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<CategoryAssetsResponse>>> {
    let data = CategoryService::from_state(&state)
        .get_assets(auth.user_id, id)
        .await?;
    Ok(Json(DataResponse { data }))
}
