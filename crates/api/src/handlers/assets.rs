//! Handlers for the `/assets` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use inventra_core::types::DbId;
use inventra_db::models::asset::{
    Asset, AssetListResponse, CreateAsset, UpdateAsset, ValidateReferences,
};
use serde::Serialize;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::query::AssetListParams;
use crate::response::DataResponse;
use crate::services::AssetService;
use crate::state::AppState;

/// Body returned by `POST /assets/validate-references` when both ids resolve.
#[derive(Debug, Serialize)]
pub struct ReferencesValid {
    pub valid: bool,
}

/// GET /api/v1/assets
pub async fn list(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<AssetListParams>,
) -> AppResult<Json<DataResponse<AssetListResponse>>> {
    let data = AssetService::from_state(&state)
        .list(auth.user_id, &params)
        .await?;
    Ok(Json(DataResponse { data }))
}

/// GET /api/v1/assets/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Asset>>> {
    let data = AssetService::from_state(&state)
        .get_by_id(auth.user_id, id)
        .await?;
    Ok(Json(DataResponse { data }))
}

/// POST /api/v1/assets
pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(input): Json<CreateAsset>,
) -> AppResult<(StatusCode, Json<Asset>)> {
    let asset = AssetService::from_state(&state)
        .create(auth.user_id, &input)
        .await?;
    Ok((StatusCode::CREATED, Json(asset)))
}

/// PUT /api/v1/assets/{id}
pub async fn update(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateAsset>,
) -> AppResult<Json<Asset>> {
    let asset = AssetService::from_state(&state)
        .update(auth.user_id, id, &input)
        .await?;
    Ok(Json(asset))
}

/// DELETE /api/v1/assets/{id}
pub async fn delete(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    AssetService::from_state(&state)
        .delete(auth.user_id, id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/assets/validate-references
pub async fn validate_references(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(input): Json<ValidateReferences>,
) -> AppResult<Json<DataResponse<ReferencesValid>>> {
    AssetService::from_state(&state)
        .validate_references(auth.user_id, input.category_id, input.location_id)
        .await?;
    Ok(Json(DataResponse {
        data: ReferencesValid { valid: true },
    }))
}
