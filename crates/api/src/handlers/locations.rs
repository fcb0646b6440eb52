//! Handlers for the `/locations` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use inventra_core::types::DbId;
use inventra_db::models::asset::LocationAssetsResponse;
use inventra_db::models::location::{LocationInput, LocationListResponse, LocationResponse};

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::services::LocationService;
use crate::state::AppState;

/// GET /api/v1/locations
pub async fn list(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<DataResponse<LocationListResponse>>> {
    let data = LocationService::from_state(&state).list(auth.user_id).await?;
    Ok(Json(DataResponse { data }))
}

/// GET /api/v1/locations/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<LocationResponse>>> {
    let data = LocationService::from_state(&state)
        .get_by_id(auth.user_id, id)
        .await?;
    Ok(Json(DataResponse { data }))
}

/// POST /api/v1/locations
pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(input): Json<LocationInput>,
) -> AppResult<(StatusCode, Json<LocationResponse>)> {
    let location = LocationService::from_state(&state)
        .create(auth.user_id, &input)
        .await?;
    Ok((StatusCode::CREATED, Json(location)))
}

/// PUT /api/v1/locations/{id}
pub async fn update(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<LocationInput>,
) -> AppResult<Json<LocationResponse>> {
    let location = LocationService::from_state(&state)
        .update(auth.user_id, id, &input)
        .await?;
    Ok(Json(location))
}

/// DELETE /api/v1/locations/{id}
pub async fn delete(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    LocationService::from_state(&state)
        .delete(auth.user_id, id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/locations/{id}/assets
pub async fn assets(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<LocationAssetsResponse>>> {
    let data = LocationService::from_state(&state)
        .get_assets(auth.user_id, id)
        .await?;
    Ok(Json(DataResponse { data }))
}
