//! Location operations scoped to the acting user.
//!
//! Same ownership rules as categories, with no hierarchy. Names are
//! title-cased before the uniqueness check.

use inventra_core::asset::ensure_unreferenced;
use inventra_core::cache::{CacheKind, CachedProjection};
use inventra_core::error::CoreError;
use inventra_core::naming::{normalize_location_name, same_name};
use inventra_core::scope::{require_mutable, require_visible};
use inventra_core::types::DbId;
use inventra_db::models::asset::LocationAssetsResponse;
use inventra_db::models::location::{
    Location, LocationInput, LocationListResponse, LocationResponse,
};
use inventra_db::repositories::{AssetRepo, LocationRepo};
use sqlx::PgPool;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

const ENTITY: &str = "Location";

pub struct LocationService {
    pool: PgPool,
    cache: CachedProjection,
}

impl LocationService {
    pub fn new(pool: PgPool, cache: CachedProjection) -> Self {
        Self { pool, cache }
    }

    pub fn from_state(state: &AppState) -> Self {
        Self::new(state.pool.clone(), state.cache.clone())
    }

    /// Every visible location, defaults first. Served from cache when possible.
    pub async fn list(&self, user_id: DbId) -> AppResult<LocationListResponse> {
        if let Some(hit) = self
            .cache
            .get_typed::<LocationListResponse>(user_id, CacheKind::Locations)
            .await
        {
            return Ok(hit);
        }

        let rows = LocationRepo::list_visible(&self.pool, user_id).await?;
        let response = LocationListResponse::from_rows(&rows);

        self.cache.spawn_put(user_id, CacheKind::Locations, &response);
        Ok(response)
    }

    pub async fn get_by_id(&self, user_id: DbId, id: DbId) -> AppResult<LocationResponse> {
        let location = self.find_visible(user_id, id).await?;
        Ok(LocationResponse::from(&location))
    }

    pub async fn create(&self, user_id: DbId, input: &LocationInput) -> AppResult<LocationResponse> {
        input.validate()?;
        let name = normalize_location_name(&input.name)?;

        self.ensure_name_free(user_id, &name, None).await?;

        let location = LocationRepo::create(&self.pool, user_id, &name).await?;
        self.cache.invalidate(user_id, CacheKind::LOCATIONS).await;

        tracing::info!(user_id, location_id = location.id, "Location created");
        Ok(LocationResponse::from(&location))
    }

    pub async fn update(
        &self,
        user_id: DbId,
        id: DbId,
        input: &LocationInput,
    ) -> AppResult<LocationResponse> {
        input.validate()?;

        let current = require_mutable(
            LocationRepo::find_by_id(&self.pool, id).await?,
            ENTITY,
            id,
            user_id,
        )?;

        let name = normalize_location_name(&input.name)?;
        if !same_name(&current.name, &name) {
            self.ensure_name_free(user_id, &name, Some(id)).await?;
        }

        let location = LocationRepo::update(&self.pool, id, &name)
            .await?
            .ok_or(AppError::Core(CoreError::NotFound { entity: ENTITY, id }))?;
        self.cache.invalidate(user_id, CacheKind::LOCATIONS).await;

        tracing::info!(user_id, location_id = id, "Location updated");
        Ok(LocationResponse::from(&location))
    }

    /// Soft-delete a user-owned location none of the user's assets use.
    pub async fn delete(&self, user_id: DbId, id: DbId) -> AppResult<()> {
        require_mutable(
            LocationRepo::find_by_id(&self.pool, id).await?,
            ENTITY,
            id,
            user_id,
        )?;

        let asset_count = AssetRepo::count_by_location(&self.pool, id, user_id).await?;
        ensure_unreferenced(ENTITY, asset_count)?;

        if !LocationRepo::soft_delete(&self.pool, id).await? {
            return Err(AppError::Core(CoreError::NotFound { entity: ENTITY, id }));
        }
        self.cache.invalidate(user_id, CacheKind::LOCATIONS).await;

        tracing::info!(user_id, location_id = id, "Location deleted");
        Ok(())
    }

    pub async fn get_assets(&self, user_id: DbId, id: DbId) -> AppResult<LocationAssetsResponse> {
        let location = self.find_visible(user_id, id).await?;
        let assets = AssetRepo::list_by_location(&self.pool, id, user_id).await?;
        Ok(LocationAssetsResponse {
            location: LocationResponse::from(&location),
            total: assets.len(),
            assets,
        })
    }

    async fn find_visible(&self, user_id: DbId, id: DbId) -> AppResult<Location> {
        let row = LocationRepo::find_by_id(&self.pool, id).await?;
        Ok(require_visible(row, ENTITY, id, user_id)?)
    }

    async fn ensure_name_free(
        &self,
        user_id: DbId,
        name: &str,
        exclude_id: Option<DbId>,
    ) -> AppResult<()> {
        if LocationRepo::name_exists(&self.pool, name, user_id, exclude_id).await? {
            return Err(AppError::Core(CoreError::Conflict(
                "Location name already exists".to_string(),
            )));
        }
        Ok(())
    }
}
