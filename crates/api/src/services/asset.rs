//! Asset operations and the category/location linkage checks.

use std::sync::Arc;

use inventra_core::asset::{
    changed_reference, order_by_clause, validate_price, validate_price_range, AssetCondition,
    PageRequest, Pagination,
};
use inventra_core::error::CoreError;
use inventra_core::image::{spawn_cleanup, ImageStore};
use inventra_core::scope::require_visible;
use inventra_core::types::DbId;
use inventra_db::models::asset::{Asset, AssetFilter, AssetListResponse, CreateAsset, UpdateAsset};
use inventra_db::repositories::{AssetRepo, CategoryRepo, LocationRepo};
use sqlx::PgPool;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::query::AssetListParams;
use crate::state::AppState;

const ENTITY: &str = "Asset";

pub struct AssetService {
    pool: PgPool,
    images: Arc<dyn ImageStore>,
}

impl AssetService {
    pub fn new(pool: PgPool, images: Arc<dyn ImageStore>) -> Self {
        Self { pool, images }
    }

    pub fn from_state(state: &AppState) -> Self {
        Self::new(state.pool.clone(), Arc::clone(&state.images))
    }

    /// Filtered, sorted, paginated listing of the user's assets.
    pub async fn list(&self, user_id: DbId, params: &AssetListParams) -> AppResult<AssetListResponse> {
        validate_price_range(params.min_price, params.max_price)?;

        let condition = params
            .condition
            .as_deref()
            .filter(|c| !c.trim().is_empty())
            .map(AssetCondition::parse)
            .transpose()?;

        let filter = AssetFilter {
            search: params.search.clone(),
            category_id: params.category_id,
            location_id: params.location_id,
            condition,
            min_price: params.min_price,
            max_price: params.max_price,
        };

        let order_by = order_by_clause(params.sort_by.as_deref(), params.sort_order.as_deref());
        let page = PageRequest::new(params.page, params.limit);

        let (assets, total) = AssetRepo::list(&self.pool, user_id, &filter, &order_by, page).await?;

        Ok(AssetListResponse {
            assets,
            pagination: Pagination::build(page, total),
        })
    }

    pub async fn get_by_id(&self, user_id: DbId, id: DbId) -> AppResult<Asset> {
        self.find_owned(user_id, id).await
    }

    /// Check that both references are visible to the user, category first.
    ///
    /// System rows are valid targets; only visibility is required.
    pub async fn validate_references(
        &self,
        user_id: DbId,
        category_id: DbId,
        location_id: DbId,
    ) -> AppResult<()> {
        self.ensure_category(user_id, category_id).await?;
        self.ensure_location(user_id, location_id).await?;
        Ok(())
    }

    pub async fn create(&self, user_id: DbId, input: &CreateAsset) -> AppResult<Asset> {
        input.validate()?;
        ensure_name_present(&input.name)?;
        validate_price(input.price)?;

        self.validate_references(user_id, input.category_id, input.location_id)
            .await?;

        let asset = AssetRepo::create(&self.pool, user_id, input).await?;

        tracing::info!(
            user_id,
            asset_id = asset.id,
            category_id = asset.category_id,
            location_id = asset.location_id,
            "Asset created"
        );
        Ok(asset)
    }

    /// Patch an asset. Only references that actually change are re-checked.
    pub async fn update(&self, user_id: DbId, id: DbId, input: &UpdateAsset) -> AppResult<Asset> {
        input.validate()?;
        if let Some(name) = &input.name {
            ensure_name_present(name)?;
        }
        if let Some(price) = input.price {
            validate_price(price)?;
        }

        let current = self.find_owned(user_id, id).await?;

        if let Some(category_id) = changed_reference(current.category_id, input.category_id) {
            self.ensure_category(user_id, category_id).await?;
        }
        if let Some(location_id) = changed_reference(current.location_id, input.location_id) {
            self.ensure_location(user_id, location_id).await?;
        }

        let asset = AssetRepo::update(&self.pool, id, user_id, input)
            .await?
            .ok_or(AppError::Core(CoreError::NotFound { entity: ENTITY, id }))?;

        tracing::info!(user_id, asset_id = id, "Asset updated");
        Ok(asset)
    }

    /// Soft-delete an asset, then remove its image in the background.
    ///
    /// The file is left alone while any other live asset still links the
    /// same URL, and the store only removes files in the owner's directory.
    pub async fn delete(&self, user_id: DbId, id: DbId) -> AppResult<()> {
        let asset = self.find_owned(user_id, id).await?;

        if !AssetRepo::soft_delete(&self.pool, id, user_id).await? {
            return Err(AppError::Core(CoreError::NotFound { entity: ENTITY, id }));
        }

        if let Some(url) = asset.image_url.filter(|u| !u.is_empty()) {
            self.release_image(user_id, url).await;
        }

        tracing::info!(user_id, asset_id = id, "Asset deleted");
        Ok(())
    }

    async fn release_image(&self, user_id: DbId, url: String) {
        match AssetRepo::count_by_image_url(&self.pool, &url).await {
            Ok(0) => spawn_cleanup(Arc::clone(&self.images), user_id, url),
            Ok(remaining) => {
                tracing::debug!(user_id, url = %url, remaining, "Image still linked, keeping it");
            }
            Err(e) => {
                tracing::warn!(user_id, url = %url, error = %e, "Image link count failed, keeping it");
            }
        }
    }

    async fn find_owned(&self, user_id: DbId, id: DbId) -> AppResult<Asset> {
        AssetRepo::find_by_id(&self.pool, id, user_id)
            .await?
            .ok_or(AppError::Core(CoreError::NotFound { entity: ENTITY, id }))
    }

    async fn ensure_category(&self, user_id: DbId, category_id: DbId) -> AppResult<()> {
        let row = CategoryRepo::find_by_id(&self.pool, category_id).await?;
        require_visible(row, "Category", category_id, user_id)?;
        Ok(())
    }

    async fn ensure_location(&self, user_id: DbId, location_id: DbId) -> AppResult<()> {
        let row = LocationRepo::find_by_id(&self.pool, location_id).await?;
        require_visible(row, "Location", location_id, user_id)?;
        Ok(())
    }
}

fn ensure_name_present(name: &str) -> Result<(), CoreError> {
    if name.trim().is_empty() {
        return Err(CoreError::Validation("Name must not be empty".to_string()));
    }
    Ok(())
}
