//! Category tree operations scoped to the acting user.

use inventra_core::asset::ensure_unreferenced;
use inventra_core::cache::{CacheKind, CachedProjection};
use inventra_core::category_tree::{self, needs_uniqueness_check};
use inventra_core::error::CoreError;
use inventra_core::naming::normalize_name;
use inventra_core::scope::{require_mutable, require_visible};
use inventra_core::types::DbId;
use inventra_db::models::asset::CategoryAssetsResponse;
use inventra_db::models::category::{
    Category, CategoryFlatResponse, CategoryResponse, CategoryTreeResponse, CreateCategory,
    UpdateCategory,
};
use inventra_db::repositories::{AssetRepo, CategoryRepo};
use sqlx::PgPool;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

const ENTITY: &str = "Category";
const PARENT_ENTITY: &str = "Parent category";

pub struct CategoryService {
    pool: PgPool,
    cache: CachedProjection,
}

impl CategoryService {
    pub fn new(pool: PgPool, cache: CachedProjection) -> Self {
        Self { pool, cache }
    }

    pub fn from_state(state: &AppState) -> Self {
        Self::new(state.pool.clone(), state.cache.clone())
    }

    /// The nested tree the user sees. Served from cache when possible.
    pub async fn get_tree(&self, user_id: DbId) -> AppResult<CategoryTreeResponse> {
        if let Some(hit) = self
            .cache
            .get_typed::<CategoryTreeResponse>(user_id, CacheKind::CategoryTree)
            .await
        {
            return Ok(hit);
        }

        let rows = CategoryRepo::list_visible(&self.pool, user_id).await?;
        let tree = category_tree::assemble_tree(rows, user_id);
        let response = CategoryTreeResponse::from_branches(&tree);

        self.cache.spawn_put(user_id, CacheKind::CategoryTree, &response);
        Ok(response)
    }

    /// Every visible category with its `"Parent > Child"` path.
    pub async fn get_flat(&self, user_id: DbId) -> AppResult<CategoryFlatResponse> {
        if let Some(hit) = self
            .cache
            .get_typed::<CategoryFlatResponse>(user_id, CacheKind::CategoryFlat)
            .await
        {
            return Ok(hit);
        }

        let rows = CategoryRepo::list_visible(&self.pool, user_id).await?;
        let tree = category_tree::assemble_tree(rows, user_id);
        let response = CategoryFlatResponse::from_branches(&tree);

        self.cache.spawn_put(user_id, CacheKind::CategoryFlat, &response);
        Ok(response)
    }

    pub async fn get_parents(&self, user_id: DbId) -> AppResult<CategoryTreeResponse> {
        let rows = CategoryRepo::list_parents(&self.pool, user_id).await?;
        Ok(CategoryTreeResponse::from_level(&rows))
    }

    /// Children of a visible parent. An invisible parent is `NotFound`.
    pub async fn get_children(
        &self,
        user_id: DbId,
        parent_id: DbId,
    ) -> AppResult<CategoryTreeResponse> {
        self.find_visible(user_id, parent_id, ENTITY).await?;
        let rows = CategoryRepo::list_children(&self.pool, parent_id, user_id).await?;
        Ok(CategoryTreeResponse::from_level(&rows))
    }

    pub async fn get_by_id(&self, user_id: DbId, id: DbId) -> AppResult<CategoryResponse> {
        let category = self.find_visible(user_id, id, ENTITY).await?;
        Ok(CategoryResponse::from(&category))
    }

    /// Create a user-owned category, optionally under a visible parent.
    pub async fn create(
        &self,
        user_id: DbId,
        input: &CreateCategory,
    ) -> AppResult<CategoryResponse> {
        input.validate()?;

        // 1. Normalize.
        let name = normalize_name(&input.name)?;

        // 2. The parent must be visible and top-level.
        if let Some(parent_id) = input.parent_id {
            let parent = self.find_visible(user_id, parent_id, PARENT_ENTITY).await?;
            category_tree::validate_parent(&parent)?;
        }

        // 3. Name unique within (visible scope, parent).
        self.ensure_name_free(user_id, &name, input.parent_id, None).await?;

        // 4. Persist. The unique index backs up step 3 under races.
        let category = CategoryRepo::create(&self.pool, user_id, &name, input.parent_id).await?;

        // 5. Invalidate both projections.
        self.cache.invalidate(user_id, CacheKind::CATEGORIES).await;

        tracing::info!(
            user_id,
            category_id = category.id,
            parent_id = ?category.parent_id,
            "Category created"
        );
        Ok(CategoryResponse::from(&category))
    }

    /// Rename and/or move a user-owned category.
    ///
    /// `parent_id` is replaced as given: omitting it makes the category
    /// top-level.
    pub async fn update(
        &self,
        user_id: DbId,
        id: DbId,
        input: &UpdateCategory,
    ) -> AppResult<CategoryResponse> {
        input.validate()?;

        // 1. Visible, not a default, owned.
        let current = require_mutable(
            CategoryRepo::find_by_id(&self.pool, id).await?,
            ENTITY,
            id,
            user_id,
        )?;

        let name = normalize_name(&input.name)?;

        // 2. Depth rules for the new parent.
        if let Some(parent_id) = input.parent_id {
            category_tree::reject_self_parent(id, Some(parent_id))?;
            let parent = self.find_visible(user_id, parent_id, PARENT_ENTITY).await?;
            category_tree::validate_parent(&parent)?;
            let child_count = CategoryRepo::count_children(&self.pool, id).await?;
            category_tree::validate_reparent(child_count, Some(parent_id))?;
        }

        // 3. Uniqueness, only when the (name, parent) bucket changes.
        if needs_uniqueness_check(&current.name, current.parent_id, &name, input.parent_id) {
            self.ensure_name_free(user_id, &name, input.parent_id, Some(id))
                .await?;
        }

        // 4. Persist and invalidate.
        let category = CategoryRepo::update(&self.pool, id, &name, input.parent_id)
            .await?
            .ok_or(AppError::Core(CoreError::NotFound { entity: ENTITY, id }))?;

        self.cache.invalidate(user_id, CacheKind::CATEGORIES).await;

        tracing::info!(user_id, category_id = id, "Category updated");
        Ok(CategoryResponse::from(&category))
    }

    /// Soft-delete a user-owned category that has no children and no assets.
    pub async fn delete(&self, user_id: DbId, id: DbId) -> AppResult<()> {
        // 1-3. Visible, not a default, owned.
        require_mutable(
            CategoryRepo::find_by_id(&self.pool, id).await?,
            ENTITY,
            id,
            user_id,
        )?;

        // 4. No live children, whoever owns them.
        let child_count = CategoryRepo::count_children(&self.pool, id).await?;
        category_tree::ensure_childless(child_count)?;

        // 5. None of the user's assets point at it.
        let asset_count = AssetRepo::count_by_category(&self.pool, id, user_id).await?;
        ensure_unreferenced(ENTITY, asset_count)?;

        // 6. Tombstone and invalidate.
        if !CategoryRepo::soft_delete(&self.pool, id).await? {
            return Err(AppError::Core(CoreError::NotFound { entity: ENTITY, id }));
        }
        self.cache.invalidate(user_id, CacheKind::CATEGORIES).await;

        tracing::info!(user_id, category_id = id, "Category deleted");
        Ok(())
    }

    /// A visible category with the user's assets in it, newest first.
    pub async fn get_assets(&self, user_id: DbId, id: DbId) -> AppResult<CategoryAssetsResponse> {
        let category = self.find_visible(user_id, id, ENTITY).await?;
        let assets = AssetRepo::list_by_category(&self.pool, id, user_id).await?;
        Ok(CategoryAssetsResponse {
            category: CategoryResponse::from(&category),
            total: assets.len(),
            assets,
        })
    }

    async fn find_visible(
        &self,
        user_id: DbId,
        id: DbId,
        entity: &'static str,
    ) -> AppResult<Category> {
        let row = CategoryRepo::find_by_id(&self.pool, id).await?;
        Ok(require_visible(row, entity, id, user_id)?)
    }

    async fn ensure_name_free(
        &self,
        user_id: DbId,
        name: &str,
        parent_id: Option<DbId>,
        exclude_id: Option<DbId>,
    ) -> AppResult<()> {
        if CategoryRepo::name_exists(&self.pool, name, user_id, parent_id, exclude_id).await? {
            return Err(AppError::Core(CoreError::Conflict(
                "Category name already exists in this scope".to_string(),
            )));
        }
        Ok(())
    }
}
