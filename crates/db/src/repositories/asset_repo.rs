//! Repository for the `assets` table.
//!
//! Every query here is scoped to the owning user: assets are never shared.

use inventra_core::asset::PageRequest;
use inventra_core::types::DbId;
use sqlx::PgPool;

use crate::models::asset::{Asset, AssetFilter, CreateAsset, UpdateAsset};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, description, price, condition, serial_number, purchase_date, \
                        warranty, image_url, category_id, location_id, owner_id, deleted_at, \
                        created_at, updated_at";

/// Filter predicate shared by the list and count queries.
///
/// `$1` owner, `$2` search pattern, `$3` category, `$4` location,
/// `$5` condition, `$6` min price, `$7` max price.
const FILTER_WHERE: &str = "owner_id = $1 AND deleted_at IS NULL
    AND ($2::TEXT IS NULL
         OR lower(name) LIKE $2
         OR lower(description) LIKE $2
         OR lower(serial_number) LIKE $2)
    AND ($3::BIGINT IS NULL OR category_id = $3)
    AND ($4::BIGINT IS NULL OR location_id = $4)
    AND ($5::TEXT IS NULL OR condition = $5)
    AND ($6::NUMERIC IS NULL OR price >= $6)
    AND ($7::NUMERIC IS NULL OR price <= $7)";

/// Provides CRUD operations for assets.
pub struct AssetRepo;

impl AssetRepo {
    /// Insert a new asset, returning the created row.
    pub async fn create(
        pool: &PgPool,
        owner_id: DbId,
        input: &CreateAsset,
    ) -> Result<Asset, sqlx::Error> {
        let query = format!(
            "INSERT INTO assets (name, description, price, condition, serial_number,
                                 purchase_date, warranty, image_url, category_id,
                                 location_id, owner_id)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Asset>(&query)
            .bind(input.name.trim())
            .bind(input.description.trim())
            .bind(input.price)
            .bind(input.condition.as_str())
            .bind(input.serial_number.trim())
            .bind(input.purchase_date)
            .bind(input.warranty)
            .bind(&input.image_url)
            .bind(input.category_id)
            .bind(input.location_id)
            .bind(owner_id)
            .fetch_one(pool)
            .await
    }

    /// Find a live asset owned by `owner_id`.
    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
        owner_id: DbId,
    ) -> Result<Option<Asset>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM assets
             WHERE id = $1 AND owner_id = $2 AND deleted_at IS NULL"
        );
        sqlx::query_as::<_, Asset>(&query)
            .bind(id)
            .bind(owner_id)
            .fetch_optional(pool)
            .await
    }

    /// One page of the owner's assets plus the total matching count.
    ///
    /// `order_by` must come from `inventra_core::asset::order_by_clause`,
    /// which only ever yields whitelisted columns.
    pub async fn list(
        pool: &PgPool,
        owner_id: DbId,
        filter: &AssetFilter,
        order_by: &str,
        page: PageRequest,
    ) -> Result<(Vec<Asset>, i64), sqlx::Error> {
        let pattern = filter
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| format!("%{}%", s.to_lowercase()));
        let condition = filter.condition.map(|c| c.as_str());

        let count_query = format!("SELECT COUNT(*) FROM assets WHERE {FILTER_WHERE}");
        let total = sqlx::query_scalar::<_, i64>(&count_query)
            .bind(owner_id)
            .bind(&pattern)
            .bind(filter.category_id)
            .bind(filter.location_id)
            .bind(condition)
            .bind(filter.min_price)
            .bind(filter.max_price)
            .fetch_one(pool)
            .await?;

        let query = format!(
            "SELECT {COLUMNS} FROM assets
             WHERE {FILTER_WHERE}
             ORDER BY {order_by}, id DESC
             LIMIT $8 OFFSET $9"
        );
        let assets = sqlx::query_as::<_, Asset>(&query)
            .bind(owner_id)
            .bind(&pattern)
            .bind(filter.category_id)
            .bind(filter.location_id)
            .bind(condition)
            .bind(filter.min_price)
            .bind(filter.max_price)
            .bind(page.limit)
            .bind(page.offset())
            .fetch_all(pool)
            .await?;

        Ok((assets, total))
    }

    /// The owner's live assets in a category, newest first.
    pub async fn list_by_category(
        pool: &PgPool,
        category_id: DbId,
        owner_id: DbId,
    ) -> Result<Vec<Asset>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM assets
             WHERE category_id = $1 AND owner_id = $2 AND deleted_at IS NULL
             ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, Asset>(&query)
            .bind(category_id)
            .bind(owner_id)
            .fetch_all(pool)
            .await
    }

    /// The owner's live assets in a location, newest first.
    pub async fn list_by_location(
        pool: &PgPool,
        location_id: DbId,
        owner_id: DbId,
    ) -> Result<Vec<Asset>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM assets
             WHERE location_id = $1 AND owner_id = $2 AND deleted_at IS NULL
             ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, Asset>(&query)
            .bind(location_id)
            .bind(owner_id)
            .fetch_all(pool)
            .await
    }

    /// Live assets of `owner_id` referencing the category.
    pub async fn count_by_category(
        pool: &PgPool,
        category_id: DbId,
        owner_id: DbId,
    ) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM assets
             WHERE category_id = $1 AND owner_id = $2 AND deleted_at IS NULL",
        )
        .bind(category_id)
        .bind(owner_id)
        .fetch_one(pool)
        .await
    }

    /// Live assets of `owner_id` referencing the location.
    pub async fn count_by_location(
        pool: &PgPool,
        location_id: DbId,
        owner_id: DbId,
    ) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM assets
             WHERE location_id = $1 AND owner_id = $2 AND deleted_at IS NULL",
        )
        .bind(location_id)
        .bind(owner_id)
        .fetch_one(pool)
        .await
    }

    /// Live assets of any owner still pointing at `image_url`.
    pub async fn count_by_image_url(pool: &PgPool, image_url: &str) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM assets WHERE image_url = $1 AND deleted_at IS NULL",
        )
        .bind(image_url)
        .fetch_one(pool)
        .await
    }

    /// Patch an asset. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if the asset does not exist or belongs to someone else.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        owner_id: DbId,
        input: &UpdateAsset,
    ) -> Result<Option<Asset>, sqlx::Error> {
        let query = format!(
            "UPDATE assets SET
                name = COALESCE($3, name),
                description = COALESCE($4, description),
                price = COALESCE($5, price),
                condition = COALESCE($6, condition),
                serial_number = COALESCE($7, serial_number),
                purchase_date = COALESCE($8, purchase_date),
                warranty = COALESCE($9, warranty),
                image_url = COALESCE($10, image_url),
                category_id = COALESCE($11, category_id),
                location_id = COALESCE($12, location_id)
             WHERE id = $1 AND owner_id = $2 AND deleted_at IS NULL
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Asset>(&query)
            .bind(id)
            .bind(owner_id)
            .bind(input.name.as_deref().map(str::trim))
            .bind(input.description.as_deref().map(str::trim))
            .bind(input.price)
            .bind(input.condition.map(|c| c.as_str()))
            .bind(input.serial_number.as_deref().map(str::trim))
            .bind(input.purchase_date)
            .bind(input.warranty)
            .bind(&input.image_url)
            .bind(input.category_id)
            .bind(input.location_id)
            .fetch_optional(pool)
            .await
    }

    /// Soft-delete an owned asset. Returns `true` if a row was marked deleted.
    pub async fn soft_delete(pool: &PgPool, id: DbId, owner_id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE assets SET deleted_at = NOW()
             WHERE id = $1 AND owner_id = $2 AND deleted_at IS NULL",
        )
        .bind(id)
        .bind(owner_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
