//! Repository for the `categories` table.

use inventra_core::types::DbId;
use sqlx::PgPool;

use crate::models::category::Category;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, parent_id, owner_id, is_default, deleted_at, created_at, updated_at";

/// Live rows visible to the user bound at `$1`.
const VISIBLE_TO: &str = "deleted_at IS NULL AND (owner_id IS NULL OR owner_id = $1)";

/// Listing order: defaults first, then case-insensitive name compared
/// bytewise, matching `category_tree::listing_order`.
const LISTING_ORDER: &str = r#"is_default DESC, lower(name) COLLATE "C" ASC, id ASC"#;

/// Provides CRUD operations for categories.
pub struct CategoryRepo;

impl CategoryRepo {
    /// Insert a user-owned category, returning the created row.
    pub async fn create(
        pool: &PgPool,
        owner_id: DbId,
        name: &str,
        parent_id: Option<DbId>,
    ) -> Result<Category, sqlx::Error> {
        let query = format!(
            "INSERT INTO categories (name, parent_id, owner_id, is_default)
             VALUES ($1, $2, $3, false)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Category>(&query)
            .bind(name)
            .bind(parent_id)
            .bind(owner_id)
            .fetch_one(pool)
            .await
    }

    /// Insert a system default category (no owner).
    pub async fn create_system(
        pool: &PgPool,
        name: &str,
        parent_id: Option<DbId>,
    ) -> Result<Category, sqlx::Error> {
        let query = format!(
            "INSERT INTO categories (name, parent_id, owner_id, is_default)
             VALUES ($1, $2, NULL, true)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Category>(&query)
            .bind(name)
            .bind(parent_id)
            .fetch_one(pool)
            .await
    }

    /// Find a live category by ID regardless of owner.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Category>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM categories WHERE id = $1 AND deleted_at IS NULL");
        sqlx::query_as::<_, Category>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a live system category by exact name under `parent_id`.
    pub async fn find_system(
        pool: &PgPool,
        name: &str,
        parent_id: Option<DbId>,
    ) -> Result<Option<Category>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM categories
             WHERE deleted_at IS NULL
               AND owner_id IS NULL
               AND lower(name) = lower($1)
               AND parent_id IS NOT DISTINCT FROM $2"
        );
        sqlx::query_as::<_, Category>(&query)
            .bind(name)
            .bind(parent_id)
            .fetch_optional(pool)
            .await
    }

    /// Every live category visible to `user_id`, in listing order.
    pub async fn list_visible(pool: &PgPool, user_id: DbId) -> Result<Vec<Category>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM categories WHERE {VISIBLE_TO} ORDER BY {LISTING_ORDER}");
        sqlx::query_as::<_, Category>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// Top-level categories visible to `user_id`.
    pub async fn list_parents(pool: &PgPool, user_id: DbId) -> Result<Vec<Category>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM categories
             WHERE {VISIBLE_TO} AND parent_id IS NULL
             ORDER BY {LISTING_ORDER}"
        );
        sqlx::query_as::<_, Category>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// Children of `parent_id` visible to `user_id`.
    pub async fn list_children(
        pool: &PgPool,
        parent_id: DbId,
        user_id: DbId,
    ) -> Result<Vec<Category>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM categories
             WHERE {VISIBLE_TO} AND parent_id = $2
             ORDER BY {LISTING_ORDER}"
        );
        sqlx::query_as::<_, Category>(&query)
            .bind(user_id)
            .bind(parent_id)
            .fetch_all(pool)
            .await
    }

    /// Whether a live category named `name` (case-insensitive) already exists
    /// under `parent_id` among the rows visible to `user_id`.
    ///
    /// `exclude_id` skips the row being renamed.
    pub async fn name_exists(
        pool: &PgPool,
        name: &str,
        user_id: DbId,
        parent_id: Option<DbId>,
        exclude_id: Option<DbId>,
    ) -> Result<bool, sqlx::Error> {
        let query = format!(
            "SELECT EXISTS(
                SELECT 1 FROM categories
                WHERE {VISIBLE_TO}
                  AND lower(name) = lower($2)
                  AND parent_id IS NOT DISTINCT FROM $3
                  AND ($4::BIGINT IS NULL OR id <> $4)
             )"
        );
        sqlx::query_scalar::<_, bool>(&query)
            .bind(user_id)
            .bind(name)
            .bind(parent_id)
            .bind(exclude_id)
            .fetch_one(pool)
            .await
    }

    /// Replace name and parent. Returns `None` if the row is gone.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        name: &str,
        parent_id: Option<DbId>,
    ) -> Result<Option<Category>, sqlx::Error> {
        let query = format!(
            "UPDATE categories SET name = $2, parent_id = $3
             WHERE id = $1 AND deleted_at IS NULL
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Category>(&query)
            .bind(id)
            .bind(name)
            .bind(parent_id)
            .fetch_optional(pool)
            .await
    }

    /// Number of live children of `id`, whoever owns them.
    pub async fn count_children(pool: &PgPool, id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM categories WHERE parent_id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .fetch_one(pool)
        .await
    }

    /// Soft-delete a category by ID. Returns `true` if a row was marked deleted.
    pub async fn soft_delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE categories SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
