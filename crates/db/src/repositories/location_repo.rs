//! Repository for the `locations` table.

use inventra_core::types::DbId;
use sqlx::PgPool;

use crate::models::location::Location;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, owner_id, is_default, deleted_at, created_at, updated_at";

/// Provides CRUD operations for locations.
pub struct LocationRepo;

impl LocationRepo {
    /// Insert a user-owned location, returning the created row.
    pub async fn create(pool: &PgPool, owner_id: DbId, name: &str) -> Result<Location, sqlx::Error> {
        let query = format!(
            "INSERT INTO locations (name, owner_id, is_default)
             VALUES ($1, $2, false)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Location>(&query)
            .bind(name)
            .bind(owner_id)
            .fetch_one(pool)
            .await
    }

    /// Insert a system default location.
    pub async fn create_system(pool: &PgPool, name: &str) -> Result<Location, sqlx::Error> {
        let query = format!(
            "INSERT INTO locations (name, owner_id, is_default)
             VALUES ($1, NULL, true)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Location>(&query)
            .bind(name)
            .fetch_one(pool)
            .await
    }

    /// Find a live location by ID regardless of owner.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Location>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM locations WHERE id = $1 AND deleted_at IS NULL");
        sqlx::query_as::<_, Location>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a live system location by name (case-insensitive).
    pub async fn find_system(pool: &PgPool, name: &str) -> Result<Option<Location>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM locations
             WHERE deleted_at IS NULL AND owner_id IS NULL AND lower(name) = lower($1)"
        );
        sqlx::query_as::<_, Location>(&query)
            .bind(name)
            .fetch_optional(pool)
            .await
    }

    /// Every live location visible to `user_id`, defaults first then by name.
    pub async fn list_visible(pool: &PgPool, user_id: DbId) -> Result<Vec<Location>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM locations
             WHERE deleted_at IS NULL AND (owner_id IS NULL OR owner_id = $1)
             ORDER BY is_default DESC, lower(name) COLLATE \"C\" ASC, id ASC"
        );
        sqlx::query_as::<_, Location>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// Whether a visible live location already uses `name` (case-insensitive).
    pub async fn name_exists(
        pool: &PgPool,
        name: &str,
        user_id: DbId,
        exclude_id: Option<DbId>,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(
                SELECT 1 FROM locations
                WHERE deleted_at IS NULL
                  AND (owner_id IS NULL OR owner_id = $1)
                  AND lower(name) = lower($2)
                  AND ($3::BIGINT IS NULL OR id <> $3)
             )",
        )
        .bind(user_id)
        .bind(name)
        .bind(exclude_id)
        .fetch_one(pool)
        .await
    }

    /// Rename a location. Returns `None` if the row is gone.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        name: &str,
    ) -> Result<Option<Location>, sqlx::Error> {
        let query = format!(
            "UPDATE locations SET name = $2
             WHERE id = $1 AND deleted_at IS NULL
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Location>(&query)
            .bind(id)
            .bind(name)
            .fetch_optional(pool)
            .await
    }

    /// Soft-delete a location by ID. Returns `true` if a row was marked deleted.
    pub async fn soft_delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE locations SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
