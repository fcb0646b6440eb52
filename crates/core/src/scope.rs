//! Ownership scoping for categories and locations.
//!
//! A row either belongs to the system (`owner_id IS NULL`, seeded once and
//! shared by every user) or to exactly one user. System rows are visible to
//! everyone and mutable by no one; user rows are visible and mutable only by
//! their owner.

use crate::error::CoreError;
use crate::types::DbId;

/// Which tenant a row belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// Seeded default shared by all users.
    System,
    /// Private row owned by a single user.
    User(DbId),
}

impl Scope {
    /// Derive the scope from a nullable owner column.
    pub fn from_owner(owner_id: Option<DbId>) -> Self {
        match owner_id {
            Some(id) => Scope::User(id),
            None => Scope::System,
        }
    }

    pub fn owner_id(self) -> Option<DbId> {
        match self {
            Scope::System => None,
            Scope::User(id) => Some(id),
        }
    }

    pub fn is_system(self) -> bool {
        matches!(self, Scope::System)
    }

    /// `true` for rows a user created themselves.
    pub fn is_custom(self) -> bool {
        matches!(self, Scope::User(_))
    }
}

/// A row that participates in owner scoping.
pub trait Scoped {
    fn owner_id(&self) -> Option<DbId>;

    /// `true` only for seed-created system rows.
    fn is_default(&self) -> bool;

    fn scope(&self) -> Scope {
        Scope::from_owner(self.owner_id())
    }
}

/// Whether `user_id` may read the row.
pub fn visible<T: Scoped + ?Sized>(row: &T, user_id: DbId) -> bool {
    match row.owner_id() {
        None => true,
        Some(owner) => owner == user_id,
    }
}

/// Whether `user_id` may change or delete the row. System rows never are.
pub fn mutable<T: Scoped + ?Sized>(row: &T, user_id: DbId) -> bool {
    row.owner_id() == Some(user_id)
}

/// Turn an optional lookup result into a visible row or `NotFound`.
///
/// Rows that exist but belong to another user are reported exactly like
/// missing rows.
pub fn require_visible<T: Scoped>(
    row: Option<T>,
    entity: &'static str,
    id: DbId,
    user_id: DbId,
) -> Result<T, CoreError> {
    match row {
        Some(row) if visible(&row, user_id) => Ok(row),
        _ => Err(CoreError::NotFound { entity, id }),
    }
}

/// Turn an optional lookup result into a row the user may mutate.
///
/// - absent or invisible rows fail with `NotFound`
/// - visible default rows fail with `Forbidden`
/// - visible rows the user does not own fail with `NotFound`
pub fn require_mutable<T: Scoped>(
    row: Option<T>,
    entity: &'static str,
    id: DbId,
    user_id: DbId,
) -> Result<T, CoreError> {
    let row = require_visible(row, entity, id, user_id)?;
    if row.is_default() {
        return Err(CoreError::Forbidden(format!(
            "Cannot modify system default {}",
            entity.to_lowercase()
        )));
    }
    if !mutable(&row, user_id) {
        return Err(CoreError::NotFound { entity, id });
    }
    Ok(row)
}
