//! Location entity, request DTOs and response projections.

use inventra_core::scope::Scoped;
use inventra_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `locations` table.
#[derive(Debug, Clone, FromRow)]
pub struct Location {
    pub id: DbId,
    pub name: String,
    pub owner_id: Option<DbId>,
    pub is_default: bool,
    pub deleted_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Scoped for Location {
    fn owner_id(&self) -> Option<DbId> {
        self.owner_id
    }

    fn is_default(&self) -> bool {
        self.is_default
    }
}

/// DTO for creating or renaming a location.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LocationInput {
    #[validate(length(min = 2, max = 100))]
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationResponse {
    pub id: DbId,
    pub owner_id: Option<DbId>,
    pub name: String,
    pub is_default: bool,
    pub is_custom: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<&Location> for LocationResponse {
    fn from(l: &Location) -> Self {
        Self {
            id: l.id,
            owner_id: l.owner_id,
            name: l.name.clone(),
            is_default: l.is_default,
            is_custom: l.scope().is_custom(),
            created_at: l.created_at,
            updated_at: l.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationListResponse {
    pub locations: Vec<LocationResponse>,
    pub total: usize,
}

impl LocationListResponse {
    pub fn from_rows(rows: &[Location]) -> Self {
        let locations: Vec<LocationResponse> = rows.iter().map(LocationResponse::from).collect();
        Self {
            total: locations.len(),
            locations,
        }
    }
}
