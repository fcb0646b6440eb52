//! Asset entity model and DTOs.

use chrono::NaiveDate;
use inventra_core::asset::{AssetCondition, Pagination};
use inventra_core::types::{DbId, Timestamp};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::models::category::CategoryResponse;
use crate::models::location::LocationResponse;

/// A row from the `assets` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Asset {
    pub id: DbId,
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub condition: String,
    pub serial_number: String,
    pub purchase_date: Option<NaiveDate>,
    pub warranty: Option<NaiveDate>,
    pub image_url: Option<String>,
    pub category_id: DbId,
    pub location_id: DbId,
    pub owner_id: DbId,
    #[serde(skip_serializing)]
    pub deleted_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating an asset.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateAsset {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[serde(default)]
    #[validate(length(max = 255))]
    pub description: String,
    pub category_id: DbId,
    pub location_id: DbId,
    pub price: Decimal,
    pub condition: AssetCondition,
    #[serde(default)]
    #[validate(length(max = 100))]
    pub serial_number: String,
    pub purchase_date: Option<NaiveDate>,
    pub warranty: Option<NaiveDate>,
    #[validate(url)]
    pub image_url: Option<String>,
}

/// DTO for patching an asset. Only supplied fields change.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateAsset {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    #[validate(length(max = 255))]
    pub description: Option<String>,
    pub category_id: Option<DbId>,
    pub location_id: Option<DbId>,
    pub price: Option<Decimal>,
    pub condition: Option<AssetCondition>,
    #[validate(length(max = 100))]
    pub serial_number: Option<String>,
    pub purchase_date: Option<NaiveDate>,
    pub warranty: Option<NaiveDate>,
    #[validate(url)]
    pub image_url: Option<String>,
}

/// Listing filter. All conditions are ANDed; `search` matches name,
/// description or serial number case-insensitively.
#[derive(Debug, Clone, Default)]
pub struct AssetFilter {
    pub search: Option<String>,
    pub category_id: Option<DbId>,
    pub location_id: Option<DbId>,
    pub condition: Option<AssetCondition>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AssetListResponse {
    pub assets: Vec<Asset>,
    pub pagination: Pagination,
}

/// Request body for checking a category/location pair before creating an asset.
#[derive(Debug, Clone, Deserialize)]
pub struct ValidateReferences {
    pub category_id: DbId,
    pub location_id: DbId,
}

/// A category together with the caller's assets in it.
#[derive(Debug, Clone, Serialize)]
pub struct CategoryAssetsResponse {
    pub category: CategoryResponse,
    pub assets: Vec<Asset>,
    pub total: usize,
}

/// A location together with the caller's assets in it.
#[derive(Debug, Clone, Serialize)]
pub struct LocationAssetsResponse {
    pub location: LocationResponse,
    pub assets: Vec<Asset>,
    pub total: usize,
}
