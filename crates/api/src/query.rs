//! Query parameter types for API handlers.

use inventra_core::types::DbId;
use rust_decimal::Decimal;
use serde::Deserialize;

/// Query string of `GET /assets`.
///
/// Paging values are clamped by `PageRequest`; unknown sort values fall
/// back to `created_at DESC` instead of failing the request.
#[derive(Debug, Default, Deserialize)]
pub struct AssetListParams {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub search: Option<String>,
    pub category_id: Option<DbId>,
    pub location_id: Option<DbId>,
    pub condition: Option<String>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
}
