//! Asset linkage rules: condition values, price checks, listing filters,
//! sort whitelist, pagination, and the "still referenced" deletion guard.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::DbId;

// ---------------------------------------------------------------------------
// Condition
// ---------------------------------------------------------------------------

/// Physical condition of an asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetCondition {
    New,
    Good,
    Fair,
    Poor,
}

/// All accepted condition strings, in display order.
pub const VALID_CONDITIONS: &[&str] = &["new", "good", "fair", "poor"];

impl AssetCondition {
    /// Return the database string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Good => "good",
            Self::Fair => "fair",
            Self::Poor => "poor",
        }
    }

    /// Parse a stored or user-supplied condition (case-insensitive).
    pub fn parse(raw: &str) -> Result<Self, CoreError> {
        match raw.trim().to_lowercase().as_str() {
            "new" => Ok(Self::New),
            "good" => Ok(Self::Good),
            "fair" => Ok(Self::Fair),
            "poor" => Ok(Self::Poor),
            other => Err(CoreError::Validation(format!(
                "Invalid condition '{other}'. Must be one of: {}",
                VALID_CONDITIONS.join(", ")
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// Price
// ---------------------------------------------------------------------------

pub fn validate_price(price: Decimal) -> Result<(), CoreError> {
    if price.is_sign_negative() && !price.is_zero() {
        return Err(CoreError::Validation(
            "Price must not be negative".to_string(),
        ));
    }
    Ok(())
}

/// Reject negative bounds and an inverted range.
pub fn validate_price_range(
    min_price: Option<Decimal>,
    max_price: Option<Decimal>,
) -> Result<(), CoreError> {
    for bound in [min_price, max_price].into_iter().flatten() {
        validate_price(bound)?;
    }
    if let (Some(min), Some(max)) = (min_price, max_price) {
        if min > max {
            return Err(CoreError::Validation(
                "Min price cannot be greater than max price".to_string(),
            ));
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Sorting
// ---------------------------------------------------------------------------

/// Whitelisted sort columns for asset listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetSortField {
    Name,
    Price,
    CreatedAt,
    PurchaseDate,
}

impl AssetSortField {
    /// Accepts both snake_case and camelCase spellings.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "name" => Some(Self::Name),
            "price" => Some(Self::Price),
            "created_at" | "createdAt" => Some(Self::CreatedAt),
            "purchase_date" | "purchaseDate" => Some(Self::PurchaseDate),
            _ => None,
        }
    }

    pub fn column(&self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Price => "price",
            Self::CreatedAt => "created_at",
            Self::PurchaseDate => "purchase_date",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.to_lowercase().as_str() {
            "asc" => Some(Self::Asc),
            "desc" => Some(Self::Desc),
            _ => None,
        }
    }

    pub fn as_sql(&self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

/// Fallback ordering when the requested one is missing or invalid.
pub const DEFAULT_ORDER_BY: &str = "created_at DESC";

/// Build a safe `ORDER BY` fragment from untrusted query parameters.
///
/// A missing field defaults to `created_at`, a missing direction to `DESC`.
/// Any unrecognized value falls back to [`DEFAULT_ORDER_BY`] as a whole.
pub fn order_by_clause(sort_by: Option<&str>, sort_order: Option<&str>) -> String {
    let field = match sort_by.filter(|s| !s.is_empty()) {
        Some(raw) => AssetSortField::parse(raw),
        None => Some(AssetSortField::CreatedAt),
    };
    let order = match sort_order.filter(|s| !s.is_empty()) {
        Some(raw) => SortOrder::parse(raw),
        None => Some(SortOrder::Desc),
    };

    match (field, order) {
        (Some(field), Some(order)) => format!("{} {}", field.column(), order.as_sql()),
        _ => DEFAULT_ORDER_BY.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Pagination
// ---------------------------------------------------------------------------

pub const DEFAULT_PAGE: i64 = 1;

pub const DEFAULT_PAGE_LIMIT: i64 = 10;

pub const MAX_PAGE_LIMIT: i64 = 100;

/// A clamped page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: i64,
    pub limit: i64,
}

impl PageRequest {
    /// Page defaults to 1 and floors at 1; limit defaults to 10 and is
    /// clamped to `1..=100`.
    pub fn new(page: Option<i64>, limit: Option<i64>) -> Self {
        Self {
            page: page.unwrap_or(DEFAULT_PAGE).max(1),
            limit: limit.unwrap_or(DEFAULT_PAGE_LIMIT).clamp(1, MAX_PAGE_LIMIT),
        }
    }

    /// Rows to skip. Saturates instead of overflowing for absurd pages,
    /// which then simply come back empty.
    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.limit)
    }
}

/// Pagination block returned alongside list results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub page: i64,
    pub limit: i64,
    pub total_items: i64,
    pub total_pages: i64,
    pub has_next: bool,
    pub has_prev: bool,
}

impl Pagination {
    pub fn build(request: PageRequest, total_items: i64) -> Self {
        let total_pages = if total_items <= 0 {
            0
        } else {
            (total_items + request.limit - 1) / request.limit
        };
        Self {
            page: request.page,
            limit: request.limit,
            total_items,
            total_pages,
            has_next: request.page < total_pages,
            has_prev: request.page > 1,
        }
    }
}

// ---------------------------------------------------------------------------
// Linkage
// ---------------------------------------------------------------------------

/// Return the reference that must be re-validated on update, if any.
///
/// Only a reference that is supplied *and* differs from the stored one needs
/// checking again.
pub fn changed_reference(current: DbId, requested: Option<DbId>) -> Option<DbId> {
    requested.filter(|id| *id != current)
}

/// Block deletion of a category or location that assets still point at.
pub fn ensure_unreferenced(entity: &str, asset_count: i64) -> Result<(), CoreError> {
    if asset_count > 0 {
        return Err(CoreError::Conflict(format!(
            "Cannot delete {} that is being used by assets",
            entity.to_lowercase()
        )));
    }
    Ok(())
}
