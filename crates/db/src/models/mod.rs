//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` entity struct matching the database row
//! - `Deserialize` + `Validate` request DTOs
//! - `Serialize` response projections where the row is not returned as-is

pub mod asset;
pub mod category;
pub mod location;
pub mod session;
pub mod user;
