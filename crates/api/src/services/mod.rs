//! Orchestration between the domain rules in `inventra_core` and the
//! repositories in `inventra_db`.
//!
//! Each service is built per request from [`AppState`](crate::state::AppState)
//! (cloning a pool handle and the cache front is cheap) and takes the acting
//! user's id on every operation.

pub mod asset;
pub mod category;
pub mod location;

pub use asset::AssetService;
pub use category::CategoryService;
pub use location::LocationService;
