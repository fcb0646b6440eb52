//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument. Repositories apply the
//! soft-delete filter but not ownership rules; scoping is decided by the
//! caller through `inventra_core::scope`, except where a query is
//! explicitly "visible to" or "owned by" a user.

pub mod asset_repo;
pub mod category_repo;
pub mod location_repo;
pub mod session_repo;
pub mod user_repo;

pub use asset_repo::AssetRepo;
pub use category_repo::CategoryRepo;
pub use location_repo::LocationRepo;
pub use session_repo::SessionRepo;
pub use user_repo::UserRepo;
