//! Shared response envelope types for API handlers.
//!
//! Reads use a `{ "data": ... }` envelope. Creates and updates return the
//! bare entity, deletes return `204 No Content`.

use serde::Serialize;

/// Standard `{ "data": T }` response envelope.
///
/// ```ignore
/// Ok(Json(DataResponse { data: tree }))
/// ```
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}
