//! Route definitions for the `/locations` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::locations;
use crate::state::AppState;

/// Routes mounted at `/locations`.
///
/// ```text
/// GET    /              -> list (cached)
/// POST   /              -> create
/// GET    /{id}          -> get_by_id
/// PUT    /{id}          -> update
/// DELETE /{id}          -> delete
/// GET    /{id}/assets   -> assets
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(locations::list).post(locations::create))
        .route(
            "/{id}",
            get(locations::get_by_id)
                .put(locations::update)
                .delete(locations::delete),
        )
        .route("/{id}/assets", get(locations::assets))
}
