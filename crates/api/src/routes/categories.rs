//! Route definitions for the `/categories` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::categories;
use crate::state::AppState;

/// Routes mounted at `/categories`.
///
/// ```text
/// GET    /tree            -> tree (cached)
/// GET    /flat            -> flat (cached)
/// GET    /parents         -> parents
/// POST   /                -> create
/// GET    /{id}            -> get_by_id
/// PUT    /{id}            -> update
/// DELETE /{id}            -> delete
/// GET    /{id}/children   -> children
/// GET    /{id}/assets     -> assets
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(categories::create))
        .route("/tree", get(categories::tree))
        .route("/flat", get(categories::flat))
        .route("/parents", get(categories::parents))
        .route(
            "/{id}",
            get(categories::get_by_id)
                .put(categories::update)
                .delete(categories::delete),
        )
        .route("/{id}/children", get(categories::children))
        .route("/{id}/assets", get(categories::assets))
}
