pub mod assets;
pub mod auth;
pub mod categories;
pub mod health;
pub mod locations;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /auth/register, /auth/login, /auth/refresh      public
/// /auth/logout, /auth/me                          auth required
///
/// /categories/...                                 auth required
/// /locations/...                                  auth required
/// /assets/...                                     auth required
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/categories", categories::router())
        .nest("/locations", locations::router())
        .nest("/assets", assets::router())
}
