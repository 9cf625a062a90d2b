//! Route definitions for the `/colors` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::colors;
use crate::state::AppState;

/// Routes mounted at `/colors`. All require the admin role.
///
/// ```text
/// GET    /        -> list
/// POST   /        -> create
/// POST   /add     -> create
/// GET    /{id}    -> get_by_id
/// PUT    /{id}    -> update
/// DELETE /{id}    -> delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(colors::list).post(colors::create))
        .route("/add", post(colors::create))
        .route(
            "/{id}",
            get(colors::get_by_id)
                .put(colors::update)
                .delete(colors::delete),
        )
}
