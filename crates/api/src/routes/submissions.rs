//! Route definitions for the `/tile-submissions` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::submissions;
use crate::state::AppState;

/// Routes mounted at `/tile-submissions`.
///
/// ```text
/// POST   /        -> create (public)
/// GET    /        -> list (admin)
/// GET    /{id}    -> get_by_id (admin)
/// DELETE /{id}    -> delete (admin)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(submissions::list).post(submissions::create))
        .route(
            "/{id}",
            get(submissions::get_by_id).delete(submissions::delete),
        )
}
