//! Route definitions for the `/categories` resource.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::categories;
use crate::state::AppState;

/// Routes mounted at `/categories`. All require the admin role.
///
/// ```text
/// GET    /                   -> list
/// POST   /                   -> create
/// GET    /{id}               -> get_by_id
/// PUT    /{id}               -> update
/// DELETE /{id}               -> delete
/// PUT    /{id}/border-mask   -> set_border_mask (multipart)
/// DELETE /{id}/border-mask   -> remove_border_mask
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(categories::list).post(categories::create))
        .route(
            "/{id}",
            get(categories::get_by_id)
                .put(categories::update)
                .delete(categories::delete),
        )
        .route(
            "/{id}/border-mask",
            put(categories::set_border_mask).delete(categories::remove_border_mask),
        )
}
