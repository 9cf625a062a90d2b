//! Route definitions for the `/tiles` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::tiles;
use crate::state::AppState;

/// Routes mounted at `/tiles`. All require the admin role.
///
/// ```text
/// GET    /           -> list
/// POST   /           -> create (multipart)
/// GET    /options    -> options
/// GET    /{id}       -> get_by_id
/// PUT    /{id}       -> update (multipart)
/// DELETE /{id}       -> delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(tiles::list).post(tiles::create))
        .route("/options", get(tiles::options))
        .route(
            "/{id}",
            get(tiles::get_by_id)
                .put(tiles::update)
                .delete(tiles::delete),
        )
}
