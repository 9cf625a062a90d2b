//! Route definitions for the `/drafts` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::drafts;
use crate::state::AppState;

/// Routes mounted at `/drafts`. Any authenticated user.
///
/// ```text
/// GET    /{kind}/{target}   -> load
/// PUT    /{kind}/{target}   -> save
/// DELETE /{kind}/{target}   -> discard
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route(
        "/{kind}/{target}",
        get(drafts::load).put(drafts::save).delete(drafts::discard),
    )
}
