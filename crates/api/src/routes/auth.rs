//! Route definitions for the `/auth` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::auth;
use crate::state::AppState;

/// Routes mounted at `/auth`.
///
/// ```text
/// POST /signin                  -> signin
/// GET  /me                      -> me (requires auth)
/// POST /forgot-password         -> forgot_password
/// POST /reset-password/{token}  -> reset_password
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/signin", post(auth::signin))
        .route("/me", get(auth::me))
        .route("/forgot-password", post(auth::forgot_password))
        .route("/reset-password/{token}", post(auth::reset_password))
}
