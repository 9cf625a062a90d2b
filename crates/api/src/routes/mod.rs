pub mod auth;
pub mod categories;
pub mod colors;
pub mod drafts;
pub mod health;
pub mod submissions;
pub mod tiles;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/signin                        sign in (public)
/// /auth/me                            current user (auth)
/// /auth/forgot-password               request reset email (public)
/// /auth/reset-password/{token}        set a new password (public)
///
/// /tiles                              list, create (admin)
/// /tiles/options                      grout shapes, shape styles, scale range
/// /tiles/{id}                         get, update, delete
///
/// /categories                         list, create (admin)
/// /categories/{id}                    get, update, delete
/// /categories/{id}/border-mask        set, remove
///
/// /colors                             list, create (admin)
/// /colors/add                         create
/// /colors/{id}                        get, update, delete
///
/// /tile-submissions                   create (public), list (admin)
/// /tile-submissions/{id}              get, delete (admin)
///
/// /drafts/{kind}/{target}             load, save, discard (auth)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/tiles", tiles::router())
        .nest("/categories", categories::router())
        .nest("/colors", colors::router())
        .nest("/tile-submissions", submissions::router())
        .nest("/drafts", drafts::router())
}
