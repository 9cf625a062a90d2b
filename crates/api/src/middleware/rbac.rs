//! Admin gate for the dashboard resources.
//!
//! Tiles, categories, colors and the submission inbox are admin-only; the
//! `user` role can sign in and keep drafts but nothing else.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use tiledash_core::error::CoreError;
use tiledash_core::roles::ROLE_ADMIN;

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// An [`AuthUser`] whose token carries the `admin` role.
///
/// Missing or invalid tokens reject with 401 (via [`AuthUser`]); a valid
/// token for any other role rejects with 403.
pub struct RequireAdmin(pub AuthUser);

impl AuthUser {
    pub fn is_admin(&self) -> bool {
        self.role == ROLE_ADMIN
    }
}

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if user.is_admin() {
            return Ok(RequireAdmin(user));
        }

        tracing::warn!(
            user_id = user.user_id,
            role = %user.role,
            path = %parts.uri.path(),
            "Non-admin request to admin resource"
        );
        Err(AppError::Core(CoreError::Forbidden(
            "Admin role required".into(),
        )))
    }
}
