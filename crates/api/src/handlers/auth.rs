//! Handlers for the `/auth` resource (sign-in, current user, password reset).

use axum::extract::{Path, State};
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tiledash_core::error::CoreError;
use tiledash_core::users::{normalize_email, validate_new_password, RESET_TOKEN_TTL_MINS};
use tiledash_db::models::password_reset::CreatePasswordResetToken;
use tiledash_db::models::user::UserResponse;
use tiledash_db::repositories::{PasswordResetRepo, UserRepo};
use validator::Validate;

use crate::auth::jwt::{generate_access_token, generate_reset_token, hash_reset_token};
use crate::auth::password::{hash_password, verify_password, verify_unknown_account};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::{DataResponse, MessageResponse};
use crate::state::AppState;

const INVALID_CREDENTIALS: &str = "Invalid email or password";
const RESET_REQUESTED: &str =
    "If an account exists for that email, a password reset link has been sent";

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/signin`.
#[derive(Debug, Deserialize, Validate)]
pub struct SigninRequest {
    #[validate(length(min = 1, max = 254))]
    pub email: String,
    #[validate(length(min = 1, max = 256))]
    pub password: String,
}

/// Successful sign-in response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SigninResponse {
    pub token: String,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
    pub user: UserResponse,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ForgotPasswordRequest {
    #[validate(email)]
    pub email: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    pub password: String,
    pub confirm_password: String,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/auth/signin
///
/// Authenticate with email + password. Returns an access token.
pub async fn signin(
    State(state): State<AppState>,
    Json(input): Json<SigninRequest>,
) -> AppResult<Json<DataResponse<SigninResponse>>> {
    input.validate()?;
    let email = normalize_email(&input.email);

    let Some(user) = UserRepo::find_by_email(&state.pool, &email).await? else {
        verify_unknown_account(&input.password);
        tracing::info!("Sign-in rejected for unknown email");
        return Err(AppError::Core(CoreError::Unauthorized(
            INVALID_CREDENTIALS.into(),
        )));
    };

    let password_valid = verify_password(&input.password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !password_valid {
        tracing::info!(user_id = user.id, "Sign-in rejected");
        return Err(AppError::Core(CoreError::Unauthorized(
            INVALID_CREDENTIALS.into(),
        )));
    }

    let token = generate_access_token(user.id, &user.role, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

    tracing::info!(user_id = user.id, role = %user.role, "User signed in");

    Ok(Json(DataResponse {
        data: SigninResponse {
            token,
            expires_in: state.config.jwt.access_token_expiry_mins * 60,
            user: UserResponse::from(&user),
        },
    }))
}

/// GET /api/v1/auth/me
pub async fn me(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<DataResponse<UserResponse>>> {
    let user = UserRepo::find_by_id(&state.pool, auth.user_id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::Unauthorized("User no longer exists".into())))?;
    Ok(Json(DataResponse {
        data: UserResponse::from(&user),
    }))
}

/// POST /api/v1/auth/forgot-password
///
/// Always answers with the same message so the endpoint cannot be used to
/// probe which emails have accounts. The email is sent in the background.
pub async fn forgot_password(
    State(state): State<AppState>,
    Json(input): Json<ForgotPasswordRequest>,
) -> AppResult<Json<DataResponse<MessageResponse>>> {
    input.validate()?;
    let email = normalize_email(&input.email);

    if let Some(user) = UserRepo::find_by_email(&state.pool, &email).await? {
        let (token, token_hash) = generate_reset_token();
        PasswordResetRepo::create(
            &state.pool,
            &CreatePasswordResetToken {
                user_id: user.id,
                token_hash,
                expires_at: Utc::now() + chrono::Duration::minutes(RESET_TOKEN_TTL_MINS),
            },
        )
        .await?;

        let reset_url = format!("{}/reset-password/{token}", state.config.public_app_url);
        let (subject, html) =
            tiledash_mail::templates::password_reset(&user.user_name, &reset_url, RESET_TOKEN_TTL_MINS);
        let mailer = state.mailer.clone();
        let user_id = user.id;
        tokio::spawn(async move {
            if let Err(e) = mailer.send(&user.email, &subject, &html).await {
                tracing::error!(user_id, error = %e, "Failed to send password reset email");
            }
        });

        tracing::info!(user_id, "Password reset requested");
    } else {
        tracing::debug!("Password reset requested for unknown email");
    }

    Ok(Json(DataResponse {
        data: MessageResponse::new(RESET_REQUESTED),
    }))
}

/// POST /api/v1/auth/reset-password/{token}
pub async fn reset_password(
    State(state): State<AppState>,
    Path(token): Path<String>,
    Json(input): Json<ResetPasswordRequest>,
) -> AppResult<Json<DataResponse<MessageResponse>>> {
    validate_new_password(&input.password, &input.confirm_password)?;

    let invalid_link = || AppError::BadRequest("Reset link is invalid or has expired".into());

    let reset = PasswordResetRepo::find_active(&state.pool, &hash_reset_token(&token))
        .await?
        .ok_or_else(invalid_link)?;

    // Claim the token first so two concurrent resets cannot both succeed.
    if !PasswordResetRepo::mark_used(&state.pool, reset.id).await? {
        return Err(invalid_link());
    }

    let password_hash = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;
    if !UserRepo::update_password(&state.pool, reset.user_id, &password_hash).await? {
        return Err(invalid_link());
    }

    tracing::info!(user_id = reset.user_id, "Password reset completed");

    Ok(Json(DataResponse {
        data: MessageResponse::new("Password has been reset"),
    }))
}
