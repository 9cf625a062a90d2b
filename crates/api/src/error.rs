use axum::extract::multipart::MultipartError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::{json, Value};
use tiledash_core::error::CoreError;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and adds HTTP-specific variants.
/// Every variant renders as `{ "error": "<CODE>", "message": "..." }`, with
/// an optional `details` object for errors a client can act on.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Request DTO failed `validator` checks.
    #[error("Validation failed: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Bad request: {0}")]
    BadRequest(String),

    /// The body outgrew the request body limit while it was being read.
    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl From<MultipartError> for AppError {
    fn from(err: MultipartError) -> Self {
        let text = err.body_text();
        if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
            AppError::PayloadTooLarge(text)
        } else {
            AppError::BadRequest(format!("Malformed multipart body: {text}"))
        }
    }
}

const GENERIC_INTERNAL: &str = "An internal error occurred";

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message, details) = match &self {
            // --- CoreError variants ---
            AppError::Core(core) => classify_core_error(core),

            // --- Database errors ---
            AppError::Database(err) => {
                let (status, code, message) = classify_sqlx_error(err);
                (status, code, message, None)
            }

            // --- HTTP-specific errors ---
            AppError::Validation(errors) => (
                StatusCode::BAD_REQUEST,
                "VALIDATION_ERROR",
                "Request validation failed".to_string(),
                serde_json::to_value(errors.field_errors()).ok(),
            ),
            AppError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone(), None)
            }
            AppError::PayloadTooLarge(msg) => (
                StatusCode::PAYLOAD_TOO_LARGE,
                "PAYLOAD_TOO_LARGE",
                msg.clone(),
                None,
            ),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    GENERIC_INTERNAL.to_string(),
                    None,
                )
            }
        };

        let mut body = json!({
            "error": code,
            "message": message,
        });
        if let Some(details) = details {
            body["details"] = details;
        }

        (status, axum::Json(body)).into_response()
    }
}

fn classify_core_error(core: &CoreError) -> (StatusCode, &'static str, String, Option<Value>) {
    match core {
        CoreError::NotFound { .. } => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            core.to_string(),
            None,
        ),
        CoreError::Validation { field, .. } => (
            StatusCode::BAD_REQUEST,
            "VALIDATION_ERROR",
            core.to_string(),
            Some(json!({ "field": field })),
        ),
        CoreError::ReferenceNotFound { kind, id } => (
            StatusCode::BAD_REQUEST,
            "REFERENCE_NOT_FOUND",
            core.to_string(),
            Some(json!({ "kind": kind.as_str(), "id": id })),
        ),
        CoreError::PairingMismatch { expected, actual } => (
            StatusCode::BAD_REQUEST,
            "PAIRING_MISMATCH",
            core.to_string(),
            Some(json!({ "expected": expected, "actual": actual })),
        ),
        CoreError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone(), None),
        CoreError::Unauthorized(msg) => {
            (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone(), None)
        }
        CoreError::Forbidden(msg) => (StatusCode::FORBIDDEN, "FORBIDDEN", msg.clone(), None),
        CoreError::Upload(msg) => {
            tracing::error!(error = %msg, "Upload failure");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "UPLOAD_FAILURE",
                "Failed to upload one or more files".to_string(),
                None,
            )
        }
        CoreError::Persistence(msg) => {
            tracing::error!(error = %msg, "Persistence failure");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "PERSISTENCE_FAILURE",
                "Failed to save changes".to_string(),
                None,
            )
        }
        CoreError::Internal(msg) => {
            tracing::error!(error = %msg, "Internal core error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                GENERIC_INTERNAL.to_string(),
                None,
            )
        }
    }
}

/// Classify a sqlx error into an HTTP status, error code, and message.
///
/// - `RowNotFound` maps to 404.
/// - Unique constraint violations (constraint name starting with `uq_`) map to 409.
/// - Everything else maps to 500 with a sanitized message.
fn classify_sqlx_error(err: &sqlx::Error) -> (StatusCode, &'static str, String) {
    match err {
        sqlx::Error::RowNotFound => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            "Resource not found".to_string(),
        ),
        sqlx::Error::Database(db_err) => {
            // PostgreSQL unique constraint violation: error code 23505
            if db_err.code().as_deref() == Some("23505") {
                let constraint = db_err.constraint().unwrap_or("unknown");
                if constraint.starts_with("uq_") {
                    return (
                        StatusCode::CONFLICT,
                        "CONFLICT",
                        format!("Duplicate value violates unique constraint: {constraint}"),
                    );
                }
            }
            tracing::error!(error = %db_err, "Database error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                GENERIC_INTERNAL.to_string(),
            )
        }
        other => {
            tracing::error!(error = %other, "Database error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                GENERIC_INTERNAL.to_string(),
            )
        }
    }
}
