//! Password reset token rows.

use sqlx::FromRow;
use tiledash_core::types::{DbId, Timestamp};

/// Only the SHA-256 hash of the emailed token is stored.
#[derive(Debug, Clone, FromRow)]
pub struct PasswordResetToken {
    pub id: DbId,
    pub user_id: DbId,
    pub token_hash: String,
    pub expires_at: Timestamp,
    pub used_at: Option<Timestamp>,
    pub created_at: Timestamp,
}

#[derive(Debug)]
pub struct CreatePasswordResetToken {
    pub user_id: DbId,
    pub token_hash: String,
    pub expires_at: Timestamp,
}
