//! Repository for the `password_reset_tokens` table.

use sqlx::PgPool;
use tiledash_core::types::DbId;

use crate::models::password_reset::{CreatePasswordResetToken, PasswordResetToken};

const COLUMNS: &str = "id, user_id, token_hash, expires_at, used_at, created_at";

pub struct PasswordResetRepo;

impl PasswordResetRepo {
    /// Store a new token, invalidating any earlier unused tokens for the user.
    pub async fn create(
        pool: &PgPool,
        input: &CreatePasswordResetToken,
    ) -> Result<PasswordResetToken, sqlx::Error> {
        let mut tx = pool.begin().await?;

        sqlx::query(
            "UPDATE password_reset_tokens SET used_at = NOW()
             WHERE user_id = $1 AND used_at IS NULL",
        )
        .bind(input.user_id)
        .execute(&mut *tx)
        .await?;

        let query = format!(
            "INSERT INTO password_reset_tokens (user_id, token_hash, expires_at)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        let token = sqlx::query_as::<_, PasswordResetToken>(&query)
            .bind(input.user_id)
            .bind(&input.token_hash)
            .bind(input.expires_at)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(token)
    }

    /// Find an unused, unexpired token by its hash.
    pub async fn find_active(
        pool: &PgPool,
        token_hash: &str,
    ) -> Result<Option<PasswordResetToken>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM password_reset_tokens
             WHERE token_hash = $1 AND used_at IS NULL AND expires_at > NOW()"
        );
        sqlx::query_as::<_, PasswordResetToken>(&query)
            .bind(token_hash)
            .fetch_optional(pool)
            .await
    }

    /// Mark a token as used. Returns `false` if it was already used.
    pub async fn mark_used(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE password_reset_tokens SET used_at = NOW()
             WHERE id = $1 AND used_at IS NULL",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
