//! Repository for the `drafts` table.

use sqlx::PgPool;
use tiledash_core::types::DbId;

use crate::models::draft::Draft;

const COLUMNS: &str = "id, user_id, workflow_kind, target, payload, updated_at";

pub struct DraftRepo;

impl DraftRepo {
    pub async fn find(
        pool: &PgPool,
        user_id: DbId,
        workflow_kind: &str,
        target: &str,
    ) -> Result<Option<Draft>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM drafts
             WHERE user_id = $1 AND workflow_kind = $2 AND target = $3"
        );
        sqlx::query_as::<_, Draft>(&query)
            .bind(user_id)
            .bind(workflow_kind)
            .bind(target)
            .fetch_optional(pool)
            .await
    }

    /// Insert or replace the draft for `(user_id, workflow_kind, target)`.
    pub async fn upsert(
        pool: &PgPool,
        user_id: DbId,
        workflow_kind: &str,
        target: &str,
        payload: &serde_json::Value,
    ) -> Result<Draft, sqlx::Error> {
        let query = format!(
            "INSERT INTO drafts (user_id, workflow_kind, target, payload)
             VALUES ($1, $2, $3, $4)
             ON CONFLICT ON CONSTRAINT uq_drafts_user_kind_target
             DO UPDATE SET payload = EXCLUDED.payload
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Draft>(&query)
            .bind(user_id)
            .bind(workflow_kind)
            .bind(target)
            .bind(payload)
            .fetch_one(pool)
            .await
    }

    pub async fn delete(
        pool: &PgPool,
        user_id: DbId,
        workflow_kind: &str,
        target: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "DELETE FROM drafts WHERE user_id = $1 AND workflow_kind = $2 AND target = $3",
        )
        .bind(user_id)
        .bind(workflow_kind)
        .bind(target)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
