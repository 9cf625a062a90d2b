//! Repository for the `tile_submissions` table.

use sqlx::PgPool;
use tiledash_core::types::DbId;

use crate::models::submission::{CreateTileSubmission, TileSubmission};

const COLUMNS: &str = "id, name, email, phone_number, tile_quantity, tile_size, \
                       tile_pattern_image, tile_pattern_border_image, tile_id, pattern, \
                       created_at";

pub struct SubmissionRepo;

impl SubmissionRepo {
    pub async fn create(
        pool: &PgPool,
        input: &CreateTileSubmission,
    ) -> Result<TileSubmission, sqlx::Error> {
        let query = format!(
            "INSERT INTO tile_submissions
                (name, email, phone_number, tile_quantity, tile_size,
                 tile_pattern_image, tile_pattern_border_image, tile_id, pattern)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, TileSubmission>(&query)
            .bind(&input.name)
            .bind(&input.email)
            .bind(&input.phone_number)
            .bind(input.tile_quantity)
            .bind(&input.tile_size)
            .bind(&input.tile_pattern_image)
            .bind(&input.tile_pattern_border_image)
            .bind(input.tile_id)
            .bind(&input.pattern)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<TileSubmission>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM tile_submissions WHERE id = $1");
        sqlx::query_as::<_, TileSubmission>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Page through submissions, newest first.
    pub async fn list(
        pool: &PgPool,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<TileSubmission>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM tile_submissions
             ORDER BY created_at DESC, id DESC
             LIMIT $1 OFFSET $2"
        );
        sqlx::query_as::<_, TileSubmission>(&query)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM tile_submissions")
            .fetch_one(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tile_submissions WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
