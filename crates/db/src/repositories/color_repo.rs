//! Repository for the `colors` table.

use sqlx::PgPool;
use tiledash_core::types::DbId;

use crate::models::color::{Color, CreateColor, UpdateColor};

const COLUMNS: &str = "id, hex_code, no_background, created_at, updated_at";

/// Provides CRUD operations for colors.
pub struct ColorRepo;

impl ColorRepo {
    /// Insert a color. A duplicate hex code violates `uq_colors_hex_code`.
    pub async fn create(pool: &PgPool, input: &CreateColor) -> Result<Color, sqlx::Error> {
        let query = format!(
            "INSERT INTO colors (hex_code, no_background)
             VALUES ($1, $2)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Color>(&query)
            .bind(&input.hex_code)
            .bind(input.no_background)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Color>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM colors WHERE id = $1");
        sqlx::query_as::<_, Color>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Fetch every color whose id is in `ids`. Missing ids are skipped.
    pub async fn find_many(pool: &PgPool, ids: &[DbId]) -> Result<Vec<Color>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM colors WHERE id = ANY($1)");
        sqlx::query_as::<_, Color>(&query)
            .bind(ids)
            .fetch_all(pool)
            .await
    }

    /// List colors, most recently created first.
    pub async fn list(pool: &PgPool) -> Result<Vec<Color>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM colors ORDER BY created_at DESC, id DESC");
        sqlx::query_as::<_, Color>(&query).fetch_all(pool).await
    }

    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateColor,
    ) -> Result<Option<Color>, sqlx::Error> {
        let query = format!(
            "UPDATE colors SET
                hex_code = COALESCE($2, hex_code),
                no_background = COALESCE($3, no_background)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Color>(&query)
            .bind(id)
            .bind(&input.hex_code)
            .bind(input.no_background)
            .fetch_optional(pool)
            .await
    }

    /// Delete a color. Tiles referencing it keep the dangling id.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM colors WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
