//! Repository for the `tiles` table.

use sqlx::types::Json;
use sqlx::PgPool;
use tiledash_core::tile::{NewTile, TileRecord};
use tiledash_core::types::DbId;

use crate::models::tile::TileRow;

const COLUMNS: &str = "id, name, category_id, main_mask, background_color_id, grout_shape, \
                       shape_style, scale, sub_masks, border_mask, border_color_id, \
                       created_at, updated_at";

/// Provides CRUD operations for tiles.
pub struct TileRepo;

impl TileRepo {
    pub async fn create(pool: &PgPool, input: &NewTile) -> Result<TileRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO tiles
                (name, category_id, main_mask, background_color_id, grout_shape,
                 shape_style, scale, sub_masks, border_mask, border_color_id)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, TileRow>(&query)
            .bind(&input.name)
            .bind(input.category_id)
            .bind(Json(&input.main_mask))
            .bind(input.background_color_id)
            .bind(input.grout_shape.as_str())
            .bind(input.shape_style.as_str())
            .bind(input.scale)
            .bind(Json(&input.sub_masks))
            .bind(input.border_mask.as_ref().map(Json))
            .bind(input.border_color_id)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<TileRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM tiles WHERE id = $1");
        sqlx::query_as::<_, TileRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List tiles, most recently created first.
    pub async fn list(pool: &PgPool) -> Result<Vec<TileRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM tiles ORDER BY created_at DESC, id DESC");
        sqlx::query_as::<_, TileRow>(&query).fetch_all(pool).await
    }

    /// Overwrite every mutable column. `created_at` is never touched.
    ///
    /// Returns `None` if no row with the record's id exists.
    pub async fn replace(
        pool: &PgPool,
        record: &TileRecord,
    ) -> Result<Option<TileRow>, sqlx::Error> {
        let query = format!(
            "UPDATE tiles SET
                name = $2,
                category_id = $3,
                main_mask = $4,
                background_color_id = $5,
                grout_shape = $6,
                shape_style = $7,
                scale = $8,
                sub_masks = $9,
                border_mask = $10,
                border_color_id = $11
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, TileRow>(&query)
            .bind(record.id)
            .bind(&record.name)
            .bind(record.category_id)
            .bind(Json(&record.main_mask))
            .bind(record.background_color_id)
            .bind(record.grout_shape.as_str())
            .bind(record.shape_style.as_str())
            .bind(record.scale)
            .bind(Json(&record.sub_masks))
            .bind(record.border_mask.as_ref().map(Json))
            .bind(record.border_color_id)
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tiles WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
