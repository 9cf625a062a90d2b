//! Tile row model.
//!
//! Masks are stored as JSONB so a tile, including its ordered sub-masks, is
//! always written by a single statement.

use sqlx::types::Json;
use sqlx::FromRow;
use tiledash_core::assets::AssetRef;
use tiledash_core::error::CoreError;
use tiledash_core::tile::{SubMask, TileRecord};
use tiledash_core::types::{DbId, Timestamp};

/// A row from the `tiles` table.
#[derive(Debug, Clone, FromRow)]
pub struct TileRow {
    pub id: DbId,
    pub name: String,
    pub category_id: DbId,
    pub main_mask: Json<AssetRef>,
    pub background_color_id: Option<DbId>,
    pub grout_shape: String,
    pub shape_style: String,
    pub scale: f64,
    pub sub_masks: Json<Vec<SubMask>>,
    pub border_mask: Option<Json<AssetRef>>,
    pub border_color_id: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl TryFrom<TileRow> for TileRecord {
    type Error = CoreError;

    fn try_from(row: TileRow) -> Result<Self, Self::Error> {
        Ok(TileRecord {
            id: row.id,
            name: row.name,
            category_id: row.category_id,
            main_mask: row.main_mask.0,
            background_color_id: row.background_color_id,
            grout_shape: row.grout_shape.parse()?,
            shape_style: row.shape_style.parse()?,
            scale: row.scale,
            sub_masks: row.sub_masks.0,
            border_mask: row.border_mask.map(|m| m.0),
            border_color_id: row.border_color_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}
