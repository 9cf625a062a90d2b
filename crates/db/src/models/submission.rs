//! Customer tile submission model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use tiledash_core::types::{DbId, Timestamp};

/// A row from the `tile_submissions` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TileSubmission {
    pub id: DbId,
    pub name: String,
    pub email: String,
    pub phone_number: String,
    pub tile_quantity: f64,
    pub tile_size: String,
    pub tile_pattern_image: String,
    pub tile_pattern_border_image: Option<String>,
    /// Weak reference; the tile may since have been deleted.
    pub tile_id: Option<DbId>,
    pub pattern: serde_json::Value,
    pub created_at: Timestamp,
}

/// DTO for creating a submission.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTileSubmission {
    pub name: String,
    pub email: String,
    pub phone_number: String,
    pub tile_quantity: f64,
    pub tile_size: String,
    pub tile_pattern_image: String,
    pub tile_pattern_border_image: Option<String>,
    pub tile_id: Option<DbId>,
    #[serde(default = "empty_pattern")]
    pub pattern: serde_json::Value,
}

fn empty_pattern() -> serde_json::Value {
    serde_json::Value::Object(Default::default())
}
