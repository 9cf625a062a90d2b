//! Color entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use tiledash_core::tile::ColorSwatch;
use tiledash_core::types::{DbId, Timestamp};

/// A row from the `colors` table. `hex_code` is always lowercase `#rrggbb`.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Color {
    pub id: DbId,
    pub hex_code: String,
    pub no_background: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<Color> for ColorSwatch {
    fn from(c: Color) -> Self {
        Self {
            id: c.id,
            hex_code: c.hex_code,
            no_background: c.no_background,
        }
    }
}

/// DTO for creating a color. `hex_code` must already be normalized.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateColor {
    pub hex_code: String,
    #[serde(default)]
    pub no_background: bool,
}

/// DTO for updating a color. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateColor {
    pub hex_code: Option<String>,
    pub no_background: Option<bool>,
}
