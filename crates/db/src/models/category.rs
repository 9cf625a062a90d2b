//! Category entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use tiledash_core::assets::AssetRef;
use tiledash_core::tile::CategorySummary;
use tiledash_core::types::{DbId, Timestamp};

/// A row from the `categories` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub is_border_category: bool,
    pub border_mask: Option<Json<AssetRef>>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<Category> for CategorySummary {
    fn from(c: Category) -> Self {
        Self {
            id: c.id,
            name: c.name,
            is_border_category: c.is_border_category,
        }
    }
}

/// DTO for creating a category.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCategory {
    pub name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub is_border_category: bool,
}

/// DTO for updating a category. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCategory {
    pub name: Option<String>,
    pub description: Option<String>,
    pub is_border_category: Option<bool>,
}
