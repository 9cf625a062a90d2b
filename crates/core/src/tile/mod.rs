//! Tile records and the composition workflow around them.
//!
//! - [`input`] -- normalized create/patch payloads.
//! - [`builder`] -- pure assembly of records from validated input.
//! - [`ledger`] -- request-scoped tracking and rollback of uploaded assets.
//! - [`view`] -- read-time join producing the response shape.
//! - [`workflow`] -- orchestration over the lookup/store/object-store seams.

pub mod builder;
pub mod input;
pub mod ledger;
pub mod view;
pub mod workflow;

#[cfg(test)]
pub(crate) mod fakes;

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::assets::AssetRef;
use crate::error::CoreError;
use crate::types::{DbId, Timestamp};

// ---------------------------------------------------------------------------
// Scale
// ---------------------------------------------------------------------------

pub const SCALE_MIN: f64 = 0.1;
pub const SCALE_MAX: f64 = 10.0;
pub const SCALE_STEP: f64 = 0.1;
pub const DEFAULT_SCALE: f64 = 1.0;

/// Validate a rendering scale multiplier.
pub fn validate_scale(scale: f64) -> Result<(), CoreError> {
    if scale.is_finite() && (SCALE_MIN..=SCALE_MAX).contains(&scale) {
        Ok(())
    } else {
        Err(CoreError::invalid(
            "scale",
            format!("Scale must be between {SCALE_MIN} and {SCALE_MAX}, got {scale}"),
        ))
    }
}

// ---------------------------------------------------------------------------
// Closed enums
// ---------------------------------------------------------------------------

/// Grout pattern drawn between tiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GroutShape {
    #[default]
    Square,
    NoGrout,
    H2Lines,
}

impl GroutShape {
    pub const ALL: [GroutShape; 3] = [Self::Square, Self::NoGrout, Self::H2Lines];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Square => "square",
            Self::NoGrout => "no-grout",
            Self::H2Lines => "h2-lines",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Square => "Square",
            Self::NoGrout => "No Grout",
            Self::H2Lines => "H2 Lines",
        }
    }
}

/// Tile silhouette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ShapeStyle {
    #[default]
    Square,
    Hexagon,
    Lola,
    #[serde(rename = "rectangle-2x8")]
    Rectangle2x8,
    Triangle,
    #[serde(rename = "rectangle-4x8")]
    Rectangle4x8,
    Arabesquare,
}

impl ShapeStyle {
    pub const ALL: [ShapeStyle; 7] = [
        Self::Square,
        Self::Hexagon,
        Self::Lola,
        Self::Rectangle2x8,
        Self::Triangle,
        Self::Rectangle4x8,
        Self::Arabesquare,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Square => "square",
            Self::Hexagon => "hexagon",
            Self::Lola => "lola",
            Self::Rectangle2x8 => "rectangle-2x8",
            Self::Triangle => "triangle",
            Self::Rectangle4x8 => "rectangle-4x8",
            Self::Arabesquare => "arabesquare",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Square => "Square",
            Self::Hexagon => "Hexagon",
            Self::Lola => "Lola",
            Self::Rectangle2x8 => "Rectangle 2x8",
            Self::Triangle => "Triangle",
            Self::Rectangle4x8 => "Rectangle 4x8",
            Self::Arabesquare => "Arabesquare",
        }
    }
}

/// Reduce `"No Grout"`, `"no_grout"` and `"no-grout"` to the same slug.
fn slugify(raw: &str) -> String {
    raw.trim()
        .to_lowercase()
        .chars()
        .map(|c| if c == ' ' || c == '_' { '-' } else { c })
        .collect()
}

impl FromStr for GroutShape {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let slug = slugify(s);
        Self::ALL
            .into_iter()
            .find(|g| g.as_str() == slug)
            .ok_or_else(|| {
                CoreError::invalid(
                    "groutShape",
                    format!("Unknown grout shape '{s}'. Must be one of: square, no-grout, h2-lines"),
                )
            })
    }
}

impl FromStr for ShapeStyle {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let slug = slugify(s);
        Self::ALL
            .into_iter()
            .find(|st| st.as_str() == slug)
            .ok_or_else(|| {
                CoreError::invalid("shapeStyle", format!("Unknown shape style '{s}'"))
            })
    }
}

impl fmt::Display for GroutShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for ShapeStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// Stable identifier of a sub-mask within its tile.
pub type SubMaskId = Uuid;

/// One colorable layer of a tile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubMask {
    pub id: SubMaskId,
    pub mask: AssetRef,
    pub color_id: DbId,
}

/// A persisted tile.
#[derive(Debug, Clone, PartialEq)]
pub struct TileRecord {
    pub id: DbId,
    pub name: String,
    pub category_id: DbId,
    pub main_mask: AssetRef,
    pub background_color_id: Option<DbId>,
    pub grout_shape: GroutShape,
    pub shape_style: ShapeStyle,
    pub scale: f64,
    pub sub_masks: Vec<SubMask>,
    pub border_mask: Option<AssetRef>,
    pub border_color_id: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl TileRecord {
    /// Every stored asset this tile owns: main, sub-masks, then border.
    pub fn owned_assets(&self) -> Vec<AssetRef> {
        let mut assets = Vec::with_capacity(self.sub_masks.len() + 2);
        assets.push(self.main_mask.clone());
        assets.extend(self.sub_masks.iter().map(|s| s.mask.clone()));
        if let Some(border) = &self.border_mask {
            assets.push(border.clone());
        }
        assets
    }
}

/// A tile that has not been persisted yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTile {
    pub name: String,
    pub category_id: DbId,
    pub main_mask: AssetRef,
    pub background_color_id: Option<DbId>,
    pub grout_shape: GroutShape,
    pub shape_style: ShapeStyle,
    pub scale: f64,
    pub sub_masks: Vec<SubMask>,
    pub border_mask: Option<AssetRef>,
    pub border_color_id: Option<DbId>,
}

// ---------------------------------------------------------------------------
// Resolved references
// ---------------------------------------------------------------------------

/// Current value of a referenced color.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ColorSwatch {
    pub id: DbId,
    pub hex_code: String,
    pub no_background: bool,
}

/// Current value of a referenced category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategorySummary {
    pub id: DbId,
    pub name: String,
    pub is_border_category: bool,
}

// ---------------------------------------------------------------------------
// Seams
// ---------------------------------------------------------------------------

/// Lookup of referenced entities by id.
///
/// Missing ids are simply absent from the result; callers decide whether
/// that is an error (writes) or a dangling reference (reads).
#[async_trait]
pub trait CatalogLookup: Send + Sync {
    async fn categories(&self, ids: &[DbId]) -> Result<Vec<CategorySummary>, CoreError>;

    async fn colors(&self, ids: &[DbId]) -> Result<Vec<ColorSwatch>, CoreError>;
}

/// Tile persistence.
#[async_trait]
pub trait TileStore: Send + Sync {
    async fn insert(&self, tile: &NewTile) -> Result<TileRecord, CoreError>;

    async fn find(&self, id: DbId) -> Result<Option<TileRecord>, CoreError>;

    /// All tiles, newest first.
    async fn list(&self) -> Result<Vec<TileRecord>, CoreError>;

    /// Overwrite every mutable field of `tile`. Returns `None` if it no
    /// longer exists.
    async fn replace(&self, tile: &TileRecord) -> Result<Option<TileRecord>, CoreError>;

    /// Returns `true` if a row was deleted.
    async fn delete(&self, id: DbId) -> Result<bool, CoreError>;
}
