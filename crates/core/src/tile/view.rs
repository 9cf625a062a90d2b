//! Read-side composition of tiles with their current references.

use std::collections::{HashMap, HashSet};

use serde::Serialize;

use crate::assets::AssetRef;
use crate::color::normalize_hex;
use crate::types::{DbId, Timestamp};

use super::{CategorySummary, ColorSwatch, GroutShape, ShapeStyle, SubMaskId, TileRecord};

/// Sub-mask as returned to clients.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubMaskView {
    pub id: SubMaskId,
    pub mask: AssetRef,
    pub color_id: DbId,
    pub color: Option<ColorSwatch>,
}

/// Tile as returned to clients.
///
/// Reference ids are always present. The resolved objects are `null` when
/// the referenced entity has been deleted.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TileView {
    pub id: DbId,
    pub name: String,
    pub category_id: DbId,
    pub category: Option<CategorySummary>,
    pub main_mask: AssetRef,
    pub background_color_id: Option<DbId>,
    pub background_color: Option<ColorSwatch>,
    pub grout_shape: GroutShape,
    pub shape_style: ShapeStyle,
    pub scale: f64,
    pub sub_masks: Vec<SubMaskView>,
    pub border_mask: Option<AssetRef>,
    pub border_color_id: Option<DbId>,
    pub border_color: Option<ColorSwatch>,
    pub colors_used: Vec<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Every color id a record references: background, border, sub-masks.
pub fn referenced_color_ids(record: &TileRecord) -> Vec<DbId> {
    let mut ids = Vec::with_capacity(record.sub_masks.len() + 2);
    ids.extend(record.background_color_id);
    ids.extend(record.border_color_id);
    ids.extend(record.sub_masks.iter().map(|s| s.color_id));
    ids
}

/// Hex codes of the colors a tile actually uses.
///
/// Order is background, border, then each sub-mask; duplicates by
/// normalized hex are dropped (first occurrence wins) and unresolvable ids
/// are skipped.
pub fn colors_used(record: &TileRecord, colors: &HashMap<DbId, ColorSwatch>) -> Vec<String> {
    let mut seen = HashSet::new();
    referenced_color_ids(record)
        .into_iter()
        .filter_map(|id| colors.get(&id))
        .filter_map(|swatch| {
            let hex = normalize_hex(&swatch.hex_code).unwrap_or_else(|_| swatch.hex_code.clone());
            seen.insert(hex.clone()).then_some(hex)
        })
        .collect()
}

/// Join a record with the current values of its references.
pub fn compose(
    record: TileRecord,
    category: Option<CategorySummary>,
    colors: &HashMap<DbId, ColorSwatch>,
) -> TileView {
    let colors_used = colors_used(&record, colors);
    let lookup = |id: Option<DbId>| id.and_then(|id| colors.get(&id).cloned());

    TileView {
        id: record.id,
        name: record.name,
        category_id: record.category_id,
        category,
        main_mask: record.main_mask,
        background_color_id: record.background_color_id,
        background_color: lookup(record.background_color_id),
        grout_shape: record.grout_shape,
        shape_style: record.shape_style,
        scale: record.scale,
        sub_masks: record
            .sub_masks
            .into_iter()
            .map(|s| SubMaskView {
                color: colors.get(&s.color_id).cloned(),
                id: s.id,
                mask: s.mask,
                color_id: s.color_id,
            })
            .collect(),
        border_mask: record.border_mask,
        border_color_id: record.border_color_id,
        border_color: lookup(record.border_color_id),
        colors_used,
        created_at: record.created_at,
        updated_at: record.updated_at,
    }
}
