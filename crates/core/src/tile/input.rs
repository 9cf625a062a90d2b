//! Normalized tile payloads.
//!
//! The HTTP boundary turns multipart forms into these structs once; the
//! workflow and builder never see raw form fields.

use crate::assets::IncomingFile;
use crate::types::DbId;

use super::{GroutShape, ShapeStyle, SubMaskId};

/// Everything needed to create a tile.
#[derive(Debug, Clone, Default)]
pub struct CreateTileInput {
    pub name: Option<String>,
    pub category_id: Option<DbId>,
    pub background_color_id: Option<DbId>,
    pub grout_shape: Option<GroutShape>,
    pub shape_style: Option<ShapeStyle>,
    pub scale: Option<f64>,
    pub main_mask: Option<IncomingFile>,
    pub sub_masks: Vec<IncomingFile>,
    pub sub_mask_colors: Vec<DbId>,
    pub border_mask: Option<IncomingFile>,
    pub border_color_id: Option<DbId>,
}

/// Partial update of a tile.
///
/// `None` leaves a field unchanged. For nullable references,
/// `Some(None)` clears the value.
#[derive(Debug, Clone, Default)]
pub struct TilePatch {
    pub name: Option<String>,
    pub category_id: Option<DbId>,
    pub background_color_id: Option<Option<DbId>>,
    pub grout_shape: Option<GroutShape>,
    pub shape_style: Option<ShapeStyle>,
    pub scale: Option<f64>,
    pub main_mask: Option<IncomingFile>,
    pub border_mask: Option<IncomingFile>,
    pub border_color_id: Option<Option<DbId>>,
    pub remove_border_mask: bool,
    pub sub_masks: SubMaskChanges,
}

/// Sub-mask mutations applied in one update.
#[derive(Debug, Clone, Default)]
pub struct SubMaskChanges {
    pub deleted: Vec<SubMaskId>,
    pub recolor: Vec<(SubMaskId, DbId)>,
    pub appended: Vec<IncomingFile>,
    pub appended_colors: Vec<DbId>,
}

impl SubMaskChanges {
    pub fn is_empty(&self) -> bool {
        self.deleted.is_empty()
            && self.recolor.is_empty()
            && self.appended.is_empty()
            && self.appended_colors.is_empty()
    }
}

impl TilePatch {
    /// Color ids this patch introduces, in request order: background,
    /// border, recolor targets, appended sub-mask colors.
    pub fn referenced_color_ids(&self) -> Vec<DbId> {
        let mut ids = Vec::new();
        if let Some(Some(id)) = self.background_color_id {
            ids.push(id);
        }
        if let Some(Some(id)) = self.border_color_id {
            ids.push(id);
        }
        ids.extend(self.sub_masks.recolor.iter().map(|(_, color)| *color));
        ids.extend(self.sub_masks.appended_colors.iter().copied());
        ids
    }
}

impl CreateTileInput {
    /// Color ids in request order: background, border, each sub-mask.
    pub fn referenced_color_ids(&self) -> Vec<DbId> {
        let mut ids = Vec::with_capacity(self.sub_mask_colors.len() + 2);
        ids.extend(self.background_color_id);
        ids.extend(self.border_color_id);
        ids.extend(self.sub_mask_colors.iter().copied());
        ids
    }
}
