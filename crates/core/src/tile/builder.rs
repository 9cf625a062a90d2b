//! Pure tile assembly.
//!
//! Nothing in here performs I/O. The workflow validates input with
//! [`validate_create`] / [`validate_patch`] before uploading anything, then
//! hands the uploaded [`AssetRef`]s back to [`assemble_new`] /
//! [`apply_patch`] to produce the record that gets persisted.

use std::collections::HashSet;

use uuid::Uuid;

use crate::assets::AssetRef;
use crate::error::{CoreError, ReferenceKind};
use crate::types::DbId;

use super::input::{CreateTileInput, TilePatch};
use super::{validate_scale, GroutShape, NewTile, ShapeStyle, SubMask, TileRecord, DEFAULT_SCALE};

/// Scalar fields of a create request after validation.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedCreate {
    pub name: String,
    pub category_id: DbId,
    pub background_color_id: Option<DbId>,
    pub grout_shape: GroutShape,
    pub shape_style: ShapeStyle,
    pub scale: f64,
    pub sub_mask_colors: Vec<DbId>,
    pub border_color_id: Option<DbId>,
}

/// Assets uploaded for a create request.
#[derive(Debug, Clone)]
pub struct CreateAssets {
    pub main: AssetRef,
    pub sub_masks: Vec<AssetRef>,
    pub border: Option<AssetRef>,
}

/// Assets uploaded for an update request.
#[derive(Debug, Clone, Default)]
pub struct PatchAssets {
    pub main: Option<AssetRef>,
    pub border: Option<AssetRef>,
    pub appended: Vec<AssetRef>,
}

/// Result of applying a patch.
#[derive(Debug, Clone)]
pub struct PatchOutcome {
    pub record: TileRecord,
    /// Assets no longer referenced by `record`. Delete these only after the
    /// record has been persisted.
    pub superseded: Vec<AssetRef>,
}

fn clean_name(raw: &str) -> Result<String, CoreError> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(CoreError::invalid("tileName", "Tile name must not be empty"));
    }
    Ok(name.to_string())
}

fn check_pairing(files: usize, colors: usize) -> Result<(), CoreError> {
    if files != colors {
        return Err(CoreError::PairingMismatch {
            expected: files,
            actual: colors,
        });
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Create
// ---------------------------------------------------------------------------

/// Check required fields and the pairing invariant of a create request.
pub fn validate_create(input: &CreateTileInput) -> Result<ValidatedCreate, CoreError> {
    let name = match input.name.as_deref() {
        Some(raw) => clean_name(raw)?,
        None => return Err(CoreError::missing("tileName")),
    };
    let category_id = input.category_id.ok_or_else(|| CoreError::missing("category"))?;
    if input.main_mask.is_none() {
        return Err(CoreError::missing("mainMask"));
    }

    let scale = input.scale.unwrap_or(DEFAULT_SCALE);
    validate_scale(scale)?;

    if input.border_color_id.is_some() && input.border_mask.is_none() {
        return Err(CoreError::invalid(
            "borderColor",
            "A border color requires a border mask",
        ));
    }

    check_pairing(input.sub_masks.len(), input.sub_mask_colors.len())?;

    Ok(ValidatedCreate {
        name,
        category_id,
        background_color_id: input.background_color_id,
        grout_shape: input.grout_shape.unwrap_or_default(),
        shape_style: input.shape_style.unwrap_or_default(),
        scale,
        sub_mask_colors: input.sub_mask_colors.clone(),
        border_color_id: input.border_color_id,
    })
}

/// Combine validated fields and uploaded assets into a new tile.
///
/// Sub-masks keep the order in which their files were supplied.
pub fn assemble_new(fields: ValidatedCreate, assets: CreateAssets) -> Result<NewTile, CoreError> {
    check_pairing(assets.sub_masks.len(), fields.sub_mask_colors.len())?;

    let sub_masks = assets
        .sub_masks
        .into_iter()
        .zip(fields.sub_mask_colors)
        .map(|(mask, color_id)| SubMask {
            id: Uuid::new_v4(),
            mask,
            color_id,
        })
        .collect();

    Ok(NewTile {
        name: fields.name,
        category_id: fields.category_id,
        main_mask: assets.main,
        background_color_id: fields.background_color_id,
        grout_shape: fields.grout_shape,
        shape_style: fields.shape_style,
        scale: fields.scale,
        sub_masks,
        border_mask: assets.border,
        border_color_id: fields.border_color_id,
    })
}

// ---------------------------------------------------------------------------
// Update
// ---------------------------------------------------------------------------

/// Check a patch against the current record without touching any asset.
pub fn validate_patch(current: &TileRecord, patch: &TilePatch) -> Result<(), CoreError> {
    if let Some(name) = &patch.name {
        clean_name(name)?;
    }
    if let Some(scale) = patch.scale {
        validate_scale(scale)?;
    }
    if patch.remove_border_mask && patch.border_mask.is_some() {
        return Err(CoreError::invalid(
            "removeBorderMask",
            "Cannot replace and remove the border mask in the same request",
        ));
    }

    let changes = &patch.sub_masks;
    check_pairing(changes.appended.len(), changes.appended_colors.len())?;

    let existing: HashSet<Uuid> = current.sub_masks.iter().map(|s| s.id).collect();
    for id in &changes.deleted {
        if !existing.contains(id) {
            return Err(CoreError::reference(ReferenceKind::SubMask, id));
        }
    }
    let deleted: HashSet<Uuid> = changes.deleted.iter().copied().collect();
    for (id, _) in &changes.recolor {
        if !existing.contains(id) {
            return Err(CoreError::reference(ReferenceKind::SubMask, id));
        }
        if deleted.contains(id) {
            return Err(CoreError::invalid(
                "recolorSubMasks",
                format!("Sub-mask '{id}' is deleted in the same request"),
            ));
        }
    }

    let has_border = if patch.border_mask.is_some() {
        true
    } else if patch.remove_border_mask {
        false
    } else {
        current.border_mask.is_some()
    };
    if matches!(patch.border_color_id, Some(Some(_))) && !has_border {
        return Err(CoreError::invalid(
            "borderColor",
            "A border color requires a border mask",
        ));
    }

    Ok(())
}

/// Apply a validated patch and the assets uploaded for it.
///
/// The three update modes compose: scalar fields, mask replacement and
/// sub-mask mutation are applied independently. Final sub-mask order is the
/// surviving originals in their original order followed by appended entries.
pub fn apply_patch(
    current: &TileRecord,
    patch: &TilePatch,
    assets: PatchAssets,
) -> Result<PatchOutcome, CoreError> {
    validate_patch(current, patch)?;
    check_pairing(assets.appended.len(), patch.sub_masks.appended_colors.len())?;

    let mut record = current.clone();
    let mut superseded = Vec::new();

    // Scalars.
    if let Some(name) = &patch.name {
        record.name = clean_name(name)?;
    }
    if let Some(category_id) = patch.category_id {
        record.category_id = category_id;
    }
    if let Some(background) = patch.background_color_id {
        record.background_color_id = background;
    }
    if let Some(grout) = patch.grout_shape {
        record.grout_shape = grout;
    }
    if let Some(style) = patch.shape_style {
        record.shape_style = style;
    }
    if let Some(scale) = patch.scale {
        record.scale = scale;
    }

    // Masks.
    if let Some(main) = assets.main {
        superseded.push(std::mem::replace(&mut record.main_mask, main));
    }
    if let Some(border) = assets.border {
        superseded.extend(record.border_mask.replace(border));
    } else if patch.remove_border_mask {
        superseded.extend(record.border_mask.take());
        record.border_color_id = None;
    }
    if let Some(border_color) = patch.border_color_id {
        record.border_color_id = border_color;
    }

    // Sub-masks.
    let changes = &patch.sub_masks;
    let deleted: HashSet<Uuid> = changes.deleted.iter().copied().collect();
    let mut survivors = Vec::with_capacity(record.sub_masks.len() + assets.appended.len());
    for mut sub in record.sub_masks.drain(..) {
        if deleted.contains(&sub.id) {
            superseded.push(sub.mask);
            continue;
        }
        if let Some((_, color)) = changes.recolor.iter().rev().find(|(id, _)| *id == sub.id) {
            sub.color_id = *color;
        }
        survivors.push(sub);
    }
    survivors.extend(
        assets
            .appended
            .into_iter()
            .zip(changes.appended_colors.iter().copied())
            .map(|(mask, color_id)| SubMask {
                id: Uuid::new_v4(),
                mask,
                color_id,
            }),
    );
    record.sub_masks = survivors;

    Ok(PatchOutcome { record, superseded })
}
