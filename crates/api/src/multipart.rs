//! Multipart form normalization.
//!
//! Tile forms arrive as `multipart/form-data` with repeated fields for
//! sub-masks. [`FormData`] collects every part once, always as arrays, and
//! converts into the core payloads. Field names are canonicalized: a
//! trailing `[]` is dropped and `name` is accepted as an alias of
//! `tileName`.

use std::collections::HashMap;
use std::str::FromStr;

use axum::extract::Multipart;
use tiledash_core::assets::IncomingFile;
use tiledash_core::error::CoreError;
use tiledash_core::tile::input::{CreateTileInput, SubMaskChanges, TilePatch};
use tiledash_core::tile::{GroutShape, ShapeStyle};
use tiledash_core::types::DbId;
use uuid::Uuid;

use crate::error::AppResult;

pub const TILE_NAME: &str = "tileName";
pub const CATEGORY: &str = "category";
pub const BACKGROUND_COLOR: &str = "backgroundColor";
pub const GROUT_SHAPE: &str = "groutShape";
pub const SHAPE_STYLE: &str = "shapeStyle";
pub const SCALE: &str = "scale";
pub const MAIN_MASK: &str = "mainMask";
pub const TILE_MASKS: &str = "tileMasks";
pub const TILE_MASK_COLORS: &str = "tileMaskColors";
pub const BORDER_MASK: &str = "borderMask";
pub const BORDER_COLOR: &str = "borderColor";
pub const REMOVE_BORDER_MASK: &str = "removeBorderMask";
pub const DELETED_SUB_MASKS: &str = "deletedSubMasks";
pub const RECOLOR_SUB_MASKS: &str = "recolorSubMasks";

/// Most `tileMasks` files one request may carry.
pub const MAX_SUB_MASK_UPLOADS: usize = 10;

const ALIASES: &[(&str, &str)] = &[("name", TILE_NAME)];

fn canonical_name(raw: &str) -> String {
    let name = raw.trim();
    let name = name.strip_suffix("[]").unwrap_or(name);
    ALIASES
        .iter()
        .find(|(alias, _)| *alias == name)
        .map(|(_, canonical)| canonical.to_string())
        .unwrap_or_else(|| name.to_string())
}

/// All parts of a multipart body, grouped by canonical field name.
#[derive(Debug, Default)]
pub struct FormData {
    texts: HashMap<String, Vec<String>>,
    files: HashMap<String, Vec<IncomingFile>>,
}

impl FormData {
    /// Drain a multipart body.
    ///
    /// Parts with a file name are files; everything else is text. Empty file
    /// parts without a name (an untouched `<input type="file">`) are skipped.
    pub async fn from_multipart(mut multipart: Multipart) -> AppResult<Self> {
        let mut form = Self::default();
        while let Some(field) = multipart.next_field().await? {
            let name = canonical_name(field.name().unwrap_or(""));
            if name.is_empty() {
                continue;
            }
            match field.file_name().map(str::to_string) {
                Some(file_name) => {
                    let bytes = field.bytes().await?;
                    if file_name.is_empty() && bytes.is_empty() {
                        continue;
                    }
                    form.push_file(name, IncomingFile::new(file_name, bytes.to_vec()));
                }
                None => {
                    let text = field.text().await?;
                    form.push_text(name, text);
                }
            }
        }
        tracing::debug!(
            texts = form.texts.len(),
            files = form.files.values().map(Vec::len).sum::<usize>(),
            "Parsed multipart form"
        );
        Ok(form)
    }

    pub fn push_text(&mut self, name: impl AsRef<str>, value: impl Into<String>) {
        self.texts
            .entry(canonical_name(name.as_ref()))
            .or_default()
            .push(value.into());
    }

    pub fn push_file(&mut self, name: impl AsRef<str>, file: IncomingFile) {
        self.files
            .entry(canonical_name(name.as_ref()))
            .or_default()
            .push(file);
    }

    pub fn has_text(&self, name: &str) -> bool {
        self.texts.contains_key(name)
    }

    /// Last value of a text field, trimmed.
    pub fn text(&self, name: &str) -> Option<&str> {
        self.texts
            .get(name)
            .and_then(|values| values.last())
            .map(|v| v.trim())
    }

    /// Every value of a repeated text field. Comma-joined values are split.
    fn values(&self, name: &str) -> Vec<&str> {
        self.texts
            .get(name)
            .map(|values| {
                values
                    .iter()
                    .flat_map(|v| v.split(','))
                    .map(str::trim)
                    .filter(|v| !v.is_empty())
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn take_file(&mut self, name: &str) -> Option<IncomingFile> {
        self.files
            .get_mut(name)
            .filter(|files| !files.is_empty())
            .map(|files| files.remove(0))
    }

    pub fn take_files(&mut self, name: &str) -> Vec<IncomingFile> {
        self.files.remove(name).unwrap_or_default()
    }

    /// Every `tileMasks` file, rejecting more than [`MAX_SUB_MASK_UPLOADS`].
    fn sub_mask_files(&mut self) -> Result<Vec<IncomingFile>, CoreError> {
        let files = self.take_files(TILE_MASKS);
        if files.len() > MAX_SUB_MASK_UPLOADS {
            return Err(CoreError::invalid(
                TILE_MASKS,
                format!(
                    "At most {MAX_SUB_MASK_UPLOADS} sub-mask files per request, got {}",
                    files.len()
                ),
            ));
        }
        Ok(files)
    }

    fn parsed<T: FromStr<Err = CoreError>>(&self, field: &'static str) -> Result<Option<T>, CoreError> {
        self.text(field)
            .filter(|v| !v.is_empty())
            .map(str::parse)
            .transpose()
    }

    fn id(&self, field: &'static str) -> Result<Option<DbId>, CoreError> {
        self.text(field)
            .filter(|v| !v.is_empty())
            .map(|v| parse_id(field, v))
            .transpose()
    }

    /// `None` when absent, `Some(None)` when sent empty or as `null`.
    fn nullable_id(&self, field: &'static str) -> Result<Option<Option<DbId>>, CoreError> {
        if !self.has_text(field) {
            return Ok(None);
        }
        match self.text(field) {
            None | Some("") | Some("null") => Ok(Some(None)),
            Some(v) => parse_id(field, v).map(|id| Some(Some(id))),
        }
    }

    fn ids(&self, field: &'static str) -> Result<Vec<DbId>, CoreError> {
        self.values(field)
            .into_iter()
            .map(|v| parse_id(field, v))
            .collect()
    }

    fn scale(&self) -> Result<Option<f64>, CoreError> {
        self.text(SCALE)
            .filter(|v| !v.is_empty())
            .map(|v| {
                v.parse::<f64>()
                    .map_err(|_| CoreError::invalid(SCALE, format!("'{v}' is not a number")))
            })
            .transpose()
    }

    fn flag(&self, field: &str) -> bool {
        matches!(self.text(field), Some("true" | "1" | "on"))
    }

    fn uuids(&self, field: &'static str) -> Result<Vec<Uuid>, CoreError> {
        self.values(field)
            .into_iter()
            .map(|v| parse_uuid(field, v))
            .collect()
    }

    /// `recolorSubMasks` entries of the form `<uuid>:<colorId>`.
    fn recolors(&self) -> Result<Vec<(Uuid, DbId)>, CoreError> {
        self.values(RECOLOR_SUB_MASKS)
            .into_iter()
            .map(|entry| {
                let (id, color) = entry.split_once(':').ok_or_else(|| {
                    CoreError::invalid(
                        RECOLOR_SUB_MASKS,
                        format!("'{entry}' must look like <subMaskId>:<colorId>"),
                    )
                })?;
                Ok((
                    parse_uuid(RECOLOR_SUB_MASKS, id.trim())?,
                    parse_id(RECOLOR_SUB_MASKS, color.trim())?,
                ))
            })
            .collect()
    }

    /// Normalize into a create payload.
    pub fn into_create(mut self) -> Result<CreateTileInput, CoreError> {
        Ok(CreateTileInput {
            name: self.text(TILE_NAME).map(str::to_string),
            category_id: self.id(CATEGORY)?,
            background_color_id: self.nullable_id(BACKGROUND_COLOR)?.flatten(),
            grout_shape: self.parsed::<GroutShape>(GROUT_SHAPE)?,
            shape_style: self.parsed::<ShapeStyle>(SHAPE_STYLE)?,
            scale: self.scale()?,
            sub_mask_colors: self.ids(TILE_MASK_COLORS)?,
            border_color_id: self.nullable_id(BORDER_COLOR)?.flatten(),
            main_mask: self.take_file(MAIN_MASK),
            sub_masks: self.sub_mask_files()?,
            border_mask: self.take_file(BORDER_MASK),
        })
    }

    /// Normalize into a partial update. Absent fields stay `None`.
    pub fn into_patch(mut self) -> Result<TilePatch, CoreError> {
        let deleted = self.uuids(DELETED_SUB_MASKS)?;
        let recolor = self.recolors()?;
        let appended_colors = self.ids(TILE_MASK_COLORS)?;

        Ok(TilePatch {
            name: self.text(TILE_NAME).map(str::to_string),
            category_id: self.id(CATEGORY)?,
            background_color_id: self.nullable_id(BACKGROUND_COLOR)?,
            grout_shape: self.parsed::<GroutShape>(GROUT_SHAPE)?,
            shape_style: self.parsed::<ShapeStyle>(SHAPE_STYLE)?,
            scale: self.scale()?,
            border_color_id: self.nullable_id(BORDER_COLOR)?,
            remove_border_mask: self.flag(REMOVE_BORDER_MASK),
            main_mask: self.take_file(MAIN_MASK),
            border_mask: self.take_file(BORDER_MASK),
            sub_masks: SubMaskChanges {
                deleted,
                recolor,
                appended: self.sub_mask_files()?,
                appended_colors,
            },
        })
    }
}

fn parse_id(field: &'static str, raw: &str) -> Result<DbId, CoreError> {
    match raw.parse::<DbId>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(CoreError::invalid(field, format!("'{raw}' is not a valid id"))),
    }
}

fn parse_uuid(field: &'static str, raw: &str) -> Result<Uuid, CoreError> {
    Uuid::parse_str(raw)
        .map_err(|_| CoreError::invalid(field, format!("'{raw}' is not a valid sub-mask id")))
}
