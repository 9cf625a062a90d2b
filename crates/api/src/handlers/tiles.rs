//! Handlers for the `/tiles` resource.
//!
//! Mutations take `multipart/form-data`; see [`crate::multipart`] for the
//! accepted fields. All orchestration (validation, uploads, cleanup) lives
//! in the core tile workflow.

use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;
use tiledash_core::tile::view::TileView;
use tiledash_core::tile::{
    GroutShape, ShapeStyle, DEFAULT_SCALE, SCALE_MAX, SCALE_MIN, SCALE_STEP,
};
use tiledash_core::types::DbId;

use crate::error::AppResult;
use crate::middleware::rbac::RequireAdmin;
use crate::multipart::FormData;
use crate::response::{DataResponse, DeletedResponse};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct OptionItem {
    pub value: &'static str,
    pub label: &'static str,
}

#[derive(Debug, Serialize)]
pub struct ScaleRange {
    pub min: f64,
    pub max: f64,
    pub step: f64,
    pub default: f64,
}

/// Closed value sets the tile editor renders as pickers.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TileOptions {
    pub grout_shapes: Vec<OptionItem>,
    pub shape_styles: Vec<OptionItem>,
    pub scale: ScaleRange,
}

/// GET /api/v1/tiles/options
pub async fn options(RequireAdmin(_admin): RequireAdmin) -> Json<DataResponse<TileOptions>> {
    Json(DataResponse {
        data: TileOptions {
            grout_shapes: GroutShape::ALL
                .into_iter()
                .map(|g| OptionItem {
                    value: g.as_str(),
                    label: g.label(),
                })
                .collect(),
            shape_styles: ShapeStyle::ALL
                .into_iter()
                .map(|s| OptionItem {
                    value: s.as_str(),
                    label: s.label(),
                })
                .collect(),
            scale: ScaleRange {
                min: SCALE_MIN,
                max: SCALE_MAX,
                step: SCALE_STEP,
                default: DEFAULT_SCALE,
            },
        },
    })
}

// ---------------------------------------------------------------------------
// Reads
// ---------------------------------------------------------------------------

/// GET /api/v1/tiles
///
/// All tiles, newest first, with category and colors resolved.
pub async fn list(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<TileView>>>> {
    let tiles = state.tiles().list().await?;
    Ok(Json(DataResponse { data: tiles }))
}

/// GET /api/v1/tiles/{id}
pub async fn get_by_id(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<TileView>>> {
    let tile = state.tiles().get(id).await?;
    Ok(Json(DataResponse { data: tile }))
}

// ---------------------------------------------------------------------------
// Mutations
// ---------------------------------------------------------------------------

/// POST /api/v1/tiles
pub async fn create(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    multipart: Multipart,
) -> AppResult<(StatusCode, Json<DataResponse<TileView>>)> {
    let input = FormData::from_multipart(multipart).await?.into_create()?;
    let tile = state.tiles().create(input).await?;

    tracing::info!(
        user_id = admin.user_id,
        tile_id = tile.id,
        sub_masks = tile.sub_masks.len(),
        "Tile created"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: tile })))
}

/// PUT /api/v1/tiles/{id}
///
/// Partial update: only the fields present in the form change.
pub async fn update(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    multipart: Multipart,
) -> AppResult<Json<DataResponse<TileView>>> {
    let patch = FormData::from_multipart(multipart).await?.into_patch()?;
    let tile = state.tiles().update(id, patch).await?;

    tracing::info!(user_id = admin.user_id, tile_id = id, "Tile updated");

    Ok(Json(DataResponse { data: tile }))
}

/// DELETE /api/v1/tiles/{id}
///
/// Removes the record and every stored mask it owns.
pub async fn delete(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<DeletedResponse>>> {
    state.tiles().delete(id).await?;

    tracing::info!(user_id = admin.user_id, tile_id = id, "Tile deleted");

    Ok(Json(DataResponse {
        data: DeletedResponse { id, deleted: true },
    }))
}
