//! Handlers for the `/colors` resource.
//!
//! Hex codes are normalized to lowercase `#rrggbb` before they are stored,
//! so `#ABC` and `#aabbcc` collide on the unique index and yield 409.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use tiledash_core::color::normalize_hex;
use tiledash_core::error::CoreError;
use tiledash_core::types::DbId;
use tiledash_db::models::color::{Color, CreateColor, UpdateColor};
use tiledash_db::repositories::ColorRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::response::{DataResponse, DeletedResponse};
use crate::state::AppState;

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound { entity: "color", id })
}

/// GET /api/v1/colors
pub async fn list(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<Color>>>> {
    let colors = ColorRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: colors }))
}

/// GET /api/v1/colors/{id}
pub async fn get_by_id(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Color>>> {
    let color = ColorRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse { data: color }))
}

/// POST /api/v1/colors (also mounted at /api/v1/colors/add)
pub async fn create(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Json(mut input): Json<CreateColor>,
) -> AppResult<(StatusCode, Json<DataResponse<Color>>)> {
    input.hex_code = normalize_hex(&input.hex_code)?;
    let color = ColorRepo::create(&state.pool, &input).await?;

    tracing::info!(
        user_id = admin.user_id,
        color_id = color.id,
        hex = %color.hex_code,
        "Color created"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: color })))
}

/// PUT /api/v1/colors/{id}
pub async fn update(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(mut input): Json<UpdateColor>,
) -> AppResult<Json<DataResponse<Color>>> {
    if let Some(hex) = &input.hex_code {
        input.hex_code = Some(normalize_hex(hex)?);
    }
    let color = ColorRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| not_found(id))?;

    tracing::info!(user_id = admin.user_id, color_id = id, "Color updated");

    Ok(Json(DataResponse { data: color }))
}

/// DELETE /api/v1/colors/{id}
///
/// Tiles referencing the color keep the id; it simply stops resolving.
pub async fn delete(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<DeletedResponse>>> {
    if !ColorRepo::delete(&state.pool, id).await? {
        return Err(not_found(id));
    }

    tracing::info!(user_id = admin.user_id, color_id = id, "Color deleted");

    Ok(Json(DataResponse {
        data: DeletedResponse { id, deleted: true },
    }))
}
