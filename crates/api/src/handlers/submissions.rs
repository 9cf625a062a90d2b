//! Handlers for the `/tile-submissions` resource.
//!
//! Customers submit a configured tile without signing in; admins page
//! through and prune the submissions.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use tiledash_core::error::CoreError;
use tiledash_core::submission::{clamp_limit, clamp_offset, validate_image_url, validate_quantity};
use tiledash_core::types::DbId;
use tiledash_core::users::normalize_email;
use tiledash_db::models::submission::{CreateTileSubmission, TileSubmission};
use tiledash_db::repositories::SubmissionRepo;
use validator::ValidateEmail;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::query::PaginationParams;
use crate::response::{DataResponse, DeletedResponse, Page};
use crate::state::AppState;

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "tile submission",
        id,
    })
}

fn require(field: &'static str, value: &str) -> Result<(), CoreError> {
    if value.trim().is_empty() {
        Err(CoreError::missing(field))
    } else {
        Ok(())
    }
}

/// Field checks for a customer submission. Normalizes the email in place.
fn validate_submission(input: &mut CreateTileSubmission) -> Result<(), CoreError> {
    require("name", &input.name)?;
    require("phoneNumber", &input.phone_number)?;
    require("tileSize", &input.tile_size)?;

    input.email = normalize_email(&input.email);
    if !input.email.validate_email() {
        return Err(CoreError::invalid("email", "Must be a valid email address"));
    }

    validate_quantity(input.tile_quantity)?;
    validate_image_url("tilePatternImage", &input.tile_pattern_image)?;
    if let Some(border) = &input.tile_pattern_border_image {
        validate_image_url("tilePatternBorderImage", border)?;
    }
    if !input.pattern.is_object() {
        return Err(CoreError::invalid("pattern", "Pattern must be a JSON object"));
    }
    Ok(())
}

/// POST /api/v1/tile-submissions
///
/// Public. `tileId` is a weak reference and is not checked.
pub async fn create(
    State(state): State<AppState>,
    Json(mut input): Json<CreateTileSubmission>,
) -> AppResult<(StatusCode, Json<DataResponse<TileSubmission>>)> {
    validate_submission(&mut input)?;
    let submission = SubmissionRepo::create(&state.pool, &input).await?;

    tracing::info!(
        submission_id = submission.id,
        tile_id = ?submission.tile_id,
        "Tile submission received"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: submission })))
}

/// GET /api/v1/tile-submissions?limit=&offset=
pub async fn list(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<DataResponse<Page<TileSubmission>>>> {
    let limit = clamp_limit(params.limit);
    let offset = clamp_offset(params.offset);

    let (items, total) = tokio::try_join!(
        SubmissionRepo::list(&state.pool, limit, offset),
        SubmissionRepo::count(&state.pool),
    )?;

    Ok(Json(DataResponse {
        data: Page {
            items,
            total,
            limit,
            offset,
        },
    }))
}

/// GET /api/v1/tile-submissions/{id}
pub async fn get_by_id(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<TileSubmission>>> {
    let submission = SubmissionRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse { data: submission }))
}

/// DELETE /api/v1/tile-submissions/{id}
pub async fn delete(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<DeletedResponse>>> {
    if !SubmissionRepo::delete(&state.pool, id).await? {
        return Err(not_found(id));
    }

    tracing::info!(user_id = admin.user_id, submission_id = id, "Tile submission deleted");

    Ok(Json(DataResponse {
        data: DeletedResponse { id, deleted: true },
    }))
}
