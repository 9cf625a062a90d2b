//! Handlers for the `/categories` resource.
//!
//! Deleting a category never touches tiles that reference it; their reads
//! keep the raw id and resolve the category to `null`.

use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::Json;
use tiledash_core::assets::{inspect_image, object_key, MASK_FOLDER};
use tiledash_core::error::CoreError;
use tiledash_core::tile::ledger::{purge, AssetLedger, WorkflowPhase};
use tiledash_core::types::DbId;
use tiledash_db::models::category::{Category, CreateCategory, UpdateCategory};
use tiledash_db::repositories::CategoryRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::multipart::{FormData, BORDER_MASK};
use crate::response::{DataResponse, DeletedResponse};
use crate::state::AppState;

const MAX_NAME_LENGTH: usize = 100;

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "category",
        id,
    })
}

/// Trim and bound-check a category name.
fn clean_name(raw: &str) -> Result<String, CoreError> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(CoreError::missing("name"));
    }
    if name.chars().count() > MAX_NAME_LENGTH {
        return Err(CoreError::invalid(
            "name",
            format!("Name must be at most {MAX_NAME_LENGTH} characters"),
        ));
    }
    Ok(name.to_string())
}

// ---------------------------------------------------------------------------
// CRUD
// ---------------------------------------------------------------------------

/// GET /api/v1/categories
pub async fn list(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<Category>>>> {
    let categories = CategoryRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: categories }))
}

/// GET /api/v1/categories/{id}
pub async fn get_by_id(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Category>>> {
    let category = CategoryRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse { data: category }))
}

/// POST /api/v1/categories
pub async fn create(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Json(mut input): Json<CreateCategory>,
) -> AppResult<(StatusCode, Json<DataResponse<Category>>)> {
    input.name = clean_name(&input.name)?;
    let category = CategoryRepo::create(&state.pool, &input).await?;

    tracing::info!(
        user_id = admin.user_id,
        category_id = category.id,
        name = %category.name,
        "Category created"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: category })))
}

/// PUT /api/v1/categories/{id}
pub async fn update(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(mut input): Json<UpdateCategory>,
) -> AppResult<Json<DataResponse<Category>>> {
    if let Some(name) = &input.name {
        input.name = Some(clean_name(name)?);
    }
    let category = CategoryRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| not_found(id))?;

    tracing::info!(user_id = admin.user_id, category_id = id, "Category updated");

    Ok(Json(DataResponse { data: category }))
}

/// DELETE /api/v1/categories/{id}
///
/// Also deletes the category's stored border mask, if any.
pub async fn delete(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<DeletedResponse>>> {
    let category = CategoryRepo::delete(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;

    if let Some(mask) = category.border_mask {
        purge(state.objects.as_ref(), &[mask.0]).await;
    }

    tracing::info!(user_id = admin.user_id, category_id = id, "Category deleted");

    Ok(Json(DataResponse {
        data: DeletedResponse { id, deleted: true },
    }))
}

// ---------------------------------------------------------------------------
// Border mask
// ---------------------------------------------------------------------------

/// PUT /api/v1/categories/{id}/border-mask
///
/// Multipart with a single `borderMask` file. The previous mask is deleted
/// only after the new one is persisted.
pub async fn set_border_mask(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    multipart: Multipart,
) -> AppResult<Json<DataResponse<Category>>> {
    let existing = CategoryRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;

    let mut form = FormData::from_multipart(multipart).await?;
    let file = form
        .take_file(BORDER_MASK)
        .ok_or_else(|| CoreError::missing(BORDER_MASK))?;
    let kind = inspect_image(BORDER_MASK, &file, state.config.max_upload_bytes)?;

    let mut ledger = AssetLedger::new(state.objects.clone());
    ledger.advance(WorkflowPhase::Uploading);
    let asset = state
        .objects
        .store(
            &object_key(MASK_FOLDER, "category-border", kind),
            file.bytes,
            kind.content_type(),
        )
        .await
        .map_err(|e| CoreError::Upload(e.to_string()))?;
    ledger.track(asset.clone());

    ledger.advance(WorkflowPhase::Persisting);
    let updated = match CategoryRepo::set_border_mask(&state.pool, id, Some(&asset)).await {
        Ok(Some(category)) => category,
        Ok(None) => {
            ledger.rollback().await;
            return Err(not_found(id));
        }
        Err(e) => {
            ledger.rollback().await;
            return Err(e.into());
        }
    };
    ledger.commit();

    if let Some(old) = existing.border_mask {
        purge(state.objects.as_ref(), &[old.0]).await;
    }

    tracing::info!(user_id = admin.user_id, category_id = id, "Category border mask set");

    Ok(Json(DataResponse { data: updated }))
}

/// DELETE /api/v1/categories/{id}/border-mask
pub async fn remove_border_mask(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Category>>> {
    let existing = CategoryRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;

    let updated = CategoryRepo::set_border_mask(&state.pool, id, None)
        .await?
        .ok_or_else(|| not_found(id))?;

    if let Some(old) = existing.border_mask {
        purge(state.objects.as_ref(), &[old.0]).await;
    }

    tracing::info!(user_id = admin.user_id, category_id = id, "Category border mask removed");

    Ok(Json(DataResponse { data: updated }))
}
