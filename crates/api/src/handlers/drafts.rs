//! Handlers for `/drafts/{kind}/{target}`.
//!
//! Drafts are scoped to the signed-in user. `kind` is `tile`, `category` or
//! `color`; `target` is `new` or the id of the entity being edited.

use axum::extract::{Path, State};
use axum::Json;
use serde::Serialize;
use tiledash_core::draft::{validate_payload, DraftKey, DraftStore, DraftTarget, WorkflowKind};

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct DiscardResponse {
    pub discarded: bool,
}

fn parse_key(kind: &str, target: &str) -> AppResult<DraftKey> {
    let kind: WorkflowKind = kind.parse()?;
    let target: DraftTarget = target.parse()?;
    Ok(DraftKey::new(kind, target))
}

/// GET /api/v1/drafts/{kind}/{target}
///
/// Returns `{ "data": null }` when no draft exists.
pub async fn load(
    auth: AuthUser,
    State(state): State<AppState>,
    Path((kind, target)): Path<(String, String)>,
) -> AppResult<Json<DataResponse<Option<serde_json::Value>>>> {
    let key = parse_key(&kind, &target)?;
    let payload = state.catalog.load(auth.user_id, key).await?;
    Ok(Json(DataResponse { data: payload }))
}

/// PUT /api/v1/drafts/{kind}/{target}
pub async fn save(
    auth: AuthUser,
    State(state): State<AppState>,
    Path((kind, target)): Path<(String, String)>,
    Json(payload): Json<serde_json::Value>,
) -> AppResult<Json<DataResponse<serde_json::Value>>> {
    let key = parse_key(&kind, &target)?;
    validate_payload(&payload)?;
    state.catalog.save(auth.user_id, key, &payload).await?;

    tracing::debug!(
        user_id = auth.user_id,
        kind = key.kind.as_str(),
        target = %key.target,
        "Draft saved"
    );

    Ok(Json(DataResponse { data: payload }))
}

/// DELETE /api/v1/drafts/{kind}/{target}
pub async fn discard(
    auth: AuthUser,
    State(state): State<AppState>,
    Path((kind, target)): Path<(String, String)>,
) -> AppResult<Json<DataResponse<DiscardResponse>>> {
    let key = parse_key(&kind, &target)?;
    let discarded = state.catalog.discard(auth.user_id, key).await?;
    Ok(Json(DataResponse {
        data: DiscardResponse { discarded },
    }))
}
