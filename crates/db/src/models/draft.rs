//! Form draft rows.

use sqlx::FromRow;
use tiledash_core::types::{DbId, Timestamp};

#[derive(Debug, Clone, FromRow)]
pub struct Draft {
    pub id: DbId,
    pub user_id: DbId,
    pub workflow_kind: String,
    pub target: String,
    pub payload: serde_json::Value,
    pub updated_at: Timestamp,
}
