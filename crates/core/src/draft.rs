//! Draft persistence for the admin forms.
//!
//! A draft is an unsaved form payload scoped to one user and one workflow
//! session: "adding a new tile", "editing color 7", and so on. The key is
//! explicit so that add-mode and edit-mode drafts never bleed into each
//! other.

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use serde::Serialize;

use crate::error::CoreError;
use crate::types::DbId;

/// Upper bound on a serialized draft payload.
pub const MAX_DRAFT_BYTES: usize = 64 * 1024;

/// Which admin form a draft belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkflowKind {
    Tile,
    Category,
    Color,
}

impl WorkflowKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Tile => "tile",
            Self::Category => "category",
            Self::Color => "color",
        }
    }
}

impl FromStr for WorkflowKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "tile" | "tiles" => Ok(Self::Tile),
            "category" | "categories" => Ok(Self::Category),
            "color" | "colors" => Ok(Self::Color),
            other => Err(CoreError::invalid(
                "kind",
                format!("Unknown draft kind '{other}'. Must be one of: tile, category, color"),
            )),
        }
    }
}

/// Whether a draft is for a new entity or an edit of an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DraftTarget {
    New,
    Entity(DbId),
}

impl fmt::Display for DraftTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::New => f.write_str("new"),
            Self::Entity(id) => write!(f, "{id}"),
        }
    }
}

impl FromStr for DraftTarget {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "new" {
            return Ok(Self::New);
        }
        match s.parse::<DbId>() {
            Ok(id) if id > 0 => Ok(Self::Entity(id)),
            _ => Err(CoreError::invalid(
                "target",
                format!("Draft target must be 'new' or a positive id, got '{s}'"),
            )),
        }
    }
}

/// Full draft key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DraftKey {
    pub kind: WorkflowKind,
    pub target: DraftTarget,
}

impl DraftKey {
    pub fn new(kind: WorkflowKind, target: DraftTarget) -> Self {
        Self { kind, target }
    }

    /// Storage form of the target half of the key.
    pub fn target_key(&self) -> String {
        self.target.to_string()
    }
}

/// Check a draft payload before it is saved.
pub fn validate_payload(payload: &serde_json::Value) -> Result<(), CoreError> {
    if !payload.is_object() {
        return Err(CoreError::invalid("payload", "Draft payload must be a JSON object"));
    }
    let size = payload.to_string().len();
    if size > MAX_DRAFT_BYTES {
        return Err(CoreError::invalid(
            "payload",
            format!("Draft payload is {size} bytes, the limit is {MAX_DRAFT_BYTES}"),
        ));
    }
    Ok(())
}

/// Per-user draft storage.
#[async_trait]
pub trait DraftStore: Send + Sync {
    async fn load(
        &self,
        owner: DbId,
        key: DraftKey,
    ) -> Result<Option<serde_json::Value>, CoreError>;

    async fn save(
        &self,
        owner: DbId,
        key: DraftKey,
        payload: &serde_json::Value,
    ) -> Result<(), CoreError>;

    /// Returns `true` if a draft was removed.
    async fn discard(&self, owner: DbId, key: DraftKey) -> Result<bool, CoreError>;
}
