use std::fmt;

use crate::types::DbId;

/// Kind of entity a dangling reference pointed at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceKind {
    Category,
    Color,
    SubMask,
}

impl ReferenceKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Category => "category",
            Self::Color => "color",
            Self::SubMask => "sub_mask",
        }
    }
}

impl fmt::Display for ReferenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Invalid {field}: {message}")]
    Validation {
        field: &'static str,
        message: String,
    },

    /// `id` is kept as text because sub-mask ids are UUIDs.
    #[error("Referenced {kind} '{id}' does not exist")]
    ReferenceNotFound { kind: ReferenceKind, id: String },

    #[error("Number of sub-mask files ({expected}) does not match number of sub-mask colors ({actual})")]
    PairingMismatch { expected: usize, actual: usize },

    #[error("Upload failed: {0}")]
    Upload(String),

    #[error("Persistence failed: {0}")]
    Persistence(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Shorthand for a [`CoreError::Validation`] on `field`.
    pub fn invalid(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            field,
            message: message.into(),
        }
    }

    /// Shorthand for a missing required field.
    pub fn missing(field: &'static str) -> Self {
        Self::Validation {
            field,
            message: format!("{field} is required"),
        }
    }

    pub fn reference(kind: ReferenceKind, id: impl ToString) -> Self {
        Self::ReferenceNotFound {
            kind,
            id: id.to_string(),
        }
    }
}
