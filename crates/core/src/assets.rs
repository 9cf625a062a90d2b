//! Uploaded image assets and the object-store seam.
//!
//! An [`AssetRef`] is what the rest of the system keeps after an upload: a
//! public URL plus the opaque handle needed to delete the object again.
//! Concrete stores (local filesystem, S3) live in the `cloud` crate.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::CoreError;

/// Default per-file upload limit (5 MiB).
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

/// Folder (key prefix) that tile and category masks are stored under.
pub const MASK_FOLDER: &str = "masks";

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// A stored object: durable public URL plus deletion handle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetRef {
    pub url: String,
    pub deletion_handle: String,
}

/// An image payload received from a client, not yet stored.
#[derive(Debug, Clone)]
pub struct IncomingFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl IncomingFile {
    pub fn new(file_name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes: bytes.into(),
        }
    }
}

/// Accepted image formats for masks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    Png,
    Jpeg,
}

impl ImageKind {
    pub fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpg",
        }
    }

    pub fn content_type(self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
        }
    }
}

// ---------------------------------------------------------------------------
// Object store seam
// ---------------------------------------------------------------------------

/// Error returned by object store backends.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid storage key '{0}'")]
    InvalidKey(String),

    #[error("Storage backend error: {0}")]
    Backend(String),
}

/// External object storage: put an object, get back a URL and a handle.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Store `bytes` under `key` and return the resulting reference.
    async fn store(
        &self,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<AssetRef, StorageError>;

    /// Delete the object behind `handle`.
    ///
    /// Must be idempotent: deleting an unknown or already-deleted handle
    /// returns `Ok(())`.
    async fn delete(&self, handle: &str) -> Result<(), StorageError>;
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Check an incoming mask image before anything is uploaded.
///
/// The format is sniffed from the leading bytes rather than trusted from the
/// file name or the declared content type.
pub fn inspect_image(
    field: &'static str,
    file: &IncomingFile,
    max_bytes: usize,
) -> Result<ImageKind, CoreError> {
    if file.bytes.is_empty() {
        return Err(CoreError::invalid(
            field,
            format!("'{}' is empty", file.file_name),
        ));
    }
    if file.bytes.len() > max_bytes {
        return Err(CoreError::invalid(
            field,
            format!(
                "'{}' is {} bytes, the limit is {max_bytes}",
                file.file_name,
                file.bytes.len()
            ),
        ));
    }

    match image::guess_format(&file.bytes) {
        Ok(image::ImageFormat::Png) => Ok(ImageKind::Png),
        Ok(image::ImageFormat::Jpeg) => Ok(ImageKind::Jpeg),
        _ => Err(CoreError::invalid(
            field,
            format!("'{}' must be a PNG or JPEG image", file.file_name),
        )),
    }
}

/// Build a unique object key: `{folder}/{slot}-{uuid}.{ext}`.
pub fn object_key(folder: &str, slot: &str, kind: ImageKind) -> String {
    format!(
        "{}/{slot}-{}.{}",
        folder.trim_end_matches('/'),
        Uuid::now_v7(),
        kind.extension()
    )
}
