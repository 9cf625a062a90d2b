//! Object store backends for uploaded mask images.
//!
//! - [`local::LocalObjectStore`] writes under a directory the API serves
//!   statically. Default for development.
//! - [`s3::S3ObjectStore`] targets any S3-compatible service.

use std::path::PathBuf;
use std::sync::Arc;

use tiledash_core::assets::{ObjectStore, StorageError};

pub mod local;
pub mod s3;

/// Storage backend selection, loaded from the environment.
#[derive(Debug, Clone)]
pub enum StorageConfig {
    Local {
        /// Directory objects are written to.
        base_path: PathBuf,
        /// URL prefix objects are served from.
        public_url: String,
    },
    S3 {
        bucket: String,
        region: String,
        /// Custom endpoint for S3-compatible services (MinIO, R2, ...).
        endpoint: Option<String>,
        /// Static credentials. When absent the default AWS provider chain is used.
        access_key_id: Option<String>,
        secret_access_key: Option<String>,
        /// Public URL prefix. Defaults to the virtual-hosted bucket URL.
        public_url: Option<String>,
        /// Key prefix inside the bucket.
        prefix: Option<String>,
    },
}

impl StorageConfig {
    /// Load storage configuration from environment variables.
    ///
    /// | Env Var                | Default                        |
    /// |------------------------|--------------------------------|
    /// | `STORAGE_BACKEND`      | `local` (`local` or `s3`)      |
    /// | `STORAGE_LOCAL_PATH`   | `./storage`                    |
    /// | `STORAGE_PUBLIC_URL`   | `http://localhost:3000/files`  |
    /// | `S3_BUCKET`            | required when backend is `s3`  |
    /// | `S3_REGION`            | `us-east-1`                    |
    /// | `S3_ENDPOINT`          | none                           |
    /// | `S3_ACCESS_KEY_ID`     | none                           |
    /// | `S3_SECRET_ACCESS_KEY` | none                           |
    /// | `S3_PREFIX`            | none                           |
    pub fn from_env() -> Self {
        let backend = std::env::var("STORAGE_BACKEND").unwrap_or_else(|_| "local".into());
        let public_url = std::env::var("STORAGE_PUBLIC_URL").ok();

        match backend.as_str() {
            "local" => Self::Local {
                base_path: std::env::var("STORAGE_LOCAL_PATH")
                    .unwrap_or_else(|_| "./storage".into())
                    .into(),
                public_url: public_url.unwrap_or_else(|| "http://localhost:3000/files".into()),
            },
            "s3" => Self::S3 {
                bucket: std::env::var("S3_BUCKET")
                    .expect("S3_BUCKET must be set when STORAGE_BACKEND=s3"),
                region: std::env::var("S3_REGION").unwrap_or_else(|_| "us-east-1".into()),
                endpoint: std::env::var("S3_ENDPOINT").ok(),
                access_key_id: std::env::var("S3_ACCESS_KEY_ID").ok(),
                secret_access_key: std::env::var("S3_SECRET_ACCESS_KEY").ok(),
                public_url,
                prefix: std::env::var("S3_PREFIX").ok(),
            },
            other => panic!("STORAGE_BACKEND must be 'local' or 's3', got '{other}'"),
        }
    }

    /// Local directory to serve under `/files`, if the backend is local.
    pub fn local_path(&self) -> Option<&PathBuf> {
        match self {
            Self::Local { base_path, .. } => Some(base_path),
            Self::S3 { .. } => None,
        }
    }
}

/// Build the configured object store.
pub async fn build_object_store(
    config: &StorageConfig,
) -> Result<Arc<dyn ObjectStore>, StorageError> {
    match config {
        StorageConfig::Local {
            base_path,
            public_url,
        } => {
            let store = local::LocalObjectStore::new(base_path.clone(), public_url.clone());
            store.ensure_root().await?;
            tracing::info!(path = %base_path.display(), "Using local object store");
            Ok(Arc::new(store))
        }
        StorageConfig::S3 { bucket, .. } => {
            let store = s3::S3ObjectStore::from_config(config).await?;
            tracing::info!(bucket = %bucket, "Using S3 object store");
            Ok(Arc::new(store))
        }
    }
}
