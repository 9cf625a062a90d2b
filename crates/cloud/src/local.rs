//! Local filesystem object store.

use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use tiledash_core::assets::{AssetRef, ObjectStore, StorageError};

pub struct LocalObjectStore {
    base_path: PathBuf,
    public_url: String,
}

impl LocalObjectStore {
    pub fn new(base_path: PathBuf, public_url: String) -> Self {
        Self {
            base_path,
            public_url,
        }
    }

    /// Create the root directory if it does not exist yet.
    pub async fn ensure_root(&self) -> Result<(), StorageError> {
        tokio::fs::create_dir_all(&self.base_path).await?;
        Ok(())
    }

    pub fn public_url(&self, key: &str) -> String {
        format!("{}/{}", self.public_url.trim_end_matches('/'), key)
    }

    /// Resolve `key` under the root, rejecting anything that could escape it.
    fn resolve(&self, key: &str) -> Result<PathBuf, StorageError> {
        let relative = Path::new(key);
        let safe = !key.is_empty()
            && relative
                .components()
                .all(|c| matches!(c, Component::Normal(_)));
        if !safe {
            return Err(StorageError::InvalidKey(key.to_string()));
        }
        Ok(self.base_path.join(relative))
    }
}

#[async_trait]
impl ObjectStore for LocalObjectStore {
    async fn store(
        &self,
        key: &str,
        bytes: Vec<u8>,
        _content_type: &str,
    ) -> Result<AssetRef, StorageError> {
        let path = self.resolve(key)?;
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&path, bytes).await?;
        tracing::debug!(key, "Stored object");

        Ok(AssetRef {
            url: self.public_url(key),
            deletion_handle: key.to_string(),
        })
    }

    async fn delete(&self, handle: &str) -> Result<(), StorageError> {
        let path = self.resolve(handle)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                tracing::debug!(key = handle, "Deleted object");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_in(dir: &tempfile::TempDir) -> LocalObjectStore {
        LocalObjectStore::new(dir.path().to_path_buf(), "http://localhost:3000/files/".into())
    }

    #[tokio::test]
    async fn store_writes_file_and_returns_url() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        let asset = store
            .store("masks/main-1.png", vec![1, 2, 3], "image/png")
            .await
            .unwrap();

        assert_eq!(asset.url, "http://localhost:3000/files/masks/main-1.png");
        assert_eq!(asset.deletion_handle, "masks/main-1.png");
        let written = std::fs::read(dir.path().join("masks/main-1.png")).unwrap();
        assert_eq!(written, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn delete_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        let asset = store.store("masks/a.png", vec![0], "image/png").await.unwrap();

        store.delete(&asset.deletion_handle).await.unwrap();
        assert!(!dir.path().join("masks/a.png").exists());
        store.delete(&asset.deletion_handle).await.unwrap();
        store.delete("masks/never-existed.png").await.unwrap();
    }

    #[tokio::test]
    async fn traversal_keys_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        for key in ["../escape.png", "/etc/passwd", "masks/../../x.png", ""] {
            let result = store.store(key, vec![0], "image/png").await;
            assert!(
                matches!(result, Err(StorageError::InvalidKey(_))),
                "{key:?} should be rejected"
            );
        }
    }
}
