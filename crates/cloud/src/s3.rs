//! S3-compatible object store.

use async_trait::async_trait;
use aws_credential_types::Credentials;
use aws_sdk_s3::config::Region;
use aws_sdk_s3::primitives::ByteStream;
use tiledash_core::assets::{AssetRef, ObjectStore, StorageError};

use crate::StorageConfig;

pub struct S3ObjectStore {
    client: aws_sdk_s3::Client,
    bucket: String,
    public_url: String,
    prefix: Option<String>,
}

impl S3ObjectStore {
    /// Build a client from an `S3` config variant.
    pub async fn from_config(config: &StorageConfig) -> Result<Self, StorageError> {
        let StorageConfig::S3 {
            bucket,
            region,
            endpoint,
            access_key_id,
            secret_access_key,
            public_url,
            prefix,
        } = config
        else {
            return Err(StorageError::Backend("not an S3 configuration".into()));
        };

        let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(Region::new(region.clone()));
        if let (Some(key_id), Some(secret)) = (access_key_id, secret_access_key) {
            loader = loader.credentials_provider(Credentials::new(
                key_id.clone(),
                secret.clone(),
                None,
                None,
                "tiledash-env",
            ));
        }
        let shared = loader.load().await;

        let mut builder = aws_sdk_s3::config::Builder::from(&shared);
        if let Some(endpoint) = endpoint {
            builder = builder.endpoint_url(endpoint).force_path_style(true);
        }
        let client = aws_sdk_s3::Client::from_conf(builder.build());

        let public_url = public_url
            .clone()
            .unwrap_or_else(|| format!("https://{bucket}.s3.{region}.amazonaws.com"));

        Ok(Self {
            client,
            bucket: bucket.clone(),
            public_url,
            prefix: prefix.clone(),
        })
    }

    fn full_key(&self, key: &str) -> String {
        match &self.prefix {
            Some(prefix) => format!("{}/{}", prefix.trim_end_matches('/'), key),
            None => key.to_string(),
        }
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn store(
        &self,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<AssetRef, StorageError> {
        let full_key = self.full_key(key);
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(&full_key)
            .body(ByteStream::from(bytes))
            .content_type(content_type)
            .send()
            .await
            .map_err(|e| StorageError::Backend(format!("S3 upload failed: {e}")))?;

        Ok(AssetRef {
            url: format!("{}/{}", self.public_url.trim_end_matches('/'), full_key),
            deletion_handle: full_key,
        })
    }

    /// S3 `DeleteObject` succeeds for missing keys, so this is idempotent.
    async fn delete(&self, handle: &str) -> Result<(), StorageError> {
        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(handle)
            .send()
            .await
            .map_err(|e| StorageError::Backend(format!("S3 delete failed: {e}")))?;
        Ok(())
    }
}
