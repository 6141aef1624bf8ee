use async_trait::async_trait;
use aws_sdk_s3::config::Builder;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::{Client, config::BehaviorVersion, config::Credentials, config::Region};
use bytes::Bytes;
use thiserror::Error;
use tracing::{debug, info};
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("upload of {bucket}/{key} failed: {message}")]
    Upload {
        bucket: String,
        key: String,
        message: String,
    },

    #[error("delete of {bucket}/{key} failed: {message}")]
    Delete {
        bucket: String,
        key: String,
        message: String,
    },
}

/// Blob storage the pipeline stages its inputs in.
///
/// Every uploaded object must be reachable by the returned URL without
/// credentials, since the transcoding service fetches it directly.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    async fn upload(
        &self,
        bucket: &str,
        key: &str,
        body: Bytes,
        content_type: &str,
    ) -> Result<String, StorageError>;

    async fn delete(&self, bucket: &str, key: &str) -> Result<(), StorageError>;
}

/// `<prefix>-<uuid>.<extension>`, unique per call.
pub fn generate_key(prefix: &str, extension: &str) -> String {
    format!("{}-{}.{}", prefix, Uuid::new_v4(), extension)
}

#[derive(Clone)]
pub struct StorageService {
    pub client: Client,
    public_url: String,
}

impl StorageService {
    pub fn new(
        endpoint: &str,
        region: &str,
        access_key: &str,
        secret_key: &str,
        public_url: &str,
    ) -> Self {
        let credentials = Credentials::new(access_key, secret_key, None, None, "static");

        let config = Builder::new()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new(region.to_string()))
            .endpoint_url(endpoint)
            .credentials_provider(credentials)
            .force_path_style(true)
            .build();

        let client = Client::from_conf(config);

        info!("✅ Object storage client ready ({})", endpoint);

        Self {
            client,
            public_url: public_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn public_url(&self, bucket: &str, key: &str) -> String {
        format!("{}/{}/{}", self.public_url, bucket, key)
    }
}

#[async_trait]
impl ObjectStore for StorageService {
    async fn upload(
        &self,
        bucket: &str,
        key: &str,
        body: Bytes,
        content_type: &str,
    ) -> Result<String, StorageError> {
        debug!("Uploading {} bytes to {}/{}", body.len(), bucket, key);

        self.client
            .put_object()
            .bucket(bucket)
            .key(key)
            .content_type(content_type)
            .body(ByteStream::from(body))
            .send()
            .await
            .map_err(|e| StorageError::Upload {
                bucket: bucket.to_string(),
                key: key.to_string(),
                message: DisplayErrorContext(&e).to_string(),
            })?;

        Ok(self.public_url(bucket, key))
    }

    async fn delete(&self, bucket: &str, key: &str) -> Result<(), StorageError> {
        self.client
            .delete_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| StorageError::Delete {
                bucket: bucket.to_string(),
                key: key.to_string(),
                message: DisplayErrorContext(&e).to_string(),
            })?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_keys_are_unique_and_shaped() {
        let a = generate_key("video", "mp4");
        let b = generate_key("video", "mp4");

        assert_ne!(a, b);
        assert!(a.starts_with("video-"));
        assert!(a.ends_with(".mp4"));
        // "video-" + 36-char uuid + ".mp4"
        assert_eq!(a.len(), 6 + 36 + 4);
    }

    #[test]
    fn public_url_joins_base_bucket_and_key() {
        let storage = StorageService::new(
            "http://localhost:9000",
            "us-east-1",
            "access",
            "secret",
            "https://project.supabase.co/storage/v1/object/public/",
        );

        assert_eq!(
            storage.public_url("temp-overlays", "overlay-1.png"),
            "https://project.supabase.co/storage/v1/object/public/temp-overlays/overlay-1.png"
        );
    }
}
