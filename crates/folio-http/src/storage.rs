//! Object storage access (`/storage/v1`).

use crate::client::BackendClient;
use crate::error::Result;
use crate::traits::BlobStore;
use crate::types::ApiRequest;
use async_trait::async_trait;
use bytes::Bytes;
use serde_json::json;
use tracing::debug;

/// One storage bucket.
#[derive(Clone)]
pub struct StorageApi {
    client: BackendClient,
    bucket: String,
}

impl StorageApi {
    pub fn new(client: BackendClient, bucket: impl Into<String>) -> Self {
        Self {
            client,
            bucket: bucket.into(),
        }
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }
}

#[async_trait]
impl BlobStore for StorageApi {
    async fn upload(&self, key: &str, data: Bytes, content_type: &str) -> Result<()> {
        let path = format!("storage/v1/object/{}/{}", self.bucket, key);
        let size = data.len();
        let request = ApiRequest::post()
            .with_header("x-upsert", "false")
            .with_header("cache-control", "max-age=3600")
            .with_content_type(content_type)
            .with_body(data);
        self.client.send(&path, request).await?;
        debug!("[Storage] Uploaded {}/{} ({} bytes)", self.bucket, key, size);
        Ok(())
    }

    async fn remove(&self, keys: &[String]) -> Result<()> {
        let path = format!("storage/v1/object/{}", self.bucket);
        let request = ApiRequest::delete().with_json(&json!({ "prefixes": keys }))?;
        self.client.send(&path, request).await?;
        debug!("[Storage] Removed {:?} from {}", keys, self.bucket);
        Ok(())
    }

    fn public_url(&self, key: &str) -> String {
        self.client
            .url(&format!("storage/v1/object/public/{}/{}", self.bucket, key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::ClientConfig;

    fn storage() -> StorageApi {
        let client =
            BackendClient::with_config(ClientConfig::new("https://abc.supabase.co", "k")).unwrap();
        StorageApi::new(client, "project-images")
    }

    #[test]
    fn test_public_url() {
        assert_eq!(
            storage().public_url("projects/a1_17.png"),
            "https://abc.supabase.co/storage/v1/object/public/project-images/projects/a1_17.png"
        );
    }

    #[test]
    fn test_key_from_public_url() {
        let storage = storage();
        let url = storage.public_url("projects/a1_17.png");
        assert_eq!(
            storage.key_from_public_url(&url).as_deref(),
            Some("projects/a1_17.png")
        );
        assert_eq!(
            storage
                .key_from_public_url(&format!("{}?t=123", url))
                .as_deref(),
            Some("projects/a1_17.png")
        );
    }

    #[test]
    fn test_foreign_url_has_no_key() {
        let storage = storage();
        assert!(storage
            .key_from_public_url("https://cdn.example.com/project-images/x.png")
            .is_none());
        assert!(storage
            .key_from_public_url(
                "https://abc.supabase.co/storage/v1/object/public/other-bucket/x.png"
            )
            .is_none());
        assert!(storage
            .key_from_public_url(&storage.public_url(""))
            .is_none());
    }
}
