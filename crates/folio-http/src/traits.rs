use crate::auth::Session;
use crate::error::Result;
use crate::types::{ApiRequest, ApiResponse, RowQuery};
use async_trait::async_trait;
use bytes::Bytes;
use serde_json::Value;

/// Abstraction for network operations.
#[async_trait]
pub trait Network: Send + Sync + 'static {
    async fn fetch(&self, url: &str, req: ApiRequest) -> Result<ApiResponse>;
}

/// Table access on the hosted row store.
#[async_trait]
pub trait RowStore: Send + Sync + 'static {
    /// Rows matching `query`. No match is an empty vec, not an error.
    async fn select(&self, table: &str, query: &RowQuery) -> Result<Vec<Value>>;

    /// Insert one row and return it as stored.
    async fn insert(&self, table: &str, row: Value) -> Result<Value>;

    /// Insert, or merge into the row that conflicts on `on_conflict`.
    async fn upsert(&self, table: &str, row: Value, on_conflict: &str) -> Result<()>;

    /// Patch matching rows, returning them as stored.
    async fn update(&self, table: &str, query: &RowQuery, patch: Value) -> Result<Vec<Value>>;

    /// Delete matching rows, returning what was removed.
    async fn delete(&self, table: &str, query: &RowQuery) -> Result<Vec<Value>>;
}

/// One bucket of the hosted blob store. Keys are flat paths inside the bucket.
#[async_trait]
pub trait BlobStore: Send + Sync + 'static {
    async fn upload(&self, key: &str, data: Bytes, content_type: &str) -> Result<()>;

    async fn remove(&self, keys: &[String]) -> Result<()>;

    /// Public URL for `key`, derived without a network call.
    fn public_url(&self, key: &str) -> String;

    /// Storage key for a public URL of this bucket, or `None` for foreign URLs.
    fn key_from_public_url(&self, url: &str) -> Option<String> {
        let prefix = self.public_url("");
        let rest = url.strip_prefix(&prefix)?;
        let key = rest.split(['?', '#']).next().unwrap_or_default();
        if key.is_empty() {
            None
        } else {
            Some(key.to_string())
        }
    }
}

/// Password authentication against the hosted auth service.
#[async_trait]
pub trait AuthProvider: Send + Sync + 'static {
    async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<Session>;

    /// Invalidate the current session on the backend and forget it locally.
    async fn sign_out(&self) -> Result<()>;

    fn current_session(&self) -> Option<Session>;

    /// Reuse a session persisted by an earlier run.
    fn restore_session(&self, session: Session);
}
