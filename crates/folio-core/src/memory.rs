//! In-process backend.
//!
//! Implements the row, blob and auth contracts over plain maps so the
//! data-access layer can be exercised without a network. Every blob call is
//! recorded, and each surface can be told to fail.

use async_trait::async_trait;
use bytes::Bytes;
use folio_http::{
    AuthProvider, AuthUser, BackendError, BlobStore, RowQuery, RowStore, Session,
};
use parking_lot::Mutex;
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};

type Result<T> = folio_http::Result<T>;

const MEMORY_BASE_URL: &str = "memory://folio";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredBlob {
    pub data: Bytes,
    pub content_type: String,
}

#[derive(Default)]
struct Faults {
    reads: AtomicBool,
    writes: AtomicBool,
    uploads: AtomicBool,
    removals: AtomicBool,
    sign_out: AtomicBool,
}

pub struct MemoryBackend {
    bucket: String,
    tables: Mutex<HashMap<String, Vec<Value>>>,
    next_id: AtomicI64,
    blobs: Mutex<BTreeMap<String, StoredBlob>>,
    uploads: Mutex<Vec<String>>,
    removals: Mutex<Vec<String>>,
    users: Mutex<HashMap<String, String>>,
    session: Mutex<Option<Session>>,
    faults: Faults,
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::with_bucket("project-images")
    }

    pub fn with_bucket(bucket: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            tables: Mutex::new(HashMap::new()),
            next_id: AtomicI64::new(1),
            blobs: Mutex::new(BTreeMap::new()),
            uploads: Mutex::new(Vec::new()),
            removals: Mutex::new(Vec::new()),
            users: Mutex::new(HashMap::new()),
            session: Mutex::new(None),
            faults: Faults::default(),
        }
    }

    /// Register an account that `sign_in_with_password` accepts.
    pub fn add_user(&self, email: &str, password: &str) {
        self.users
            .lock()
            .insert(email.to_string(), password.to_string());
    }

    pub fn rows(&self, table: &str) -> Vec<Value> {
        self.tables.lock().get(table).cloned().unwrap_or_default()
    }

    pub fn blob(&self, key: &str) -> Option<StoredBlob> {
        self.blobs.lock().get(key).cloned()
    }

    pub fn blob_keys(&self) -> Vec<String> {
        self.blobs.lock().keys().cloned().collect()
    }

    /// Keys passed to `upload`, in call order, including failed calls.
    pub fn upload_calls(&self) -> Vec<String> {
        self.uploads.lock().clone()
    }

    /// Keys passed to `remove`, in call order, including failed calls.
    pub fn removal_calls(&self) -> Vec<String> {
        self.removals.lock().clone()
    }

    pub fn fail_reads(&self, fail: bool) {
        self.faults.reads.store(fail, Ordering::SeqCst);
    }

    pub fn fail_writes(&self, fail: bool) {
        self.faults.writes.store(fail, Ordering::SeqCst);
    }

    pub fn fail_uploads(&self, fail: bool) {
        self.faults.uploads.store(fail, Ordering::SeqCst);
    }

    pub fn fail_removals(&self, fail: bool) {
        self.faults.removals.store(fail, Ordering::SeqCst);
    }

    pub fn fail_sign_out(&self, fail: bool) {
        self.faults.sign_out.store(fail, Ordering::SeqCst);
    }

    fn check(flag: &AtomicBool, what: &str) -> Result<()> {
        if flag.load(Ordering::SeqCst) {
            return Err(BackendError::Status {
                status: 503,
                message: format!("{} unavailable", what),
            });
        }
        Ok(())
    }

    fn object(row: Value) -> Result<Map<String, Value>> {
        match row {
            Value::Object(map) => Ok(map),
            other => Err(BackendError::Protocol(format!(
                "row must be an object, got {}",
                other
            ))),
        }
    }

    fn merge(target: &mut Value, patch: &Map<String, Value>) {
        if let Value::Object(map) = target {
            for (k, v) in patch {
                map.insert(k.clone(), v.clone());
            }
        }
    }
}

#[async_trait]
impl RowStore for MemoryBackend {
    async fn select(&self, table: &str, query: &RowQuery) -> Result<Vec<Value>> {
        Self::check(&self.faults.reads, "row store")?;
        let tables = self.tables.lock();
        Ok(tables
            .get(table)
            .map(|rows| query.apply(rows))
            .unwrap_or_default())
    }

    async fn insert(&self, table: &str, row: Value) -> Result<Value> {
        Self::check(&self.faults.writes, "row store")?;
        let mut map = Self::object(row)?;
        if !map.contains_key("id") {
            let id = self.next_id.fetch_add(1, Ordering::SeqCst);
            map.insert("id".to_string(), Value::from(id));
        }
        let row = Value::Object(map);
        self.tables
            .lock()
            .entry(table.to_string())
            .or_default()
            .push(row.clone());
        Ok(row)
    }

    async fn upsert(&self, table: &str, row: Value, on_conflict: &str) -> Result<()> {
        Self::check(&self.faults.writes, "row store")?;
        let map = Self::object(row)?;
        let key = map.get(on_conflict).cloned().ok_or_else(|| {
            BackendError::Protocol(format!("upsert row lacks conflict column {}", on_conflict))
        })?;

        let mut tables = self.tables.lock();
        let rows = tables.entry(table.to_string()).or_default();
        match rows.iter_mut().find(|r| r.get(on_conflict) == Some(&key)) {
            Some(existing) => Self::merge(existing, &map),
            None => rows.push(Value::Object(map)),
        }
        Ok(())
    }

    async fn update(&self, table: &str, query: &RowQuery, patch: Value) -> Result<Vec<Value>> {
        Self::check(&self.faults.writes, "row store")?;
        let patch = Self::object(patch)?;
        let mut tables = self.tables.lock();
        let mut updated = Vec::new();
        if let Some(rows) = tables.get_mut(table) {
            for row in rows.iter_mut().filter(|r| query.matches(r)) {
                Self::merge(row, &patch);
                updated.push(row.clone());
            }
        }
        Ok(updated)
    }

    async fn delete(&self, table: &str, query: &RowQuery) -> Result<Vec<Value>> {
        Self::check(&self.faults.writes, "row store")?;
        let mut tables = self.tables.lock();
        let mut removed = Vec::new();
        if let Some(rows) = tables.get_mut(table) {
            rows.retain(|r| {
                if query.matches(r) {
                    removed.push(r.clone());
                    false
                } else {
                    true
                }
            });
        }
        Ok(removed)
    }
}

#[async_trait]
impl BlobStore for MemoryBackend {
    async fn upload(&self, key: &str, data: Bytes, content_type: &str) -> Result<()> {
        self.uploads.lock().push(key.to_string());
        Self::check(&self.faults.uploads, "storage")?;

        let mut blobs = self.blobs.lock();
        if blobs.contains_key(key) {
            return Err(BackendError::Status {
                status: 409,
                message: "The resource already exists".to_string(),
            });
        }
        blobs.insert(
            key.to_string(),
            StoredBlob {
                data,
                content_type: content_type.to_string(),
            },
        );
        Ok(())
    }

    async fn remove(&self, keys: &[String]) -> Result<()> {
        self.removals.lock().extend(keys.iter().cloned());
        Self::check(&self.faults.removals, "storage")?;

        let mut blobs = self.blobs.lock();
        for key in keys {
            blobs.remove(key);
        }
        Ok(())
    }

    fn public_url(&self, key: &str) -> String {
        format!(
            "{}/storage/v1/object/public/{}/{}",
            MEMORY_BASE_URL, self.bucket, key
        )
    }
}

#[async_trait]
impl AuthProvider for MemoryBackend {
    async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<Session> {
        let known = self.users.lock().get(email).cloned();
        if known.as_deref() != Some(password) {
            return Err(BackendError::Status {
                status: 400,
                message: "Invalid login credentials".to_string(),
            });
        }

        let session = Session {
            access_token: format!("memory-token-{}", uuid::Uuid::new_v4().simple()),
            refresh_token: None,
            token_type: "bearer".to_string(),
            expires_at: None,
            user: AuthUser {
                id: format!("user-{}", email),
                email: Some(email.to_string()),
            },
        };
        *self.session.lock() = Some(session.clone());
        Ok(session)
    }

    async fn sign_out(&self) -> Result<()> {
        *self.session.lock() = None;
        Self::check(&self.faults.sign_out, "auth")
    }

    fn current_session(&self) -> Option<Session> {
        self.session.lock().clone()
    }

    fn restore_session(&self, session: Session) {
        *self.session.lock() = Some(session);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_upsert_merges_on_conflict_column() {
        let backend = MemoryBackend::new();
        backend
            .upsert("profile", json!({"id": 1, "name": "Ana", "role": "Dev"}), "id")
            .await
            .unwrap();
        backend
            .upsert("profile", json!({"id": 1, "name": "Ana M."}), "id")
            .await
            .unwrap();

        let rows = backend.rows("profile");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["name"], "Ana M.");
        assert_eq!(rows[0]["role"], "Dev");
    }

    #[tokio::test]
    async fn test_insert_assigns_ids_and_delete_returns_removed() {
        let backend = MemoryBackend::new();
        let a = backend.insert("projects", json!({"title": "A"})).await.unwrap();
        let b = backend.insert("projects", json!({"title": "B"})).await.unwrap();
        assert_ne!(a["id"], b["id"]);

        let removed = backend
            .delete("projects", &RowQuery::all().eq("id", a["id"].as_i64().unwrap()))
            .await
            .unwrap();
        assert_eq!(removed.len(), 1);
        assert_eq!(backend.rows("projects").len(), 1);
    }

    #[tokio::test]
    async fn test_faults_and_call_log() {
        let backend = MemoryBackend::new();
        backend.fail_uploads(true);
        let err = backend
            .upload("projects/a.png", Bytes::from_static(b"x"), "image/png")
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(503));
        assert_eq!(backend.upload_calls(), vec!["projects/a.png"]);
        assert!(backend.blob_keys().is_empty());
    }

    #[tokio::test]
    async fn test_sign_in_checks_password() {
        let backend = MemoryBackend::new();
        backend.add_user("admin@example.com", "secret");
        assert!(backend
            .sign_in_with_password("admin@example.com", "nope")
            .await
            .is_err());
        let session = backend
            .sign_in_with_password("admin@example.com", "secret")
            .await
            .unwrap();
        assert_eq!(session.user.email.as_deref(), Some("admin@example.com"));
        assert!(backend.current_session().is_some());
    }
}
