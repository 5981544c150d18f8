//! Wiring between settings, the hosted backend and the persisted session.

use anyhow::{bail, Result};
use folio_common::FolioSettings;
use folio_core::{
    AuthProvider, BlobStore, ContentService, ImagePolicy, Route, RowStore, Session, SessionFlow,
};
use folio_http::{ClientConfig, RemoteBackend};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info, warn};

pub struct App {
    pub content: ContentService,
    pub session: SessionFlow,
    session_path: PathBuf,
}

impl App {
    /// Connect to the configured backend and pick up a saved session, if any.
    pub fn connect(settings: &FolioSettings, session_path: PathBuf) -> Result<Self> {
        let mut config = ClientConfig::new(&settings.backend_url, &settings.anon_key);
        config.request_timeout_ms = settings.request_timeout_ms;

        let backend = RemoteBackend::new(config, &settings.bucket)?;
        let rows: Arc<dyn RowStore> = Arc::new(backend.rest);
        let blobs: Arc<dyn BlobStore> = Arc::new(backend.storage);
        let auth: Arc<dyn AuthProvider> = Arc::new(backend.auth);

        let content = ContentService::new(rows, blobs).with_image_policy(ImagePolicy {
            max_bytes: settings.max_image_bytes,
            key_prefix: settings.key_prefix.clone(),
        });

        Ok(Self::from_parts(content, SessionFlow::new(auth), session_path))
    }

    pub fn from_parts(
        content: ContentService,
        session: SessionFlow,
        session_path: PathBuf,
    ) -> Self {
        let app = Self {
            content,
            session,
            session_path,
        };
        app.restore_session();
        app
    }

    fn restore_session(&self) {
        let Some(saved) = folio_common::load_json::<Session>(&self.session_path) else {
            debug!("[Auth] No saved session at {:?}", self.session_path);
            return;
        };
        if self.session.resume(saved) == Route::Login {
            // Expired; drop it so the next run starts clean.
            if let Err(e) = folio_common::remove_file(&self.session_path) {
                warn!(
                    "[Auth] Could not remove expired session {:?}: {}",
                    self.session_path, e
                );
            }
        }
    }

    pub fn persist_session(&self, session: &Session) -> Result<()> {
        folio_common::save_json(&self.session_path, session)?;
        info!("[Auth] Session saved to {:?}", self.session_path);
        Ok(())
    }

    pub fn clear_session(&self) -> Result<()> {
        if folio_common::remove_file(&self.session_path)? {
            info!("[Auth] Session removed");
        }
        Ok(())
    }

    /// Protected commands only run from the dashboard.
    pub fn require_login(&self) -> Result<()> {
        if self.session.current_route() != Route::Dashboard {
            bail!("Not signed in. Run `folio-admin login --email <email>` first.");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use folio_core::MemoryBackend;
    use folio_http::AuthUser;

    fn app_at(path: PathBuf) -> (Arc<MemoryBackend>, App) {
        let backend = Arc::new(MemoryBackend::new());
        backend.add_user("admin@example.com", "secret");
        let content = ContentService::new(backend.clone(), backend.clone());
        let app = App::from_parts(content, SessionFlow::new(backend.clone()), path);
        (backend, app)
    }

    fn session(expires_in: Duration) -> Session {
        Session {
            access_token: "token".into(),
            refresh_token: None,
            token_type: "bearer".into(),
            expires_at: Some(Utc::now() + expires_in),
            user: AuthUser {
                id: "u1".into(),
                email: Some("admin@example.com".into()),
            },
        }
    }

    #[test]
    fn test_without_saved_session_login_is_required() {
        let dir = tempfile::tempdir().unwrap();
        let (_backend, app) = app_at(dir.path().join("session.json"));
        assert!(app.require_login().is_err());
    }

    #[test]
    fn test_saved_session_is_resumed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        folio_common::save_json(&path, &session(Duration::hours(1))).unwrap();

        let (_backend, app) = app_at(path);
        assert!(app.require_login().is_ok());
        assert_eq!(
            app.session.current_session().map(|s| s.access_token),
            Some("token".to_string())
        );
    }

    #[test]
    fn test_expired_session_is_discarded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        folio_common::save_json(&path, &session(-Duration::minutes(5))).unwrap();

        let (_backend, app) = app_at(path.clone());
        assert!(app.require_login().is_err());
        assert!(!path.exists());
    }

    #[test]
    fn test_connect_rejects_bad_backend_url() {
        let dir = tempfile::tempdir().unwrap();
        let settings = FolioSettings {
            backend_url: "not a url".into(),
            anon_key: "anon".into(),
            ..FolioSettings::default()
        };
        assert!(App::connect(&settings, dir.path().join("s.json")).is_err());
    }
}
