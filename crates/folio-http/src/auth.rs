//! Password authentication (`/auth/v1`).

use crate::client::BackendClient;
use crate::error::Result;
use crate::traits::AuthProvider;
use crate::types::ApiRequest;
use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use tracing::{info, warn};

/// Signed-in user as reported by the auth service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
}

/// Session token for authenticated requests
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default = "default_token_type")]
    pub token_type: String,
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
    pub user: AuthUser,
}

fn default_token_type() -> String {
    "bearer".to_string()
}

impl Session {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|at| at <= now)
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default = "default_token_type")]
    token_type: String,
    #[serde(default)]
    expires_in: Option<i64>,
    #[serde(default)]
    expires_at: Option<i64>,
    #[serde(default)]
    refresh_token: Option<String>,
    user: AuthUser,
}

impl TokenResponse {
    fn into_session(self, now: DateTime<Utc>) -> Session {
        let expires_at = match (self.expires_at, self.expires_in) {
            (Some(at), _) => Utc.timestamp_opt(at, 0).single(),
            (None, Some(secs)) => Some(now + Duration::seconds(secs)),
            (None, None) => None,
        };
        Session {
            access_token: self.access_token,
            refresh_token: self.refresh_token,
            token_type: self.token_type,
            expires_at,
            user: self.user,
        }
    }
}

/// Auth endpoints plus the session the shared client is currently using
#[derive(Clone)]
pub struct AuthApi {
    client: BackendClient,
    session: Arc<RwLock<Option<Session>>>,
}

impl AuthApi {
    pub fn new(client: BackendClient) -> Self {
        Self {
            client,
            session: Arc::new(RwLock::new(None)),
        }
    }

    fn adopt(&self, session: Session) {
        self.client.set_access_token(session.access_token.clone());
        *self.session.write() = Some(session);
    }

    fn forget(&self) {
        self.client.clear_access_token();
        *self.session.write() = None;
    }
}

#[async_trait]
impl AuthProvider for AuthApi {
    async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<Session> {
        let request = ApiRequest::post()
            .with_query("grant_type", "password")
            .with_json(&json!({ "email": email, "password": password }))?;

        // Sign-in always goes out under the anon key.
        let previous_token = self.client.access_token();
        let previous_session = self.session.read().clone();
        self.forget();

        let result = self
            .client
            .send("auth/v1/token", request)
            .await
            .and_then(|response| response.json::<TokenResponse>());
        let session = match result {
            Ok(token) => token.into_session(Utc::now()),
            Err(e) => {
                // A rejected attempt leaves the earlier session in place.
                if let Some(token) = previous_token {
                    self.client.set_access_token(token);
                }
                *self.session.write() = previous_session;
                return Err(e);
            }
        };

        info!("[Auth] Signed in user {}", session.user.id);
        self.adopt(session.clone());
        Ok(session)
    }

    async fn sign_out(&self) -> Result<()> {
        if self.session.read().is_none() && self.client.access_token().is_none() {
            return Ok(());
        }

        let result = self
            .client
            .send("auth/v1/logout", ApiRequest::post())
            .await;
        self.forget();

        match result {
            Ok(_) => {
                info!("[Auth] Signed out");
                Ok(())
            }
            Err(e) => {
                warn!("[Auth] Remote sign-out failed: {}", e);
                Err(e)
            }
        }
    }

    fn current_session(&self) -> Option<Session> {
        self.session.read().clone()
    }

    fn restore_session(&self, session: Session) {
        self.adopt(session);
    }
}
