//! Login / logout flow.
//!
//! Credentials go straight to the auth provider. A rejected login is reported
//! as a generic "invalid credentials" error so the admin never learns which
//! field was wrong; the provider's detail only reaches the logs.

use crate::error::{FolioError, Result, ValidationError};
use chrono::Utc;
use folio_http::{AuthProvider, Session};
use std::sync::Arc;
use tracing::{error, info, warn};

/// Where the front end should go next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Login,
    Dashboard,
}

#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub route: Route,
    pub session: Session,
}

#[derive(Clone)]
pub struct SessionFlow {
    auth: Arc<dyn AuthProvider>,
}

impl SessionFlow {
    pub fn new(auth: Arc<dyn AuthProvider>) -> Self {
        Self { auth }
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<LoginOutcome> {
        let email = email.trim();
        if email.is_empty() || password.is_empty() {
            return Err(ValidationError::MissingCredentials.into());
        }

        match self.auth.sign_in_with_password(email, password).await {
            Ok(session) => {
                info!("[Auth] Login succeeded for {}", email);
                Ok(LoginOutcome {
                    route: Route::Dashboard,
                    session,
                })
            }
            Err(e) => {
                warn!("[Auth] Login rejected: {}", e);
                Err(FolioError::InvalidCredentials)
            }
        }
    }

    /// Sign out and head back to the login screen, whatever the backend says.
    pub async fn logout(&self) -> Route {
        if let Err(e) = self.auth.sign_out().await {
            error!("[Auth] Error during sign-out: {}", e);
        }
        Route::Login
    }

    /// Adopt a persisted session if it is still valid.
    pub fn resume(&self, session: Session) -> Route {
        if session.is_expired(Utc::now()) {
            info!("[Auth] Stored session has expired");
            return Route::Login;
        }
        self.auth.restore_session(session);
        Route::Dashboard
    }

    /// Dashboard when signed in, login otherwise.
    pub fn current_route(&self) -> Route {
        match self.auth.current_session() {
            Some(session) if !session.is_expired(Utc::now()) => Route::Dashboard,
            _ => Route::Login,
        }
    }

    pub fn current_session(&self) -> Option<Session> {
        self.auth.current_session()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryBackend;
    use chrono::Duration;
    use folio_http::AuthUser;

    fn flow() -> (Arc<MemoryBackend>, SessionFlow) {
        let backend = Arc::new(MemoryBackend::new());
        backend.add_user("admin@example.com", "secret");
        (backend.clone(), SessionFlow::new(backend))
    }

    #[tokio::test]
    async fn test_login_routes_to_dashboard() {
        let (_backend, flow) = flow();
        assert_eq!(flow.current_route(), Route::Login);

        let outcome = flow.login(" admin@example.com ", "secret").await.unwrap();
        assert_eq!(outcome.route, Route::Dashboard);
        assert_eq!(flow.current_route(), Route::Dashboard);
    }

    #[tokio::test]
    async fn test_wrong_password_is_generic() {
        let (_backend, flow) = flow();
        let err = flow.login("admin@example.com", "wrong").await.unwrap_err();
        assert!(matches!(err, FolioError::InvalidCredentials));
        assert!(!err.user_message().contains("wrong"));

        let err = flow.login("nobody@example.com", "secret").await.unwrap_err();
        assert!(matches!(err, FolioError::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_empty_credentials_fail_validation() {
        let (_backend, flow) = flow();
        let err = flow.login("", "secret").await.unwrap_err();
        assert!(err.is_validation());
    }

    #[tokio::test]
    async fn test_logout_routes_to_login_even_on_failure() {
        let (backend, flow) = flow();
        flow.login("admin@example.com", "secret").await.unwrap();

        backend.fail_sign_out(true);
        assert_eq!(flow.logout().await, Route::Login);
        assert_eq!(flow.current_route(), Route::Login);
    }

    #[test]
    fn test_resume_rejects_expired_session() {
        let (_backend, flow) = flow();
        let session = Session {
            access_token: "old".into(),
            refresh_token: None,
            token_type: "bearer".into(),
            expires_at: Some(Utc::now() - Duration::minutes(1)),
            user: AuthUser {
                id: "u1".into(),
                email: None,
            },
        };
        assert_eq!(flow.resume(session.clone()), Route::Login);

        let fresh = Session {
            expires_at: Some(Utc::now() + Duration::hours(1)),
            ..session
        };
        assert_eq!(flow.resume(fresh), Route::Dashboard);
    }
}
