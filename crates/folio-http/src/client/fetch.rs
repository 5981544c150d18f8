//! Main backend HTTP client implementation.

use crate::client::config::ClientConfig;
use crate::client::native_network::NativeNetwork;
use crate::error::{BackendError, Result};
use crate::traits::Network;
use crate::types::{is_access_denied_status, ApiRequest, ApiResponse};
use parking_lot::RwLock;
use std::sync::Arc;

/// HTTP client bound to one backend project.
///
/// Every request carries the project's `apikey`. The bearer token is the
/// signed-in user's access token when there is one and the anon key otherwise.
/// Clones share the same token slot.
#[derive(Clone)]
pub struct BackendClient {
    pub network: Arc<NativeNetwork>,
    pub config: Arc<ClientConfig>,
    access_token: Arc<RwLock<Option<String>>>,
}

impl BackendClient {
    pub fn network(&self) -> &Arc<NativeNetwork> {
        &self.network
    }

    pub fn client(&self) -> &reqwest::Client {
        self.network.client()
    }

    pub fn with_config(config: ClientConfig) -> Result<Self> {
        if config.base_url.is_empty() {
            return Err(BackendError::Config("backend URL is empty".to_string()));
        }
        url::Url::parse(&config.base_url).map_err(|e| BackendError::Config(e.to_string()))?;

        let mut builder = reqwest::Client::builder()
            .connect_timeout(std::time::Duration::from_secs(config.connection_timeout_secs));

        if let Some(timeout_ms) = config.request_timeout_ms {
            builder = builder.timeout(std::time::Duration::from_millis(timeout_ms));
        }

        let client = builder
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| BackendError::Config(e.to_string()))?;

        Ok(Self::with_client(client, config))
    }

    pub fn with_client(client: reqwest::Client, config: ClientConfig) -> Self {
        BackendClient {
            network: Arc::new(NativeNetwork::new(client)),
            config: Arc::new(config),
            access_token: Arc::new(RwLock::new(None)),
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Absolute URL for a path under the project base URL.
    pub fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.config.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    pub fn set_access_token(&self, token: impl Into<String>) {
        *self.access_token.write() = Some(token.into());
    }

    pub fn clear_access_token(&self) {
        *self.access_token.write() = None;
    }

    pub fn access_token(&self) -> Option<String> {
        self.access_token.read().clone()
    }

    fn bearer(&self) -> String {
        self.access_token()
            .unwrap_or_else(|| self.config.anon_key.clone())
    }

    /// Send a request and return the raw response, whatever its status.
    pub async fn fetch(&self, path: &str, request: ApiRequest) -> Result<ApiResponse> {
        let url = self.url(path);
        let request = request
            .with_header("apikey", self.config.anon_key.clone())
            .with_header("Authorization", format!("Bearer {}", self.bearer()));

        self.log_request(&url, &request);
        let response = self.network.fetch(&url, request).await?;
        self.log_response(&url, &response);
        Ok(response)
    }

    /// Send a request and turn non-2xx answers into errors.
    pub async fn send(&self, path: &str, request: ApiRequest) -> Result<ApiResponse> {
        let response = self.fetch(path, request).await?;
        if response.is_success() {
            return Ok(response);
        }

        let message = response.error_message();
        if is_access_denied_status(response.status) {
            return Err(BackendError::Unauthorized(message));
        }
        Err(BackendError::Status {
            status: response.status,
            message,
        })
    }

    fn log_request(&self, url: &str, request: &ApiRequest) {
        if self.config.enable_logging {
            tracing::info!("[Backend] {} {} ({} bytes)", request.method, url, request.body.len());
        }
    }

    fn log_response(&self, url: &str, response: &ApiResponse) {
        if self.config.enable_logging {
            tracing::info!("[Backend] {} <- {}", response.status, url);
        }
    }
}
