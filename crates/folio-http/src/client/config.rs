//! Configuration for the backend HTTP client.

/// Configuration for the backend HTTP client.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL of the backend project.
    pub base_url: String,
    /// Public API key sent as `apikey` and as the fallback bearer token.
    pub anon_key: String,
    /// Request timeout in milliseconds. `None` keeps the reqwest default (no timeout).
    pub request_timeout_ms: Option<u64>,
    /// Connection timeout in seconds.
    pub connection_timeout_secs: u64,
    /// Enable request logging.
    pub enable_logging: bool,
    /// User agent string.
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfig {
            base_url: String::new(),
            anon_key: String::new(),
            request_timeout_ms: None,
            connection_timeout_secs: 30,
            enable_logging: false,
            user_agent: concat!("folio/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>, anon_key: impl Into<String>) -> Self {
        ClientConfig {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            anon_key: anon_key.into(),
            ..Default::default()
        }
    }
}
