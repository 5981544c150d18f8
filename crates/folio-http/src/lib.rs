pub mod auth;
pub mod client;
pub mod error;
pub mod rest;
pub mod storage;
pub mod traits;
pub mod types;

pub use auth::{AuthApi, AuthUser, Session};
pub use client::{BackendClient, ClientConfig};
pub use error::{BackendError, Result};
pub use rest::RestApi;
pub use storage::StorageApi;
pub use traits::{AuthProvider, BlobStore, RowStore};
pub use types::{ApiRequest, ApiResponse, Order, RowQuery};

/// The three backend surfaces sharing one authenticated client.
#[derive(Clone)]
pub struct RemoteBackend {
    pub auth: AuthApi,
    pub rest: RestApi,
    pub storage: StorageApi,
}

impl RemoteBackend {
    pub fn new(config: ClientConfig, bucket: impl Into<String>) -> Result<Self> {
        let client = BackendClient::with_config(config)?;
        Ok(Self::from_client(client, bucket))
    }

    pub fn from_client(client: BackendClient, bucket: impl Into<String>) -> Self {
        Self {
            auth: AuthApi::new(client.clone()),
            rest: RestApi::new(client.clone()),
            storage: StorageApi::new(client, bucket),
        }
    }
}
