//! Outgoing request parameters.

use std::collections::BTreeMap;

/// A single request to the backend, before credentials are attached.
#[derive(Clone, Debug, Default)]
pub struct ApiRequest {
    pub method: String,
    pub query: Vec<(String, String)>,
    pub content_type: Option<String>,
    pub body: bytes::Bytes,
    pub extra_headers: BTreeMap<String, String>,
}

impl ApiRequest {
    #[inline]
    pub fn new() -> Self {
        Self {
            method: "GET".to_string(),
            ..Default::default()
        }
    }

    pub fn get() -> Self {
        Self::new()
    }

    pub fn post() -> Self {
        Self::new().with_method("POST")
    }

    pub fn patch() -> Self {
        Self::new().with_method("PATCH")
    }

    pub fn delete() -> Self {
        Self::new().with_method("DELETE")
    }

    pub fn with_method(mut self, method: impl Into<String>) -> Self {
        self.method = method.into();
        self
    }

    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    pub fn with_query_pairs(mut self, pairs: Vec<(String, String)>) -> Self {
        self.query.extend(pairs);
        self
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    pub fn with_body(mut self, body: impl Into<bytes::Bytes>) -> Self {
        self.body = body.into();
        self
    }

    /// Serialize `value` as the JSON body.
    pub fn with_json<T: serde::Serialize>(self, value: &T) -> crate::Result<Self> {
        let body = serde_json::to_vec(value)?;
        Ok(self.with_content_type("application/json").with_body(body))
    }

    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra_headers.insert(key.into(), value.into());
        self
    }

    /// PostgREST `Prefer` header.
    pub fn prefer(self, value: impl Into<String>) -> Self {
        self.with_header("Prefer", value)
    }
}
