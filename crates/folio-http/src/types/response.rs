//! Backend HTTP response.

use bytes::Bytes;
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;

#[derive(Clone, Debug)]
pub struct ApiResponse {
    pub status: u16,
    pub headers: BTreeMap<String, String>,
    pub body: Bytes,
}

impl ApiResponse {
    pub fn new(status: u16, body: impl Into<Bytes>) -> Self {
        ApiResponse {
            status,
            headers: BTreeMap::new(),
            body: body.into(),
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn body_str(&self) -> Option<&str> {
        std::str::from_utf8(&self.body).ok()
    }

    /// Decode the body as JSON. An empty body decodes as JSON `null`.
    pub fn json<T: DeserializeOwned>(&self) -> crate::Result<T> {
        if self.body.is_empty() {
            return Ok(serde_json::from_value(serde_json::Value::Null)?);
        }
        Ok(serde_json::from_slice(&self.body)?)
    }

    /// Best-effort human readable error text from the body.
    ///
    /// PostgREST answers with `message`, storage with `message` or `error`,
    /// auth with `msg` or `error_description`.
    pub fn error_message(&self) -> String {
        if let Ok(value) = serde_json::from_slice::<serde_json::Value>(&self.body) {
            for field in ["message", "msg", "error_description", "error"] {
                if let Some(text) = value.get(field).and_then(|v| v.as_str()) {
                    return text.to_string();
                }
            }
        }
        match self.body_str() {
            Some(text) if !text.trim().is_empty() => text.trim().to_string(),
            _ => format!("HTTP {}", self.status),
        }
    }

    #[inline]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

impl Default for ApiResponse {
    fn default() -> Self {
        ApiResponse::new(200, Bytes::new())
    }
}

pub fn is_access_denied_status(status: u16) -> bool {
    matches!(status, 401 | 403)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_lookup_is_case_insensitive() {
        let res = ApiResponse::new(200, "[]").with_header("Content-Range", "0-0/1");
        assert_eq!(res.header("content-range"), Some("0-0/1"));
        assert!(res.is_success());
    }

    #[test]
    fn test_error_message_fields() {
        let postgrest = ApiResponse::new(400, r#"{"code":"PGRST204","message":"column missing"}"#);
        assert_eq!(postgrest.error_message(), "column missing");

        let auth = ApiResponse::new(400, r#"{"error":"invalid_grant","error_description":"Invalid login credentials"}"#);
        assert_eq!(auth.error_message(), "Invalid login credentials");

        let empty = ApiResponse::new(502, "");
        assert_eq!(empty.error_message(), "HTTP 502");
    }

    #[test]
    fn test_empty_body_is_null() {
        let res = ApiResponse::new(204, "");
        let value: Option<serde_json::Value> = res.json().unwrap();
        assert!(value.is_none());
    }
}
