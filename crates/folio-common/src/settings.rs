//! Folio backend settings

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

pub const DEFAULT_BUCKET: &str = "project-images";
pub const DEFAULT_KEY_PREFIX: &str = "projects";
pub const DEFAULT_MAX_IMAGE_BYTES: u64 = 5 * 1024 * 1024;

/// Settings for reaching the hosted backend
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FolioSettings {
    /// Base URL of the backend project, e.g. `https://xyz.supabase.co`
    #[serde(default)]
    pub backend_url: String,
    /// Public (anon) API key sent with every request
    #[serde(default)]
    pub anon_key: String,
    /// Storage bucket holding project images
    #[serde(default = "default_bucket")]
    pub bucket: String,
    /// Folder inside the bucket for uploaded images
    #[serde(default = "default_key_prefix")]
    pub key_prefix: String,
    /// Upload size limit in bytes
    #[serde(default = "default_max_image_bytes")]
    pub max_image_bytes: u64,
    /// Optional request timeout; the HTTP client default applies when unset
    #[serde(default)]
    pub request_timeout_ms: Option<u64>,
}

fn default_bucket() -> String {
    DEFAULT_BUCKET.to_string()
}

fn default_key_prefix() -> String {
    DEFAULT_KEY_PREFIX.to_string()
}

fn default_max_image_bytes() -> u64 {
    DEFAULT_MAX_IMAGE_BYTES
}

impl Default for FolioSettings {
    fn default() -> Self {
        Self {
            backend_url: String::new(),
            anon_key: String::new(),
            bucket: default_bucket(),
            key_prefix: default_key_prefix(),
            max_image_bytes: DEFAULT_MAX_IMAGE_BYTES,
            request_timeout_ms: None,
        }
    }
}

impl FolioSettings {
    /// Resolve settings from the process environment and the global config file
    pub fn load() -> anyhow::Result<Self> {
        let file = crate::config_path().and_then(|p| crate::load_json::<FolioSettings>(&p));
        let settings = Self::resolve(file, |key| std::env::var(key).ok());
        settings.validate()?;
        info!(
            "[Config] backend={} bucket={}",
            settings.backend_url, settings.bucket
        );
        Ok(settings)
    }

    /// Layer environment values over the file values over the defaults
    pub fn resolve(file: Option<FolioSettings>, env: impl Fn(&str) -> Option<String>) -> Self {
        let mut settings = file.unwrap_or_default();

        if let Some(url) = env("FOLIO_BACKEND_URL") {
            settings.backend_url = url;
        }
        if let Some(key) = env("FOLIO_ANON_KEY") {
            settings.anon_key = key;
        }
        if let Some(bucket) = env("FOLIO_BUCKET") {
            settings.bucket = bucket;
        }
        if let Some(timeout) = env("FOLIO_TIMEOUT_MS").and_then(|s| s.parse().ok()) {
            settings.request_timeout_ms = Some(timeout);
        }

        settings.backend_url = settings.backend_url.trim_end_matches('/').to_string();
        settings
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.backend_url.is_empty() {
            anyhow::bail!("backend URL is not configured (set FOLIO_BACKEND_URL)");
        }
        if self.anon_key.is_empty() {
            anyhow::bail!("anon key is not configured (set FOLIO_ANON_KEY)");
        }
        Ok(())
    }

    /// Persist these settings to the given path
    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        crate::save_json(path, self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let settings = FolioSettings::default();
        assert_eq!(settings.bucket, "project-images");
        assert_eq!(settings.key_prefix, "projects");
        assert_eq!(settings.max_image_bytes, 5 * 1024 * 1024);
        assert!(settings.request_timeout_ms.is_none());
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_env_overrides_file() {
        let file = FolioSettings {
            backend_url: "https://file.example.co".into(),
            anon_key: "file-key".into(),
            ..Default::default()
        };
        let settings = FolioSettings::resolve(
            Some(file),
            env_of(&[("FOLIO_BACKEND_URL", "https://env.example.co/")]),
        );
        assert_eq!(settings.backend_url, "https://env.example.co");
        assert_eq!(settings.anon_key, "file-key");
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let parsed: FolioSettings =
            serde_json::from_str(r#"{"backend_url":"https://a.co","anon_key":"k"}"#).unwrap();
        assert_eq!(parsed.bucket, DEFAULT_BUCKET);
        assert_eq!(parsed.max_image_bytes, DEFAULT_MAX_IMAGE_BYTES);
    }

    #[test]
    fn test_timeout_from_env() {
        let settings = FolioSettings::resolve(None, env_of(&[("FOLIO_TIMEOUT_MS", "2500")]));
        assert_eq!(settings.request_timeout_ms, Some(2500));
    }
}
