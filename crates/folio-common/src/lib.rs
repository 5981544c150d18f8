//! Centralized configuration and state directory management for Folio
//!
//! Directory layout:
//! ```text
//! <config_dir>/folio/
//! └── config.json      # Backend URL, anon key, bucket settings
//!
//! <FOLIO_HOME or data_dir/folio>/
//! └── session.json     # Persisted admin session (written on login, removed on logout)
//! ```

mod settings;

pub use settings::{FolioSettings, DEFAULT_BUCKET, DEFAULT_KEY_PREFIX, DEFAULT_MAX_IMAGE_BYTES};

use serde::{de::DeserializeOwned, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Get the global configuration path
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("folio").join("config.json"))
}

/// Get the state directory from environment or the platform data dir
pub fn folio_home() -> PathBuf {
    if let Ok(val) = std::env::var("FOLIO_HOME") {
        return PathBuf::from(val);
    }

    dirs::data_local_dir()
        .map(|d| d.join("folio"))
        .unwrap_or_else(|| PathBuf::from("folio_data"))
}

/// Persisted session file
pub fn session_path() -> PathBuf {
    folio_home().join("session.json")
}

/// Ensure a single directory exists
pub fn ensure_dir(path: &Path) -> anyhow::Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)?;
        info!("Created directory: {:?}", path);
    }
    Ok(())
}

/// Ensure a file's parent directory exists
pub fn ensure_parent(path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    Ok(())
}

/// Load a JSON document, treating a missing or unreadable file as absent
pub fn load_json<T: DeserializeOwned>(path: &Path) -> Option<T> {
    if !path.exists() {
        return None;
    }

    match fs::read_to_string(path) {
        Ok(content) => match serde_json::from_str::<T>(&content) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!("Failed to parse {:?}: {}", path, e);
                None
            }
        },
        Err(e) => {
            warn!("Failed to read {:?}: {}", path, e);
            None
        }
    }
}

/// Write a JSON document, creating parent directories as needed
pub fn save_json<T: Serialize>(path: &Path, value: &T) -> anyhow::Result<()> {
    ensure_parent(path)?;
    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json)?;
    Ok(())
}

/// Remove a file if present
pub fn remove_file(path: &Path) -> anyhow::Result<bool> {
    if path.exists() {
        fs::remove_file(path)?;
        return Ok(true);
    }
    Ok(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use tempfile::tempdir;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Sample {
        name: String,
        count: u32,
    }

    #[test]
    fn test_save_then_load_creates_parents() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("sample.json");
        let sample = Sample {
            name: "folio".into(),
            count: 3,
        };

        save_json(&path, &sample).unwrap();
        assert!(path.exists());
        assert_eq!(load_json::<Sample>(&path), Some(sample));
    }

    #[test]
    fn test_load_missing_or_malformed_is_none() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("missing.json");
        assert_eq!(load_json::<Sample>(&missing), None);

        let broken = dir.path().join("broken.json");
        fs::write(&broken, "{ not json").unwrap();
        assert_eq!(load_json::<Sample>(&broken), None);
    }

    #[test]
    fn test_remove_file_reports_presence() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("session.json");
        assert!(!remove_file(&path).unwrap());

        fs::write(&path, "{}").unwrap();
        assert!(remove_file(&path).unwrap());
        assert!(!path.exists());
    }

    #[test]
    fn test_session_path_is_under_home() {
        assert!(session_path().ends_with("session.json"));
    }
}
