//! Project image validation and storage keys.

use crate::error::{Result, ValidationError};
use bytes::Bytes;
use chrono::{DateTime, Utc};
use std::path::Path;

/// An image picked for upload.
#[derive(Debug, Clone)]
pub struct ImageFile {
    pub file_name: String,
    /// Declared MIME type. When absent the type is sniffed from the bytes.
    pub content_type: Option<String>,
    pub data: Bytes,
}

impl ImageFile {
    pub fn new(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        data: impl Into<Bytes>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: Some(content_type.into()),
            data: data.into(),
        }
    }

    /// Read a file from disk; its type comes from the magic bytes.
    pub async fn from_path(path: &Path) -> Result<Self> {
        let data = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "image".to_string());
        Ok(Self {
            file_name,
            content_type: None,
            data: Bytes::from(data),
        })
    }

    pub fn size(&self) -> u64 {
        self.data.len() as u64
    }

    /// Declared type, else sniffed type, else `application/octet-stream`.
    pub fn mime_type(&self) -> String {
        if let Some(ct) = self.content_type.as_deref().filter(|ct| !ct.trim().is_empty()) {
            return ct.trim().to_ascii_lowercase();
        }
        match infer::get(&self.data) {
            Some(kind) => kind.mime_type().to_string(),
            None => "application/octet-stream".to_string(),
        }
    }

    /// Extension taken from the file name, falling back to the detected type.
    pub fn extension(&self) -> String {
        let from_name = self
            .file_name
            .rsplit_once('.')
            .map(|(_, ext)| ext.trim().to_ascii_lowercase())
            .filter(|ext| !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()));
        if let Some(ext) = from_name {
            return ext;
        }
        if let Some(kind) = infer::get(&self.data) {
            return kind.extension().to_string();
        }
        self.mime_type()
            .strip_prefix("image/")
            .map(|sub| sub.split('+').next().unwrap_or(sub).to_string())
            .unwrap_or_else(|| "bin".to_string())
    }
}

/// Upload limits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePolicy {
    pub max_bytes: u64,
    /// Folder inside the bucket.
    pub key_prefix: String,
}

impl Default for ImagePolicy {
    fn default() -> Self {
        Self {
            max_bytes: 5 * 1024 * 1024,
            key_prefix: "projects".to_string(),
        }
    }
}

impl ImagePolicy {
    /// Size and type checks; returns the MIME type to upload with.
    pub fn check(&self, file: &ImageFile) -> std::result::Result<String, ValidationError> {
        if file.data.is_empty() {
            return Err(ValidationError::EmptyImage);
        }
        if file.size() > self.max_bytes {
            return Err(ValidationError::ImageTooLarge {
                size: file.size(),
                max: self.max_bytes,
            });
        }
        let mime = file.mime_type();
        if !mime.starts_with("image/") {
            return Err(ValidationError::NotAnImage { content_type: mime });
        }
        Ok(mime)
    }

    /// `<prefix>/<random>_<unix millis>.<ext>`
    pub fn storage_key(&self, file: &ImageFile, now: DateTime<Utc>) -> String {
        let token = uuid::Uuid::new_v4().simple().to_string()[..12].to_string();
        let name = format!("{}_{}.{}", token, now.timestamp_millis(), file.extension());
        if self.key_prefix.is_empty() {
            name
        } else {
            format!("{}/{}", self.key_prefix.trim_end_matches('/'), name)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    const PNG_MAGIC: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

    fn png(len: usize) -> ImageFile {
        let mut data = vec![0u8; len.max(PNG_MAGIC.len())];
        data[..PNG_MAGIC.len()].copy_from_slice(&PNG_MAGIC);
        ImageFile::new("shot.PNG", "image/png", data)
    }

    #[test]
    fn test_size_limit_is_inclusive() {
        let policy = ImagePolicy::default();
        assert!(policy.check(&png(5 * 1024 * 1024)).is_ok());
        assert_eq!(
            policy.check(&png(5 * 1024 * 1024 + 1)),
            Err(ValidationError::ImageTooLarge {
                size: 5 * 1024 * 1024 + 1,
                max: 5 * 1024 * 1024
            })
        );
    }

    #[test]
    fn test_non_image_rejected() {
        let policy = ImagePolicy::default();
        let pdf = ImageFile::new("cv.pdf", "application/pdf", vec![1, 2, 3]);
        assert_eq!(
            policy.check(&pdf),
            Err(ValidationError::NotAnImage {
                content_type: "application/pdf".into()
            })
        );
        let empty = ImageFile::new("x.png", "image/png", Vec::new());
        assert_eq!(policy.check(&empty), Err(ValidationError::EmptyImage));
    }

    #[test]
    fn test_type_sniffed_when_undeclared() {
        let mut file = png(64);
        file.content_type = None;
        file.file_name = "upload".into();
        assert_eq!(file.mime_type(), "image/png");
        assert_eq!(file.extension(), "png");
        assert_eq!(ImagePolicy::default().check(&file).unwrap(), "image/png");

        let text = ImageFile {
            file_name: "notes".into(),
            content_type: None,
            data: Bytes::from_static(b"plain text"),
        };
        assert!(ImagePolicy::default().check(&text).is_err());
    }

    #[test]
    fn test_storage_key_shape() {
        let now = Utc.with_ymd_and_hms(2026, 3, 4, 5, 6, 7).unwrap();
        let policy = ImagePolicy::default();
        let file = png(16);

        let key = policy.storage_key(&file, now);
        let name = key.strip_prefix("projects/").unwrap();
        let (token, rest) = name.split_once('_').unwrap();
        assert_eq!(token.len(), 12);
        assert_eq!(rest, format!("{}.png", now.timestamp_millis()));

        assert_ne!(key, policy.storage_key(&file, now));
    }
}
