//! Content Service Layer
//!
//! Mediates between the admin forms and the hosted backend: the profile
//! singleton, the project list, and the images each project owns.

use crate::clock::{Clock, SystemClock};
use crate::error::{FolioError, Result, ValidationError};
use crate::images::{ImageFile, ImagePolicy};
use crate::models::{DashboardStats, Profile, Project, ProjectDraft, ProjectId};
use chrono::{DateTime, SecondsFormat, Utc};
use folio_http::{BlobStore, Order, RowQuery, RowStore};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

pub const PROFILE_TABLE: &str = "profile";
pub const PROJECTS_TABLE: &str = "projects";

/// Primary key of the one profile row.
pub const PROFILE_ROW_ID: i64 = 1;

/// Fixed-width RFC 3339 so stored timestamps also sort as text.
fn timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

#[derive(Clone)]
pub struct ContentService {
    rows: Arc<dyn RowStore>,
    blobs: Arc<dyn BlobStore>,
    clock: Arc<dyn Clock>,
    images: ImagePolicy,
}

impl ContentService {
    pub fn new(rows: Arc<dyn RowStore>, blobs: Arc<dyn BlobStore>) -> Self {
        Self {
            rows,
            blobs,
            clock: Arc::new(SystemClock),
            images: ImagePolicy::default(),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_image_policy(mut self, images: ImagePolicy) -> Self {
        self.images = images;
        self
    }

    pub fn image_policy(&self) -> &ImagePolicy {
        &self.images
    }

    // --- Profile ---

    /// The stored profile, or `None` before the first save.
    pub async fn get_profile(&self) -> Result<Option<Profile>> {
        let query = RowQuery::all().eq("id", PROFILE_ROW_ID).limit(1);
        let rows = self
            .rows
            .select(PROFILE_TABLE, &query)
            .await
            .inspect_err(|e| error!("[Profile] Failed to load profile: {}", e))?;

        match rows.into_iter().next() {
            Some(row) => Ok(Some(serde_json::from_value(row)?)),
            None => {
                debug!("[Profile] No profile saved yet");
                Ok(None)
            }
        }
    }

    /// Create or overwrite the profile. Repeated saves keep a single row.
    pub async fn update_profile(&self, profile: &Profile) -> Result<()> {
        let mut row = serde_json::to_value(profile)?;
        if let Value::Object(map) = &mut row {
            map.insert("id".to_string(), Value::from(PROFILE_ROW_ID));
        }

        self.rows
            .upsert(PROFILE_TABLE, row, "id")
            .await
            .inspect_err(|e| error!("[Profile] Failed to save profile: {}", e))?;

        info!("[Profile] Saved profile '{}'", profile.name);
        Ok(())
    }

    // --- Projects ---

    /// All projects, newest first.
    pub async fn get_projects(&self) -> Result<Vec<Project>> {
        let query = RowQuery::all().order(Order::desc("created_at"));
        let rows = self
            .rows
            .select(PROJECTS_TABLE, &query)
            .await
            .inspect_err(|e| error!("[Projects] Failed to list projects: {}", e))?;

        rows.into_iter()
            .map(|row| serde_json::from_value(row).map_err(FolioError::from))
            .collect()
    }

    /// Upload the image, then insert the row pointing at it.
    ///
    /// A failed upload creates nothing. A failed insert leaves the uploaded
    /// blob behind; it is logged as orphaned and not cleaned up.
    pub async fn add_project(
        &self,
        draft: &ProjectDraft,
        image: Option<ImageFile>,
    ) -> Result<Project> {
        draft.validate()?;
        let image = image.ok_or(ValidationError::MissingImage)?;

        let image_url = self.upload_image(&image).await?;
        let now = self.clock.now();
        let row = json!({
            "title": draft.title.trim(),
            "description": draft.description.trim(),
            "image": image_url,
            "demo_url": draft.demo_url.trim(),
            "tags": draft.tags,
            "created_at": timestamp(now),
        });

        let stored = match self.rows.insert(PROJECTS_TABLE, row).await {
            Ok(stored) => stored,
            Err(e) => {
                error!("[Projects] Failed to add project '{}': {}", draft.title, e);
                warn!("[Storage] Orphaned image left behind: {}", image_url);
                return Err(e.into());
            }
        };

        let project: Project = serde_json::from_value(stored)?;
        info!("[Projects] Added project {} '{}'", project.id, project.title);
        Ok(project)
    }

    /// Update a project in place.
    ///
    /// With a new image: validate it, look up the image the row currently
    /// references, upload, point the row at the new blob, and only then drop
    /// the previous one (best-effort). The removal follows the stored row, not
    /// `draft.image`. Without a new image the stored reference is left untouched and
    /// storage is not called.
    pub async fn update_project(
        &self,
        id: ProjectId,
        draft: &ProjectDraft,
        image: Option<ImageFile>,
    ) -> Result<Project> {
        draft.validate()?;

        let mut patch = json!({
            "title": draft.title.trim(),
            "description": draft.description.trim(),
            "demo_url": draft.demo_url.trim(),
            "tags": draft.tags,
            "updated_at": timestamp(self.clock.now()),
        });

        let (new_image, previous) = match &image {
            Some(file) => {
                let mime = self.images.check(file)?;
                let previous = self.stored_image(id).await?;
                let url = self.store_image(file, &mime).await?;
                patch["image"] = Value::String(url.clone());
                (Some(url), previous)
            }
            None => (None, None),
        };

        let query = RowQuery::all().eq("id", id);
        let updated = match self.rows.update(PROJECTS_TABLE, &query, patch).await {
            Ok(rows) => rows,
            Err(e) => {
                error!("[Projects] Failed to update project {}: {}", id, e);
                if let Some(url) = &new_image {
                    warn!("[Storage] Orphaned image left behind: {}", url);
                }
                return Err(e.into());
            }
        };

        let Some(row) = updated.into_iter().next() else {
            if let Some(url) = &new_image {
                warn!("[Storage] Orphaned image left behind: {}", url);
            }
            return Err(FolioError::NotFound {
                what: "project",
                id: id.to_string(),
            });
        };

        if let Some(previous) = previous {
            self.delete_image(&previous).await;
        }

        let project: Project = serde_json::from_value(row)?;
        info!("[Projects] Updated project {} '{}'", project.id, project.title);
        Ok(project)
    }

    /// Remove the project's image (best-effort), then its row.
    ///
    /// The result reflects the row deletion only.
    pub async fn delete_project(&self, id: ProjectId, image_url: Option<&str>) -> Result<()> {
        if let Some(url) = image_url.filter(|u| !u.is_empty()) {
            self.delete_image(url).await;
        }

        let query = RowQuery::all().eq("id", id);
        let removed = self
            .rows
            .delete(PROJECTS_TABLE, &query)
            .await
            .inspect_err(|e| error!("[Projects] Failed to delete project {}: {}", id, e))?;

        if removed.is_empty() {
            return Err(FolioError::NotFound {
                what: "project",
                id: id.to_string(),
            });
        }

        info!("[Projects] Deleted project {}", id);
        Ok(())
    }

    /// Image URL currently stored on a project row, if it has one.
    async fn stored_image(&self, id: ProjectId) -> Result<Option<String>> {
        let query = RowQuery::all().select("id,image").eq("id", id).limit(1);
        let rows = self
            .rows
            .select(PROJECTS_TABLE, &query)
            .await
            .inspect_err(|e| error!("[Projects] Failed to load project {}: {}", id, e))?;

        let Some(row) = rows.into_iter().next() else {
            return Err(FolioError::NotFound {
                what: "project",
                id: id.to_string(),
            });
        };
        Ok(row
            .get("image")
            .and_then(Value::as_str)
            .filter(|url| !url.is_empty())
            .map(str::to_string))
    }

    pub async fn dashboard_stats(&self) -> Result<DashboardStats> {
        let query = RowQuery::all().select("id");
        let rows = self.rows.select(PROJECTS_TABLE, &query).await?;
        Ok(DashboardStats {
            projects: rows.len(),
        })
    }

    // --- Images ---

    /// Validate and upload an image; returns its public URL.
    pub async fn upload_image(&self, file: &ImageFile) -> Result<String> {
        let mime = self.images.check(file)?;
        self.store_image(file, &mime).await
    }

    async fn store_image(&self, file: &ImageFile, mime: &str) -> Result<String> {
        let key = self.images.storage_key(file, self.clock.now());

        self.blobs
            .upload(&key, file.data.clone(), mime)
            .await
            .inspect_err(|e| error!("[Storage] Failed to upload '{}': {}", file.file_name, e))?;

        info!("[Storage] Stored {} ({} bytes)", key, file.size());
        Ok(self.blobs.public_url(&key))
    }

    /// Remove the blob behind a public URL. URLs outside the bucket are ignored
    /// and failures are only logged.
    pub async fn delete_image(&self, url: &str) {
        let Some(key) = self.blobs.key_from_public_url(url) else {
            debug!("[Storage] Not a managed image, skipping delete: {}", url);
            return;
        };

        match self.blobs.remove(std::slice::from_ref(&key)).await {
            Ok(()) => info!("[Storage] Removed {}", key),
            Err(e) => error!("[Storage] Failed to remove {}: {}", key, e),
        }
    }
}
