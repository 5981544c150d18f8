//! Profile and project records.

use crate::error::ValidationError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub type ProjectId = i64;

/// The portfolio owner's profile. At most one exists.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub services: Vec<String>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub whatsapp: String,
    #[serde(default)]
    pub instagram: String,
    #[serde(default)]
    pub email: String,
}

impl Profile {
    /// Append a trimmed service; blank input is ignored.
    pub fn add_service(&mut self, service: &str) -> bool {
        push_trimmed(&mut self.services, service)
    }

    pub fn remove_service(&mut self, index: usize) -> Option<String> {
        (index < self.services.len()).then(|| self.services.remove(index))
    }

    /// Append a trimmed skill; blank input is ignored.
    pub fn add_skill(&mut self, skill: &str) -> bool {
        push_trimmed(&mut self.skills, skill)
    }

    pub fn remove_skill(&mut self, index: usize) -> Option<String> {
        (index < self.skills.len()).then(|| self.skills.remove(index))
    }
}

fn push_trimmed(list: &mut Vec<String>, value: &str) -> bool {
    let value = value.trim();
    if value.is_empty() {
        return false;
    }
    list.push(value.to_string());
    true
}

/// A stored project row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: ProjectId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub demo_url: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Editable project fields, as submitted from a form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectDraft {
    pub title: String,
    pub description: String,
    /// Current image reference when editing an existing project.
    #[serde(default)]
    pub image: Option<String>,
    pub demo_url: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl ProjectDraft {
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        demo_url: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            demo_url: demo_url.into(),
            ..Default::default()
        }
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for tag in tags {
            self.add_tag(tag.as_ref());
        }
        self
    }

    /// Add a trimmed tag. Blank and duplicate tags are ignored.
    pub fn add_tag(&mut self, tag: &str) -> bool {
        let tag = tag.trim();
        if tag.is_empty() || self.tags.iter().any(|t| t == tag) {
            return false;
        }
        self.tags.push(tag.to_string());
        true
    }

    pub fn remove_tag(&mut self, tag: &str) -> bool {
        let before = self.tags.len();
        self.tags.retain(|t| t != tag);
        self.tags.len() != before
    }

    /// Title, description and demo URL are required.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.title.trim().is_empty() {
            return Err(ValidationError::MissingField("title"));
        }
        if self.description.trim().is_empty() {
            return Err(ValidationError::MissingField("description"));
        }
        if self.demo_url.trim().is_empty() {
            return Err(ValidationError::MissingField("demo_url"));
        }
        Ok(())
    }
}

impl From<&Project> for ProjectDraft {
    fn from(project: &Project) -> Self {
        Self {
            title: project.title.clone(),
            description: project.description.clone(),
            image: (!project.image.is_empty()).then(|| project.image.clone()),
            demo_url: project.demo_url.clone(),
            tags: project.tags.clone(),
        }
    }
}

/// Dashboard header figures.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DashboardStats {
    pub projects: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tags_are_trimmed_and_unique() {
        let mut draft = ProjectDraft::new("Site", "x", "https://x.com");
        assert!(draft.add_tag("  rust "));
        assert!(!draft.add_tag("rust"));
        assert!(!draft.add_tag("   "));
        assert!(draft.add_tag("web"));
        assert_eq!(draft.tags, vec!["rust", "web"]);

        assert!(draft.remove_tag("rust"));
        assert!(!draft.remove_tag("rust"));
        assert_eq!(draft.tags, vec!["web"]);
    }

    #[test]
    fn test_required_fields() {
        assert_eq!(
            ProjectDraft::new(" ", "x", "https://x.com").validate(),
            Err(ValidationError::MissingField("title"))
        );
        assert_eq!(
            ProjectDraft::new("Site", "", "https://x.com").validate(),
            Err(ValidationError::MissingField("description"))
        );
        assert_eq!(
            ProjectDraft::new("Site", "x", "").validate(),
            Err(ValidationError::MissingField("demo_url"))
        );
        assert!(ProjectDraft::new("Site", "x", "https://x.com")
            .validate()
            .is_ok());
    }

    #[test]
    fn test_profile_lists_keep_order_and_allow_repeats() {
        let mut profile = Profile::default();
        assert!(profile.add_service(" Web design "));
        assert!(profile.add_service("Web design"));
        assert!(!profile.add_skill(""));
        assert!(profile.add_skill("Rust"));
        assert_eq!(profile.services, vec!["Web design", "Web design"]);

        assert_eq!(profile.remove_service(0).as_deref(), Some("Web design"));
        assert_eq!(profile.remove_service(5), None);
        assert_eq!(profile.remove_skill(0).as_deref(), Some("Rust"));
    }

    #[test]
    fn test_project_row_decodes_with_missing_columns() {
        let project: Project = serde_json::from_value(serde_json::json!({
            "id": 4,
            "title": "Site",
            "image": "https://cdn/x.png",
            "created_at": "2026-02-01T10:00:00.000000Z"
        }))
        .unwrap();
        assert_eq!(project.id, 4);
        assert!(project.tags.is_empty());
        assert!(project.updated_at.is_none());

        let draft = ProjectDraft::from(&project);
        assert_eq!(draft.image.as_deref(), Some("https://cdn/x.png"));
    }
}
