//! Projects API endpoints
//!
//! Maps to the `/projects` routes which provide:
//! - List projects in display order
//! - Get single project by ID
//! - Create new project
//! - Update existing project
//! - Delete project

use crate::client::ApiService;
use crate::endpoints::{resource_path, Ack, Created};
use crate::error::ApiResult;
use serde::{Deserialize, Serialize};

/// Projects API interface
#[derive(Clone)]
pub struct ProjectsApi {
    client: ApiService,
}

impl ProjectsApi {
    /// Create a new projects API interface
    pub(crate) fn new(client: ApiService) -> Self {
        Self { client }
    }

    /// List all projects
    ///
    /// GET /projects
    pub async fn list(&self) -> ApiResult<Vec<Project>> {
        let response: ProjectList = self.client.get("projects").await?;
        Ok(response.projects)
    }

    /// Get a single project by ID
    ///
    /// GET /projects/{id}
    pub async fn get(&self, id: &str) -> ApiResult<Project> {
        self.client.get(&resource_path("projects", id, None)).await
    }

    /// Create a new project. The server assigns the id and timestamp.
    ///
    /// POST /projects
    pub async fn create(&self, project: &ProjectDraft) -> ApiResult<Created> {
        self.client.post("projects", project).await
    }

    /// Update fields of an existing project
    ///
    /// PUT /projects/{id}
    pub async fn update(&self, id: &str, changes: &ProjectUpdate) -> ApiResult<Ack> {
        self.client.put(&resource_path("projects", id, None), changes).await
    }

    /// Delete a project
    ///
    /// DELETE /projects/{id}
    pub async fn delete(&self, id: &str) -> ApiResult<()> {
        self.client.delete(&resource_path("projects", id, None)).await
    }
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Project entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub tech_stack: Vec<String>,
    pub github_link: Option<String>,
    pub live_link: Option<String>,
    pub image_url: Option<String>,
    /// Display position, lower first
    #[serde(default = "default_order")]
    pub order: i64,
}

fn default_order() -> i64 {
    999
}

/// New project; carries no id or creation timestamp
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectDraft {
    pub title: String,
    pub description: String,
    pub tech_stack: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub github_link: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub live_link: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl ProjectDraft {
    /// Create a draft with the required fields
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            ..Self::default()
        }
    }

    /// Set the technologies used
    #[must_use]
    pub fn with_tech_stack<I, S>(mut self, tech: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tech_stack = tech.into_iter().map(Into::into).collect();
        self
    }

    /// Set the source repository link
    #[must_use]
    pub fn with_github_link(mut self, url: impl Into<String>) -> Self {
        self.github_link = Some(url.into());
        self
    }

    /// Set the live demo link
    #[must_use]
    pub fn with_live_link(mut self, url: impl Into<String>) -> Self {
        self.live_link = Some(url.into());
        self
    }

    /// Set the preview image
    #[must_use]
    pub fn with_image_url(mut self, url: impl Into<String>) -> Self {
        self.image_url = Some(url.into());
        self
    }
}

/// Partial project update; only set fields are sent
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tech_stack: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub github_link: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub live_link: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<i64>,
}

impl ProjectUpdate {
    /// Whether the update would change nothing
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[derive(Deserialize)]
struct ProjectList {
    projects: Vec<Project>,
}
