//! Storage seam for generated projects.
//!
//! The service only needs upsert-and-list semantics; [`MemoryProjectStore`]
//! keeps everything in process and can be swapped for a database-backed
//! implementation of [`ProjectStore`].

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::Result;
use crate::validation::ProjectInput;

/// A repository a user has generated documentation for
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: Uuid,
    /// GitHub login of the owning user
    pub user: String,
    pub name: String,
    pub description: Option<String>,
    pub github_url: String,
    /// `owner/repo`
    pub github_id: String,
    pub language: Option<String>,
    pub readme_content: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[async_trait]
pub trait ProjectStore: Send + Sync {
    /// Creates or updates the project keyed by `(user, input.github_id)`.
    /// The flag is true when a new project was created.
    async fn upsert(&self, user: &str, input: ProjectInput) -> Result<(Project, bool)>;

    /// The user's projects, most recently updated first
    async fn list(&self, user: &str) -> Result<Vec<Project>>;
}

#[derive(Default, Clone)]
pub struct MemoryProjectStore {
    projects: Arc<RwLock<HashMap<(String, String), Project>>>,
}

impl MemoryProjectStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProjectStore for MemoryProjectStore {
    async fn upsert(&self, user: &str, input: ProjectInput) -> Result<(Project, bool)> {
        let now = Utc::now();
        let key = (user.to_string(), input.github_id.clone());
        let mut projects = self.projects.write().await;

        if let Some(existing) = projects.get_mut(&key) {
            existing.name = input.name;
            existing.description = input.description;
            existing.language = input.language;
            existing.readme_content = input.readme_content;
            existing.updated_at = now;
            return Ok((existing.clone(), false));
        }

        let project = Project {
            id: Uuid::new_v4(),
            user: user.to_string(),
            name: input.name,
            description: input.description,
            github_url: input.github_url,
            github_id: input.github_id,
            language: input.language,
            readme_content: input.readme_content,
            created_at: now,
            updated_at: now,
        };
        projects.insert(key, project.clone());
        Ok((project, true))
    }

    async fn list(&self, user: &str) -> Result<Vec<Project>> {
        let projects = self.projects.read().await;
        let mut owned: Vec<Project> = projects
            .values()
            .filter(|p| p.user == user)
            .cloned()
            .collect();
        owned.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(owned)
    }
}
