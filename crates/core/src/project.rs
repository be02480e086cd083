//! Project model - the owner of a task list.

use serde::{Deserialize, Serialize};
use crate::id::ProjectId;
use crate::Time;

/// A project groups the tasks that get scheduled together.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    /// Unique identifier
    pub id: ProjectId,

    /// Project title
    pub title: String,

    /// Optional description
    #[serde(default)]
    pub description: Option<String>,

    /// When created
    pub created_at: Time,
}

impl Project {
    /// Create a new project. The id is normally replaced by the storage backend.
    pub fn new(id: ProjectId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            description: None,
            created_at: chrono::Utc::now(),
        }
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}
