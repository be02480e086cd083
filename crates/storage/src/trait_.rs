//! Storage trait abstraction.

use async_trait::async_trait;
use minipm_core::{Project, ProjectId, Task, TaskFilter, TaskId};

/// Error type for storage operations.
pub type Result<T> = std::result::Result<T, StorageError>;

/// Errors that can occur during storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Other error
    #[error("{0}")]
    Other(String),
}

/// Storage abstraction for projects and their tasks.
///
/// Backends own id allocation: ids are positive and increase by one per
/// kind, like an auto-increment column.
#[async_trait]
pub trait Storage: Send + Sync {
    // === Project operations ===

    /// Save a project (create or update).
    async fn save_project(&mut self, project: &Project) -> Result<()>;

    /// Load a project by ID.
    async fn load_project(&self, id: ProjectId) -> Result<Option<Project>>;

    /// List all projects ordered by id.
    async fn list_projects(&self) -> Result<Vec<Project>>;

    // === Task operations ===

    /// Save a task (create or update).
    async fn save_task(&mut self, task: &Task) -> Result<()>;

    /// Load a task by ID.
    async fn load_task(&self, id: TaskId) -> Result<Option<Task>>;

    /// List tasks matching the filter, ordered by id.
    async fn list_tasks(&self, filter: &TaskFilter) -> Result<Vec<Task>>;

    /// Delete a task. Deleting a missing task is not an error.
    async fn delete_task(&mut self, id: TaskId) -> Result<()>;

    // === Id allocation ===

    /// Next free project id.
    async fn next_project_id(&self) -> Result<ProjectId> {
        let projects = self.list_projects().await?;
        match projects.iter().map(|p| p.id).max() {
            None => Ok(ProjectId(1)),
            Some(last) => last.checked_next().ok_or_else(|| exhausted("project")),
        }
    }

    /// Next free task id.
    async fn next_task_id(&self) -> Result<TaskId> {
        let tasks = self.list_tasks(&TaskFilter::default()).await?;
        match tasks.iter().map(|t| t.id).max() {
            None => Ok(TaskId(1)),
            Some(last) => last.checked_next().ok_or_else(|| exhausted("task")),
        }
    }
}

/// Error for an id kind whose largest stored id is `i64::MAX`.
pub(crate) fn exhausted(kind: &str) -> StorageError {
    StorageError::Other(format!("{kind} id space exhausted"))
}
