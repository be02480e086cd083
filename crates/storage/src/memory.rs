//! In-memory storage, for tests and one-shot runs.

use std::collections::BTreeMap;
use minipm_core::{Project, ProjectId, Task, TaskFilter, TaskId};
use super::trait_::exhausted;
use super::{Result, Storage};

/// Storage backend keeping everything in ordered maps.
#[derive(Debug, Default, Clone)]
pub struct MemoryStorage {
    projects: BTreeMap<ProjectId, Project>,
    tasks: BTreeMap<TaskId, Task>,
}

impl MemoryStorage {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl Storage for MemoryStorage {
    async fn save_project(&mut self, project: &Project) -> Result<()> {
        self.projects.insert(project.id, project.clone());
        Ok(())
    }

    async fn load_project(&self, id: ProjectId) -> Result<Option<Project>> {
        Ok(self.projects.get(&id).cloned())
    }

    async fn list_projects(&self) -> Result<Vec<Project>> {
        Ok(self.projects.values().cloned().collect())
    }

    async fn save_task(&mut self, task: &Task) -> Result<()> {
        self.tasks.insert(task.id, task.clone());
        Ok(())
    }

    async fn load_task(&self, id: TaskId) -> Result<Option<Task>> {
        Ok(self.tasks.get(&id).cloned())
    }

    async fn list_tasks(&self, filter: &TaskFilter) -> Result<Vec<Task>> {
        Ok(self.tasks.values().filter(|t| filter.matches(t)).cloned().collect())
    }

    async fn delete_task(&mut self, id: TaskId) -> Result<()> {
        self.tasks.remove(&id);
        Ok(())
    }

    async fn next_project_id(&self) -> Result<ProjectId> {
        match self.projects.keys().next_back() {
            None => Ok(ProjectId(1)),
            Some(last) => last.checked_next().ok_or_else(|| exhausted("project")),
        }
    }

    async fn next_task_id(&self) -> Result<TaskId> {
        match self.tasks.keys().next_back() {
            None => Ok(TaskId(1)),
            Some(last) => last.checked_next().ok_or_else(|| exhausted("task")),
        }
    }
}
