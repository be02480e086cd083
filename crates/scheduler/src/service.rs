//! Schedule service - validates a request against storage and runs the engine.

use minipm_core::{ProjectId, TaskDescriptor, TaskFilter, Time};
use minipm_storage::Storage;
use serde::{Deserialize, Serialize};
use tracing::{error, info};
use crate::report::{self, ScheduleReport, ScheduleResponse};
use crate::{validator, Result, ScheduleEngine, ScheduleError};

/// Body of a schedule request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScheduleRequest {
    /// Tasks to schedule; absent and empty are both rejected
    #[serde(default)]
    pub tasks: Option<Vec<TaskDescriptor>>,
}

impl ScheduleRequest {
    /// Request carrying `tasks`.
    pub fn new(tasks: Vec<TaskDescriptor>) -> Self {
        Self { tasks: Some(tasks) }
    }
}

/// Entry point for scheduling requests.
pub struct ScheduleService<S: Storage> {
    storage: S,
    engine: ScheduleEngine,
}

impl<S: Storage> ScheduleService<S> {
    /// Create a service with the default engine.
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            engine: ScheduleEngine::default(),
        }
    }

    /// Set the engine.
    pub fn with_engine(mut self, engine: ScheduleEngine) -> Self {
        self.engine = engine;
        self
    }

    /// Schedule the tasks carried by `request` for `project_id`.
    ///
    /// The project is looked up first, so an unknown project wins over an
    /// empty task list.
    pub async fn generate(&self, project_id: ProjectId, request: &ScheduleRequest, start: Time) -> Result<ScheduleReport> {
        info!(project_id = %project_id, "Received schedule request");

        let project = validator::require_project(&self.storage, project_id).await?;
        let tasks = request.tasks.as_deref().unwrap_or(&[]);

        let entries = self.engine.run(tasks, start).map_err(log_internal)?;
        report::assemble(&project, entries, self.engine.config()).map_err(log_internal)
    }

    /// Schedule every stored task of `project_id`.
    pub async fn generate_from_storage(&self, project_id: ProjectId, start: Time) -> Result<ScheduleReport> {
        info!(project_id = %project_id, "Scheduling stored tasks");

        let project = validator::require_project(&self.storage, project_id).await?;
        let tasks: Vec<TaskDescriptor> = self
            .storage
            .list_tasks(&TaskFilter::for_project(project_id))
            .await?
            .iter()
            .map(|t| t.descriptor())
            .collect();

        let entries = self.engine.run(&tasks, start).map_err(log_internal)?;
        report::assemble(&project, entries, self.engine.config()).map_err(log_internal)
    }

    /// `generate`, mapped onto the response boundary.
    pub async fn respond(&self, project_id: ProjectId, request: &ScheduleRequest, start: Time) -> ScheduleResponse {
        ScheduleResponse::from_result(self.generate(project_id, request, start).await)
    }

    /// Get a mutable reference to the storage.
    pub fn storage_mut(&mut self) -> &mut S {
        &mut self.storage
    }
}

fn log_internal(err: ScheduleError) -> ScheduleError {
    if let ScheduleError::Internal(detail) = &err {
        error!(error = %detail, "Error generating schedule");
    }
    err
}
