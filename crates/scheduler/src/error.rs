//! Scheduling errors and the status taxonomy they map to.

use minipm_core::{ProjectId, TaskId};
use minipm_storage::StorageError;
use serde::{Deserialize, Serialize};

/// Result type for scheduling operations.
pub type Result<T> = std::result::Result<T, ScheduleError>;

/// Message reported for an unprocessable task graph.
pub const DEADLOCK_MESSAGE: &str = "Scheduling failed due to unresolvable task dependencies.";

/// Why a scheduling request failed. Every variant is terminal.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ScheduleError {
    /// No project with this id
    #[error("Project not found")]
    ProjectNotFound(ProjectId),

    /// Task list absent or empty
    #[error("No tasks provided")]
    NoTasksSupplied,

    /// A dependency names a task outside the request (strict mode only)
    #[error("Task {task} depends on unknown task {dependency}")]
    UnknownDependency {
        /// Task carrying the reference
        task: TaskId,
        /// Referenced id
        dependency: TaskId,
    },

    /// No remaining task could become ready
    #[error("{}", DEADLOCK_MESSAGE)]
    Deadlock {
        /// Tasks left unscheduled when the run stopped
        remaining: Vec<TaskId>,
    },

    /// Unexpected fault
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ScheduleError {
    /// Boundary status for this error.
    pub fn status(&self) -> ScheduleStatus {
        match self {
            Self::ProjectNotFound(_) => ScheduleStatus::ProjectNotFound,
            Self::NoTasksSupplied => ScheduleStatus::NoTasksSupplied,
            Self::UnknownDependency { .. } => ScheduleStatus::UnknownDependency,
            Self::Deadlock { .. } => ScheduleStatus::Deadlock,
            Self::Internal(_) => ScheduleStatus::Internal,
        }
    }
}

impl From<StorageError> for ScheduleError {
    fn from(err: StorageError) -> Self {
        Self::Internal(err.to_string())
    }
}

/// Outcome kind of a scheduling request at the response boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScheduleStatus {
    /// Every task scheduled
    Ok,
    /// Unknown project
    ProjectNotFound,
    /// Empty or absent task list
    NoTasksSupplied,
    /// Dangling dependency rejected up front
    UnknownDependency,
    /// Unprocessable task graph
    Deadlock,
    /// Unexpected fault
    Internal,
}

impl ScheduleStatus {
    /// HTTP-style status code.
    pub fn code(self) -> u16 {
        match self {
            Self::Ok => 200,
            Self::ProjectNotFound => 404,
            Self::NoTasksSupplied => 400,
            Self::UnknownDependency | Self::Deadlock => 422,
            Self::Internal => 500,
        }
    }

    /// Whether this is the success status.
    pub fn is_success(self) -> bool {
        self == Self::Ok
    }
}
