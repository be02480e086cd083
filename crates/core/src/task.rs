//! Task model - stored tasks and the descriptors the scheduler consumes.

use serde::{Deserialize, Deserializer, Serialize};
use crate::id::{ProjectId, TaskId};
use crate::Time;

/// Microseconds per hour, the resolution task durations are kept at.
const MICROS_PER_HOUR: f64 = 3_600_000_000.0;

/// A task as persisted by the storage layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    /// Unique identifier
    pub id: TaskId,

    /// Owning project
    pub project_id: ProjectId,

    /// Task title
    pub title: String,

    /// Whether the task has been marked done
    #[serde(default)]
    pub is_completed: bool,

    /// Estimated effort in hours (0 means unspecified)
    #[serde(default)]
    pub estimated_hours: f64,

    /// Optional due date
    #[serde(default)]
    pub due_date: Option<Time>,

    /// Tasks that must finish before this one starts
    #[serde(default)]
    pub dependencies: Vec<TaskId>,

    /// Creation timestamp
    pub created_at: Time,
}

impl Task {
    /// Create a new task. The id is normally replaced by the storage backend.
    pub fn new(id: TaskId, project_id: ProjectId, title: impl Into<String>) -> Self {
        Self {
            id,
            project_id,
            title: title.into(),
            is_completed: false,
            estimated_hours: 0.0,
            due_date: None,
            dependencies: Vec::new(),
            created_at: chrono::Utc::now(),
        }
    }

    /// Snapshot of the fields the scheduler works with.
    pub fn descriptor(&self) -> TaskDescriptor {
        TaskDescriptor {
            id: self.id,
            title: self.title.clone(),
            estimated_hours: self.estimated_hours,
            due_date: self.due_date,
            dependencies: self.dependencies.clone(),
        }
    }
}

/// Immutable input to one scheduling run.
///
/// This is the wire shape of a task inside a schedule request, so it uses
/// camelCase field names. Missing `estimatedHours`, `dueDate` and
/// `dependencies` fall back to `0`, `null` and `[]`; an explicit `null`
/// dependency list is read as empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskDescriptor {
    /// Task id, unique within the request
    pub id: TaskId,

    /// Display title
    pub title: String,

    /// Estimated effort in hours
    #[serde(default)]
    pub estimated_hours: f64,

    /// Optional due date
    #[serde(default)]
    pub due_date: Option<Time>,

    /// Prerequisite task ids
    #[serde(default, deserialize_with = "null_as_empty")]
    pub dependencies: Vec<TaskId>,
}

impl TaskDescriptor {
    /// Create a descriptor with no estimate, due date or dependencies.
    pub fn new(id: i64, title: impl Into<String>) -> Self {
        Self {
            id: TaskId(id),
            title: title.into(),
            estimated_hours: 0.0,
            due_date: None,
            dependencies: Vec::new(),
        }
    }

    /// Set the estimate.
    pub fn with_hours(mut self, hours: f64) -> Self {
        self.estimated_hours = hours;
        self
    }

    /// Set the due date.
    pub fn with_due_date(mut self, due: Time) -> Self {
        self.due_date = Some(due);
        self
    }

    /// Add a prerequisite.
    pub fn depends_on(mut self, id: i64) -> Self {
        self.dependencies.push(TaskId(id));
        self
    }

    /// Hours the task occupies on the timeline.
    ///
    /// Non-positive (and NaN) estimates count as one hour.
    pub fn effective_hours(&self) -> f64 {
        if self.estimated_hours > 0.0 {
            self.estimated_hours
        } else {
            1.0
        }
    }

    /// Timeline duration at microsecond resolution.
    pub fn duration(&self) -> chrono::Duration {
        // `as` saturates, so an infinite estimate becomes the largest delta
        // and surfaces later as a timestamp overflow.
        chrono::Duration::microseconds((self.effective_hours() * MICROS_PER_HOUR).round() as i64)
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<TaskId>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<TaskId>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Filter for querying stored tasks.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaskFilter {
    /// Restrict to one project
    pub project_id: Option<ProjectId>,

    /// Restrict by completion flag
    pub is_completed: Option<bool>,
}

impl TaskFilter {
    /// All tasks of a project.
    pub fn for_project(project_id: ProjectId) -> Self {
        Self {
            project_id: Some(project_id),
            is_completed: None,
        }
    }

    /// Whether the task passes the filter.
    pub fn matches(&self, task: &Task) -> bool {
        self.project_id.map_or(true, |p| task.project_id == p)
            && self.is_completed.map_or(true, |c| task.is_completed == c)
    }
}
