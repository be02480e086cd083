//! Schedule entries - the timeline produced by a scheduling run.

use serde::{Deserialize, Serialize};
use crate::id::TaskId;
use crate::task::TaskDescriptor;
use crate::Time;

/// One placed task.
///
/// Timestamps keep full precision; string rendering happens at the
/// response boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    /// Source task id
    pub id: TaskId,

    /// Source task title
    pub title: String,

    /// Raw estimate copied from the descriptor
    pub estimated_hours: f64,

    /// Due date copied from the descriptor
    pub due_date: Option<Time>,

    /// Dependencies copied from the descriptor
    pub dependencies: Vec<TaskId>,

    /// When work starts
    pub start_time: Time,

    /// When work ends
    pub end_time: Time,
}

impl ScheduleEntry {
    /// Build an entry for `task` occupying `[start, end)`.
    pub fn new(task: &TaskDescriptor, start: Time, end: Time) -> Self {
        Self {
            id: task.id,
            title: task.title.clone(),
            estimated_hours: task.estimated_hours,
            due_date: task.due_date,
            dependencies: task.dependencies.clone(),
            start_time: start,
            end_time: end,
        }
    }
}
