//! Dependency resolution - which unscheduled tasks are ready.

use std::collections::HashMap;
use minipm_core::{TaskDescriptor, TaskId, Time};
use crate::validator::TaskIndex;

/// Finish time of every task scheduled so far.
pub type FinishTimes = HashMap<TaskId, Time>;

/// Result of checking one task's dependencies.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    /// All dependencies finished, ready to schedule
    Ready,
    /// Waiting on these tasks
    Blocked(Vec<TaskId>),
}

/// Check whether every dependency of `task` has a finish time.
pub fn check(task: &TaskDescriptor, finished: &FinishTimes) -> Resolution {
    let pending: Vec<TaskId> = task
        .dependencies
        .iter()
        .filter(|d| !finished.contains_key(*d))
        .copied()
        .collect();

    if pending.is_empty() {
        Resolution::Ready
    } else {
        Resolution::Blocked(pending)
    }
}

/// Unscheduled tasks whose dependencies are all finished, in id order.
///
/// Recomputed from scratch on each call. An empty result while tasks
/// remain means the run is deadlocked, whether through a cycle or a
/// reference to a task that is not in the set.
pub fn ready_tasks<'a>(unscheduled: &TaskIndex<'a>, finished: &FinishTimes) -> Vec<&'a TaskDescriptor> {
    unscheduled
        .values()
        .copied()
        .filter(|task| check(task, finished) == Resolution::Ready)
        .collect()
}
