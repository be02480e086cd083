//! Input validation - project lookup and task-set checks.

use std::collections::{BTreeMap, HashSet};
use minipm_core::{Project, ProjectId, TaskDescriptor, TaskId};
use minipm_storage::Storage;
use tracing::warn;
use crate::{Result, ScheduleError, SchedulerConfig};

/// Unscheduled tasks keyed and ordered by id.
pub type TaskIndex<'a> = BTreeMap<TaskId, &'a TaskDescriptor>;

/// Look up the project a request targets.
pub async fn require_project<S: Storage + ?Sized>(storage: &S, id: ProjectId) -> Result<Project> {
    match storage.load_project(id).await? {
        Some(project) => Ok(project),
        None => {
            warn!(project_id = %id, "Project not found");
            Err(ScheduleError::ProjectNotFound(id))
        }
    }
}

/// Check the task set and index it by id.
///
/// Fails with `NoTasksSupplied` on an empty set and with `Internal` on a
/// repeated id. With `reject_unknown_dependencies` set, a dependency on an
/// id outside the set is reported as `UnknownDependency`.
pub fn index_tasks<'a>(tasks: &'a [TaskDescriptor], config: &SchedulerConfig) -> Result<TaskIndex<'a>> {
    if tasks.is_empty() {
        return Err(ScheduleError::NoTasksSupplied);
    }

    let mut index = TaskIndex::new();
    for task in tasks {
        if index.insert(task.id, task).is_some() {
            return Err(ScheduleError::Internal(format!("duplicate task id {}", task.id)));
        }
    }

    if config.reject_unknown_dependencies {
        let known: HashSet<TaskId> = index.keys().copied().collect();
        for task in index.values() {
            if let Some(dependency) = task.dependencies.iter().find(|d| !known.contains(*d)) {
                warn!(task = %task.id, dependency = %dependency, "Unknown dependency reference");
                return Err(ScheduleError::UnknownDependency { task: task.id, dependency: *dependency });
            }
        }
    }

    Ok(index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use minipm_storage::MemoryStorage;

    #[test]
    fn test_empty_task_set() {
        let err = index_tasks(&[], &SchedulerConfig::default()).unwrap_err();
        assert_eq!(err, ScheduleError::NoTasksSupplied);
    }

    #[test]
    fn test_duplicate_ids_are_internal() {
        let tasks = vec![TaskDescriptor::new(1, "a"), TaskDescriptor::new(1, "b")];
        let err = index_tasks(&tasks, &SchedulerConfig::default()).unwrap_err();
        assert!(matches!(err, ScheduleError::Internal(msg) if msg.contains("duplicate task id 1")));
    }

    #[test]
    fn test_index_is_ordered_by_id() {
        let tasks = vec![TaskDescriptor::new(3, "c"), TaskDescriptor::new(1, "a"), TaskDescriptor::new(2, "b")];
        let index = index_tasks(&tasks, &SchedulerConfig::default()).unwrap();
        let ids: Vec<i64> = index.keys().map(|id| id.get()).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn test_unknown_dependency_only_in_strict_mode() {
        let tasks = vec![TaskDescriptor::new(1, "a").depends_on(99)];

        assert!(index_tasks(&tasks, &SchedulerConfig::default()).is_ok());

        let strict = SchedulerConfig::default().with_strict_dependencies(true);
        let err = index_tasks(&tasks, &strict).unwrap_err();
        assert_eq!(err, ScheduleError::UnknownDependency { task: TaskId(1), dependency: TaskId(99) });
    }

    #[tokio::test]
    async fn test_require_project() {
        let mut storage = MemoryStorage::new();
        storage.save_project(&Project::new(ProjectId(1), "Launch")).await.unwrap();

        let project = require_project(&storage, ProjectId(1)).await.unwrap();
        assert_eq!(project.title, "Launch");

        let err = require_project(&storage, ProjectId(2)).await.unwrap_err();
        assert_eq!(err, ScheduleError::ProjectNotFound(ProjectId(2)));
    }
}
