//! minipm core data models.
//!
//! Projects, stored tasks, the descriptors a scheduling run consumes and the
//! entries it produces.

#![warn(missing_docs)]

// Identities
mod id;

// Projects and tasks
mod project;
mod task;

// Scheduling output
mod schedule;

// Re-exports
pub use id::{ProjectId, TaskId};
pub use project::Project;
pub use task::{Task, TaskDescriptor, TaskFilter};
pub use schedule::ScheduleEntry;

/// Timestamp type
pub type Time = chrono::DateTime<chrono::Utc>;
