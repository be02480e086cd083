//! Scheduling layer - validation, dependency resolution, task selection and
//! timeline building.
//!
//! A run places tasks one at a time on a single timeline: the ready task with
//! the earliest due date (then the shortest estimate, then the lowest id) goes
//! next, starting no earlier than the clock or any of its dependencies'
//! finish times.

#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod validator;
pub mod dependency;
pub mod selector;
pub mod timeline;
pub mod engine;
pub mod report;
pub mod service;

pub use config::{SchedulerConfig, MissingDueDate};
pub use error::{ScheduleError, ScheduleStatus, Result};
pub use dependency::{Resolution, FinishTimes};
pub use selector::{TaskSelector, PrioritySelector, Candidate};
pub use timeline::Timeline;
pub use engine::ScheduleEngine;
pub use report::{ScheduleReport, ScheduleDetail, ScheduleResponse};
pub use service::{ScheduleService, ScheduleRequest};
