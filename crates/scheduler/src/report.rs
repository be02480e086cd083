//! Output assembly - the response shape of a scheduling request.

use std::fmt::Write as _;
use chrono::FixedOffset;
use minipm_core::{Project, ProjectId, ScheduleEntry, TaskId, Time};
use serde::Serialize;
use crate::{Result, ScheduleError, ScheduleStatus, SchedulerConfig};

/// A successful schedule, ready to serialize.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleReport {
    /// Requested project
    pub project_id: ProjectId,
    /// Its title
    pub project_title: String,
    /// Number of scheduled entries
    pub task_count: usize,
    /// Task titles in scheduling order
    pub recommended_order: Vec<String>,
    /// Rendered entries in scheduling order
    pub schedule_details: Vec<ScheduleDetail>,
    /// Full-precision entries, not serialized
    #[serde(skip)]
    pub entries: Vec<ScheduleEntry>,
}

/// One entry with start/end rendered as strings.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleDetail {
    /// Task id
    pub id: TaskId,
    /// Task title
    pub title: String,
    /// Rendered start
    pub start_time: String,
    /// Rendered end
    pub end_time: String,
    /// Raw estimate
    pub estimated_hours: f64,
    /// Due date
    pub due_date: Option<Time>,
    /// Dependencies
    pub dependencies: Vec<TaskId>,
}

/// Build the report for `entries`, keeping their order.
pub fn assemble(project: &Project, entries: Vec<ScheduleEntry>, config: &SchedulerConfig) -> Result<ScheduleReport> {
    let offset = config.offset().ok_or_else(|| {
        ScheduleError::Internal(format!("UTC offset out of range: {:?} minutes", config.utc_offset_minutes))
    })?;

    let schedule_details = entries
        .iter()
        .map(|entry| {
            Ok(ScheduleDetail {
                id: entry.id,
                title: entry.title.clone(),
                start_time: render(entry.start_time, offset, &config.time_format)?,
                end_time: render(entry.end_time, offset, &config.time_format)?,
                estimated_hours: entry.estimated_hours,
                due_date: entry.due_date,
                dependencies: entry.dependencies.clone(),
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(ScheduleReport {
        project_id: project.id,
        project_title: project.title.clone(),
        task_count: entries.len(),
        recommended_order: entries.iter().map(|e| e.title.clone()).collect(),
        schedule_details,
        entries,
    })
}

/// Render `time` at `offset` with a strftime pattern.
pub fn render(time: Time, offset: FixedOffset, format: &str) -> Result<String> {
    let mut out = String::new();
    write!(out, "{}", time.with_timezone(&offset).format(format))
        .map_err(|_| ScheduleError::Internal(format!("invalid time format: {format}")))?;
    Ok(out)
}

/// Error payload at the response boundary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorBody {
    /// Human-readable message
    pub message: String,
    /// Fault detail, internal errors only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Response body, either a report or an error.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ResponseBody {
    /// Success
    Report(ScheduleReport),
    /// Failure
    Error(ErrorBody),
}

/// Status plus body, what a transport writes out.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScheduleResponse {
    /// Outcome kind
    pub status: ScheduleStatus,
    /// Payload
    pub body: ResponseBody,
}

impl ScheduleResponse {
    /// Map a scheduling result onto the response boundary.
    pub fn from_result(result: Result<ScheduleReport>) -> Self {
        match result {
            Ok(report) => Self {
                status: ScheduleStatus::Ok,
                body: ResponseBody::Report(report),
            },
            Err(err) => {
                let body = match &err {
                    ScheduleError::Internal(detail) => ErrorBody {
                        message: "Internal server error".to_string(),
                        error: Some(detail.clone()),
                    },
                    other => ErrorBody {
                        message: other.to_string(),
                        error: None,
                    },
                };
                Self { status: err.status(), body: ResponseBody::Error(body) }
            }
        }
    }

    /// HTTP-style status code.
    pub fn code(&self) -> u16 {
        self.status.code()
    }
}
