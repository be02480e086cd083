//! Scheduler configuration.

use chrono::FixedOffset;
use serde::{Deserialize, Serialize};

/// Default rendering of start/end times in responses.
pub const DEFAULT_TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Where tasks without a due date go in the priority order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissingDueDate {
    /// Undated tasks come after every dated task.
    #[default]
    Last,
    /// Undated tasks come before every dated task.
    First,
}

impl std::str::FromStr for MissingDueDate {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "last" => Ok(Self::Last),
            "first" => Ok(Self::First),
            other => Err(format!("unknown missing-due-date policy: {other} (expected first or last)")),
        }
    }
}

/// Configuration for the scheduling engine and response rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Ordering of tasks without due dates
    pub missing_due_date: MissingDueDate,
    /// Reject dependencies on ids outside the task set before scheduling
    pub reject_unknown_dependencies: bool,
    /// strftime pattern for start/end times
    pub time_format: String,
    /// Offset used to render times (None = UTC)
    pub utc_offset_minutes: Option<i32>,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            missing_due_date: MissingDueDate::Last,
            reject_unknown_dependencies: false,
            time_format: DEFAULT_TIME_FORMAT.to_string(),
            utc_offset_minutes: None,
        }
    }
}

impl SchedulerConfig {
    /// Create the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the missing-due-date policy.
    pub fn with_missing_due_date(mut self, policy: MissingDueDate) -> Self {
        self.missing_due_date = policy;
        self
    }

    /// Enable or disable up-front dependency reference checks.
    pub fn with_strict_dependencies(mut self, strict: bool) -> Self {
        self.reject_unknown_dependencies = strict;
        self
    }

    /// Set the time format.
    pub fn with_time_format(mut self, format: impl Into<String>) -> Self {
        self.time_format = format.into();
        self
    }

    /// Set the rendering offset in minutes east of UTC.
    pub fn with_utc_offset_minutes(mut self, minutes: i32) -> Self {
        self.utc_offset_minutes = Some(minutes);
        self
    }

    /// Rendering offset, `None` if the configured value is out of range.
    pub fn offset(&self) -> Option<FixedOffset> {
        match self.utc_offset_minutes {
            None => FixedOffset::east_opt(0),
            Some(minutes) => minutes.checked_mul(60).and_then(FixedOffset::east_opt),
        }
    }
}
