//! Timeline building - placing selected tasks one after another.

use minipm_core::{ScheduleEntry, TaskDescriptor, Time};
use tracing::debug;
use crate::dependency::FinishTimes;
use crate::{Result, ScheduleError};

/// Entries placed so far and their finish times.
///
/// The clock is not stored here: `place` returns the advanced clock and the
/// caller threads it into the next iteration.
#[derive(Debug, Default)]
pub struct Timeline {
    entries: Vec<ScheduleEntry>,
    finished: FinishTimes,
}

impl Timeline {
    /// Create an empty timeline with room for `n` tasks.
    pub fn with_capacity(n: usize) -> Self {
        Self {
            entries: Vec::with_capacity(n),
            finished: FinishTimes::with_capacity(n),
        }
    }

    /// Place `task` at `start` and return the new clock (its end time).
    ///
    /// Running the clock to the end of every placed task keeps the timeline
    /// strictly sequential.
    pub fn place(&mut self, task: &TaskDescriptor, start: Time) -> Result<Time> {
        let end = start.checked_add_signed(task.duration()).ok_or_else(|| {
            ScheduleError::Internal(format!("end time of task {} is out of range", task.id))
        })?;

        debug!(
            task = %task.id,
            title = %task.title,
            start = %start,
            end = %end,
            "Scheduled task"
        );

        self.entries.push(ScheduleEntry::new(task, start, end));
        self.finished.insert(task.id, end);
        Ok(end)
    }

    /// Finish times of placed tasks.
    pub fn finished(&self) -> &FinishTimes {
        &self.finished
    }

    /// Entries in placement order.
    pub fn entries(&self) -> &[ScheduleEntry] {
        &self.entries
    }

    /// Number of placed tasks.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing has been placed.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Consume the timeline, yielding entries in placement order.
    pub fn into_entries(self) -> Vec<ScheduleEntry> {
        self.entries
    }
}
