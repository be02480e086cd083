//! Task selection strategies.

use std::cmp::Ordering;
use minipm_core::{TaskDescriptor, Time};
use crate::config::MissingDueDate;
use crate::dependency::FinishTimes;

/// A ready task together with the earliest time it may start.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate<'a> {
    /// The task
    pub task: &'a TaskDescriptor,
    /// `max(clock, latest dependency finish)`
    pub earliest_start: Time,
}

/// Strategy for picking the next task to place on the timeline.
pub trait TaskSelector: Send + Sync {
    /// Pick exactly one task from a non-empty ready set.
    ///
    /// Returns `None` only when `ready` is empty.
    fn select<'a>(
        &self,
        ready: &[&'a TaskDescriptor],
        clock: Time,
        finished: &FinishTimes,
    ) -> Option<Candidate<'a>>;
}

/// Earliest feasible start of `task` given the clock and finish times.
///
/// Tasks without dependencies start at the clock. Otherwise the latest
/// finish among dependencies already in `finished` acts as a floor.
pub fn earliest_start(task: &TaskDescriptor, clock: Time, finished: &FinishTimes) -> Time {
    task.dependencies
        .iter()
        .filter_map(|d| finished.get(d))
        .max()
        .map_or(clock, |&latest| latest.max(clock))
}

/// Due date first, then shortest estimate, then lowest id.
#[derive(Debug, Clone, Copy, Default)]
pub struct PrioritySelector {
    missing_due_date: MissingDueDate,
}

impl PrioritySelector {
    /// Create a selector with the default missing-due-date policy.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set where undated tasks sort.
    pub fn with_missing_due_date(mut self, policy: MissingDueDate) -> Self {
        self.missing_due_date = policy;
        self
    }

    /// Total priority order; `Less` means `a` is scheduled first.
    pub fn compare(&self, a: &TaskDescriptor, b: &TaskDescriptor) -> Ordering {
        self.compare_due(a.due_date, b.due_date)
            .then_with(|| compare_hours(a.estimated_hours, b.estimated_hours))
            .then_with(|| a.id.cmp(&b.id))
    }

    fn compare_due(&self, a: Option<Time>, b: Option<Time>) -> Ordering {
        match (a, b, self.missing_due_date) {
            (Some(a), Some(b), _) => a.cmp(&b),
            (None, None, _) => Ordering::Equal,
            (None, Some(_), MissingDueDate::Last) | (Some(_), None, MissingDueDate::First) => Ordering::Greater,
            (None, Some(_), MissingDueDate::First) | (Some(_), None, MissingDueDate::Last) => Ordering::Less,
        }
    }
}

/// Numeric order, so `-0.0 == 0.0`; NaN falls back to `total_cmp`.
fn compare_hours(a: f64, b: f64) -> Ordering {
    a.partial_cmp(&b).unwrap_or_else(|| a.total_cmp(&b))
}

impl TaskSelector for PrioritySelector {
    fn select<'a>(
        &self,
        ready: &[&'a TaskDescriptor],
        clock: Time,
        finished: &FinishTimes,
    ) -> Option<Candidate<'a>> {
        let task = ready.iter().copied().min_by(|a, b| self.compare(a, b))?;
        Some(Candidate {
            task,
            earliest_start: earliest_start(task, clock, finished),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};
    use minipm_core::TaskId;

    fn t0() -> Time {
        Utc.with_ymd_and_hms(2025, 3, 3, 8, 0, 0).unwrap()
    }

    fn pick(selector: &PrioritySelector, tasks: &[TaskDescriptor]) -> i64 {
        let ready: Vec<&TaskDescriptor> = tasks.iter().collect();
        selector.select(&ready, t0(), &FinishTimes::new()).unwrap().task.id.get()
    }

    #[test]
    fn test_earlier_due_date_wins() {
        let tasks = vec![
            TaskDescriptor::new(1, "later").with_hours(1.0).with_due_date(t0() + Duration::days(2)),
            TaskDescriptor::new(2, "sooner").with_hours(8.0).with_due_date(t0() + Duration::days(1)),
        ];
        assert_eq!(pick(&PrioritySelector::new(), &tasks), 2);
    }

    #[test]
    fn test_shorter_estimate_breaks_due_date_tie() {
        let due = t0() + Duration::days(1);
        let tasks = vec![
            TaskDescriptor::new(1, "long").with_hours(5.0).with_due_date(due),
            TaskDescriptor::new(2, "short").with_hours(2.0).with_due_date(due),
        ];
        assert_eq!(pick(&PrioritySelector::new(), &tasks), 2);
    }

    #[test]
    fn test_raw_estimate_used_for_ordering() {
        // Both occupy one hour, but the raw estimate still orders them.
        let tasks = vec![
            TaskDescriptor::new(1, "zero").with_hours(0.0),
            TaskDescriptor::new(2, "negative").with_hours(-1.0),
        ];
        assert_eq!(pick(&PrioritySelector::new(), &tasks), 2);
    }

    #[test]
    fn test_lowest_id_breaks_full_tie() {
        let tasks = vec![
            TaskDescriptor::new(7, "b").with_hours(1.0),
            TaskDescriptor::new(3, "a").with_hours(1.0),
            TaskDescriptor::new(5, "c").with_hours(1.0),
        ];
        assert_eq!(pick(&PrioritySelector::new(), &tasks), 3);
    }

    #[test]
    fn test_signed_zero_estimates_tie_on_id() {
        let tasks = vec![
            TaskDescriptor::new(1, "zero").with_hours(0.0),
            TaskDescriptor::new(2, "negative zero").with_hours(-0.0),
        ];
        assert_eq!(pick(&PrioritySelector::new(), &tasks), 1);

        let reversed = vec![tasks[1].clone(), tasks[0].clone()];
        assert_eq!(pick(&PrioritySelector::new(), &reversed), 1);
    }

    #[test]
    fn test_nan_estimate_still_totally_ordered() {
        let tasks = vec![
            TaskDescriptor::new(1, "nan").with_hours(f64::NAN),
            TaskDescriptor::new(2, "two").with_hours(2.0),
        ];
        assert_eq!(pick(&PrioritySelector::new(), &tasks), 2);
    }

    #[test]
    fn test_missing_due_date_last_by_default() {
        let tasks = vec![
            TaskDescriptor::new(1, "whenever").with_hours(1.0),
            TaskDescriptor::new(2, "dated").with_hours(9.0).with_due_date(t0() + Duration::days(30)),
        ];
        assert_eq!(pick(&PrioritySelector::new(), &tasks), 2);
    }

    #[test]
    fn test_missing_due_date_first_policy() {
        let tasks = vec![
            TaskDescriptor::new(1, "dated").with_hours(1.0).with_due_date(t0()),
            TaskDescriptor::new(2, "whenever").with_hours(9.0),
        ];
        let selector = PrioritySelector::new().with_missing_due_date(MissingDueDate::First);
        assert_eq!(pick(&selector, &tasks), 2);
    }

    #[test]
    fn test_earliest_start_floors() {
        let task = TaskDescriptor::new(3, "c").depends_on(1).depends_on(2);
        let mut finished = FinishTimes::new();
        finished.insert(TaskId(1), t0() + Duration::hours(2));
        finished.insert(TaskId(2), t0() + Duration::hours(5));

        assert_eq!(earliest_start(&task, t0(), &finished), t0() + Duration::hours(5));
        assert_eq!(earliest_start(&task, t0() + Duration::hours(9), &finished), t0() + Duration::hours(9));

        let free = TaskDescriptor::new(4, "free");
        assert_eq!(earliest_start(&free, t0(), &finished), t0());
    }

    #[test]
    fn test_empty_ready_set() {
        let selector = PrioritySelector::new();
        assert!(selector.select(&[], t0(), &FinishTimes::new()).is_none());
    }
}
