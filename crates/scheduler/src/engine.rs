//! The scheduling engine - runs the greedy placement loop.

use minipm_core::{ScheduleEntry, TaskDescriptor, TaskId, Time};
use tracing::{info, warn};
use crate::dependency::ready_tasks;
use crate::selector::{PrioritySelector, TaskSelector};
use crate::timeline::Timeline;
use crate::{validator, Result, ScheduleError, SchedulerConfig};

/// The scheduling engine.
///
/// Each run loops:
/// ```text
/// Ready set → Select one → Place on timeline → Advance clock
/// ```
/// until every task is placed or no task can become ready.
pub struct ScheduleEngine {
    selector: Box<dyn TaskSelector>,
    config: SchedulerConfig,
}

impl ScheduleEngine {
    /// Create an engine using the priority selector the config describes.
    pub fn new(config: SchedulerConfig) -> Self {
        let selector = PrioritySelector::new().with_missing_due_date(config.missing_due_date);
        Self {
            selector: Box::new(selector),
            config,
        }
    }

    /// Replace the task selector.
    pub fn with_selector(mut self, selector: Box<dyn TaskSelector>) -> Self {
        self.selector = selector;
        self
    }

    /// Engine configuration.
    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    /// Schedule `tasks` on a single timeline starting at `start`.
    ///
    /// Returns entries in scheduling order. On any error nothing is returned,
    /// even if some tasks were already placed.
    pub fn run(&self, tasks: &[TaskDescriptor], start: Time) -> Result<Vec<ScheduleEntry>> {
        let mut unscheduled = validator::index_tasks(tasks, &self.config)?;
        let mut timeline = Timeline::with_capacity(unscheduled.len());
        let mut clock = start;

        info!(tasks = unscheduled.len(), start = %start, "Starting schedule run");

        while !unscheduled.is_empty() {
            let ready = ready_tasks(&unscheduled, timeline.finished());
            if ready.is_empty() {
                let remaining: Vec<TaskId> = unscheduled.keys().copied().collect();
                warn!(
                    scheduled = timeline.len(),
                    remaining = ?remaining,
                    "Deadlock detected: dependencies could not be resolved"
                );
                return Err(ScheduleError::Deadlock { remaining });
            }

            let candidate = self
                .selector
                .select(&ready, clock, timeline.finished())
                .ok_or_else(|| ScheduleError::Internal("selector rejected a non-empty ready set".to_string()))?;

            let id = candidate.task.id;
            clock = timeline.place(candidate.task, candidate.earliest_start)?;
            unscheduled.remove(&id);
        }

        info!(tasks = timeline.len(), finish = %clock, "Schedule completed");
        Ok(timeline.into_entries())
    }
}

impl Default for ScheduleEngine {
    fn default() -> Self {
        Self::new(SchedulerConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};
    use std::collections::HashMap;
    use crate::config::MissingDueDate;
    use crate::dependency::FinishTimes;
    use crate::selector::Candidate;

    fn t0() -> Time {
        Utc.with_ymd_and_hms(2025, 10, 30, 9, 0, 0).unwrap()
    }

    fn order(entries: &[ScheduleEntry]) -> Vec<i64> {
        entries.iter().map(|e| e.id.get()).collect()
    }

    fn assert_sound(tasks: &[TaskDescriptor], entries: &[ScheduleEntry]) {
        assert_eq!(entries.len(), tasks.len());

        let by_id: HashMap<TaskId, &ScheduleEntry> = entries.iter().map(|e| (e.id, e)).collect();
        for entry in entries {
            for dep in &entry.dependencies {
                assert!(entry.start_time >= by_id[dep].end_time, "{} starts before {} ends", entry.id, dep);
            }
        }
        for pair in entries.windows(2) {
            assert!(pair[1].start_time >= pair[0].end_time);
        }
    }

    #[test]
    fn test_independent_tasks() {
        let day = t0();
        let tasks = vec![
            TaskDescriptor::new(1, "A").with_hours(2.0).with_due_date(day + Duration::days(1)),
            TaskDescriptor::new(2, "B").with_hours(1.0).with_due_date(day),
        ];

        let entries = ScheduleEngine::default().run(&tasks, t0()).unwrap();
        assert_eq!(order(&entries), vec![2, 1]);
        assert_eq!((entries[0].start_time, entries[0].end_time), (t0(), t0() + Duration::hours(1)));
        assert_eq!((entries[1].start_time, entries[1].end_time), (t0() + Duration::hours(1), t0() + Duration::hours(3)));
    }

    #[test]
    fn test_chain() {
        let tasks = vec![
            TaskDescriptor::new(1, "A").with_hours(1.0),
            TaskDescriptor::new(2, "B").with_hours(1.0).depends_on(1),
        ];

        let entries = ScheduleEngine::default().run(&tasks, t0()).unwrap();
        assert_eq!(order(&entries), vec![1, 2]);
        assert_eq!(entries[0].end_time, t0() + Duration::hours(1));
        assert_eq!(entries[1].start_time, t0() + Duration::hours(1));
        assert_eq!(entries[1].end_time, t0() + Duration::hours(2));
    }

    #[test]
    fn test_dependency_overrides_due_date() {
        // B is due first but needs A.
        let tasks = vec![
            TaskDescriptor::new(1, "A").with_hours(3.0).with_due_date(t0() + Duration::days(5)),
            TaskDescriptor::new(2, "B").with_hours(1.0).with_due_date(t0()).depends_on(1),
            TaskDescriptor::new(3, "C").with_hours(1.0).with_due_date(t0() + Duration::days(2)),
        ];

        let entries = ScheduleEngine::default().run(&tasks, t0()).unwrap();
        assert_eq!(order(&entries), vec![3, 1, 2]);
        assert_sound(&tasks, &entries);
    }

    #[test]
    fn test_diamond_is_complete_and_sound() {
        let tasks = vec![
            TaskDescriptor::new(4, "integrate").with_hours(2.0).depends_on(2).depends_on(3),
            TaskDescriptor::new(3, "frontend").with_hours(5.0).depends_on(1),
            TaskDescriptor::new(2, "backend").with_hours(4.0).depends_on(1),
            TaskDescriptor::new(1, "design").with_hours(1.5),
            TaskDescriptor::new(5, "docs"),
        ];

        let entries = ScheduleEngine::default().run(&tasks, t0()).unwrap();
        assert_sound(&tasks, &entries);
        assert_eq!(order(&entries), vec![5, 1, 2, 3, 4]);
        assert_eq!(entries.last().unwrap().end_time, t0() + Duration::minutes(60 * 13 + 30));
    }

    #[test]
    fn test_duration_floor() {
        let tasks = vec![
            TaskDescriptor::new(1, "zero"),
            TaskDescriptor::new(2, "fractional").with_hours(2.5).depends_on(1),
        ];

        let entries = ScheduleEngine::default().run(&tasks, t0()).unwrap();
        assert_eq!(entries[0].end_time - entries[0].start_time, Duration::hours(1));
        assert_eq!(entries[1].end_time - entries[1].start_time, Duration::minutes(150));
    }

    #[test]
    fn test_signed_zero_estimates_order_by_id() {
        let tasks = vec![
            TaskDescriptor::new(1, "zero").with_hours(0.0),
            TaskDescriptor::new(2, "negative zero").with_hours(-0.0),
        ];
        let entries = ScheduleEngine::default().run(&tasks, t0()).unwrap();
        assert_eq!(order(&entries), vec![1, 2]);
        assert_sound(&tasks, &entries);
    }

    #[test]
    fn test_cycle_is_deadlock() {
        let tasks = vec![
            TaskDescriptor::new(1, "A").depends_on(2),
            TaskDescriptor::new(2, "B").depends_on(1),
        ];

        let err = ScheduleEngine::default().run(&tasks, t0()).unwrap_err();
        assert_eq!(err, ScheduleError::Deadlock { remaining: vec![TaskId(1), TaskId(2)] });
    }

    #[test]
    fn test_partial_progress_still_deadlocks() {
        let tasks = vec![
            TaskDescriptor::new(1, "free"),
            TaskDescriptor::new(2, "A").depends_on(3),
            TaskDescriptor::new(3, "B").depends_on(2),
        ];

        let err = ScheduleEngine::default().run(&tasks, t0()).unwrap_err();
        assert_eq!(err, ScheduleError::Deadlock { remaining: vec![TaskId(2), TaskId(3)] });
    }

    #[test]
    fn test_dangling_reference_is_deadlock() {
        let tasks = vec![TaskDescriptor::new(1, "A").depends_on(99)];

        let err = ScheduleEngine::default().run(&tasks, t0()).unwrap_err();
        assert!(matches!(err, ScheduleError::Deadlock { .. }));

        let strict = ScheduleEngine::new(SchedulerConfig::new().with_strict_dependencies(true));
        let err = strict.run(&tasks, t0()).unwrap_err();
        assert!(matches!(err, ScheduleError::UnknownDependency { .. }));
    }

    #[test]
    fn test_empty_input() {
        let err = ScheduleEngine::default().run(&[], t0()).unwrap_err();
        assert_eq!(err, ScheduleError::NoTasksSupplied);
    }

    #[test]
    fn test_missing_due_date_policy_changes_order() {
        let tasks = vec![
            TaskDescriptor::new(1, "undated").with_hours(1.0),
            TaskDescriptor::new(2, "dated").with_hours(1.0).with_due_date(t0() + Duration::days(3)),
        ];

        let entries = ScheduleEngine::default().run(&tasks, t0()).unwrap();
        assert_eq!(order(&entries), vec![2, 1]);

        let legacy = ScheduleEngine::new(SchedulerConfig::new().with_missing_due_date(MissingDueDate::First));
        let entries = legacy.run(&tasks, t0()).unwrap();
        assert_eq!(order(&entries), vec![1, 2]);
    }

    #[test]
    fn test_deterministic_across_input_order() {
        let mut tasks = vec![
            TaskDescriptor::new(1, "a").with_hours(2.0),
            TaskDescriptor::new(2, "b").with_hours(2.0),
            TaskDescriptor::new(3, "c").with_hours(2.0).depends_on(1),
        ];
        let engine = ScheduleEngine::default();
        let first = engine.run(&tasks, t0()).unwrap();
        tasks.reverse();
        let second = engine.run(&tasks, t0()).unwrap();
        assert_eq!(first, second);
    }

    struct LongestFirst;

    impl TaskSelector for LongestFirst {
        fn select<'a>(&self, ready: &[&'a TaskDescriptor], clock: Time, finished: &FinishTimes) -> Option<Candidate<'a>> {
            let task = ready.iter().copied().max_by(|a, b| a.estimated_hours.total_cmp(&b.estimated_hours))?;
            Some(Candidate { task, earliest_start: crate::selector::earliest_start(task, clock, finished) })
        }
    }

    #[test]
    fn test_custom_selector() {
        let tasks = vec![
            TaskDescriptor::new(1, "short").with_hours(1.0),
            TaskDescriptor::new(2, "long").with_hours(4.0),
        ];

        let engine = ScheduleEngine::default().with_selector(Box::new(LongestFirst));
        let entries = engine.run(&tasks, t0()).unwrap();
        assert_eq!(order(&entries), vec![2, 1]);
    }
}
