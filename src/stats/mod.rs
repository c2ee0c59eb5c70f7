//! Read-only projections over the task list. Recomputed from scratch on
//! every call, so they can never go stale against the store.

use serde::Serialize;

use crate::tasks::{Priority, Task};

/// Count and rounded share of the total for one priority level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PrioritySlice {
    pub count: usize,
    pub percent: u8,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskStats {
    pub total: usize,
    pub high: PrioritySlice,
    pub medium: PrioritySlice,
    pub low: PrioritySlice,
    pub completed: usize,
    pub completion_rate: u8,
}

impl TaskStats {
    pub fn slice(&self, priority: Priority) -> PrioritySlice {
        match priority {
            Priority::High => self.high,
            Priority::Medium => self.medium,
            Priority::Low => self.low,
        }
    }
}

/// Priority distribution and completion rate for the given tasks. An
/// empty list yields all zeros; no percentage ever divides by zero.
pub fn task_stats(tasks: &[Task]) -> TaskStats {
    let total = tasks.len();
    if total == 0 {
        return TaskStats::default();
    }

    let slice = |priority: Priority| {
        let count = tasks.iter().filter(|task| task.priority == priority).count();
        PrioritySlice {
            count,
            percent: percent_of(count, total),
        }
    };
    let completed = tasks.iter().filter(|task| task.completed).count();

    TaskStats {
        total,
        high: slice(Priority::High),
        medium: slice(Priority::Medium),
        low: slice(Priority::Low),
        completed,
        completion_rate: percent_of(completed, total),
    }
}

fn percent_of(count: usize, total: usize) -> u8 {
    (count as f64 / total as f64 * 100.0).round() as u8
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, Utc};

    use super::*;
    use crate::tasks::TaskId;

    fn task(priority: Priority, completed: bool) -> Task {
        Task {
            id: TaskId::generate(),
            description: "task".into(),
            due_date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
            priority,
            completed,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn empty_list_yields_all_zeros() {
        let stats = task_stats(&[]);
        assert_eq!(stats, TaskStats::default());
        assert_eq!(stats.completion_rate, 0);
        assert_eq!(stats.high.percent, 0);
    }

    #[test]
    fn counts_and_percentages_per_priority() {
        let tasks = vec![
            task(Priority::High, false),
            task(Priority::High, true),
            task(Priority::Medium, false),
            task(Priority::Low, true),
        ];
        let stats = task_stats(&tasks);

        assert_eq!(stats.total, 4);
        assert_eq!(stats.high, PrioritySlice { count: 2, percent: 50 });
        assert_eq!(stats.medium, PrioritySlice { count: 1, percent: 25 });
        assert_eq!(stats.low, PrioritySlice { count: 1, percent: 25 });
        assert_eq!(stats.completed, 2);
        assert_eq!(stats.completion_rate, 50);
    }

    #[test]
    fn percentages_sum_to_100_within_rounding() {
        let tasks = vec![
            task(Priority::High, false),
            task(Priority::Medium, false),
            task(Priority::Low, false),
        ];
        let stats = task_stats(&tasks);

        let sum = u32::from(stats.high.percent)
            + u32::from(stats.medium.percent)
            + u32::from(stats.low.percent);
        assert!((99..=101).contains(&sum), "sum was {sum}");
    }

    #[test]
    fn completion_rate_rounds() {
        let tasks = vec![
            task(Priority::Medium, true),
            task(Priority::Medium, false),
            task(Priority::Medium, false),
        ];
        // 1/3 rounds to 33.
        assert_eq!(task_stats(&tasks).completion_rate, 33);
    }

    #[test]
    fn recomputes_fresh_each_call() {
        let mut tasks = vec![task(Priority::Medium, false)];
        assert_eq!(task_stats(&tasks).completion_rate, 0);

        tasks[0].completed = true;
        tasks.push(task(Priority::High, false));
        let stats = task_stats(&tasks);
        assert_eq!(stats.completion_rate, 50);
        assert_eq!(stats.slice(Priority::High).count, 1);
    }
}
