//! Summary statistics over a store's tasks

use crate::models::Task;
use chrono::{DateTime, Local, NaiveDate, Utc};
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};

/// Active and completed counts for one category
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CategoryStats {
    pub active: usize,
    pub completed: usize,
}

/// Task statistics
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskStats {
    pub total_tasks: usize,
    pub active_tasks: usize,
    pub completed_tasks: usize,
    /// Percentage with two decimals and a trailing `%`, or `0%` with no tasks
    pub completion_rate: String,
    pub overdue_tasks: usize,
    pub category_statistics: BTreeMap<String, CategoryStats>,
    /// Completions per distinct local calendar day, rounded to two decimals
    pub average_tasks_per_day: f64,
}

impl TaskStats {
    /// Compute statistics; `categories` lists every category to report,
    /// including ones without tasks.
    pub fn collect(
        active: &[Task],
        completed: &[Task],
        categories: &[String],
        now: DateTime<Utc>,
    ) -> Self {
        let total_tasks = active.len() + completed.len();

        let category_statistics = categories
            .iter()
            .map(|category| {
                let stats = CategoryStats {
                    active: active.iter().filter(|t| &t.category == category).count(),
                    completed: completed.iter().filter(|t| &t.category == category).count(),
                };
                (category.clone(), stats)
            })
            .collect();

        TaskStats {
            total_tasks,
            active_tasks: active.len(),
            completed_tasks: completed.len(),
            completion_rate: completion_rate(completed.len(), total_tasks),
            overdue_tasks: active.iter().filter(|t| is_overdue(t, now)).count(),
            category_statistics,
            average_tasks_per_day: average_per_day(completed),
        }
    }

    /// Average as displayed: `0` without completions, two decimals otherwise
    pub fn average_display(&self) -> String {
        if self.completed_tasks == 0 {
            "0".to_string()
        } else {
            format!("{:.2}", self.average_tasks_per_day)
        }
    }
}

pub(crate) fn is_overdue(task: &Task, now: DateTime<Utc>) -> bool {
    !task.completed && task.due_date.is_some_and(|due| due < now)
}

fn completion_rate(completed: usize, total: usize) -> String {
    if total == 0 {
        return "0%".to_string();
    }
    format!("{:.2}%", completed as f64 / total as f64 * 100.0)
}

fn average_per_day(completed: &[Task]) -> f64 {
    if completed.is_empty() {
        return 0.0;
    }

    let days: HashSet<NaiveDate> = completed
        .iter()
        .filter_map(|t| t.completed_at)
        .map(|at| at.with_timezone(&Local).date_naive())
        .collect();

    if days.is_empty() {
        return 0.0;
    }

    let average = completed.len() as f64 / days.len() as f64;
    (average * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn categories() -> Vec<String> {
        vec!["work".to_string(), "personal".to_string(), "urgent".to_string()]
    }

    fn done(id: u64, category: &str, at: DateTime<Utc>) -> Task {
        let mut task = Task::new(id, format!("Task {}", id));
        task.category = category.to_string();
        task.completed = true;
        task.completed_at = Some(at);
        task
    }

    #[test]
    fn test_empty() {
        let stats = TaskStats::collect(&[], &[], &categories(), Utc::now());
        assert_eq!(stats.total_tasks, 0);
        assert_eq!(stats.completion_rate, "0%");
        assert_eq!(stats.average_tasks_per_day, 0.0);
        assert_eq!(stats.average_display(), "0");
        assert_eq!(stats.category_statistics.len(), 3);
        assert_eq!(stats.category_statistics["urgent"], CategoryStats::default());
    }

    #[test]
    fn test_completion_rate() {
        let now = Utc::now();
        let active = vec![Task::new(1, "a"), Task::new(2, "b")];
        let completed = vec![done(3, "work", now)];

        let stats = TaskStats::collect(&active, &completed, &categories(), now);
        assert_eq!(stats.total_tasks, 3);
        assert_eq!(stats.active_tasks, 2);
        assert_eq!(stats.completed_tasks, 1);
        assert_eq!(stats.completion_rate, "33.33%");
        assert_eq!(stats.category_statistics["personal"].active, 2);
        assert_eq!(stats.category_statistics["work"].completed, 1);
    }

    #[test]
    fn test_overdue_counts_active_only() {
        let now = Utc::now();
        let mut late = Task::new(1, "late");
        late.due_date = Some(now - Duration::hours(2));
        let mut soon = Task::new(2, "soon");
        soon.due_date = Some(now + Duration::hours(2));

        let stats = TaskStats::collect(&[late, soon], &[], &categories(), now);
        assert_eq!(stats.overdue_tasks, 1);
    }

    #[test]
    fn test_average_per_day() {
        let base = Local::now()
            .date_naive()
            .and_hms_opt(12, 0, 0)
            .unwrap()
            .and_local_timezone(Local)
            .unwrap()
            .with_timezone(&Utc);
        let completed = vec![
            done(1, "work", base),
            done(2, "work", base + Duration::minutes(5)),
            done(3, "work", base - Duration::days(1)),
        ];

        let stats = TaskStats::collect(&[], &completed, &categories(), Utc::now());
        assert_eq!(stats.average_tasks_per_day, 1.5);
        assert_eq!(stats.average_display(), "1.50");
    }

    #[test]
    fn test_json_keys() {
        let stats = TaskStats::collect(&[], &[], &categories(), Utc::now());
        let value = serde_json::to_value(&stats).unwrap();
        assert!(value.get("completionRate").is_some());
        assert!(value.get("categoryStatistics").is_some());
        assert!(value.get("averageTasksPerDay").is_some());
    }
}
