//! In-memory task store

use crate::config::StoreConfig;
use crate::models::{Notification, NotificationKind, Subtask, Task, TaskPatch};
use crate::storage::id_generator::{IdExhausted, IdGenerator};
use crate::storage::notifications::NotificationLog;
use crate::storage::priority;
use crate::storage::stats::{TaskStats, is_overdue};
use chrono::{DateTime, Duration, Utc};
use thiserror::Error;

/// Errors related to task store operations
#[derive(Debug, Error)]
pub enum TaskStoreError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Task with id {0} not found")]
    TaskNotFound(u64),
    #[error("Subtask with id {subtask} not found in task {parent}")]
    SubtaskNotFound { parent: u64, subtask: String },
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<IdExhausted> for TaskStoreError {
    fn from(e: IdExhausted) -> Self {
        TaskStoreError::InvalidInput(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, TaskStoreError>;

/// Filter criteria for querying active tasks
#[derive(Debug, Default, Clone)]
pub struct TaskFilter {
    pub category: Option<String>,
    /// All of these tags must be present
    pub tags: Vec<String>,
    /// Case-insensitive text query over title, description and tags
    pub query: Option<String>,
    /// Only tasks whose due date has passed
    pub overdue: bool,
    /// Only tasks due between now and this many days from now
    pub due_within_days: Option<i64>,
}

impl TaskFilter {
    /// Check if a task matches the filter criteria at `now`
    pub fn matches(&self, task: &Task, now: DateTime<Utc>) -> bool {
        // Filter by category
        if let Some(category) = &self.category
            && &task.category != category
        {
            return false;
        }

        // Filter by tags (all specified tags must be present)
        if !self.tags.iter().all(|tag| task.has_tag(tag)) {
            return false;
        }

        if let Some(query) = &self.query
            && !task.matches_query(&query.to_lowercase())
        {
            return false;
        }

        if self.overdue && !is_overdue(task, now) {
            return false;
        }

        if let Some(days) = self.due_within_days {
            // None when the horizon is past the representable range: unbounded
            let horizon = Duration::try_days(days).and_then(|d| now.checked_add_signed(d));
            let in_window = task
                .due_date
                .is_some_and(|due| due >= now && horizon.is_none_or(|h| due <= h));
            if task.completed || !in_window {
                return false;
            }
        }

        true
    }
}

/// Owns every task, the category registry and the notification log.
///
/// Active tasks are kept sorted by descending priority; completed tasks are
/// kept in completion order.
#[derive(Debug, Clone)]
pub struct TaskStore {
    pub(crate) active: Vec<Task>,
    pub(crate) completed: Vec<Task>,
    pub(crate) categories: Vec<String>,
    pub(crate) notifications: NotificationLog,
    pub(crate) ids: IdGenerator,
    pub(crate) config: StoreConfig,
}

impl Default for TaskStore {
    fn default() -> Self {
        Self::with_config(StoreConfig::default())
    }
}

impl TaskStore {
    /// Create an empty store with the default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty store with the given configuration
    pub fn with_config(config: StoreConfig) -> Self {
        let mut categories = Vec::new();
        for category in &config.seed_categories {
            if !categories.contains(category) {
                categories.push(category.clone());
            }
        }

        TaskStore {
            active: Vec::new(),
            completed: Vec::new(),
            categories,
            notifications: NotificationLog::with_capacity(config.notification_capacity),
            ids: IdGenerator::new(),
            config,
        }
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Create a new active task and return it
    pub fn add_task(
        &mut self,
        title: &str,
        description: Option<&str>,
        category: Option<&str>,
        due_date: Option<DateTime<Utc>>,
    ) -> Result<Task> {
        let title = title.trim();
        if title.is_empty() {
            return Err(TaskStoreError::InvalidInput(
                "Task title cannot be empty".to_string(),
            ));
        }

        let id = self.ids.next_id()?;
        let category = category
            .unwrap_or(self.config.default_category.as_str())
            .to_string();
        self.register_category(&category);

        let mut task = Task::new(id, title);
        task.description = description.unwrap_or_default().to_string();
        task.due_date = due_date;
        task.priority = priority::evaluate(&category, due_date, Utc::now());
        task.category = category;

        log::debug!(
            "Added task #{} '{}' with priority {}",
            task.id,
            task.title,
            task.priority
        );

        self.active.push(task.clone());
        self.sort_active();
        Ok(task)
    }

    /// Move an active task to the completed list
    pub fn complete_task(&mut self, id: u64) -> Result<Task> {
        let index = self.active_index(id)?;
        let mut task = self.active.remove(index);
        task.complete();

        log::debug!("Completed task #{} '{}'", task.id, task.title);
        self.add_notification(
            format!("Task \"{}\" completed!", task.title),
            NotificationKind::Success,
        );

        self.completed.push(task.clone());
        Ok(task)
    }

    /// Apply a patch to an active task and recompute its priority
    pub fn update_task(&mut self, id: u64, patch: TaskPatch) -> Result<Task> {
        let index = self.active_index(id)?;

        let title = match patch.title {
            Some(title) => {
                let title = title.trim().to_string();
                if title.is_empty() {
                    return Err(TaskStoreError::InvalidInput(
                        "Task title cannot be empty".to_string(),
                    ));
                }
                Some(title)
            }
            None => None,
        };

        if self.config.register_categories_on_update
            && let Some(category) = &patch.category
        {
            self.register_category(category);
        }

        let task = &mut self.active[index];
        if let Some(title) = title {
            task.title = title;
        }
        if let Some(description) = patch.description {
            task.description = description;
        }
        if let Some(category) = patch.category {
            task.category = category;
        }
        if let Some(due_date) = patch.due_date {
            task.due_date = due_date;
        }
        if let Some(tags) = patch.tags {
            task.tags = Vec::new();
            for tag in tags {
                task.add_tag(tag);
            }
        }
        task.priority = priority::evaluate(&task.category, task.due_date, Utc::now());

        let updated = task.clone();
        log::debug!("Updated task #{} (priority {})", updated.id, updated.priority);
        self.sort_active();
        Ok(updated)
    }

    /// Remove a task from either list. Returns whether anything was removed.
    pub fn delete_task(&mut self, id: u64) -> bool {
        if let Some(index) = self.active.iter().position(|t| t.id == id) {
            self.active.remove(index);
        } else if let Some(index) = self.completed.iter().position(|t| t.id == id) {
            self.completed.remove(index);
        } else {
            return false;
        }
        log::debug!("Deleted task #{}", id);
        true
    }

    /// Attach a new subtask to an active task
    pub fn add_subtask(&mut self, parent_id: u64, title: &str) -> Result<Subtask> {
        let index = self.active_index(parent_id)?;
        let parent = &mut self.active[index];

        let ordinal = parent.next_subtask_ordinal();
        let subtask = Subtask {
            id: Subtask::make_id(parent_id, ordinal),
            title: title.to_string(),
            completed: false,
            created_at: Utc::now(),
            completed_at: None,
        };
        parent.subtasks.push(subtask.clone());

        log::debug!("Added subtask {} to task #{}", subtask.id, parent_id);
        Ok(subtask)
    }

    /// Mark a subtask done; the parent stays active
    pub fn complete_subtask(&mut self, parent_id: u64, subtask_id: &str) -> Result<Subtask> {
        let index = self.active_index(parent_id)?;
        let parent = &mut self.active[index];

        let subtask = parent
            .subtask_mut(subtask_id)
            .ok_or_else(|| TaskStoreError::SubtaskNotFound {
                parent: parent_id,
                subtask: subtask_id.to_string(),
            })?;
        subtask.complete();
        let subtask = subtask.clone();

        if parent.all_subtasks_completed() {
            let message = format!("All subtasks for \"{}\" are completed!", parent.title);
            self.add_notification(message, NotificationKind::Info);
        }

        Ok(subtask)
    }

    /// Remove a subtask from an active task. Returns whether it existed.
    pub fn delete_subtask(&mut self, parent_id: u64, subtask_id: &str) -> Result<bool> {
        let index = self.active_index(parent_id)?;
        let parent = &mut self.active[index];

        let before = parent.subtasks.len();
        parent.subtasks.retain(|s| s.id != subtask_id);
        Ok(parent.subtasks.len() != before)
    }

    pub fn add_tag(&mut self, id: u64, tag: &str) -> Result<Task> {
        let index = self.active_index(id)?;
        let task = &mut self.active[index];
        task.add_tag(tag);
        Ok(task.clone())
    }

    pub fn remove_tag(&mut self, id: u64, tag: &str) -> Result<Task> {
        let index = self.active_index(id)?;
        let task = &mut self.active[index];
        task.remove_tag(tag);
        Ok(task.clone())
    }

    /// Recompute every active priority at the current time and re-sort
    pub fn reprioritize(&mut self) {
        self.reprioritize_at(Utc::now());
    }

    pub fn reprioritize_at(&mut self, now: DateTime<Utc>) {
        for task in &mut self.active {
            task.priority = priority::evaluate(&task.category, task.due_date, now);
        }
        self.sort_active();
    }

    /// Look a task up in either list
    pub fn get_task(&self, id: u64) -> Option<&Task> {
        self.active
            .iter()
            .chain(self.completed.iter())
            .find(|t| t.id == id)
    }

    /// Active tasks by descending priority
    pub fn active_tasks(&self) -> &[Task] {
        &self.active
    }

    /// Completed tasks in completion order
    pub fn completed_tasks(&self) -> &[Task] {
        &self.completed
    }

    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    pub fn has_category(&self, category: &str) -> bool {
        self.categories.iter().any(|c| c == category)
    }

    /// The id the next added task receives
    pub fn next_id(&self) -> u64 {
        self.ids.peek()
    }

    /// Active tasks matching a filter, in priority order
    pub fn list(&self, filter: &TaskFilter) -> Vec<&Task> {
        self.list_at(filter, Utc::now())
    }

    pub fn list_at(&self, filter: &TaskFilter, now: DateTime<Utc>) -> Vec<&Task> {
        self.active.iter().filter(|t| filter.matches(t, now)).collect()
    }

    pub fn tasks_by_category(&self, category: &str) -> Vec<&Task> {
        self.list(&TaskFilter {
            category: Some(category.to_string()),
            ..Default::default()
        })
    }

    pub fn tasks_by_tag(&self, tag: &str) -> Vec<&Task> {
        self.list(&TaskFilter {
            tags: vec![tag.to_string()],
            ..Default::default()
        })
    }

    pub fn overdue_tasks(&self) -> Vec<&Task> {
        self.overdue_tasks_at(Utc::now())
    }

    pub fn overdue_tasks_at(&self, now: DateTime<Utc>) -> Vec<&Task> {
        let filter = TaskFilter {
            overdue: true,
            ..Default::default()
        };
        self.list_at(&filter, now)
    }

    /// Tasks due within the next `days` days (inclusive of both ends)
    pub fn upcoming_tasks(&self, days: i64) -> Vec<&Task> {
        self.upcoming_tasks_at(days, Utc::now())
    }

    pub fn upcoming_tasks_at(&self, days: i64, now: DateTime<Utc>) -> Vec<&Task> {
        let filter = TaskFilter {
            due_within_days: Some(days),
            ..Default::default()
        };
        self.list_at(&filter, now)
    }

    /// Case-insensitive search; an empty query returns every active task
    pub fn search_tasks(&self, query: &str) -> Vec<&Task> {
        let needle = query.to_lowercase();
        self.active
            .iter()
            .filter(|t| t.matches_query(&needle))
            .collect()
    }

    /// Prepend a notification to the log
    pub fn add_notification(
        &mut self,
        message: impl Into<String>,
        kind: NotificationKind,
    ) -> &Notification {
        self.notifications.push(message, kind)
    }

    /// Mark a notification read; unknown ids are ignored
    pub fn mark_notification_as_read(&mut self, id: u64) {
        self.notifications.mark_read(id);
    }

    pub fn mark_all_notifications_as_read(&mut self) {
        self.notifications.mark_all_read();
    }

    pub fn unread_notifications(&self) -> Vec<&Notification> {
        self.notifications.unread()
    }

    /// The whole notification log, newest first
    pub fn notifications(&self) -> &[Notification] {
        self.notifications.entries()
    }

    pub fn statistics(&self) -> TaskStats {
        self.statistics_at(Utc::now())
    }

    pub fn statistics_at(&self, now: DateTime<Utc>) -> TaskStats {
        TaskStats::collect(&self.active, &self.completed, &self.categories, now)
    }

    pub(crate) fn register_category(&mut self, category: &str) {
        if !self.has_category(category) {
            log::debug!("Registered category '{}'", category);
            self.categories.push(category.to_string());
        }
    }

    /// Stable sort by descending priority
    pub(crate) fn sort_active(&mut self) {
        self.active.sort_by(|a, b| b.priority.cmp(&a.priority));
    }

    fn active_index(&self, id: u64) -> Result<usize> {
        self.active
            .iter()
            .position(|t| t.id == id)
            .ok_or(TaskStoreError::TaskNotFound(id))
    }
}
