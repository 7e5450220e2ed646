//! Task model and related types

use crate::models::instant::{deserialize_optional_instant, deserialize_patch_instant};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Category assigned when none is given
pub const DEFAULT_CATEGORY: &str = "personal";

/// A child item of a task with its own completion state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subtask {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

impl Subtask {
    /// Composite id of the `ordinal`-th subtask of task `parent_id`
    pub fn make_id(parent_id: u64, ordinal: u32) -> String {
        format!("{}-{}", parent_id, ordinal)
    }

    /// Ordinal part of the id, if it has the `<parent>-<n>` shape
    pub fn ordinal(&self) -> Option<u32> {
        self.id.rsplit_once('-')?.1.parse().ok()
    }

    pub fn complete(&mut self) {
        self.completed = true;
        self.completed_at = Some(Utc::now());
    }
}

/// A task with all its metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_category")]
    pub category: String,
    #[serde(default, deserialize_with = "deserialize_optional_instant")]
    pub due_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub completed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub priority: u32,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub subtasks: Vec<Subtask>,
    /// Highest subtask ordinal ever handed out for this task
    #[serde(default, skip_serializing_if = "is_zero")]
    pub subtask_seq: u32,
}

fn default_category() -> String {
    DEFAULT_CATEGORY.to_string()
}

fn is_zero(n: &u32) -> bool {
    *n == 0
}

impl Task {
    /// Create a new active task with the given id and title
    pub fn new(id: u64, title: impl Into<String>) -> Self {
        Task {
            id,
            title: title.into(),
            description: String::new(),
            category: default_category(),
            due_date: None,
            created_at: Utc::now(),
            completed: false,
            completed_at: None,
            priority: 0,
            tags: Vec::new(),
            subtasks: Vec::new(),
            subtask_seq: 0,
        }
    }

    /// Mark the task as completed now
    pub fn complete(&mut self) {
        self.completed = true;
        self.completed_at = Some(Utc::now());
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    /// Add a tag unless it is already present. Returns whether it was added.
    pub fn add_tag(&mut self, tag: impl Into<String>) -> bool {
        let tag = tag.into();
        if self.has_tag(&tag) {
            return false;
        }
        self.tags.push(tag);
        true
    }

    /// Remove the first occurrence of a tag. Returns whether it was present.
    pub fn remove_tag(&mut self, tag: &str) -> bool {
        match self.tags.iter().position(|t| t == tag) {
            Some(index) => {
                self.tags.remove(index);
                true
            }
            None => false,
        }
    }

    /// Next subtask ordinal. Never reuses an ordinal, even after deletions.
    pub fn next_subtask_ordinal(&mut self) -> u32 {
        let count = u32::try_from(self.subtasks.len()).unwrap_or(u32::MAX);
        let ordinal = self.subtask_seq.max(count).saturating_add(1);
        self.subtask_seq = ordinal;
        ordinal
    }

    pub fn subtask_mut(&mut self, subtask_id: &str) -> Option<&mut Subtask> {
        self.subtasks.iter_mut().find(|s| s.id == subtask_id)
    }

    /// True when the task has subtasks and all of them are done
    pub fn all_subtasks_completed(&self) -> bool {
        !self.subtasks.is_empty() && self.subtasks.iter().all(|s| s.completed)
    }

    /// Case-insensitive match against title, description and tags.
    /// `needle` must already be lowercase.
    pub fn matches_query(&self, needle: &str) -> bool {
        self.title.to_lowercase().contains(needle)
            || self.description.to_lowercase().contains(needle)
            || self.tags.iter().any(|t| t.to_lowercase().contains(needle))
    }

    /// Give the task a new id, rewriting the parent prefix of its subtask ids
    pub(crate) fn reassign_id(&mut self, id: u64) {
        self.id = id;
        for subtask in &mut self.subtasks {
            let ordinal = subtask.ordinal().unwrap_or(0);
            subtask.id = Subtask::make_id(id, ordinal);
        }
    }
}

/// Partial update for an active task.
///
/// Only these fields can be changed; when deserialized from JSON every other
/// key is ignored. `due_date` distinguishes "leave alone" (`None`) from
/// "clear" (`Some(None)`).
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskPatch {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default, deserialize_with = "deserialize_patch_instant")]
    pub due_date: Option<Option<DateTime<Utc>>>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
}

impl TaskPatch {
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn due_date(mut self, due: Option<DateTime<Utc>>) -> Self {
        self.due_date = Some(due);
        self
    }

    pub fn tags(mut self, tags: Vec<String>) -> Self {
        self.tags = Some(tags);
        self
    }

    /// Parse a patch from a JSON object, ignoring unknown keys
    pub fn from_json(value: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(value)
    }

    pub fn is_empty(&self) -> bool {
        *self == TaskPatch::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_new() {
        let task = Task::new(1, "Write report");
        assert_eq!(task.id, 1);
        assert_eq!(task.title, "Write report");
        assert_eq!(task.category, "personal");
        assert!(!task.completed);
        assert!(task.completed_at.is_none());
        assert!(task.tags.is_empty());
        assert!(task.subtasks.is_empty());
        assert_eq!(task.priority, 0);
    }

    #[test]
    fn test_task_complete() {
        let mut task = Task::new(1, "Test");
        task.complete();
        assert!(task.completed);
        assert!(task.completed_at.is_some());
    }

    #[test]
    fn test_tags_are_set_like() {
        let mut task = Task::new(1, "Test");
        assert!(task.add_tag("home"));
        assert!(!task.add_tag("home"));
        assert!(task.add_tag("errand"));
        assert_eq!(task.tags, vec!["home", "errand"]);

        assert!(task.remove_tag("home"));
        assert!(!task.remove_tag("home"));
        assert_eq!(task.tags, vec!["errand"]);
    }

    #[test]
    fn test_subtask_ordinals_never_repeat() {
        let mut task = Task::new(7, "Parent");
        assert_eq!(task.next_subtask_ordinal(), 1);
        assert_eq!(task.next_subtask_ordinal(), 2);

        // Imported data may carry subtasks but no sequence
        let mut imported = Task::new(8, "Imported");
        imported.subtasks.push(Subtask {
            id: Subtask::make_id(8, 1),
            title: "a".to_string(),
            completed: false,
            created_at: Utc::now(),
            completed_at: None,
        });
        assert_eq!(imported.next_subtask_ordinal(), 2);
    }

    #[test]
    fn test_subtask_ordinal_parse() {
        let subtask = Subtask {
            id: "12-3".to_string(),
            title: "x".to_string(),
            completed: false,
            created_at: Utc::now(),
            completed_at: None,
        };
        assert_eq!(subtask.ordinal(), Some(3));
    }

    #[test]
    fn test_reassign_id_rewrites_subtasks() {
        let mut task = Task::new(3, "Parent");
        let ordinal = task.next_subtask_ordinal();
        task.subtasks.push(Subtask {
            id: Subtask::make_id(3, ordinal),
            title: "child".to_string(),
            completed: false,
            created_at: Utc::now(),
            completed_at: None,
        });

        task.reassign_id(10);
        assert_eq!(task.id, 10);
        assert_eq!(task.subtasks[0].id, "10-1");
    }

    #[test]
    fn test_matches_query() {
        let mut task = Task::new(1, "Buy milk");
        task.description = "From the corner shop".to_string();
        task.add_tag("Home");

        assert!(task.matches_query("milk"));
        assert!(task.matches_query("corner"));
        assert!(task.matches_query("home"));
        assert!(task.matches_query(""));
        assert!(!task.matches_query("report"));
    }

    #[test]
    fn test_task_json_shape() {
        let task = Task::new(1, "Test");
        let value = serde_json::to_value(&task).unwrap();
        assert!(value.get("createdAt").is_some());
        assert!(value.get("dueDate").unwrap().is_null());
        assert!(value.get("completedAt").is_none());
        assert!(value.get("subtaskSeq").is_none());
    }

    #[test]
    fn test_patch_ignores_unknown_keys() {
        let patch =
            TaskPatch::from_json(r#"{"title": "New", "priority": 99, "id": 5}"#).unwrap();
        assert_eq!(patch.title.as_deref(), Some("New"));
        assert!(patch.due_date.is_none());
    }

    #[test]
    fn test_patch_due_date_presence() {
        let absent = TaskPatch::from_json(r#"{}"#).unwrap();
        assert_eq!(absent.due_date, None);
        assert!(absent.is_empty());

        let cleared = TaskPatch::from_json(r#"{"dueDate": null}"#).unwrap();
        assert_eq!(cleared.due_date, Some(None));

        let blank = TaskPatch::from_json(r#"{"dueDate": ""}"#).unwrap();
        assert_eq!(blank.due_date, Some(None));

        let set = TaskPatch::from_json(r#"{"dueDate": "2030-01-02"}"#).unwrap();
        assert!(matches!(set.due_date, Some(Some(_))));
    }
}
