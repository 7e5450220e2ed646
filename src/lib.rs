//! taskmgr - In-memory task management
//!
//! This library provides a single-owner task store: tasks with derived
//! priorities, subtasks, tags and categories, a bounded notification log,
//! summary statistics, and JSON/CSV export with JSON import.

pub mod cli;
pub mod config;
pub mod models;
pub mod storage;

pub use config::{CsvStyle, StoreConfig};
pub use models::{Notification, NotificationKind, Subtask, Task, TaskPatch};
pub use storage::{ExportFormat, TaskFilter, TaskStats, TaskStore, TaskStoreError};
