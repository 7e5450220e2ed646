//! Data models for taskmgr

pub mod instant;
pub mod notification;
pub mod task;

pub use instant::parse_instant;
pub use notification::{Notification, NotificationKind};
pub use task::{DEFAULT_CATEGORY, Subtask, Task, TaskPatch};
