//! Task store and its supporting pieces

pub mod exchange;
pub mod id_generator;
pub mod location;
pub mod notifications;
pub mod priority;
pub mod stats;
pub mod task_store;

pub use exchange::{ExportFormat, Snapshot};
pub use id_generator::{IdExhausted, IdGenerator};
pub use location::{LocationError, SnapshotLocation};
pub use notifications::NotificationLog;
pub use stats::{CategoryStats, TaskStats};
pub use task_store::{TaskFilter, TaskStore, TaskStoreError};
