//! JSON and CSV export, JSON import

use crate::config::{CsvStyle, StoreConfig};
use crate::models::{NotificationKind, Task};
use crate::storage::id_generator::IdGenerator;
use crate::storage::task_store::{Result, TaskStore, TaskStoreError};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

const CSV_HEADERS: [&str; 7] = [
    "ID",
    "Title",
    "Description",
    "Category",
    "Due Date",
    "Status",
    "Priority",
];

/// Row separator of the legacy CSV layout: a backslash followed by `n`
const LEGACY_ROW_SEPARATOR: &str = "\\n";

/// Supported export formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    #[default]
    Json,
    Csv,
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportFormat::Json => write!(f, "json"),
            ExportFormat::Csv => write!(f, "csv"),
        }
    }
}

impl std::str::FromStr for ExportFormat {
    type Err = TaskStoreError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "json" => Ok(ExportFormat::Json),
            "csv" => Ok(ExportFormat::Csv),
            _ => Err(TaskStoreError::UnsupportedFormat(s.to_string())),
        }
    }
}

/// Exported store state as it appears on the wire
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    #[serde(default)]
    pub tasks: Vec<Task>,
    #[serde(default)]
    pub completed_tasks: Vec<Task>,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub export_date: Option<DateTime<Utc>>,
}

/// Borrowed form of [`Snapshot`] used when exporting
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SnapshotRef<'a> {
    tasks: &'a [Task],
    completed_tasks: &'a [Task],
    categories: &'a [String],
    export_date: DateTime<Utc>,
}

impl Snapshot {
    pub fn from_json(data: &str) -> Result<Self> {
        Ok(serde_json::from_str(data)?)
    }
}

impl TaskStore {
    /// Export the store in the named format (`json` or `csv`)
    pub fn export_tasks(&self, format: &str) -> Result<String> {
        self.export(format.parse()?)
    }

    pub fn export(&self, format: ExportFormat) -> Result<String> {
        let output = match format {
            ExportFormat::Json => self.export_json()?,
            ExportFormat::Csv => self.export_csv(),
        };
        log::info!(
            "Exported {} tasks as {}",
            self.active.len() + self.completed.len(),
            format
        );
        Ok(output)
    }

    fn export_json(&self) -> Result<String> {
        let snapshot = SnapshotRef {
            tasks: &self.active,
            completed_tasks: &self.completed,
            categories: &self.categories,
            export_date: Utc::now(),
        };
        Ok(serde_json::to_string_pretty(&snapshot)?)
    }

    fn export_csv(&self) -> String {
        let style = self.config.csv_style;
        let mut rows = vec![CSV_HEADERS.iter().map(|h| h.to_string()).collect::<Vec<_>>()];

        for task in self.active.iter().chain(self.completed.iter()) {
            rows.push(vec![
                task.id.to_string(),
                task.title.clone(),
                task.description.clone(),
                task.category.clone(),
                task.due_date
                    .map(|d| d.to_rfc3339_opts(SecondsFormat::Millis, true))
                    .unwrap_or_default(),
                status_label(task).to_string(),
                task.priority.to_string(),
            ]);
        }

        let lines: Vec<String> = rows
            .iter()
            .map(|row| match style {
                CsvStyle::Legacy => row.join(","),
                CsvStyle::Rfc4180 => row
                    .iter()
                    .map(|field| escape_csv_field(field))
                    .collect::<Vec<_>>()
                    .join(","),
            })
            .collect();

        match style {
            CsvStyle::Legacy => lines.join(LEGACY_ROW_SEPARATOR),
            CsvStyle::Rfc4180 => {
                let mut out = lines.join("\r\n");
                out.push_str("\r\n");
                out
            }
        }
    }

    /// Import tasks from exported data.
    ///
    /// Failures are recorded as an `error` notification and reported as
    /// `false`; they are never returned to the caller.
    pub fn import_tasks(&mut self, data: &str, format: &str) -> bool {
        let outcome = format
            .parse::<ExportFormat>()
            .and_then(|format| match format {
                ExportFormat::Json => Snapshot::from_json(data),
                other => Err(TaskStoreError::UnsupportedFormat(other.to_string())),
            })
            .and_then(|snapshot| {
                let counts = (snapshot.tasks.len(), snapshot.completed_tasks.len());
                self.merge_snapshot(snapshot).map(|()| counts)
            });

        match outcome {
            Ok((active, completed)) => {
                log::info!("Imported {} active and {} completed tasks", active, completed);
                self.add_notification("Tasks imported successfully", NotificationKind::Success);
                true
            }
            Err(e) => {
                log::warn!("Import failed: {}", e);
                self.add_notification(format!("Import failed: {}", e), NotificationKind::Error);
                false
            }
        }
    }

    /// Build a store from a JSON export without touching the notification log
    pub fn from_snapshot(data: &str, config: StoreConfig) -> Result<Self> {
        let snapshot = Snapshot::from_json(data)?;
        let mut store = TaskStore::with_config(config);
        store.merge_snapshot(snapshot)?;
        Ok(store)
    }

    /// Append a parsed snapshot. Stored priorities are kept as-is.
    ///
    /// Ids are settled before anything is written, so on error the store is
    /// unchanged.
    fn merge_snapshot(&mut self, snapshot: Snapshot) -> Result<()> {
        let Snapshot {
            tasks,
            completed_tasks,
            categories,
            ..
        } = snapshot;

        let mut taken: HashSet<u64> = self
            .active
            .iter()
            .chain(self.completed.iter())
            .map(|t| t.id)
            .collect();

        let mut ids = self.ids.clone();
        ids.observe(IdGenerator::find_max_id(
            tasks.iter().chain(completed_tasks.iter()).map(|t| t.id),
        ))?;

        let mut active = Vec::with_capacity(tasks.len());
        for mut task in tasks {
            task.completed = false;
            task.completed_at = None;
            self.claim_id(&mut task, &mut ids, &mut taken)?;
            active.push(task);
        }

        let mut completed = Vec::with_capacity(completed_tasks.len());
        for mut task in completed_tasks {
            task.completed = true;
            if task.completed_at.is_none() {
                task.completed_at = Some(Utc::now());
            }
            self.claim_id(&mut task, &mut ids, &mut taken)?;
            completed.push(task);
        }

        self.ids = ids;
        self.active.extend(active);
        self.completed.extend(completed);
        for category in &categories {
            self.register_category(category);
        }

        self.sort_active();
        Ok(())
    }

    fn claim_id(
        &self,
        task: &mut Task,
        ids: &mut IdGenerator,
        taken: &mut HashSet<u64>,
    ) -> Result<()> {
        if taken.contains(&task.id) {
            if self.config.remap_ids_on_import {
                let id = ids.next_id()?;
                log::debug!("Remapped imported task #{} to #{}", task.id, id);
                task.reassign_id(id);
            } else {
                log::warn!("Imported task #{} collides with an existing id", task.id);
            }
        }
        taken.insert(task.id);
        Ok(())
    }
}

fn status_label(task: &Task) -> &'static str {
    if task.completed { "Completed" } else { "Active" }
}

/// Quote a field if it contains a separator, quote or line break
fn escape_csv_field(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
