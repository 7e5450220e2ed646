//! Display formatting for CLI output

use crate::models::{Notification, NotificationKind, Task};
use crate::storage::TaskStats;
use chrono::SecondsFormat;
use tabled::{
    Table, Tabled,
    settings::{Alignment, Modify, Style, object::Columns},
};

/// Task row for table display
#[derive(Tabled)]
struct TaskRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Priority")]
    priority: String,
    #[tabled(rename = "Due")]
    due: String,
    #[tabled(rename = "Tags")]
    tags: String,
    #[tabled(rename = "Subtasks")]
    subtasks: String,
}

impl From<&Task> for TaskRow {
    fn from(task: &Task) -> Self {
        let subtasks = if task.subtasks.is_empty() {
            String::new()
        } else {
            let done = task.subtasks.iter().filter(|s| s.completed).count();
            format!("{}/{}", done, task.subtasks.len())
        };

        TaskRow {
            id: format!("{}", task.id),
            title: truncate(&task.title, 40),
            category: task.category.clone(),
            priority: task.priority.to_string(),
            due: task
                .due_date
                .map(|d| d.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_default(),
            tags: truncate(&task.tags.join(", "), 30),
            subtasks,
        }
    }
}

/// Display a list of tasks as a table
pub fn display_task_list(tasks: &[&Task]) {
    if tasks.is_empty() {
        log::info!("No tasks found.");
        return;
    }

    let rows: Vec<TaskRow> = tasks.iter().map(|t| TaskRow::from(*t)).collect();
    let table = Table::new(rows)
        .with(Style::rounded())
        .with(Modify::new(Columns::single(0)).with(Alignment::right()))
        .with(Modify::new(Columns::single(3)).with(Alignment::right()))
        .to_string();

    println!("{}", table);
}

/// Display detailed task information
pub fn display_task_detail(task: &Task) {
    println!("ID:        {}", task.id);
    println!("Title:     {}", task.title);
    println!("Category:  {}", task.category);
    println!("Priority:  {}", task.priority);
    println!(
        "Status:    {}",
        if task.completed { "completed" } else { "active" }
    );

    if !task.tags.is_empty() {
        println!("Tags:      {}", task.tags.join(", "));
    }

    if let Some(due) = task.due_date {
        println!("Due:       {}", due.to_rfc3339_opts(SecondsFormat::Secs, true));
    }

    println!("Created:   {}", task.created_at.format("%Y-%m-%d %H:%M:%S"));

    if let Some(at) = task.completed_at {
        println!("Completed: {}", at.format("%Y-%m-%d %H:%M:%S"));
    }

    if !task.description.is_empty() {
        println!();
        println!("Description:");
        println!("{}", task.description);
    }

    if !task.subtasks.is_empty() {
        println!();
        println!("Subtasks:");
        for subtask in &task.subtasks {
            let mark = if subtask.completed { "x" } else { " " };
            println!("  [{}] {}  {}", mark, subtask.id, subtask.title);
        }
    }
}

/// Stats row for table display
#[derive(Tabled)]
struct StatsRow {
    #[tabled(rename = "Metric")]
    metric: String,
    #[tabled(rename = "Value")]
    value: String,
}

impl StatsRow {
    fn new(metric: &str, value: impl ToString) -> Self {
        StatsRow {
            metric: metric.to_string(),
            value: value.to_string(),
        }
    }
}

/// Category row for table display
#[derive(Tabled)]
struct CategoryRow {
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Active")]
    active: usize,
    #[tabled(rename = "Completed")]
    completed: usize,
}

/// Display task statistics
pub fn display_stats(stats: &TaskStats) {
    let rows = vec![
        StatsRow::new("Total", stats.total_tasks),
        StatsRow::new("Active", stats.active_tasks),
        StatsRow::new("Completed", stats.completed_tasks),
        StatsRow::new("Completion rate", &stats.completion_rate),
        StatsRow::new("Overdue", stats.overdue_tasks),
        StatsRow::new("Completed per day", stats.average_display()),
    ];

    let table = Table::new(rows)
        .with(Style::rounded())
        .with(Modify::new(Columns::single(1)).with(Alignment::right()))
        .to_string();
    println!("{}", table);

    let categories: Vec<CategoryRow> = stats
        .category_statistics
        .iter()
        .map(|(category, counts)| CategoryRow {
            category: category.clone(),
            active: counts.active,
            completed: counts.completed,
        })
        .collect();

    let table = Table::new(categories)
        .with(Style::rounded())
        .with(Modify::new(Columns::new(1..=2)).with(Alignment::right()))
        .to_string();
    println!("{}", table);
}

/// Print a newest-first notification log in the order it was raised
pub fn display_notifications(notifications: &[Notification]) {
    for notification in notifications.iter().rev() {
        match notification.kind {
            NotificationKind::Error => error(&notification.message),
            _ => success(&notification.message),
        }
    }
}

/// Truncate a string to a maximum number of characters
fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let head: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", head)
    }
}

/// Format for success messages
pub fn success(msg: &str) {
    println!("{}", msg);
}

/// Format for error messages
pub fn error(msg: &str) {
    eprintln!("Error: {}", msg);
}
