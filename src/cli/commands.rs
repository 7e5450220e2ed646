//! CLI command definitions using clap

use crate::models::parse_instant;
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Task manager with derived priorities, backed by a JSON snapshot file
#[derive(Parser, Debug)]
#[command(name = "taskmgr")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Snapshot file (defaults to ~/.taskmgr/tasks.json)
    #[arg(long, global = true, env = "TASKMGR_FILE")]
    pub file: Option<PathBuf>,

    /// Config file (defaults to config.yaml next to the snapshot)
    #[arg(long, global = true, env = "TASKMGR_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Add a new task
    Add {
        /// Task title
        title: String,

        /// Task description
        #[arg(short, long)]
        description: Option<String>,

        /// Category (work, personal, urgent, or any new one)
        #[arg(short, long)]
        category: Option<String>,

        /// Due date (YYYY-MM-DD or RFC 3339)
        #[arg(long, value_parser = parse_due)]
        due: Option<DateTime<Utc>>,

        /// Tags (comma-separated)
        #[arg(short, long, value_delimiter = ',')]
        tags: Vec<String>,
    },

    /// List tasks
    List {
        /// Filter by category
        #[arg(short, long)]
        category: Option<String>,

        /// Filter by tags (comma-separated)
        #[arg(short, long, value_delimiter = ',')]
        tags: Vec<String>,

        /// Only overdue tasks
        #[arg(long)]
        overdue: bool,

        /// Only tasks due within this many days
        #[arg(long)]
        upcoming: Option<i64>,

        /// List completed tasks instead of active ones
        #[arg(long, conflicts_with_all = ["category", "tags", "overdue", "upcoming"])]
        completed: bool,
    },

    /// Search active tasks by title, description or tag
    Search {
        /// Text to look for (case-insensitive)
        query: String,
    },

    /// Show task details
    Show {
        /// Task ID
        id: u64,
    },

    /// Mark task(s) as completed
    Complete {
        /// Task ID(s)
        ids: Vec<u64>,
    },

    /// Update task properties
    Update {
        /// Task ID
        id: u64,

        /// New title
        #[arg(long)]
        title: Option<String>,

        /// New description
        #[arg(short, long)]
        description: Option<String>,

        /// New category
        #[arg(short, long)]
        category: Option<String>,

        /// New due date (YYYY-MM-DD or RFC 3339)
        #[arg(long, value_parser = parse_due, conflicts_with = "clear_due")]
        due: Option<DateTime<Utc>>,

        /// Remove the due date
        #[arg(long)]
        clear_due: bool,

        /// New tags (comma-separated, replaces existing)
        #[arg(short, long, value_delimiter = ',')]
        tags: Option<Vec<String>>,
    },

    /// Delete a task
    Delete {
        /// Task ID
        id: u64,
    },

    /// Manage subtasks
    Subtask {
        #[command(subcommand)]
        action: SubtaskCommand,
    },

    /// Add a tag to a task
    Tag {
        /// Task ID
        id: u64,
        tag: String,
    },

    /// Remove a tag from a task
    Untag {
        /// Task ID
        id: u64,
        tag: String,
    },

    /// Show task statistics
    Stats,

    /// Export tasks
    Export {
        /// Output format (json, csv)
        #[arg(short, long, default_value = "json")]
        format: String,

        /// Write to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Import tasks from a JSON export
    Import {
        /// File to import
        path: PathBuf,
    },

    /// Recompute priorities of all active tasks against the current time
    Reprioritize,
}

#[derive(Subcommand, Debug)]
pub enum SubtaskCommand {
    /// Add a subtask
    Add {
        /// Parent task ID
        id: u64,
        title: String,
    },

    /// Mark a subtask as completed
    Done {
        /// Parent task ID
        id: u64,
        /// Subtask ID (e.g. 3-1)
        subtask: String,
    },

    /// Remove a subtask
    Rm {
        /// Parent task ID
        id: u64,
        /// Subtask ID (e.g. 3-1)
        subtask: String,
    },
}

impl Commands {
    /// Whether the command changes the store and the snapshot must be saved
    pub fn mutates(&self) -> bool {
        !matches!(
            self,
            Commands::List { .. }
                | Commands::Search { .. }
                | Commands::Show { .. }
                | Commands::Stats
                | Commands::Export { .. }
        )
    }
}

fn parse_due(s: &str) -> Result<DateTime<Utc>, String> {
    parse_instant(s)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_add() {
        let cli = Cli::try_parse_from([
            "taskmgr", "add", "Write report", "-c", "work", "--due", "2030-01-01", "-t", "q3,finance",
        ])
        .unwrap();

        match cli.command {
            Commands::Add {
                title,
                category,
                due,
                tags,
                ..
            } => {
                assert_eq!(title, "Write report");
                assert_eq!(category.as_deref(), Some("work"));
                assert!(due.is_some());
                assert_eq!(tags, vec!["q3", "finance"]);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_bad_due_date() {
        assert!(Cli::try_parse_from(["taskmgr", "add", "x", "--due", "someday"]).is_err());
    }

    #[test]
    fn test_parse_subtask_done() {
        let cli = Cli::try_parse_from(["taskmgr", "subtask", "done", "3", "3-1"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Subtask {
                action: SubtaskCommand::Done { id: 3, .. }
            }
        ));
        assert!(cli.command.mutates());
    }

    #[test]
    fn test_read_only_commands() {
        let cli = Cli::try_parse_from(["taskmgr", "stats"]).unwrap();
        assert!(!cli.command.mutates());
        let cli = Cli::try_parse_from(["taskmgr", "export", "-f", "csv"]).unwrap();
        assert!(!cli.command.mutates());
    }
}
