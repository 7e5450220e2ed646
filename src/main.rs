//! taskmgr CLI - task management over a JSON snapshot

use anyhow::{Context, Result};
use clap::Parser;
use std::io::Write;
use taskmgr::cli::display::{
    display_notifications, display_stats, display_task_detail, display_task_list, error, success,
};
use taskmgr::cli::{Cli, Commands, SubtaskCommand};
use taskmgr::storage::{SnapshotLocation, TaskFilter};
use taskmgr::{StoreConfig, TaskPatch, TaskStore};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format(|buf, record| writeln!(buf, "{}", record.args()))
        .init();

    let cli = Cli::parse();

    let result = run(cli);

    if let Err(e) = &result {
        error(&e.to_string());
        std::process::exit(1);
    }

    Ok(())
}

fn load_store(location: &SnapshotLocation) -> Result<TaskStore> {
    let config = StoreConfig::load(&location.config)
        .with_context(|| format!("Failed to load config {:?}", location.config))?;

    match location.read()? {
        Some(data) => TaskStore::from_snapshot(&data, config)
            .with_context(|| format!("Failed to read snapshot {:?}", location.snapshot)),
        None => {
            log::debug!("No snapshot at {:?}, starting empty", location.snapshot);
            Ok(TaskStore::with_config(config))
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let location = SnapshotLocation::resolve(cli.file, cli.config)?;
    let mut store = load_store(&location)?;
    let save = cli.command.mutates();

    match cli.command {
        Commands::Add {
            title,
            description,
            category,
            due,
            tags,
        } => {
            let task = store.add_task(&title, description.as_deref(), category.as_deref(), due)?;
            for tag in &tags {
                store.add_tag(task.id, tag)?;
            }
            success(&format!(
                "Created #{}: {} (priority {})",
                task.id, task.title, task.priority
            ));
        }

        Commands::List {
            category,
            tags,
            overdue,
            upcoming,
            completed,
        } => {
            if completed {
                let tasks: Vec<_> = store.completed_tasks().iter().collect();
                display_task_list(&tasks);
            } else {
                let filter = TaskFilter {
                    category,
                    tags,
                    overdue,
                    due_within_days: upcoming,
                    ..Default::default()
                };
                display_task_list(&store.list(&filter));
            }
        }

        Commands::Search { query } => {
            display_task_list(&store.search_tasks(&query));
        }

        Commands::Show { id } => {
            let task = store
                .get_task(id)
                .ok_or_else(|| anyhow::anyhow!("Task with id {} not found", id))?;
            display_task_detail(task);
        }

        Commands::Complete { ids } => {
            for id in ids {
                let task = store.complete_task(id)?;
                log::debug!("Completed #{}", task.id);
            }
        }

        Commands::Update {
            id,
            title,
            description,
            category,
            due,
            clear_due,
            tags,
        } => {
            let patch = TaskPatch {
                title,
                description,
                category,
                due_date: if clear_due { Some(None) } else { due.map(Some) },
                tags,
            };

            if patch.is_empty() {
                log::info!("Nothing to update.");
                return Ok(());
            }

            let task = store.update_task(id, patch)?;
            success(&format!(
                "Updated #{}: {} (priority {})",
                task.id, task.title, task.priority
            ));
        }

        Commands::Delete { id } => {
            if store.delete_task(id) {
                success(&format!("Deleted #{}", id));
            } else {
                log::info!("No task #{}", id);
                return Ok(());
            }
        }

        Commands::Subtask { action } => match action {
            SubtaskCommand::Add { id, title } => {
                let subtask = store.add_subtask(id, &title)?;
                success(&format!("Added subtask {}: {}", subtask.id, subtask.title));
            }
            SubtaskCommand::Done { id, subtask } => {
                let subtask = store.complete_subtask(id, &subtask)?;
                success(&format!("Completed subtask {}", subtask.id));
            }
            SubtaskCommand::Rm { id, subtask } => {
                if store.delete_subtask(id, &subtask)? {
                    success(&format!("Removed subtask {}", subtask));
                } else {
                    log::info!("No subtask {} on #{}", subtask, id);
                    return Ok(());
                }
            }
        },

        Commands::Tag { id, tag } => {
            let task = store.add_tag(id, &tag)?;
            success(&format!("#{} tags: {}", task.id, task.tags.join(", ")));
        }

        Commands::Untag { id, tag } => {
            let task = store.remove_tag(id, &tag)?;
            success(&format!("#{} tags: {}", task.id, task.tags.join(", ")));
        }

        Commands::Stats => {
            display_stats(&store.statistics());
        }

        Commands::Export { format, output } => {
            let data = store.export_tasks(&format)?;
            match output {
                Some(path) => {
                    std::fs::write(&path, data)
                        .with_context(|| format!("Failed to write {:?}", path))?;
                    success(&format!("Exported to {}", path.display()));
                }
                None => println!("{}", data),
            }
        }

        Commands::Import { path } => {
            let data = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read {:?}", path))?;
            if !store.import_tasks(&data, "json") {
                display_notifications(store.notifications());
                anyhow::bail!("Nothing was imported from {}", path.display());
            }
        }

        Commands::Reprioritize => {
            store.reprioritize();
            success(&format!(
                "Reprioritized {} active tasks",
                store.active_tasks().len()
            ));
        }
    }

    display_notifications(store.notifications());

    if save {
        location.write(&store.export_tasks("json")?)?;
        log::debug!("Saved snapshot to {:?}", location.snapshot);
    }

    Ok(())
}
