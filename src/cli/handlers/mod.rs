mod init;
pub use init::cmd_init;

use std::path::Path;

use log::{info, warn};

use crate::cli::commands::*;
use crate::cli::output::*;
use crate::io::appearance::{SystemAppearance, TerminalAppearance};
use crate::io::ids::{IdProvider, UuidIds};
use crate::io::recovery::{self, RecoveryEntry};
use crate::io::storage::{FileStore, KeyValueStore, TASKS_KEY, THEME_KEY};
use crate::model::config::AppConfig;
use crate::model::task::{Task, TaskFilter};
use crate::model::theme::ThemePreference;
use crate::ops::task_store::{LoadSource, StoreError, TaskStore};
use crate::view::theme::ThemeController;

type CmdResult = Result<String, Box<dyn std::error::Error>>;

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

/// Run a subcommand against the data directory and print its output.
pub fn dispatch(
    cli: Cli,
    data_dir: &Path,
    config: &AppConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let json = cli.json;
    let Some(cmd) = cli.command else {
        return Err("no subcommand given".into());
    };

    let out = match cmd {
        Commands::Init(args) => return cmd_init(&args, data_dir),
        Commands::Recovery(args) => cmd_recovery(args, data_dir, json)?,
        Commands::Theme(args) => {
            let storage = FileStore::open(data_dir)?;
            let system = TerminalAppearance::new(config.ui.fallback_appearance);
            let mut theme = ThemeController::load(storage, system);
            cmd_theme(args, &mut theme, data_dir, json)?
        }
        cmd => {
            let storage = FileStore::open(data_dir)?;
            let mut store = open_store(storage, UuidIds, data_dir, config);
            run_task_command(cmd, &mut store, data_dir, json)?
        }
    };
    if !out.is_empty() {
        println!("{}", out);
    }
    Ok(())
}

/// Load the task list, logging unreadable data to the recovery log
fn open_store<S: KeyValueStore, I: IdProvider>(
    storage: S,
    ids: I,
    data_dir: &Path,
    config: &AppConfig,
) -> TaskStore<S, I> {
    let mut store = TaskStore::new(storage, ids).with_seed_samples(config.storage.seed_samples);
    store.load();
    if let LoadSource::Recovered { raw, error } = store.load_source() {
        recovery::log_recovery(data_dir, RecoveryEntry::malformed(TASKS_KEY, error, raw));
        eprintln!("warning: saved tasks were unreadable and have been reset (see: tick recovery)");
    }
    store
}

fn run_task_command<S: KeyValueStore, I: IdProvider>(
    cmd: Commands,
    store: &mut TaskStore<S, I>,
    data_dir: &Path,
    json: bool,
) -> CmdResult {
    match cmd {
        Commands::List(args) => cmd_list(args, store, json),
        Commands::Add(args) => cmd_add(args, store, data_dir, json),
        Commands::Toggle(args) => cmd_toggle(args, store, data_dir, json),
        Commands::Rm(args) => cmd_rm(args, store, data_dir, json),
        Commands::Clear => cmd_clear(store, data_dir, json),
        Commands::Mv(args) => cmd_mv(args, store, data_dir, json),
        Commands::Init(_) | Commands::Theme(_) | Commands::Recovery(_) => {
            Err("not a task command".into())
        }
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Find a task by 1-based position in the full list, or by unique id prefix.
fn resolve_task<S: KeyValueStore, I: IdProvider>(
    store: &TaskStore<S, I>,
    reference: &str,
) -> Result<Task, String> {
    let tasks = store.tasks();
    if let Ok(pos) = reference.parse::<usize>()
        && pos >= 1
        && pos <= tasks.len()
    {
        return Ok(tasks[pos - 1].clone());
    }

    let matches: Vec<&Task> = tasks.iter().filter(|t| t.id.starts_with(reference)).collect();
    match matches.as_slice() {
        [] => Err(format!("no task matches '{}'", reference)),
        [task] => Ok((*task).clone()),
        many => Err(format!(
            "'{}' matches {} tasks; use a longer id prefix or a position",
            reference,
            many.len()
        )),
    }
}

/// Pass a store result through, logging the unsaved list on a failed write.
fn checked_write<T, S: KeyValueStore, I: IdProvider>(
    result: Result<T, StoreError>,
    store: &TaskStore<S, I>,
    data_dir: &Path,
) -> Result<T, StoreError> {
    if let Err(err @ StoreError::Storage(_)) = &result {
        warn!("event=store_write module=cli status=error error={}", err);
        let value = store.to_json().unwrap_or_default();
        recovery::log_recovery(
            data_dir,
            RecoveryEntry::failed_write(TASKS_KEY, &err.to_string(), &value),
        );
    }
    result
}

fn task_json_string<S: KeyValueStore, I: IdProvider>(
    store: &TaskStore<S, I>,
    id: &str,
) -> CmdResult {
    let index = store
        .position(id)
        .ok_or_else(|| format!("task not found: {}", id))?;
    Ok(serde_json::to_string_pretty(&task_to_json(
        &store.tasks()[index],
        index,
    ))?)
}

// ---------------------------------------------------------------------------
// Task commands
// ---------------------------------------------------------------------------

fn cmd_list<S: KeyValueStore, I: IdProvider>(
    args: ListArgs,
    store: &TaskStore<S, I>,
    json: bool,
) -> CmdResult {
    let filter = match args.filter.as_deref() {
        None => TaskFilter::All,
        Some(s) => TaskFilter::parse_filter(s).ok_or_else(|| {
            format!("unknown filter '{}' (expected all, active or completed)", s)
        })?,
    };
    if json {
        Ok(serde_json::to_string_pretty(&task_list_to_json(
            store.tasks(),
            filter,
        ))?)
    } else {
        Ok(format_task_list(store.tasks(), filter))
    }
}

fn cmd_add<S: KeyValueStore, I: IdProvider>(
    args: AddArgs,
    store: &mut TaskStore<S, I>,
    data_dir: &Path,
    json: bool,
) -> CmdResult {
    let text = args.text.join(" ");
    let result = store.add(&text);
    let task = checked_write(result, store, data_dir)?.ok_or("task text is empty")?;
    info!("event=task_add module=cli id={}", task.id);
    if json {
        return task_json_string(store, &task.id);
    }
    Ok(format!("added {}: {}", store.len(), task.content))
}

fn cmd_toggle<S: KeyValueStore, I: IdProvider>(
    args: TaskArgs,
    store: &mut TaskStore<S, I>,
    data_dir: &Path,
    json: bool,
) -> CmdResult {
    let task = resolve_task(store, &args.task)?;
    let result = store.toggle(&task.id);
    let checked = checked_write(result, store, data_dir)?
        .ok_or_else(|| format!("task not found: {}", task.id))?;
    if json {
        return task_json_string(store, &task.id);
    }
    let state = if checked { "completed" } else { "active" };
    Ok(format!("{}: {}", state, task.content))
}

fn cmd_rm<S: KeyValueStore, I: IdProvider>(
    args: TaskArgs,
    store: &mut TaskStore<S, I>,
    data_dir: &Path,
    json: bool,
) -> CmdResult {
    let task = resolve_task(store, &args.task)?;
    let index = store.position(&task.id).unwrap_or(0);
    let result = store.remove(&task.id);
    let removed = checked_write(result, store, data_dir)?
        .ok_or_else(|| format!("task not found: {}", task.id))?;
    if json {
        return Ok(serde_json::to_string_pretty(&task_to_json(&removed, index))?);
    }
    Ok(format!("deleted: {}", removed.content))
}

fn cmd_clear<S: KeyValueStore, I: IdProvider>(
    store: &mut TaskStore<S, I>,
    data_dir: &Path,
    json: bool,
) -> CmdResult {
    let result = store.clear_completed();
    let removed = checked_write(result, store, data_dir)?;
    if json {
        return Ok(serde_json::json!({ "removed": removed }).to_string());
    }
    Ok(match removed {
        0 => "no completed tasks".to_string(),
        1 => "cleared 1 completed task".to_string(),
        n => format!("cleared {} completed tasks", n),
    })
}

fn cmd_mv<S: KeyValueStore, I: IdProvider>(
    args: MvArgs,
    store: &mut TaskStore<S, I>,
    data_dir: &Path,
    json: bool,
) -> CmdResult {
    let source = resolve_task(store, &args.from)?;
    let target = resolve_task(store, &args.to)?;
    let result = store.move_task(&source.id, &target.id);
    checked_write(result, store, data_dir)?;
    if json {
        return Ok(serde_json::to_string_pretty(&task_list_to_json(
            store.tasks(),
            TaskFilter::All,
        ))?);
    }
    let pos = store.position(&source.id).map_or(0, |i| i + 1);
    Ok(format!("moved to {}: {}", pos, source.content))
}

// ---------------------------------------------------------------------------
// Theme
// ---------------------------------------------------------------------------

fn cmd_theme<S: KeyValueStore, A: SystemAppearance>(
    args: ThemeCmd,
    theme: &mut ThemeController<S, A>,
    data_dir: &Path,
    json: bool,
) -> CmdResult {
    let result = match args.action.unwrap_or(ThemeAction::Show) {
        ThemeAction::Show => Ok(()),
        ThemeAction::Cycle => theme.cycle_theme().map(|_| ()),
        ThemeAction::Set(set) => {
            let preference = ThemePreference::parse_preference(&set.preference).ok_or_else(
                || {
                    format!(
                        "unknown theme '{}' (expected auto, light or dark)",
                        set.preference
                    )
                },
            )?;
            theme.set_theme(preference)
        }
    };
    if let Err(err) = result {
        recovery::log_recovery(
            data_dir,
            RecoveryEntry::failed_write(THEME_KEY, &err.to_string(), theme.get_theme().as_str()),
        );
        return Err(err.into());
    }

    let preference = theme.get_theme();
    let appearance = theme.effective_appearance();
    if json {
        return Ok(serde_json::to_string_pretty(&ThemeJson {
            preference,
            appearance,
        })?);
    }
    Ok(match preference {
        ThemePreference::Auto => format!("auto ({})", appearance.as_preference()),
        other => other.to_string(),
    })
}

// ---------------------------------------------------------------------------
// Recovery log
// ---------------------------------------------------------------------------

fn cmd_recovery(args: RecoveryCmd, data_dir: &Path, json: bool) -> CmdResult {
    match args.action {
        Some(RecoveryAction::Prune(prune)) => {
            let removed = recovery::prune_recovery(data_dir, prune.all)?;
            if json {
                return Ok(serde_json::json!({ "pruned": removed }).to_string());
            }
            Ok(match removed {
                1 => "pruned 1 entry".to_string(),
                n => format!("pruned {} entries", n),
            })
        }
        Some(RecoveryAction::Path) => {
            Ok(recovery::recovery_log_path(data_dir).display().to_string())
        }
        None => {
            let entries = recovery::read_recovery_entries(data_dir, Some(args.limit.unwrap_or(10)));
            if json {
                let values: Vec<serde_json::Value> = entries.iter().map(|e| e.to_json()).collect();
                return Ok(serde_json::to_string_pretty(&values)?);
            }
            if entries.is_empty() {
                return Ok("no recovery entries".to_string());
            }
            Ok(entries
                .iter()
                .map(|e| e.to_display_markdown())
                .collect::<Vec<_>>()
                .join("\n"))
        }
    }
}
