mod init;
pub use init::cmd_init;

use std::path::{Path, PathBuf};

use chrono::{Days, Local, NaiveDate};

use crate::cli::commands::*;
use crate::cli::output::*;
use crate::io::config_io;
use crate::io::storage::FileStore;
use crate::model::completion::{date_key, parse_date_key};
use crate::model::config::Config;
use crate::model::range::TimeRange;
use crate::ops::grid;
use crate::ops::store::TaskStore;
use crate::ops::task_ops;

type CmdResult = Result<(), Box<dyn std::error::Error>>;

/// Everything a command needs besides its own arguments
struct Context {
    json: bool,
    today: NaiveDate,
    config: Config,
    data_dir: PathBuf,
}

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub fn dispatch(cli: Cli) -> CmdResult {
    let config = config_io::read_config();
    let data_dir = config_io::resolve_data_dir(cli.data_dir.as_deref().map(Path::new), &config);
    let today = match cli.today.as_deref() {
        Some(s) => parse_date_key(s).ok_or_else(|| format!("invalid --today date: {}", s))?,
        None => Local::now().date_naive(),
    };
    let ctx = Context {
        json: cli.json,
        today,
        config,
        data_dir,
    };

    match cli.command.unwrap_or(Commands::List) {
        // Init is handled in main.rs before the store is opened
        Commands::Init(args) => cmd_init(args),

        // Read commands
        Commands::List => cmd_list(&ctx),
        Commands::Stats(args) => cmd_stats(args, &ctx),
        Commands::History => cmd_history(&ctx),

        // Write commands
        Commands::Add(args) => cmd_add(args, &ctx),
        Commands::Rm(args) => cmd_rm(args, &ctx),
        Commands::Rename(args) => cmd_rename(args, &ctx),
        Commands::Check(args) => cmd_check(args, &ctx),
        Commands::Mv(args) => cmd_mv(args, &ctx),
        Commands::Clear(args) => cmd_clear(args, &ctx),
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn open_store(ctx: &Context) -> TaskStore<FileStore> {
    TaskStore::open_with_seed(FileStore::new(&ctx.data_dir), ctx.config.seed_task())
}

/// Resolve a task reference to its ID.
fn task_id(store: &TaskStore<FileStore>, reference: &str) -> Result<String, task_ops::TaskError> {
    task_ops::resolve_task(store.snapshot(), reference).map(|t| t.id.clone())
}

/// Parse `--date`: a date-key, "today" or "yesterday".
fn resolve_date(input: &str, today: NaiveDate) -> Result<NaiveDate, String> {
    match input.trim().to_ascii_lowercase().as_str() {
        "today" => Ok(today),
        "yesterday" => today
            .checked_sub_days(Days::new(1))
            .ok_or_else(|| "date out of range".to_string()),
        other => parse_date_key(other)
            .ok_or_else(|| format!("invalid date '{}' (expected YYYY-MM-DD)", input)),
    }
}

/// The store keeps working after a failed write, but this process is about
/// to exit, so the user needs to know the change is gone.
fn warn_if_unsaved(store: &TaskStore<FileStore>) {
    if let Some(err) = store.last_save_error() {
        eprintln!("warning: changes could not be saved: {}", err);
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> CmdResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_lines(lines: Vec<String>) {
    for line in lines {
        println!("{}", line);
    }
}

// ---------------------------------------------------------------------------
// Read commands
// ---------------------------------------------------------------------------

fn cmd_list(ctx: &Context) -> CmdResult {
    let store = open_store(ctx);
    warn_if_unsaved(&store);
    let days = grid::tracker_days(ctx.today);
    if ctx.json {
        return print_json(&grid_to_json(store.snapshot(), &days, ctx.today));
    }
    print_lines(format_grid(store.snapshot(), &days, ctx.today));
    Ok(())
}

fn cmd_stats(args: StatsArgs, ctx: &Context) -> CmdResult {
    let range = match args.range {
        Some(r) => r.parse::<TimeRange>()?,
        None => ctx.config.default_range,
    };
    let store = open_store(ctx);
    let report = store.analytics(range, ctx.today);
    if ctx.json {
        return print_json(&report);
    }
    print_lines(format_report(&report));
    Ok(())
}

fn cmd_history(ctx: &Context) -> CmdResult {
    let store = open_store(ctx);
    let rows = store.history(ctx.today);
    if ctx.json {
        return print_json(&history_to_json(store.snapshot(), rows));
    }
    if store.tasks().is_empty() {
        println!("No tasks yet.");
        return Ok(());
    }
    print_lines(format_history(store.snapshot(), &rows));
    Ok(())
}

// ---------------------------------------------------------------------------
// Write commands
// ---------------------------------------------------------------------------

fn cmd_add(args: AddArgs, ctx: &Context) -> CmdResult {
    let mut store = open_store(ctx);
    let id = store
        .add_task(&args.title)
        .ok_or("task title cannot be empty")?;
    warn_if_unsaved(&store);

    let position = store.tasks().len();
    if ctx.json {
        let task = store.task(&id).ok_or("task vanished after add")?;
        return print_json(&task_to_json(position, task));
    }
    println!("{} added ({})", position, id);
    Ok(())
}

fn cmd_rm(args: RmArgs, ctx: &Context) -> CmdResult {
    let mut store = open_store(ctx);
    let id = task_id(&store, &args.task)?;
    let position = store.snapshot().position(&id).map_or(0, |i| i + 1);
    let removed = store
        .task(&id)
        .map(|t| task_to_json(position, t))
        .ok_or_else(|| format!("task not found: {}", args.task))?;
    store.delete_task(&id);
    warn_if_unsaved(&store);

    if ctx.json {
        return print_json(&ChangeJson {
            changed: true,
            task: removed,
        });
    }
    println!("deleted \"{}\"", removed.title);
    Ok(())
}

/// The task `id` with its current 1-based position
fn current_task_json(store: &TaskStore<FileStore>, id: &str) -> Result<TaskJson, String> {
    let position = store
        .snapshot()
        .position(id)
        .ok_or_else(|| format!("task not found: {}", id))?;
    let task = &store.tasks()[position];
    Ok(task_to_json(position + 1, task))
}

fn cmd_rename(args: RenameArgs, ctx: &Context) -> CmdResult {
    let mut store = open_store(ctx);
    let id = task_id(&store, &args.task)?;
    if args.title.trim().is_empty() {
        return Err("task title cannot be empty".into());
    }
    let changed = store.rename_task(&id, &args.title);
    warn_if_unsaved(&store);

    if ctx.json {
        let task = current_task_json(&store, &id)?;
        return print_json(&ChangeJson { changed, task });
    }
    if changed {
        println!("renamed to \"{}\"", args.title.trim());
    } else {
        println!("title unchanged");
    }
    Ok(())
}

fn cmd_check(args: CheckArgs, ctx: &Context) -> CmdResult {
    let mut store = open_store(ctx);
    let id = task_id(&store, &args.task)?;
    let date = date_key(resolve_date(&args.date, ctx.today)?);
    let done = store
        .toggle_completion(&id, &date)
        .ok_or_else(|| format!("task not found: {}", args.task))?;
    warn_if_unsaved(&store);

    if ctx.json {
        return print_json(&ToggleJson { id, date, done });
    }
    let title = store.task(&id).map(|t| t.title.as_str()).unwrap_or_default();
    let state = if done { "done" } else { "not done" };
    println!("{} {}: {}", date, title, state);
    Ok(())
}

fn cmd_mv(args: MvArgs, ctx: &Context) -> CmdResult {
    let mut store = open_store(ctx);
    let active = task_id(&store, &args.task)?;
    let over = task_id(&store, &args.over)?;
    let changed = store.reorder_tasks(&active, &over);
    warn_if_unsaved(&store);

    let task = current_task_json(&store, &active)?;
    if ctx.json {
        return print_json(&ChangeJson { changed, task });
    }
    if changed {
        println!("moved to position {}", task.position);
    } else {
        println!("order unchanged");
    }
    Ok(())
}

fn cmd_clear(args: ClearArgs, ctx: &Context) -> CmdResult {
    if !args.yes {
        return Err("refusing to delete all tasks without --yes".into());
    }
    let mut store = open_store(ctx);
    let deleted = store.tasks().len();
    store.clear_data();
    warn_if_unsaved(&store);

    if ctx.json {
        return print_json(&ClearJson { deleted });
    }
    println!("deleted {} task(s) and all check marks", deleted);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_date_keywords_and_keys() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        assert_eq!(resolve_date("today", today), Ok(today));
        assert_eq!(
            resolve_date("Yesterday", today),
            Ok(NaiveDate::from_ymd_opt(2024, 2, 29).unwrap())
        );
        assert_eq!(
            resolve_date("2024-01-10", today),
            Ok(NaiveDate::from_ymd_opt(2024, 1, 10).unwrap())
        );
        assert!(resolve_date("01/10/2024", today).is_err());
    }
}
