use clap::{ArgAction, Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "habit", about = concat!("habitgrid v", env!("CARGO_PKG_VERSION"), " - one check a day"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Directory holding the data file
    #[arg(short = 'D', long = "data-dir", global = true)]
    pub data_dir: Option<String>,

    /// More log output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// No log output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Pretend today is this date (YYYY-MM-DD)
    #[arg(long, global = true, hide = true)]
    pub today: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write a commented config file
    Init(InitArgs),
    /// Show the tracker grid (default)
    List,
    /// Add a task to the end of the list
    Add(AddArgs),
    /// Delete a task and all of its check marks
    Rm(RmArgs),
    /// Rename a task
    Rename(RenameArgs),
    /// Toggle a task's check mark for a day
    Check(CheckArgs),
    /// Move a task into another task's slot
    Mv(MvArgs),
    /// Delete every task and check mark
    Clear(ClearArgs),
    /// Show consistency statistics
    Stats(StatsArgs),
    /// Show the last 29 days, newest first
    History,
}

#[derive(Args)]
pub struct InitArgs {
    /// Overwrite an existing config file
    #[arg(long)]
    pub force: bool,
}

#[derive(Args)]
pub struct AddArgs {
    /// Task title
    pub title: String,
}

#[derive(Args)]
pub struct RmArgs {
    /// Task position, ID or ID prefix
    pub task: String,
}

#[derive(Args)]
pub struct RenameArgs {
    /// Task position, ID or ID prefix
    pub task: String,
    /// New title
    pub title: String,
}

#[derive(Args)]
pub struct CheckArgs {
    /// Task position, ID or ID prefix
    pub task: String,
    /// Day to toggle: YYYY-MM-DD, "today" or "yesterday"
    #[arg(long, default_value = "today")]
    pub date: String,
}

#[derive(Args)]
pub struct MvArgs {
    /// Task to move
    pub task: String,
    /// Task whose slot it moves into
    pub over: String,
}

#[derive(Args)]
pub struct ClearArgs {
    /// Confirm the wipe
    #[arg(long)]
    pub yes: bool,
}

#[derive(Args)]
pub struct StatsArgs {
    /// 1D, 7D, 30D or ALL (default from config)
    #[arg(long, short)]
    pub range: Option<String>,
}
