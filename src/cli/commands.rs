use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "tick", about = concat!("tick v", env!("CARGO_PKG_VERSION"), " - a small to-do list for the terminal"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Keep tasks in a different data directory
    #[arg(short = 'D', long = "data-dir", global = true)]
    pub data_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write a commented config.toml into the data directory
    Init(InitArgs),
    /// List tasks with their positions
    List(ListArgs),
    /// Add a task to the end of the list
    Add(AddArgs),
    /// Mark a task completed, or active again
    Toggle(TaskArgs),
    /// Delete a task
    Rm(TaskArgs),
    /// Delete every completed task
    Clear,
    /// Move a task to another task's position
    Mv(MvArgs),
    /// Show or change the color theme
    Theme(ThemeCmd),
    /// View or manage the recovery log
    Recovery(RecoveryCmd),
}

#[derive(Args)]
pub struct InitArgs {
    /// Replace an existing config.toml
    #[arg(long)]
    pub force: bool,
}

#[derive(Args)]
pub struct ListArgs {
    /// Show only some tasks (all, active, completed)
    #[arg(long, short)]
    pub filter: Option<String>,
}

#[derive(Args)]
pub struct AddArgs {
    /// Task text; several words are joined with spaces
    #[arg(required = true, num_args = 1..)]
    pub text: Vec<String>,
}

/// A task reference: 1-based position or id prefix
#[derive(Args)]
pub struct TaskArgs {
    /// Position in the full list (1-based) or a unique id prefix
    pub task: String,
}

#[derive(Args)]
pub struct MvArgs {
    /// Task to move (position or id prefix)
    pub from: String,
    /// Task whose position it takes (position or id prefix)
    pub to: String,
}

// ---------------------------------------------------------------------------
// Theme
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct ThemeCmd {
    #[command(subcommand)]
    pub action: Option<ThemeAction>,
}

#[derive(Subcommand)]
pub enum ThemeAction {
    /// Print the stored preference and the appearance it resolves to
    Show,
    /// Switch between light and dark
    Cycle,
    /// Store a preference: auto, light or dark
    Set(ThemeSetArgs),
}

#[derive(Args)]
pub struct ThemeSetArgs {
    pub preference: String,
}

// ---------------------------------------------------------------------------
// Recovery log
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct RecoveryCmd {
    #[command(subcommand)]
    pub action: Option<RecoveryAction>,
    /// Maximum number of entries to show (default: 10)
    #[arg(long)]
    pub limit: Option<usize>,
}

#[derive(Subcommand)]
pub enum RecoveryAction {
    /// Remove entries older than 30 days
    Prune(RecoveryPruneArgs),
    /// Print the absolute path to the recovery log
    Path,
}

#[derive(Args)]
pub struct RecoveryPruneArgs {
    /// Remove all entries
    #[arg(long)]
    pub all: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["tick", "list", "--json", "-D", "/tmp/x"]).unwrap();
        assert!(cli.json);
        assert_eq!(cli.data_dir, Some(PathBuf::from("/tmp/x")));
        assert!(matches!(cli.command, Some(Commands::List(_))));
    }

    #[test]
    fn add_joins_words() {
        let cli = Cli::try_parse_from(["tick", "add", "Buy", "milk"]).unwrap();
        match cli.command {
            Some(Commands::Add(args)) => assert_eq!(args.text.join(" "), "Buy milk"),
            _ => panic!("expected add"),
        }
    }

    #[test]
    fn no_subcommand_means_tui() {
        let cli = Cli::try_parse_from(["tick"]).unwrap();
        assert!(cli.command.is_none());
    }
}
