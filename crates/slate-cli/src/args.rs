use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::cli::{BoardCommands, TaskCommands};

/// Task and board manager that guards unsaved edits
///
/// Tasks carry a title, a date range and an ordered list of boards. Every
/// command reports its outcome as notifications. Run `slate shell` for an
/// interactive session with unsaved-change protection, or `slate serve` to
/// expose the same workspace to MCP clients.
#[derive(Parser)]
#[command(version, about, name = "slate")]
pub struct Args {
    /// Path to the SQLite database file. Defaults to
    /// $XDG_DATA_HOME/slate/slate.db
    #[arg(long, global = true)]
    pub database_file: Option<PathBuf>,

    /// Disable colored output and use plain text
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Manage tasks
    #[command(alias = "t")]
    Task {
        #[command(subcommand)]
        command: TaskCommands,
    },
    /// Manage boards within a task
    #[command(alias = "b")]
    Board {
        #[command(subcommand)]
        command: BoardCommands,
    },
    /// Start an interactive session
    Shell,
    /// Start the MCP server
    Serve,
}
