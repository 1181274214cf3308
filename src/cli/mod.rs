use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "routinelog",
    about = "Routine-driven health variable logging"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
    Status,
    Variable {
        #[command(subcommand)]
        command: VariableCommands,
    },
    Routine {
        #[command(subcommand)]
        command: RoutineCommands,
    },
    /// Preview the log entries routines would create in a date range.
    Plan {
        #[arg(long)]
        from: Option<String>,
        #[arg(long)]
        to: Option<String>,
        #[arg(long = "routine")]
        routines: Vec<i64>,
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Persist planned entries, skipping slots that already hold a log.
    Apply {
        #[arg(long)]
        from: Option<String>,
        #[arg(long)]
        to: Option<String>,
        #[arg(long = "routine")]
        routines: Vec<i64>,
        #[arg(long)]
        user: Option<String>,
        /// Planned entry id to leave out; repeatable.
        #[arg(long = "skip")]
        skip: Vec<String>,
    },
    Log {
        #[command(subcommand)]
        command: LogCommands,
    },
    /// Run the API server and the daily auto-log scheduler.
    Serve,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    Set { key: String, value: String },
    Get { key: String },
}

#[derive(Debug, Subcommand)]
pub enum VariableCommands {
    Add {
        name: String,
        #[arg(long, default_value = "numeric")]
        kind: String,
        #[arg(long)]
        unit: Option<String>,
    },
    List,
}

#[derive(Debug, Subcommand)]
pub enum RoutineCommands {
    /// Create a routine from a JSON definition file.
    Add {
        #[arg(long)]
        file: PathBuf,
    },
    List,
    Show { id: i64 },
    Remove { id: i64 },
}

#[derive(Debug, Subcommand)]
pub enum LogCommands {
    Add {
        variable: String,
        value: String,
        #[arg(long)]
        date: Option<String>,
        #[arg(long)]
        time: Option<String>,
        #[arg(long)]
        unit: Option<String>,
        #[arg(long)]
        user: Option<String>,
    },
    List {
        #[arg(long)]
        from: Option<String>,
        #[arg(long)]
        to: Option<String>,
        #[arg(long)]
        user: Option<String>,
    },
}
