//! Command-line interface definitions for csvsync.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use logging::LogArgs;

/// Command-line interface for the `csvsync` binary.
#[derive(Parser, Debug)]
#[command(
    name = "csvsync",
    about = "Keep OBS sources in sync with a CSV data file",
    version
)]
pub struct Cli {
    /// Logging controls
    #[command(flatten)]
    pub log: LogArgs,

    /// Optional path to the config file (defaults to ~/.csvsync/config.ron)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// What to do; watches and syncs when omitted.
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Watch the data file and keep sources in sync until interrupted.
    Run,
    /// Push the current data once.
    Sync {
        /// Connect, push every mapped source unconditionally, and disconnect.
        #[arg(long)]
        once: bool,
    },
    /// Load and validate the configuration then exit.
    Check {
        /// Print the resolved configuration as RON
        #[arg(long)]
        dump: bool,
    },
    /// List the data file's columns, grouped by prefix.
    Columns {
        /// CSV file to inspect (defaults to the configured data file)
        path: Option<PathBuf>,
    },
    /// Print a starter config with a suggested mapping for every column.
    Suggest {
        /// CSV file to inspect (defaults to the configured data file)
        path: Option<PathBuf>,
    },
    /// Show the values that would be pushed, without connecting.
    Preview,
}
