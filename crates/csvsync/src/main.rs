#![warn(missing_docs)]
//! Binary entrypoint for csvsync.
//!
//! Watches a one-row CSV file and mirrors its mapped columns into OBS
//! sources over obs-websocket.
use std::{io, path::Path, process::ExitCode};

use clap::Parser;
use config::Config;
use logging::LogArgs;
use tokio::runtime::{Builder, Runtime};
use tracing::{debug, error};
use tracing_subscriber::{fmt, prelude::*};

/// Command-line parsing.
mod cli;
/// Subcommand bodies.
mod commands;
/// Error types.
mod error;
/// SIGINT/SIGTERM handling.
mod signal;

use crate::{
    cli::{Cli, Command},
    error::{Error, Result},
};

/// Parse arguments and map the outcome to an exit code.
fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            error!("{e}");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Load the config, install logging, and dispatch the subcommand.
fn run(cli: Cli) -> Result<ExitCode> {
    let command = cli.command.unwrap_or(Command::Run);

    // Inspecting an explicit CSV file works without any config.
    let standalone = match &command {
        Command::Columns { path } | Command::Suggest { path } => path.clone(),
        _ => None,
    };
    let config = match standalone {
        Some(_) => None,
        None => {
            let path = config::resolve_config_path(cli.config.as_deref())?;
            Some(config::load_from_path(&path)?)
        }
    };
    init_logging(&cli.log, config.as_ref())?;

    match (command, config) {
        (Command::Columns { path: Some(path) }, _) => {
            print!("{}", commands::columns(&path)?);
        }
        (Command::Suggest { path: Some(path) }, _) => {
            print!("{}", commands::suggest(&path)?);
        }
        (_, None) => {}
        (Command::Columns { path: None }, Some(cfg)) => {
            print!("{}", commands::columns(&cfg.data_file)?);
        }
        (Command::Suggest { path: None }, Some(cfg)) => {
            print!("{}", commands::suggest(&cfg.data_file)?);
        }
        (Command::Check { dump }, Some(cfg)) => {
            println!("{}", commands::check(&cfg, dump)?);
        }
        (Command::Preview, Some(cfg)) => {
            print!("{}", commands::preview(&cfg)?);
        }
        (Command::Sync { once: true }, Some(cfg)) => {
            let ok = runtime()?.block_on(commands::sync(&cfg))?;
            if !ok {
                return Ok(ExitCode::FAILURE);
            }
        }
        (Command::Run | Command::Sync { once: false }, Some(cfg)) => {
            debug!("Watching {}", cfg.data_file.display());
            runtime()?.block_on(commands::run(cfg))?;
        }
    }
    Ok(ExitCode::SUCCESS)
}

/// Single-threaded runtime; the sync loop is strictly sequential.
fn runtime() -> Result<Runtime> {
    Ok(Builder::new_current_thread().enable_all().build()?)
}

/// Install the global subscriber: compact stderr output plus an optional log file.
fn init_logging(args: &LogArgs, config: Option<&Config>) -> Result<()> {
    let default_level = config.and_then(|c| c.log_level.as_deref());
    let spec = args.spec(default_level);
    let file = match config.and_then(|c| c.log_file.as_deref()) {
        Some(path) => Some(open_log_file(path)?),
        None => None,
    };
    tracing_subscriber::registry()
        .with(logging::env_filter_from_spec(&spec))
        .with(fmt::layer().without_time().with_writer(io::stderr))
        .with(file)
        .try_init()
        .ok();
    Ok(())
}

/// Open the configured log file as a subscriber layer.
fn open_log_file<S>(path: &Path) -> Result<logging::file::FileLayer<S>> {
    logging::file::layer(path).map_err(|source| Error::LogFile {
        path: path.to_path_buf(),
        source,
    })
}
