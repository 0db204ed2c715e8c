use anyhow::{Context, Result};
use clap::Parser;
use quickren_core::{Config, OutputFormatter, RenameError, VersionResult};
use std::io::{self, IsTerminal};
use std::path::{Path, PathBuf};
use std::process;
use tracing_subscriber::EnvFilter;

mod apply;
mod cli;
mod history;
mod list;
mod plan;
mod rename;
mod request;
mod status;
mod undo;

use cli::{Cli, Commands, OutputFormat};

const LOG_ENV: &str = "QUICKREN_LOG";

fn main() {
    init_logging();

    let cli = Cli::parse();

    let working_dir = match resolve_working_dir(cli.directory.as_deref()) {
        Ok(dir) => dir,
        Err(e) => {
            eprintln!("Error: {e:#}");
            process::exit(2);
        },
    };

    let config = Config::load(&working_dir).unwrap_or_else(|e| {
        tracing::warn!("ignoring unreadable config: {e:#}");
        Config::default()
    });
    let use_color = !cli.no_color
        && config.defaults.use_color.unwrap_or(true)
        && io::stdout().is_terminal();

    let result = run(cli, &config, &working_dir, use_color);

    match result {
        Ok(0) => process::exit(0),
        Ok(failed) => {
            tracing::debug!(failed, "finished with failed operations");
            process::exit(1);
        },
        Err(e) => {
            eprintln!("Error: {e:#}");
            process::exit(exit_code(&e));
        },
    }
}

/// Dispatch a parsed command. Returns the number of failed operations.
fn run(cli: Cli, config: &Config, working_dir: &Path, use_color: bool) -> Result<usize> {
    match cli.command {
        Commands::Plan {
            dir,
            filter,
            pattern,
            preview,
            plan_out,
            dry_run,
            output,
            quiet,
        } => {
            let request = request::build_request(dir, filter, &pattern, preview, config, use_color)?;
            plan::handle_plan(&request, plan_out, dry_run, working_dir, output, quiet)?;
            Ok(0)
        },

        Commands::Apply {
            plan,
            output,
            quiet,
        } => apply::handle_apply(plan, working_dir, output, quiet),

        Commands::Rename {
            dir,
            filter,
            pattern,
            preview,
            output,
            quiet,
        } => {
            let request = request::build_request(dir, filter, &pattern, preview, config, use_color)?;
            rename::handle_rename(&request, cli.yes, working_dir, output, quiet)
        },

        Commands::Undo { output, quiet } => undo::handle_undo(working_dir, output, quiet),

        Commands::Status { output, quiet } => {
            status::handle_status(working_dir, output, quiet)?;
            Ok(0)
        },

        Commands::History {
            limit,
            output,
            quiet,
        } => {
            history::handle_history(limit, working_dir, output, quiet)?;
            Ok(0)
        },

        Commands::List {
            dir,
            filter,
            output,
            quiet,
        } => {
            let selection = request::build_selection(dir, filter, config);
            list::handle_list(&selection, working_dir, output, quiet)?;
            Ok(0)
        },

        Commands::Version { output } => {
            handle_version(output);
            Ok(0)
        },
    }
}

/// Logs go to stderr so they never mix with JSON output
fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}

fn resolve_working_dir(directory: Option<&Path>) -> Result<PathBuf> {
    let current = std::env::current_dir().context("Failed to get current directory")?;
    let Some(dir) = directory else {
        return Ok(current);
    };
    let dir = current.join(dir);
    if !dir.is_dir() {
        anyhow::bail!("Failed to change to directory: {}", dir.display());
    }
    Ok(dir)
}

/// 2 for bad input, 3 for anything unexpected
fn exit_code(error: &anyhow::Error) -> i32 {
    if let Some(rename_error) = error.downcast_ref::<RenameError>() {
        return match rename_error {
            RenameError::InvalidPattern(_)
            | RenameError::UndoUnavailable
            | RenameError::CollisionUnresolvable { .. } => 2,
            RenameError::FileSystem { .. } => 3,
        };
    }

    let message = error.to_string();
    if message.contains("no default plan found")
        || message.contains("Not a directory")
        || message.contains("non-interactive mode")
        || message.contains("Failed to change to directory")
    {
        2
    } else {
        3
    }
}

fn handle_version(output: OutputFormat) {
    let version_result = VersionResult {
        name: env!("CARGO_PKG_NAME").to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    };

    println!("{}", version_result.format(output.into()));
}
