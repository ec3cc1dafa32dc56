//! Operational command line for the configuration validation service.
//!
//! Every invocation opens one [`Session`]: the default rule set, the content
//! store loaded from the data directory, and (optionally) the persisted
//! metrics snapshot. `shell` keeps that session alive across commands.

mod commands;
mod config;
mod dirs;
mod session;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use console::style;
use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::commands::{Command, Status};
use crate::config::CliConfig;
use crate::session::Session;

#[derive(Parser)]
#[command(name = "dungeon-validate")]
#[command(about = "Validate game configuration records", long_about = None)]
#[command(version)]
struct Cli {
    /// Content data directory (overrides DUNGEON_DATA_DIR)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Metrics snapshot file (overrides VALIDATION_METRICS_PATH)
    #[arg(long, global = true)]
    metrics_path: Option<PathBuf>,

    /// Do not load or save the metrics snapshot
    #[arg(long, global = true)]
    no_persist: bool,

    /// Also write logs to a file in the log directory
    #[arg(long, global = true)]
    log_file: bool,

    #[command(subcommand)]
    command: Command,
}

impl Cli {
    fn apply_to(&self, config: &mut CliConfig) {
        if let Some(dir) = &self.data_dir {
            config.data_dir = dir.clone();
        }
        if let Some(path) = &self.metrics_path {
            config.metrics_path = path.clone();
        }
        if self.no_persist {
            config.persist_metrics = false;
        }
        if self.log_file {
            config.log_to_file = true;
        }
    }
}

fn main() -> ExitCode {
    // Load .env file if present (ignore errors if not found)
    let _ = dotenvy::dotenv();

    match run() {
        Ok(Status::Passed) => ExitCode::SUCCESS,
        Ok(Status::Failed) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("{} {:#}", style("error:").red().bold(), e);
            ExitCode::from(2)
        }
    }
}

fn run() -> Result<Status> {
    let cli = Cli::parse();
    let mut config = CliConfig::from_env();
    cli.apply_to(&mut config);

    let _guard = setup_logging(&config)?;

    let mut session = Session::open(config)?;
    let status = commands::run(cli.command, &mut session);
    session.close()?;
    status
}

/// Installs the stderr subscriber, plus a file layer when enabled.
///
/// The returned guard must live until exit so buffered file logs are flushed.
fn setup_logging(config: &CliConfig) -> Result<Option<WorkerGuard>> {
    let env_filter = EnvFilter::builder()
        .with_default_directive(Level::WARN.into())
        .from_env_lossy();

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true);

    if !config.log_to_file {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(stderr_layer)
            .init();
        return Ok(None);
    }

    let log_dir = config.log_dir.clone().unwrap_or_else(dirs::log_dir);
    std::fs::create_dir_all(&log_dir)
        .with_context(|| format!("Failed to create log directory {}", log_dir.display()))?;

    let file_appender = tracing_appender::rolling::never(&log_dir, "validation.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(true)
        .with_line_number(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .with(file_layer)
        .init();

    Ok(Some(guard))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_global_flags_override_environment() {
        let cli = Cli::try_parse_from([
            "dungeon-validate",
            "stats",
            "--data-dir",
            "/content",
            "--no-persist",
        ])
        .unwrap();
        let mut config = CliConfig::default();
        cli.apply_to(&mut config);

        assert_eq!(config.data_dir, PathBuf::from("/content"));
        assert!(!config.persist_metrics);
        assert!(!config.log_to_file);
    }

    #[test]
    fn test_cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
