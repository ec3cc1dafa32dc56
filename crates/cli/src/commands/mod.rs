//! Subcommands. Each one is a clap `Args` struct with an `execute` method
//! taking the live [`Session`].

mod cache;
mod metrics;
mod profile;
mod rules;
mod shell;
mod stats;
mod sweep;
mod validate;

use anyhow::Result;
use clap::Subcommand;

use crate::session::Session;

pub use cache::CacheCommand;
pub use metrics::MetricsCommand;
pub use profile::ProfileCommand;
pub use rules::RulesCommand;
pub use shell::ShellCommand;
pub use stats::StatsCommand;
pub use sweep::ValidateAllCommand;
pub use validate::ValidateCommand;

#[derive(Subcommand)]
pub enum Command {
    /// Validate one record, e.g. `validate weapon/longsword`
    Validate(ValidateCommand),
    /// Validate every loaded record, including cross-record references
    ValidateAll(ValidateAllCommand),
    /// List registered rules in execution order
    Rules(RulesCommand),
    /// Show, reset, or export validation metrics
    #[command(subcommand)]
    Metrics(MetricsCommand),
    /// Inspect or clear the result cache
    #[command(subcommand)]
    Cache(CacheCommand),
    /// Measure uncached and cached validation latency for one record
    Profile(ProfileCommand),
    /// Show store lookup statistics and table sizes
    Stats(StatsCommand),
    /// Read commands from stdin against one live session
    Shell(ShellCommand),
}

/// Whether a command's check passed. Maps to the process exit code.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Status {
    Passed,
    Failed,
}

impl From<bool> for Status {
    fn from(passed: bool) -> Self {
        if passed { Self::Passed } else { Self::Failed }
    }
}

pub fn run(command: Command, session: &mut Session) -> Result<Status> {
    match command {
        Command::Validate(cmd) => cmd.execute(session),
        Command::ValidateAll(cmd) => cmd.execute(session),
        Command::Rules(cmd) => cmd.execute(session),
        Command::Metrics(cmd) => cmd.execute(session),
        Command::Cache(cmd) => cmd.execute(session),
        Command::Profile(cmd) => cmd.execute(session),
        Command::Stats(cmd) => cmd.execute(session),
        Command::Shell(cmd) => cmd.execute(session),
    }
}
