use anyhow::Result;
use clap::Args;
use console::style;
use validation::Validatable;

use super::Status;
use crate::session::{RecordPath, Session};

#[derive(Args)]
pub struct ValidateCommand {
    /// Record to validate as `<kind>/<name>`
    pub target: RecordPath,

    /// Ignore any cached verdict and run the rules again
    #[arg(long)]
    pub no_cache: bool,

    /// Print the full context tree including per-rule timing
    #[arg(short, long)]
    pub verbose: bool,
}

impl ValidateCommand {
    pub fn execute(self, session: &mut Session) -> Result<Status> {
        let entry = session.entry(&self.target)?;
        let outcome = session
            .engine()
            .validate_with_cache(entry.as_validatable(), self.no_cache);

        if self.verbose {
            print!("{:#}", outcome.context);
        } else {
            print!("{}", outcome.context);
        }

        let verdict = if outcome.valid {
            style("PASS").green().bold()
        } else {
            style("FAIL").red().bold()
        };
        let source = if outcome.cached { " (cached)" } else { "" };
        println!(
            "{} {}{}",
            verdict,
            entry.as_validatable().object_key(),
            style(source).dim()
        );

        Ok(outcome.valid.into())
    }
}
