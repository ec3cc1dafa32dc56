use std::time::Duration;

use anyhow::Result;
use clap::Args;
use console::style;
use game_content::SweepOptions;

use super::Status;
use crate::session::Session;

#[derive(Args)]
pub struct ValidateAllCommand {
    /// Ignore cached verdicts
    #[arg(long)]
    pub force: bool,

    /// Stop starting new records after this many milliseconds
    /// (overrides `sweep_deadline_ms` in store.toml)
    #[arg(long)]
    pub deadline_ms: Option<u64>,

    /// Print the full context tree
    #[arg(short, long)]
    pub verbose: bool,
}

impl ValidateAllCommand {
    pub fn execute(self, session: &mut Session) -> Result<Status> {
        let store = session.store();
        let mut options = SweepOptions::from_settings(store.settings());
        options.force_revalidate = self.force;
        if let Some(ms) = self.deadline_ms {
            options.deadline = Some(Duration::from_millis(ms));
        }

        let sweep = store.validate_all(options);

        if self.verbose {
            print!("{:#}", sweep.context);
        }
        print!("{}", sweep.report);

        if sweep.valid {
            println!(
                "{} {} records checked, {} skipped",
                style("PASS").green().bold(),
                sweep.checked,
                sweep.skipped
            );
        } else {
            println!(
                "{} {} of {} records invalid",
                style("FAIL").red().bold(),
                sweep.failing.len(),
                sweep.checked
            );
        }

        Ok(sweep.valid.into())
    }
}
