use std::time::Duration;

use anyhow::{Result, bail};
use clap::Args;
use console::style;
use validation::{CACHED_TARGET, LatencyProfile, UNCACHED_TARGET, profile_validation};

use super::Status;
use crate::session::{RecordPath, Session};

#[derive(Args)]
pub struct ProfileCommand {
    /// Record to profile as `<kind>/<name>`
    pub target: RecordPath,

    /// Validations per measurement
    #[arg(short = 'n', long, default_value_t = 100)]
    pub iterations: usize,
}

impl ProfileCommand {
    pub fn execute(self, session: &mut Session) -> Result<Status> {
        if self.iterations == 0 {
            bail!("--iterations must be at least 1");
        }
        let entry = session.entry(&self.target)?;
        let report = profile_validation(session.engine(), entry.as_validatable(), self.iterations);

        println!(
            "{}",
            style(format!(
                "Profiled {} over {} iterations",
                self.target, self.iterations
            ))
            .bold()
        );
        print_row("uncached", &report.uncached, UNCACHED_TARGET);
        print_row("cached", &report.cached, CACHED_TARGET);

        Ok(report.meets_targets().into())
    }
}

fn print_row(label: &str, profile: &LatencyProfile, target: Duration) {
    let verdict = if profile.meets(target) {
        style("ok").green()
    } else {
        style("slow").red()
    };
    println!(
        "  {:<9} {}  (target avg < {:?}: {})",
        label, profile, target, verdict
    );
}
