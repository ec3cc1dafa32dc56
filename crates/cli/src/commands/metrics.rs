use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Subcommand;
use console::style;
use validation::ExportFormat;

use super::Status;
use crate::session::Session;

#[derive(Subcommand)]
pub enum MetricsCommand {
    /// Print the metrics report
    Show,
    /// Zero every counter and timing table
    Reset,
    /// Write the current snapshot to a file
    Export {
        /// json (structured), csv (tabular), or html (human-readable)
        #[arg(long, default_value = "json", value_parser = ExportFormat::from_name)]
        format: ExportFormat,

        /// Output path (default: saved/validation/metrics.<ext>)
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

impl MetricsCommand {
    pub fn execute(self, session: &mut Session) -> Result<Status> {
        let engine = session.engine();
        match self {
            Self::Show => {
                print!("{}", engine.metrics_report());
            }
            Self::Reset => {
                engine.reset_metrics();
                println!("{} Metrics reset", style("✓").green().bold());
            }
            Self::Export { format, out } => {
                let path = out.unwrap_or_else(|| format.default_path());
                engine
                    .export_metrics(format, &path)
                    .with_context(|| format!("Failed to export metrics to {}", path.display()))?;
                println!(
                    "{} Exported {} metrics to {}",
                    style("✓").green().bold(),
                    format,
                    path.display()
                );
            }
        }
        Ok(Status::Passed)
    }
}
