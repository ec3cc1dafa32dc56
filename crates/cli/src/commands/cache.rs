use anyhow::Result;
use clap::Subcommand;
use console::style;
use validation::CacheStats;

use super::Status;
use crate::session::Session;

#[derive(Subcommand)]
pub enum CacheCommand {
    /// Evict every cached verdict
    Clear,
    /// Show hit/miss counters and the number of cached entries
    Stats,
}

impl CacheCommand {
    pub fn execute(self, session: &mut Session) -> Result<Status> {
        let engine = session.engine();
        match self {
            Self::Clear => {
                let evicted = engine.clear_cache();
                println!(
                    "{} Cleared {} cached verdict(s)",
                    style("✓").green().bold(),
                    evicted
                );
            }
            Self::Stats => {
                print!("{}", format_stats(&engine.cache_stats()));
            }
        }
        Ok(Status::Passed)
    }
}

fn format_stats(stats: &CacheStats) -> String {
    format!(
        "Entries:  {}\nHits:     {}\nMisses:   {}\nHit rate: {:.1}%\n",
        stats.entries,
        stats.hits,
        stats.misses,
        stats.hit_rate()
    )
}
