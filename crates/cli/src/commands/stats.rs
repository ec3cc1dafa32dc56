use anyhow::Result;
use clap::Args;
use console::style;

use super::Status;
use crate::session::Session;

#[derive(Args)]
pub struct StatsCommand {}

impl StatsCommand {
    pub fn execute(self, session: &mut Session) -> Result<Status> {
        let store = session.store();

        println!("{}", style("Store").bold());
        println!("  Data:  {}", session.config().data_dir.display());
        println!("  State: {}", store.state());
        for (kind, count) in store.counts() {
            println!("  {:<10} {}", kind.table_name(), count);
        }
        if !store.invalid_on_load().is_empty() {
            println!(
                "  {} {} record(s) failed validation on load",
                style("!").yellow().bold(),
                store.invalid_on_load().len()
            );
            for key in store.invalid_on_load() {
                println!("    {key}");
            }
        }

        println!("{}", style("Lookups").bold());
        println!("  {}", store.performance_snapshot());

        let cache = session.engine().cache_stats();
        println!("{}", style("Result cache").bold());
        println!(
            "  {} entries, {} hits, {} misses",
            cache.entries, cache.hits, cache.misses
        );
        Ok(Status::Passed)
    }
}
