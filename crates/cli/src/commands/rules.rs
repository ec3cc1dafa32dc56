use anyhow::{Result, bail};
use clap::Args;
use console::style;
use validation::RuleDefinition;

use super::Status;
use crate::session::Session;

#[derive(Args)]
pub struct RulesCommand {
    /// Only rules that apply to this type, including inherited ones
    #[arg(long = "type", value_name = "TYPE")]
    pub type_name: Option<String>,
}

impl RulesCommand {
    pub fn execute(self, session: &mut Session) -> Result<Status> {
        let engine = session.engine();

        let rules = match &self.type_name {
            Some(name) => {
                let Some(tag) = engine
                    .declared_types()
                    .into_iter()
                    .find(|tag| tag.name().eq_ignore_ascii_case(name))
                else {
                    let known: Vec<_> = engine
                        .declared_types()
                        .iter()
                        .map(|tag| tag.name())
                        .collect();
                    bail!("unknown type '{}' (known: {})", name, known.join(", "));
                };
                println!("{}", style(format!("Rules applied to {tag}:")).bold());
                engine.rules_for(tag)
            }
            None => {
                println!("{}", style("Registered rules:").bold());
                engine.all_rules()
            }
        };

        print_rules(&rules);
        println!("{} rule(s)", rules.len());
        Ok(Status::Passed)
    }
}

fn print_rules(rules: &[RuleDefinition]) {
    let name_width = rules
        .iter()
        .map(|rule| rule.name().len())
        .max()
        .unwrap_or(4)
        .max(4);

    println!(
        "  {:>8}  {:<name_width$}  {:<14}  {}",
        "PRIORITY", "NAME", "TARGET", "DESCRIPTION"
    );
    for rule in rules {
        println!(
            "  {:>8}  {:<name_width$}  {:<14}  {}",
            rule.priority(),
            style(rule.name()).cyan(),
            rule.target().name(),
            style(rule.description()).dim()
        );
    }
}
