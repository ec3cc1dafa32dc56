use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};
use clap::{Args, Parser};
use console::style;
use tracing::debug;

use super::{Command, Status};
use crate::session::Session;

#[derive(Args)]
pub struct ShellCommand {
    /// Do not print a prompt (for piped input)
    #[arg(long)]
    pub quiet: bool,
}

/// One shell line, parsed with the same subcommands as the binary.
#[derive(Parser)]
#[command(no_binary_name = true, disable_version_flag = true)]
struct ShellLine {
    #[command(subcommand)]
    command: Command,
}

impl ShellCommand {
    /// Runs commands until `exit`, `quit`, or end of input.
    ///
    /// A failing command is reported and the shell continues; the returned
    /// status is `Failed` if any command failed.
    pub fn execute(self, session: &mut Session) -> Result<Status> {
        let stdin = io::stdin();
        self.run_lines(stdin.lock(), session)
    }

    fn run_lines(&self, input: impl BufRead, session: &mut Session) -> Result<Status> {
        let mut status = Status::Passed;
        let mut lines = input.lines();

        loop {
            if !self.quiet {
                print!("{} ", style("validate>").cyan().bold());
                io::stdout().flush().context("Failed to flush prompt")?;
            }
            let Some(line) = lines.next() else {
                break;
            };
            let line = line.context("Failed to read shell input")?;
            let line = line.trim();

            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            if matches!(line, "exit" | "quit") {
                break;
            }

            debug!(target: "cli::shell", line, "Dispatching shell command");
            match dispatch(line, session) {
                Ok(Status::Passed) => {}
                Ok(Status::Failed) => status = Status::Failed,
                Err(e) => {
                    eprintln!("{} {:#}", style("error:").red().bold(), e);
                    status = Status::Failed;
                }
            }
        }

        Ok(status)
    }
}

fn dispatch(line: &str, session: &mut Session) -> Result<Status> {
    let parsed = match ShellLine::try_parse_from(line.split_whitespace()) {
        Ok(parsed) => parsed,
        Err(e) => {
            // Help output is not an error
            let is_help = matches!(
                e.kind(),
                clap::error::ErrorKind::DisplayHelp
                    | clap::error::ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
            );
            let _ = e.print();
            return Ok(if is_help { Status::Passed } else { Status::Failed });
        }
    };

    if let Command::Shell(_) = parsed.command {
        eprintln!("{} already in a shell", style("!").yellow().bold());
        return Ok(Status::Passed);
    }
    super::run(parsed.command, session)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::tests::bundled_session;

    fn shell() -> ShellCommand {
        ShellCommand { quiet: true }
    }

    #[test]
    fn test_shell_line_parsing() {
        let parsed = ShellLine::try_parse_from("validate weapon/longsword --no-cache".split_whitespace())
            .unwrap();
        assert!(matches!(parsed.command, Command::Validate(cmd) if cmd.no_cache));

        let parsed = ShellLine::try_parse_from("metrics export --format csv".split_whitespace())
            .unwrap();
        assert!(matches!(
            parsed.command,
            Command::Metrics(crate::commands::MetricsCommand::Export {
                format: validation::ExportFormat::Csv,
                ..
            })
        ));

        assert!(ShellLine::try_parse_from("explode".split_whitespace()).is_err());
    }

    #[test]
    fn test_session_state_persists_between_lines() {
        let (mut session, _temp) = bundled_session(false);
        let input = "cache clear\nvalidate weapon/longsword\nvalidate weapon/longsword\n";

        let status = shell().run_lines(input.as_bytes(), &mut session).unwrap();

        assert_eq!(status, Status::Passed);
        let stats = session.engine().cache_stats();
        assert_eq!(stats.entries, 1);
        assert_eq!(stats.hits, 1);
    }

    #[test]
    fn test_failures_are_reported_and_shell_continues() {
        let (mut session, _temp) = bundled_session(false);
        let input = "validate weapon/missing\nnonsense\nrules --type weapon\nquit\nvalidate weapon/longsword\n";

        let status = shell().run_lines(input.as_bytes(), &mut session).unwrap();

        assert_eq!(status, Status::Failed);
    }
}
