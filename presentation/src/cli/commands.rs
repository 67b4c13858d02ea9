//! CLI command definitions

use clap::{Parser, Subcommand};
use sleep_domain::SleepQuality;
use std::path::PathBuf;

/// One-shot actions; without one the interactive tracker starts
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Open the interactive tracker (default)
    Repl,
    /// Start tracking tonight's sleep
    Start,
    /// Stop tracking tonight's sleep
    Stop,
    /// Delete the whole sleep history
    Clear,
    /// Print the sleep history
    History,
    /// Rate the most recently finished night (0 = very bad … 5 = excellent)
    Rate {
        #[arg(value_parser = parse_rating)]
        quality: SleepQuality,
    },
}

/// CLI arguments for sleep-tracker
#[derive(Parser, Debug)]
#[command(name = "sleep-tracker")]
#[command(author, version, about = "Track your sleep from the terminal")]
#[command(long_about = r#"
sleep-tracker records when you go to bed, when you get up, and how well you slept.

Run without a subcommand for the interactive tracker, or use one of the
one-shot subcommands from scripts.

Configuration files are loaded from (in priority order):
1. --config <path>            Explicit config file
2. ./sleep-tracker.toml       Project-level config
3. SLEEP_TRACKER_* variables  Environment
4. ~/.config/sleep-tracker/config.toml   Global config

Example:
  sleep-tracker start
  sleep-tracker stop
  sleep-tracker rate 4
  sleep-tracker --memory
"#)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Path of the JSON store file (overrides config)
    #[arg(long, value_name = "PATH", conflicts_with = "memory")]
    pub store: Option<PathBuf>,

    /// Keep nights in memory only (nothing is saved)
    #[arg(long)]
    pub memory: bool,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Write logs to this file instead of stderr
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,
}

/// Parse a user-facing rating; "unrated" is not something a user can pick.
pub fn parse_rating(s: &str) -> Result<SleepQuality, String> {
    let quality: SleepQuality = s.parse().map_err(|_| format!("'{}' is not a rating from 0 to 5", s))?;
    if !quality.is_rated() {
        return Err(format!("'{}' is not a rating from 0 to 5", s));
    }
    Ok(quality)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_rating() {
        assert_eq!(parse_rating("0").unwrap(), SleepQuality::VeryBad);
        assert_eq!(parse_rating("5").unwrap(), SleepQuality::Excellent);
        assert!(parse_rating("-1").is_err());
        assert!(parse_rating("6").is_err());
        assert!(parse_rating("good").is_err());
    }

    #[test]
    fn test_parse_subcommands() {
        let cli = Cli::try_parse_from(["sleep-tracker", "-vv", "rate", "4"]).unwrap();
        assert_eq!(cli.verbose, 2);
        assert!(matches!(
            cli.command,
            Some(Command::Rate {
                quality: SleepQuality::PrettyGood
            })
        ));

        let cli = Cli::try_parse_from(["sleep-tracker", "--memory"]).unwrap();
        assert!(cli.memory);
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_store_conflicts_with_memory() {
        let result = Cli::try_parse_from(["sleep-tracker", "--memory", "--store", "x.json"]);
        assert!(result.is_err());
    }
}
