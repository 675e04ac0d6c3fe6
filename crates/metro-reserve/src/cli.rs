//! CLI argument parsing with clap

use camino::Utf8PathBuf;
use clap::{Args, Parser, Subcommand};
use metro_reserve_core::types::HumanDuration;

/// metro-reserve - book a metro station entry slot, retrying until one is granted
#[derive(Parser, Debug)]
#[command(name = "metro-reserve")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to config file (default: ~/.metro-reserve/config.yaml)
    #[arg(short, long, global = true)]
    pub config: Option<Utf8PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Book an entry slot
    Book(BookArgs),

    /// Configuration management
    #[command(subcommand)]
    Config(ConfigCommands),

    /// Show version information
    Version(VersionArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// Book command
#[derive(Args, Debug, Default)]
pub struct BookArgs {
    /// Authorization token for the reservation service
    #[arg(short, long, env = "METRO_RESERVE_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Keep retrying for --loop-duration instead of --max-retry attempts
    #[arg(short = 'p', long = "loop")]
    pub loop_mode: bool,

    /// Wait between attempts (e.g. 500ms, 1s)
    #[arg(short, long, value_name = "DURATION")]
    pub sleep: Option<HumanDuration>,

    /// Maximum number of attempts
    #[arg(short = 'r', long, value_name = "N")]
    pub max_retry: Option<u32>,

    /// Total time budget in loop mode (e.g. 2m)
    #[arg(short = 'd', long, value_name = "DURATION")]
    pub loop_duration: Option<HumanDuration>,

    /// Per-attempt request timeout
    #[arg(short = 'o', long, value_name = "DURATION")]
    pub timeout: Option<HumanDuration>,

    /// Metro line name
    #[arg(short = 'L', long)]
    pub line: Option<String>,

    /// Station name
    #[arg(short = 'n', long)]
    pub station: Option<String>,

    /// Entry time slot (e.g. 0820-0830)
    #[arg(short = 'l', long)]
    pub time_slot: Option<String>,

    /// Snapshot time slot (e.g. 0630-0930)
    #[arg(long)]
    pub snapshot_time_slot: Option<String>,

    /// Days from today to book (1 = tomorrow)
    #[arg(long, conflicts_with = "date")]
    pub date_offset: Option<u32>,

    /// Explicit entry date (YYYYMMDD)
    #[arg(long)]
    pub date: Option<String>,

    /// Reservation endpoint URL
    #[arg(long)]
    pub endpoint: Option<String>,

    /// Add up to 25% random jitter to each wait
    #[arg(long)]
    pub jitter: bool,

    /// Exit with status 2 when no slot was booked
    #[arg(long)]
    pub strict: bool,

    /// Output the result as JSON
    #[arg(long)]
    pub json: bool,
}

// Config commands
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show resolved configuration
    Show(ConfigShowArgs),

    /// Write a default config file
    Init(ConfigInitArgs),
}

#[derive(Args, Debug)]
pub struct ConfigShowArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct ConfigInitArgs {
    /// Overwrite existing file
    #[arg(short, long)]
    pub force: bool,
}

// Version command
#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: clap_complete::Shell,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use std::time::Duration;

    fn book(args: &[&str]) -> BookArgs {
        let argv = ["metro-reserve", "book"].iter().chain(args.iter());
        match Cli::try_parse_from(argv).unwrap().command {
            Commands::Book(args) => args,
            other => panic!("expected book, got {:?}", other),
        }
    }

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_book_short_flags() {
        let args = book(&[
            "-t", "tok", "-p", "-s", "500ms", "-r", "3", "-d", "90s", "-o", "5s", "-L", "13号线",
            "-n", "回龙观站", "-l", "0730-0740",
        ]);

        assert_eq!(args.token.as_deref(), Some("tok"));
        assert!(args.loop_mode);
        assert_eq!(args.sleep.unwrap().as_duration(), Duration::from_millis(500));
        assert_eq!(args.max_retry, Some(3));
        assert_eq!(args.loop_duration.unwrap().as_duration(), Duration::from_secs(90));
        assert_eq!(args.timeout.unwrap().as_duration(), Duration::from_secs(5));
        assert_eq!(args.line.as_deref(), Some("13号线"));
        assert_eq!(args.station.as_deref(), Some("回龙观站"));
        assert_eq!(args.time_slot.as_deref(), Some("0730-0740"));
    }

    #[test]
    fn test_book_long_flags() {
        let args = book(&[
            "--token",
            "tok",
            "--max-retry",
            "7",
            "--date",
            "20250301",
            "--snapshot-time-slot",
            "0700-0900",
            "--endpoint",
            "http://localhost:8080/x",
            "--jitter",
            "--strict",
            "--json",
        ]);

        assert!(!args.loop_mode);
        assert_eq!(args.max_retry, Some(7));
        assert_eq!(args.date.as_deref(), Some("20250301"));
        assert_eq!(args.snapshot_time_slot.as_deref(), Some("0700-0900"));
        assert_eq!(args.endpoint.as_deref(), Some("http://localhost:8080/x"));
        assert!(args.jitter && args.strict && args.json);
    }

    #[test]
    fn test_bare_seconds_duration() {
        let args = book(&["--sleep", "2"]);
        assert_eq!(args.sleep.unwrap().as_duration(), Duration::from_secs(2));
    }

    #[test]
    fn test_rejects_bad_duration() {
        let result = Cli::try_parse_from(["metro-reserve", "book", "--sleep", "soon"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_date_conflicts_with_offset() {
        let result = Cli::try_parse_from([
            "metro-reserve",
            "book",
            "--date",
            "20250301",
            "--date-offset",
            "2",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli =
            Cli::try_parse_from(["metro-reserve", "config", "show", "-vv", "-c", "/tmp/c.yaml"])
                .unwrap();

        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.config.as_deref().map(|p| p.as_str()), Some("/tmp/c.yaml"));
        assert!(matches!(cli.command, Commands::Config(ConfigCommands::Show(_))));
    }

    #[test]
    fn test_completions_shell() {
        let cli = Cli::try_parse_from(["metro-reserve", "completions", "bash"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Completions(CompletionsArgs {
                shell: clap_complete::Shell::Bash
            })
        ));
    }
}
