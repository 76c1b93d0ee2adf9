//! CLI argument parsing using clap derive API
//!
//! This module defines the command-line interface structure using clap's derive macros.
//! It is purely declarative with no side effects or I/O.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand, ValueEnum};

use logsift_core::types::{LogSource, SeverityLabel};

/// logsift -- merge Box and syslog device logs into one searchable timeline.
///
/// Use `logsift <COMMAND> --help` for subcommand details.
#[derive(Parser, Debug)]
#[command(name = "logsift", version, about, long_about = None)]
pub struct Cli {
    /// Path to the logsift.toml configuration file.
    #[arg(short, long, default_value = "logsift.toml")]
    pub config: PathBuf,

    /// Override log level (trace, debug, info, warn, error).
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Output format.
    #[arg(long, global = true, default_value = "text")]
    pub output: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Supported output formats.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table / text output.
    Text,
    /// Machine-readable JSON.
    Json,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Load a batch of log files and print the filtered, time-ordered view.
    View(ViewArgs),

    /// Show which parser each file name is routed to.
    Classify(ClassifyArgs),

    /// Manage configuration.
    Config(ConfigArgs),
}

// ---- view ----

/// Load, merge and filter a batch of log files.
#[derive(Args, Debug)]
pub struct ViewArgs {
    /// Log files or directories (directories are expanded one level deep).
    #[arg(required = true)]
    pub paths: Vec<PathBuf>,

    /// Search query. Terms are separated by commas or whitespace; quote phrases.
    #[arg(short, long)]
    pub query: Option<String>,

    /// Hide non-matching records instead of highlighting matches.
    #[arg(long)]
    pub only_matching: bool,

    /// Restrict to a source (repeatable: box, syslog, dmesg).
    #[arg(long = "source", value_parser = parse_source)]
    pub sources: Vec<LogSource>,

    /// Restrict to a severity (repeatable: error, warning, info, debug).
    #[arg(long = "severity", value_parser = parse_severity)]
    pub severities: Vec<SeverityLabel>,

    /// Inclusive lower bound (RFC 3339).
    #[arg(long, value_parser = parse_instant)]
    pub from: Option<DateTime<Utc>>,

    /// Inclusive upper bound (RFC 3339).
    #[arg(long, value_parser = parse_instant)]
    pub to: Option<DateTime<Utc>>,

    /// Print schema validation diagnostics collected while parsing.
    #[arg(long)]
    pub show_errors: bool,
}

// ---- classify ----

/// Classify files by name without reading them.
#[derive(Args, Debug)]
pub struct ClassifyArgs {
    /// File names, paths or directories.
    #[arg(required = true)]
    pub paths: Vec<PathBuf>,
}

// ---- config ----

/// Manage logsift configuration.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Validate the configuration file and report errors.
    Validate,
    /// Show the effective configuration (file + env overrides + defaults).
    Show {
        /// Show only a specific section (general, ingest, search).
        #[arg(long)]
        section: Option<String>,
    },
}

fn parse_source(s: &str) -> Result<LogSource, String> {
    LogSource::from_str_loose(s)
        .ok_or_else(|| format!("unknown source '{s}' (expected: box, syslog, dmesg)"))
}

fn parse_severity(s: &str) -> Result<SeverityLabel, String> {
    SeverityLabel::from_str_loose(s).ok_or_else(|| {
        format!("unknown severity '{s}' (expected: error, warning, info, debug)")
    })
}

fn parse_instant(s: &str) -> Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| format!("invalid RFC 3339 timestamp '{s}': {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use clap::CommandFactory;

    #[test]
    fn test_cli_parse_view_defaults() {
        let cli = Cli::try_parse_from(["logsift", "view", "box.log"]).expect("parse succeeded");
        assert_eq!(cli.config, PathBuf::from("logsift.toml"));
        assert!(matches!(cli.output, OutputFormat::Text));
        match cli.command {
            Commands::View(args) => {
                assert_eq!(args.paths, vec![PathBuf::from("box.log")]);
                assert!(args.query.is_none());
                assert!(!args.only_matching, "only_matching should default to false");
                assert!(args.sources.is_empty());
                assert!(args.severities.is_empty());
                assert!(args.from.is_none() && args.to.is_none());
                assert!(!args.show_errors);
            }
            _ => panic!("expected View command"),
        }
    }

    #[test]
    fn test_cli_parse_view_requires_paths() {
        let result = Cli::try_parse_from(["logsift", "view"]);
        assert!(result.is_err(), "view without paths should fail");
    }

    #[test]
    fn test_cli_parse_view_filters() {
        let cli = Cli::try_parse_from([
            "logsift",
            "view",
            "logs/",
            "--query",
            r#"wifi, "scan result""#,
            "--only-matching",
            "--source",
            "syslog",
            "--source",
            "BOX",
            "--severity",
            "warn",
            "--severity",
            "debug",
            "--from",
            "2025-03-13T07:00:00Z",
            "--to",
            "2025-03-13T09:00:00+02:00",
            "--show-errors",
        ])
        .expect("parse succeeded");

        match cli.command {
            Commands::View(args) => {
                assert_eq!(args.query.as_deref(), Some(r#"wifi, "scan result""#));
                assert!(args.only_matching);
                assert_eq!(args.sources, vec![LogSource::Syslog, LogSource::Box]);
                assert_eq!(
                    args.severities,
                    vec![SeverityLabel::Warning, SeverityLabel::Debug]
                );
                assert_eq!(
                    args.from,
                    Utc.with_ymd_and_hms(2025, 3, 13, 7, 0, 0).single()
                );
                // 09:00+02:00 == 07:00Z
                assert_eq!(args.to, Utc.with_ymd_and_hms(2025, 3, 13, 7, 0, 0).single());
                assert!(args.show_errors);
            }
            _ => panic!("expected View command"),
        }
    }

    #[test]
    fn test_cli_parse_view_rejects_unknown_source() {
        let result = Cli::try_parse_from(["logsift", "view", "a", "--source", "kernel"]);
        assert!(result.is_err(), "unknown source should be rejected");
    }

    #[test]
    fn test_cli_parse_view_rejects_bad_timestamp() {
        let result = Cli::try_parse_from(["logsift", "view", "a", "--from", "yesterday"]);
        assert!(result.is_err(), "non RFC 3339 timestamp should be rejected");
    }

    #[test]
    fn test_cli_parse_classify_multiple() {
        let cli = Cli::try_parse_from(["logsift", "classify", "box.log", "syslog_box.txt"])
            .expect("parse succeeded");
        match cli.command {
            Commands::Classify(args) => assert_eq!(args.paths.len(), 2),
            _ => panic!("expected Classify command"),
        }
    }

    #[test]
    fn test_cli_parse_config_validate() {
        let cli = Cli::try_parse_from(["logsift", "config", "validate"]).expect("parse succeeded");
        match cli.command {
            Commands::Config(config_args) => {
                assert!(matches!(config_args.action, ConfigAction::Validate));
            }
            _ => panic!("expected Config command"),
        }
    }

    #[test]
    fn test_cli_parse_config_show_section() {
        let cli = Cli::try_parse_from(["logsift", "config", "show", "--section", "ingest"])
            .expect("parse succeeded");
        match cli.command {
            Commands::Config(config_args) => match config_args.action {
                ConfigAction::Show { section } => {
                    assert_eq!(section.as_deref(), Some("ingest"));
                }
                _ => panic!("expected Show action"),
            },
            _ => panic!("expected Config command"),
        }
    }

    #[test]
    fn test_cli_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "logsift",
            "-c",
            "/etc/logsift.toml",
            "classify",
            "x",
            "--output",
            "json",
            "--log-level",
            "debug",
        ])
        .expect("parse succeeded");
        assert_eq!(cli.config, PathBuf::from("/etc/logsift.toml"));
        assert!(matches!(cli.output, OutputFormat::Json));
        assert_eq!(cli.log_level.as_deref(), Some("debug"));
    }

    #[test]
    fn test_cli_parse_invalid_output_format() {
        let result = Cli::try_parse_from(["logsift", "--output", "yaml", "classify", "x"]);
        assert!(result.is_err(), "invalid output format should fail");
    }

    #[test]
    fn test_cli_debug_assert() {
        Cli::command().debug_assert();
    }
}
