// src/cli.rs

//! CLI argument parsing using `clap`.

use chrono::NaiveDate;
use clap::{Parser, ValueEnum};

use crate::access::Role;
use crate::engine::SessionOptions;
use crate::types::OutputFormat;

/// Command-line arguments for `princess`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "princess",
    version,
    about = "Compute a project timeline from a stage catalog and date overrides.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the catalog file (TOML).
    ///
    /// Default: `Princess.toml` in the current working directory.
    #[arg(long, value_name = "PATH", default_value = "Princess.toml")]
    pub config: String,

    /// Project start date (YYYY-MM-DD); replaces `[project].start_date`.
    #[arg(long, value_name = "DATE")]
    pub start_date: Option<NaiveDate>,

    /// Single pass in catalog order without validation.
    ///
    /// Unknown or out-of-order dependencies fall back to sequential
    /// placement instead of failing.
    #[arg(long)]
    pub lenient: bool,

    /// Output format.
    #[arg(long, value_enum, value_name = "FORMAT", default_value = "table")]
    pub format: OutputFormat,

    /// Whose view of the timeline to print. Clients only see deliverables.
    #[arg(long, value_enum, value_name = "ROLE", default_value = "agency")]
    pub role: Role,

    /// Keep running and recompute whenever the catalog file changes.
    #[arg(long)]
    pub watch: bool,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `PRINCESS_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Parse + validate, print the catalog, but don't compute a schedule.
    #[arg(long)]
    pub dry_run: bool,
}

impl CliArgs {
    pub fn session_options(&self) -> SessionOptions {
        SessionOptions {
            role: self.role,
            format: self.format,
            lenient: self.lenient,
            start_date: self.start_date,
        }
    }
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn as_directive(self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let args = CliArgs::try_parse_from(["princess"]).unwrap();
        assert_eq!(args.config, "Princess.toml");
        assert_eq!(args.format, OutputFormat::Table);
        assert_eq!(args.role, Role::Agency);
        assert!(!args.watch && !args.lenient && !args.dry_run);
    }

    #[test]
    fn parses_dates_roles_and_formats() {
        let args = CliArgs::try_parse_from([
            "princess",
            "--start-date",
            "2025-03-01",
            "--role",
            "client",
            "--format",
            "json",
            "--lenient",
        ])
        .unwrap();

        let options = args.session_options();
        assert_eq!(options.start_date, NaiveDate::from_ymd_opt(2025, 3, 1));
        assert_eq!(options.role, Role::Client);
        assert_eq!(options.format, OutputFormat::Json);
        assert!(options.lenient);

        assert!(CliArgs::try_parse_from(["princess", "--start-date", "March"]).is_err());
    }
}
