//! Command-line arguments
//!
//! Every option is optional here; unset values fall back to the configuration
//! file and then to built-in defaults when settings are resolved.

use crate::app::pipeline::OutputFormat;
use crate::core::logging::LogFormat;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug, Clone, Default, PartialEq)]
#[command(name = "streamring")]
#[command(about = "Stream records through a lookahead ring buffer")]
#[command(version, long_version = crate::core::version::long_version())]
pub struct Args {
    /// Input files, read in order (stdin when none are given)
    #[arg(value_name = "FILES")]
    pub inputs: Vec<PathBuf>,

    /// Configuration file path
    #[arg(short = 'c', long = "config-file", value_name = "FILE")]
    pub config_file: Option<PathBuf>,

    /// Log level
    #[arg(short = 'l', long = "log-level", value_name = "LEVEL", value_parser = ["trace", "debug", "info", "warn", "error", "off"])]
    pub log_level: Option<String>,

    /// Log output format
    #[arg(short = 'o', long = "log-format", value_name = "FORMAT", value_enum)]
    pub log_format: Option<LogFormat>,

    /// Log file path
    #[arg(short = 'f', long = "log-file", value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    /// Force colored log output
    #[arg(long = "color", conflicts_with = "no_color")]
    pub color: bool,

    /// Disable colored log output
    #[arg(long = "no-color")]
    pub no_color: bool,

    /// Records pulled from the input per refill
    #[arg(short = 'b', long = "batch-size", value_name = "N")]
    pub batch_size: Option<usize>,

    /// Records shown after each record
    #[arg(short = 'k', long = "lookahead", value_name = "N")]
    pub lookahead: Option<usize>,

    /// Queue slots reserved up front
    #[arg(long = "initial-capacity", value_name = "N")]
    pub initial_capacity: Option<usize>,

    /// Window output format
    #[arg(long = "output", value_name = "FORMAT", value_enum)]
    pub output: Option<OutputFormat>,

    /// Query statement describing the input stream
    #[arg(short = 'q', long = "query", value_name = "STMT")]
    pub query: Option<String>,

    /// Organization name for the query
    #[arg(long = "org", value_name = "NAME", requires = "query")]
    pub org: Option<String>,

    /// Organization id for the query
    #[arg(long = "org-id", value_name = "ID", requires = "query")]
    pub org_id: Option<String>,

    /// Start of the query time range (ISO 8601 or relative)
    #[arg(
        short = 'S',
        long = "since",
        value_name = "DATE_TIME",
        requires = "query",
        help = "Start date/time (YYYY-MM-DD, past: 'yesterday', '1 week ago', or future: 'in 2 days')"
    )]
    pub since: Option<String>,

    /// End of the query time range (ISO 8601 or relative)
    #[arg(
        short = 'U',
        long = "until",
        value_name = "DATE_TIME",
        requires = "query",
        help = "End date/time (YYYY-MM-DD, past: 'today', '1 hour ago', or future: '2 hours from now')"
    )]
    pub until: Option<String>,
}

impl Args {
    /// Explicit color choice, `None` when neither flag was given
    pub fn color_choice(&self) -> Option<bool> {
        match (self.color, self.no_color) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        }
    }
}
