//! TOML configuration file loading and settings resolution
//!
//! Settings are resolved in three layers: command-line arguments win over
//! the configuration file, which wins over built-in defaults.
//!
//! ```toml
//! [logging]
//! level = "debug"
//! format = "ext"
//!
//! [pipeline]
//! batch_size = 128
//! lookahead = 3
//! output = "json"
//!
//! [query]
//! stmt = 'from(bucket: "telegraf") |> range(start: -1h)'
//! org = "acme"
//! since = "1 hour ago"
//! ```

use super::args::Args;
use crate::app::pipeline::{OutputFormat, PipelineOptions};
use crate::core::logging::{LogFormat, LoggingOptions};
use serde::Deserialize;
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("The specified configuration file does not exist: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("Error reading configuration file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Error parsing configuration file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("{message}")]
    Invalid { message: String },
}

/// `[logging]` section
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingSection {
    pub level: Option<String>,
    pub format: Option<LogFormat>,
    pub file: Option<PathBuf>,
    pub color: Option<bool>,
}

/// `[pipeline]` section
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineSection {
    pub batch_size: Option<usize>,
    pub lookahead: Option<usize>,
    pub initial_capacity: Option<usize>,
    pub output: Option<OutputFormat>,
}

/// `[query]` section
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct QuerySection {
    pub stmt: Option<String>,
    pub org: Option<String>,
    pub org_id: Option<String>,
    pub since: Option<String>,
    pub until: Option<String>,
}

/// Contents of a configuration file
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub logging: LoggingSection,
    pub pipeline: PipelineSection,
    pub query: QuerySection,
}

impl FileConfig {
    /// Location checked when no configuration file is given explicitly
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("Streamring").join("streamring.toml"))
    }

    /// Read and parse one configuration file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load the explicit file, or the default one when it exists
    ///
    /// An explicitly named file must exist; a missing default file simply
    /// means there is no configuration.
    pub fn discover(explicit: Option<&Path>) -> Result<Option<Self>, ConfigError> {
        match explicit {
            Some(path) if !path.exists() => Err(ConfigError::NotFound {
                path: path.to_path_buf(),
            }),
            Some(path) => Self::load(path).map(Some),
            None => match Self::default_path() {
                Some(path) if path.exists() => Self::load(&path).map(Some),
                _ => Ok(None),
            },
        }
    }
}

/// Query descriptor inputs, before date parsing
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryOptions {
    pub stmt: String,
    pub org: String,
    pub org_id: String,
    pub since: Option<String>,
    pub until: Option<String>,
}

/// Fully resolved settings for a run
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub inputs: Vec<PathBuf>,
    pub logging: LoggingOptions,
    pub pipeline: PipelineOptions,
    pub query: Option<QueryOptions>,
}

impl Settings {
    /// Merge arguments over the configuration file over defaults
    pub fn resolve(args: &Args, file: Option<FileConfig>) -> Result<Self, ConfigError> {
        let file = file.unwrap_or_default();
        let log_defaults = LoggingOptions::default();
        let pipeline_defaults = PipelineOptions::default();

        let color = args
            .color_choice()
            .or(file.logging.color)
            .unwrap_or_else(|| std::io::stderr().is_terminal());

        let logging = LoggingOptions {
            level: args
                .log_level
                .clone()
                .or(file.logging.level)
                .unwrap_or(log_defaults.level),
            format: args
                .log_format
                .or(file.logging.format)
                .unwrap_or(log_defaults.format),
            file: args.log_file.clone().or(file.logging.file),
            color,
        };

        let batch_size = args
            .batch_size
            .or(file.pipeline.batch_size)
            .unwrap_or(pipeline_defaults.batch_size);
        if batch_size == 0 {
            return Err(ConfigError::Invalid {
                message: "batch size must be greater than 0".to_string(),
            });
        }

        let pipeline = PipelineOptions {
            batch_size,
            lookahead: args
                .lookahead
                .or(file.pipeline.lookahead)
                .unwrap_or(pipeline_defaults.lookahead),
            initial_capacity: args
                .initial_capacity
                .or(file.pipeline.initial_capacity)
                .unwrap_or(pipeline_defaults.initial_capacity),
            output: args
                .output
                .or(file.pipeline.output)
                .unwrap_or(pipeline_defaults.output),
        };

        let query = Self::resolve_query(args, file.query)?;

        Ok(Self {
            inputs: args.inputs.clone(),
            logging,
            pipeline,
            query,
        })
    }

    fn resolve_query(
        args: &Args,
        section: QuerySection,
    ) -> Result<Option<QueryOptions>, ConfigError> {
        // A statement on the command line replaces the configured query wholesale
        let (stmt, org, org_id, since, until) = match &args.query {
            Some(stmt) => (
                Some(stmt.clone()),
                args.org.clone(),
                args.org_id.clone(),
                args.since.clone(),
                args.until.clone(),
            ),
            None => (
                section.stmt,
                section.org,
                section.org_id,
                section.since,
                section.until,
            ),
        };

        let Some(stmt) = stmt else {
            if org.is_some() || org_id.is_some() || since.is_some() || until.is_some() {
                return Err(ConfigError::Invalid {
                    message: "query settings given without a query statement".to_string(),
                });
            }
            return Ok(None);
        };

        Ok(Some(QueryOptions {
            stmt,
            org: org.unwrap_or_default(),
            org_id: org_id.unwrap_or_default(),
            since,
            until,
        }))
    }
}
