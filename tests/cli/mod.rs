//! CLI Integration Test Modules

pub mod pipeline_runs;
pub mod toml_config;

use clap::Parser;
use streamring::app::cli::{Args, FileConfig, Settings};

/// Parse arguments the way the binary does and resolve them without
/// touching the user's default configuration file
pub fn settings_from(argv: &[&str], config: Option<FileConfig>) -> Settings {
    let mut full = vec!["streamring", "--no-color"];
    full.extend_from_slice(argv);
    let args = Args::try_parse_from(full).expect("arguments should parse");
    Settings::resolve(&args, config).expect("settings should resolve")
}
