//! TOML configuration layered under command-line arguments

use super::settings_from;
use std::io::Write;
use streamring::app::cli::config::ConfigError;
use streamring::app::cli::FileConfig;
use streamring::app::pipeline::OutputFormat;
use streamring::app::startup::run;
use streamring::core::logging::LogFormat;
use tempfile::NamedTempFile;

fn config_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn test_config_file_drives_pipeline() {
    let config = config_file(
        r#"
[logging]
level = "debug"
format = "ext"

[pipeline]
batch_size = 2
lookahead = 1
output = "json"
"#,
    );
    let loaded = FileConfig::discover(Some(config.path())).unwrap();

    let mut input = NamedTempFile::new().unwrap();
    writeln!(input, "first\nsecond").unwrap();
    let input_path = input.path().to_string_lossy().into_owned();

    let settings = settings_from(&[&input_path], loaded);
    assert_eq!(settings.logging.level, "debug");
    assert_eq!(settings.logging.format, LogFormat::Ext);
    assert_eq!(settings.pipeline.output, OutputFormat::Json);

    let mut out = Vec::new();
    run(&settings, &mut out).unwrap();
    let first: serde_json::Value =
        serde_json::from_str(String::from_utf8(out).unwrap().lines().next().unwrap()).unwrap();
    assert_eq!(first["record"], "first");
    assert_eq!(first["lookahead"][0], "second");
}

#[test]
fn test_arguments_override_config_file() {
    let config = config_file("[pipeline]\nbatch_size = 2\nlookahead = 1\noutput = \"json\"\n");
    let loaded = FileConfig::discover(Some(config.path())).unwrap();

    let settings = settings_from(&["--output", "text", "-k", "3"], loaded);

    assert_eq!(settings.pipeline.batch_size, 2);
    assert_eq!(settings.pipeline.lookahead, 3);
    assert_eq!(settings.pipeline.output, OutputFormat::Text);
}

#[test]
fn test_query_from_config_file() {
    let config = config_file(
        "[query]\nstmt = 'from(bucket: \"b\")'\norg = \"acme\"\norg_id = \"7\"\nsince = \"1 day ago\"\n",
    );
    let loaded = FileConfig::discover(Some(config.path())).unwrap();

    let settings = settings_from(&[], loaded);
    let query = settings.query.expect("query should be configured");

    assert_eq!(query.stmt, "from(bucket: \"b\")");
    assert_eq!(query.org_id, "7");
    assert_eq!(query.since.as_deref(), Some("1 day ago"));
}

#[test]
fn test_malformed_config_reports_path() {
    let config = config_file("[pipeline\nbatch_size = 2\n");

    match FileConfig::discover(Some(config.path())) {
        Err(err @ ConfigError::Parse { .. }) => {
            assert!(err
                .to_string()
                .contains(&config.path().display().to_string()));
        }
        other => panic!("Expected Parse error, got {:?}", other),
    }
}
