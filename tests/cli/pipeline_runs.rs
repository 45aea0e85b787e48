//! End-to-end pipeline runs over input files

use super::settings_from;
use std::io::Write;
use std::path::Path;
use streamring::app::error::AppError;
use streamring::app::startup::run;
use tempfile::{NamedTempFile, TempDir};

fn input_file(dir: &TempDir, name: &str, lines: &[&str]) -> String {
    let path = dir.path().join(name);
    let mut file = std::fs::File::create(&path).unwrap();
    for line in lines {
        writeln!(file, "{}", line).unwrap();
    }
    path_str(&path)
}

fn path_str(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

fn run_to_string(argv: &[&str]) -> String {
    let settings = settings_from(argv, None);
    let mut out = Vec::new();
    run(&settings, &mut out).expect("pipeline should succeed");
    String::from_utf8(out).unwrap()
}

#[test]
fn test_text_run_over_single_file() {
    let dir = TempDir::new().unwrap();
    let input = input_file(&dir, "events.log", &["boot", "login", "logout"]);

    let output = run_to_string(&["--lookahead", "1", "--batch-size", "2", &input]);

    assert_eq!(
        output,
        "1: boot | login\n\
         2: login | logout\n\
         3: logout\n\
         # 3 records, 3 windows, 2 batches, peak capacity 4\n"
    );
}

#[test]
fn test_lookahead_crosses_file_boundaries() {
    let dir = TempDir::new().unwrap();
    let first = input_file(&dir, "a.log", &["a1", "a2"]);
    let second = input_file(&dir, "b.log", &["b1", "b2"]);

    let output = run_to_string(&["-k", "2", "-b", "1", &first, &second]);
    let windows: Vec<&str> = output.lines().take(4).collect();

    assert_eq!(
        windows,
        vec!["1: a1 | a2 | b1", "2: a2 | b1 | b2", "3: b1 | b2", "4: b2"]
    );
}

#[test]
fn test_json_run_with_query_summary() {
    let dir = TempDir::new().unwrap();
    let input = input_file(&dir, "metrics.log", &["cpu=1", "cpu=2"]);

    let output = run_to_string(&[
        "--output",
        "json",
        "-q",
        "from(bucket: \"telegraf\")",
        "--org",
        "acme",
        "--org-id",
        "0001",
        "--since",
        "2024-01-01",
        "--until",
        "2024-01-02",
        &input,
    ]);

    let lines: Vec<serde_json::Value> = output
        .lines()
        .map(|line| serde_json::from_str(line).expect("each line is JSON"))
        .collect();

    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0]["record"], "cpu=1");
    assert_eq!(lines[0]["lookahead"][0], "cpu=2");
    assert_eq!(lines[1]["lookahead"].as_array().unwrap().len(), 0);

    let summary = &lines[2];
    assert_eq!(summary["summary"]["records"], 2);
    assert_eq!(summary["query"]["org"], "acme");
    assert_eq!(summary["query"]["start"], 1_704_067_200u64);
    assert_eq!(summary["query"]["stop"], 1_704_153_600u64);
}

#[test]
fn test_large_input_keeps_queue_small() {
    let mut file = NamedTempFile::new().unwrap();
    for i in 0..5_000 {
        writeln!(file, "record-{i}").unwrap();
    }
    let input = path_str(file.path());

    let settings = settings_from(&["-b", "32", "-k", "8", &input], None);
    let mut out = Vec::new();
    let stats = run(&settings, &mut out).unwrap();

    assert_eq!(stats.records, 5_000);
    assert_eq!(stats.windows, 5_000);
    assert!(stats.peak_capacity <= 64, "peak {}", stats.peak_capacity);
    assert!(String::from_utf8(out)
        .unwrap()
        .starts_with("1: record-0 | record-1"));
}

#[test]
fn test_missing_input_fails_before_output() {
    let dir = TempDir::new().unwrap();
    let missing = path_str(&dir.path().join("missing.log"));

    let settings = settings_from(&[&missing], None);
    let mut out = Vec::new();
    let result = run(&settings, &mut out);

    assert!(matches!(result, Err(AppError::Input { .. })));
    assert!(out.is_empty());
}

#[test]
fn test_invalid_since_is_reported() {
    let dir = TempDir::new().unwrap();
    let input = input_file(&dir, "x.log", &["x"]);

    let settings = settings_from(&["-q", "stmt", "--since", "someday", &input], None);
    let mut out = Vec::new();

    assert!(matches!(
        run(&settings, &mut out),
        Err(AppError::InvalidDate { flag: "--since", .. })
    ));
}
