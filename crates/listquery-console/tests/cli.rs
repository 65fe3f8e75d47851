//! End-to-end runs of the `lq` command line against files on disk.

use std::fs;
use std::path::Path;

use clap::Parser;
use listquery_console::{run, Cli, ConsoleError};
use serde_json::{json, Value as Json};
use tempfile::TempDir;

const VIEW: &str = r#"
name: incidents
description: Production incidents
search: [title, service]
facets:
  severity: severity
  service: service
sorts:
  opened_at: { path: opened_at, kind: timestamp }
  title: { path: title, kind: text }
default_sort: opened_at:desc
page_sizes: [2, 5]
default_page_size: 2
columns:
  - { name: id, field: id }
  - { name: title, field: title }
  - { name: severity, field: severity }
"#;

fn fixture() -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("view.yaml"), VIEW).unwrap();
    let records = json!({
        "items": [
            {"id": "i1", "title": "DB failover", "service": "db", "severity": "sev1", "opened_at": "2024-05-01T08:00:00Z"},
            {"id": "i2", "title": "Slow checkout", "service": "api", "severity": "sev2", "opened_at": "2024-05-03T08:00:00Z"},
            {"id": "i3", "title": "Cache misses", "service": "cache", "severity": "sev3", "opened_at": "2024-05-02T08:00:00Z"},
            {"id": "i4", "title": "DB disk full", "service": "db", "severity": "sev2", "opened_at": "2024-05-04T08:00:00Z"},
            {"id": "i5", "title": "checkout 500s", "service": "api", "severity": "sev1"}
        ]
    });
    fs::write(dir.path().join("records.json"), records.to_string()).unwrap();
    dir
}

fn lq(dir: &Path, args: &[&str]) -> Result<String, ConsoleError> {
    let view = dir.join("view.yaml");
    let input = dir.join("records.json");
    let mut argv = vec![
        "lq".to_string(),
        "--view-file".to_string(),
        view.display().to_string(),
        "--input".to_string(),
        input.display().to_string(),
    ];
    argv.extend(args.iter().map(|a| a.to_string()));
    run(Cli::try_parse_from(argv).unwrap())
}

fn json_ids(output: &str) -> Vec<String> {
    let report: Json = serde_json::from_str(output).unwrap();
    report["records"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["id"].as_str().unwrap().to_string())
        .collect()
}

#[test]
fn default_page_uses_view_defaults() {
    let dir = fixture();
    let out = lq(dir.path(), &["--output", "json"]).unwrap();
    assert_eq!(json_ids(&out), vec!["i4", "i2"]);

    let report: Json = serde_json::from_str(&out).unwrap();
    assert_eq!(report["view"], "incidents");
    assert_eq!(report["total"], 5);
    assert_eq!(report["page"]["total_pages"], 3);
    assert_eq!(report["page"]["has_next"], true);
}

#[test]
fn search_facets_and_sort_compose() {
    let dir = fixture();
    let out = lq(
        dir.path(),
        &[
            "--search", "CHECKOUT", "--facet", "severity=sev1", "--facet", "severity=sev2",
            "--sort", "title", "--page-size", "5", "--output", "json",
        ],
    )
    .unwrap();
    assert_eq!(json_ids(&out), vec!["i5", "i2"]);

    let report: Json = serde_json::from_str(&out).unwrap();
    assert_eq!(report["facet_counts"]["severity"]["sev1"], 1);
    assert_eq!(report["facet_counts"]["severity"]["sev2"], 1);
    assert_eq!(report["facet_counts"]["service"]["api"], 2);
}

#[test]
fn page_past_end_is_empty_not_an_error() {
    let dir = fixture();
    let out = lq(dir.path(), &["--page", "9999", "--output", "json"]).unwrap();
    assert!(json_ids(&out).is_empty());
    let report: Json = serde_json::from_str(&out).unwrap();
    assert_eq!(report["total"], 5);
}

#[test]
fn disallowed_page_size_falls_back() {
    let dir = fixture();
    let out = lq(dir.path(), &["--page-size", "7", "--output", "json"]).unwrap();
    let report: Json = serde_json::from_str(&out).unwrap();
    assert_eq!(report["page"]["page_size"], 2);
    assert_eq!(json_ids(&out).len(), 2);
}

#[test]
fn csv_output_follows_columns() {
    let dir = fixture();
    let out = lq(dir.path(), &["--facet", "service=db", "--output", "csv"]).unwrap();
    insta::assert_snapshot!(out.trim_end(), @r"
    id,title,severity
    i4,DB disk full,sev2
    i1,DB failover,sev1
    ");
}

#[test]
fn text_output_shows_pager_and_chips() {
    let dir = fixture();
    let out = lq(dir.path(), &["--facet", "service=api", "--output", "text"]).unwrap();
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines[0], "ID  TITLE          SEVERITY");
    assert_eq!(lines[1], "i2  Slow checkout  sev2");
    assert_eq!(lines[2], "i5  checkout 500s  sev1");
    assert!(lines.contains(&"Showing 1-2 of 2 (page 1 of 1)"));
    assert!(lines.contains(&"service: [api] 2, cache 1, db 2"));
    assert!(lines.contains(&"severity: sev1 1, sev2 1"));
}

#[test]
fn saved_state_is_restored_then_overridden() {
    let dir = fixture();
    let state = json!({
        "search_text": "db",
        "sort": {"key": "title", "dir": "desc"},
        "page": 1,
        "page_size": 5
    });
    let state_path = dir.path().join("state.json");
    fs::write(&state_path, state.to_string()).unwrap();

    let state_arg = state_path.display().to_string();
    let out = lq(dir.path(), &["--state", state_arg.as_str(), "--output", "json"]).unwrap();
    assert_eq!(json_ids(&out), vec!["i1", "i4"]);

    let out = lq(
        dir.path(),
        &["--state", state_arg.as_str(), "--sort", "title:asc", "--output", "json"],
    )
    .unwrap();
    assert_eq!(json_ids(&out), vec!["i4", "i1"]);
}

#[test]
fn wiring_errors_are_reported() {
    let dir = fixture();
    let err = lq(dir.path(), &["--sort", "priority"]).unwrap_err();
    assert_eq!(err.to_string(), "unknown sort key 'priority'");

    let err = lq(dir.path(), &["--facet", "team=core"]).unwrap_err();
    assert!(matches!(err, ConsoleError::Config(_)));
}

#[test]
fn builtin_view_by_name() {
    let dir = fixture();
    let input = dir.path().join("tickets.json");
    fs::write(
        &input,
        json!([
            {"id": 7, "title": "Card declined", "status": "open", "created_at": "2024-01-01"},
            {"id": 8, "title": "Address change", "status": "closed", "created_at": "2024-01-02"}
        ])
        .to_string(),
    )
    .unwrap();

    let input_arg = input.display().to_string();
    let cli = Cli::try_parse_from([
        "lq", "--view", "tickets", "--input", input_arg.as_str(), "--facet", "status=open", "-o", "json",
    ])
    .unwrap();
    let out = run(cli).unwrap();
    let report: Json = serde_json::from_str(&out).unwrap();
    assert_eq!(report["total"], 1);
    assert_eq!(report["records"][0]["id"], 7);
}

#[test]
fn unreadable_input_names_the_path() {
    let dir = fixture();
    let missing = dir.path().join("nope.json");
    let missing_arg = missing.display().to_string();
    let cli =
        Cli::try_parse_from(["lq", "--view", "tickets", "--input", missing_arg.as_str()]).unwrap();
    let err = run(cli).unwrap_err();
    assert!(matches!(err, ConsoleError::Io { .. }));
    assert!(err.to_string().contains("nope.json"));
}
