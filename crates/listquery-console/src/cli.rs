//! The `lq` command line.
//!
//! ```text
//! lq --view tickets --input tickets.json --search payment --facet status=open
//! lq --view-file views/custom.yaml --input export.json --sort created_at:desc --output csv
//! lq views
//! ```

use std::io::Read;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use listquery::{QueryDescriptor, SortSpec};
use serde_json::Value as Json;

use crate::error::{ConsoleError, Result};
use crate::output::{render, OutputMode};
use crate::presets;
use crate::view::ViewSpec;

/// Keys under which list endpoints commonly wrap their records.
const WRAPPER_KEYS: [&str; 3] = ["data", "items", "results"];

#[derive(Debug, Parser)]
#[command(
    name = "lq",
    version,
    about = "Search, filter, sort and page JSON record lists",
    args_conflicts_with_subcommands = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    #[command(flatten)]
    pub query: QueryArgs,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List the built-in views
    Views,
}

#[derive(Debug, Default, Args)]
pub struct QueryArgs {
    /// Built-in view to use (see `lq views`)
    #[arg(long, conflicts_with = "view_file")]
    pub view: Option<String>,

    /// View definition file (.yaml or .json)
    #[arg(long, value_name = "PATH")]
    pub view_file: Option<PathBuf>,

    /// JSON records to query; reads stdin when omitted or `-`
    #[arg(long, short, value_name = "FILE")]
    pub input: Option<PathBuf>,

    /// Saved query state (JSON) to start from
    #[arg(long, value_name = "FILE")]
    pub state: Option<PathBuf>,

    /// Free-text search, case-insensitive
    #[arg(long, short)]
    pub search: Option<String>,

    /// Facet filter, repeatable; values of one facet are OR-ed
    #[arg(long = "facet", short = 'f', value_name = "KEY=VALUE", value_parser = parse_facet)]
    pub facets: Vec<(String, String)>,

    /// Sort key, optionally with direction: `key`, `key:asc`, `key:desc`
    #[arg(long, value_name = "KEY[:DIR]")]
    pub sort: Option<SortSpec>,

    /// Page to show, 1-based
    #[arg(long, short)]
    pub page: Option<usize>,

    /// Records per page; falls back to the view default if not allowed
    #[arg(long)]
    pub page_size: Option<usize>,

    /// Output format
    #[arg(long, short, value_enum, default_value_t = OutputMode::Auto)]
    pub output: OutputMode,
}

/// Parses a `key=value` facet filter.
pub fn parse_facet(raw: &str) -> Result<(String, String)> {
    match raw.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.to_string()))
        }
        _ => Err(ConsoleError::InvalidFacetFilter(raw.to_string())),
    }
}

/// Runs a parsed command line and returns what should be printed.
pub fn run(cli: Cli) -> Result<String> {
    match cli.command {
        Some(Command::Views) => list_views(),
        None => run_query(&cli.query),
    }
}

fn list_views() -> Result<String> {
    let views = presets::builtin_views()?;
    let width = views.iter().map(|v| v.name.len()).max().unwrap_or(0);
    Ok(views
        .iter()
        .map(|v| {
            let description = v.description.as_deref().unwrap_or("");
            format!("{:width$}  {}", v.name, description)
                .trim_end()
                .to_string()
                + "\n"
        })
        .collect())
}

fn run_query(args: &QueryArgs) -> Result<String> {
    let view = resolve_view(args)?;
    let config = view.to_config()?;

    let text = read_input(args.input.as_deref())?;
    let records = parse_records(&text)?;

    let query = build_query(args, QueryDescriptor::from_config(&config))?;
    tracing::debug!(
        view = %view.name,
        records = records.len(),
        query = ?query,
        "running query"
    );

    let result = config.evaluate(&records, &query)?;
    render(&view, &query, &result, args.output)
}

fn resolve_view(args: &QueryArgs) -> Result<ViewSpec> {
    match (&args.view_file, &args.view) {
        (Some(path), _) => ViewSpec::load(path),
        (None, Some(name)) => presets::builtin(name),
        (None, None) => Err(ConsoleError::MissingView),
    }
}

/// Applies command-line overrides to a starting query.
///
/// The page is applied last so that `--page` survives the reset to page 1
/// that filter changes cause.
pub fn build_query(args: &QueryArgs, initial: QueryDescriptor) -> Result<QueryDescriptor> {
    let mut query = match &args.state {
        Some(path) => serde_json::from_str(&read_file(path)?)?,
        None => initial,
    };
    if let Some(text) = &args.search {
        query = query.with_search_text(text.clone());
    }
    for (facet, value) in &args.facets {
        query = query.select_facet(facet, value);
    }
    if let Some(sort) = &args.sort {
        query = query.with_sort(sort.clone());
    }
    if let Some(size) = args.page_size {
        query = query.with_page_size(size);
    }
    if let Some(page) = args.page {
        query = query.with_page(page);
    }
    Ok(query)
}

/// Extracts the record array from a list endpoint's JSON.
///
/// Accepts a bare array, or an object carrying the array under `data`,
/// `items` or `results`.
pub fn parse_records(text: &str) -> Result<Vec<Json>> {
    match serde_json::from_str::<Json>(text)? {
        Json::Array(records) => Ok(records),
        Json::Object(mut map) => WRAPPER_KEYS
            .iter()
            .find_map(|key| match map.remove(*key) {
                Some(Json::Array(records)) => Some(records),
                _ => None,
            })
            .ok_or(ConsoleError::NotAnArray),
        _ => Err(ConsoleError::NotAnArray),
    }
}

fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) if path != Path::new("-") => read_file(path),
        _ => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .map_err(|source| ConsoleError::Io {
                    path: PathBuf::from("<stdin>"),
                    source,
                })?;
            Ok(text)
        }
    }
}

fn read_file(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|source| ConsoleError::Io {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use listquery::Dir;
    use serde_json::json;

    #[test]
    fn parse_facet_pairs() {
        assert_eq!(
            parse_facet("status=open").unwrap(),
            ("status".to_string(), "open".to_string())
        );
        assert_eq!(
            parse_facet("note=a=b").unwrap(),
            ("note".to_string(), "a=b".to_string())
        );
        assert_eq!(parse_facet("tag=").unwrap().1, "");
        assert!(parse_facet("status").is_err());
        assert!(parse_facet("=open").is_err());
    }

    #[test]
    fn parses_full_command_line() {
        let cli = Cli::try_parse_from([
            "lq",
            "--view",
            "tickets",
            "--input",
            "tickets.json",
            "--search",
            "payment",
            "--facet",
            "status=open",
            "-f",
            "status=pending",
            "--sort",
            "created_at:desc",
            "--page",
            "2",
            "--page-size",
            "50",
            "--output",
            "json",
        ])
        .unwrap();

        assert!(cli.command.is_none());
        let args = cli.query;
        assert_eq!(args.view.as_deref(), Some("tickets"));
        assert_eq!(args.facets.len(), 2);
        assert_eq!(args.sort, Some(SortSpec::new("created_at", Dir::Desc)));
        assert_eq!(args.page, Some(2));
        assert_eq!(args.output, OutputMode::Json);
    }

    #[test]
    fn rejects_bad_arguments() {
        assert!(Cli::try_parse_from(["lq", "--view", "a", "--view-file", "b.yaml"]).is_err());
        assert!(Cli::try_parse_from(["lq", "--facet", "nokey"]).is_err());
        assert!(Cli::try_parse_from(["lq", "--sort", "title:sideways"]).is_err());
        assert!(Cli::try_parse_from(["lq", "--output", "xml"]).is_err());
    }

    #[test]
    fn views_subcommand() {
        let cli = Cli::try_parse_from(["lq", "views"]).unwrap();
        assert!(matches!(cli.command, Some(Command::Views)));
        let out = run(cli).unwrap();
        assert!(out.lines().any(|line| line.starts_with("audit-log")));
        assert_eq!(out.lines().count(), 4);
    }

    #[test]
    fn build_query_keeps_explicit_page() {
        let args = QueryArgs {
            search: Some("x".into()),
            facets: vec![("status".into(), "open".into())],
            page: Some(3),
            page_size: Some(10),
            ..QueryArgs::default()
        };
        let query = build_query(&args, QueryDescriptor::new(SortSpec::asc("id"))).unwrap();
        assert_eq!(query.page(), 3);
        assert_eq!(query.page_size(), 10);
        assert_eq!(query.search_text(), "x");
        assert!(query.facets().is_selected("status", "open"));
    }

    #[test]
    fn parse_records_shapes() {
        assert_eq!(parse_records("[1, 2]").unwrap(), vec![json!(1), json!(2)]);
        assert_eq!(
            parse_records(r#"{"data": [{"id": 1}], "meta": {}}"#).unwrap(),
            vec![json!({"id": 1})]
        );
        assert_eq!(parse_records(r#"{"results": []}"#).unwrap(), Vec::<Json>::new());
        assert!(matches!(
            parse_records(r#"{"data": {"id": 1}}"#),
            Err(ConsoleError::NotAnArray)
        ));
        assert!(matches!(parse_records("3"), Err(ConsoleError::NotAnArray)));
        assert!(matches!(parse_records("{oops"), Err(ConsoleError::Json(_))));
    }

    #[test]
    fn missing_view_is_an_error() {
        let err = run_query(&QueryArgs::default()).unwrap_err();
        assert!(matches!(err, ConsoleError::MissingView));
    }
}
