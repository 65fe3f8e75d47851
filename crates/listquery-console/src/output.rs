//! Rendering evaluated views.
//!
//! Structured modes (JSON, YAML) serialize a [`Report`] carrying the page
//! of records with its counts. CSV flattens the visible records through the
//! view's columns. Text modes draw a padded table with a pager line and the
//! facet chips underneath.

use clap::ValueEnum;
use console::{measure_text_width, pad_str, truncate_str, Alignment, Style};
use listquery::{FacetCounts, PageInfo, QueryDescriptor, QueryResult};
use serde::Serialize;
use serde_json::Value as Json;

use crate::error::{ConsoleError, Result};
use crate::record::cell_text;
use crate::view::{ColumnSpec, ViewSpec};

/// Widest a table cell is allowed to grow in text output.
const MAX_CELL_WIDTH: usize = 40;

const COLUMN_GAP: &str = "  ";

/// How results are written.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputMode {
    /// Term when stdout is a terminal, Text otherwise
    #[default]
    Auto,
    /// Table with terminal styling
    Term,
    /// Table without styling
    Text,
    /// Pretty-printed JSON report
    Json,
    /// YAML report
    Yaml,
    /// Visible records as CSV, one column per view column
    Csv,
}

impl OutputMode {
    /// Returns true for JSON, YAML and CSV.
    pub fn is_structured(&self) -> bool {
        matches!(self, OutputMode::Json | OutputMode::Yaml | OutputMode::Csv)
    }

    /// Resolves Auto to Term or Text based on TTY detection.
    pub fn resolve_auto(&self) -> OutputMode {
        match self {
            OutputMode::Auto => {
                if atty::is(atty::Stream::Stdout) {
                    OutputMode::Term
                } else {
                    OutputMode::Text
                }
            }
            other => *other,
        }
    }
}

/// Serialized form of one evaluation.
#[derive(Debug, Serialize)]
pub struct Report<'a> {
    pub view: &'a str,
    pub query: &'a QueryDescriptor,
    pub total: usize,
    pub page: PageInfo,
    pub facet_counts: &'a FacetCounts,
    pub records: &'a [&'a Json],
}

/// Renders an evaluated view.
pub fn render(
    view: &ViewSpec,
    query: &QueryDescriptor,
    result: &QueryResult<'_, Json>,
    mode: OutputMode,
) -> Result<String> {
    let report = Report {
        view: &view.name,
        query,
        total: result.total,
        page: result.page,
        facet_counts: &result.facet_counts,
        records: &result.visible,
    };
    match mode.resolve_auto() {
        OutputMode::Json => Ok(serde_json::to_string_pretty(&report)? + "\n"),
        OutputMode::Yaml => Ok(serde_yaml::to_string(&report)?),
        OutputMode::Csv => render_csv(&view.display_columns(), &result.visible),
        OutputMode::Term => Ok(render_table(view, query, result, true)),
        OutputMode::Text | OutputMode::Auto => Ok(render_table(view, query, result, false)),
    }
}

/// Writes records as CSV, one column per view column.
pub fn render_csv(columns: &[ColumnSpec], records: &[&Json]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(columns.iter().map(|c| c.name.as_str()))?;
    for record in records {
        wtr.write_record(columns.iter().map(|c| cell_text(c.field.raw(record))))?;
    }
    let bytes = wtr
        .into_inner()
        .map_err(|e| ConsoleError::Csv(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| ConsoleError::Csv(e.to_string()))
}

fn render_table(
    view: &ViewSpec,
    query: &QueryDescriptor,
    result: &QueryResult<'_, Json>,
    styled: bool,
) -> String {
    let paint = |style: Style, text: &str| -> String {
        if styled {
            style.apply_to(text).to_string()
        } else {
            text.to_string()
        }
    };

    let mut out = String::new();
    if result.visible.is_empty() {
        let message = if result.total == 0 {
            "No matching records.".to_string()
        } else {
            format!(
                "Page {} is past the end ({} matching, {} pages).",
                result.page.page, result.total, result.page.total_pages
            )
        };
        out.push_str(&paint(Style::new().dim(), &message));
        out.push('\n');
    } else {
        let columns = view.display_columns();
        let rows: Vec<Vec<String>> = result
            .visible
            .iter()
            .map(|record| {
                columns
                    .iter()
                    .map(|c| {
                        let text = cell_text(c.field.raw(record));
                        truncate_str(&text, MAX_CELL_WIDTH, "…").into_owned()
                    })
                    .collect()
            })
            .collect();
        let widths: Vec<usize> = columns
            .iter()
            .enumerate()
            .map(|(i, c)| {
                rows.iter()
                    .map(|row| measure_text_width(&row[i]))
                    .chain(std::iter::once(measure_text_width(&c.name)))
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        let header: Vec<String> = columns.iter().map(|c| c.name.to_uppercase()).collect();
        out.push_str(&paint(Style::new().bold(), &table_line(&header, &widths)));
        out.push('\n');
        for row in &rows {
            out.push_str(&table_line(row, &widths));
            out.push('\n');
        }

        let page = &result.page;
        let pager = format!(
            "Showing {}-{} of {} (page {} of {})",
            page.first, page.last, page.total, page.page, page.total_pages
        );
        out.push('\n');
        out.push_str(&paint(Style::new().dim(), &pager));
        out.push('\n');
    }

    for (facet, counts) in &result.facet_counts {
        if counts.is_empty() {
            continue;
        }
        let chips: Vec<String> = counts
            .iter()
            .map(|(value, count)| {
                if query.facets().is_selected(facet, value) {
                    paint(Style::new().cyan().bold(), &format!("[{value}] {count}"))
                } else {
                    format!("{value} {count}")
                }
            })
            .collect();
        out.push_str(&format!("{}: {}\n", paint(Style::new().bold(), facet), chips.join(", ")));
    }
    out
}

fn table_line(cells: &[String], widths: &[usize]) -> String {
    cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| pad_str(cell, *width, Alignment::Left, None).into_owned())
        .collect::<Vec<_>>()
        .join(COLUMN_GAP)
        .trim_end()
        .to_string()
}
