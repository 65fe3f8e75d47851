//! Error types for the console crate.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading views, reading records or writing output.
#[derive(Debug, Error)]
pub enum ConsoleError {
    /// The engine rejected the view's wiring or the query.
    #[error(transparent)]
    Config(#[from] listquery::ConfigError),

    /// A field path in a view was malformed.
    #[error("invalid field path '{0}'")]
    InvalidFieldPath(String),

    /// No built-in view has this name.
    #[error("unknown view '{name}' (available: {available})")]
    UnknownView { name: String, available: String },

    /// Neither a built-in view nor a view file was given.
    #[error("no view selected, pass --view NAME or --view-file PATH")]
    MissingView,

    /// A `--facet` argument was not `key=value`.
    #[error("invalid facet filter '{0}', expected key=value")]
    InvalidFacetFilter(String),

    /// The record input was neither an array nor a wrapper around one.
    #[error("expected a JSON array of records, or an object with a data, items or results array")]
    NotAnArray,

    /// Reading a file failed.
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// JSON parsing or serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML parsing or serialization failed.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// CSV serialization failed.
    #[error("CSV error: {0}")]
    Csv(String),
}

impl From<csv::Error> for ConsoleError {
    fn from(err: csv::Error) -> Self {
        ConsoleError::Csv(err.to_string())
    }
}

/// Result type for console operations.
pub type Result<T> = std::result::Result<T, ConsoleError>;
