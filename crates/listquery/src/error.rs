//! Error types for the listquery crate.

use thiserror::Error;

/// Wiring mistakes in an engine configuration or in the query driving it.
///
/// These are programmer errors. Bad record data never produces one: records
/// with missing or mistyped fields are absorbed by the engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// The query sorts by a key the config never registered.
    #[error("unknown sort key '{0}'")]
    UnknownSortKey(String),

    /// The query filters on a facet the config never defined.
    #[error("unknown facet '{0}'")]
    UnknownFacetKey(String),

    /// Two facets were registered under the same key.
    #[error("facet '{0}' is defined more than once")]
    DuplicateFacetKey(String),

    /// Two sort accessors were registered under the same key.
    #[error("sort key '{0}' is defined more than once")]
    DuplicateSortKey(String),

    /// The page-size allow-list is empty.
    #[error("no page sizes allowed")]
    NoPageSizes,

    /// A page size of zero was allowed or chosen as default.
    #[error("page size must be positive")]
    ZeroPageSize,

    /// The default page size is not part of the allow-list.
    #[error("default page size {0} is not in the allowed page sizes")]
    DefaultPageSizeNotAllowed(usize),

    /// No default sort was configured.
    #[error("no default sort configured")]
    MissingDefaultSort,

    /// A sort string was not of the form `key`, `key:asc` or `key:desc`.
    #[error("invalid sort '{0}', expected key, key:asc or key:desc")]
    InvalidSortSpec(String),
}

/// Result type for listquery operations.
pub type Result<T> = std::result::Result<T, ConfigError>;
