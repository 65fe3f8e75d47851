//! listquery-console - declarative admin console list views over JSON.
//!
//! The engine in [`listquery`] is generic over the record type. This crate
//! fixes the record type to [`serde_json::Value`], which is what a console
//! gets back from its list endpoints, and adds the pieces needed to drive a
//! view from files and the command line:
//!
//! - [`FieldSpec`]: dotted paths with fallbacks, e.g. `created_at` falling
//!   back to `response.created_at`, and typed reading of timestamps and
//!   decimal strings
//! - [`ViewSpec`]: a YAML/JSON description of one list view
//! - Built-in views for tickets, the audit log, assignments and wallets
//! - [`render`]: tables, JSON, YAML and CSV
//! - The `lq` binary ([`Cli`], [`run`])
//!
//! ```rust
//! use listquery::QueryDescriptor;
//! use listquery_console::{builtin, parse_records};
//!
//! let view = builtin("audit-log").unwrap();
//! let config = view.to_config().unwrap();
//! let records = parse_records(r#"{"data": [
//!     {"actor": "ana", "event_type": "create", "created_at": "2024-01-01T10:00:00Z"},
//!     {"response": {"actor": "bo", "event_type": "delete", "created_at": "2024-01-02T10:00:00Z"}}
//! ]}"#).unwrap();
//!
//! let query = QueryDescriptor::from_config(&config).toggle_facet("event_type", "delete");
//! let result = config.evaluate(&records, &query).unwrap();
//! assert_eq!(result.total, 1);
//! assert_eq!(result.visible[0]["response"]["actor"], "bo");
//! ```

mod cli;
mod error;
mod output;
mod presets;
mod record;
mod view;

pub use cli::{build_query, parse_facet, parse_records, run, Cli, Command, QueryArgs};
pub use error::{ConsoleError, Result};
pub use output::{render, render_csv, OutputMode, Report};
pub use presets::{builtin, builtin_names, builtin_views};
pub use record::{cell_text, convert, parse_timestamp, FieldKind, FieldPath, FieldSpec};
pub use view::{ColumnSpec, ViewSpec};
