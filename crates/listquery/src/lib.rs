//! listquery - search, facet, sort and paginate in-memory record lists.
//!
//! listquery is the list bookkeeping behind an admin console's table views:
//! a user types into a search box, clicks filter chips, picks a sort column
//! and pages through the result. Given the records a view already holds, a
//! [`QueryDescriptor`] describing that state and an [`EngineConfig`] naming
//! the fields involved, [`evaluate`] returns the page to display, the total
//! match count and per-facet counts for the chip badges.
//!
//! - Records of any type, read through [`Accessor`] functions
//! - Case-insensitive substring search across several fields
//! - Facets: OR within a facet, AND across facets, multi-valued fields
//! - Stable sorting, absent values always last
//! - Page-size allow-list with a fallback, out-of-range pages are empty
//!
//! # Quick Start
//!
//! ```rust
//! use listquery::{EngineConfig, QueryDescriptor, SortSpec, Timestamp, Value};
//!
//! struct AuditEvent {
//!     actor: String,
//!     event_type: String,
//!     created_ms: i64,
//! }
//!
//! let events = vec![
//!     AuditEvent { actor: "ana".into(), event_type: "create".into(), created_ms: 10 },
//!     AuditEvent { actor: "bo".into(), event_type: "delete".into(), created_ms: 20 },
//!     AuditEvent { actor: "ana".into(), event_type: "update".into(), created_ms: 30 },
//! ];
//!
//! let config = EngineConfig::<AuditEvent>::builder()
//!     .search(|e: &AuditEvent| Value::String(&e.actor))
//!     .facet("event_type", |e: &AuditEvent| Value::String(&e.event_type))
//!     .sort("created", |e: &AuditEvent| Value::Timestamp(Timestamp(e.created_ms)))
//!     .default_sort(SortSpec::desc("created"))
//!     .build()
//!     .unwrap();
//!
//! let query = QueryDescriptor::from_config(&config)
//!     .toggle_facet("event_type", "create")
//!     .toggle_facet("event_type", "update");
//!
//! let result = config.evaluate(&events, &query).unwrap();
//! assert_eq!(result.total, 2);
//! assert_eq!(result.visible[0].event_type, "update");
//! assert_eq!(result.facet_counts["event_type"]["delete"], 1);
//! ```
//!
//! # Errors
//!
//! Only wiring mistakes fail: duplicate keys or a bad page-size allow-list at
//! [`EngineConfigBuilder::build`], and a query naming an unknown sort key or
//! facet at [`evaluate`]. Record data never causes an error.

mod accessor;
mod config;
mod engine;
mod error;
mod facet;
mod ordering;
mod paging;
mod query;
mod value;

pub use accessor::{Accessor, ToTimestamp};
pub use config::{
    EngineConfig, EngineConfigBuilder, FacetDef, PageSizes, SortDef, DEFAULT_PAGE_SIZE,
    DEFAULT_PAGE_SIZES,
};
pub use engine::{evaluate, QueryResult};
pub use error::{ConfigError, Result};
pub use facet::{FacetCounts, FacetSelection};
pub use ordering::{compare_values, Dir, SortSpec};
pub use paging::PageInfo;
pub use query::QueryDescriptor;
pub use value::{Number, Timestamp, Value};
