//! Query evaluation.
//!
//! [`evaluate`] runs a fixed pipeline over an in-memory record slice:
//!
//! ```text
//! records ─ search ─┬─ facet filter ─ sort ─ paginate ─▶ visible, total
//!                   └─ facet counts ─────────────────────▶ facet_counts
//! ```
//!
//! Facet counts are taken on the searched records. The counts for one facet
//! ignore that facet's own selection but honor every other facet's, so a
//! chip badge reads "how many records you would see if you also picked this
//! value".

use std::collections::BTreeSet;

use serde::Serialize;

use crate::config::EngineConfig;
use crate::error::{ConfigError, Result};
use crate::facet::{self, FacetCounts};
use crate::ordering::compare_values;
use crate::paging::PageInfo;
use crate::query::QueryDescriptor;
use crate::value::Value;

/// The outcome of one evaluation.
#[derive(Debug, Clone, Serialize)]
pub struct QueryResult<'a, T> {
    /// The records on the requested page, in sorted order.
    pub visible: Vec<&'a T>,
    /// Number of records that passed search and facet filters.
    pub total: usize,
    /// Per-facet value counts over the searched records.
    pub facet_counts: FacetCounts,
    /// Page metadata for the visible slice.
    pub page: PageInfo,
}

impl<T> QueryResult<'_, T> {
    /// Returns `true` when nothing matched the search and facets.
    pub fn is_empty(&self) -> bool {
        self.total == 0
    }
}

impl<T> EngineConfig<T> {
    /// Evaluates a query against records with this configuration.
    ///
    /// Shorthand for [`evaluate`].
    pub fn evaluate<'a>(
        &self,
        records: &'a [T],
        query: &QueryDescriptor,
    ) -> Result<QueryResult<'a, T>> {
        evaluate(records, query, self)
    }
}

/// Runs search, facet filtering, facet counting, sorting and pagination.
///
/// Records are never mutated. Records with missing or mistyped fields don't
/// match searches or facets on those fields and sort last on them.
///
/// # Errors
///
/// Fails with [`ConfigError::UnknownSortKey`] when the query sorts by an
/// unregistered key and [`ConfigError::UnknownFacetKey`] when it selects
/// values of an undefined facet.
///
/// # Example
///
/// ```
/// use listquery::{evaluate, EngineConfig, QueryDescriptor, SortSpec, Value};
///
/// struct Ticket {
///     title: &'static str,
///     status: &'static str,
/// }
///
/// let tickets = vec![
///     Ticket { title: "Payment gateway issue", status: "open" },
///     Ticket { title: "Withdrawal stuck", status: "pending" },
/// ];
///
/// let config = EngineConfig::<Ticket>::builder()
///     .search(|t: &Ticket| Value::String(t.title))
///     .facet("status", |t: &Ticket| Value::String(t.status))
///     .sort("title", |t: &Ticket| Value::String(t.title))
///     .build()
///     .unwrap();
///
/// let query = QueryDescriptor::from_config(&config).with_search_text("PAYMENT");
/// let result = evaluate(&tickets, &query, &config).unwrap();
///
/// assert_eq!(result.total, 1);
/// assert_eq!(result.visible[0].title, "Payment gateway issue");
/// assert_eq!(result.facet_counts["status"]["open"], 1);
/// ```
pub fn evaluate<'a, T>(
    records: &'a [T],
    query: &QueryDescriptor,
    config: &EngineConfig<T>,
) -> Result<QueryResult<'a, T>> {
    let sort_accessor = config.sort_accessor(&query.sort().key)?;
    if let Some(unknown) = query.facets().keys().find(|k| config.facet(k).is_none()) {
        return Err(ConfigError::UnknownFacetKey(unknown.to_string()));
    }

    // Search
    let needle = query.search_text().to_lowercase();
    let searched: Vec<&'a T> = records
        .iter()
        .filter(|record| {
            needle.is_empty()
                || config
                    .search_accessors()
                    .iter()
                    .any(|accessor| matches_search(&accessor.get(*record), &needle))
        })
        .collect();

    // Facet filter and counts share one pass over each record's facet keys.
    let facets = config.facets();
    let mut facet_counts: FacetCounts = facets
        .iter()
        .map(|def| (def.key.clone(), Default::default()))
        .collect();
    let mut filtered: Vec<&'a T> = Vec::with_capacity(searched.len());

    for record in searched.iter().copied() {
        let keys: Vec<BTreeSet<String>> = facets
            .iter()
            .map(|def| facet::facet_keys(&def.accessor.get(record)))
            .collect();
        let passes: Vec<bool> = facets
            .iter()
            .zip(&keys)
            .map(|(def, keys)| match query.facets().values(&def.key) {
                Some(selected) => facet::intersects(keys, selected),
                None => true,
            })
            .collect();
        let failing = passes.iter().filter(|pass| !**pass).count();

        if failing == 0 {
            filtered.push(record);
        }

        // A facet's own selection is ignored for its counts, so a record
        // counts toward facet i if every *other* facet passes.
        for (i, def) in facets.iter().enumerate() {
            let others_pass = failing == 0 || (failing == 1 && !passes[i]);
            if !others_pass {
                continue;
            }
            let counts = facet_counts.entry(def.key.clone()).or_default();
            for key in &keys[i] {
                *counts.entry(key.clone()).or_insert(0) += 1;
            }
        }
    }

    for (facet, selected) in query.facets().iter() {
        let counts = facet_counts.entry(facet.to_string()).or_default();
        for value in selected {
            counts.entry(value.clone()).or_insert(0);
        }
    }

    // Sort. `sort_by` is stable, and the direction only flips comparisons of
    // present values, so ties keep input order both ways.
    let dir = query.sort().dir;
    let mut keyed: Vec<(Value<'a>, &'a T)> = filtered
        .into_iter()
        .map(|record| (sort_accessor.get(record), record))
        .collect();
    keyed.sort_by(|(a, _), (b, _)| compare_values(a, b, dir));

    // Paginate
    let total = keyed.len();
    let page_size = config.page_sizes().resolve(query.page_size());
    let page = PageInfo::new(query.page(), page_size, total);
    let visible: Vec<&'a T> = keyed[page.range()]
        .iter()
        .map(|(_, record)| *record)
        .collect();

    tracing::debug!(
        records = records.len(),
        searched = searched.len(),
        total,
        page = page.page,
        page_size,
        visible = visible.len(),
        sort = %query.sort(),
        "evaluated list query"
    );

    Ok(QueryResult {
        visible,
        total,
        facet_counts,
        page,
    })
}

/// Case-insensitive substring match against every scalar of a value.
///
/// `needle` must already be lower-cased.
fn matches_search(value: &Value<'_>, needle: &str) -> bool {
    value.scalars().into_iter().any(|scalar| {
        scalar
            .search_text()
            .is_some_and(|text| text.to_lowercase().contains(needle))
    })
}
