//! Facet selections and facet counts.
//!
//! A facet is a named filterable dimension. Selected values within one facet
//! are OR-ed, facets are AND-ed with each other, and a facet with nothing
//! selected lets every record through.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::value::Value;

/// Selected values per facet key.
///
/// Facets whose selection becomes empty are dropped. A deserialized empty
/// set is tolerated and treated as inactive.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FacetSelection(BTreeMap<String, BTreeSet<String>>);

impl FacetSelection {
    /// Creates an empty selection.
    pub fn new() -> Self {
        FacetSelection::default()
    }

    /// Returns `true` when no facet has a selected value.
    pub fn is_empty(&self) -> bool {
        self.0.values().all(BTreeSet::is_empty)
    }

    /// Returns `true` when the facet has at least one selected value.
    pub fn is_active(&self, facet: &str) -> bool {
        self.values(facet).is_some()
    }

    /// Returns `true` when `value` is selected for `facet`.
    pub fn is_selected(&self, facet: &str, value: &str) -> bool {
        self.0.get(facet).is_some_and(|set| set.contains(value))
    }

    /// The selected values of a facet, if it is active.
    pub fn values(&self, facet: &str) -> Option<&BTreeSet<String>> {
        self.0.get(facet).filter(|set| !set.is_empty())
    }

    /// Iterates active facets and their selected values.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &BTreeSet<String>)> {
        self.0
            .iter()
            .filter(|(_, set)| !set.is_empty())
            .map(|(k, v)| (k.as_str(), v))
    }

    /// Active facet keys.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.iter().map(|(k, _)| k)
    }

    pub(crate) fn select(&mut self, facet: &str, value: &str) {
        self.0
            .entry(facet.to_string())
            .or_default()
            .insert(value.to_string());
    }

    pub(crate) fn deselect(&mut self, facet: &str, value: &str) {
        if let Some(set) = self.0.get_mut(facet) {
            set.remove(value);
            if set.is_empty() {
                self.0.remove(facet);
            }
        }
    }

    pub(crate) fn clear(&mut self, facet: &str) {
        self.0.remove(facet);
    }
}

impl<K, V> FromIterator<(K, V)> for FacetSelection
where
    K: AsRef<str>,
    V: AsRef<str>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut selection = FacetSelection::new();
        for (facet, value) in iter {
            selection.select(facet.as_ref(), value.as_ref());
        }
        selection
    }
}

/// Per-facet value counts, for rendering chip badges.
///
/// Keys are facet keys, then facet values, both in sorted order.
pub type FacetCounts = BTreeMap<String, BTreeMap<String, usize>>;

/// The distinct facet keys held by an accessor output.
pub(crate) fn facet_keys(value: &Value<'_>) -> BTreeSet<String> {
    value
        .scalars()
        .into_iter()
        .filter_map(Value::facet_key)
        .collect()
}

/// Whether a record's facet keys satisfy a facet's selected values.
pub(crate) fn intersects(keys: &BTreeSet<String>, selected: &BTreeSet<String>) -> bool {
    keys.iter().any(|k| selected.contains(k))
}
