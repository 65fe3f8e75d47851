//! Declarative list views.
//!
//! A [`ViewSpec`] describes one console page: which fields the search box
//! scans, which filter chips exist, which columns can be sorted and which
//! columns are shown. Views are plain YAML or JSON:
//!
//! ```yaml
//! name: audit-log
//! search: [actor, [event_type, response.event_type]]
//! facets:
//!   event_type: [event_type, response.event_type]
//! sorts:
//!   created_at: { paths: [created_at, response.created_at], kind: timestamp }
//! default_sort: created_at:desc
//! page_sizes: [10, 25, 50]
//! default_page_size: 10
//! columns:
//!   - { name: when, field: created_at }
//!   - { name: event, field: [event_type, response.event_type] }
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use listquery::{EngineConfig, SortSpec, DEFAULT_PAGE_SIZE, DEFAULT_PAGE_SIZES};
use serde::{Deserialize, Serialize};
use serde_json::Value as Json;

use crate::error::{ConsoleError, Result};
use crate::record::FieldSpec;

/// A column shown in text and CSV output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSpec {
    /// Header text.
    pub name: String,
    /// Where the cell value comes from.
    pub field: FieldSpec,
}

/// One list view over JSON records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ViewSpec {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub search: Vec<FieldSpec>,
    #[serde(default)]
    pub facets: BTreeMap<String, FieldSpec>,
    #[serde(default)]
    pub sorts: BTreeMap<String, FieldSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_sizes: Option<Vec<usize>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_page_size: Option<usize>,
    /// `key`, `key:asc` or `key:desc`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_sort: Option<String>,
    #[serde(default)]
    pub columns: Vec<ColumnSpec>,
}

impl ViewSpec {
    /// Parses a view from YAML.
    pub fn from_yaml(text: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(text)?)
    }

    /// Parses a view from JSON.
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Loads a view file. `.json` files are read as JSON, anything else as
    /// YAML.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| ConsoleError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        let view = if is_json {
            Self::from_json(&text)?
        } else {
            Self::from_yaml(&text)?
        };
        tracing::debug!(view = %view.name, path = %path.display(), "loaded view file");
        Ok(view)
    }

    /// Builds the engine configuration for this view.
    pub fn to_config(&self) -> Result<EngineConfig<Json>> {
        let mut builder = EngineConfig::<Json>::builder();
        for field in &self.search {
            builder = builder.search_accessor(field.accessor());
        }
        for (key, field) in &self.facets {
            builder = builder.facet_accessor(key.clone(), field.accessor());
        }
        for (key, field) in &self.sorts {
            builder = builder.sort_accessor(key.clone(), field.accessor());
        }
        if self.page_sizes.is_some() || self.default_page_size.is_some() {
            let allowed = self
                .page_sizes
                .clone()
                .unwrap_or_else(|| DEFAULT_PAGE_SIZES.to_vec());
            let default = self.default_page_size.unwrap_or(DEFAULT_PAGE_SIZE);
            builder = builder.page_sizes(allowed, default);
        }
        if let Some(sort) = &self.default_sort {
            builder = builder.default_sort(sort.parse::<SortSpec>()?);
        }
        Ok(builder.build()?)
    }

    /// Columns to display: the declared ones, or one per sort key.
    pub fn display_columns(&self) -> Vec<ColumnSpec> {
        if !self.columns.is_empty() {
            return self.columns.clone();
        }
        self.sorts
            .iter()
            .map(|(key, field)| ColumnSpec {
                name: key.clone(),
                field: field.clone(),
            })
            .collect()
    }
}
