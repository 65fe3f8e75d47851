//! Engine configuration.
//!
//! An [`EngineConfig`] is built once per view. It names the fields searched
//! by free text, the facets a user can filter on, the sort keys a user can
//! pick, and the page sizes on offer. [`EngineConfigBuilder::build`]
//! validates the wiring so mistakes surface when the view is set up rather
//! than on the first keystroke.

use std::collections::BTreeSet;

use crate::accessor::Accessor;
use crate::error::{ConfigError, Result};
use crate::ordering::SortSpec;
use crate::value::Value;

/// Page sizes offered when the builder is not told otherwise.
pub const DEFAULT_PAGE_SIZES: [usize; 4] = [10, 25, 50, 100];

/// Page size used when the builder is not told otherwise.
pub const DEFAULT_PAGE_SIZE: usize = 25;

/// A named filterable dimension.
#[derive(Debug, Clone)]
pub struct FacetDef<T> {
    /// Facet key, as used in a query's facet selection.
    pub key: String,
    /// Derives a record's value (or list of values) for this facet.
    pub accessor: Accessor<T>,
}

/// A named sort key.
#[derive(Debug, Clone)]
pub struct SortDef<T> {
    /// Sort key, as used in a query's [`SortSpec`].
    pub key: String,
    /// Derives the value a record is ordered by.
    pub accessor: Accessor<T>,
}

/// The allowed page sizes and the fallback used for anything else.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageSizes {
    allowed: BTreeSet<usize>,
    default: usize,
}

impl PageSizes {
    /// Validates and creates an allow-list.
    pub fn new(allowed: impl IntoIterator<Item = usize>, default: usize) -> Result<Self> {
        let allowed: BTreeSet<usize> = allowed.into_iter().collect();
        if allowed.is_empty() {
            return Err(ConfigError::NoPageSizes);
        }
        if allowed.contains(&0) || default == 0 {
            return Err(ConfigError::ZeroPageSize);
        }
        if !allowed.contains(&default) {
            return Err(ConfigError::DefaultPageSizeNotAllowed(default));
        }
        Ok(PageSizes { allowed, default })
    }

    /// Maps a requested page size onto the allow-list.
    ///
    /// Returns the request if it is allowed and the default otherwise.
    pub fn resolve(&self, requested: usize) -> usize {
        if self.allowed.contains(&requested) {
            requested
        } else {
            tracing::warn!(
                requested,
                fallback = self.default,
                "page size not allowed, using default"
            );
            self.default
        }
    }

    /// The default page size.
    pub fn default_size(&self) -> usize {
        self.default
    }

    /// The allowed page sizes in ascending order.
    pub fn allowed(&self) -> impl Iterator<Item = usize> + '_ {
        self.allowed.iter().copied()
    }
}

impl Default for PageSizes {
    fn default() -> Self {
        PageSizes {
            allowed: DEFAULT_PAGE_SIZES.into_iter().collect(),
            default: DEFAULT_PAGE_SIZE,
        }
    }
}

/// Validated configuration for one list view over records of type `T`.
///
/// ```
/// use listquery::{EngineConfig, SortSpec, Value, Number};
///
/// struct Ticket {
///     title: String,
///     status: String,
///     created: i64,
/// }
///
/// let config = EngineConfig::<Ticket>::builder()
///     .search(|t: &Ticket| Value::String(&t.title))
///     .facet("status", |t: &Ticket| Value::String(&t.status))
///     .sort("created", |t: &Ticket| Value::Number(Number::I64(t.created)))
///     .default_sort(SortSpec::desc("created"))
///     .build()
///     .unwrap();
///
/// assert_eq!(config.page_sizes().default_size(), 25);
/// ```
#[derive(Debug, Clone)]
pub struct EngineConfig<T> {
    search: Vec<Accessor<T>>,
    facets: Vec<FacetDef<T>>,
    sorts: Vec<SortDef<T>>,
    page_sizes: PageSizes,
    default_sort: SortSpec,
}

impl<T> EngineConfig<T> {
    /// Starts building a configuration.
    pub fn builder() -> EngineConfigBuilder<T> {
        EngineConfigBuilder::default()
    }

    /// Accessors scanned by the free-text search.
    pub fn search_accessors(&self) -> &[Accessor<T>] {
        &self.search
    }

    /// Facet definitions, in registration order.
    pub fn facets(&self) -> &[FacetDef<T>] {
        &self.facets
    }

    /// Looks up a facet by key.
    pub fn facet(&self, key: &str) -> Option<&FacetDef<T>> {
        self.facets.iter().find(|f| f.key == key)
    }

    /// Sort definitions, in registration order.
    pub fn sorts(&self) -> &[SortDef<T>] {
        &self.sorts
    }

    /// Looks up a sort accessor by key.
    pub fn sort_accessor(&self, key: &str) -> Result<&Accessor<T>> {
        self.sorts
            .iter()
            .find(|s| s.key == key)
            .map(|s| &s.accessor)
            .ok_or_else(|| ConfigError::UnknownSortKey(key.to_string()))
    }

    /// The page-size allow-list.
    pub fn page_sizes(&self) -> &PageSizes {
        &self.page_sizes
    }

    /// The sort a fresh query starts with.
    pub fn default_sort(&self) -> &SortSpec {
        &self.default_sort
    }
}

/// Builder for [`EngineConfig`].
#[derive(Debug)]
pub struct EngineConfigBuilder<T> {
    search: Vec<Accessor<T>>,
    facets: Vec<FacetDef<T>>,
    sorts: Vec<SortDef<T>>,
    page_sizes: Option<(Vec<usize>, usize)>,
    default_sort: Option<SortSpec>,
}

impl<T> Default for EngineConfigBuilder<T> {
    fn default() -> Self {
        EngineConfigBuilder {
            search: Vec::new(),
            facets: Vec::new(),
            sorts: Vec::new(),
            page_sizes: None,
            default_sort: None,
        }
    }
}

impl<T> EngineConfigBuilder<T> {
    /// Adds a field scanned by free-text search.
    pub fn search<F>(self, f: F) -> Self
    where
        F: for<'a> Fn(&'a T) -> Value<'a> + Send + Sync + 'static,
    {
        self.search_accessor(Accessor::new(f))
    }

    /// Adds a prebuilt accessor scanned by free-text search.
    pub fn search_accessor(mut self, accessor: Accessor<T>) -> Self {
        self.search.push(accessor);
        self
    }

    /// Adds a facet.
    pub fn facet<F>(self, key: impl Into<String>, f: F) -> Self
    where
        F: for<'a> Fn(&'a T) -> Value<'a> + Send + Sync + 'static,
    {
        self.facet_accessor(key, Accessor::new(f))
    }

    /// Adds a facet backed by a prebuilt accessor.
    pub fn facet_accessor(mut self, key: impl Into<String>, accessor: Accessor<T>) -> Self {
        self.facets.push(FacetDef {
            key: key.into(),
            accessor,
        });
        self
    }

    /// Adds a sort key.
    pub fn sort<F>(self, key: impl Into<String>, f: F) -> Self
    where
        F: for<'a> Fn(&'a T) -> Value<'a> + Send + Sync + 'static,
    {
        self.sort_accessor(key, Accessor::new(f))
    }

    /// Adds a sort key backed by a prebuilt accessor.
    pub fn sort_accessor(mut self, key: impl Into<String>, accessor: Accessor<T>) -> Self {
        self.sorts.push(SortDef {
            key: key.into(),
            accessor,
        });
        self
    }

    /// Sets the page-size allow-list and its fallback.
    pub fn page_sizes(mut self, allowed: impl IntoIterator<Item = usize>, default: usize) -> Self {
        self.page_sizes = Some((allowed.into_iter().collect(), default));
        self
    }

    /// Sets the sort a fresh query starts with.
    ///
    /// Defaults to the first registered sort key, ascending.
    pub fn default_sort(mut self, sort: SortSpec) -> Self {
        self.default_sort = Some(sort);
        self
    }

    /// Validates the wiring and builds the configuration.
    pub fn build(self) -> Result<EngineConfig<T>> {
        ensure_unique(self.facets.iter().map(|f| f.key.as_str()))
            .map_err(ConfigError::DuplicateFacetKey)?;
        ensure_unique(self.sorts.iter().map(|s| s.key.as_str()))
            .map_err(ConfigError::DuplicateSortKey)?;

        let page_sizes = match self.page_sizes {
            Some((allowed, default)) => PageSizes::new(allowed, default)?,
            None => PageSizes::default(),
        };

        let default_sort = match self.default_sort {
            Some(sort) => sort,
            None => self
                .sorts
                .first()
                .map(|s| SortSpec::asc(s.key.clone()))
                .ok_or(ConfigError::MissingDefaultSort)?,
        };
        if !self.sorts.iter().any(|s| s.key == default_sort.key) {
            return Err(ConfigError::UnknownSortKey(default_sort.key));
        }

        Ok(EngineConfig {
            search: self.search,
            facets: self.facets,
            sorts: self.sorts,
            page_sizes,
            default_sort,
        })
    }
}

fn ensure_unique<'a>(keys: impl Iterator<Item = &'a str>) -> std::result::Result<(), String> {
    let mut seen = BTreeSet::new();
    for key in keys {
        if !seen.insert(key) {
            return Err(key.to_string());
        }
    }
    Ok(())
}
