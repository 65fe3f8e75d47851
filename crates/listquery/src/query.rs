//! The query descriptor.
//!
//! A [`QueryDescriptor`] is the complete snapshot of what the user asked a
//! list view for: search text, selected facet values, the active sort and
//! the page. It is immutable; every interaction produces a new descriptor.
//! Interactions that can change which records match (search, facets, page
//! size) send the user back to page 1.

use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::facet::FacetSelection;
use crate::ordering::{Dir, SortSpec};

/// Search, facet, sort and page state driving one evaluation.
///
/// ```
/// use listquery::{QueryDescriptor, SortSpec};
///
/// let query = QueryDescriptor::new(SortSpec::desc("created_at"))
///     .with_search_text("payment")
///     .toggle_facet("status", "open")
///     .with_page(2);
///
/// assert_eq!(query.search_text(), "payment");
/// assert!(query.facets().is_selected("status", "open"));
/// assert_eq!(query.page(), 2);
///
/// // Narrowing the list sends the user back to the first page.
/// let query = query.toggle_facet("status", "pending");
/// assert_eq!(query.page(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryDescriptor {
    search_text: String,
    facets: FacetSelection,
    sort: SortSpec,
    page: usize,
    page_size: usize,
}

impl Default for QueryDescriptor {
    fn default() -> Self {
        QueryDescriptor {
            search_text: String::new(),
            facets: FacetSelection::new(),
            sort: SortSpec::asc(String::new()),
            page: 1,
            page_size: crate::config::DEFAULT_PAGE_SIZE,
        }
    }
}

impl QueryDescriptor {
    /// Creates a query on page 1 with the given sort and the stock page size.
    pub fn new(sort: SortSpec) -> Self {
        QueryDescriptor {
            sort,
            ..QueryDescriptor::default()
        }
    }

    /// Creates the query a view starts with: the config's default sort and
    /// default page size, no search, no facets, page 1.
    pub fn from_config<T>(config: &EngineConfig<T>) -> Self {
        QueryDescriptor {
            sort: config.default_sort().clone(),
            page_size: config.page_sizes().default_size(),
            ..QueryDescriptor::default()
        }
    }

    /// The free-text search term.
    pub fn search_text(&self) -> &str {
        &self.search_text
    }

    /// The selected facet values.
    pub fn facets(&self) -> &FacetSelection {
        &self.facets
    }

    /// The active sort.
    pub fn sort(&self) -> &SortSpec {
        &self.sort
    }

    /// The requested page, 1-based. A stored 0 reads as 1.
    pub fn page(&self) -> usize {
        self.page.max(1)
    }

    /// The requested page size, before the allow-list is applied.
    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Replaces the search text and returns to page 1.
    pub fn with_search_text(&self, text: impl Into<String>) -> Self {
        QueryDescriptor {
            search_text: text.into(),
            ..self.first_page()
        }
    }

    /// Selects `value` for `facet`, or deselects it if already selected.
    /// Returns to page 1.
    pub fn toggle_facet(&self, facet: &str, value: &str) -> Self {
        let mut next = self.first_page();
        if next.facets.is_selected(facet, value) {
            next.facets.deselect(facet, value);
        } else {
            next.facets.select(facet, value);
        }
        next
    }

    /// Selects `value` for `facet` (no-op if already selected).
    /// Returns to page 1.
    pub fn select_facet(&self, facet: &str, value: &str) -> Self {
        let mut next = self.first_page();
        next.facets.select(facet, value);
        next
    }

    /// Clears every selected value of one facet. Returns to page 1.
    pub fn clear_facet(&self, facet: &str) -> Self {
        let mut next = self.first_page();
        next.facets.clear(facet);
        next
    }

    /// Clears all facet selections. Returns to page 1.
    pub fn clear_facets(&self) -> Self {
        QueryDescriptor {
            facets: FacetSelection::new(),
            ..self.first_page()
        }
    }

    /// Replaces the facet selection wholesale. Returns to page 1.
    pub fn with_facets(&self, facets: FacetSelection) -> Self {
        QueryDescriptor {
            facets,
            ..self.first_page()
        }
    }

    /// Replaces the active sort. The page is kept.
    pub fn with_sort(&self, sort: SortSpec) -> Self {
        QueryDescriptor {
            sort,
            ..self.clone()
        }
    }

    /// Column-header behavior: clicking the active key flips its direction,
    /// clicking another key sorts by it ascending.
    pub fn toggle_sort(&self, key: &str) -> Self {
        let sort = if self.sort.key == key {
            SortSpec::new(key, self.sort.dir.flip())
        } else {
            SortSpec::new(key, Dir::Asc)
        };
        self.with_sort(sort)
    }

    /// Moves to another page. Page 0 reads as page 1.
    pub fn with_page(&self, page: usize) -> Self {
        QueryDescriptor {
            page: page.max(1),
            ..self.clone()
        }
    }

    /// Changes the page size and returns to page 1.
    pub fn with_page_size(&self, page_size: usize) -> Self {
        QueryDescriptor {
            page_size,
            ..self.first_page()
        }
    }

    fn first_page(&self) -> Self {
        QueryDescriptor {
            page: 1,
            ..self.clone()
        }
    }
}
