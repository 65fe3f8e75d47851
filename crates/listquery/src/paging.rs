//! Page arithmetic.

use std::ops::Range;

use serde::Serialize;

/// Where the visible slice sits in the filtered list.
///
/// Built by the engine after the page size has been resolved against the
/// allow-list. Everything a pager widget needs is precomputed here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageInfo {
    /// Current page, 1-based.
    pub page: usize,
    /// Effective page size.
    pub page_size: usize,
    /// Number of records that passed search and facet filters.
    pub total: usize,
    /// Number of non-empty pages (0 when `total` is 0).
    pub total_pages: usize,
    /// Whether a later page has records.
    pub has_next: bool,
    /// Whether this is not the first page.
    pub has_prev: bool,
    /// 1-based position of the first visible record, 0 when nothing is visible.
    pub first: usize,
    /// 1-based position of the last visible record, 0 when nothing is visible.
    pub last: usize,
}

impl PageInfo {
    /// Computes page metadata.
    ///
    /// `page` 0 is read as 1 and `page_size` 0 as 1.
    pub fn new(page: usize, page_size: usize, total: usize) -> Self {
        let page = page.max(1);
        let page_size = page_size.max(1);
        let range = Self::range_of(page, page_size, total);
        let (first, last) = if range.is_empty() {
            (0, 0)
        } else {
            (range.start + 1, range.end)
        };

        PageInfo {
            page,
            page_size,
            total,
            total_pages: total.div_ceil(page_size),
            has_next: range.end < total,
            has_prev: page > 1,
            first,
            last,
        }
    }

    /// Index range of the visible records within the filtered list.
    pub fn range(&self) -> Range<usize> {
        Self::range_of(self.page, self.page_size, self.total)
    }

    fn range_of(page: usize, page_size: usize, total: usize) -> Range<usize> {
        let start = (page - 1).saturating_mul(page_size).min(total);
        let end = start.saturating_add(page_size).min(total);
        start..end
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn middle_page() {
        let info = PageInfo::new(2, 10, 45);
        assert_eq!(info.total_pages, 5);
        assert_eq!(info.range(), 10..20);
        assert_eq!((info.first, info.last), (11, 20));
        assert!(info.has_prev);
        assert!(info.has_next);
    }

    #[test]
    fn last_partial_page() {
        let info = PageInfo::new(5, 10, 45);
        assert_eq!(info.range(), 40..45);
        assert_eq!((info.first, info.last), (41, 45));
        assert!(!info.has_next);
    }

    #[test]
    fn page_past_the_end_is_empty() {
        let info = PageInfo::new(9999, 10, 5);
        assert!(info.range().is_empty());
        assert_eq!((info.first, info.last), (0, 0));
        assert_eq!(info.total_pages, 1);
        assert!(!info.has_next);
        assert!(info.has_prev);
    }

    #[test]
    fn empty_list() {
        let info = PageInfo::new(1, 25, 0);
        assert_eq!(info.total_pages, 0);
        assert!(info.range().is_empty());
        assert!(!info.has_next);
        assert!(!info.has_prev);
    }

    #[test]
    fn huge_page_does_not_overflow() {
        let info = PageInfo::new(usize::MAX, 100, 10);
        assert!(info.range().is_empty());
    }

    #[test]
    fn zero_inputs_are_clamped() {
        let info = PageInfo::new(0, 0, 3);
        assert_eq!(info.page, 1);
        assert_eq!(info.page_size, 1);
        assert_eq!(info.range(), 0..1);
    }
}
