//! Page arithmetic. Pages are 1-indexed; there is always at least one.

use std::ops::Range;

/// Where pages are cut.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaginationMode {
    /// Fetch the whole filtered collection and slice locally.
    Client,
    /// Send `page`/`limit`; the backend returns one page and a total.
    Server,
}

/// `max(1, ceil(count / page_size))`; a zero page size counts as 1.
#[must_use]
pub fn total_pages(count: usize, page_size: usize) -> usize {
    count.div_ceil(page_size.max(1)).max(1)
}

#[must_use]
pub fn clamp_page(page: usize, total_pages: usize) -> usize {
    page.clamp(1, total_pages.max(1))
}

/// Index range of `page` within a collection of `len` rows.
#[must_use]
pub fn page_range(page: usize, page_size: usize, len: usize) -> Range<usize> {
    let page_size = page_size.max(1);
    let start = page.saturating_sub(1).saturating_mul(page_size).min(len);
    let end = start.saturating_add(page_size).min(len);
    start..end
}

#[cfg(test)]
#[path = "page_test.rs"]
mod tests;
