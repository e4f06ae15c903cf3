//! Offset pagination value objects.

use serde::Serialize;

/// A request for one page of a listing.
///
/// Pages are 1-based. Repositories fetch `per_page + 1` rows so the caller
/// can tell whether a following page exists without a separate count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub per_page: u32,
}

impl PageRequest {
    pub fn new(page: u32, per_page: u32) -> Self {
        Self {
            page: page.max(1),
            per_page: per_page.max(1),
        }
    }

    /// Parse the raw `page` query parameter.
    ///
    /// Missing, malformed or non-positive values fall back to the first page.
    pub fn from_query(raw: Option<&str>, per_page: u32) -> Self {
        let page = raw
            .and_then(|p| p.trim().parse::<i64>().ok())
            .filter(|p| *p >= 1)
            .map(|p| p.min(u32::MAX as i64) as u32)
            .unwrap_or(1);
        Self::new(page, per_page)
    }

    /// Number of rows to skip.
    pub fn offset(&self) -> i64 {
        (self.page as i64 - 1) * self.per_page as i64
    }

    /// Number of rows to fetch, one more than the page holds.
    pub fn fetch_limit(&self) -> i64 {
        self.per_page as i64 + 1
    }
}

/// One page of results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: u32,
    pub per_page: u32,
    pub has_next: bool,
}

impl<T> Page<T> {
    /// Build a page from rows fetched with [`PageRequest::fetch_limit`].
    pub fn from_overfetch(mut items: Vec<T>, request: PageRequest) -> Self {
        let per_page = request.per_page as usize;
        let has_next = items.len() > per_page;
        items.truncate(per_page);
        Self {
            items,
            page: request.page,
            per_page: request.per_page,
            has_next,
        }
    }

    pub fn has_prev(&self) -> bool {
        self.page > 1
    }

    pub fn next_page(&self) -> Option<u32> {
        self.has_next.then(|| self.page + 1)
    }

    pub fn prev_page(&self) -> Option<u32> {
        self.has_prev().then(|| self.page - 1)
    }

    /// Keep the paging metadata but swap in different items.
    pub fn with_items<U>(self, items: Vec<U>) -> Page<U> {
        Page {
            items,
            page: self.page,
            per_page: self.per_page,
            has_next: self.has_next,
        }
    }
}
