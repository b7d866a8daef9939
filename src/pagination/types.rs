//! Pagination types and the next page calculation

use serde::{Deserialize, Serialize};
use std::fmt;

/// 1-based index of a page as used in the `page` query parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PageIndex(u32);

impl PageIndex {
    /// The first page, requested without a `page` parameter
    pub const FIRST: PageIndex = PageIndex(1);

    /// Create a page index, clamping 0 to the first page
    pub fn new(index: u32) -> Self {
        Self(index.max(1))
    }

    /// Raw index value
    pub fn get(self) -> u32 {
        self.0
    }

    /// Whether this index needs an explicit `page` query parameter
    pub fn is_first(self) -> bool {
        self.0 == 1
    }
}

impl Default for PageIndex {
    fn default() -> Self {
        Self::FIRST
    }
}

impl fmt::Display for PageIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Result of the next page computation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NextPage {
    /// Another page is available at this index
    Page(PageIndex),
    /// No more pages
    Done,
}

impl NextPage {
    /// Check if this is a done result
    pub fn is_done(&self) -> bool {
        matches!(self, Self::Done)
    }

    /// Index of the next page, if any
    pub fn index(&self) -> Option<PageIndex> {
        match self {
            Self::Page(index) => Some(*index),
            Self::Done => None,
        }
    }
}

/// Pagination metadata reported by the server with every page
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    /// Zero-based index of the first item of this page
    #[serde(default)]
    pub offset: u64,
    /// Page size
    #[serde(default)]
    pub limit: u64,
    /// Size of the whole collection
    #[serde(default, rename = "total_count")]
    pub total: u64,
}

impl Pagination {
    /// Create pagination metadata
    pub fn new(offset: u64, limit: u64, total: u64) -> Self {
        Self {
            offset,
            limit,
            total,
        }
    }

    /// Page to request after this one
    pub fn next_page(&self) -> NextPage {
        next_page(self.offset, self.limit, self.total)
    }
}

/// Compute the page following the one described by `offset`, `limit` and `total`.
///
/// The next index is derived from this page's own metadata, so a server that
/// changes its page size mid-stream is still followed correctly. A zero limit
/// is terminal.
pub fn next_page(offset: u64, limit: u64, total: u64) -> NextPage {
    // total - offset < limit, without underflow when offset > total
    if total < offset.saturating_add(limit) || limit == 0 {
        return NextPage::Done;
    }

    let index = offset.saturating_add(limit) / limit + 1;
    match u32::try_from(index) {
        Ok(index) => NextPage::Page(PageIndex::new(index)),
        Err(_) => NextPage::Done,
    }
}
