//! Pagination utilities for service layer
//!
//! `PageRequest` is what callers hand in, `Page` is what the store hands back.

use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE_SIZE: u64 = 20;
pub const MAX_PAGE_SIZE: u64 = 100;

/// Pagination parameters
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    /// 0-based page index
    pub page: u64,
    /// items per page
    pub size: u64,
}

impl PageRequest {
    pub fn new(page: u64, size: u64) -> Self { Self { page, size } }

    /// Clamp size into `1..=MAX_PAGE_SIZE`.
    pub fn normalize(self) -> Self {
        Self { page: self.page, size: self.size.clamp(1, MAX_PAGE_SIZE) }
    }

    /// Number of rows before this page, after normalization.
    pub fn offset(self) -> u64 {
        let n = self.normalize();
        n.page.saturating_mul(n.size)
    }
}

impl Default for PageRequest {
    fn default() -> Self { Self { page: 0, size: DEFAULT_PAGE_SIZE } }
}

/// One slice of a larger collection plus the totals needed to walk it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: u64,
    pub size: u64,
    pub total_items: u64,
    pub total_pages: u64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, request: PageRequest, total_items: u64) -> Self {
        let request = request.normalize();
        Self {
            items,
            page: request.page,
            size: request.size,
            total_items,
            total_pages: total_items.div_ceil(request.size),
        }
    }

    pub fn empty(request: PageRequest) -> Self { Self::new(Vec::new(), request, 0) }

    pub fn is_empty(&self) -> bool { self.items.is_empty() }

    pub fn map<U, F: FnMut(T) -> U>(self, f: F) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            page: self.page,
            size: self.size,
            total_items: self.total_items,
            total_pages: self.total_pages,
        }
    }
}
