//! Resource contracts.
//!
//! Every operation takes the acting user explicitly; there is no implicit
//! request context. Out-of-scope rows surface as NotFound rather than
//! PermissionDenied so the existence of other users' resources never leaks.

pub mod activities;
pub mod categories;
pub mod entries;
pub mod skills;

use serde::Serialize;

pub const DEFAULT_PER_PAGE: u64 = 20;
pub const MAX_PER_PAGE: u64 = 100;

/// One page of a listing.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u64,
    pub per_page: u64,
}

/// Clamp caller-supplied paging parameters. Pages are 1-based.
pub(crate) fn clamp_paging(page: Option<u64>, per_page: Option<u64>) -> (u64, u64) {
    let page = page.unwrap_or(1).max(1);
    let per_page = per_page.unwrap_or(DEFAULT_PER_PAGE).clamp(1, MAX_PER_PAGE);
    (page, per_page)
}
