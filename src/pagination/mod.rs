//! Pagination module
//!
//! Supports: offset/limit (Redmine 1.1+, ChiliProject 1.2), page number
//! (Redmine 1.0)
//!
//! # Overview
//!
//! List endpoints return bounded pages. [`PagedFetcher`] walks them in order
//! and concatenates the results, while a per-dialect [`Paginator`] decides
//! when the walk is over.

mod fetcher;
mod strategies;
mod types;

pub use fetcher::PagedFetcher;
pub use strategies::{OffsetPaginator, PageNumberPaginator};
pub use types::{
    ExactBodyMatch, NextPage, PageRequest, PageResponse, PaginationState, Paginator,
    RepeatedPageCheck,
};

#[cfg(test)]
mod tests;
