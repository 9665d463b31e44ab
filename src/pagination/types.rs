//! Pagination types and traits
//!
//! Defines the values exchanged between the fetch loop and the dialect
//! strategies.

use crate::http::ApiRequest;
use crate::types::{Dialect, QueryParams};

/// One list request: the caller's filter plus the paging position
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    /// Filter parameters supplied by the caller
    pub params: QueryParams,
    /// Offset or page number, depending on the dialect
    pub cursor: usize,
    /// Objects per page, always positive
    pub page_size: usize,
}

impl PageRequest {
    /// Build the GET request for this page
    ///
    /// The dialect's size and cursor parameters override caller parameters
    /// of the same name.
    pub fn to_api_request(&self, path: &str, dialect: Dialect) -> ApiRequest {
        let query = self
            .params
            .clone()
            .with(dialect.size_param(), self.page_size.to_string())
            .with(dialect.cursor_param(), self.cursor.to_string());
        ApiRequest::get(path).query(query)
    }
}

/// One fetched page
#[derive(Debug, Clone, PartialEq)]
pub struct PageResponse<T> {
    /// Decoded objects in server order
    pub items: Vec<T>,
    /// Raw response body
    pub body: String,
    /// Reported number of matching objects
    pub total_count: Option<usize>,
}

/// Result of the next page computation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NextPage {
    /// Request the page at this cursor
    Continue(usize),
    /// No more pages
    Done,
}

/// Tracks pagination state during one fetch
#[derive(Debug, Clone, Default)]
pub struct PaginationState {
    /// Cursor of the page being processed
    pub cursor: usize,
    /// Body of the first page, kept for repeated-page detection
    pub first_body: Option<String>,
    /// Requests sent so far
    pub requests: u32,
}

impl PaginationState {
    /// Create state positioned at the given cursor
    pub fn starting_at(cursor: usize) -> Self {
        Self {
            cursor,
            ..Default::default()
        }
    }
}

/// Decides whether a page repeats the first one
///
/// Redmine 1.0 answers a page past the end with page 1 again instead of an
/// empty list.
pub trait RepeatedPageCheck: Send + Sync {
    /// Whether `current` is the server re-serving `first`
    fn is_repeated_terminal_page(&self, current: &str, first: &str) -> bool;
}

/// Byte-for-byte body comparison
#[derive(Debug, Clone, Copy, Default)]
pub struct ExactBodyMatch;

impl RepeatedPageCheck for ExactBodyMatch {
    fn is_repeated_terminal_page(&self, current: &str, first: &str) -> bool {
        current == first
    }
}

/// Dialect-specific termination policy
pub trait Paginator: Send + Sync {
    /// Inspect a raw body before it is decoded
    ///
    /// Returns `false` when the page must be discarded and the fetch ended.
    fn accept_body(&self, body: &str, state: &mut PaginationState) -> bool;

    /// Compute the next cursor after a non-empty page was accumulated
    fn next_page(
        &self,
        items_on_page: usize,
        total_count: Option<usize>,
        state: &mut PaginationState,
    ) -> NextPage;
}
