//! Pagination strategy implementations
//!
//! One strategy per dialect.

use super::types::{NextPage, PaginationState, Paginator, RepeatedPageCheck};
use std::sync::Arc;

// ============================================================================
// Offset Pagination
// ============================================================================

/// `offset` + `limit` pagination (Redmine 1.1+, ChiliProject 1.2)
///
/// Stops once the offset reaches the total count reported by the page just
/// received. A page without a total count is treated as reporting zero.
#[derive(Debug, Clone, Copy, Default)]
pub struct OffsetPaginator;

impl Paginator for OffsetPaginator {
    fn accept_body(&self, _body: &str, _state: &mut PaginationState) -> bool {
        true
    }

    fn next_page(
        &self,
        items_on_page: usize,
        total_count: Option<usize>,
        state: &mut PaginationState,
    ) -> NextPage {
        let offset = state.cursor + items_on_page;
        if offset >= total_count.unwrap_or(0) {
            NextPage::Done
        } else {
            NextPage::Continue(offset)
        }
    }
}

// ============================================================================
// Page Number Pagination
// ============================================================================

/// `page` + `per_page` pagination (Redmine 1.0)
///
/// The server never reports a usable total, so the fetch ends on an empty
/// page or when a later page repeats page 1.
#[derive(Clone)]
pub struct PageNumberPaginator {
    repeat_check: Arc<dyn RepeatedPageCheck>,
}

impl PageNumberPaginator {
    pub fn new(repeat_check: Arc<dyn RepeatedPageCheck>) -> Self {
        Self { repeat_check }
    }
}

impl Paginator for PageNumberPaginator {
    fn accept_body(&self, body: &str, state: &mut PaginationState) -> bool {
        match state.first_body.as_deref() {
            None => {
                state.first_body = Some(body.to_string());
                true
            }
            Some(first) => !self.repeat_check.is_repeated_terminal_page(body, first),
        }
    }

    fn next_page(
        &self,
        _items_on_page: usize,
        _total_count: Option<usize>,
        state: &mut PaginationState,
    ) -> NextPage {
        NextPage::Continue(state.cursor + 1)
    }
}

impl std::fmt::Debug for PageNumberPaginator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageNumberPaginator").finish_non_exhaustive()
    }
}
