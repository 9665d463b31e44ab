//! Page-by-page list retrieval

use super::strategies::{OffsetPaginator, PageNumberPaginator};
use super::types::{
    ExactBodyMatch, NextPage, PageRequest, PageResponse, PaginationState, Paginator,
    RepeatedPageCheck,
};
use crate::codec::Codec;
use crate::error::{Error, Result};
use crate::http::Transport;
use crate::model::Resource;
use crate::types::{Dialect, QueryParams};
use crate::uri;
use std::sync::Arc;
use tracing::{debug, info};

/// Fetches every object matching a filter from a paged list endpoint
///
/// Pages are requested strictly one after the other; the next request
/// depends on the previous response. A failure on any page aborts the whole
/// fetch and discards what was accumulated.
pub struct PagedFetcher<'a, T: ?Sized, C> {
    transport: &'a T,
    codec: &'a C,
    dialect: Dialect,
    repeat_check: Arc<dyn RepeatedPageCheck>,
}

impl<'a, T, C> PagedFetcher<'a, T, C>
where
    T: Transport + ?Sized,
    C: Codec,
{
    pub fn new(transport: &'a T, codec: &'a C, dialect: Dialect) -> Self {
        Self {
            transport,
            codec,
            dialect,
            repeat_check: Arc::new(ExactBodyMatch),
        }
    }

    /// Replace the repeated-page detection used by the page-number dialect
    #[must_use]
    pub fn with_repeat_check(mut self, check: Arc<dyn RepeatedPageCheck>) -> Self {
        self.repeat_check = check;
        self
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// Fetch all objects of kind `R` from its collection path
    pub async fn fetch_all<R: Resource>(
        &self,
        base_params: QueryParams,
        page_size: usize,
    ) -> Result<Vec<R>> {
        self.fetch_all_at(&uri::collection(R::KIND), base_params, page_size)
            .await
    }

    /// Fetch all objects of kind `R` from an explicit list path
    pub async fn fetch_all_at<R: Resource>(
        &self,
        path: &str,
        base_params: QueryParams,
        page_size: usize,
    ) -> Result<Vec<R>> {
        if page_size == 0 {
            return Err(Error::config("page size must be greater than zero"));
        }

        let paginator = self.paginator();
        let mut state = PaginationState::starting_at(self.dialect.first_cursor());
        let mut objects = Vec::new();

        loop {
            let request = PageRequest {
                params: base_params.clone(),
                cursor: state.cursor,
                page_size,
            };
            let Some(page) = self
                .fetch_page::<R>(path, &request, paginator.as_ref(), &mut state)
                .await?
            else {
                debug!(path, cursor = state.cursor, "Page repeats the first page, stopping");
                break;
            };

            let found = page.items.len();
            debug!(
                path,
                dialect = %self.dialect,
                cursor = state.cursor,
                found,
                total_count = ?page.total_count,
                "Fetched page"
            );
            if found == 0 {
                break;
            }
            objects.extend(page.items);

            match paginator.next_page(found, page.total_count, &mut state) {
                NextPage::Continue(cursor) => state.cursor = cursor,
                NextPage::Done => break,
            }
        }

        info!(
            path,
            objects = objects.len(),
            requests = state.requests,
            "Fetch complete"
        );
        Ok(objects)
    }

    /// Send one page request; `None` when the paginator rejects the body
    async fn fetch_page<R: Resource>(
        &self,
        path: &str,
        request: &PageRequest,
        paginator: &dyn Paginator,
        state: &mut PaginationState,
    ) -> Result<Option<PageResponse<R>>> {
        let body = self
            .transport
            .send(request.to_api_request(path, self.dialect))
            .await?;
        state.requests += 1;

        if !paginator.accept_body(&body, state) {
            return Ok(None);
        }

        let page = self.codec.decode_list::<R>(&body)?;
        Ok(Some(PageResponse {
            items: page.items,
            body,
            total_count: page.total_count,
        }))
    }

    fn paginator(&self) -> Box<dyn Paginator> {
        match self.dialect {
            Dialect::OffsetLimit => Box::new(OffsetPaginator),
            Dialect::PageNumber => Box::new(PageNumberPaginator::new(self.repeat_check.clone())),
        }
    }
}
