//! Paged enumerator
//!
//! Holds the current page and the request that produced it, and fetches the
//! following pages on demand through the client that issued the first request.

use super::page::{Page, PagingConfig};
use crate::error::{Error, Result};
use crate::http::{IssuingClient, RequestContext, RequestTemplate};
use bytes::Bytes;
use futures::stream::{self, Stream};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::{debug, warn};

/// Walks a paged list operation one page at a time
///
/// `fetch_next` takes `&mut self`, so a second fetch cannot start while one is
/// outstanding:
///
/// ```compile_fail
/// # use cloud_pager::pagination::PagedEnumerator;
/// # async fn overlap(mut pages: PagedEnumerator<serde_json::Value>) {
/// let first = pages.fetch_next();
/// let second = pages.fetch_next();
/// let _ = futures::join!(first, second);
/// # }
/// ```
///
/// Use [`PagedEnumerator::into_shared`] to share one enumerator between tasks.
pub struct PagedEnumerator<T> {
    client: Arc<dyn IssuingClient>,
    request: RequestTemplate,
    context: RequestContext,
    paging: PagingConfig,
    page: Page<T>,
    pages_fetched: usize,
}

impl<T: DeserializeOwned> PagedEnumerator<T> {
    /// Create an enumerator from the response to the first request
    ///
    /// Fails with `MissingData` when `body` is absent or empty, and with
    /// `Decode` when the body does not parse or an item is malformed.
    pub fn new(
        client: Arc<dyn IssuingClient>,
        request: RequestTemplate,
        body: Option<Bytes>,
        paging: PagingConfig,
    ) -> Result<Self> {
        let page = paging.decode_page(body.as_deref())?;
        debug!(
            url = %request.url,
            items = page.len(),
            has_next = page.has_next(),
            "Decoded first page"
        );

        Ok(Self {
            client,
            request,
            context: RequestContext::default(),
            paging,
            page,
            pages_fetched: 1,
        })
    }

    /// Send the first request and create an enumerator from its response
    pub async fn start(
        client: Arc<dyn IssuingClient>,
        request: RequestTemplate,
        context: RequestContext,
        paging: PagingConfig,
    ) -> Result<Self> {
        let response = client.send(&request, &context).await?;
        Ok(Self::new(client, request, response.body, paging)?.with_context(context))
    }

    /// Set the request context used for continuation requests
    #[must_use]
    pub fn with_context(mut self, context: RequestContext) -> Self {
        self.context = context;
        self
    }

    /// The most recently decoded page
    pub fn current_page(&self) -> &Page<T> {
        &self.page
    }

    /// Whether the current page carried a continuation token
    pub fn has_next(&self) -> bool {
        self.page.has_next()
    }

    /// Number of pages decoded so far, the first page included
    pub fn pages_fetched(&self) -> usize {
        self.pages_fetched
    }

    /// The request that produced the current page
    pub fn request(&self) -> &RequestTemplate {
        &self.request
    }

    /// Fetch and decode the next page, replacing the current one
    ///
    /// Returns `NoMorePages` when the current page has no token. Any other
    /// failure is wrapped in `Error::Fetch` and leaves the enumerator where
    /// it was, so calling again retries the same page.
    pub async fn fetch_next(&mut self) -> Result<&Page<T>> {
        let Some(token) = self.page.continuation_token().map(str::to_string) else {
            return Err(Error::NoMorePages);
        };

        match self.load(&token).await {
            Ok((request, page)) => {
                self.pages_fetched += 1;
                debug!(
                    url = %request.url,
                    page = self.pages_fetched,
                    items = page.len(),
                    has_next = page.has_next(),
                    "Fetched page"
                );
                self.request = request;
                self.page = page;
                Ok(&self.page)
            }
            Err(e) => {
                warn!(url = %self.request.url, error = %e, "Failed to fetch next page");
                Err(Error::fetch(e))
            }
        }
    }

    async fn load(&self, token: &str) -> Result<(RequestTemplate, Page<T>)> {
        let next = self
            .paging
            .strategy
            .next_request(token, &self.request.query, &self.request.url)?;
        let request = self.request.with_target(next.url, next.query);

        let response = self.client.send(&request, &self.context).await?;
        let page = self.paging.decode_page(response.body.as_deref())?;
        Ok((request, page))
    }

    /// Stream every page, starting with the current one
    ///
    /// The stream ends after the last page, or right after yielding the first
    /// error.
    pub fn into_stream(self) -> impl Stream<Item = Result<Page<T>>> {
        stream::unfold((Some(self), true), |(state, first)| async move {
            let mut enumerator = state?;
            if !first {
                if !enumerator.has_next() {
                    return None;
                }
                if let Err(e) = enumerator.fetch_next().await.map(|_| ()) {
                    return Some((Err(e), (None, false)));
                }
            }
            let page = enumerator.page.take();
            Some((Ok(page), (Some(enumerator), false)))
        })
    }

    /// Wrap the enumerator so several tasks can share it
    pub fn into_shared(self) -> super::SharedPagedEnumerator<T> {
        super::SharedPagedEnumerator::new(self)
    }

    pub(super) fn take_page(&mut self) -> Page<T> {
        self.page.take()
    }
}

impl<T> std::fmt::Debug for PagedEnumerator<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PagedEnumerator")
            .field("url", &self.request.url.as_str())
            .field("query", &self.request.query)
            .field("items", &self.page.len())
            .field("has_next", &self.page.has_next())
            .field("pages_fetched", &self.pages_fetched)
            .finish_non_exhaustive()
    }
}
