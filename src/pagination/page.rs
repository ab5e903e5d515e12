//! Decoded pages and the paging configuration of a list operation

use super::strategies::{ContinuationStrategy, NextLinkContinuation, QueryParamContinuation};
use crate::decode::{BodyDecoder, FieldPaths, JsonBodyDecoder, XmlBodyDecoder};
use crate::error::{Error, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;

/// One decoded batch of items plus an optional continuation token
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    items: Vec<T>,
    continuation_token: Option<String>,
}

impl<T> Page<T> {
    /// Create a page
    ///
    /// An empty token is stored as absent.
    pub fn new(items: Vec<T>, continuation_token: Option<String>) -> Self {
        Self {
            items,
            continuation_token: continuation_token.filter(|t| !t.is_empty()),
        }
    }

    /// Items in document order
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Continuation token, `None` on the last page
    pub fn continuation_token(&self) -> Option<&str> {
        self.continuation_token.as_deref()
    }

    /// Whether another page can be fetched
    pub fn has_next(&self) -> bool {
        self.continuation_token.is_some()
    }

    /// Number of items
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the page has no items
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Consume the page, returning its items
    pub fn into_items(self) -> Vec<T> {
        self.items
    }

    /// Move the items out, leaving the token in place
    pub(crate) fn take(&mut self) -> Page<T> {
        Page {
            items: std::mem::take(&mut self.items),
            continuation_token: self.continuation_token.clone(),
        }
    }
}

impl<T> IntoIterator for Page<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

/// Field paths, body decoder and continuation strategy of one list operation
#[derive(Clone)]
pub struct PagingConfig {
    /// Where items and the token live in the body
    pub paths: FieldPaths,
    /// Body decoder
    pub decoder: Arc<dyn BodyDecoder>,
    /// How the token is injected into the next request
    pub strategy: Arc<dyn ContinuationStrategy>,
}

impl PagingConfig {
    /// Create a paging config
    pub fn new(
        paths: FieldPaths,
        decoder: Arc<dyn BodyDecoder>,
        strategy: Arc<dyn ContinuationStrategy>,
    ) -> Self {
        Self {
            paths,
            decoder,
            strategy,
        }
    }

    /// XML listing whose token is sent back as a query parameter
    pub fn xml_marker(paths: FieldPaths, param: impl Into<String>) -> Self {
        Self::new(
            paths,
            Arc::new(XmlBodyDecoder::new()),
            Arc::new(QueryParamContinuation::new(param)),
        )
    }

    /// JSON listing whose token is a next-page link
    pub fn json_next_link(paths: FieldPaths) -> Self {
        Self::new(
            paths,
            Arc::new(JsonBodyDecoder::new()),
            Arc::new(NextLinkContinuation::new()),
        )
    }

    /// Replace the continuation strategy
    #[must_use]
    pub fn with_strategy(mut self, strategy: impl ContinuationStrategy + 'static) -> Self {
        self.strategy = Arc::new(strategy);
        self
    }

    /// Decode a response body into a typed page
    ///
    /// Fails with `MissingData` when there is no body and with `Decode` when
    /// the body does not parse or an item does not match `T`.
    pub fn decode_page<T: DeserializeOwned>(&self, body: Option<&[u8]>) -> Result<Page<T>> {
        let body = match body {
            Some(body) if !body.is_empty() => body,
            _ => return Err(Error::missing_data("list response carried no body")),
        };

        let decoded = self.decoder.decode(body, &self.paths)?;
        let items = decoded
            .items
            .into_iter()
            .enumerate()
            .map(|(index, item)| {
                serde_json::from_value(item).map_err(|e| {
                    Error::decode(format!(
                        "item {index} at '{}' does not match the expected schema: {e}",
                        self.paths.items_path
                    ))
                })
            })
            .collect::<Result<Vec<T>>>()?;

        Ok(Page::new(items, decoded.continuation))
    }
}

impl std::fmt::Debug for PagingConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PagingConfig")
            .field("paths", &self.paths)
            .field("format", &self.decoder.format())
            .finish_non_exhaustive()
    }
}
