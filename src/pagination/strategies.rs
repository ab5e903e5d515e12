//! Continuation strategy implementations
//!
//! Each strategy decides where a continuation token travels in the next
//! request: a query parameter, a full next-page link, or a path segment.

use crate::error::{Error, Result};
use crate::types::QueryParams;
use url::Url;

/// Target of the next page request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContinuationRequest {
    /// URL without query string
    pub url: Url,
    /// Complete query parameters for the next request
    pub query: QueryParams,
}

/// Builds the next page request from a continuation token
///
/// Receives the token, the query parameters of the last request and its URL
/// (without query string). Closures with the same signature implement this
/// trait.
pub trait ContinuationStrategy: Send + Sync {
    /// Compute the next request target
    fn next_request(&self, token: &str, query: &QueryParams, url: &Url)
        -> Result<ContinuationRequest>;
}

impl<F> ContinuationStrategy for F
where
    F: Fn(&str, &QueryParams, &Url) -> Result<ContinuationRequest> + Send + Sync,
{
    fn next_request(
        &self,
        token: &str,
        query: &QueryParams,
        url: &Url,
    ) -> Result<ContinuationRequest> {
        self(token, query, url)
    }
}

// ============================================================================
// Query Parameter Continuation
// ============================================================================

/// Token sent as a query parameter (e.g., blob service `?marker=...`)
#[derive(Debug, Clone)]
pub struct QueryParamContinuation {
    /// Query parameter name
    pub param: String,
}

impl QueryParamContinuation {
    /// Create a strategy for the given parameter name
    pub fn new(param: impl Into<String>) -> Self {
        Self {
            param: param.into(),
        }
    }
}

impl ContinuationStrategy for QueryParamContinuation {
    fn next_request(
        &self,
        token: &str,
        query: &QueryParams,
        url: &Url,
    ) -> Result<ContinuationRequest> {
        let mut query = query.clone();
        query.insert(self.param.clone(), token.to_string());
        Ok(ContinuationRequest {
            url: url.clone(),
            query,
        })
    }
}

// ============================================================================
// Next Link Continuation
// ============================================================================

/// Token is the URL of the next page (e.g., chat service `nextLink`)
///
/// Relative links resolve against the last request URL. Query pairs in the
/// link override the previous request's parameters; the rest are kept so
/// values like `api-version` survive links that omit them.
#[derive(Debug, Clone, Default)]
pub struct NextLinkContinuation;

impl NextLinkContinuation {
    /// Create a next link strategy
    pub fn new() -> Self {
        Self
    }
}

impl ContinuationStrategy for NextLinkContinuation {
    fn next_request(
        &self,
        token: &str,
        query: &QueryParams,
        url: &Url,
    ) -> Result<ContinuationRequest> {
        let mut next = url.join(token)?;
        let mut merged = query.clone();
        merged.extend(next.query_pairs().into_owned());
        next.set_query(None);
        next.set_fragment(None);
        Ok(ContinuationRequest {
            url: next,
            query: merged,
        })
    }
}

// ============================================================================
// Path Segment Continuation
// ============================================================================

/// Token embedded as the last path segment under a fixed base path
///
/// `PathSegmentContinuation::new("/threads/pages")` turns token `abc` into
/// `/threads/pages/abc`. The token is percent-encoded.
#[derive(Debug, Clone)]
pub struct PathSegmentContinuation {
    /// Path the token is appended to
    pub base_path: String,
}

impl PathSegmentContinuation {
    /// Create a strategy appending tokens to `base_path`
    pub fn new(base_path: impl Into<String>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }
}

impl ContinuationStrategy for PathSegmentContinuation {
    fn next_request(
        &self,
        token: &str,
        query: &QueryParams,
        url: &Url,
    ) -> Result<ContinuationRequest> {
        let mut next = url.clone();
        next.set_path(self.base_path.trim_end_matches('/'));
        next.path_segments_mut()
            .map_err(|()| Error::configuration(format!("URL cannot take path segments: {url}")))?
            .push(token);
        Ok(ContinuationRequest {
            url: next,
            query: query.clone(),
        })
    }
}
