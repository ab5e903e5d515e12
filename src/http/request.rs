//! Request templates, responses and the issuing client contract

use crate::error::Result;
use crate::types::{Method, QueryParams, StringMap};
use async_trait::async_trait;
use bytes::Bytes;
use reqwest::header::HeaderMap;
use std::time::Duration;
use url::Url;

/// Immutable description of a request, cloned and mutated per page fetch
///
/// The URL never carries a query string; all query parameters live in
/// `query` so continuation strategies can rewrite them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestTemplate {
    /// HTTP method
    pub method: Method,
    /// URL without query string
    pub url: Url,
    /// Request headers
    pub headers: StringMap,
    /// Query parameters
    pub query: QueryParams,
}

impl RequestTemplate {
    /// Create a template, moving any query pairs on `url` into `query`
    pub fn new(method: Method, mut url: Url) -> Self {
        let query: QueryParams = url.query_pairs().into_owned().collect();
        url.set_query(None);
        url.set_fragment(None);
        Self {
            method,
            url,
            headers: StringMap::new(),
            query,
        }
    }

    /// Parse a URL string and create a GET template
    pub fn get(url: &str) -> Result<Self> {
        Ok(Self::new(Method::GET, Url::parse(url)?))
    }

    /// Add a query parameter
    #[must_use]
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.insert(key.into(), value.into());
        self
    }

    /// Add a query parameter when a value is present
    #[must_use]
    pub fn query_opt<V: ToString>(self, key: &str, value: Option<V>) -> Self {
        match value {
            Some(v) => self.query(key, v.to_string()),
            None => self,
        }
    }

    /// Add a header
    #[must_use]
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Copy of this template with a new URL and query, keeping method and headers
    #[must_use]
    pub fn with_target(&self, url: Url, query: QueryParams) -> Self {
        let mut next = Self::new(self.method, url);
        next.headers = self.headers.clone();
        next.query.extend(query);
        next
    }

    /// URL with the query parameters applied
    pub fn resolved_url(&self) -> Url {
        let mut url = self.url.clone();
        if !self.query.is_empty() {
            url.query_pairs_mut().extend_pairs(self.query.iter());
        }
        url
    }
}

/// Per-request options passed alongside a template
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    /// Extra headers for this request
    pub headers: StringMap,
    /// Override timeout for this request
    pub timeout: Option<Duration>,
    /// Override max retries for this request
    pub max_retries: Option<u32>,
}

impl RequestContext {
    /// Create an empty context
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a header
    #[must_use]
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Set timeout
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set max retries
    #[must_use]
    pub fn retries(mut self, retries: u32) -> Self {
        self.max_retries = Some(retries);
        self
    }
}

/// Status and headers of a response
#[derive(Debug, Clone, Default)]
pub struct ResponseMetadata {
    /// HTTP status code
    pub status: u16,
    /// Service request id (`x-ms-request-id`), if sent
    pub request_id: Option<String>,
    /// All response headers
    pub headers: HeaderMap,
}

impl ResponseMetadata {
    /// Create metadata from a status and headers
    pub fn new(status: u16, headers: HeaderMap) -> Self {
        let request_id = headers
            .get("x-ms-request-id")
            .and_then(|v| v.to_str().ok())
            .map(String::from);
        Self {
            status,
            request_id,
            headers,
        }
    }
}

/// A successful response as seen by the enumerator
#[derive(Debug, Clone)]
pub struct RawResponse {
    /// Body bytes, `None` when the response had no content
    pub body: Option<Bytes>,
    /// Status and headers
    pub metadata: ResponseMetadata,
}

impl RawResponse {
    /// Create a response with no headers
    pub fn new(status: u16, body: Option<Bytes>) -> Self {
        Self {
            body: body.filter(|b| !b.is_empty()),
            metadata: ResponseMetadata::new(status, HeaderMap::new()),
        }
    }

    /// Create a 200 response carrying `body`
    pub fn ok(body: impl Into<Bytes>) -> Self {
        Self::new(200, Some(body.into()))
    }
}

/// Client that owns the transport and authentication pipeline
///
/// The paged enumerator re-sends every continuation request through the
/// client that issued the first one and never builds its own transport.
/// Non-2xx responses are returned as errors.
#[async_trait]
pub trait IssuingClient: Send + Sync {
    /// Send a request through the pipeline
    async fn send(&self, request: &RequestTemplate, context: &RequestContext)
        -> Result<RawResponse>;
}
