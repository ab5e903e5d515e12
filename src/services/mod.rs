//! Service clients
//!
//! Thin clients for the blob and chat list operations. Each one builds the
//! first request, sends it through its issuing client and hands back a
//! [`PagedEnumerator`](crate::pagination::PagedEnumerator) for the rest.

mod blob;
mod chat;

pub use blob::{
    BlobServiceClient, ContainerClient, ListBlobsOptions, ListContainersOptions, BLOB_API_VERSION,
    STORAGE_SCOPE,
};
pub use chat::{
    ChatClient, ChatThreadClient, ListChatThreadsOptions, ListMessagesOptions, CHAT_API_VERSION,
    CHAT_SCOPE,
};

use crate::error::{Error, Result};
use crate::http::{HttpClientConfig, RequestContext};
use url::Url;

/// Options shared by the service clients
#[derive(Debug, Clone, Default)]
pub struct ClientOptions {
    /// Transport settings
    pub http: HttpClientConfig,
    /// Service API version, the client's default when unset
    pub api_version: Option<String>,
    /// Per-request options applied to every request
    pub context: RequestContext,
}

impl ClientOptions {
    /// Create default options
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the transport settings
    #[must_use]
    pub fn http(mut self, http: HttpClientConfig) -> Self {
        self.http = http;
        self
    }

    /// Override the API version
    #[must_use]
    pub fn api_version(mut self, version: impl Into<String>) -> Self {
        self.api_version = Some(version.into());
        self
    }

    /// Set the per-request context
    #[must_use]
    pub fn context(mut self, context: RequestContext) -> Self {
        self.context = context;
        self
    }
}

/// Parse a service endpoint, requiring an absolute http(s) URL with a host
pub fn parse_endpoint(endpoint: &str) -> Result<Url> {
    let url = Url::parse(endpoint.trim())
        .map_err(|e| Error::configuration(format!("Invalid endpoint '{endpoint}': {e}")))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(Error::configuration(format!(
            "Endpoint must use http or https: {endpoint}"
        )));
    }
    if url.host_str().map_or(true, str::is_empty) {
        return Err(Error::configuration(format!(
            "Endpoint has no host: {endpoint}"
        )));
    }
    Ok(url)
}

/// Endpoint URL with `segments` appended to its path
pub(crate) fn endpoint_path(endpoint: &Url, segments: &[&str]) -> Result<Url> {
    let mut url = endpoint.clone();
    url.set_query(None);
    url.set_fragment(None);
    url.path_segments_mut()
        .map_err(|()| Error::configuration(format!("Endpoint cannot take a path: {endpoint}")))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

#[cfg(test)]
mod tests;
