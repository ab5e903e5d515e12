//! Chat service client

use super::{endpoint_path, parse_endpoint, ClientOptions};
use crate::auth::{AuthPolicy, Credential};
use crate::decode::FieldPaths;
use crate::error::{Error, Result};
use crate::http::{HttpClient, IssuingClient, RequestContext, RequestTemplate};
use crate::models::{ChatMessage, ChatThreadItem};
use crate::pagination::{PagedEnumerator, PagingConfig};
use crate::types::Method;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::info;
use url::Url;

/// Default `api-version` of the chat service
pub const CHAT_API_VERSION: &str = "2021-09-07";

/// Token scope for communication services
pub const CHAT_SCOPE: &str = "https://communication.azure.com/.default";

/// Options for [`ChatClient::list_chat_threads`]
#[derive(Debug, Clone, Default)]
pub struct ListChatThreadsOptions {
    /// Page size requested from the service
    pub max_page_size: Option<u32>,
    /// Only threads updated after this time
    pub start_time: Option<DateTime<Utc>>,
}

/// Options for [`ChatThreadClient::list_messages`]
#[derive(Debug, Clone, Default)]
pub struct ListMessagesOptions {
    /// Page size requested from the service
    pub max_page_size: Option<u32>,
    /// Only messages sent after this time
    pub start_time: Option<DateTime<Utc>>,
}

fn format_time(time: DateTime<Utc>) -> String {
    time.to_rfc3339_opts(SecondsFormat::Secs, true)
}

fn value_paging() -> PagingConfig {
    PagingConfig::json_next_link(FieldPaths::json("value", "nextLink"))
}

/// Client for a communication resource's chat endpoint
#[derive(Clone)]
pub struct ChatClient {
    endpoint: Url,
    client: Arc<dyn IssuingClient>,
    api_version: String,
    context: RequestContext,
}

impl ChatClient {
    /// Create a client
    ///
    /// Chat only accepts token credentials; a signed URL credential is a
    /// configuration error.
    pub fn new(endpoint: &str, credential: Credential, options: ClientOptions) -> Result<Self> {
        if matches!(credential, Credential::SignedUrl(_)) {
            return Err(Error::configuration(
                "Chat client requires a token credential, not a signed URL",
            ));
        }

        let policy = AuthPolicy::from_credential(credential, vec![CHAT_SCOPE.to_string()]);
        let http = HttpClient::with_auth(options.http.clone(), policy)?;
        Self::with_client(endpoint, Arc::new(http), options)
    }

    /// Create a client that sends through an existing issuing client
    pub fn with_client(
        endpoint: &str,
        client: Arc<dyn IssuingClient>,
        options: ClientOptions,
    ) -> Result<Self> {
        Ok(Self {
            endpoint: parse_endpoint(endpoint)?,
            client,
            api_version: options
                .api_version
                .unwrap_or_else(|| CHAT_API_VERSION.to_string()),
            context: options.context,
        })
    }

    /// Service endpoint
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// API version sent as `api-version`
    pub fn api_version(&self) -> &str {
        &self.api_version
    }

    /// Client for one thread
    pub fn chat_thread_client(&self, thread_id: impl Into<String>) -> ChatThreadClient {
        ChatThreadClient {
            chat: self.clone(),
            thread_id: thread_id.into(),
        }
    }

    /// List the threads the caller participates in
    pub async fn list_chat_threads(
        &self,
        options: ListChatThreadsOptions,
    ) -> Result<PagedEnumerator<ChatThreadItem>> {
        info!(endpoint = %self.endpoint, "Listing chat threads");

        let request = self
            .request(&["chat", "threads"])?
            .query_opt("maxPageSize", options.max_page_size)
            .query_opt("startTime", options.start_time.map(format_time));
        self.start(request).await
    }

    fn request(&self, segments: &[&str]) -> Result<RequestTemplate> {
        let url = endpoint_path(&self.endpoint, segments)?;
        Ok(RequestTemplate::new(Method::GET, url)
            .header("Accept", "application/json")
            .query("api-version", &self.api_version))
    }

    async fn start<T: DeserializeOwned>(
        &self,
        request: RequestTemplate,
    ) -> Result<PagedEnumerator<T>> {
        PagedEnumerator::start(
            Arc::clone(&self.client),
            request,
            self.context.clone(),
            value_paging(),
        )
        .await
    }
}

impl std::fmt::Debug for ChatClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatClient")
            .field("endpoint", &self.endpoint.as_str())
            .field("api_version", &self.api_version)
            .finish_non_exhaustive()
    }
}

/// Client for one chat thread
#[derive(Debug, Clone)]
pub struct ChatThreadClient {
    chat: ChatClient,
    thread_id: String,
}

impl ChatThreadClient {
    /// Thread id
    pub fn thread_id(&self) -> &str {
        &self.thread_id
    }

    /// List the thread's messages
    pub async fn list_messages(
        &self,
        options: ListMessagesOptions,
    ) -> Result<PagedEnumerator<ChatMessage>> {
        info!(thread = %self.thread_id, "Listing chat messages");

        let request = self
            .chat
            .request(&["chat", "threads", self.thread_id.as_str(), "messages"])?
            .query_opt("maxPageSize", options.max_page_size)
            .query_opt("startTime", options.start_time.map(format_time));
        self.chat.start(request).await
    }
}
