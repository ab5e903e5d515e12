//! Blob service client

use super::{endpoint_path, parse_endpoint, ClientOptions};
use crate::auth::{AuthPolicy, Credential};
use crate::decode::FieldPaths;
use crate::error::Result;
use crate::http::{HttpClient, IssuingClient, RequestContext, RequestTemplate};
use crate::models::{BlobItem, BlobListItem, ContainerItem};
use crate::pagination::{PagedEnumerator, PagingConfig};
use crate::types::Method;
use std::sync::Arc;
use tracing::info;
use url::Url;

/// Default `x-ms-version` sent to the blob service
pub const BLOB_API_VERSION: &str = "2021-08-06";

/// Token scope for storage
pub const STORAGE_SCOPE: &str = "https://storage.azure.com/.default";

/// Options for [`BlobServiceClient::list_containers`]
#[derive(Debug, Clone, Default)]
pub struct ListContainersOptions {
    /// Only containers whose name starts with this prefix
    pub prefix: Option<String>,
    /// Page size requested from the service
    pub max_results: Option<u32>,
    /// Include container metadata
    pub include_metadata: bool,
    /// Include soft-deleted containers
    pub include_deleted: bool,
}

/// Options for [`ContainerClient::list_blobs`]
#[derive(Debug, Clone, Default)]
pub struct ListBlobsOptions {
    /// Only blobs whose name starts with this prefix
    pub prefix: Option<String>,
    /// Page size requested from the service
    pub max_results: Option<u32>,
    /// Include blob metadata
    pub include_metadata: bool,
}

fn include_param(flags: &[(bool, &str)]) -> Option<String> {
    let values: Vec<&str> = flags
        .iter()
        .filter(|(on, _)| *on)
        .map(|(_, name)| *name)
        .collect();
    (!values.is_empty()).then(|| values.join(","))
}

/// Client for a storage account's blob endpoint
#[derive(Clone)]
pub struct BlobServiceClient {
    endpoint: Url,
    client: Arc<dyn IssuingClient>,
    api_version: String,
    context: RequestContext,
}

impl BlobServiceClient {
    /// Create a client; `None` sends anonymous requests
    pub fn new(
        endpoint: &str,
        credential: Option<Credential>,
        options: ClientOptions,
    ) -> Result<Self> {
        let mut http = HttpClient::with_config(options.http.clone())?;
        if let Some(credential) = credential {
            http.set_auth(AuthPolicy::from_credential(
                credential,
                vec![STORAGE_SCOPE.to_string()],
            ));
        }
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
                .unwrap_or_else(|| BLOB_API_VERSION.to_string()),
            context: options.context,
        })
    }

    /// Service endpoint
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// API version sent in `x-ms-version`
    pub fn api_version(&self) -> &str {
        &self.api_version
    }

    /// Client for one container
    pub fn container_client(&self, name: impl Into<String>) -> ContainerClient {
        ContainerClient {
            service: self.clone(),
            name: name.into(),
        }
    }

    /// List the account's containers
    pub async fn list_containers(
        &self,
        options: ListContainersOptions,
    ) -> Result<PagedEnumerator<ContainerItem>> {
        info!(endpoint = %self.endpoint, prefix = ?options.prefix, "Listing containers");

        let request = self
            .request(&[])?
            .query("comp", "list")
            .query_opt("prefix", options.prefix)
            .query_opt("maxresults", options.max_results)
            .query_opt(
                "include",
                include_param(&[
                    (options.include_metadata, "metadata"),
                    (options.include_deleted, "deleted"),
                ]),
            );

        let paging = PagingConfig::xml_marker(
            FieldPaths::xml(
                "EnumerationResults.Containers",
                "EnumerationResults.NextMarker",
                "Container",
            ),
            "marker",
        );
        self.start(request, paging).await
    }

    fn request(&self, segments: &[&str]) -> Result<RequestTemplate> {
        let url = endpoint_path(&self.endpoint, segments)?;
        Ok(RequestTemplate::new(Method::GET, url).header("x-ms-version", &self.api_version))
    }

    async fn start<T: serde::de::DeserializeOwned>(
        &self,
        request: RequestTemplate,
        paging: PagingConfig,
    ) -> Result<PagedEnumerator<T>> {
        PagedEnumerator::start(
            Arc::clone(&self.client),
            request,
            self.context.clone(),
            paging,
        )
        .await
    }
}

impl std::fmt::Debug for BlobServiceClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlobServiceClient")
            .field("endpoint", &self.endpoint.as_str())
            .field("api_version", &self.api_version)
            .finish_non_exhaustive()
    }
}

/// Client for one blob container
#[derive(Debug, Clone)]
pub struct ContainerClient {
    service: BlobServiceClient,
    name: String,
}

impl ContainerClient {
    /// Container name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// List every blob of the container, ignoring any hierarchy
    pub async fn list_blobs(&self, options: ListBlobsOptions) -> Result<PagedEnumerator<BlobItem>> {
        info!(container = %self.name, prefix = ?options.prefix, "Listing blobs");

        let request = self.list_request(options)?;
        let paging = PagingConfig::xml_marker(
            FieldPaths::xml(
                "EnumerationResults.Blobs",
                "EnumerationResults.NextMarker",
                "Blob",
            ),
            "marker",
        );
        self.service.start(request, paging).await
    }

    /// List one level of the container's hierarchy
    ///
    /// Blobs whose names continue past `delimiter` are folded into
    /// [`BlobListItem::BlobPrefix`] entries. Each page yields its prefixes
    /// first, then its blobs.
    pub async fn list_blobs_by_hierarchy(
        &self,
        delimiter: &str,
        options: ListBlobsOptions,
    ) -> Result<PagedEnumerator<BlobListItem>> {
        info!(
            container = %self.name,
            prefix = ?options.prefix,
            delimiter,
            "Listing blobs by hierarchy"
        );

        let request = self.list_request(options)?.query("delimiter", delimiter);
        let paging = PagingConfig::xml_marker(
            FieldPaths::xml_tagged(
                "EnumerationResults.Blobs",
                "EnumerationResults.NextMarker",
                &["BlobPrefix", "Blob"],
            ),
            "marker",
        );
        self.service.start(request, paging).await
    }

    fn list_request(&self, options: ListBlobsOptions) -> Result<RequestTemplate> {
        Ok(self
            .service
            .request(&[self.name.as_str()])?
            .query("restype", "container")
            .query("comp", "list")
            .query_opt("prefix", options.prefix)
            .query_opt("maxresults", options.max_results)
            .query_opt(
                "include",
                include_param(&[(options.include_metadata, "metadata")]),
            ))
    }
}
