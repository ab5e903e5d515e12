//! CLI runner - executes commands

use crate::auth::Credential;
use crate::cli::commands::{Cli, Commands, OutputFormat};
use crate::config::{load_config, ServiceConfig, ServiceKind};
use crate::error::{Error, Result, ResultExt};
use crate::pagination::PagedEnumerator;
use crate::services::{
    BlobServiceClient, ChatClient, ListBlobsOptions, ListChatThreadsOptions,
    ListContainersOptions, ListMessagesOptions,
};
use futures::StreamExt;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::json;
use std::io::Write;
use std::time::Instant;
use tracing::info;

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command, writing items to stdout
    pub async fn run(&self) -> Result<()> {
        let stdout = std::io::stdout();
        let mut out = stdout.lock();
        self.run_with(&mut out).await
    }

    /// Run the CLI command, writing items to `out`
    pub async fn run_with<W: Write>(&self, out: &mut W) -> Result<()> {
        let config = self.load_config()?;

        match &self.cli.command {
            Commands::ListContainers {
                prefix,
                max_results,
                include_metadata,
                include_deleted,
            } => {
                let client = self.blob_client(&config)?;
                let pages = client
                    .list_containers(ListContainersOptions {
                        prefix: prefix.clone(),
                        max_results: *max_results,
                        include_metadata: *include_metadata,
                        include_deleted: *include_deleted,
                    })
                    .await?;
                self.drain(pages, out).await
            }
            Commands::ListBlobs {
                container,
                prefix,
                delimiter,
                max_results,
                include_metadata,
            } => {
                let client = self.blob_client(&config)?.container_client(container);
                let options = ListBlobsOptions {
                    prefix: prefix.clone(),
                    max_results: *max_results,
                    include_metadata: *include_metadata,
                };
                match delimiter {
                    Some(delimiter) => {
                        let pages = client.list_blobs_by_hierarchy(delimiter, options).await?;
                        self.drain(pages, out).await
                    }
                    None => self.drain(client.list_blobs(options).await?, out).await,
                }
            }
            Commands::ListThreads {
                max_page_size,
                start_time,
            } => {
                let client = self.chat_client(&config)?;
                let pages = client
                    .list_chat_threads(ListChatThreadsOptions {
                        max_page_size: *max_page_size,
                        start_time: *start_time,
                    })
                    .await?;
                self.drain(pages, out).await
            }
            Commands::ListMessages {
                thread_id,
                max_page_size,
                start_time,
            } => {
                let client = self.chat_client(&config)?;
                let pages = client
                    .chat_thread_client(thread_id)
                    .list_messages(ListMessagesOptions {
                        max_page_size: *max_page_size,
                        start_time: *start_time,
                    })
                    .await?;
                self.drain(pages, out).await
            }
            Commands::Validate => self.validate(&config, out),
        }
    }

    /// Load the service configuration
    fn load_config(&self) -> Result<ServiceConfig> {
        let path = self
            .cli
            .config
            .as_ref()
            .ok_or_else(|| Error::configuration("Config file not specified (use -c flag)"))?;
        load_config(path)
    }

    fn blob_client(&self, config: &ServiceConfig) -> Result<BlobServiceClient> {
        Self::expect_service(config, ServiceKind::Blob)?;
        BlobServiceClient::new(
            &config.endpoint,
            config.credential()?,
            config.client_options(),
        )
    }

    fn chat_client(&self, config: &ServiceConfig) -> Result<ChatClient> {
        Self::expect_service(config, ServiceKind::Chat)?;
        let credential = config
            .credential()?
            .ok_or_else(|| Error::configuration("Chat service requires a credential"))?;
        ChatClient::new(&config.endpoint, credential, config.client_options())
    }

    fn expect_service(config: &ServiceConfig, expected: ServiceKind) -> Result<()> {
        if config.service == expected {
            Ok(())
        } else {
            Err(Error::configuration(format!(
                "This command needs a {expected} service config, found {}",
                config.service
            )))
        }
    }

    /// Write every item of every page, honouring `--max-pages`
    async fn drain<T, W>(&self, pages: PagedEnumerator<T>, out: &mut W) -> Result<()>
    where
        T: DeserializeOwned + Serialize,
        W: Write,
    {
        let start = Instant::now();
        let limit = match self.cli.max_pages {
            0 => usize::MAX,
            n => n,
        };

        let mut stream = Box::pin(pages.into_stream().take(limit));
        let mut page_count = 0usize;
        let mut item_count = 0usize;

        while let Some(page) = stream.next().await {
            let page = page?;
            page_count += 1;
            for item in page.items() {
                self.write_item(out, item)?;
                item_count += 1;
            }
        }

        info!(
            pages = page_count,
            items = item_count,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Listing complete"
        );
        Ok(())
    }

    /// Validate the service configuration
    fn validate<W: Write>(&self, config: &ServiceConfig, out: &mut W) -> Result<()> {
        config.validate()?;

        let credential = config.credential()?;
        self.write_item(
            out,
            &json!({
                "valid": true,
                "service": config.service,
                "endpoint": config.endpoint,
                "credential": credential.as_ref().map_or("none", Credential::kind),
            }),
        )
    }

    fn write_item<W: Write, T: Serialize + ?Sized>(&self, out: &mut W, item: &T) -> Result<()> {
        let line = match self.cli.format {
            OutputFormat::Json => serde_json::to_string(item),
            OutputFormat::Pretty => serde_json::to_string_pretty(item),
        }
        .context("Failed to serialize output")?;

        writeln!(out, "{line}").context("Failed to write output")
    }
}
