// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::ref_option)]
#![allow(clippy::unused_self)]
#![allow(clippy::struct_excessive_bools)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::match_wildcard_for_single_variants)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! # Cloud Pager
//!
//! Paged listing client for cloud storage and chat services.
//!
//! ## Features
//!
//! - **Paged Enumeration**: Walk list operations page by page, or as a stream
//! - **JSON and XML Bodies**: Items and continuation tokens found by field path
//! - **Pluggable Continuation**: Query parameter markers, next links, path segments
//! - **Credentials**: Bearer tokens with caching, or shared access signatures
//! - **Resilient Transport**: Retries, backoff and client-side rate limiting
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use cloud_pager::auth::Credential;
//! use cloud_pager::services::{BlobServiceClient, ClientOptions, ListContainersOptions};
//!
//! #[tokio::main]
//! async fn main() -> cloud_pager::Result<()> {
//!     let credential = Credential::signed_url("sv=2021-08-06&ss=b&sig=...")?;
//!     let client = BlobServiceClient::new(
//!         "https://myaccount.blob.core.windows.net",
//!         Some(credential),
//!         ClientOptions::new(),
//!     )?;
//!
//!     let mut pages = client.list_containers(ListContainersOptions::default()).await?;
//!     loop {
//!         for container in pages.current_page().items() {
//!             println!("{}", container.name);
//!         }
//!         if !pages.has_next() {
//!             break;
//!         }
//!         pages.fetch_next().await?;
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                        Service Clients                          │
//! │  list_containers()   list_blobs()   list_chat_threads() ...     │
//! └─────────────────────────────────────────────────────────────────┘
//!                                │
//! ┌──────────────────────────────┴──────────────────────────────────┐
//! │                       PagedEnumerator<T>                        │
//! │  current_page()   has_next()   fetch_next()   into_stream()     │
//! └─────────────────────────────────────────────────────────────────┘
//!                                │
//! ┌──────────┬───────────┬───────┴───────┬─────────────────────────┐
//! │   Auth   │   HTTP    │    Decode     │      Continuation       │
//! ├──────────┼───────────┼───────────────┼─────────────────────────┤
//! │ Bearer   │ Retry     │ JSON          │ Query parameter         │
//! │ SAS      │ Rate Limit│ XML           │ Next link               │
//! │          │ Backoff   │ Field paths   │ Path segment            │
//! └──────────┴───────────┴───────────────┴─────────────────────────┘
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Common types and type aliases
pub mod types;

/// Credentials and authentication policies
pub mod auth;

/// HTTP client with retry and rate limiting
pub mod http;

/// Response decoders (JSON, XML)
pub mod decode;

/// Paged enumeration and continuation strategies
pub mod pagination;

/// Typed listing items
pub mod models;

/// Blob and chat service clients
pub mod services;

/// Service configuration files
pub mod config;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

// Re-export commonly used types
pub use config::{load_config, load_config_from_str, ServiceConfig};
pub use pagination::{Page, PagedEnumerator, SharedPagedEnumerator};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
