//! CLI module
//!
//! Command-line interface for paging through service listings.
//!
//! # Commands
//!
//! - `list-containers` - List the containers of a storage account
//! - `list-blobs` - List the blobs of a container
//! - `list-threads` - List chat threads
//! - `list-messages` - List the messages of a chat thread
//! - `validate` - Check the service configuration

mod commands;
mod runner;

pub use commands::{Cli, Commands, OutputFormat};
pub use runner::Runner;
