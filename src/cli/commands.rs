//! CLI commands and argument parsing

use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Page through blob and chat service listings
#[derive(Parser, Debug)]
#[command(name = "cloud-pager")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Service configuration file (YAML)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Stop after this many pages (0 = all pages)
    #[arg(long, global = true, default_value = "0")]
    pub max_pages: usize,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List the containers of a storage account
    ListContainers {
        /// Only containers starting with this prefix
        #[arg(long)]
        prefix: Option<String>,

        /// Page size requested from the service
        #[arg(long)]
        max_results: Option<u32>,

        /// Include container metadata
        #[arg(long)]
        include_metadata: bool,

        /// Include soft-deleted containers
        #[arg(long)]
        include_deleted: bool,
    },

    /// List the blobs of a container
    ListBlobs {
        /// Container name
        container: String,

        /// Only blobs starting with this prefix
        #[arg(long)]
        prefix: Option<String>,

        /// List one hierarchy level, folding deeper blobs into prefixes (e.g. "/")
        #[arg(long)]
        delimiter: Option<String>,

        /// Page size requested from the service
        #[arg(long)]
        max_results: Option<u32>,

        /// Include blob metadata
        #[arg(long)]
        include_metadata: bool,
    },

    /// List chat threads
    ListThreads {
        /// Page size requested from the service
        #[arg(long)]
        max_page_size: Option<u32>,

        /// Only threads updated after this RFC 3339 time
        #[arg(long)]
        start_time: Option<DateTime<Utc>>,
    },

    /// List the messages of a chat thread
    ListMessages {
        /// Thread id
        thread_id: String,

        /// Page size requested from the service
        #[arg(long)]
        max_page_size: Option<u32>,

        /// Only messages sent after this RFC 3339 time
        #[arg(long)]
        start_time: Option<DateTime<Utc>>,
    },

    /// Validate the service configuration
    Validate,
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output (one item per line)
    Json,
    /// Human-readable output
    Pretty,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_list_blobs() {
        let cli = Cli::try_parse_from([
            "cloud-pager",
            "list-blobs",
            "logs",
            "--config",
            "blob.yaml",
            "--delimiter",
            "/",
            "--max-pages",
            "2",
        ])
        .unwrap();

        assert_eq!(cli.config, Some(PathBuf::from("blob.yaml")));
        assert_eq!(cli.max_pages, 2);
        assert_eq!(cli.format, OutputFormat::Json);
        match cli.command {
            Commands::ListBlobs {
                container,
                delimiter,
                include_metadata,
                ..
            } => {
                assert_eq!(container, "logs");
                assert_eq!(delimiter.as_deref(), Some("/"));
                assert!(!include_metadata);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_list_threads_start_time() {
        let cli = Cli::try_parse_from([
            "cloud-pager",
            "-c",
            "chat.yaml",
            "--format",
            "pretty",
            "list-threads",
            "--start-time",
            "2023-01-02T15:04:05Z",
        ])
        .unwrap();

        assert_eq!(cli.format, OutputFormat::Pretty);
        let Commands::ListThreads { start_time, .. } = cli.command else {
            panic!("expected list-threads");
        };
        assert_eq!(start_time.unwrap().to_rfc3339(), "2023-01-02T15:04:05+00:00");
    }

    #[test]
    fn test_parse_rejects_bad_time() {
        let result = Cli::try_parse_from([
            "cloud-pager",
            "list-messages",
            "t1",
            "--start-time",
            "yesterday",
        ]);
        assert!(result.is_err());
    }
}
