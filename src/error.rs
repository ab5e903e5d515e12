//! Error types for cloud-pager
//!
//! This module defines the error hierarchy for the entire crate.
//! All public APIs return `Result<T, Error>` where Error is defined here.

use thiserror::Error;

/// The main error type for cloud-pager
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Configuration Errors
    // ============================================================================
    /// Invalid client, credential or file configuration
    #[error("Configuration error: {message}")]
    Configuration {
        /// What is wrong
        message: String,
    },

    /// A config file omits a field that has no default
    #[error("Missing required config field: {field}")]
    MissingConfigField {
        /// Field name
        field: String,
    },

    /// A `${VAR}` reference names an unset environment variable
    #[error("Undefined environment variable: {variable}")]
    UndefinedVariable {
        /// Variable name
        variable: String,
    },

    /// A config file is not valid YAML
    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    // ============================================================================
    // Authentication Errors
    // ============================================================================
    /// A credential could not produce a token
    #[error("Authentication failed: {message}")]
    Auth {
        /// What the credential reported
        message: String,
    },

    // ============================================================================
    // HTTP Errors
    // ============================================================================
    /// Transport failure from reqwest
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with a non-2xx status
    #[error("HTTP {status}: {body}")]
    HttpStatus {
        /// Status code
        status: u16,
        /// Response body, often a service error document
        body: String,
    },

    /// The service kept answering 429 after every retry
    #[error("Rate limited, retry after {retry_after_seconds}s")]
    RateLimited {
        /// Delay the service asked for
        retry_after_seconds: u64,
    },

    /// No response within the request timeout
    #[error("Request timeout after {timeout_ms}ms")]
    Timeout {
        /// Timeout that elapsed
        timeout_ms: u64,
    },

    /// Every attempt failed without a more specific error
    #[error("Max retries ({max_retries}) exceeded")]
    MaxRetriesExceeded {
        /// Retries allowed
        max_retries: u32,
    },

    /// A URL or continuation link does not parse
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    // ============================================================================
    // Decode Errors
    // ============================================================================
    /// A body does not parse, or an item does not match its model
    #[error("Failed to decode response: {message}")]
    Decode {
        /// Parser or schema message
        message: String,
    },

    /// A response carried no body where a page was expected
    #[error("Response body missing: {message}")]
    MissingData {
        /// Which response
        message: String,
    },

    // ============================================================================
    // Paging Errors
    // ============================================================================
    /// Fetching the next page failed; the enumerator kept its position
    #[error("Failed to fetch next page: {source}")]
    Fetch {
        /// Underlying failure
        #[source]
        source: Box<Error>,
    },

    /// Another task is already fetching the next page
    #[error("A page fetch is already in flight for this enumerator")]
    FetchInProgress,

    /// `fetch_next` was called after the last page
    #[error("No more pages: the last page carried no continuation token")]
    NoMorePages,

    // ============================================================================
    // I/O Errors
    // ============================================================================
    /// File or output stream failure
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // ============================================================================
    // Generic Errors
    // ============================================================================
    /// Any other failure, described in text
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a missing field error
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingConfigField {
            field: field.into(),
        }
    }

    /// Create an undefined variable error
    pub fn undefined_var(variable: impl Into<String>) -> Self {
        Self::UndefinedVariable {
            variable: variable.into(),
        }
    }

    /// Create an auth error
    pub fn auth(message: impl Into<String>) -> Self {
        Self::Auth {
            message: message.into(),
        }
    }

    /// Create an HTTP status error
    pub fn http_status(status: u16, body: impl Into<String>) -> Self {
        Self::HttpStatus {
            status,
            body: body.into(),
        }
    }

    /// Create a decode error
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// Create a missing data error
    pub fn missing_data(message: impl Into<String>) -> Self {
        Self::MissingData {
            message: message.into(),
        }
    }

    /// Wrap the cause of a failed page fetch
    pub fn fetch(cause: Error) -> Self {
        Self::Fetch {
            source: Box::new(cause),
        }
    }

    /// The underlying cause when this is a fetch error, otherwise `self`
    pub fn root_cause(&self) -> &Error {
        match self {
            Error::Fetch { source } => source.root_cause(),
            other => other,
        }
    }

    /// Check if this error is retryable
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Http(_) | Error::RateLimited { .. } | Error::Timeout { .. } => true,
            Error::HttpStatus { status, .. } => is_retryable_status(*status),
            Error::Fetch { source } => source.is_retryable(),
            _ => false,
        }
    }
}

/// Check if an HTTP status code is retryable
fn is_retryable_status(status: u16) -> bool {
    matches!(status, 429 | 500 | 502 | 503 | 504)
}

/// Result type alias for cloud-pager
pub type Result<T> = std::result::Result<T, Error>;

/// Describe the step that failed in front of an error
pub trait ResultExt<T> {
    /// Turn any error into `Error::Other("{message}: {error}")`
    fn context(self, message: &str) -> Result<T>;
}

impl<T, E: std::fmt::Display> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, message: &str) -> Result<T> {
        self.map_err(|e| Error::Other(format!("{message}: {e}")))
    }
}
