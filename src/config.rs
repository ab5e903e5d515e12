//! Service configuration loaded from YAML
//!
//! One file describes one service endpoint, its credential and transport
//! settings:
//!
//! ```yaml
//! service: blob
//! endpoint: https://myaccount.blob.core.windows.net
//! credential:
//!   type: sas
//!   token: ${STORAGE_SAS}
//! http:
//!   timeout_seconds: 30
//!   max_retries: 3
//! ```
//!
//! `${VAR}` in any string value is replaced with the environment variable.

use crate::auth::{Credential, StaticTokenCredential};
use crate::error::{Error, Result};
use crate::http::{HttpClientConfig, RateLimit};
use crate::services::{parse_endpoint, ClientOptions};
use crate::types::{BackoffType, OptionStringExt};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::sync::LazyLock;
use std::time::Duration;

/// Regex for environment references: ${VAR_NAME}
static ENV_VAR_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}").unwrap());

// ============================================================================
// Top-Level Config
// ============================================================================

/// Which service the endpoint belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceKind {
    /// Blob storage (XML listings)
    Blob,
    /// Chat (JSON listings)
    Chat,
}

impl std::fmt::Display for ServiceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Blob => write!(f, "blob"),
            Self::Chat => write!(f, "chat"),
        }
    }
}

/// Complete service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Service kind
    pub service: ServiceKind,

    /// Service endpoint URL
    pub endpoint: String,

    /// Credential, anonymous when omitted
    #[serde(default)]
    pub credential: CredentialConfig,

    /// API version override
    #[serde(default)]
    pub api_version: Option<String>,

    /// Transport settings
    #[serde(default)]
    pub http: HttpSettings,
}

/// Credential definition
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum CredentialConfig {
    /// No credential
    #[default]
    None,
    /// Static bearer token
    Token {
        /// Access token
        token: String,
    },
    /// Shared access signature appended to every request
    Sas {
        /// Signature query string
        token: String,
    },
}

/// Transport settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpSettings {
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,

    /// Maximum number of retries
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Backoff between retries
    #[serde(default)]
    pub backoff: BackoffType,

    /// First backoff delay in milliseconds
    #[serde(default = "default_initial_backoff")]
    pub initial_backoff_ms: u64,

    /// Backoff cap in milliseconds
    #[serde(default = "default_max_backoff")]
    pub max_backoff_ms: u64,

    /// Client-side rate limit, `0` disables it
    #[serde(default)]
    pub requests_per_second: Option<u32>,

    /// Largest burst of requests, defaults to `requests_per_second`
    #[serde(default)]
    pub burst: Option<u32>,

    /// User agent override
    #[serde(default)]
    pub user_agent: Option<String>,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            timeout_seconds: default_timeout(),
            max_retries: default_max_retries(),
            backoff: BackoffType::default(),
            initial_backoff_ms: default_initial_backoff(),
            max_backoff_ms: default_max_backoff(),
            requests_per_second: None,
            burst: None,
            user_agent: None,
        }
    }
}

fn default_timeout() -> u64 {
    30
}

fn default_max_retries() -> u32 {
    3
}

fn default_initial_backoff() -> u64 {
    100
}

fn default_max_backoff() -> u64 {
    60_000
}

// ============================================================================
// Conversion
// ============================================================================

impl HttpSettings {
    /// Build the HTTP client config
    pub fn to_client_config(&self) -> HttpClientConfig {
        let mut builder = HttpClientConfig::builder()
            .timeout(Duration::from_secs(self.timeout_seconds))
            .max_retries(self.max_retries)
            .backoff(
                self.backoff,
                Duration::from_millis(self.initial_backoff_ms),
                Duration::from_millis(self.max_backoff_ms),
            );

        let limit = match self.requests_per_second {
            Some(rps) => RateLimit::per_second(rps),
            None => Some(RateLimit::default()),
        };
        builder = match limit {
            Some(limit) => builder.rate_limit(limit.with_burst(self.burst.unwrap_or(0))),
            None => builder.no_rate_limit(),
        };

        if let Some(agent) = self.user_agent.clone().none_if_empty() {
            builder = builder.user_agent(agent);
        }
        builder.build()
    }
}

impl ServiceConfig {
    /// Check the endpoint and the credential without building a client
    pub fn validate(&self) -> Result<()> {
        parse_endpoint(&self.endpoint)?;
        let credential = self.credential()?;

        if self.service == ServiceKind::Chat && !matches!(credential, Some(Credential::Token(_))) {
            return Err(Error::configuration(
                "Chat service requires a credential of type 'token'",
            ));
        }
        Ok(())
    }

    /// Resolve the configured credential
    pub fn credential(&self) -> Result<Option<Credential>> {
        match &self.credential {
            CredentialConfig::None => Ok(None),
            CredentialConfig::Token { token } => {
                if token.trim().is_empty() {
                    return Err(Error::configuration("Credential token cannot be empty"));
                }
                Ok(Some(Credential::token(StaticTokenCredential::new(
                    token.trim(),
                ))))
            }
            CredentialConfig::Sas { token } => Credential::signed_url(token).map(Some),
        }
    }

    /// Client options for the service clients
    pub fn client_options(&self) -> ClientOptions {
        let options = ClientOptions::new().http(self.http.to_client_config());
        match self.api_version.clone().none_if_empty() {
            Some(version) => options.api_version(version),
            None => options,
        }
    }
}

// ============================================================================
// Loading
// ============================================================================

/// Load a service config from a YAML file
pub fn load_config(path: impl AsRef<Path>) -> Result<ServiceConfig> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| {
        Error::configuration(format!(
            "Failed to read config file '{}': {}",
            path.display(),
            e
        ))
    })?;
    load_config_from_str(&content)
}

/// Load a service config from a YAML string
pub fn load_config_from_str(yaml: &str) -> Result<ServiceConfig> {
    let mut raw: serde_yaml::Value = serde_yaml::from_str(yaml)?;
    expand_env_in_value(&mut raw)?;

    let config: ServiceConfig = serde_yaml::from_value(raw)
        .map_err(|e| Error::configuration(format!("Invalid service config: {e}")))?;

    if config.endpoint.trim().is_empty() {
        return Err(Error::missing_field("endpoint"));
    }
    Ok(config)
}

/// Replace `${VAR}` references with environment values
pub fn expand_env(input: &str) -> Result<String> {
    let mut missing = None;
    let expanded = ENV_VAR_REGEX.replace_all(input, |caps: &regex::Captures<'_>| {
        let name = &caps[1];
        std::env::var(name).unwrap_or_else(|_| {
            missing.get_or_insert_with(|| name.to_string());
            String::new()
        })
    });

    match missing {
        Some(variable) => Err(Error::undefined_var(variable)),
        None => Ok(expanded.into_owned()),
    }
}

fn expand_env_in_value(value: &mut serde_yaml::Value) -> Result<()> {
    match value {
        serde_yaml::Value::String(s) => {
            if s.contains("${") {
                *s = expand_env(s)?;
            }
        }
        serde_yaml::Value::Sequence(items) => {
            for item in items {
                expand_env_in_value(item)?;
            }
        }
        serde_yaml::Value::Mapping(map) => {
            for (_, item) in map.iter_mut() {
                expand_env_in_value(item)?;
            }
        }
        serde_yaml::Value::Tagged(tagged) => expand_env_in_value(&mut tagged.value)?,
        _ => {}
    }
    Ok(())
}
