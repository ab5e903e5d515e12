//! Credential types
//!
//! These types describe the credential variants an issuing client accepts.

use super::policy::TokenCredential;
use crate::error::{Error, Result};
use chrono::{DateTime, Utc};
use std::sync::Arc;

/// Credential used by a service client
///
/// Resolved once at client construction into an [`AuthPolicy`](super::AuthPolicy).
#[derive(Clone)]
pub enum Credential {
    /// Bearer token obtained from a token credential
    Token(Arc<dyn TokenCredential>),
    /// Shared access signature appended to every request URL
    SignedUrl(SasToken),
}

impl Credential {
    /// Create a token credential variant
    pub fn token(credential: impl TokenCredential + 'static) -> Self {
        Self::Token(Arc::new(credential))
    }

    /// Create a signed URL credential from a SAS query string
    pub fn signed_url(sas: &str) -> Result<Self> {
        SasToken::parse(sas).map(Self::SignedUrl)
    }

    /// Short name of the variant, for logs and error messages
    pub fn kind(&self) -> &'static str {
        match self {
            Credential::Token(_) => "token",
            Credential::SignedUrl(_) => "signed_url",
        }
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Credential::Token(_) => f.write_str("Token(..)"),
            Credential::SignedUrl(sas) => f.debug_tuple("SignedUrl").field(sas).finish(),
        }
    }
}

/// Shared access signature: a signed set of query parameters
#[derive(Clone, PartialEq, Eq)]
pub struct SasToken {
    pairs: Vec<(String, String)>,
}

impl SasToken {
    /// Parse a SAS query string such as `sv=2021-08-06&sp=rl&sig=...`
    ///
    /// A leading `?` is accepted. Values are percent-decoded so they can be
    /// re-encoded when attached to a request.
    pub fn parse(sas: &str) -> Result<Self> {
        let sas = sas.trim().trim_start_matches('?');
        let pairs: Vec<(String, String)> = url::form_urlencoded::parse(sas.as_bytes())
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .filter(|(k, _)| !k.is_empty())
            .collect();

        if !pairs.iter().any(|(k, v)| k == "sig" && !v.is_empty()) {
            return Err(Error::configuration(
                "SAS token must contain a non-empty 'sig' parameter",
            ));
        }

        Ok(Self { pairs })
    }

    /// Query pairs to attach to a request
    pub fn pairs(&self) -> &[(String, String)] {
        &self.pairs
    }
}

impl std::fmt::Debug for SasToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let keys: Vec<&str> = self.pairs.iter().map(|(k, _)| k.as_str()).collect();
        f.debug_struct("SasToken").field("keys", &keys).finish()
    }
}

/// Access token with optional expiration
#[derive(Debug, Clone)]
pub struct AccessToken {
    /// The bearer token
    pub token: String,
    /// When the token expires
    pub expires_at: Option<DateTime<Utc>>,
}

impl AccessToken {
    /// Create a new access token
    pub fn new(token: impl Into<String>, expires_at: Option<DateTime<Utc>>) -> Self {
        Self {
            token: token.into(),
            expires_at,
        }
    }

    /// Create a token that expires in N seconds from now
    pub fn expires_in(token: impl Into<String>, seconds: i64) -> Self {
        Self {
            token: token.into(),
            expires_at: Some(Utc::now() + chrono::Duration::seconds(seconds)),
        }
    }

    /// Check if the token is expired (with 30 second buffer)
    pub fn is_expired(&self) -> bool {
        match self.expires_at {
            Some(expires_at) => {
                let buffer = chrono::Duration::seconds(30);
                Utc::now() + buffer >= expires_at
            }
            None => false,
        }
    }
}
