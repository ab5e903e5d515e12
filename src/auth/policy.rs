//! Authentication policy
//!
//! Handles applying a resolved credential to requests and caching bearer tokens.

use super::types::{AccessToken, Credential, SasToken};
use crate::error::{Error, Result};
use async_trait::async_trait;
use reqwest::RequestBuilder;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

/// Source of bearer tokens
///
/// Token acquisition flows live outside this crate; implement this trait to
/// plug one in.
#[async_trait]
pub trait TokenCredential: Send + Sync {
    /// Get an access token valid for the given scopes
    async fn get_token(&self, scopes: &[String]) -> Result<AccessToken>;
}

/// Token credential returning a fixed token
#[derive(Clone)]
pub struct StaticTokenCredential {
    token: AccessToken,
}

impl StaticTokenCredential {
    /// Create a credential for a token that never expires
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: AccessToken::new(token, None),
        }
    }

    /// Create a credential from an access token with expiration
    pub fn from_token(token: AccessToken) -> Self {
        Self { token }
    }
}

#[async_trait]
impl TokenCredential for StaticTokenCredential {
    async fn get_token(&self, _scopes: &[String]) -> Result<AccessToken> {
        if self.token.token.is_empty() {
            return Err(Error::auth("Static token is empty"));
        }
        Ok(self.token.clone())
    }
}

impl std::fmt::Debug for StaticTokenCredential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StaticTokenCredential")
            .field("expires_at", &self.token.expires_at)
            .finish_non_exhaustive()
    }
}

/// Authentication policy applied by the issuing client to every request
pub enum AuthPolicy {
    /// `Authorization: Bearer` header from a token credential
    Bearer {
        /// Token source
        credential: Arc<dyn TokenCredential>,
        /// Scopes requested from the credential
        scopes: Vec<String>,
        /// Cached token
        cached_token: Arc<RwLock<Option<AccessToken>>>,
    },
    /// SAS query pairs appended to the URL
    SignedUrl {
        /// The signature
        sas: SasToken,
    },
}

impl AuthPolicy {
    /// Resolve a credential into its policy
    pub fn from_credential(credential: Credential, scopes: Vec<String>) -> Self {
        match credential {
            Credential::Token(credential) => Self::Bearer {
                credential,
                scopes,
                cached_token: Arc::new(RwLock::new(None)),
            },
            Credential::SignedUrl(sas) => Self::SignedUrl { sas },
        }
    }

    /// Apply authentication to a request builder
    pub async fn apply(&self, req: RequestBuilder) -> Result<RequestBuilder> {
        match self {
            AuthPolicy::Bearer { .. } => {
                let token = self.get_or_refresh_token().await?;
                Ok(req.bearer_auth(token))
            }
            AuthPolicy::SignedUrl { sas } => Ok(req.query(sas.pairs())),
        }
    }

    /// Get a valid token, refreshing if necessary
    async fn get_or_refresh_token(&self) -> Result<String> {
        let AuthPolicy::Bearer {
            credential,
            scopes,
            cached_token,
        } = self
        else {
            return Err(Error::auth("Policy does not use bearer tokens"));
        };

        {
            let cached = cached_token.read().await;
            if let Some(token) = cached.as_ref() {
                if !token.is_expired() {
                    return Ok(token.token.clone());
                }
            }
        }

        let mut cached = cached_token.write().await;

        // Another task may have refreshed while we waited for the write lock
        if let Some(token) = cached.as_ref() {
            if !token.is_expired() {
                return Ok(token.token.clone());
            }
        }

        debug!("Requesting access token for scopes {:?}", scopes);
        let new_token = credential.get_token(scopes).await?;
        let token_str = new_token.token.clone();
        *cached = Some(new_token);

        Ok(token_str)
    }

    /// Clear the cached token, forcing a refresh on the next request
    pub async fn clear_cache(&self) {
        if let AuthPolicy::Bearer { cached_token, .. } = self {
            *cached_token.write().await = None;
        }
    }

    /// Short name of the policy, for logs
    pub fn kind(&self) -> &'static str {
        match self {
            AuthPolicy::Bearer { .. } => "bearer",
            AuthPolicy::SignedUrl { .. } => "signed_url",
        }
    }
}

impl std::fmt::Debug for AuthPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthPolicy::Bearer { scopes, .. } => f
                .debug_struct("Bearer")
                .field("scopes", scopes)
                .finish_non_exhaustive(),
            AuthPolicy::SignedUrl { sas } => f.debug_struct("SignedUrl").field("sas", sas).finish(),
        }
    }
}
