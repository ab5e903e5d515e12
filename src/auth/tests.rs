//! Tests for the auth module

use super::*;
use crate::error::{Error, Result};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Credential that counts how often it is asked for a token
struct CountingCredential {
    calls: AtomicUsize,
    lifetime_seconds: i64,
}

impl CountingCredential {
    fn new(lifetime_seconds: i64) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            lifetime_seconds,
        }
    }
}

#[async_trait]
impl TokenCredential for CountingCredential {
    async fn get_token(&self, scopes: &[String]) -> Result<AccessToken> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        assert_eq!(scopes, ["https://storage.azure.com/.default".to_string()]);
        Ok(AccessToken::expires_in(
            format!("token-{n}"),
            self.lifetime_seconds,
        ))
    }
}

fn storage_scopes() -> Vec<String> {
    vec!["https://storage.azure.com/.default".to_string()]
}

#[test]
fn test_sas_parse() {
    let sas = SasToken::parse("?sv=2021-08-06&sp=rl&sig=abc%3D").unwrap();
    assert_eq!(
        sas.pairs(),
        &[
            ("sv".to_string(), "2021-08-06".to_string()),
            ("sp".to_string(), "rl".to_string()),
            ("sig".to_string(), "abc=".to_string()),
        ]
    );
}

#[test]
fn test_sas_without_signature_is_configuration_error() {
    let err = SasToken::parse("sv=2021-08-06&sp=rl").unwrap_err();
    assert!(matches!(err, Error::Configuration { .. }));

    let err = SasToken::parse("sv=2021-08-06&sig=").unwrap_err();
    assert!(matches!(err, Error::Configuration { .. }));
}

#[test]
fn test_credential_kind() {
    let token = Credential::token(StaticTokenCredential::new("t"));
    assert_eq!(token.kind(), "token");

    let sas = Credential::signed_url("sv=1&sig=x").unwrap();
    assert_eq!(sas.kind(), "signed_url");
}

#[tokio::test]
async fn test_bearer_policy_sets_header() {
    let policy = AuthPolicy::from_credential(
        Credential::token(StaticTokenCredential::new("my-token")),
        storage_scopes(),
    );
    assert_eq!(policy.kind(), "bearer");

    let client = reqwest::Client::new();
    let req = client.get("https://example.com/api");
    let built = policy.apply(req).await.unwrap().build().unwrap();
    assert_eq!(
        built.headers().get("Authorization").unwrap(),
        "Bearer my-token"
    );
}

#[tokio::test]
async fn test_signed_url_policy_appends_query() {
    let policy = AuthPolicy::from_credential(
        Credential::signed_url("sv=2021-08-06&sig=abc%3D").unwrap(),
        storage_scopes(),
    );
    assert_eq!(policy.kind(), "signed_url");

    let client = reqwest::Client::new();
    let req = client.get("https://example.com/?comp=list");
    let built = policy.apply(req).await.unwrap().build().unwrap();
    let query = built.url().query().unwrap();
    assert!(query.contains("comp=list"));
    assert!(query.contains("sv=2021-08-06"));
    assert!(query.contains("sig=abc%3D"));
    assert!(built.headers().get("Authorization").is_none());
}

#[tokio::test]
async fn test_bearer_token_is_cached() {
    let credential = Arc::new(CountingCredential::new(3600));
    let policy = AuthPolicy::from_credential(Credential::Token(credential.clone()), storage_scopes());

    let client = reqwest::Client::new();
    for _ in 0..3 {
        let req = client.get("https://example.com/api");
        let built = policy.apply(req).await.unwrap().build().unwrap();
        assert_eq!(built.headers().get("Authorization").unwrap(), "Bearer token-1");
    }
    assert_eq!(credential.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_expired_token_is_refreshed() {
    // Lifetime inside the 30s buffer, so every request refreshes
    let credential = Arc::new(CountingCredential::new(5));
    let policy = AuthPolicy::from_credential(Credential::Token(credential.clone()), storage_scopes());

    let client = reqwest::Client::new();
    policy.apply(client.get("https://example.com")).await.unwrap();
    let built = policy
        .apply(client.get("https://example.com"))
        .await
        .unwrap()
        .build()
        .unwrap();
    assert_eq!(built.headers().get("Authorization").unwrap(), "Bearer token-2");
    assert_eq!(credential.calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_clear_cache_forces_refresh() {
    let credential = Arc::new(CountingCredential::new(3600));
    let policy = AuthPolicy::from_credential(Credential::Token(credential.clone()), storage_scopes());

    let client = reqwest::Client::new();
    policy.apply(client.get("https://example.com")).await.unwrap();
    policy.clear_cache().await;
    policy.apply(client.get("https://example.com")).await.unwrap();
    assert_eq!(credential.calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_empty_static_token_fails() {
    let policy = AuthPolicy::from_credential(
        Credential::token(StaticTokenCredential::new("")),
        storage_scopes(),
    );
    let client = reqwest::Client::new();
    let err = policy.apply(client.get("https://example.com")).await.unwrap_err();
    assert!(matches!(err, Error::Auth { .. }));
}
