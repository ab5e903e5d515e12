//! Tests for the HTTP client module

use super::throttle::Throttle;
use super::*;
use crate::auth::{AuthPolicy, Credential, StaticTokenCredential};
use crate::error::Error;
use crate::types::{BackoffType, Method};
use pretty_assertions::assert_eq;
use std::time::Duration;
use url::Url;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_config() -> HttpClientConfig {
    HttpClientConfig::builder()
        .backoff(
            BackoffType::Constant,
            Duration::from_millis(10),
            Duration::from_secs(1),
        )
        .no_rate_limit()
        .build()
}

#[test]
fn test_http_client_config_default() {
    let config = HttpClientConfig::default();
    assert_eq!(config.timeout, Duration::from_secs(30));
    assert_eq!(config.max_retries, 3);
    assert!(config.rate_limit.is_some());
    assert!(config.user_agent.starts_with("cloud-pager/"));
}

#[test]
fn test_http_client_config_builder() {
    let config = HttpClientConfig::builder()
        .timeout(Duration::from_secs(60))
        .max_retries(5)
        .backoff(
            BackoffType::Linear,
            Duration::from_millis(200),
            Duration::from_secs(30),
        )
        .header("x-ms-version", "2021-08-06")
        .user_agent("test-agent/1.0")
        .build();

    assert_eq!(config.timeout, Duration::from_secs(60));
    assert_eq!(config.max_retries, 5);
    assert_eq!(config.backoff_type, BackoffType::Linear);
    assert_eq!(config.initial_backoff, Duration::from_millis(200));
    assert_eq!(config.max_backoff, Duration::from_secs(30));
    assert_eq!(
        config.default_headers.get("x-ms-version"),
        Some(&"2021-08-06".to_string())
    );
    assert_eq!(config.user_agent, "test-agent/1.0");
}

#[test]
fn test_calculate_backoff() {
    let config = HttpClientConfig::builder()
        .backoff(
            BackoffType::Exponential,
            Duration::from_millis(100),
            Duration::from_millis(500),
        )
        .build();
    let client = HttpClient::with_config(config).unwrap();

    assert_eq!(client.calculate_backoff(0), Duration::from_millis(100));
    assert_eq!(client.calculate_backoff(1), Duration::from_millis(200));
    assert_eq!(client.calculate_backoff(2), Duration::from_millis(400));
    assert_eq!(client.calculate_backoff(3), Duration::from_millis(500));
    assert_eq!(client.calculate_backoff(40), Duration::from_millis(500));
}

#[test]
fn test_request_template_moves_query_out_of_url() {
    let template =
        RequestTemplate::get("https://acct.blob.core.windows.net/?comp=list&prefix=logs#frag")
            .unwrap();

    assert_eq!(template.method, Method::GET);
    assert_eq!(template.url.as_str(), "https://acct.blob.core.windows.net/");
    assert_eq!(template.query.get("comp"), Some(&"list".to_string()));
    assert_eq!(template.query.get("prefix"), Some(&"logs".to_string()));
}

#[test]
fn test_request_template_builders() {
    let template = RequestTemplate::get("https://example.com/chat/threads")
        .unwrap()
        .query("api-version", "2021-09-07")
        .query_opt("maxPageSize", Some(20))
        .query_opt::<u32>("skip", None)
        .header("Accept", "application/json");

    assert_eq!(template.query.len(), 2);
    assert_eq!(template.query.get("maxPageSize"), Some(&"20".to_string()));
    assert_eq!(
        template.headers.get("Accept"),
        Some(&"application/json".to_string())
    );
    assert_eq!(
        template.resolved_url().as_str(),
        "https://example.com/chat/threads?api-version=2021-09-07&maxPageSize=20"
    );
}

#[test]
fn test_request_template_with_target_keeps_headers() {
    let template = RequestTemplate::get("https://example.com/a?x=1")
        .unwrap()
        .header("x-ms-version", "2021-08-06");

    let mut query = crate::types::QueryParams::new();
    query.insert("marker".to_string(), "tok".to_string());
    let next = template.with_target(Url::parse("https://example.com/b?y=2").unwrap(), query);

    assert_eq!(next.url.as_str(), "https://example.com/b");
    assert_eq!(next.query.get("y"), Some(&"2".to_string()));
    assert_eq!(next.query.get("marker"), Some(&"tok".to_string()));
    assert!(next.query.get("x").is_none());
    assert_eq!(next.headers, template.headers);
}

#[test]
fn test_raw_response_treats_empty_body_as_absent() {
    let response = RawResponse::new(200, Some(bytes::Bytes::new()));
    assert!(response.body.is_none());
    assert_eq!(response.metadata.status, 200);

    let response = RawResponse::ok("<x/>");
    assert_eq!(response.body.as_deref(), Some(&b"<x/>"[..]));
}

#[tokio::test]
async fn test_send_applies_query_and_headers() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .and(query_param("comp", "list"))
        .and(header("x-ms-version", "2021-08-06"))
        .and(header("x-ms-client-request-id", "req-1"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("x-ms-request-id", "server-42")
                .set_body_string("<EnumerationResults/>"),
        )
        .mount(&mock_server)
        .await;

    let client = HttpClient::with_config(test_config()).unwrap();
    let request = RequestTemplate::get(&format!("{}/?comp=list", mock_server.uri()))
        .unwrap()
        .header("x-ms-version", "2021-08-06");
    let context = RequestContext::new().header("x-ms-client-request-id", "req-1");

    let response = client.send(&request, &context).await.unwrap();
    assert_eq!(response.metadata.status, 200);
    assert_eq!(response.metadata.request_id.as_deref(), Some("server-42"));
    assert_eq!(
        response.body.as_deref(),
        Some(&b"<EnumerationResults/>"[..])
    );
}

#[tokio::test]
async fn test_send_empty_body_is_none() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/empty"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&mock_server)
        .await;

    let client = HttpClient::with_config(test_config()).unwrap();
    let request = RequestTemplate::get(&format!("{}/empty", mock_server.uri())).unwrap();
    let response = client.send(&request, &RequestContext::new()).await.unwrap();
    assert!(response.body.is_none());
}

#[tokio::test]
async fn test_send_404_is_http_status_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_string("ContainerNotFound"))
        .mount(&mock_server)
        .await;

    let client = HttpClient::with_config(test_config()).unwrap();
    let request = RequestTemplate::get(&format!("{}/missing", mock_server.uri())).unwrap();
    let err = client
        .send(&request, &RequestContext::new())
        .await
        .unwrap_err();

    match err {
        Error::HttpStatus { status, body } => {
            assert_eq!(status, 404);
            assert_eq!(body, "ContainerNotFound");
        }
        other => panic!("Expected HttpStatus, got {other:?}"),
    }
}

#[tokio::test]
async fn test_send_non_2xx_without_error_class_is_http_status_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/cached"))
        .respond_with(ResponseTemplate::new(304))
        .mount(&mock_server)
        .await;

    let client = HttpClient::with_config(test_config()).unwrap();
    let request = RequestTemplate::get(&format!("{}/cached", mock_server.uri())).unwrap();
    let err = client
        .send(&request, &RequestContext::new())
        .await
        .unwrap_err();

    assert!(matches!(err, Error::HttpStatus { status: 304, .. }), "got {err:?}");
}

#[tokio::test]
async fn test_send_retries_on_500() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/flaky"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(2)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/flaky"))
        .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
        .mount(&mock_server)
        .await;

    let client = HttpClient::with_config(test_config()).unwrap();
    let request = RequestTemplate::get(&format!("{}/flaky", mock_server.uri())).unwrap();
    let response = client.send(&request, &RequestContext::new()).await.unwrap();
    assert_eq!(response.metadata.status, 200);
}

#[tokio::test]
async fn test_send_gives_up_after_context_retries() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/down"))
        .respond_with(ResponseTemplate::new(503))
        .expect(2)
        .mount(&mock_server)
        .await;

    let client = HttpClient::with_config(test_config()).unwrap();
    let request = RequestTemplate::get(&format!("{}/down", mock_server.uri())).unwrap();
    let err = client
        .send(&request, &RequestContext::new().retries(1))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::HttpStatus { status: 503, .. }));
}

#[tokio::test]
async fn test_send_rate_limit_retry() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/limited"))
        .respond_with(ResponseTemplate::new(429).insert_header("retry-after", "0"))
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/limited"))
        .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
        .mount(&mock_server)
        .await;

    let client = HttpClient::with_config(test_config()).unwrap();
    let request = RequestTemplate::get(&format!("{}/limited", mock_server.uri())).unwrap();
    let response = client.send(&request, &RequestContext::new()).await.unwrap();
    assert_eq!(response.metadata.status, 200);
}

#[tokio::test]
async fn test_send_with_bearer_policy() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/chat/threads"))
        .and(header("Authorization", "Bearer chat-token"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
        .mount(&mock_server)
        .await;

    let policy = AuthPolicy::from_credential(
        Credential::token(StaticTokenCredential::new("chat-token")),
        vec![],
    );
    let client = HttpClient::with_auth(test_config(), policy).unwrap();
    let request = RequestTemplate::get(&format!("{}/chat/threads", mock_server.uri())).unwrap();
    let response = client.send(&request, &RequestContext::new()).await.unwrap();
    assert_eq!(response.metadata.status, 200);
}

#[tokio::test]
async fn test_send_with_signed_url_policy() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .and(query_param("comp", "list"))
        .and(query_param("sig", "s1gn"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<x/>"))
        .mount(&mock_server)
        .await;

    let policy = AuthPolicy::from_credential(
        Credential::signed_url("sv=2021-08-06&sig=s1gn").unwrap(),
        vec![],
    );
    let client = HttpClient::with_auth(test_config(), policy).unwrap();
    let request = RequestTemplate::get(&format!("{}/?comp=list", mock_server.uri())).unwrap();
    let response = client.send(&request, &RequestContext::new()).await.unwrap();
    assert_eq!(response.metadata.status, 200);
}

#[test]
fn test_http_client_debug_hides_credentials() {
    let policy = AuthPolicy::from_credential(
        Credential::token(StaticTokenCredential::new("secret-token")),
        vec![],
    );
    let client = HttpClient::with_auth(test_config(), policy).unwrap();
    let printed = format!("{client:?}");
    assert!(printed.contains("bearer"));
    assert!(!printed.contains("secret-token"));
    assert!(!client.has_rate_limiter());
}

#[tokio::test]
async fn test_send_429_holds_off_before_retry() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/busy"))
        .respond_with(ResponseTemplate::new(429).insert_header("retry-after", "1"))
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/busy"))
        .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
        .mount(&mock_server)
        .await;

    let client = HttpClient::with_config(test_config()).unwrap();
    let request = RequestTemplate::get(&format!("{}/busy", mock_server.uri())).unwrap();

    let started = std::time::Instant::now();
    let response = client.send(&request, &RequestContext::new()).await.unwrap();
    assert_eq!(response.metadata.status, 200);
    assert!(started.elapsed() >= Duration::from_millis(900));
}

// ============================================================================
// Throttle Tests
// ============================================================================

#[test]
fn test_rate_limit_construction() {
    assert!(RateLimit::per_second(0).is_none());

    let limit = RateLimit::per_second(5).unwrap();
    assert_eq!(limit.requests_per_second(), 5);
    assert_eq!(limit.burst(), 5);
    assert_eq!(limit.with_burst(0).burst(), 5);
    assert_eq!(limit.with_burst(2).burst(), 2);

    let default = RateLimit::default();
    assert_eq!(default.requests_per_second(), 10);
    assert_eq!(default.burst(), 10);
}

#[tokio::test]
async fn test_throttle_paces_past_burst() {
    let throttle = Throttle::new(RateLimit::per_second(20).map(|l| l.with_burst(1)));
    assert!(throttle.is_limited());

    let started = std::time::Instant::now();
    throttle.acquire().await;
    throttle.acquire().await;
    assert!(started.elapsed() >= Duration::from_millis(30));
}

#[tokio::test]
async fn test_throttle_hold_off_is_shared_by_clones() {
    let throttle = Throttle::new(None);
    assert!(!throttle.is_limited());
    let other = throttle.clone();

    throttle.hold_off(Duration::from_millis(60));
    let started = std::time::Instant::now();
    other.acquire().await;
    assert!(started.elapsed() >= Duration::from_millis(50));
}

#[tokio::test]
async fn test_throttle_hold_off_keeps_later_deadline() {
    let throttle = Throttle::new(None);
    throttle.hold_off(Duration::from_secs(10));
    let long = throttle.held_until().unwrap();

    throttle.hold_off(Duration::from_millis(1));
    assert_eq!(throttle.held_until(), Some(long));
}
