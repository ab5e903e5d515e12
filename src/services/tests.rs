//! Tests for services module

use super::*;
use crate::auth::{Credential, StaticTokenCredential};
use crate::error::Error;
use crate::models::{BlobListItem, BlobPrefix, ChatMessageType};
use chrono::{TimeZone, Utc};
use futures::StreamExt;
use pretty_assertions::assert_eq;
use serde_json::json;
use test_case::test_case;
use wiremock::matchers::{header, method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn options() -> ClientOptions {
    ClientOptions::new().http(
        HttpClientConfig::builder()
            .max_retries(0)
            .no_rate_limit()
            .build(),
    )
}

fn token() -> Credential {
    Credential::token(StaticTokenCredential::new("tok"))
}

fn xml(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .insert_header("content-type", "application/xml")
        .set_body_string(body)
}

// ============================================================================
// Endpoint Tests
// ============================================================================

#[test_case("https://acct.blob.core.windows.net" ; "https")]
#[test_case("http://127.0.0.1:10000/devstoreaccount1" ; "http with port and path")]
fn test_parse_endpoint_ok(endpoint: &str) {
    assert!(parse_endpoint(endpoint).is_ok());
}

#[test_case("" ; "empty")]
#[test_case("not a url" ; "relative")]
#[test_case("ftp://acct.example.com" ; "wrong scheme")]
#[test_case("file:///tmp/blobs" ; "file scheme")]
fn test_parse_endpoint_rejects(endpoint: &str) {
    let err = parse_endpoint(endpoint).unwrap_err();
    assert!(matches!(err, Error::Configuration { .. }), "got {err:?}");
}

#[test]
fn test_endpoint_path() {
    let root = parse_endpoint("https://acct.example.com").unwrap();
    assert_eq!(endpoint_path(&root, &[]).unwrap().as_str(), "https://acct.example.com/");
    assert_eq!(
        endpoint_path(&root, &["my logs"]).unwrap().as_str(),
        "https://acct.example.com/my%20logs"
    );

    let nested = parse_endpoint("https://acct.example.com/base/?x=1").unwrap();
    assert_eq!(
        endpoint_path(&nested, &["chat", "threads"]).unwrap().as_str(),
        "https://acct.example.com/base/chat/threads"
    );
}

#[test]
fn test_client_options_builder() {
    let opts = ClientOptions::new()
        .api_version("2020-01-01")
        .context(crate::http::RequestContext::new().retries(1));
    assert_eq!(opts.api_version.as_deref(), Some("2020-01-01"));
    assert_eq!(opts.context.max_retries, Some(1));
}

// ============================================================================
// Blob Service Tests
// ============================================================================

#[tokio::test]
async fn test_list_containers_walks_markers() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .and(query_param("comp", "list"))
        .and(query_param("marker", "tok1"))
        .respond_with(xml(
            "<EnumerationResults><Containers><Container><Name>c</Name></Container></Containers><NextMarker /></EnumerationResults>",
        ))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/"))
        .and(query_param("comp", "list"))
        .and(query_param("prefix", "c"))
        .and(query_param("maxresults", "2"))
        .and(query_param("include", "metadata,deleted"))
        .and(query_param_is_missing("marker"))
        .and(header("x-ms-version", BLOB_API_VERSION))
        .and(header("authorization", "Bearer tok"))
        .respond_with(xml(
            "<EnumerationResults><Containers><Container><Name>a</Name></Container><Container><Name>b</Name></Container></Containers><NextMarker>tok1</NextMarker></EnumerationResults>",
        ))
        .expect(1)
        .mount(&server)
        .await;

    let client = BlobServiceClient::new(&server.uri(), Some(token()), options()).unwrap();
    let mut pages = client
        .list_containers(ListContainersOptions {
            prefix: Some("c".to_string()),
            max_results: Some(2),
            include_metadata: true,
            include_deleted: true,
        })
        .await
        .unwrap();

    let names: Vec<_> = pages.current_page().items().iter().map(|c| c.name.clone()).collect();
    assert_eq!(names, vec!["a", "b"]);
    assert!(pages.has_next());

    let page = pages.fetch_next().await.unwrap();
    assert_eq!(page.items()[0].name, "c");
    assert!(!pages.has_next());
}

#[tokio::test]
async fn test_list_blobs_in_container() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/logs"))
        .and(query_param("restype", "container"))
        .and(query_param("comp", "list"))
        .and(query_param_is_missing("delimiter"))
        .and(query_param("include", "metadata"))
        .respond_with(xml(
            "<EnumerationResults ContainerName=\"logs\"><Blobs>\
             <Blob><Name>2023/01.log</Name></Blob>\
             <Blob><Name>root.log</Name><Properties><Content-Length>10</Content-Length></Properties></Blob>\
             </Blobs><NextMarker /></EnumerationResults>",
        ))
        .expect(1)
        .mount(&server)
        .await;

    let client = BlobServiceClient::new(&server.uri(), None, options()).unwrap();
    let container = client.container_client("logs");
    assert_eq!(container.name(), "logs");

    let pages = container
        .list_blobs(ListBlobsOptions {
            include_metadata: true,
            ..Default::default()
        })
        .await
        .unwrap();

    let blobs = pages.current_page().items();
    assert_eq!(blobs.len(), 2);
    assert_eq!(blobs[0].name, "2023/01.log");
    assert_eq!(blobs[1].name, "root.log");
    assert_eq!(
        blobs[1].properties.as_ref().unwrap().content_length,
        Some(10)
    );
    assert!(!pages.has_next());
}

#[tokio::test]
async fn test_list_blobs_by_hierarchy_keeps_prefixes() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/logs"))
        .and(query_param("restype", "container"))
        .and(query_param("delimiter", "/"))
        .and(query_param_is_missing("marker"))
        .respond_with(xml(
            "<EnumerationResults><Prefix>2023/</Prefix><Delimiter>/</Delimiter><Blobs>\
             <BlobPrefix><Name>2023/01/</Name></BlobPrefix>\
             <Blob><Name>2023/index.log</Name></Blob>\
             <BlobPrefix><Name>2023/02/</Name></BlobPrefix>\
             </Blobs><NextMarker>m2</NextMarker></EnumerationResults>",
        ))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/logs"))
        .and(query_param("delimiter", "/"))
        .and(query_param("marker", "m2"))
        .respond_with(xml(
            "<EnumerationResults><Blobs>\
             <BlobPrefix><Name>2023/03/</Name></BlobPrefix>\
             </Blobs><NextMarker /></EnumerationResults>",
        ))
        .expect(1)
        .mount(&server)
        .await;

    let client = BlobServiceClient::new(&server.uri(), None, options()).unwrap();
    let pages = client
        .container_client("logs")
        .list_blobs_by_hierarchy(
            "/",
            ListBlobsOptions {
                prefix: Some("2023/".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let entries: Vec<(bool, String)> = pages
        .into_stream()
        .flat_map(|page| futures::stream::iter(page.unwrap().into_items()))
        .map(|entry| (entry.is_prefix(), entry.name().to_string()))
        .collect()
        .await;

    assert_eq!(
        entries,
        vec![
            (true, "2023/01/".to_string()),
            (true, "2023/02/".to_string()),
            (false, "2023/index.log".to_string()),
            (true, "2023/03/".to_string()),
        ]
    );
}

#[tokio::test]
async fn test_list_blobs_by_hierarchy_only_prefixes() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(query_param("delimiter", "/"))
        .respond_with(xml(
            "<EnumerationResults><Blobs>\
             <BlobPrefix><Name>dir1/</Name></BlobPrefix>\
             <BlobPrefix><Name>dir2/</Name></BlobPrefix>\
             </Blobs><NextMarker/></EnumerationResults>",
        ))
        .mount(&server)
        .await;

    let client = BlobServiceClient::new(&server.uri(), None, options()).unwrap();
    let pages = client
        .container_client("logs")
        .list_blobs_by_hierarchy("/", ListBlobsOptions::default())
        .await
        .unwrap();

    assert_eq!(
        pages.current_page().items(),
        &[
            BlobListItem::BlobPrefix(BlobPrefix {
                name: "dir1/".to_string()
            }),
            BlobListItem::BlobPrefix(BlobPrefix {
                name: "dir2/".to_string()
            }),
        ]
    );
    assert!(!pages.has_next());
}

#[tokio::test]
async fn test_blob_signed_url_credential() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(query_param("sv", "2021-08-06"))
        .and(query_param("sig", "abc/="))
        .and(query_param("comp", "list"))
        .respond_with(xml("<EnumerationResults><Containers /></EnumerationResults>"))
        .expect(1)
        .mount(&server)
        .await;

    let credential = Credential::signed_url("?sv=2021-08-06&sig=abc%2F%3D").unwrap();
    let client = BlobServiceClient::new(&server.uri(), Some(credential), options()).unwrap();
    let pages = client
        .list_containers(ListContainersOptions::default())
        .await
        .unwrap();

    assert!(pages.current_page().is_empty());
    assert!(!pages.has_next());
}

#[tokio::test]
async fn test_blob_api_version_override_and_failure() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(header("x-ms-version", "2019-12-12"))
        .respond_with(ResponseTemplate::new(403).set_body_string("AuthorizationFailure"))
        .mount(&server)
        .await;

    let client =
        BlobServiceClient::new(&server.uri(), None, options().api_version("2019-12-12")).unwrap();
    assert_eq!(client.api_version(), "2019-12-12");

    let err = client
        .list_containers(ListContainersOptions::default())
        .await
        .unwrap_err();
    assert!(
        matches!(err, Error::HttpStatus { status: 403, ref body } if body.contains("AuthorizationFailure")),
        "got {err:?}"
    );
}

#[test]
fn test_blob_client_rejects_bad_endpoint() {
    let err = BlobServiceClient::new("ftp://acct", None, options()).unwrap_err();
    assert!(matches!(err, Error::Configuration { .. }));
}

// ============================================================================
// Chat Service Tests
// ============================================================================

#[tokio::test]
async fn test_list_chat_threads_follows_next_link() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/chat/threads"))
        .and(query_param("continuationToken", "abc"))
        .and(query_param("api-version", CHAT_API_VERSION))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "value": [{"id": "t3"}],
            "nextLink": null
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/chat/threads"))
        .and(query_param("api-version", CHAT_API_VERSION))
        .and(query_param("maxPageSize", "2"))
        .and(query_param("startTime", "2023-01-02T15:04:05Z"))
        .and(query_param_is_missing("continuationToken"))
        .and(header("authorization", "Bearer tok"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "value": [{"id": "t1", "topic": "one"}, {"id": "t2"}],
            "nextLink": format!("{}/chat/threads?continuationToken=abc&maxPageSize=2", server.uri())
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = ChatClient::new(&server.uri(), token(), options()).unwrap();
    let pages = client
        .list_chat_threads(ListChatThreadsOptions {
            max_page_size: Some(2),
            start_time: Some(Utc.with_ymd_and_hms(2023, 1, 2, 15, 4, 5).unwrap()),
        })
        .await
        .unwrap();

    let ids: Vec<String> = pages
        .into_stream()
        .collect::<Vec<_>>()
        .await
        .into_iter()
        .flat_map(|page| page.unwrap().into_items())
        .map(|thread| thread.id)
        .collect();
    assert_eq!(ids, vec!["t1", "t2", "t3"]);
}

#[tokio::test]
async fn test_list_messages_in_thread() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/chat/threads/19:abc@thread.v2/messages"))
        .and(query_param("api-version", CHAT_API_VERSION))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "value": [
                {"id": "1", "type": "text", "sequenceId": "2", "content": {"message": "hi"}},
                {"id": "2", "type": "topicUpdated", "content": {"topic": "new"}}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = ChatClient::new(&server.uri(), token(), options()).unwrap();
    let thread = client.chat_thread_client("19:abc@thread.v2");
    assert_eq!(thread.thread_id(), "19:abc@thread.v2");

    let pages = thread
        .list_messages(ListMessagesOptions::default())
        .await
        .unwrap();

    let messages = pages.current_page().items();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0].kind, Some(ChatMessageType::Text));
    assert_eq!(
        messages[1].content.as_ref().and_then(|c| c.topic.as_deref()),
        Some("new")
    );
    assert!(!pages.has_next());
}

#[test]
fn test_chat_rejects_signed_url_credential() {
    let credential = Credential::signed_url("sv=1&sig=x").unwrap();
    let err = ChatClient::new("https://chat.example.com", credential, options()).unwrap_err();
    assert!(matches!(err, Error::Configuration { .. }), "got {err:?}");
}

#[test]
fn test_chat_client_accessors() {
    let client = ChatClient::new("https://chat.example.com", token(), options()).unwrap();
    assert_eq!(client.api_version(), CHAT_API_VERSION);
    assert_eq!(client.endpoint().host_str(), Some("chat.example.com"));
    assert!(format!("{client:?}").contains("chat.example.com"));
}
