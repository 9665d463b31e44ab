//! Tests for the HTTP transport module

use super::*;
use crate::auth::AuthConfig;
use crate::error::Error;
use crate::types::{BackoffType, Method, QueryParams};
use std::time::Duration;
use wiremock::matchers::{body_string, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> HttpClient {
    let config = HttpClientConfig::builder()
        .base_url(server.uri())
        .max_retries(0)
        .build();
    HttpClient::with_config(config).unwrap()
}

fn flaky_config(server: &MockServer, retries: u32) -> HttpClientConfig {
    HttpClientConfig::builder()
        .base_url(server.uri())
        .max_retries(retries)
        .backoff(
            BackoffType::Constant,
            Duration::from_millis(10),
            Duration::from_secs(1),
        )
        .build()
}

// ============================================================================
// Config
// ============================================================================

#[test]
fn test_http_client_config_default() {
    let config = HttpClientConfig::default();
    assert_eq!(config.timeout, Duration::from_secs(30));
    assert_eq!(config.max_retries, 3);
    assert!(config.base_url.is_none());
    assert!(config.user_agent.starts_with("redmine-client/"));
}

#[test]
fn test_http_client_config_builder() {
    let config = HttpClientConfig::builder()
        .base_url("https://redmine.example.com")
        .timeout(Duration::from_secs(60))
        .max_retries(5)
        .backoff(
            BackoffType::Linear,
            Duration::from_millis(200),
            Duration::from_secs(30),
        )
        .header("X-Custom", "value")
        .user_agent("test-agent/1.0")
        .build();

    assert_eq!(
        config.base_url,
        Some("https://redmine.example.com".to_string())
    );
    assert_eq!(config.timeout, Duration::from_secs(60));
    assert_eq!(config.max_retries, 5);
    assert_eq!(config.backoff_type, BackoffType::Linear);
    assert_eq!(
        config.default_headers.get("X-Custom"),
        Some(&"value".to_string())
    );
    assert_eq!(config.user_agent, "test-agent/1.0");
}

#[test]
fn test_api_request_builders() {
    let req = ApiRequest::get("issues.xml").query(QueryParams::new().with("limit", "25"));
    assert_eq!(req.method, Method::GET);
    assert_eq!(req.query.get("limit"), Some("25"));
    assert!(req.body.is_none());

    let req = ApiRequest::put("issues/1.xml", "<issue/>".into());
    assert_eq!(req.method, Method::PUT);
    assert_eq!(req.body.as_deref(), Some("<issue/>"));

    assert_eq!(ApiRequest::delete("users/3.xml").method, Method::DELETE);
}

// ============================================================================
// Requests
// ============================================================================

#[tokio::test]
async fn test_send_returns_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/issues.xml"))
        .and(query_param("project_id", "alpha"))
        .and(query_param("offset", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<issues/>"))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let query = QueryParams::new()
        .with("project_id", "alpha")
        .with("offset", "0");
    let body = client
        .send(ApiRequest::get("issues.xml").query(query))
        .await
        .unwrap();

    assert_eq!(body, "<issues/>");
}

#[tokio::test]
async fn test_send_xml_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/projects.xml"))
        .and(header("content-type", "text/xml; charset=utf-8"))
        .and(body_string("<project><name>A</name></project>"))
        .respond_with(ResponseTemplate::new(201).set_body_string("<project><id>1</id></project>"))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let body = client
        .send(ApiRequest::post(
            "projects.xml",
            "<project><name>A</name></project>".into(),
        ))
        .await
        .unwrap();

    assert!(body.contains("<id>1</id>"));
}

#[tokio::test]
async fn test_api_key_in_query() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/users/current.xml"))
        .and(query_param("key", "abc123"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<user/>"))
        .mount(&mock_server)
        .await;

    let config = HttpClientConfig::builder()
        .base_url(mock_server.uri())
        .build();
    let client = HttpClient::with_auth(config, AuthConfig::api_key("abc123")).unwrap();

    client
        .send(ApiRequest::get("users/current.xml"))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_default_headers() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/trackers.xml"))
        .and(header("X-Trace", "on"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&mock_server)
        .await;

    let config = HttpClientConfig::builder()
        .base_url(mock_server.uri())
        .header("X-Trace", "on")
        .build();
    let client = HttpClient::with_config(config).unwrap();

    let body = client.send(ApiRequest::get("/trackers.xml")).await.unwrap();
    assert!(body.is_empty());
}

// ============================================================================
// Status Mapping
// ============================================================================

#[tokio::test]
async fn test_status_401_is_auth_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&mock_server)
        .await;

    let err = client_for(&mock_server)
        .send(ApiRequest::get("issues.xml"))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Auth { .. }));
}

#[tokio::test]
async fn test_status_403_is_forbidden() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&mock_server)
        .await;

    let err = client_for(&mock_server)
        .send(ApiRequest::get("users.xml"))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Forbidden { .. }));
}

#[tokio::test]
async fn test_status_404_is_not_found() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/issues/999.xml"))
        .respond_with(ResponseTemplate::new(404).set_body_string("Not found"))
        .mount(&mock_server)
        .await;

    let err = client_for(&mock_server)
        .send(ApiRequest::get("issues/999.xml"))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::NotFound { .. }));
    assert!(err.to_string().contains("issues/999.xml"));
}

#[tokio::test]
async fn test_status_422_carries_server_messages() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/issues.xml"))
        .respond_with(ResponseTemplate::new(422).set_body_string(
            "<errors><error>Subject can't be blank</error><error>Tracker can't be blank</error></errors>",
        ))
        .mount(&mock_server)
        .await;

    let err = client_for(&mock_server)
        .send(ApiRequest::post("issues.xml", "<issue/>".into()))
        .await
        .unwrap_err();

    match err {
        Error::Processing { errors } => {
            assert_eq!(
                errors,
                vec!["Subject can't be blank", "Tracker can't be blank"]
            );
        }
        other => panic!("expected processing error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_other_status_is_http_status() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(400).set_body_string("Bad request"))
        .mount(&mock_server)
        .await;

    let err = client_for(&mock_server)
        .send(ApiRequest::get("issues.xml"))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::HttpStatus { status: 400, .. }));
}

// ============================================================================
// Retries
// ============================================================================

#[tokio::test]
async fn test_retry_on_500() {
    let mock_server = MockServer::start().await;

    // First two calls return 500, third succeeds
    Mock::given(method("GET"))
        .and(path("/projects.xml"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(2)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/projects.xml"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<projects/>"))
        .mount(&mock_server)
        .await;

    let client = HttpClient::with_config(flaky_config(&mock_server, 3)).unwrap();
    let body = client.send(ApiRequest::get("projects.xml")).await.unwrap();

    assert_eq!(body, "<projects/>");
}

#[tokio::test]
async fn test_retry_on_429_with_retry_after() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/issues.xml"))
        .respond_with(ResponseTemplate::new(429).insert_header("retry-after", "1"))
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/issues.xml"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<issues/>"))
        .mount(&mock_server)
        .await;

    let client = HttpClient::with_config(flaky_config(&mock_server, 2)).unwrap();
    let body = client.send(ApiRequest::get("issues.xml")).await.unwrap();

    assert_eq!(body, "<issues/>");
}

#[tokio::test]
async fn test_retries_exhausted() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503).set_body_string("Maintenance"))
        .expect(3)
        .mount(&mock_server)
        .await;

    let client = HttpClient::with_config(flaky_config(&mock_server, 2)).unwrap();
    let err = client.send(ApiRequest::get("issues.xml")).await.unwrap_err();

    assert!(matches!(err, Error::HttpStatus { status: 503, .. }));
}

#[tokio::test]
async fn test_429_without_retry_after_uses_backoff() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/news.xml"))
        .respond_with(ResponseTemplate::new(429))
        .up_to_n_times(1)
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/news.xml"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<news/>"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = HttpClient::with_config(flaky_config(&mock_server, 1)).unwrap();
    let started = std::time::Instant::now();
    let body = client.send(ApiRequest::get("news.xml")).await.unwrap();

    assert_eq!(body, "<news/>");
    assert!(started.elapsed() < Duration::from_secs(5));
}

#[tokio::test]
async fn test_unreachable_server_is_communication_error() {
    let config = HttpClientConfig::builder()
        .base_url("http://127.0.0.1:1")
        .max_retries(0)
        .build();
    let client = HttpClient::with_config(config).unwrap();

    let err = client
        .send(ApiRequest::get("issues.xml"))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Communication { .. }), "unexpected error: {err}");
    assert!(err.is_retryable());
}

// ============================================================================
// Downloads
// ============================================================================

#[tokio::test]
async fn test_download_same_origin_is_authenticated() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/attachments/download/6/crash.log"))
        .and(query_param("key", "abc123"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"line 1\nline 2".to_vec()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = HttpClientConfig::builder()
        .base_url(mock_server.uri())
        .max_retries(0)
        .build();
    let client = HttpClient::with_auth(config, AuthConfig::api_key("abc123")).unwrap();
    let bytes = client
        .download(&format!("{}/attachments/download/6/crash.log", mock_server.uri()))
        .await
        .unwrap();

    assert_eq!(&bytes[..], b"line 1\nline 2");
}

#[tokio::test]
async fn test_download_foreign_host_sends_no_credentials() {
    let redmine = MockServer::start().await;
    let storage = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/files/crash.log"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"remote".to_vec()))
        .expect(1)
        .mount(&storage)
        .await;

    let config = HttpClientConfig::builder()
        .base_url(redmine.uri())
        .max_retries(0)
        .build();
    let client = HttpClient::with_auth(config, AuthConfig::basic("admin", "hunter2")).unwrap();
    let bytes = client
        .download(&format!("{}/files/crash.log", storage.uri()))
        .await
        .unwrap();
    assert_eq!(&bytes[..], b"remote");

    let requests = storage.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].headers.get("authorization").is_none());
    assert!(requests[0].url.query().is_none());
}

#[tokio::test]
async fn test_download_missing() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let err = client_for(&mock_server)
        .download("attachments/download/1/gone.txt")
        .await
        .unwrap_err();
    assert!(matches!(err, Error::NotFound { .. }));
}

// ============================================================================
// Backoff
// ============================================================================

fn backoff_client(backoff_type: BackoffType) -> HttpClient {
    let config = HttpClientConfig::builder()
        .backoff(
            backoff_type,
            Duration::from_millis(100),
            Duration::from_secs(10),
        )
        .build();
    HttpClient::with_config(config).unwrap()
}

#[test]
fn test_calculate_backoff_constant() {
    let client = backoff_client(BackoffType::Constant);

    assert_eq!(client.calculate_backoff(0), Duration::from_millis(100));
    assert_eq!(client.calculate_backoff(5), Duration::from_millis(100));
}

#[test]
fn test_calculate_backoff_linear() {
    let client = backoff_client(BackoffType::Linear);

    assert_eq!(client.calculate_backoff(0), Duration::from_millis(100));
    assert_eq!(client.calculate_backoff(1), Duration::from_millis(200));
    assert_eq!(client.calculate_backoff(2), Duration::from_millis(300));
}

#[test]
fn test_calculate_backoff_exponential_capped() {
    let client = backoff_client(BackoffType::Exponential);

    assert_eq!(client.calculate_backoff(0), Duration::from_millis(100));
    assert_eq!(client.calculate_backoff(3), Duration::from_millis(800));
    assert_eq!(client.calculate_backoff(10), Duration::from_secs(10));
}
