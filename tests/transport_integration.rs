//! Integration tests for `HttpTransport` used directly.

use crocodoc::{CrocodocError, HttpTransport, HttpTransportConfig, QueryParams, Transport};
use wiremock::matchers::{body_string, header, method, path, query_param};
use wiremock::{Mock, ResponseTemplate};

mod support;
use support::socket_guard::start_mock_server_or_skip;

fn transport(base_url: String, api_path: &str) -> HttpTransport {
    HttpTransport::new(
        HttpTransportConfig::new("tok")
            .with_base_url(base_url)
            .with_api_path(api_path),
    )
    .expect("transport should build")
}

#[tokio::test]
async fn test_expect_json_accepts_valid_json() {
    let Some(server) = start_mock_server_or_skip().await else {
        return;
    };

    Mock::given(method("GET"))
        .and(path("/document/status"))
        .and(query_param("uuids", "a,b"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"[{"status": "DONE"}]"#))
        .mount(&server)
        .await;

    let mut query = QueryParams::new();
    query.insert("uuids".to_string(), "a,b".into());
    let bytes = transport(server.uri(), "document")
        .request("status", query, None, true)
        .await
        .unwrap();

    assert_eq!(bytes, br#"[{"status": "DONE"}]"#);
}

#[tokio::test]
async fn test_expect_json_rejects_invalid_json() {
    let Some(server) = start_mock_server_or_skip().await else {
        return;
    };

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let err = transport(server.uri(), "document")
        .request("status", QueryParams::new(), None, true)
        .await
        .unwrap_err();

    assert!(matches!(err, CrocodocError::InvalidJson { .. }), "got {err:?}");
    assert_eq!(err.code(), "server_response_not_valid_json");
}

#[tokio::test]
async fn test_expect_json_surfaces_error_key_on_success_status() {
    let Some(server) = start_mock_server_or_skip().await else {
        return;
    };

    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({ "error": "invalid_token" })),
        )
        .mount(&server)
        .await;

    let err = transport(server.uri(), "document")
        .request("status", QueryParams::new(), None, true)
        .await
        .unwrap_err();

    assert_eq!(err.code(), "invalid_token");
}

#[tokio::test]
async fn test_body_switches_to_form_post() {
    let Some(server) = start_mock_server_or_skip().await else {
        return;
    };

    Mock::given(method("POST"))
        .and(path("/document/delete"))
        .and(query_param("token", "tok"))
        .and(header("content-type", "application/x-www-form-urlencoded"))
        .and(body_string("uuid=abc"))
        .respond_with(ResponseTemplate::new(200).set_body_string("true"))
        .expect(1)
        .mount(&server)
        .await;

    let bytes = transport(server.uri(), "/document/")
        .request("delete", QueryParams::new(), Some(b"uuid=abc".to_vec()), true)
        .await
        .unwrap();

    assert_eq!(bytes, b"true");
}

#[tokio::test]
async fn test_base_url_path_is_preserved() {
    let Some(server) = start_mock_server_or_skip().await else {
        return;
    };

    Mock::given(method("GET"))
        .and(path("/api/v2/download/text"))
        .respond_with(ResponseTemplate::new(200).set_body_string("hello"))
        .expect(1)
        .mount(&server)
        .await;

    let bytes = transport(format!("{}/api/v2", server.uri()), "download")
        .request("text", QueryParams::new(), None, false)
        .await
        .unwrap();

    assert_eq!(bytes, b"hello");
}
