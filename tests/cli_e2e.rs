//! End-to-end CLI tests for the crocodoc binary.

// `Command::cargo_bin` is deprecated in assert_cmd >=2.0.17 in favor of
// `cargo::cargo_bin_cmd!` macro. Suppressed until migration to the new API.
#![allow(deprecated)]

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, ResponseTemplate};

mod support;
use support::socket_guard::start_mock_server_or_skip;

/// Command isolated from the developer's environment and config file.
fn crocodoc(config_home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("crocodoc").unwrap();
    cmd.env("XDG_CONFIG_HOME", config_home.path())
        .env_remove("CROCODOC_API_TOKEN")
        .env_remove("CROCODOC_BASE_URL")
        .env_remove("CROCODOC_CONNECT_TIMEOUT_SECS")
        .env_remove("CROCODOC_READ_TIMEOUT_SECS")
        .env("RUST_LOG", "warn");
    cmd
}

fn write_config(config_home: &TempDir, contents: &str) {
    let config_dir = config_home.path().join("crocodoc");
    std::fs::create_dir_all(&config_dir).unwrap();
    std::fs::write(config_dir.join("config.toml"), contents).unwrap();
}

#[test]
fn test_binary_help_displays_usage() {
    let home = TempDir::new().unwrap();
    crocodoc(&home)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("thumbnail"))
        .stdout(predicate::str::contains("document"));
}

#[test]
fn test_binary_version_displays_version() {
    let home = TempDir::new().unwrap();
    crocodoc(&home)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("crocodoc"));
}

#[test]
fn test_binary_invalid_flag_returns_error() {
    let home = TempDir::new().unwrap();
    crocodoc(&home)
        .args(["text", "abc", "--invalid-flag"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("error"));
}

#[test]
fn test_missing_token_fails_before_network() {
    let home = TempDir::new().unwrap();
    crocodoc(&home)
        .args(["text", "abc", "--base-url", "http://127.0.0.1:9"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("missing_api_token"));
}

#[test]
fn test_thumbnail_invalid_width_reports_code() {
    let home = TempDir::new().unwrap();
    crocodoc(&home)
        .args([
            "thumbnail",
            "abc",
            "--width",
            "0",
            "--height",
            "100",
            "--token",
            "t",
            "--base-url",
            "http://127.0.0.1:9",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid_width"));
}

#[test]
fn test_thumbnail_invalid_height_reports_code() {
    let home = TempDir::new().unwrap();
    crocodoc(&home)
        .args([
            "thumbnail",
            "abc",
            "--width",
            "100",
            "--height",
            "-3",
            "--token",
            "t",
            "--base-url",
            "http://127.0.0.1:9",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid_height"));
}

#[test]
fn test_config_show_masks_token_and_reports_sources() {
    let home = TempDir::new().unwrap();
    write_config(
        &home,
        "api_token = \"filetoken123\"\nread_timeout_secs = 90\n",
    );
    crocodoc(&home)
        .env("CROCODOC_BASE_URL", "https://staging.example.com/api/v2")
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config_file = loaded"))
        .stdout(predicate::str::contains("api_token = file**** (config file)"))
        .stdout(predicate::str::contains(
            "base_url = https://staging.example.com/api/v2 (env)",
        ))
        .stdout(predicate::str::contains("read_timeout_secs = 90"))
        .stdout(predicate::str::contains("filetoken123").not());
}

#[test]
fn test_config_show_timeouts_follow_flag_env_file_order() {
    let home = TempDir::new().unwrap();
    write_config(
        &home,
        "connect_timeout_secs = 4\nread_timeout_secs = 90\n",
    );
    crocodoc(&home)
        .env("CROCODOC_READ_TIMEOUT_SECS", "120")
        .env("CROCODOC_CONNECT_TIMEOUT_SECS", "6")
        .args(["config", "show", "--connect-timeout-secs", "8"])
        .assert()
        .success()
        .stdout(predicate::str::contains("connect_timeout_secs = 8 (flag)"))
        .stdout(predicate::str::contains("read_timeout_secs = 120 (env)"));
}

#[test]
fn test_config_show_fully_masks_short_token() {
    let home = TempDir::new().unwrap();
    crocodoc(&home)
        .args(["config", "show", "--token", "abc"])
        .assert()
        .success()
        .stdout(predicate::str::contains("api_token = **** (flag)"))
        .stdout(predicate::str::contains("api_token = abc").not());
}

#[test]
fn test_invalid_timeout_env_fails() {
    let home = TempDir::new().unwrap();
    crocodoc(&home)
        .env("CROCODOC_READ_TIMEOUT_SECS", "soon")
        .args(["config", "show"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("CROCODOC_READ_TIMEOUT_SECS"));
}

#[test]
fn test_invalid_config_file_fails() {
    let home = TempDir::new().unwrap();
    write_config(&home, "read_timeout_secs = 0\n");
    crocodoc(&home)
        .args(["config", "show"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("read_timeout_secs"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_document_writes_output_file() {
    let Some(server) = start_mock_server_or_skip().await else {
        return;
    };

    Mock::given(method("GET"))
        .and(path("/download/document"))
        .and(query_param("uuid", "abc"))
        .and(query_param("pdf", "true"))
        .and(query_param("annotated", "1"))
        .and(query_param("filter", "1,2"))
        .and(query_param("token", "secret"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"%PDF-1.7".to_vec()))
        .expect(1)
        .mount(&server)
        .await;

    let home = TempDir::new().unwrap();
    let output = home.path().join("out.pdf");
    let base_url = server.uri();

    tokio::task::spawn_blocking(move || {
        crocodoc(&home)
            .env("CROCODOC_API_TOKEN", "secret")
            .args(["document", "abc", "--pdf", "--annotated", "--filter", "1,2"])
            .arg("--base-url")
            .arg(&base_url)
            .arg("-o")
            .arg(&output)
            .assert()
            .success();

        assert_eq!(std::fs::read(&output).unwrap(), b"%PDF-1.7");
        drop(home);
    })
    .await
    .unwrap();
}

#[tokio::test(flavor = "multi_thread")]
async fn test_text_streams_to_stdout() {
    let Some(server) = start_mock_server_or_skip().await else {
        return;
    };

    Mock::given(method("GET"))
        .and(path("/download/text"))
        .respond_with(ResponseTemplate::new(200).set_body_string("extracted words"))
        .expect(1)
        .mount(&server)
        .await;

    let base_url = server.uri();
    tokio::task::spawn_blocking(move || {
        let home = TempDir::new().unwrap();
        crocodoc(&home)
            .args(["text", "abc", "--token", "secret", "--base-url", base_url.as_str()])
            .assert()
            .success()
            .stdout("extracted words");
    })
    .await
    .unwrap();
}

#[tokio::test(flavor = "multi_thread")]
async fn test_api_error_exits_nonzero() {
    let Some(server) = start_mock_server_or_skip().await else {
        return;
    };

    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(serde_json::json!({ "error": "invalid_token" })),
        )
        .mount(&server)
        .await;

    let base_url = server.uri();
    tokio::task::spawn_blocking(move || {
        let home = TempDir::new().unwrap();
        crocodoc(&home)
            .args(["thumbnail", "abc", "--token", "bad", "--base-url", base_url.as_str()])
            .assert()
            .failure()
            .stderr(predicate::str::contains("invalid_token"));
    })
    .await
    .unwrap();
}
