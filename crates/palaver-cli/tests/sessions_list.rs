//! End-to-end CLI tests against a mock agent server.

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn isolated_home() -> tempfile::TempDir {
    tempfile::tempdir().unwrap()
}

#[tokio::test]
async fn sessions_list_prints_recency_buckets() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/sessions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [
                {"id": "s1", "title": "rust lifetimes", "agent_id": "triage",
                 "created_at": "2020-01-01T10:00:00Z"},
                {"id": "s2", "title": "dinner plans", "agent_id": "triage",
                 "created_at": "2020-01-02T10:00:00Z"},
            ]
        })))
        .mount(&server)
        .await;

    let home = isolated_home();
    let uri = server.uri();
    tokio::task::spawn_blocking(move || {
        cargo_bin_cmd!("palaver")
            .env("PALAVER_HOME", home.path())
            .args(["--server", &uri, "sessions", "list"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Older"))
            .stdout(predicate::str::contains("rust lifetimes"))
            .stdout(predicate::str::contains("dinner plans"));
    })
    .await
    .unwrap();
}

#[tokio::test]
async fn sessions_show_replays_the_transcript() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/sessions/s1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "s1",
            "title": "weather chat",
            "agent_id": "triage",
            "created_at": "2026-08-01T10:00:00Z",
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/sessions/s1/events"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [
                {"id": "u1", "source": "user", "kind": "content", "fragment": "hello"},
                {"id": "m1", "source": "ai_agent", "kind": "content", "fragment": "Hi"},
                {"id": "m1", "source": "ai_agent", "kind": "content", "fragment": " there"},
                {"id": "m1", "source": "ai_agent", "kind": "tool_call",
                 "tool_call_id": "t1", "tool_name": "get_weather"},
            ]
        })))
        .mount(&server)
        .await;

    let home = isolated_home();
    let uri = server.uri();
    tokio::task::spawn_blocking(move || {
        cargo_bin_cmd!("palaver")
            .env("PALAVER_HOME", home.path())
            .args(["--server", &uri, "sessions", "show", "s1"])
            .assert()
            .success()
            .stdout(predicate::str::contains("weather chat"))
            .stdout(predicate::str::contains("you> hello"))
            .stdout(predicate::str::contains("agent> Hi there"))
            .stdout(predicate::str::contains("tool get_weather> (pending)"));
    })
    .await
    .unwrap();
}

#[tokio::test]
async fn agents_lists_the_catalog() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/agents"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{"id": "triage", "name": "Triage"}]
        })))
        .mount(&server)
        .await;

    let home = isolated_home();
    let uri = server.uri();
    tokio::task::spawn_blocking(move || {
        cargo_bin_cmd!("palaver")
            .env("PALAVER_HOME", home.path())
            .args(["--server", &uri, "agents"])
            .assert()
            .success()
            .stdout(predicate::str::contains("triage"))
            .stdout(predicate::str::contains("Triage"));
    })
    .await
    .unwrap();
}

#[tokio::test]
async fn server_errors_exit_nonzero_with_the_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/sessions"))
        .respond_with(ResponseTemplate::new(500).set_body_string("database gone"))
        .mount(&server)
        .await;

    let home = isolated_home();
    let uri = server.uri();
    tokio::task::spawn_blocking(move || {
        cargo_bin_cmd!("palaver")
            .env("PALAVER_HOME", home.path())
            .args(["--server", &uri, "sessions", "list"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("500"));
    })
    .await
    .unwrap();
}
