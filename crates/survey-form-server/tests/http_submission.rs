// crates/survey-form-server/tests/http_submission.rs
// ============================================================================
// Module: HTTP Submission Tests
// Description: End-to-end tests against a live server on a loopback port.
// Purpose: Validate routing, status mapping, and SQLite persistence over HTTP.
// ============================================================================

//! ## Overview
//! Spawns [`SurveyFormServer`] on `127.0.0.1:0` backed by a temporary SQLite
//! database and drives it with `reqwest`.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only assertions and helpers are permitted."
)]

use std::net::SocketAddr;
use std::path::Path;

use serde_json::Value;
use serde_json::json;
use survey_form_config::SurveyFormConfig;
use survey_form_core::ResponseId;
use survey_form_server::SurveyFormServer;
use survey_form_store_sqlite::SqliteStoreConfig;
use survey_form_store_sqlite::SqliteSurveyStore;
use tempfile::TempDir;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

// ============================================================================
// SECTION: Helpers
// ============================================================================

struct RunningServer {
    addr: SocketAddr,
    shutdown: oneshot::Sender<()>,
    handle: JoinHandle<()>,
}

impl RunningServer {
    fn url(&self, path: &str) -> String {
        format!("http://{}{path}", self.addr)
    }

    async fn stop(self) {
        let _ = self.shutdown.send(());
        self.handle.await.expect("server task");
    }
}

async fn start_server(db_path: &Path, max_requests: u32) -> RunningServer {
    let toml = format!(
        "[server.limits.rate_limit]\nmax_requests = {max_requests}\n\n[server.audit]\nenabled = \
         false\n\n[store]\ntype = \"sqlite\"\npath = {:?}\n",
        db_path.to_string_lossy()
    );
    let config = SurveyFormConfig::from_toml_str(&toml).expect("config");
    let server = SurveyFormServer::from_config(config).expect("server");
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    let (shutdown, signal) = oneshot::channel::<()>();
    let handle = tokio::spawn(async move {
        server
            .serve_on(listener, async move {
                let _ = signal.await;
            })
            .await
            .expect("serve");
    });
    RunningServer {
        addr,
        shutdown,
        handle,
    }
}

fn valid_payload() -> Value {
    json!({
        "name": "Ana Lopez",
        "email": "ana@x.com",
        "age": 30,
        "phoneNumber": "5551234567",
        "occupation": "Engineer",
        "hobby": "Chess",
        "preferredContactMethod": "EMAIL",
        "feedback": "Great form"
    })
}

fn open_store(db_path: &Path) -> SqliteSurveyStore {
    SqliteSurveyStore::new(SqliteStoreConfig::for_path(db_path)).expect("open store")
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[tokio::test(flavor = "multi_thread")]
async fn submissions_are_persisted_and_limited() {
    let dir = TempDir::new().expect("tempdir");
    let db_path = dir.path().join("survey.db");
    let server = start_server(&db_path, 3).await;
    let client = reqwest::Client::new();

    let response =
        client.post(server.url("/api/v1/form")).json(&valid_payload()).send().await.expect("send");
    assert_eq!(response.status().as_u16(), 200);
    let body: Value = response.json().await.expect("json");
    assert_eq!(body["message"], "Form data submitted successfully.");

    let mut invalid = valid_payload();
    invalid["email"] = json!("not-an-email");
    let response =
        client.post(server.url("/api/v1/form")).json(&invalid).send().await.expect("send");
    assert_eq!(response.status().as_u16(), 422);
    assert_eq!(response.text().await.expect("text"), "Invalid request data passed");

    let response =
        client.post(server.url("/api/v1/form")).json(&valid_payload()).send().await.expect("send");
    assert_eq!(response.status().as_u16(), 200);

    let response =
        client.post(server.url("/api/v1/form")).json(&valid_payload()).send().await.expect("send");
    assert_eq!(response.status().as_u16(), 429);
    assert_eq!(response.text().await.expect("text"), "Rate limited");

    server.stop().await;

    let store = open_store(&db_path);
    assert_eq!(store.count_responses().expect("count"), 2);
    let stored = store.load_response(ResponseId::new(1)).expect("load").expect("row");
    assert_eq!(stored.response.email, "ana@x.com");
    assert_eq!(stored.response.phone_number, "5551234567");
}

#[tokio::test(flavor = "multi_thread")]
async fn probes_report_health_and_readiness() {
    let dir = TempDir::new().expect("tempdir");
    let server = start_server(&dir.path().join("survey.db"), 5).await;
    let client = reqwest::Client::new();

    let health: Value = client
        .get(server.url("/health"))
        .send()
        .await
        .expect("send")
        .json()
        .await
        .expect("json");
    assert_eq!(health, json!({ "status": "ok" }));

    let response = client.get(server.url("/ready")).send().await.expect("send");
    assert_eq!(response.status().as_u16(), 200);
    let ready: Value = response.json().await.expect("json");
    assert_eq!(ready, json!({ "status": "ready" }));

    server.stop().await;
}

#[tokio::test(flavor = "multi_thread")]
async fn form_route_rejects_get() {
    let dir = TempDir::new().expect("tempdir");
    let server = start_server(&dir.path().join("survey.db"), 5).await;
    let response = reqwest::Client::new()
        .get(server.url("/api/v1/form"))
        .send()
        .await
        .expect("send");
    assert_eq!(response.status().as_u16(), 405);
    server.stop().await;
}
