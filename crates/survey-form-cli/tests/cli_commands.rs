// crates/survey-form-cli/tests/cli_commands.rs
// ============================================================================
// Module: CLI Command Tests
// Description: Integration tests that run the `survey-form` binary.
// Purpose: Validate exit codes, localized output, and bind safety checks.
// Dependencies: survey-form binary, tempfile, tiny_http
// ============================================================================

//! ## Overview
//! Runs the compiled CLI against temporary config/input files and a mock
//! form endpoint.
//!
//! Security posture: non-loopback binds must fail closed without opt-in.

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
    reason = "Test-only output and panic-based assertions are permitted."
)]

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs;
use std::path::Path;
use std::path::PathBuf;
use std::process::Command;
use std::process::Output;
use std::thread;
use std::thread::JoinHandle;

use tempfile::TempDir;
use tiny_http::Response;
use tiny_http::Server;
use tiny_http::StatusCode;

// ============================================================================
// SECTION: Helpers
// ============================================================================

fn survey_form_bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_survey-form"))
}

fn run(args: &[&str]) -> Output {
    Command::new(survey_form_bin())
        .args(args)
        .env_remove("SURVEY_FORM_LANG")
        .env_remove("SURVEY_FORM_CONFIG")
        .env_remove("SURVEY_FORM_ALLOW_NON_LOOPBACK")
        .output()
        .expect("run survey-form")
}

fn stdout_of(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr_of(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

fn write_file(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).expect("write file");
    path
}

fn path_arg(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

/// Serves exactly one request with the given status.
fn spawn_endpoint(status: u16, body: &'static str) -> (String, JoinHandle<()>) {
    let server = Server::http("127.0.0.1:0").expect("bind mock endpoint");
    let addr = server.server_addr().to_ip().expect("ip addr");
    let handle = thread::spawn(move || {
        if let Ok(request) = server.recv() {
            let _ =
                request.respond(Response::from_string(body).with_status_code(StatusCode(status)));
        }
    });
    (format!("http://{addr}"), handle)
}

const VALID_SUBMISSION: &str = r#"{
  "name": "Ana Lopez",
  "email": "ana@x.com",
  "age": 30,
  "phoneNumber": "5551234567",
  "occupation": "Engineer",
  "hobby": "Chess",
  "preferredContactMethod": "EMAIL",
  "feedback": "Great form"
}"#;

// ============================================================================
// SECTION: Global Flags
// ============================================================================

#[test]
fn version_flag_prints_package_version() {
    let output = run(&["--version"]);
    assert!(output.status.success());
    assert_eq!(stdout_of(&output).trim(), format!("survey-form {}", env!("CARGO_PKG_VERSION")));
}

#[test]
fn invalid_lang_env_fails_closed() {
    let output = Command::new(survey_form_bin())
        .arg("--version")
        .env("SURVEY_FORM_LANG", "fr")
        .output()
        .expect("run survey-form");
    assert!(!output.status.success());
    assert!(stderr_of(&output).contains("SURVEY_FORM_LANG"));
}

// ============================================================================
// SECTION: Config Commands
// ============================================================================

#[test]
fn config_validate_accepts_valid_file() {
    let dir = TempDir::new().expect("tempdir");
    let config = write_file(&dir, "survey-form.toml", "[server]\nbind = \"127.0.0.1:3000\"\n");
    let output = run(&["config", "validate", "--config", &path_arg(&config)]);
    assert!(output.status.success(), "stderr: {}", stderr_of(&output));
    assert_eq!(stdout_of(&output).trim(), "Config valid.");
}

#[test]
fn config_validate_reports_in_spanish() {
    let dir = TempDir::new().expect("tempdir");
    let config = write_file(&dir, "survey-form.toml", "");
    let output = run(&["--lang", "es", "config", "validate", "--config", &path_arg(&config)]);
    assert!(output.status.success());
    assert_eq!(stdout_of(&output).trim(), "Configuración válida.");
}

#[test]
fn config_validate_rejects_out_of_range_limits() {
    let dir = TempDir::new().expect("tempdir");
    let config = write_file(
        &dir,
        "survey-form.toml",
        "[server.limits.rate_limit]\nmax_requests = 0\n",
    );
    let output = run(&["config", "validate", "--config", &path_arg(&config)]);
    assert!(!output.status.success());
    assert!(stderr_of(&output).contains("Failed to load config"));
}

#[test]
fn config_example_prints_canonical_toml() {
    let output = run(&["config", "example"]);
    assert!(output.status.success());
    let stdout = stdout_of(&output);
    assert!(stdout.contains("[server.limits.rate_limit]"));
    assert!(stdout.contains("max_requests = 5"));
}

// ============================================================================
// SECTION: Serve Command
// ============================================================================

/// Verifies non-loopback binds are rejected before server startup.
#[test]
fn serve_rejects_non_loopback_bind() {
    let dir = TempDir::new().expect("tempdir");
    let config = write_file(&dir, "survey-form.toml", "[server]\nbind = \"0.0.0.0:3000\"\n");
    let output = run(&["serve", "--config", &path_arg(&config)]);
    assert!(!output.status.success());
    let stderr = stderr_of(&output);
    assert!(stderr.contains("0.0.0.0:3000"), "stderr: {stderr}");
    assert!(stderr.contains("--allow-non-loopback"), "stderr: {stderr}");
}

#[test]
fn serve_rejects_invalid_opt_in_env() {
    let dir = TempDir::new().expect("tempdir");
    let config = write_file(&dir, "survey-form.toml", "[server]\nbind = \"0.0.0.0:3000\"\n");
    let output = Command::new(survey_form_bin())
        .args(["serve", "--config", &path_arg(&config)])
        .env_remove("SURVEY_FORM_LANG")
        .env("SURVEY_FORM_ALLOW_NON_LOOPBACK", "sometimes")
        .output()
        .expect("run survey-form");
    assert!(!output.status.success());
    assert!(stderr_of(&output).contains("sometimes"));
}

// ============================================================================
// SECTION: Submit Command
// ============================================================================

#[test]
fn submit_reports_field_errors_without_contacting_server() {
    let dir = TempDir::new().expect("tempdir");
    let input = write_file(
        &dir,
        "answer.json",
        &VALID_SUBMISSION.replace("ana@x.com", "not-an-email").replace("5551234567", "123"),
    );
    let output =
        run(&["submit", "--endpoint", "http://127.0.0.1:9", "--input", &path_arg(&input)]);
    assert!(!output.status.success());
    let stderr = stderr_of(&output);
    assert!(stderr.contains("The submission is invalid:"), "stderr: {stderr}");
    assert!(stderr.contains("- Email:"), "stderr: {stderr}");
    assert!(stderr.contains("- Phone Number:"), "stderr: {stderr}");
}

#[test]
fn submit_prints_success_notification() {
    let dir = TempDir::new().expect("tempdir");
    let input = write_file(&dir, "answer.json", VALID_SUBMISSION);
    let (endpoint, handle) =
        spawn_endpoint(200, r#"{"message":"Form data submitted successfully."}"#);
    let output = run(&["submit", "--endpoint", &endpoint, "--input", &path_arg(&input)]);
    handle.join().expect("endpoint thread");
    assert!(output.status.success(), "stderr: {}", stderr_of(&output));
    assert_eq!(stdout_of(&output).trim(), "Success: Form data submitted successfully.");
}

#[test]
fn submit_prints_rate_limited_notification() {
    let dir = TempDir::new().expect("tempdir");
    let input = write_file(&dir, "answer.json", VALID_SUBMISSION);
    let (endpoint, handle) = spawn_endpoint(429, "Rate limited");
    let output = run(&["submit", "--endpoint", &endpoint, "--input", &path_arg(&input)]);
    handle.join().expect("endpoint thread");
    assert!(!output.status.success());
    assert_eq!(stderr_of(&output).trim(), "Error: Rate limited");
}

#[test]
fn submit_rejects_unparsable_input() {
    let dir = TempDir::new().expect("tempdir");
    let input = write_file(&dir, "answer.json", "not json");
    let output =
        run(&["submit", "--endpoint", "http://127.0.0.1:9", "--input", &path_arg(&input)]);
    assert!(!output.status.success());
    assert!(stderr_of(&output).contains("Failed to parse JSON"));
}
