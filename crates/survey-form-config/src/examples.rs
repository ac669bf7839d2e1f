// crates/survey-form-config/src/examples.rs
// ============================================================================
// Module: Config Examples
// Description: Canonical example configuration payloads.
// Purpose: Deterministic examples for docs and tooling.
// Dependencies: std
// ============================================================================

//! ## Overview
//! Canonical example for survey form configuration. The output is static and
//! must always pass [`crate::SurveyFormConfig::from_toml_str`].

/// Returns a canonical example `survey-form.toml` configuration.
#[must_use]
pub fn config_toml_example() -> String {
    String::from(
        r#"[server]
bind = "127.0.0.1:3000"
max_body_bytes = 16384

[server.limits.rate_limit]
max_requests = 5
window_ms = 60000
max_entries = 4096

[server.client_identity]
trust_forwarded_for = true

[server.audit]
enabled = true
# path = "survey-form-audit.jsonl"

[store]
type = "sqlite"
path = "survey-form.db"
journal_mode = "wal"
sync_mode = "full"
busy_timeout_ms = 5000
"#,
    )
}
