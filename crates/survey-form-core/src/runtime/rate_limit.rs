// crates/survey-form-core/src/runtime/rate_limit.rs
// ============================================================================
// Module: Survey Form Rate Limiter
// Description: Process-local fixed-window request limiter.
// Purpose: Bound submissions per client identifier without external state.
// Dependencies: crate::interfaces
// ============================================================================

//! ## Overview
//! [`FixedWindowRateLimiter`] counts requests per client identifier inside a
//! fixed window. The first request from an identifier opens its window; once
//! the window elapses the next request opens a fresh one. State lives only in
//! process memory and is lost on restart.
//!
//! The table is bounded by [`RateLimitPolicy::max_entries`]. When full, expired
//! windows are purged; if the table is still full, unseen identifiers are
//! treated as limited so memory stays bounded under identifier floods.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::PoisonError;
use std::time::Duration;
use std::time::Instant;

use crate::interfaces::RateLimiter;

// ============================================================================
// SECTION: Policy
// ============================================================================

/// Fixed-window rate limit policy.
///
/// # Invariants
/// - `max_requests`, `window`, and `max_entries` are non-zero when built from
///   validated configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitPolicy {
    /// Requests allowed per identifier per window.
    pub max_requests: u32,
    /// Window length.
    pub window: Duration,
    /// Maximum identifiers tracked at once.
    pub max_entries: usize,
}

// ============================================================================
// SECTION: Limiter
// ============================================================================

/// Counter state for one identifier.
#[derive(Debug, Clone, Copy)]
struct WindowEntry {
    /// Instant the current window opened.
    window_start: Instant,
    /// Requests seen in the current window.
    count: u32,
}

impl WindowEntry {
    /// Returns true when the window has fully elapsed at `now`.
    fn expired(&self, now: Instant, window: Duration) -> bool {
        now.saturating_duration_since(self.window_start) >= window
    }
}

/// In-memory fixed-window limiter keyed by client identifier.
///
/// # Invariants
/// - Increments for one identifier are serialized by the table lock.
/// - At most `policy.max_entries` identifiers are tracked.
#[derive(Debug)]
pub struct FixedWindowRateLimiter {
    /// Active policy.
    policy: RateLimitPolicy,
    /// Per-identifier window state.
    entries: Mutex<HashMap<String, WindowEntry>>,
}

impl FixedWindowRateLimiter {
    /// Creates a limiter with an empty table.
    #[must_use]
    pub fn new(policy: RateLimitPolicy) -> Self {
        Self {
            policy,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Returns the active policy.
    #[must_use]
    pub const fn policy(&self) -> RateLimitPolicy {
        self.policy
    }

    /// Records a request from `identifier` at `now` and reports whether it
    /// exceeds the allowance.
    pub fn is_limited_at(&self, identifier: &str, now: Instant) -> bool {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(entry) = entries.get_mut(identifier) {
            if entry.expired(now, self.policy.window) {
                *entry = WindowEntry {
                    window_start: now,
                    count: 1,
                };
                return false;
            }
            entry.count = entry.count.saturating_add(1);
            return entry.count > self.policy.max_requests;
        }

        if entries.len() >= self.policy.max_entries {
            let window = self.policy.window;
            entries.retain(|_, entry| !entry.expired(now, window));
            if entries.len() >= self.policy.max_entries {
                return true;
            }
        }
        entries.insert(
            identifier.to_string(),
            WindowEntry {
                window_start: now,
                count: 1,
            },
        );
        self.policy.max_requests == 0
    }

    /// Drops every entry whose window has elapsed at `now`.
    ///
    /// Returns the number of entries removed.
    pub fn purge_expired_at(&self, now: Instant) -> usize {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        let before = entries.len();
        let window = self.policy.window;
        entries.retain(|_, entry| !entry.expired(now, window));
        before - entries.len()
    }

    /// Drops every entry whose window has elapsed.
    ///
    /// Returns the number of entries removed.
    pub fn purge_expired(&self) -> usize {
        self.purge_expired_at(Instant::now())
    }

    /// Returns the number of identifiers currently tracked.
    #[must_use]
    pub fn tracked_identifiers(&self) -> usize {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner).len()
    }
}

impl RateLimiter for FixedWindowRateLimiter {
    fn is_limited(&self, identifier: &str) -> bool {
        self.is_limited_at(identifier, Instant::now())
    }
}

// ============================================================================
// SECTION: Shared Limiter
// ============================================================================

/// Shared rate limiter backed by an `Arc` trait object.
#[derive(Clone)]
pub struct SharedRateLimiter {
    /// Inner limiter implementation.
    inner: Arc<dyn RateLimiter + Send + Sync>,
}

impl SharedRateLimiter {
    /// Wraps a limiter in a shared, clonable wrapper.
    #[must_use]
    pub fn from_limiter(limiter: impl RateLimiter + Send + Sync + 'static) -> Self {
        Self {
            inner: Arc::new(limiter),
        }
    }

    /// Wraps an existing shared limiter.
    #[must_use]
    pub const fn new(limiter: Arc<dyn RateLimiter + Send + Sync>) -> Self {
        Self {
            inner: limiter,
        }
    }
}

impl RateLimiter for SharedRateLimiter {
    fn is_limited(&self, identifier: &str) -> bool {
        self.inner.is_limited(identifier)
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    #![allow(
        clippy::panic,
        clippy::unwrap_used,
        clippy::expect_used,
        reason = "Test-only assertions are permitted."
    )]

    use std::time::Duration;
    use std::time::Instant;

    use super::FixedWindowRateLimiter;
    use super::RateLimitPolicy;

    fn limiter(max_requests: u32, max_entries: usize) -> FixedWindowRateLimiter {
        FixedWindowRateLimiter::new(RateLimitPolicy {
            max_requests,
            window: Duration::from_secs(60),
            max_entries,
        })
    }

    #[test]
    fn allows_up_to_max_requests_then_limits() {
        let limiter = limiter(3, 16);
        let now = Instant::now();
        assert!(!limiter.is_limited_at("10.0.0.1", now));
        assert!(!limiter.is_limited_at("10.0.0.1", now));
        assert!(!limiter.is_limited_at("10.0.0.1", now));
        assert!(limiter.is_limited_at("10.0.0.1", now));
        assert!(limiter.is_limited_at("10.0.0.1", now));
    }

    #[test]
    fn identifiers_are_independent() {
        let limiter = limiter(1, 16);
        let now = Instant::now();
        assert!(!limiter.is_limited_at("a", now));
        assert!(limiter.is_limited_at("a", now));
        assert!(!limiter.is_limited_at("b", now));
    }

    #[test]
    fn window_resets_after_elapsing() {
        let limiter = limiter(1, 16);
        let start = Instant::now();
        assert!(!limiter.is_limited_at("a", start));
        assert!(limiter.is_limited_at("a", start + Duration::from_secs(59)));
        assert!(!limiter.is_limited_at("a", start + Duration::from_secs(60)));
        assert!(limiter.is_limited_at("a", start + Duration::from_secs(61)));
    }

    #[test]
    fn purge_drops_only_expired_windows() {
        let limiter = limiter(5, 16);
        let start = Instant::now();
        limiter.is_limited_at("old", start);
        limiter.is_limited_at("new", start + Duration::from_secs(30));
        assert_eq!(limiter.purge_expired_at(start + Duration::from_secs(60)), 1);
        assert_eq!(limiter.tracked_identifiers(), 1);
    }

    #[test]
    fn full_table_fails_closed_for_new_identifiers() {
        let limiter = limiter(5, 2);
        let start = Instant::now();
        assert!(!limiter.is_limited_at("a", start));
        assert!(!limiter.is_limited_at("b", start));
        assert!(limiter.is_limited_at("c", start));
        assert!(!limiter.is_limited_at("a", start));
        assert_eq!(limiter.tracked_identifiers(), 2);
    }

    #[test]
    fn full_table_reclaims_expired_entries() {
        let limiter = limiter(5, 2);
        let start = Instant::now();
        limiter.is_limited_at("a", start);
        limiter.is_limited_at("b", start);
        assert!(!limiter.is_limited_at("c", start + Duration::from_secs(60)));
        assert_eq!(limiter.tracked_identifiers(), 1);
    }
}
