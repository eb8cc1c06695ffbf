// ============================
// crates/backend-lib/src/auth/rate_limit.rs
// ============================
//! Per-IP lockout for failed logins.

use dashmap::DashMap;
use metrics::counter;
use std::net::IpAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::config::AuthSettings;
use crate::metrics::LOGIN_LOCKOUT;

/// Entries are pruned once the map grows past this many IPs
const CLEANUP_THRESHOLD: usize = 1024;

/// How long a failure streak is remembered without a lockout
const FAILURE_MEMORY: Duration = Duration::from_secs(60 * 60);

#[derive(Debug, Clone)]
struct Attempts {
    failed: u32,
    last_failure: Instant,
    locked_until: Option<Instant>,
}

/// Counts failed logins per client IP and locks an IP out once it
/// reaches `max_attempts`
#[derive(Debug, Clone)]
pub struct AuthRateLimiter {
    attempts: Arc<DashMap<IpAddr, Attempts>>,
    max_attempts: u32,
    lockout_duration: Duration,
}

impl AuthRateLimiter {
    pub fn new(max_attempts: u32, lockout_duration: Duration) -> Self {
        Self {
            attempts: Arc::new(DashMap::new()),
            max_attempts,
            lockout_duration,
        }
    }

    pub fn from_settings(settings: &AuthSettings) -> Self {
        Self::new(
            settings.max_login_attempts,
            Duration::from_secs(settings.lockout_secs),
        )
    }

    /// Whether `ip` may attempt a login right now
    pub fn check(&self, ip: IpAddr) -> bool {
        match self.attempts.get(&ip) {
            Some(entry) => !matches!(entry.locked_until, Some(until) if Instant::now() < until),
            None => true,
        }
    }

    /// Record a failed login; returns true when this failure triggered a lockout
    pub fn record_failure(&self, ip: IpAddr) -> bool {
        let now = Instant::now();
        if self.attempts.len() > CLEANUP_THRESHOLD {
            self.cleanup();
        }

        let mut entry = self.attempts.entry(ip).or_insert_with(|| Attempts {
            failed: 0,
            last_failure: now,
            locked_until: None,
        });

        // An expired lockout starts a fresh streak
        if matches!(entry.locked_until, Some(until) if now >= until) {
            entry.failed = 0;
            entry.locked_until = None;
        }

        entry.failed += 1;
        entry.last_failure = now;

        if entry.failed >= self.max_attempts && entry.locked_until.is_none() {
            entry.locked_until = Some(now + self.lockout_duration);
            counter!(LOGIN_LOCKOUT).increment(1);
            tracing::warn!(%ip, attempts = entry.failed, "login locked out");
            return true;
        }
        false
    }

    /// Forget the failure streak of `ip`
    pub fn record_success(&self, ip: IpAddr) {
        self.attempts.remove(&ip);
    }

    /// Drop expired lockouts and stale failure streaks
    pub fn cleanup(&self) {
        let now = Instant::now();
        self.attempts.retain(|_, entry| match entry.locked_until {
            Some(until) => now < until,
            None => now.duration_since(entry.last_failure) < FAILURE_MEMORY,
        });
    }

    /// Number of tracked IPs
    pub fn tracked(&self) -> usize {
        self.attempts.len()
    }
}
