//! Rate limiting port.

use async_trait::async_trait;
use std::time::Duration;

/// Rate limiter trait - abstraction over fixed-window counter stores.
///
/// Implementations must make `check` an atomic increment-and-compare so
/// concurrent requests for the same key never lose counts.
#[async_trait]
pub trait RateLimiter: Send + Sync {
    /// Count one request against `key` and report whether it is allowed.
    ///
    /// Opens a new window when the key has none or its window has elapsed.
    async fn check(&self, key: &str) -> Result<RateLimitResult, RateLimitError>;

    /// Forget the key's current window.
    async fn reset(&self, key: &str) -> Result<(), RateLimitError>;

    /// Drop every elapsed window, returning how many were removed.
    async fn purge_expired(&self) -> Result<usize, RateLimitError>;
}

/// Result of a rate limit check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimitResult {
    pub allowed: bool,
    pub limit: u32,
    pub remaining: u32,
    pub reset_after: Duration,
    /// Length of the window the quota applies to.
    pub window: Duration,
}

impl RateLimitResult {
    /// Seconds until the window resets, rounded up so clients never retry early.
    pub fn reset_secs(&self) -> u64 {
        let secs = self.reset_after.as_secs();
        if self.reset_after.subsec_nanos() > 0 {
            secs + 1
        } else {
            secs
        }
    }

    /// Quota policy in `RateLimit-Policy` form, e.g. `100;w=900`.
    pub fn policy(&self) -> String {
        format!("{};w={}", self.limit, self.window.as_secs())
    }
}

/// Rate limit errors.
#[derive(Debug, thiserror::Error)]
pub enum RateLimitError {
    #[error("Backend error: {0}")]
    Backend(String),
}
