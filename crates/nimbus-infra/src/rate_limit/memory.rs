//! In-memory fixed-window rate limiter.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tokio::time::Instant;

use nimbus_core::ports::{RateLimitError, RateLimitResult, RateLimiter};

/// Rate limiter configuration shared by every backend.
#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    /// Maximum requests per window.
    pub max_requests: u32,
    /// Window duration.
    pub window: Duration,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: 100,
            window: Duration::from_secs(15 * 60),
        }
    }
}

struct Window {
    count: u32,
    resets_at: Instant,
}

struct Windows {
    by_key: HashMap<String, Window>,
    next_sweep: Instant,
}

impl Windows {
    fn sweep(&mut self, now: Instant) -> usize {
        let before = self.by_key.len();
        self.by_key.retain(|_, window| window.resets_at > now);
        before - self.by_key.len()
    }
}

/// Per-key fixed-window counter held in process memory.
///
/// Elapsed windows are swept from `check` at most once per window length,
/// so the map stays bounded without the background job.
///
/// This is the fallback when Redis is not available.
/// Note: Limits are per-process and lost on restart.
pub struct InMemoryRateLimiter {
    windows: Mutex<Windows>,
    config: RateLimitConfig,
}

impl InMemoryRateLimiter {
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            windows: Mutex::new(Windows {
                by_key: HashMap::new(),
                next_sweep: Instant::now() + config.window,
            }),
            config,
        }
    }

    /// Number of keys currently holding a window.
    pub async fn tracked_keys(&self) -> usize {
        self.windows.lock().await.by_key.len()
    }
}

impl Default for InMemoryRateLimiter {
    fn default() -> Self {
        Self::new(RateLimitConfig::default())
    }
}

#[async_trait]
impl RateLimiter for InMemoryRateLimiter {
    async fn check(&self, key: &str) -> Result<RateLimitResult, RateLimitError> {
        let now = Instant::now();
        let mut windows = self.windows.lock().await;

        if windows.next_sweep <= now {
            let removed = windows.sweep(now);
            windows.next_sweep = now + self.config.window;
            if removed > 0 {
                tracing::debug!(removed, "Swept elapsed rate limit windows");
            }
        }

        let window = windows.by_key.entry(key.to_string()).or_insert_with(|| Window {
            count: 0,
            resets_at: now + self.config.window,
        });

        if window.resets_at <= now {
            window.count = 0;
            window.resets_at = now + self.config.window;
        }

        window.count = window.count.saturating_add(1);

        let allowed = window.count <= self.config.max_requests;

        Ok(RateLimitResult {
            allowed,
            limit: self.config.max_requests,
            remaining: self.config.max_requests.saturating_sub(window.count),
            reset_after: window.resets_at.saturating_duration_since(now),
            window: self.config.window,
        })
    }

    async fn reset(&self, key: &str) -> Result<(), RateLimitError> {
        self.windows.lock().await.by_key.remove(key);
        Ok(())
    }

    async fn purge_expired(&self) -> Result<usize, RateLimitError> {
        let now = Instant::now();
        Ok(self.windows.lock().await.sweep(now))
    }
}
