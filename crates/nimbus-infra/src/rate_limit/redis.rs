//! Redis rate limiter implementation using a fixed window counter.

use std::time::Duration;

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::{Client, Script};

use nimbus_core::ports::{RateLimitError, RateLimitResult, RateLimiter};

use super::RateLimitConfig;

/// Redis connection settings.
#[derive(Debug, Clone)]
pub struct RedisConfig {
    pub url: String,
    pub connect_timeout: Duration,
    /// Use the in-memory limiter when Redis can't be reached at startup.
    pub fallback_to_memory: bool,
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            url: "redis://127.0.0.1:6379".to_string(),
            connect_timeout: Duration::from_secs(5),
            fallback_to_memory: true,
        }
    }
}

/// Redis rate limiter configuration.
#[derive(Debug, Clone)]
pub struct RedisRateLimitConfig {
    pub redis: RedisConfig,
    pub limits: RateLimitConfig,
    /// Key prefix for rate limit keys
    pub key_prefix: String,
}

impl RedisRateLimitConfig {
    pub fn new(redis: RedisConfig, limits: RateLimitConfig) -> Self {
        Self {
            redis,
            limits,
            key_prefix: "ratelimit".to_string(),
        }
    }

    pub fn with_key_prefix(mut self, key_prefix: impl Into<String>) -> Self {
        self.key_prefix = key_prefix.into();
        self
    }
}

/// Redis-backed fixed window limiter, shared by every gateway instance
/// pointed at the same server. Expired windows are removed by Redis itself.
pub struct RedisRateLimiter {
    conn: ConnectionManager,
    config: RedisRateLimitConfig,
    /// Lua script for atomic increment with expiry
    script: Script,
}

impl RedisRateLimiter {
    pub async fn new(config: RedisRateLimitConfig) -> Result<Self, RateLimitError> {
        let client = Client::open(config.redis.url.as_str())
            .map_err(|e| RateLimitError::Backend(e.to_string()))?;

        let conn = tokio::time::timeout(
            config.redis.connect_timeout,
            ConnectionManager::new(client),
        )
        .await
        .map_err(|_| RateLimitError::Backend("Connection timed out".to_string()))?
        .map_err(|e| RateLimitError::Backend(e.to_string()))?;

        // Returns: [current_count, ttl_remaining_ms]
        let script = Script::new(
            r#"
            local current = redis.call('INCR', KEYS[1])
            if current == 1 then
                redis.call('PEXPIRE', KEYS[1], ARGV[1])
            end
            return {current, redis.call('PTTL', KEYS[1])}
            "#,
        );

        tracing::info!(url = %config.redis.url, "Connected to Redis rate limiter");

        Ok(Self {
            conn,
            config,
            script,
        })
    }

    fn make_key(&self, key: &str) -> String {
        format!("{}:{}", self.config.key_prefix, key)
    }
}

#[async_trait]
impl RateLimiter for RedisRateLimiter {
    async fn check(&self, key: &str) -> Result<RateLimitResult, RateLimitError> {
        let redis_key = self.make_key(key);
        let mut conn = self.conn.clone();
        let limits = &self.config.limits;
        let window_ms = limits.window.as_millis() as u64;

        let result: Vec<i64> = self
            .script
            .key(&redis_key)
            .arg(window_ms)
            .invoke_async(&mut conn)
            .await
            .map_err(|e| RateLimitError::Backend(e.to_string()))?;

        let current_count = result.first().copied().unwrap_or(1).max(0) as u32;
        let ttl_ms = result
            .get(1)
            .copied()
            .filter(|ttl| *ttl > 0)
            .map(|ttl| ttl as u64)
            .unwrap_or(window_ms);

        Ok(RateLimitResult {
            allowed: current_count <= limits.max_requests,
            limit: limits.max_requests,
            remaining: limits.max_requests.saturating_sub(current_count),
            reset_after: Duration::from_millis(ttl_ms),
            window: limits.window,
        })
    }

    async fn reset(&self, key: &str) -> Result<(), RateLimitError> {
        let mut conn = self.conn.clone();
        let _: i64 = redis::cmd("DEL")
            .arg(self.make_key(key))
            .query_async(&mut conn)
            .await
            .map_err(|e| RateLimitError::Backend(e.to_string()))?;
        Ok(())
    }

    async fn purge_expired(&self) -> Result<usize, RateLimitError> {
        Ok(0)
    }
}
