//! Application state - shared across all handlers.

use std::sync::Arc;

use nimbus_core::ports::{RateLimiter, WeatherProvider};
use nimbus_infra::{InMemoryRateLimiter, OpenWeatherClient};

#[cfg(feature = "redis")]
use nimbus_infra::{RedisRateLimitConfig, RedisRateLimiter};

use crate::config::AppConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub weather: Arc<dyn WeatherProvider>,
    pub limiter: Arc<dyn RateLimiter>,
}

impl AppState {
    /// Build the application state with appropriate implementations.
    pub async fn new(config: &AppConfig) -> anyhow::Result<Self> {
        let weather = Arc::new(OpenWeatherClient::new(config.upstream.clone())?);
        let limiter = build_limiter(config).await?;

        tracing::info!(
            upstream = %config.upstream.base_url,
            max_requests = config.rate_limit.max_requests,
            window_secs = config.rate_limit.window.as_secs(),
            "Application state initialized"
        );

        Ok(Self::from_parts(weather, limiter))
    }

    pub fn from_parts(weather: Arc<dyn WeatherProvider>, limiter: Arc<dyn RateLimiter>) -> Self {
        Self { weather, limiter }
    }
}

#[cfg(feature = "redis")]
async fn build_limiter(config: &AppConfig) -> anyhow::Result<Arc<dyn RateLimiter>> {
    let Some(redis) = &config.redis else {
        tracing::info!("REDIS_URL not set. Using in-memory rate limiter.");
        return Ok(Arc::new(InMemoryRateLimiter::new(config.rate_limit.clone())));
    };

    let redis_config = RedisRateLimitConfig::new(redis.clone(), config.rate_limit.clone())
        .with_key_prefix(config.rate_limit_key_prefix.clone());

    match RedisRateLimiter::new(redis_config).await {
        Ok(limiter) => Ok(Arc::new(limiter)),
        Err(e) if redis.fallback_to_memory => {
            tracing::error!(
                "Failed to connect to Redis: {}. Using in-memory rate limiter.",
                e
            );
            Ok(Arc::new(InMemoryRateLimiter::new(config.rate_limit.clone())))
        }
        Err(e) => Err(e.into()),
    }
}

#[cfg(not(feature = "redis"))]
async fn build_limiter(config: &AppConfig) -> anyhow::Result<Arc<dyn RateLimiter>> {
    tracing::info!("Running without redis feature - using in-memory rate limiter");
    Ok(Arc::new(InMemoryRateLimiter::new(config.rate_limit.clone())))
}
