//! Application configuration loaded from environment variables.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use nimbus_infra::{OpenWeatherConfig, RateLimitConfig};

#[cfg(feature = "redis")]
use nimbus_infra::RedisConfig;

/// Startup-time misconfiguration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{var} has an invalid value: {value:?}")]
    Invalid { var: &'static str, value: String },
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// Key clients by the forwarded address instead of the socket peer.
    pub trust_proxy: bool,
    pub upstream: OpenWeatherConfig,
    pub rate_limit: RateLimitConfig,
    /// Built dashboard bundle served at `/`, if any.
    pub static_dir: Option<PathBuf>,
    #[cfg(feature = "redis")]
    pub redis: Option<RedisConfig>,
    #[cfg(feature = "redis")]
    pub rate_limit_key_prefix: String,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup("API_KEY")
            .filter(|key| !key.trim().is_empty())
            .ok_or(ConfigError::Missing("API_KEY"))?;

        let mut upstream = OpenWeatherConfig::new(api_key);
        if let Some(base_url) = lookup("UPSTREAM_BASE_URL") {
            upstream.base_url = base_url;
        }
        if let Some(units) = lookup("UPSTREAM_UNITS") {
            upstream.units = units;
        }
        if let Some(secs) = parse::<u64, _>(&lookup, "UPSTREAM_TIMEOUT_SECS")? {
            upstream.timeout = Duration::from_secs(secs);
        }

        let defaults = RateLimitConfig::default();
        let rate_limit = RateLimitConfig {
            max_requests: parse(&lookup, "RATE_LIMIT_MAX_REQUESTS")?
                .unwrap_or(defaults.max_requests),
            window: parse(&lookup, "RATE_LIMIT_WINDOW_SECS")?
                .map(Duration::from_secs)
                .unwrap_or(defaults.window),
        };

        Ok(Self {
            host: lookup("HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            port: parse(&lookup, "PORT")?.unwrap_or(5000),
            trust_proxy: flag(&lookup, "TRUST_PROXY", false),
            upstream,
            rate_limit,
            static_dir: lookup("STATIC_DIR")
                .filter(|dir| !dir.trim().is_empty())
                .map(PathBuf::from),
            #[cfg(feature = "redis")]
            redis: lookup("REDIS_URL").map(|url| RedisConfig {
                url,
                fallback_to_memory: flag(&lookup, "RATE_LIMIT_FALLBACK_TO_MEMORY", true),
                ..RedisConfig::default()
            }),
            #[cfg(feature = "redis")]
            rate_limit_key_prefix: lookup("RATE_LIMIT_KEY_PREFIX")
                .unwrap_or_else(|| "ratelimit".to_string()),
        })
    }
}

fn parse<T, F>(lookup: &F, var: &'static str) -> Result<Option<T>, ConfigError>
where
    T: std::str::FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(var) {
        None => Ok(None),
        Some(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::Invalid { var, value }),
    }
}

/// `false`/`0` disable, anything else enables.
pub(crate) fn flag<F>(lookup: &F, var: &str, default: bool) -> bool
where
    F: Fn(&str) -> Option<String>,
{
    lookup(var)
        .map(|v| v != "false" && v != "0")
        .unwrap_or(default)
}
