//! OpenWeatherMap-compatible upstream client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

use nimbus_core::domain::Location;
use nimbus_core::error::GENERIC_UPSTREAM_MESSAGE;
use nimbus_core::ports::WeatherProvider;
use nimbus_core::UpstreamError;

/// Connection settings for the upstream provider.
#[derive(Clone)]
pub struct OpenWeatherConfig {
    pub base_url: String,
    pub api_key: String,
    pub units: String,
    pub timeout: Duration,
}

impl OpenWeatherConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            base_url: "https://api.openweathermap.org/data/2.5".to_string(),
            api_key: api_key.into(),
            units: "metric".to_string(),
            timeout: Duration::from_secs(10),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

// Keeps the credential out of logs.
impl std::fmt::Debug for OpenWeatherConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenWeatherConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .field("units", &self.units)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Forwards lookups to `{base_url}/weather` and `{base_url}/forecast`.
#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    http: Client,
    config: OpenWeatherConfig,
}

impl OpenWeatherClient {
    pub fn new(config: OpenWeatherConfig) -> Result<Self, reqwest::Error> {
        let http = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { http, config })
    }

    async fn fetch(&self, endpoint: &str, location: &Location) -> Result<Value, UpstreamError> {
        let url = format!("{}/{}", self.config.base_url.trim_end_matches('/'), endpoint);

        let mut query = location.query_pairs();
        query.push(("appid", self.config.api_key.as_str()));
        query.push(("units", self.config.units.as_str()));

        let response = self
            .http
            .get(&url)
            .query(&query)
            .send()
            .await
            .map_err(|e| {
                tracing::warn!(
                    endpoint,
                    %location,
                    error = %e.without_url(),
                    "Upstream unreachable"
                );
                UpstreamError::unreachable()
            })?;

        let status = response.status();
        let body = response.bytes().await.map_err(|e| {
            tracing::warn!(
                endpoint,
                %location,
                error = %e.without_url(),
                "Upstream body read failed"
            );
            UpstreamError::unreachable()
        })?;

        if !status.is_success() {
            let message = error_message(&body);
            tracing::warn!(
                endpoint,
                %location,
                status = status.as_u16(),
                %message,
                "Upstream rejected request"
            );
            return Err(UpstreamError::new(Some(status.as_u16()), message));
        }

        serde_json::from_slice(&body).map_err(|e| {
            tracing::warn!(endpoint, %location, error = %e, "Upstream returned malformed JSON");
            UpstreamError::unreachable()
        })
    }
}

/// Pull the provider's `message` field out of an error body.
fn error_message(body: &[u8]) -> String {
    serde_json::from_slice::<Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(Value::as_str).map(String::from))
        .unwrap_or_else(|| GENERIC_UPSTREAM_MESSAGE.to_string())
}

#[async_trait]
impl WeatherProvider for OpenWeatherClient {
    async fn current(&self, location: &Location) -> Result<Value, UpstreamError> {
        self.fetch("weather", location).await
    }

    async fn forecast(&self, location: &Location) -> Result<Value, UpstreamError> {
        self.fetch("forecast", location).await
    }
}
