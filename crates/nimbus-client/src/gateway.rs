//! HTTP client for the gateway's four lookup routes.

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde_json::Value;

use nimbus_core::domain::Location;
use nimbus_shared::ErrorResponse;

use crate::error::{ClientFetchError, FETCH_FAILED_MESSAGE};

/// Source of weather documents for the dashboard.
#[async_trait]
pub trait WeatherFeed: Send + Sync {
    async fn weather(&self, location: &Location) -> Result<Value, ClientFetchError>;

    async fn forecast(&self, location: &Location) -> Result<Value, ClientFetchError>;
}

#[derive(Debug, Clone, Copy)]
enum Resource {
    Weather,
    Forecast,
}

impl Resource {
    fn segment(self) -> &'static str {
        match self {
            Resource::Weather => "weather",
            Resource::Forecast => "forecast",
        }
    }
}

/// Talks to a running gateway at `base_url`.
#[derive(Debug, Clone)]
pub struct GatewayClient {
    http: Client,
    base_url: Url,
}

impl GatewayClient {
    pub fn new(base_url: &str) -> Result<Self, ClientFetchError> {
        let base_url =
            Url::parse(base_url).map_err(|e| ClientFetchError::Transport(e.to_string()))?;
        if base_url.cannot_be_a_base() {
            return Err(ClientFetchError::Transport(format!(
                "{} cannot be used as a base URL",
                base_url
            )));
        }

        Ok(Self {
            http: Client::new(),
            base_url,
        })
    }

    /// Build `/api/{resource}/city/{city}` or `/api/{resource}/coords?lat=&lon=`.
    fn url_for(&self, resource: Resource, location: &Location) -> Url {
        let mut url = self.base_url.clone();
        {
            // Checked in `new`, so the path is always segmentable.
            if let Ok(mut segments) = url.path_segments_mut() {
                segments.pop_if_empty().push("api").push(resource.segment());
                match location {
                    Location::City(name) => {
                        segments.push("city").push(name);
                    }
                    Location::Coords { .. } => {
                        segments.push("coords");
                    }
                }
            }
        }

        if let Location::Coords { lat, lon } = location {
            url.query_pairs_mut()
                .append_pair("lat", lat)
                .append_pair("lon", lon);
        }

        url
    }

    async fn fetch(
        &self,
        resource: Resource,
        location: &Location,
    ) -> Result<Value, ClientFetchError> {
        let url = self.url_for(resource, location);

        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| ClientFetchError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<ErrorResponse>()
                .await
                .map(|body| body.message)
                .unwrap_or_else(|_| FETCH_FAILED_MESSAGE.to_string());

            return Err(ClientFetchError::Gateway {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json()
            .await
            .map_err(|e| ClientFetchError::Transport(e.to_string()))
    }
}

#[async_trait]
impl WeatherFeed for GatewayClient {
    async fn weather(&self, location: &Location) -> Result<Value, ClientFetchError> {
        self.fetch(Resource::Weather, location).await
    }

    async fn forecast(&self, location: &Location) -> Result<Value, ClientFetchError> {
        self.fetch(Resource::Forecast, location).await
    }
}
