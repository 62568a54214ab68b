//! Upstream weather provider port.

use async_trait::async_trait;
use serde_json::Value;

use crate::domain::Location;
use crate::error::UpstreamError;

/// A source of current conditions and 5-day/3-hour forecasts.
///
/// Documents are returned as-is; the gateway never reshapes them.
#[async_trait]
pub trait WeatherProvider: Send + Sync {
    /// Current conditions (a weather snapshot).
    async fn current(&self, location: &Location) -> Result<Value, UpstreamError>;

    /// Forecast series in 3-hour steps.
    async fn forecast(&self, location: &Location) -> Result<Value, UpstreamError>;
}
