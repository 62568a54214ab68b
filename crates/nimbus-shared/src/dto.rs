//! Data Transfer Objects - request types for the API.

use serde::{Deserialize, Serialize};

/// Query string of the coordinate routes.
///
/// Both fields are optional at the wire level so a missing value becomes a
/// validation error instead of an extractor rejection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CoordsQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lat: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lon: Option<String>,
}
