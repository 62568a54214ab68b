use std::fmt;

use crate::error::DomainError;

/// Message returned when a coordinate lookup is missing `lat` or `lon`.
pub const COORDS_REQUIRED: &str = "Latitude and longitude are required";

/// What the caller asked the weather for.
///
/// Coordinates are kept as the strings received and forwarded untouched;
/// only their presence is checked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Location {
    City(String),
    Coords { lat: String, lon: String },
}

impl Location {
    pub fn city(name: impl Into<String>) -> Self {
        Location::City(name.into())
    }

    /// Build a coordinate location, rejecting absent or empty values.
    pub fn from_coords(lat: Option<&str>, lon: Option<&str>) -> Result<Self, DomainError> {
        match (non_empty(lat), non_empty(lon)) {
            (Some(lat), Some(lon)) => Ok(Location::Coords {
                lat: lat.to_string(),
                lon: lon.to_string(),
            }),
            _ => Err(DomainError::Validation(COORDS_REQUIRED.to_string())),
        }
    }

    /// Query parameters identifying this location to the upstream provider.
    pub fn query_pairs(&self) -> Vec<(&'static str, &str)> {
        match self {
            Location::City(name) => vec![("q", name.as_str())],
            Location::Coords { lat, lon } => vec![("lat", lat.as_str()), ("lon", lon.as_str())],
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::City(name) => write!(f, "{}", name),
            Location::Coords { lat, lon } => write!(f, "{},{}", lat, lon),
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}
