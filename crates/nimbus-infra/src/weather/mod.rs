//! Upstream weather provider implementations.

mod openweather;

pub use openweather::{OpenWeatherClient, OpenWeatherConfig};
