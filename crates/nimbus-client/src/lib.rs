//! # Nimbus Client
//!
//! The consumer side of the gateway: fetches weather + forecast pairs,
//! keeps only the freshest result on screen, and remembers the user's
//! searches and theme in a local store.

pub mod dashboard;
pub mod error;
pub mod forecast;
pub mod gateway;
pub mod preferences;

pub use dashboard::{Conditions, Dashboard, Outcome, ViewState};
pub use error::ClientFetchError;
pub use gateway::{GatewayClient, WeatherFeed};
pub use preferences::{HISTORY_KEY, THEME_KEY, Preferences};
