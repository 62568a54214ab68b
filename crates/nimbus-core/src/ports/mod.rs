//! Ports - trait definitions for external dependencies.
//! These are the "interfaces" that infrastructure must implement.

mod news;
mod rate_limit;
mod store;
mod weather;

pub use news::{NewsError, NewsSource};
pub use rate_limit::{RateLimitError, RateLimitResult, RateLimiter};
pub use store::{KeyValueStore, StoreError};
pub use weather::WeatherProvider;
