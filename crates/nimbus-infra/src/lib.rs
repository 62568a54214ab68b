//! # Nimbus Infrastructure
//!
//! Concrete implementations of the ports defined in `nimbus-core`:
//! rate limiter backends, the upstream weather client, the news source
//! and client-local stores.
//!
//! ## Feature Flags
//!
//! - `full` (default) - All features enabled
//! - `minimal` - No external services, in-memory rate limiting only
//! - `redis` - Redis-backed rate limiting shared across gateway instances

pub mod news;
pub mod rate_limit;
pub mod store;
pub mod weather;

// Re-exports - In-Memory
pub use news::MockNewsSource;
pub use rate_limit::{InMemoryRateLimiter, RateLimitConfig};
pub use store::{InMemoryStore, JsonFileStore};
pub use weather::{OpenWeatherClient, OpenWeatherConfig};

// Re-exports - Redis
#[cfg(feature = "redis")]
pub use rate_limit::{RedisConfig, RedisRateLimitConfig, RedisRateLimiter};
