//! News and alerts sources.

mod mock;

pub use mock::MockNewsSource;
