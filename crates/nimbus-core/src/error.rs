//! Domain-level error types.

use thiserror::Error;

/// Message used when the upstream gave no usable detail.
pub const GENERIC_UPSTREAM_MESSAGE: &str = "Something went wrong";

/// Status reported when the upstream never produced one.
pub const DEFAULT_UPSTREAM_STATUS: u16 = 500;

/// Domain errors - input that fails validation before any upstream call.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error("{0}")]
    Validation(String),
}

/// Failure reported by (or while reaching) the upstream weather provider.
///
/// `status` is `None` when no HTTP response was received at all.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{message}")]
pub struct UpstreamError {
    pub status: Option<u16>,
    pub message: String,
}

impl UpstreamError {
    pub fn new(status: Option<u16>, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    /// Provider could not be reached or returned something unreadable.
    pub fn unreachable() -> Self {
        Self::new(None, GENERIC_UPSTREAM_MESSAGE)
    }

    /// The status to relay to the caller.
    pub fn status_or_default(&self) -> u16 {
        self.status.unwrap_or(DEFAULT_UPSTREAM_STATUS)
    }
}
