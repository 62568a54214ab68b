//! Client-side error types.

use thiserror::Error;

/// Shown when the gateway gave no message of its own.
pub const FETCH_FAILED_MESSAGE: &str = "Failed to fetch weather data";

/// A gateway call that did not produce a document.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ClientFetchError {
    #[error("gateway responded {status}: {message}")]
    Gateway { status: u16, message: String },

    #[error("request failed: {0}")]
    Transport(String),
}

impl ClientFetchError {
    /// The single line to put in front of the user.
    pub fn user_message(&self) -> &str {
        match self {
            ClientFetchError::Gateway { message, .. } => message,
            ClientFetchError::Transport(_) => FETCH_FAILED_MESSAGE,
        }
    }
}
