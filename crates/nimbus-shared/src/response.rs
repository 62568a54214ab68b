//! Error body returned by every failing gateway route.

use serde::{Deserialize, Serialize};

/// `{"message": "..."}` - the one error shape clients need to handle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub message: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn too_many_requests() -> Self {
        Self::new("Too many requests, please try again later.")
    }
}
