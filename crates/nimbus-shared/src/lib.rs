//! # Nimbus Shared
//!
//! Wire types used by both the gateway and its clients.

pub mod dto;
pub mod response;

pub use response::ErrorResponse;
