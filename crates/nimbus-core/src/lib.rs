//! # Nimbus Core
//!
//! The domain layer of the Nimbus weather gateway.
//! This crate contains pure logic and the port traits that infrastructure
//! implements; it has no network or storage dependencies.

pub mod domain;
pub mod error;
pub mod ports;

pub use error::{DomainError, UpstreamError};
