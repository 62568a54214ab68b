//! Background maintenance jobs.

pub mod scheduler;
