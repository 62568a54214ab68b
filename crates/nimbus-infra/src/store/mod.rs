//! Client-local key-value stores.

mod file;
mod memory;

pub use file::JsonFileStore;
pub use memory::InMemoryStore;
