//! Session storage adapters.
//!
//! The binary persists the session in a JSON file; tests and embedders can use
//! the in-memory variant.

mod file;
mod memory;

pub use file::{FileSessionStorage, SESSION_FILE_NAME};
pub use memory::InMemorySessionStorage;
