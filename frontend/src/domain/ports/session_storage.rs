//! Driven port for the persisted session flags.
//!
//! The storage is a tiny string key/value space holding exactly two entries:
//! [`AUTH_TOKEN_KEY`] and [`IS_ADMIN_KEY`].

use super::define_port_error;

/// Storage key of the bearer token.
pub const AUTH_TOKEN_KEY: &str = "authToken";
/// Storage key of the stringified admin flag (`"true"` / `"false"`).
pub const IS_ADMIN_KEY: &str = "isAdmin";

define_port_error! {
    /// Errors raised by session storage adapters.
    pub enum SessionStorageError {
        /// The backing medium could not be read or written.
        Io { message: String } =>
            "session storage unavailable: {message}",
        /// The stored document is not in the expected shape.
        Corrupt { message: String } =>
            "session storage is corrupt: {message}",
    }
}

/// Port for reading and writing persisted session entries.
#[cfg_attr(test, mockall::automock)]
pub trait SessionStorage: Send + Sync {
    /// Read one entry.
    fn get(&self, key: &str) -> Result<Option<String>, SessionStorageError>;

    /// Write one entry, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> Result<(), SessionStorageError>;

    /// Remove one entry; removing a missing entry succeeds.
    fn remove(&self, key: &str) -> Result<(), SessionStorageError>;
}
