//! Driven ports at the boundary with the conference API and session storage.

mod macros;
pub(crate) use macros::define_port_error;

mod conference_api;
mod session_storage;

#[cfg(test)]
pub use conference_api::MockConferenceApi;
pub use conference_api::{ApiError, ConferenceApi};
#[cfg(test)]
pub use session_storage::MockSessionStorage;
pub use session_storage::{
    AUTH_TOKEN_KEY, IS_ADMIN_KEY, SessionStorage, SessionStorageError,
};
