//! Outbound adapters implementing the domain ports.
//!
//! - **http**: reqwest-backed client of the conference REST API
//! - **session_storage**: in-memory and file-backed session flag storage
//!
//! Adapters translate between domain types and wire or disk formats. They
//! contain no business logic.

pub mod http;
pub mod session_storage;
