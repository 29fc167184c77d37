//! Terminal client for the conference-management API.

pub mod config;
pub mod domain;
pub mod inbound;
pub mod outbound;
