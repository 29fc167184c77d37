//! Conference API outbound adapter.
//!
//! A thin reqwest implementation of the `ConferenceApi` port.

mod client;
mod dto;

pub use client::HttpConferenceApi;
