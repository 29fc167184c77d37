//! Inbound adapters: the terminal command surface.

pub mod cli;
