//! Core types for busyblock.
//!
//! This crate holds everything the CLI and the providers share:
//! - `event` for the provider-neutral event types and write commands
//! - `reconciler` for the one-pass placeholder sync
//! - `protocol` and `remote` for talking to provider binaries

pub mod config;
pub mod error;
pub mod event;
pub mod filter;
pub mod matching;
pub mod protocol;
pub mod provider;
pub mod reconciler;
pub mod remote;
pub mod report;
pub mod sync_window;

#[cfg(test)]
mod testing;

pub use event::*;
