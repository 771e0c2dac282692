//! Core of guestsync: keeps a guest identity in step with the events of a
//! source calendar.
//!
//! This crate provides the pieces shared by the CLI and calendar providers:
//! - `Event` and related types for calendar events
//! - `mirror` naming rules for copy events
//! - `reconcile` with the per-pair sync pass
//! - `protocol` and `provider` for the CLI-provider communication

pub mod backend;
pub mod config;
pub mod constants;
pub mod date_range;
pub mod error;
pub mod event;
pub mod lock;
pub mod mirror;
pub mod notify;
pub mod protocol;
pub mod provider;
pub mod reconcile;

#[cfg(test)]
mod testing;

// Re-export all event types at crate root for convenience
pub use event::*;
