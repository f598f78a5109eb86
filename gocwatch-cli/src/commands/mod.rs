//! CLI command implementations.
//!
//! - [`run`] - Watcher with the interactive console
//! - [`send`] - One-off telex and ping
//! - [`assign`] - Stand prediction against the configured rules
//! - [`flights`] - Fleet flights currently online
//! - [`slots`] - Fleet departure slots, optionally joined with the live feed
//! - [`config`] - Configuration file management

pub mod assign;
pub mod config;
pub mod flights;
pub mod run;
pub mod send;
pub mod slots;
