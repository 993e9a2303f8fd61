//! Country directory library
//!
//! Exposes the API client, listing logic and TUI state so that the binary and
//! integration tests share one implementation.

pub mod app;
pub mod cache;
pub mod cli;
pub mod data;
pub mod debounce;
pub mod listing;
pub mod logging;
pub mod ui;
