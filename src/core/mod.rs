//! Demo logic layer
//!
//! Owns the progress bar and the timer that animates it.
//! No rendering here; frontends read the core and render.

pub mod app_core;
pub mod ticker;

pub use app_core::{AppCore, Toast};
pub use ticker::{spawn_ticker, Tick};
