//! TUI Frontend (ratatui-based)
//!
//! Implements the Frontend trait using ratatui for terminal rendering and
//! crossterm for event handling and terminal management.

pub mod app;
pub mod progress_bar;

pub use app::TuiFrontend;
pub use progress_bar::ProgressBarView;
