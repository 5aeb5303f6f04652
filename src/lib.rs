//! number-progress - numbered horizontal progress bar
//!
//! A progress bar that draws a reached bar, an unreached bar and a
//! percentage label between them. The widget state in [`widgets`] is
//! rendering-agnostic; [`frontend::tui`] paints it with ratatui and drives
//! the animated demo.

pub mod config;
pub mod core;
pub mod frontend;
pub mod widget_state;
pub mod widgets;

pub use config::Config;
pub use frontend::tui::ProgressBarView;
pub use widget_state::{Bundle, BundleValue, WidgetState};
pub use widgets::{NumberProgressBar, ProgressChange, ProgressListener, ProgressTextVisibility};
