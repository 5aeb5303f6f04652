//! Widget state structs (rendering-agnostic)
//!
//! The number progress bar keeps its data and layout math here. No ratatui
//! buffers or terminal code: frontends measure text, hand over a size, and
//! paint whatever geometry comes back.

pub mod geometry;
pub mod listener;
pub mod measure;
pub mod progress_bar;

pub use geometry::{DrawGeometry, GeometryInput, PointF, RectF};
pub use listener::{ProgressChange, ProgressListener};
pub use measure::{Axis, MeasureSpec};
pub use progress_bar::{NumberProgressBar, Painters, ProgressTextVisibility};
