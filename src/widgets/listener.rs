//! Progress change notification.
//!
//! A bar holds at most one listener. Closures work directly; an unbounded
//! tokio sender works too, for callers that want to handle the change on
//! their own loop.

use tokio::sync::mpsc::UnboundedSender;

/// Snapshot delivered to the listener after an increment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressChange {
    pub current: i32,
    pub max: i32,
}

impl ProgressChange {
    pub fn is_complete(&self) -> bool {
        self.current == self.max
    }
}

pub trait ProgressListener {
    fn on_progress_change(&mut self, current: i32, max: i32);
}

impl<F> ProgressListener for F
where
    F: FnMut(i32, i32),
{
    fn on_progress_change(&mut self, current: i32, max: i32) {
        self(current, max)
    }
}

impl ProgressListener for UnboundedSender<ProgressChange> {
    fn on_progress_change(&mut self, current: i32, max: i32) {
        if self.send(ProgressChange { current, max }).is_err() {
            tracing::debug!(current, max, "Progress listener channel closed, dropping change");
        }
    }
}
