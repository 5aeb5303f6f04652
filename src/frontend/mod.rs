//! Frontend abstraction layer
//!
//! This module defines the `Frontend` trait the demo drives. It provides a
//! unified interface for event polling, rendering, and cleanup, so the demo
//! loop never touches crossterm or ratatui directly.

pub mod events;
pub mod tui;

use crate::core::{AppCore, Tick};
use crate::widgets::ProgressChange;
use anyhow::Result;
use std::time::Instant;
use tokio::sync::mpsc::UnboundedReceiver;

pub use events::FrontendEvent;
pub use tui::TuiFrontend;

/// Frontend trait
///
/// The Frontend trait separates rendering concerns from the demo logic in
/// `core`. The terminal frontend (ratatui + crossterm) implements it.
pub trait Frontend {
    /// Poll for user input events
    ///
    /// Returns all pending events (keyboard, resize) converted to the
    /// frontend-agnostic `FrontendEvent` enum. Blocks for at most the poll
    /// timeout, which doubles as the frame limiter.
    fn poll_events(&mut self) -> Result<Vec<FrontendEvent>>;

    /// Render the current application state
    ///
    /// Called whenever the core reports that a redraw is needed. Mutable
    /// access lets the frontend clear the widget's redraw flag.
    fn render(&mut self, app: &mut dyn std::any::Any) -> Result<()>;

    /// Restore the terminal before the application exits
    fn cleanup(&mut self) -> Result<()>;

    /// Current terminal size as `(width, height)` in cells
    fn size(&self) -> (u16, u16);
}

/// Drive `core` until it stops running, then clean the frontend up.
///
/// Cleanup runs even when polling or rendering fails; the loop error wins
/// over a cleanup error.
pub fn run_event_loop<F: Frontend>(
    frontend: &mut F,
    core: &mut AppCore,
    tick_rx: &mut UnboundedReceiver<Tick>,
    change_rx: &mut UnboundedReceiver<ProgressChange>,
) -> Result<()> {
    let result = drive(frontend, core, tick_rx, change_rx);
    let cleanup = frontend.cleanup();
    result.and(cleanup)
}

fn drive<F: Frontend>(
    frontend: &mut F,
    core: &mut AppCore,
    tick_rx: &mut UnboundedReceiver<Tick>,
    change_rx: &mut UnboundedReceiver<ProgressChange>,
) -> Result<()> {
    while core.running {
        for event in frontend.poll_events()? {
            core.handle_event(&event);
        }

        // Timer ticks are applied here, on the UI loop
        while let Ok(Tick) = tick_rx.try_recv() {
            core.handle_tick();
        }

        let now = Instant::now();
        while let Ok(change) = change_rx.try_recv() {
            core.handle_progress_change(change, now);
        }
        core.expire_toast(now);

        if core.needs_redraw() {
            frontend.render(core)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use anyhow::{bail, Context};
    use std::collections::VecDeque;
    use tokio::sync::mpsc;

    /// Frontend fed from a queue of poll results
    #[derive(Default)]
    struct ScriptedFrontend {
        polls: VecDeque<Result<Vec<FrontendEvent>>>,
        renders: usize,
        cleaned_up: bool,
    }

    impl Frontend for ScriptedFrontend {
        fn poll_events(&mut self) -> Result<Vec<FrontendEvent>> {
            self.polls
                .pop_front()
                .unwrap_or_else(|| Ok(vec![FrontendEvent::quit()]))
        }

        fn render(&mut self, app: &mut dyn std::any::Any) -> Result<()> {
            let core = app.downcast_mut::<AppCore>().context("expected AppCore")?;
            core.mark_rendered();
            self.renders += 1;
            Ok(())
        }

        fn cleanup(&mut self) -> Result<()> {
            self.cleaned_up = true;
            Ok(())
        }

        fn size(&self) -> (u16, u16) {
            (80, 24)
        }
    }

    fn failing_poll() -> Result<Vec<FrontendEvent>> {
        bail!("terminal went away")
    }

    #[test]
    fn test_loop_applies_ticks_and_cleans_up() {
        let mut core = AppCore::new(Config::default());
        let (change_tx, mut change_rx) = mpsc::unbounded_channel();
        core.attach_listener(change_tx);
        let (tick_tx, mut tick_rx) = mpsc::unbounded_channel();
        tick_tx.send(Tick).unwrap();
        tick_tx.send(Tick).unwrap();

        let mut frontend = ScriptedFrontend::default();
        frontend.polls.push_back(Ok(Vec::new()));

        run_event_loop(&mut frontend, &mut core, &mut tick_rx, &mut change_rx).unwrap();
        assert_eq!(core.bar.progress(), 2);
        assert!(!core.running);
        assert_eq!(frontend.renders, 1);
        assert!(frontend.cleaned_up);
    }

    #[test]
    fn test_loop_error_still_cleans_up() {
        let mut core = AppCore::new(Config::default());
        let (_change_tx, mut change_rx) = mpsc::unbounded_channel();
        let (_tick_tx, mut tick_rx) = mpsc::unbounded_channel();

        let mut frontend = ScriptedFrontend::default();
        frontend.polls.push_back(failing_poll());

        let err = run_event_loop(&mut frontend, &mut core, &mut tick_rx, &mut change_rx)
            .unwrap_err();
        assert!(err.to_string().contains("terminal went away"));
        assert!(frontend.cleaned_up);
        assert!(core.running);
    }
}
