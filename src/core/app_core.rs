use crate::config::Config;
use crate::frontend::FrontendEvent;
use crate::widget_state::WidgetState;
use crate::widgets::{NumberProgressBar, ProgressChange, ProgressTextVisibility};
use anyhow::Result;
use crossterm::event::KeyCode;
use ratatui::widgets::Padding;
use std::time::{Duration, Instant};
use tokio::sync::mpsc::UnboundedSender;

/// Progress added or removed by the `+` / `-` keys
const MANUAL_STEP: i32 = 5;

/// Short-lived message shown over the demo screen
#[derive(Debug, Clone, PartialEq)]
pub struct Toast {
    pub message: String,
    pub expires_at: Instant,
}

/// Core demo state (frontend-agnostic)
///
/// Owns the progress bar and reacts to timer ticks, progress notifications
/// and key presses. Frontends only read from it to render.
pub struct AppCore {
    /// Application configuration
    pub config: Config,

    /// The bar being animated
    pub bar: NumberProgressBar,

    /// Finish notification, if one is showing
    pub toast: Option<Toast>,

    /// Ticks are ignored while paused
    pub paused: bool,

    /// Application running flag
    pub running: bool,

    /// Something outside the bar changed (toast, pause, resize)
    pub needs_render: bool,

    /// Ticks applied since start
    pub ticks: u64,
}

impl AppCore {
    pub fn new(config: Config) -> Self {
        let mut bar = NumberProgressBar::from_style(&config.progress_bar);
        let layout = &config.layout;
        bar.set_padding(Padding::new(
            layout.padding_left,
            layout.padding_right,
            layout.padding_top,
            layout.padding_bottom,
        ));

        Self {
            config,
            bar,
            toast: None,
            paused: false,
            running: true,
            needs_render: true,
            ticks: 0,
        }
    }

    /// Route progress notifications into `tx`; the main loop drains the other end
    pub fn attach_listener(&mut self, tx: UnboundedSender<ProgressChange>) {
        self.bar.set_on_progress_bar_listener(Some(Box::new(tx)));
    }

    /// Restore the bar saved by a previous run. Returns whether anything was restored.
    pub fn restore(&mut self, state: &WidgetState) -> Result<bool> {
        let Some(bundle) = &state.progress_bar else {
            return Ok(false);
        };

        self.bar.restore_instance_state(bundle)?;
        tracing::info!(
            saved_at = state.timestamp.as_deref().unwrap_or("unknown"),
            progress = self.bar.progress(),
            max = self.bar.max(),
            "Restored progress bar from previous run"
        );
        Ok(true)
    }

    pub fn snapshot(&self) -> WidgetState {
        WidgetState::capture(self.bar.save_instance_state())
    }

    /// Advance by `demo.step`, landing exactly on max when the step overshoots it
    pub fn handle_tick(&mut self) {
        if self.paused {
            return;
        }
        self.ticks += 1;
        let remaining = self.bar.max() - self.bar.progress();
        self.bar.increment_progress_by(self.config.demo.step.min(remaining));
    }

    /// React to a notification from the bar: at max, toast and start over
    pub fn handle_progress_change(&mut self, change: ProgressChange, now: Instant) {
        if !change.is_complete() {
            return;
        }

        tracing::debug!(current = change.current, max = change.max, "Progress complete");
        self.toast = Some(Toast {
            message: self.config.demo.finish_message.clone(),
            expires_at: now + Duration::from_millis(self.config.demo.toast_duration_ms),
        });
        self.bar.set_progress(0);
        self.needs_render = true;
    }

    pub fn expire_toast(&mut self, now: Instant) {
        if self.toast.as_ref().is_some_and(|t| now >= t.expires_at) {
            self.toast = None;
            self.needs_render = true;
        }
    }

    pub fn handle_event(&mut self, event: &FrontendEvent) {
        match event {
            FrontendEvent::Quit => self.running = false,
            FrontendEvent::Resize { width, height } => {
                tracing::debug!(width, height, "Terminal resized");
                self.needs_render = true;
            }
            FrontendEvent::Key { code, .. } => match code {
                KeyCode::Char('q') | KeyCode::Esc => self.running = false,
                KeyCode::Char(' ') => {
                    self.paused = !self.paused;
                    self.needs_render = true;
                }
                KeyCode::Char('t') => {
                    let visibility = if self.bar.progress_text_visibility() {
                        ProgressTextVisibility::Invisible
                    } else {
                        ProgressTextVisibility::Visible
                    };
                    self.bar.set_progress_text_visibility(visibility);
                }
                KeyCode::Char('+') | KeyCode::Char('=') => self
                    .bar
                    .set_progress(self.bar.progress().saturating_add(MANUAL_STEP)),
                KeyCode::Char('-') => self
                    .bar
                    .set_progress(self.bar.progress().saturating_sub(MANUAL_STEP)),
                KeyCode::Char('r') => self.bar.set_progress(0),
                _ => {}
            },
        }
    }

    pub fn needs_redraw(&self) -> bool {
        self.needs_render || self.bar.needs_redraw()
    }

    pub fn mark_rendered(&mut self) {
        self.needs_render = false;
        self.bar.take_redraw();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;
    use tokio::sync::mpsc;

    fn core() -> AppCore {
        AppCore::new(Config::default())
    }

    fn key(c: char) -> FrontendEvent {
        FrontendEvent::key(KeyCode::Char(c), KeyModifiers::NONE)
    }

    #[test]
    fn test_new_applies_layout_padding() {
        let core = core();
        assert_eq!(core.bar.padding(), Padding::new(2, 2, 0, 0));
        assert_eq!(core.bar.max(), 100);
        assert!(core.needs_redraw());
    }

    #[test]
    fn test_ticks_forward_changes_to_listener() {
        let mut core = core();
        let (tx, mut rx) = mpsc::unbounded_channel();
        core.attach_listener(tx);

        core.handle_tick();
        core.handle_tick();
        assert_eq!(core.bar.progress(), 2);
        assert_eq!(rx.try_recv().unwrap(), ProgressChange { current: 1, max: 100 });
        assert_eq!(rx.try_recv().unwrap(), ProgressChange { current: 2, max: 100 });
    }

    #[test]
    fn test_pause_ignores_ticks() {
        let mut core = core();
        core.handle_event(&key(' '));
        core.handle_tick();
        assert_eq!(core.bar.progress(), 0);
        assert_eq!(core.ticks, 0);

        core.handle_event(&key(' '));
        core.handle_tick();
        assert_eq!(core.bar.progress(), 1);
    }

    #[test]
    fn test_completion_shows_toast_and_resets() {
        let mut core = core();
        let now = Instant::now();
        core.bar.set_progress(100);

        core.handle_progress_change(ProgressChange { current: 99, max: 100 }, now);
        assert!(core.toast.is_none());

        core.handle_progress_change(ProgressChange { current: 100, max: 100 }, now);
        let toast = core.toast.clone().expect("toast shown");
        assert_eq!(toast.message, "Finished!");
        assert_eq!(core.bar.progress(), 0);

        core.expire_toast(now + Duration::from_millis(100));
        assert!(core.toast.is_some());
        core.expire_toast(now + Duration::from_millis(1500));
        assert!(core.toast.is_none());
    }

    #[test]
    fn test_full_cycle_through_channel() {
        let mut core = core();
        let (tx, mut rx) = mpsc::unbounded_channel();
        core.attach_listener(tx);
        core.bar.set_progress(99);

        core.handle_tick();
        let now = Instant::now();
        while let Ok(change) = rx.try_recv() {
            core.handle_progress_change(change, now);
        }
        assert_eq!(core.bar.progress(), 0);
        assert!(core.toast.is_some());
    }

    #[test]
    fn test_keys() {
        let mut core = core();
        core.handle_event(&key('+'));
        assert_eq!(core.bar.progress(), 5);
        core.handle_event(&key('-'));
        core.handle_event(&key('-'));
        assert_eq!(core.bar.progress(), 0);

        core.handle_event(&key('t'));
        assert!(!core.bar.progress_text_visibility());
        core.handle_event(&key('t'));
        assert!(core.bar.progress_text_visibility());

        core.bar.set_progress(40);
        core.handle_event(&key('r'));
        assert_eq!(core.bar.progress(), 0);

        core.handle_event(&key('q'));
        assert!(!core.running);
    }

    #[test]
    fn test_quit_event_stops() {
        let mut core = core();
        core.handle_event(&FrontendEvent::quit());
        assert!(!core.running);
    }

    #[test]
    fn test_step_not_dividing_max_still_completes() {
        let mut config = Config::default();
        config.demo.step = 3;
        let mut core = AppCore::new(config);
        let (tx, mut rx) = mpsc::unbounded_channel();
        core.attach_listener(tx);

        let now = Instant::now();
        for _ in 0..34 {
            core.handle_tick();
            while let Ok(change) = rx.try_recv() {
                core.handle_progress_change(change, now);
            }
        }

        // 33 ticks reach 99, the 34th lands on 100 and starts over
        assert!(core.toast.is_some());
        assert_eq!(core.bar.progress(), 0);

        core.handle_tick();
        assert_eq!(core.bar.progress(), 3);
    }

    #[test]
    fn test_tick_at_max_reports_completion() {
        let mut core = core();
        let (tx, mut rx) = mpsc::unbounded_channel();
        core.attach_listener(tx);
        core.bar.set_progress(100);

        core.handle_tick();
        assert_eq!(rx.try_recv().unwrap(), ProgressChange { current: 100, max: 100 });
    }

    #[test]
    fn test_manual_keys_near_i32_max() {
        let mut core = core();
        core.bar.set_max(i32::MAX);
        core.bar.set_progress(i32::MAX - 1);

        core.handle_event(&key('+'));
        assert_eq!(core.bar.progress(), i32::MAX);
        core.handle_event(&key('+'));
        assert_eq!(core.bar.progress(), i32::MAX);

        core.bar.set_progress(2);
        core.handle_event(&key('-'));
        assert_eq!(core.bar.progress(), 2);
    }

    #[test]
    fn test_snapshot_restore() {
        let mut first = core();
        first.bar.set_progress(37);
        first.bar.set_suffix(Some(" done"));
        let saved = first.snapshot();

        let mut second = core();
        assert!(second.restore(&saved).unwrap());
        assert_eq!(second.bar.progress(), 37);
        assert_eq!(second.bar.suffix(), " done");

        assert!(!second.restore(&WidgetState::new()).unwrap());
    }

    #[test]
    fn test_mark_rendered_clears_both_flags() {
        let mut core = core();
        core.mark_rendered();
        assert!(!core.needs_redraw());

        core.bar.set_progress(3);
        assert!(core.needs_redraw());
        core.mark_rendered();
        assert!(!core.needs_redraw());
    }
}
