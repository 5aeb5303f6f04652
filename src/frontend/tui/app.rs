use crate::core::AppCore;
use crate::frontend::{Frontend, FrontendEvent};
use crate::widgets::MeasureSpec;
use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
    Frame, Terminal,
};
use std::io;
use std::time::Duration;

use super::progress_bar::ProgressBarView;

/// TUI Frontend using ratatui
///
/// Renders the demo screen with ratatui and handles events via crossterm.
pub struct TuiFrontend {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
    poll_timeout: Duration,
}

impl TuiFrontend {
    /// Create a new TUI frontend
    ///
    /// Puts the terminal in raw mode and enters the alternate screen.
    pub fn new() -> Result<Self> {
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen).context("Failed to setup terminal")?;

        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;
        terminal.hide_cursor()?;

        Ok(Self {
            terminal,
            poll_timeout: Duration::from_millis(16), // ~60 FPS
        })
    }

    /// Set poll timeout (for controlling frame rate)
    pub fn set_poll_timeout(&mut self, timeout: Duration) {
        self.poll_timeout = timeout;
    }

    /// Convert crossterm event to FrontendEvent
    fn convert_event(event: Event) -> Option<FrontendEvent> {
        match event {
            Event::Key(key_event) => {
                // Only process key press events (ignore repeats and releases)
                if key_event.kind != KeyEventKind::Press {
                    return None;
                }
                let event = FrontendEvent::key(key_event.code, key_event.modifiers);
                // Ctrl+C arrives as a plain key in raw mode
                if event.is_interrupt() {
                    return Some(FrontendEvent::Quit);
                }
                Some(event)
            }
            Event::Resize(w, h) => Some(FrontendEvent::Resize {
                width: w,
                height: h,
            }),
            _ => None,
        }
    }
}

impl Frontend for TuiFrontend {
    fn poll_events(&mut self) -> Result<Vec<FrontendEvent>> {
        let mut events = Vec::new();

        // First poll waits up to the frame budget, the rest drain what is queued
        let mut timeout = self.poll_timeout;
        while event::poll(timeout)? {
            if let Some(frontend_event) = Self::convert_event(event::read()?) {
                events.push(frontend_event);
            }
            timeout = Duration::ZERO;
        }

        Ok(events)
    }

    fn render(&mut self, core: &mut dyn std::any::Any) -> Result<()> {
        let core = core
            .downcast_mut::<AppCore>()
            .context("render() called with wrong type - expected AppCore")?;

        self.terminal.draw(|f| draw_screen(f, core))?;
        core.mark_rendered();
        Ok(())
    }

    fn cleanup(&mut self) -> Result<()> {
        disable_raw_mode()?;
        execute!(self.terminal.backend_mut(), LeaveAlternateScreen)?;
        self.terminal.show_cursor()?;
        Ok(())
    }

    fn size(&self) -> (u16, u16) {
        let size = self.terminal.size().unwrap_or_default();
        (size.width, size.height)
    }
}

/// Lay out the demo screen: bar in the middle, toast under it, help at the bottom
fn draw_screen(f: &mut Frame, core: &AppCore) {
    let screen = f.area();
    if screen.width < 4 || screen.height < 2 {
        return;
    }

    let bar_area = bar_area(core, screen);
    let view = ProgressBarView::from_layout(&core.bar, &core.config.layout);
    f.render_widget(&view, bar_area);

    if let Some(toast) = &core.toast {
        let width = (toast.message.chars().count() as u16 + 4).min(screen.width);
        let toast_area = Rect::new(
            screen.x + (screen.width - width) / 2,
            (bar_area.bottom() + 1).min(screen.bottom().saturating_sub(4)),
            width,
            3,
        )
        .intersection(screen);

        f.render_widget(Clear, toast_area);
        f.render_widget(
            Paragraph::new(toast.message.as_str())
                .alignment(Alignment::Center)
                .style(Style::default().add_modifier(Modifier::BOLD))
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .border_type(BorderType::Rounded),
                ),
            toast_area,
        );
    }

    let help_area = Rect::new(screen.x, screen.bottom() - 1, screen.width, 1);
    f.render_widget(Paragraph::new(help_line(core, screen.width)), help_area);
}

/// Key hints, dropped from the end until the line fits
const KEY_HINTS: [&str; 4] = ["space pause", "t text", "+/- adjust", "r reset"];

/// Status line. "q quit" is always kept; the other hints go first on narrow screens.
fn help_line(core: &AppCore, width: u16) -> Line<'static> {
    let status = format!(" {} ", if core.paused { "paused" } else { "running" });
    let counts = format!(" {}/{}", core.bar.progress(), core.bar.max());
    let quit = "  q quit";

    let mut hints = KEY_HINTS.len();
    let line_width = |hints: usize| -> usize {
        status.len()
            + counts.len()
            + KEY_HINTS[..hints].iter().map(|h| h.len() + 2).sum::<usize>()
            + quit.len()
    };
    while hints > 0 && line_width(hints) > width as usize {
        hints -= 1;
    }

    let mut text = counts;
    for hint in &KEY_HINTS[..hints] {
        text.push_str("  ");
        text.push_str(hint);
    }
    text.push_str(quit);

    Line::from(vec![
        Span::styled(status, Style::default().fg(Color::Black).bg(Color::Gray)),
        Span::raw(text),
    ])
}

/// Measure the bar against the screen and centre it vertically
fn bar_area(core: &AppCore, screen: Rect) -> Rect {
    let chrome = if core.config.layout.show_border { 2 } else { 0 };
    let margin = 2u16.min(screen.width / 4);

    let avail_width = screen.width.saturating_sub(margin * 2 + chrome);
    let avail_height = screen.height.saturating_sub(1 + chrome);
    let (width, height) = core.bar.on_measure(
        MeasureSpec::AtMost(avail_width),
        MeasureSpec::AtMost(avail_height),
    );

    let outer_height = (height + chrome).min(screen.height.saturating_sub(1));
    Rect::new(
        screen.x + margin,
        screen.y + screen.height.saturating_sub(1 + outer_height) / 2,
        (width + chrome).min(screen.width - margin * 2),
        outer_height,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use ratatui::backend::TestBackend;

    #[test]
    fn test_bar_area_centres_and_fills_width() {
        let core = AppCore::new(Config::default());
        let area = bar_area(&core, Rect::new(0, 0, 80, 24));
        // bordered bar: one content row plus two border rows
        assert_eq!(area, Rect::new(2, 10, 76, 3));
    }

    #[test]
    fn test_draw_screen_shows_bar_and_toast() {
        let mut core = AppCore::new(Config::default());
        core.bar.set_progress(50);
        core.handle_progress_change(
            crate::widgets::ProgressChange { current: 100, max: 100 },
            std::time::Instant::now(),
        );

        let mut terminal = Terminal::new(TestBackend::new(60, 20)).unwrap();
        terminal.draw(|f| draw_screen(f, &core)).unwrap();

        let buffer = terminal.backend().buffer();
        let row = |y: u16| -> String { (0..60).map(|x| buffer[(x, y)].symbol()).collect() };
        let screen: Vec<String> = (0..20).map(row).collect();

        assert!(screen.iter().any(|l| l.contains("Number Progress")));
        assert!(screen.iter().any(|l| l.contains("0%")));
        assert!(screen.iter().any(|l| l.contains("Finished!")));
        assert!(screen[19].contains("q quit"));
    }

    fn line_text(line: &Line<'_>) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn test_help_line_drops_hints_before_quit() {
        let core = AppCore::new(Config::default());

        let wide = line_text(&help_line(&core, 80));
        assert_eq!(
            wide,
            " running  0/100  space pause  t text  +/- adjust  r reset  q quit"
        );

        let narrow = line_text(&help_line(&core, 60));
        assert!(narrow.len() <= 60);
        assert!(!narrow.contains("r reset"));
        assert!(narrow.ends_with("q quit"));

        let tiny = line_text(&help_line(&core, 20));
        assert_eq!(tiny, " running  0/100  q quit");
    }

    #[test]
    fn test_ctrl_c_converts_to_quit() {
        let ctrl_c = Event::Key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert_eq!(TuiFrontend::convert_event(ctrl_c), Some(FrontendEvent::Quit));

        let plain_c = Event::Key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::NONE));
        assert_eq!(
            TuiFrontend::convert_event(plain_c),
            Some(FrontendEvent::key(KeyCode::Char('c'), KeyModifiers::NONE))
        );

        let mut release = KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE);
        release.kind = KeyEventKind::Release;
        assert_eq!(TuiFrontend::convert_event(Event::Key(release)), None);

        assert_eq!(
            TuiFrontend::convert_event(Event::Resize(100, 30)),
            Some(FrontendEvent::resize(100, 30))
        );
    }
}
