//! Number progress bar rendered into a ratatui buffer.
//!
//! Asks the widget state for its draw geometry and rasterizes it onto the
//! cell grid, with an optional border around it so it matches the rest of
//! the screen.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    text::Line,
    widgets::{Block, BorderType, Borders, Clear, Widget},
};

use crate::config::LayoutConfig;
use crate::widget_state::parse_color;
use crate::widgets::{NumberProgressBar, RectF};

/// A borrowed view of a [`NumberProgressBar`] that knows how to paint it
pub struct ProgressBarView<'a> {
    bar: &'a NumberProgressBar,
    label: String,
    show_border: bool,
    border_style: Option<String>,
    border_color: Option<Color>,
}

impl<'a> ProgressBarView<'a> {
    pub fn new(bar: &'a NumberProgressBar) -> Self {
        Self {
            bar,
            label: String::new(),
            show_border: false,
            border_style: None,
            border_color: None,
        }
    }

    /// View configured from the `[layout]` section
    pub fn from_layout(bar: &'a NumberProgressBar, layout: &LayoutConfig) -> Self {
        let mut view = Self::new(bar);
        view.set_border_config(
            layout.show_border,
            layout.border_style.clone(),
            layout.border_color.clone(),
        );
        if let Some(title) = &layout.title {
            view.set_title(title.clone());
        }
        view
    }

    pub fn set_border_config(
        &mut self,
        show_border: bool,
        border_style: Option<String>,
        border_color: Option<String>,
    ) {
        self.show_border = show_border;
        self.border_style = border_style;
        self.border_color = border_color.and_then(|c| parse_color(&c));
    }

    pub fn set_title(&mut self, title: String) {
        self.label = title;
    }

    pub fn render(&self, area: Rect, buf: &mut Buffer) {
        if (self.show_border && (area.width < 3 || area.height < 3)) || area.height < 1 {
            return;
        }

        if !self.show_border && area.width == 0 {
            return;
        }

        Clear.render(area, buf);

        let inner_area = if self.show_border {
            let mut block = Block::default().borders(Borders::ALL);

            if let Some(ref style) = self.border_style {
                let border_type = match style.as_str() {
                    "double" => BorderType::Double,
                    "rounded" => BorderType::Rounded,
                    "thick" => BorderType::Thick,
                    _ => BorderType::Plain,
                };
                block = block.border_type(border_type);
            }

            if let Some(color) = self.border_color {
                block = block.border_style(Style::default().fg(color));
            }

            if !self.label.is_empty() {
                block = block.title(self.label.as_str());
            }

            let inner = block.inner(area);
            block.render(area, buf);
            inner
        } else {
            area
        };

        // Never write outside the buffer
        let inner_area = inner_area.intersection(*buf.area());
        if inner_area.width == 0 || inner_area.height == 0 {
            return;
        }

        let text = self.bar.current_draw_text();
        let text_width = Line::raw(text.as_str()).width() as f32;

        let geometry = self.bar.calculate_draw_geometry(
            inner_area.width as f32,
            inner_area.height as f32,
            text_width,
        );
        let painters = self.bar.painters();

        if let Some(rect) = geometry.reached {
            fill_band(buf, inner_area, rect, painters.reached);
        }
        if let Some(rect) = geometry.unreached {
            fill_band(buf, inner_area, rect, painters.unreached);
        }

        if let Some(origin) = geometry.text_origin {
            let col = origin.x.round().max(0.0) as u16;
            let row = origin.y.max(0.0) as u16;
            if col < inner_area.width && row < inner_area.height {
                buf.set_stringn(
                    inner_area.x + col,
                    inner_area.y + row,
                    &text,
                    (inner_area.width - col) as usize,
                    painters.text,
                );
            }
        }
    }
}

impl Widget for &ProgressBarView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        ProgressBarView::render(self, area, buf);
    }
}

/// Glyph for a row covered by `coverage` (0.0..=1.0) of a bar
fn glyph_for(coverage: f32) -> Option<char> {
    if coverage >= 0.99 {
        Some('█')
    } else if coverage >= 0.6 {
        Some('━')
    } else if coverage > 0.0 {
        Some('─')
    } else {
        None
    }
}

/// Paint `rect` (relative to `area`) with the glyph its row coverage calls for
fn fill_band(buf: &mut Buffer, area: Rect, rect: RectF, style: Style) {
    let col_start = rect.left.round().max(0.0) as u16;
    let col_end = (rect.right.round().max(0.0) as u16).min(area.width);
    if col_start >= col_end {
        return;
    }

    for row in 0..area.height {
        let row_top = row as f32;
        let coverage = (rect.bottom.min(row_top + 1.0) - rect.top.max(row_top)).max(0.0);
        let Some(glyph) = glyph_for(coverage) else {
            continue;
        };

        for col in col_start..col_end {
            buf[(area.x + col, area.y + row)]
                .set_char(glyph)
                .set_style(style);
        }
    }
}

/// Render a view off-screen and return its rows as plain text
pub fn render_to_lines(view: &ProgressBarView<'_>, width: u16, height: u16) -> Vec<String> {
    let area = Rect::new(0, 0, width, height);
    let mut buf = Buffer::empty(area);
    view.render(area, &mut buf);
    buffer_lines(&buf)
}

fn buffer_lines(buf: &Buffer) -> Vec<String> {
    let area = buf.area();
    (area.top()..area.bottom())
        .map(|y| {
            (area.left()..area.right())
                .map(|x| buf[(x, y)].symbol())
                .collect::<String>()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widgets::ProgressTextVisibility;

    fn bar_at(progress: i32) -> NumberProgressBar {
        let mut bar = NumberProgressBar::new();
        bar.set_progress(progress);
        bar
    }

    #[test]
    fn test_label_between_bars() {
        let bar = bar_at(50);
        let lines = render_to_lines(&ProgressBarView::new(&bar), 20, 1);
        assert_eq!(lines, vec!["━━━━━━━━━ 50% ──────"]);
    }

    #[test]
    fn test_zero_progress_has_no_reached_bar() {
        let bar = bar_at(0);
        let lines = render_to_lines(&ProgressBarView::new(&bar), 20, 1);
        assert_eq!(lines, vec!["0% ─────────────────"]);
    }

    #[test]
    fn test_full_progress_clamps_label() {
        let bar = bar_at(100);
        let lines = render_to_lines(&ProgressBarView::new(&bar), 20, 1);
        assert_eq!(lines, vec!["━━━━━━━━━━━━━━━ 100%"]);
    }

    #[test]
    fn test_bar_colors() {
        let bar = bar_at(50);
        let area = Rect::new(0, 0, 20, 1);
        let mut buf = Buffer::empty(area);
        ProgressBarView::new(&bar).render(area, &mut buf);

        assert_eq!(buf[(0, 0)].fg, Color::Rgb(66, 145, 241));
        assert_eq!(buf[(11, 0)].fg, Color::Rgb(66, 145, 241));
        assert_eq!(buf[(19, 0)].fg, Color::Rgb(204, 204, 204));
    }

    #[test]
    fn test_tall_hidden_text_bars() {
        let mut bar = bar_at(50);
        bar.set_reached_bar_height(3.0);
        bar.set_progress_text_visibility(ProgressTextVisibility::Invisible);

        let lines = render_to_lines(&ProgressBarView::new(&bar), 10, 3);
        assert_eq!(lines, vec!["█████     ", "█████─────", "█████     "]);
    }

    #[test]
    fn test_border_and_title() {
        let bar = bar_at(50);
        let mut view = ProgressBarView::new(&bar);
        view.set_border_config(true, Some("plain".to_string()), None);
        view.set_title("Load".to_string());

        let lines = render_to_lines(&view, 22, 3);
        assert_eq!(lines[0], "┌Load────────────────┐");
        assert_eq!(lines[1], "│━━━━━━━━━ 50% ──────│");
        assert_eq!(lines[2], "└────────────────────┘");
    }

    #[test]
    fn test_too_small_for_border_draws_nothing() {
        let bar = bar_at(50);
        let mut view = ProgressBarView::new(&bar);
        view.set_border_config(true, None, None);

        let lines = render_to_lines(&view, 10, 2);
        assert_eq!(lines, vec!["          ", "          "]);
    }

    #[test]
    fn test_label_wider_than_area_is_truncated() {
        let mut bar = bar_at(40);
        bar.set_prefix(Some("progress: "));
        let lines = render_to_lines(&ProgressBarView::new(&bar), 8, 1);
        assert_eq!(lines, vec!["progress"]);
    }
}
