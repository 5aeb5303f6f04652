//! Number progress bar state (rendering-agnostic)
//!
//! Holds progress/max, bar and text styling, and the percentage label
//! settings. Frontends ask it for a [`DrawGeometry`] and paint the result;
//! the TUI does this in `frontend::tui::progress_bar`.

use anyhow::Result;
use ratatui::style::{Color, Style};
use ratatui::widgets::Padding;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::geometry::{self, DrawGeometry, GeometryInput};
use super::listener::ProgressListener;
use super::measure::{resolve_size, Axis, MeasureSpec};
use crate::config::ProgressBarStyle;
use crate::widget_state::{color_to_string, parse_color, Bundle};

// Bundle keys
const KEY_TEXT_COLOR: &str = "text_color";
const KEY_TEXT_SIZE: &str = "text_size";
const KEY_REACHED_BAR_HEIGHT: &str = "reached_bar_height";
const KEY_REACHED_BAR_COLOR: &str = "reached_bar_color";
const KEY_UNREACHED_BAR_HEIGHT: &str = "unreached_bar_height";
const KEY_UNREACHED_BAR_COLOR: &str = "unreached_bar_color";
const KEY_MAX: &str = "max";
const KEY_PROGRESS: &str = "progress";
const KEY_SUFFIX: &str = "suffix";
const KEY_PREFIX: &str = "prefix";
const KEY_TEXT_VISIBILITY: &str = "text_visibility";

const DEFAULT_TEXT_COLOR: Color = Color::Rgb(66, 145, 241);
const DEFAULT_REACHED_COLOR: Color = Color::Rgb(66, 145, 241);
const DEFAULT_UNREACHED_COLOR: Color = Color::Rgb(204, 204, 204);
const DEFAULT_TEXT_SIZE: f32 = 1.0;
const DEFAULT_REACHED_BAR_HEIGHT: f32 = 0.75;
const DEFAULT_UNREACHED_BAR_HEIGHT: f32 = 0.5;
const DEFAULT_TEXT_OFFSET: f32 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProgressTextVisibility {
    #[default]
    Visible,
    Invisible,
}

/// Styles derived from the bar colors, rebuilt by `initialize_painters`
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Painters {
    pub reached: Style,
    pub unreached: Style,
    pub text: Style,
}

pub struct NumberProgressBar {
    max_progress: i32,

    /// Current progress, never exceeds `max_progress`
    current_progress: i32,

    reached_bar_color: Color,
    unreached_bar_color: Color,
    text_color: Color,
    text_size: f32,
    reached_bar_height: f32,
    unreached_bar_height: f32,

    /// Gap between a bar end and the label
    text_offset: f32,

    prefix: String,
    suffix: String,
    draw_text: bool,
    padding: Padding,

    painters: Painters,
    needs_redraw: bool,
    listener: Option<Box<dyn ProgressListener>>,
}

impl NumberProgressBar {
    pub fn new() -> Self {
        let mut bar = Self {
            max_progress: 100,
            current_progress: 0,
            reached_bar_color: DEFAULT_REACHED_COLOR,
            unreached_bar_color: DEFAULT_UNREACHED_COLOR,
            text_color: DEFAULT_TEXT_COLOR,
            text_size: DEFAULT_TEXT_SIZE,
            reached_bar_height: DEFAULT_REACHED_BAR_HEIGHT,
            unreached_bar_height: DEFAULT_UNREACHED_BAR_HEIGHT,
            text_offset: DEFAULT_TEXT_OFFSET,
            prefix: String::new(),
            suffix: "%".to_string(),
            draw_text: true,
            padding: Padding::ZERO,
            painters: Painters::default(),
            needs_redraw: true,
            listener: None,
        };
        bar.initialize_painters();
        bar
    }

    /// Build a bar from styled attributes. Invalid colors keep the default.
    pub fn from_style(style: &ProgressBarStyle) -> Self {
        let mut bar = Self::new();

        bar.reached_bar_color =
            style_color("reached_color", &style.reached_color, DEFAULT_REACHED_COLOR);
        bar.unreached_bar_color =
            style_color("unreached_color", &style.unreached_color, DEFAULT_UNREACHED_COLOR);
        bar.text_color = style_color("text_color", &style.text_color, DEFAULT_TEXT_COLOR);
        bar.text_size = style.text_size;
        bar.reached_bar_height = style.reached_bar_height;
        bar.unreached_bar_height = style.unreached_bar_height;
        bar.text_offset = style.text_offset;
        bar.draw_text = style.text_visibility == ProgressTextVisibility::Visible;
        bar.prefix = style.prefix.clone();
        bar.suffix = style.suffix.clone();

        // Max first, so an initial progress above the default max is accepted
        bar.set_max(style.max);
        bar.set_progress(style.progress);

        bar.initialize_painters();
        bar
    }

    fn initialize_painters(&mut self) {
        self.painters = Painters {
            reached: Style::default().fg(self.reached_bar_color),
            unreached: Style::default().fg(self.unreached_bar_color),
            text: Style::default().fg(self.text_color),
        };
    }

    // ---- redraw tracking ----

    pub fn invalidate(&mut self) {
        self.needs_redraw = true;
    }

    pub fn needs_redraw(&self) -> bool {
        self.needs_redraw
    }

    /// Clear the redraw request, returning whether one was pending
    pub fn take_redraw(&mut self) -> bool {
        std::mem::take(&mut self.needs_redraw)
    }

    // ---- progress ----

    pub fn progress(&self) -> i32 {
        self.current_progress
    }

    pub fn max(&self) -> i32 {
        self.max_progress
    }

    /// Accepted only within `0..=max`; anything else is ignored
    pub fn set_progress(&mut self, progress: i32) {
        if (0..=self.max_progress).contains(&progress) {
            self.current_progress = progress;
            self.invalidate();
        } else {
            tracing::trace!(progress, max = self.max_progress, "Ignoring out-of-range progress");
        }
    }

    /// Accepted only when positive. Progress is pulled down to a smaller max.
    pub fn set_max(&mut self, max: i32) {
        if max > 0 {
            self.max_progress = max;
            if self.current_progress > max {
                self.current_progress = max;
            }
            self.invalidate();
        } else {
            tracing::trace!(max, "Ignoring non-positive max");
        }
    }

    /// Add `by` (if positive) and tell the listener where the bar ended up.
    ///
    /// The listener hears about every call, including ones where the
    /// increment was ignored because it would pass max.
    pub fn increment_progress_by(&mut self, by: i32) {
        if by > 0 {
            self.set_progress(self.current_progress.saturating_add(by));
        }

        let (current, max) = (self.current_progress, self.max_progress);
        if let Some(listener) = self.listener.as_mut() {
            listener.on_progress_change(current, max);
        }
    }

    pub fn set_on_progress_bar_listener(&mut self, listener: Option<Box<dyn ProgressListener>>) {
        self.listener = listener;
    }

    pub fn has_listener(&self) -> bool {
        self.listener.is_some()
    }

    /// Whole percent, rounded down
    pub fn percent(&self) -> i64 {
        self.current_progress as i64 * 100 / self.max_progress as i64
    }

    /// The label drawn between the bars: prefix, whole percent, suffix
    pub fn current_draw_text(&self) -> String {
        format!("{}{}{}", self.prefix, self.percent(), self.suffix)
    }

    // ---- styling ----

    pub fn text_color(&self) -> Color {
        self.text_color
    }

    pub fn progress_text_size(&self) -> f32 {
        self.text_size
    }

    pub fn reached_bar_color(&self) -> Color {
        self.reached_bar_color
    }

    pub fn unreached_bar_color(&self) -> Color {
        self.unreached_bar_color
    }

    pub fn reached_bar_height(&self) -> f32 {
        self.reached_bar_height
    }

    pub fn unreached_bar_height(&self) -> f32 {
        self.unreached_bar_height
    }

    pub fn text_offset(&self) -> f32 {
        self.text_offset
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn suffix(&self) -> &str {
        &self.suffix
    }

    pub fn progress_text_visibility(&self) -> bool {
        self.draw_text
    }

    pub fn padding(&self) -> Padding {
        self.padding
    }

    pub fn painters(&self) -> Painters {
        self.painters
    }

    pub fn set_progress_text_size(&mut self, text_size: f32) {
        self.text_size = text_size;
        self.invalidate();
    }

    pub fn set_progress_text_color(&mut self, color: Color) {
        self.text_color = color;
        self.painters.text = Style::default().fg(color);
        self.invalidate();
    }

    pub fn set_reached_bar_color(&mut self, color: Color) {
        self.reached_bar_color = color;
        self.painters.reached = Style::default().fg(color);
        self.invalidate();
    }

    pub fn set_unreached_bar_color(&mut self, color: Color) {
        self.unreached_bar_color = color;
        self.painters.unreached = Style::default().fg(color);
        self.invalidate();
    }

    pub fn set_reached_bar_height(&mut self, height: f32) {
        self.reached_bar_height = height;
        self.invalidate();
    }

    pub fn set_unreached_bar_height(&mut self, height: f32) {
        self.unreached_bar_height = height;
        self.invalidate();
    }

    pub fn set_text_offset(&mut self, offset: f32) {
        self.text_offset = offset;
        self.invalidate();
    }

    /// `None` clears the prefix
    pub fn set_prefix(&mut self, prefix: Option<&str>) {
        self.prefix = prefix.unwrap_or_default().to_string();
        self.invalidate();
    }

    /// `None` clears the suffix
    pub fn set_suffix(&mut self, suffix: Option<&str>) {
        self.suffix = suffix.unwrap_or_default().to_string();
        self.invalidate();
    }

    pub fn set_progress_text_visibility(&mut self, visibility: ProgressTextVisibility) {
        self.draw_text = visibility == ProgressTextVisibility::Visible;
        self.invalidate();
    }

    pub fn set_padding(&mut self, padding: Padding) {
        self.padding = padding;
        self.invalidate();
    }

    // ---- measure / layout ----

    pub fn suggested_minimum_width(&self) -> u16 {
        self.text_size as u16
    }

    pub fn suggested_minimum_height(&self) -> u16 {
        self.text_size
            .max(self.reached_bar_height.max(self.unreached_bar_height)) as u16
    }

    /// Resolve the widget size for the given constraints
    pub fn on_measure(&self, width_spec: MeasureSpec, height_spec: MeasureSpec) -> (u16, u16) {
        let horizontal = self.padding.left.saturating_add(self.padding.right);
        let vertical = self.padding.top.saturating_add(self.padding.bottom);
        (
            resolve_size(
                width_spec,
                self.suggested_minimum_width(),
                horizontal,
                Axis::Horizontal,
            ),
            resolve_size(
                height_spec,
                self.suggested_minimum_height(),
                vertical,
                Axis::Vertical,
            ),
        )
    }

    /// Lay the bar out in a `width` x `height` box.
    ///
    /// `text_width` is the measured width of [`Self::current_draw_text`]; it
    /// is ignored when the text is hidden.
    pub fn calculate_draw_geometry(&self, width: f32, height: f32, text_width: f32) -> DrawGeometry {
        geometry::calculate(&GeometryInput {
            width,
            height,
            padding_left: self.padding.left as f32,
            padding_right: self.padding.right as f32,
            progress: self.current_progress,
            max: self.max_progress,
            reached_bar_height: self.reached_bar_height,
            unreached_bar_height: self.unreached_bar_height,
            text_offset: self.text_offset,
            text_size: self.text_size,
            text_width,
            text_visible: self.draw_text,
        })
    }

    // ---- save / restore ----

    pub fn save_instance_state(&self) -> Bundle {
        let mut bundle = Bundle::new();
        bundle.put_string(KEY_TEXT_COLOR, color_to_string(&self.text_color));
        bundle.put_float(KEY_TEXT_SIZE, self.text_size);
        bundle.put_float(KEY_REACHED_BAR_HEIGHT, self.reached_bar_height);
        bundle.put_float(KEY_UNREACHED_BAR_HEIGHT, self.unreached_bar_height);
        bundle.put_string(KEY_REACHED_BAR_COLOR, color_to_string(&self.reached_bar_color));
        bundle.put_string(KEY_UNREACHED_BAR_COLOR, color_to_string(&self.unreached_bar_color));
        bundle.put_int(KEY_MAX, self.max_progress);
        bundle.put_int(KEY_PROGRESS, self.current_progress);
        bundle.put_string(KEY_SUFFIX, self.suffix.as_str());
        bundle.put_string(KEY_PREFIX, self.prefix.as_str());
        bundle.put_bool(KEY_TEXT_VISIBILITY, self.draw_text);
        bundle
    }

    /// Restore from a saved bundle.
    ///
    /// Every key is decoded before anything is applied, so a bad bundle
    /// leaves the bar as it was.
    pub fn restore_instance_state(&mut self, bundle: &Bundle) -> Result<()> {
        let text_color = bundle.get_color(KEY_TEXT_COLOR)?;
        let text_size = bundle.get_float(KEY_TEXT_SIZE)?;
        let reached_bar_height = bundle.get_float(KEY_REACHED_BAR_HEIGHT)?;
        let unreached_bar_height = bundle.get_float(KEY_UNREACHED_BAR_HEIGHT)?;
        let reached_bar_color = bundle.get_color(KEY_REACHED_BAR_COLOR)?;
        let unreached_bar_color = bundle.get_color(KEY_UNREACHED_BAR_COLOR)?;
        let max = bundle.get_int(KEY_MAX)?;
        let progress = bundle.get_int(KEY_PROGRESS)?;
        let prefix = bundle.get_string(KEY_PREFIX)?;
        let suffix = bundle.get_string(KEY_SUFFIX)?;
        let text_visible = bundle.get_bool(KEY_TEXT_VISIBILITY)?;

        self.text_color = text_color;
        self.text_size = text_size;
        self.reached_bar_height = reached_bar_height;
        self.unreached_bar_height = unreached_bar_height;
        self.reached_bar_color = reached_bar_color;
        self.unreached_bar_color = unreached_bar_color;
        self.initialize_painters();

        self.set_max(max);
        self.set_progress(progress);
        self.set_prefix(Some(prefix));
        self.set_suffix(Some(suffix));
        self.set_progress_text_visibility(if text_visible {
            ProgressTextVisibility::Visible
        } else {
            ProgressTextVisibility::Invisible
        });

        tracing::debug!(
            progress = self.current_progress,
            max = self.max_progress,
            "Restored progress bar state"
        );
        Ok(())
    }
}

fn style_color(field: &str, value: &str, fallback: Color) -> Color {
    parse_color(value).unwrap_or_else(|| {
        tracing::warn!("Invalid {} {:?}, using default", field, value);
        fallback
    })
}

impl Default for NumberProgressBar {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for NumberProgressBar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NumberProgressBar")
            .field("progress", &self.current_progress)
            .field("max", &self.max_progress)
            .field("prefix", &self.prefix)
            .field("suffix", &self.suffix)
            .field("draw_text", &self.draw_text)
            .field("has_listener", &self.listener.is_some())
            .finish_non_exhaustive()
    }
}
