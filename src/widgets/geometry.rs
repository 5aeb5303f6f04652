//! Draw-rect geometry for the number progress bar.
//!
//! Pure arithmetic: given the available bounds, paddings, and the current
//! progress, work out where the reached bar, the unreached bar, and the
//! percentage label go. Units are whatever the frontend measures in (terminal
//! cells for the TUI), so everything is kept as `f32` until rasterization.

/// Axis-aligned rectangle in floating point coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RectF {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl RectF {
    pub fn new(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }

    /// A rect whose right edge is at or before its left edge draws nothing
    pub fn is_empty(&self) -> bool {
        self.right <= self.left
    }

    /// Horizontal band of `band_height` centred on `center_y`
    fn band(left: f32, right: f32, center_y: f32, band_height: f32) -> Self {
        Self::new(
            left,
            center_y - band_height / 2.0,
            right,
            center_y + band_height / 2.0,
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PointF {
    pub x: f32,
    pub y: f32,
}

/// Everything the calculator needs, flattened out of the widget
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeometryInput {
    pub width: f32,
    pub height: f32,
    pub padding_left: f32,
    pub padding_right: f32,
    pub progress: i32,
    pub max: i32,
    pub reached_bar_height: f32,
    pub unreached_bar_height: f32,
    pub text_offset: f32,
    pub text_size: f32,
    /// Width of the label as measured by the frontend
    pub text_width: f32,
    pub text_visible: bool,
}

/// Result of a layout pass. `None` means "do not draw".
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DrawGeometry {
    pub reached: Option<RectF>,
    pub unreached: Option<RectF>,
    /// Top-left of the label's line box; only set when text is visible
    pub text_origin: Option<PointF>,
}

/// Compute the draw geometry, dispatching on text visibility
pub fn calculate(input: &GeometryInput) -> DrawGeometry {
    if input.text_visible {
        calculate_with_text(input)
    } else {
        calculate_without_text(input)
    }
}

fn proportional_position(input: &GeometryInput) -> f32 {
    let inner = input.width - input.padding_left - input.padding_right;
    inner / input.max as f32 * input.progress as f32
}

fn non_empty(rect: RectF) -> Option<RectF> {
    (!rect.is_empty()).then_some(rect)
}

fn calculate_without_text(input: &GeometryInput) -> DrawGeometry {
    let center_y = input.height / 2.0;
    let bar_end = input.width - input.padding_right;

    let reached_right = proportional_position(input) + input.padding_left;
    let reached = RectF::band(
        input.padding_left,
        reached_right,
        center_y,
        input.reached_bar_height,
    );
    let unreached = RectF::band(reached_right, bar_end, center_y, input.unreached_bar_height);

    DrawGeometry {
        reached: if input.progress == 0 {
            None
        } else {
            non_empty(reached)
        },
        unreached: non_empty(unreached),
        text_origin: None,
    }
}

fn calculate_with_text(input: &GeometryInput) -> DrawGeometry {
    let center_y = input.height / 2.0;
    let bar_end = input.width - input.padding_right;
    let offset = input.text_offset;

    let mut reached = RectF::band(
        input.padding_left,
        proportional_position(input) - offset + input.padding_left,
        center_y,
        input.reached_bar_height,
    );
    let draw_reached = input.progress != 0;

    let mut text_start = if draw_reached {
        reached.right + offset
    } else {
        input.padding_left
    };

    // Label never runs past the right padding; the bar gives way to it
    if text_start + input.text_width >= bar_end {
        text_start = bar_end - input.text_width;
        reached.right = text_start - offset;
    }

    let unreached_start = text_start + input.text_width + offset;
    let unreached = if unreached_start >= bar_end {
        None
    } else {
        Some(RectF::band(
            unreached_start,
            bar_end,
            center_y,
            input.unreached_bar_height,
        ))
    };

    DrawGeometry {
        reached: if draw_reached { non_empty(reached) } else { None },
        unreached,
        text_origin: Some(PointF {
            x: text_start,
            y: (center_y - input.text_size / 2.0).floor(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(progress: i32, text_width: f32) -> GeometryInput {
        GeometryInput {
            width: 100.0,
            height: 10.0,
            padding_left: 0.0,
            padding_right: 0.0,
            progress,
            max: 100,
            reached_bar_height: 2.0,
            unreached_bar_height: 1.0,
            text_offset: 3.0,
            text_size: 4.0,
            text_width,
            text_visible: true,
        }
    }

    #[test]
    fn test_label_sits_between_bars() {
        let geo = calculate(&input(50, 10.0));

        let reached = geo.reached.expect("reached bar drawn");
        assert_eq!(reached, RectF::new(0.0, 4.0, 47.0, 6.0));

        let origin = geo.text_origin.expect("text visible");
        assert_eq!(origin.x, 50.0);
        assert_eq!(origin.y, 3.0);

        let unreached = geo.unreached.expect("unreached bar drawn");
        assert_eq!(unreached, RectF::new(63.0, 4.5, 100.0, 5.5));
    }

    #[test]
    fn test_zero_progress_suppresses_reached_bar() {
        let geo = calculate(&input(0, 10.0));
        assert!(geo.reached.is_none());
        assert_eq!(geo.text_origin.unwrap().x, 0.0);
        assert_eq!(geo.unreached.unwrap().left, 13.0);

        let mut hidden = input(0, 10.0);
        hidden.text_visible = false;
        let geo = calculate(&hidden);
        assert!(geo.reached.is_none());
        assert_eq!(geo.unreached.unwrap(), RectF::new(0.0, 4.5, 100.0, 5.5));
    }

    #[test]
    fn test_label_clamped_to_right_edge() {
        let geo = calculate(&input(95, 10.0));

        assert_eq!(geo.text_origin.unwrap().x, 90.0);
        assert_eq!(geo.reached.unwrap().right, 87.0);
        // 90 + 10 + 3 runs past the edge, nothing left for the track
        assert!(geo.unreached.is_none());
    }

    #[test]
    fn test_full_progress_keeps_label_inside() {
        let geo = calculate(&input(100, 10.0));
        assert_eq!(geo.text_origin.unwrap().x, 90.0);
        assert_eq!(geo.reached.unwrap().right, 87.0);
        assert!(geo.unreached.is_none());
    }

    #[test]
    fn test_clamp_respects_padding() {
        let mut inp = input(100, 10.0);
        inp.padding_left = 5.0;
        inp.padding_right = 5.0;
        let geo = calculate(&inp);

        assert_eq!(geo.reached.unwrap().left, 5.0);
        assert_eq!(geo.text_origin.unwrap().x, 85.0);
        assert_eq!(geo.reached.unwrap().right, 82.0);
    }

    #[test]
    fn test_unreached_suppressed_when_label_fills_track() {
        // Label just shy of the edge, but the offset pushes the track past it
        let geo = calculate(&input(10, 88.0));
        assert_eq!(geo.text_origin.unwrap().x, 10.0);
        assert!(geo.unreached.is_none());
    }

    #[test]
    fn test_tiny_progress_reports_degenerate_bar_as_hidden() {
        // 1% of 100 minus a 3 cell offset ends left of the padding
        let geo = calculate(&input(1, 4.0));
        assert!(geo.reached.is_none());
        assert_eq!(geo.text_origin.unwrap().x, 1.0);
    }

    #[test]
    fn test_without_text_splits_inner_width() {
        let mut inp = input(25, 0.0);
        inp.text_visible = false;
        inp.padding_left = 10.0;
        inp.padding_right = 10.0;
        let geo = calculate(&inp);

        assert_eq!(geo.reached.unwrap(), RectF::new(10.0, 4.0, 30.0, 6.0));
        assert_eq!(geo.unreached.unwrap(), RectF::new(30.0, 4.5, 90.0, 5.5));
        assert!(geo.text_origin.is_none());
    }

    #[test]
    fn test_without_text_full_progress_hides_track() {
        let mut inp = input(100, 0.0);
        inp.text_visible = false;
        let geo = calculate(&inp);
        assert_eq!(geo.reached.unwrap().right, 100.0);
        assert!(geo.unreached.is_none());
    }
}
