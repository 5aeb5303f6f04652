//! Size resolution from layout constraints.
//!
//! Mirrors the usual parent/child measure handshake: the parent says how
//! much room there is and how binding that is, the widget answers with a size.

/// Constraint handed down by the layout driver for one axis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeasureSpec {
    /// The parent has decided the size
    Exactly(u16),
    /// The widget may be as large as it wants up to this size
    AtMost(u16),
    /// No constraint
    Unspecified,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Horizontal,
    Vertical,
}

/// Resolve one axis.
///
/// `suggested` is the widget's minimum content size and `padding` the sum of
/// the paddings along the axis. A width under `AtMost` grows to fill the
/// available space; a height under `AtMost` is capped by it.
pub fn resolve_size(spec: MeasureSpec, suggested: u16, padding: u16, axis: Axis) -> u16 {
    match spec {
        MeasureSpec::Exactly(size) => size,
        MeasureSpec::Unspecified => suggested.saturating_add(padding),
        MeasureSpec::AtMost(size) => {
            let wanted = suggested.saturating_add(padding);
            match axis {
                Axis::Horizontal => wanted.max(size),
                Axis::Vertical => wanted.min(size),
            }
        }
    }
}
