//! Panel geometry: two columns, active over errored on the left, completed
//! on the right.
//!
//! ```text
//! ┌ Active ────┐┌ Completed ─┐
//! │            ││            │
//! └────────────┘│            │
//! ┌ Errored ───┐│            │
//! │            ││            │
//! └────────────┘└────────────┘
//! ```
//!
//! Active and errored each get half the height (rounded down); completed
//! is twice the active height. Recomputed on every resize.

use ratatui::layout::Rect;

/// Computed positions of the three panels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PanelGeometry {
    /// Active panel, top of the left column.
    pub active: Rect,
    /// Errored panel, bottom of the left column.
    pub errored: Rect,
    /// Completed panel, the right column.
    pub completed: Rect,
}

impl PanelGeometry {
    /// Geometry for a `width` x `height` terminal.
    pub fn compute(width: u16, height: u16) -> Self {
        let left_width = width / 2;
        let right_width = width - left_width;
        let half = height / 2;

        Self {
            active: Rect::new(0, 0, left_width, half),
            errored: Rect::new(0, half, left_width, half),
            completed: Rect::new(left_width, 0, right_width, half.saturating_mul(2)),
        }
    }
}
