//! Shared test utilities for the simple-crop test suite.
//!
//! ```text
//! use crate::test_helpers::*;
//!
//! let state = ready_state(1000.0, 1000.0, 2000, 2000);
//! let rect = state.rect.unwrap();
//! assert_within_bounds(&rect, &state.geometry.unwrap(), MIN_SIZE);
//! ```

use crate::config::CropConfig;
use crate::crop::{CropRect, DisplayGeometry, EditorState, InputEvent, transition};

/// Tolerance for float comparisons against display bounds.
const EPS: f64 = 1e-9;

/// Editor state with a measured display box and a decoded image, using the
/// stock crop settings. The rectangle is initialized.
pub fn ready_state(display_w: f64, display_h: f64, src_w: u32, src_h: u32) -> EditorState {
    let state = EditorState::new(CropConfig::default());
    let state = transition(
        &state,
        &InputEvent::Layout {
            geometry: DisplayGeometry::sized(display_w, display_h),
        },
    );
    transition(
        &state,
        &InputEvent::ImageReady {
            width: src_w,
            height: src_h,
        },
    )
}

/// Assert the rectangle lies inside `bounds` with at least `min` per side
/// (or the full display extent when the display is smaller than `min`).
pub fn assert_within_bounds(rect: &CropRect, bounds: &DisplayGeometry, min: f64) {
    assert!(rect.x >= -EPS, "x below zero: {rect:?}");
    assert!(rect.y >= -EPS, "y below zero: {rect:?}");
    assert!(
        rect.right() <= bounds.width + EPS,
        "right edge {} past {}: {rect:?}",
        rect.right(),
        bounds.width
    );
    assert!(
        rect.bottom() <= bounds.height + EPS,
        "bottom edge {} past {}: {rect:?}",
        rect.bottom(),
        bounds.height
    );
    assert!(
        rect.width >= min.min(bounds.width) - EPS,
        "width under minimum: {rect:?}"
    );
    assert!(
        rect.height >= min.min(bounds.height) - EPS,
        "height under minimum: {rect:?}"
    );
}
