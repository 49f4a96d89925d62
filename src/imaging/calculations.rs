//! Pure calculation functions for output sizes and source regions.
//!
//! All functions here are pure and testable without any I/O or images.

use super::backend::Dimensions;
use crate::crop::SourceRect;

/// Clamp a rounded source region to the image.
///
/// Rounding in [`to_source`](crate::crop::to_source) can push the far edge
/// one pixel past the image; the region is intersected with the image bounds
/// and kept at least 1×1.
///
/// # Examples
/// ```
/// # use simple_crop::crop::SourceRect;
/// # use simple_crop::imaging::{Dimensions, clamp_region};
/// let image = Dimensions { width: 100, height: 100 };
/// let drifted = SourceRect { x: 40, y: 0, width: 61, height: 100 };
/// assert_eq!(clamp_region(drifted, image).width, 60);
/// ```
pub fn clamp_region(region: SourceRect, image: Dimensions) -> SourceRect {
    let max_x = image.width.saturating_sub(1);
    let max_y = image.height.saturating_sub(1);
    let x = region.x.min(max_x);
    let y = region.y.min(max_y);
    let width = region.width.min(image.width - x).max(1);
    let height = region.height.min(image.height - y).max(1);
    SourceRect {
        x,
        y,
        width,
        height,
    }
}

/// Output size of an unconstrained crop: the rounded source region size,
/// never smaller than 1×1.
pub fn region_output_dimensions(region: SourceRect) -> Dimensions {
    Dimensions {
        width: region.width.max(1),
        height: region.height.max(1),
    }
}

/// Resolve a "keep aspect" resize request.
///
/// - Both sides given: used as-is.
/// - One side given: the other is derived from the source aspect ratio and rounded.
/// - Neither given: the source size.
///
/// Results are clamped to at least 1px per side.
///
/// # Examples
/// ```
/// # use simple_crop::imaging::{Dimensions, fit_dimensions};
/// let source = Dimensions { width: 1600, height: 900 };
/// assert_eq!(fit_dimensions(source, Some(800), None), Dimensions { width: 800, height: 450 });
/// assert_eq!(fit_dimensions(source, None, Some(90)), Dimensions { width: 160, height: 90 });
/// ```
pub fn fit_dimensions(source: Dimensions, width: Option<u32>, height: Option<u32>) -> Dimensions {
    let aspect = if source.height == 0 {
        1.0
    } else {
        source.width as f64 / source.height as f64
    };
    let (w, h) = match (width, height) {
        (Some(w), Some(h)) => (w, h),
        (Some(w), None) => (w, (w as f64 / aspect).round() as u32),
        (None, Some(h)) => ((h as f64 * aspect).round() as u32, h),
        (None, None) => (source.width, source.height),
    };
    Dimensions {
        width: w.max(1),
        height: h.max(1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dims(width: u32, height: u32) -> Dimensions {
        Dimensions { width, height }
    }

    fn region(x: u32, y: u32, width: u32, height: u32) -> SourceRect {
        SourceRect {
            x,
            y,
            width,
            height,
        }
    }

    // =========================================================================
    // clamp_region tests
    // =========================================================================

    #[test]
    fn clamp_region_inside_is_unchanged() {
        let r = region(10, 10, 50, 50);
        assert_eq!(clamp_region(r, dims(100, 100)), r);
    }

    #[test]
    fn clamp_region_trims_one_pixel_drift() {
        let r = region(0, 40, 100, 61);
        assert_eq!(clamp_region(r, dims(100, 100)), region(0, 40, 100, 60));
    }

    #[test]
    fn clamp_region_origin_past_edge() {
        let r = region(120, 5, 10, 10);
        let clamped = clamp_region(r, dims(100, 100));
        assert_eq!(clamped.x, 99);
        assert_eq!(clamped.width, 1);
    }

    #[test]
    fn clamp_region_keeps_at_least_one_pixel() {
        let r = region(0, 0, 0, 0);
        assert_eq!(clamp_region(r, dims(10, 10)), region(0, 0, 1, 1));
    }

    #[test]
    fn region_output_never_zero() {
        assert_eq!(region_output_dimensions(region(3, 3, 0, 7)), dims(1, 7));
        assert_eq!(region_output_dimensions(region(0, 0, 640, 360)), dims(640, 360));
    }

    // =========================================================================
    // fit_dimensions tests
    // =========================================================================

    #[test]
    fn fit_width_only_derives_height() {
        assert_eq!(fit_dimensions(dims(4000, 3000), Some(1000), None), dims(1000, 750));
    }

    #[test]
    fn fit_height_only_derives_width() {
        assert_eq!(fit_dimensions(dims(4000, 3000), None, Some(300)), dims(400, 300));
    }

    #[test]
    fn fit_both_sides_stretches() {
        assert_eq!(fit_dimensions(dims(4000, 3000), Some(100), Some(100)), dims(100, 100));
    }

    #[test]
    fn fit_neither_side_is_source() {
        assert_eq!(fit_dimensions(dims(640, 480), None, None), dims(640, 480));
    }

    #[test]
    fn fit_rounds_and_clamps_to_one() {
        // 1000x3 at width 10 → height 0.03 → clamped to 1
        assert_eq!(fit_dimensions(dims(1000, 3), Some(10), None), dims(10, 1));
        // 3x2 at width 5 → height 3.33 → 3
        assert_eq!(fit_dimensions(dims(3, 2), Some(5), None), dims(5, 3));
    }
}
