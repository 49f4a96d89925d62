//! Display space ↔ source space mapping.
//!
//! *Display space* is the coordinate system of the rendered, possibly scaled
//! image element. *Source space* is the image's native pixel grid. The crop
//! rectangle lives in display space (relative to the display box origin) and
//! is projected into source space only when pixels are produced.
//!
//! ```text
//!  display box (1000 × 750)          source image (4000 × 3000)
//!  ┌──────────────────────┐          ┌──────────────────────┐
//!  │   ┌──────┐           │  × 4.0   │                      │
//!  │   │ crop │           │  ──────▶ │   crop region        │
//!  │   └──────┘           │          │                      │
//!  └──────────────────────┘          └──────────────────────┘
//! ```

use crate::imaging::Dimensions;
use serde::{Deserialize, Serialize};

/// Smallest allowed crop extent on either axis, in display pixels.
pub const MIN_SIZE: f64 = 50.0;

/// On-screen bounding box of the rendered image at the moment of measurement.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DisplayGeometry {
    #[serde(default)]
    pub origin_x: f64,
    #[serde(default)]
    pub origin_y: f64,
    pub width: f64,
    pub height: f64,
}

impl DisplayGeometry {
    pub fn new(origin_x: f64, origin_y: f64, width: f64, height: f64) -> Self {
        Self {
            origin_x,
            origin_y,
            width,
            height,
        }
    }

    /// A display box anchored at the client origin.
    pub fn sized(width: f64, height: f64) -> Self {
        Self::new(0.0, 0.0, width, height)
    }

    /// Whether the box has a usable, non-zero extent.
    ///
    /// Layout engines report a zero-sized box before the element is rendered;
    /// every crop operation is deferred until this returns `true`.
    pub fn is_measured(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }

    /// Convert client coordinates into coordinates relative to the box origin.
    pub fn local(&self, client_x: f64, client_y: f64) -> (f64, f64) {
        (client_x - self.origin_x, client_y - self.origin_y)
    }
}

/// Display → source multipliers. Both are strictly positive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleFactors {
    pub x: f64,
    pub y: f64,
}

/// Derive the display → source scale for a measured display box.
///
/// Returns `None` ("not ready") when the box has no extent yet or the source
/// has a zero dimension; callers defer the operation instead of dividing by
/// zero.
pub fn compute_scale(geometry: &DisplayGeometry, source: Dimensions) -> Option<ScaleFactors> {
    if !geometry.is_measured() || source.width == 0 || source.height == 0 {
        return None;
    }
    Some(ScaleFactors {
        x: source.width as f64 / geometry.width,
        y: source.height as f64 / geometry.height,
    })
}

/// Crop rectangle in display space, relative to the display box origin.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CropRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl CropRect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Build a rectangle of the given size centred on `(cx, cy)`.
    pub fn from_center(cx: f64, cy: f64, width: f64, height: f64) -> Self {
        Self::new(cx - width / 2.0, cy - height / 2.0, width, height)
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn center(&self) -> (f64, f64) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn contains(&self, px: f64, py: f64) -> bool {
        px >= self.x && px <= self.right() && py >= self.y && py <= self.bottom()
    }

    /// Width over height.
    pub fn aspect(&self) -> f64 {
        self.width / self.height
    }
}

/// Crop region in source pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl SourceRect {
    /// The whole image.
    pub fn full(dims: Dimensions) -> Self {
        Self {
            x: 0,
            y: 0,
            width: dims.width,
            height: dims.height,
        }
    }

    pub fn size(&self) -> Dimensions {
        Dimensions {
            width: self.width,
            height: self.height,
        }
    }
}

/// Round half away from zero, saturating at the `u32` range.
fn round_px(value: f64) -> u32 {
    value.round().clamp(0.0, u32::MAX as f64) as u32
}

/// Project a display-space rectangle into source space.
///
/// Each field is rounded independently, so the projected width/height can
/// drift by ±1px from the ratio implied by the display rectangle.
pub fn to_source(rect: &CropRect, scale: ScaleFactors) -> SourceRect {
    SourceRect {
        x: round_px(rect.x * scale.x),
        y: round_px(rect.y * scale.y),
        width: round_px(rect.width * scale.x),
        height: round_px(rect.height * scale.y),
    }
}

/// Inverse of [`to_source`], without rounding.
pub fn to_display(rect: &SourceRect, scale: ScaleFactors) -> CropRect {
    CropRect {
        x: rect.x as f64 / scale.x,
        y: rect.y as f64 / scale.y,
        width: rect.width as f64 / scale.x,
        height: rect.height as f64 / scale.y,
    }
}
