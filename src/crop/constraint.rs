//! Ratio/dimension policy.
//!
//! Resolves the user's current constraint selection into a single
//! [`EffectiveConstraint`] and decides where a fresh crop rectangle starts.
//!
//! ## Named-ratio catalog
//!
//! The catalog is fixed and cycle-wraps in both directions:
//!
//! | Index | Entry |
//! |---|---|
//! | 0 | 16:9 |
//! | 1 | 4:3 |
//! | 2 | 3:2 |
//! | 3 | 1:1 |
//! | 4 | 2:3 |
//! | 5 | 3:4 |
//! | 6 | 9:16 |
//! | 7 | Custom |
//!
//! The selected index is carried by the [`ConstraintMode`] value itself, so
//! cycling is a pure function of the current mode.

use super::geometry::{CropRect, DisplayGeometry, ScaleFactors};
use crate::imaging::Dimensions;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Number of catalog entries, `Custom` included.
pub const CATALOG_LEN: usize = 8;

/// Catalog index of the `Custom` entry.
pub const CUSTOM_INDEX: usize = CATALOG_LEN - 1;

/// Preset aspect ratios, in catalog order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NamedRatio {
    #[serde(rename = "16:9")]
    Widescreen,
    #[serde(rename = "4:3")]
    Standard,
    #[serde(rename = "3:2")]
    Classic,
    #[serde(rename = "1:1")]
    Square,
    #[serde(rename = "2:3")]
    ClassicPortrait,
    #[serde(rename = "3:4")]
    StandardPortrait,
    #[serde(rename = "9:16")]
    WidescreenPortrait,
}

impl NamedRatio {
    pub const ALL: [NamedRatio; CUSTOM_INDEX] = [
        NamedRatio::Widescreen,
        NamedRatio::Standard,
        NamedRatio::Classic,
        NamedRatio::Square,
        NamedRatio::ClassicPortrait,
        NamedRatio::StandardPortrait,
        NamedRatio::WidescreenPortrait,
    ];

    /// Ratio as `(width, height)` terms.
    pub fn terms(self) -> (u32, u32) {
        match self {
            NamedRatio::Widescreen => (16, 9),
            NamedRatio::Standard => (4, 3),
            NamedRatio::Classic => (3, 2),
            NamedRatio::Square => (1, 1),
            NamedRatio::ClassicPortrait => (2, 3),
            NamedRatio::StandardPortrait => (3, 4),
            NamedRatio::WidescreenPortrait => (9, 16),
        }
    }

    pub fn value(self) -> f64 {
        let (w, h) = self.terms();
        w as f64 / h as f64
    }

    pub fn index(self) -> usize {
        Self::ALL
            .iter()
            .position(|&r| r == self)
            .unwrap_or_default()
    }
}

impl fmt::Display for NamedRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (w, h) = self.terms();
        write!(f, "{w}:{h}")
    }
}

impl FromStr for NamedRatio {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let terms = parse_pair(s).ok_or_else(|| format!("not a ratio: {s:?}"))?;
        Self::ALL
            .into_iter()
            .find(|r| r.terms() == terms)
            .ok_or_else(|| format!("{s:?} is not a preset ratio"))
    }
}

/// Parse `W:H`, `WxH` or `W/H` into two positive integers.
pub fn parse_pair(s: &str) -> Option<(u32, u32)> {
    let (w, h) = s.trim().split_once([':', 'x', 'X', '/', '×'])?;
    let w: u32 = w.trim().parse().ok()?;
    let h: u32 = h.trim().parse().ok()?;
    (w > 0 && h > 0).then_some((w, h))
}

/// How the `Custom` catalog entry interprets its two numbers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CustomUnit {
    #[default]
    Ratio,
    Pixels,
}

/// User-entered values behind the `Custom` catalog entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomDimensions {
    pub width: u32,
    pub height: u32,
    #[serde(default)]
    pub unit: CustomUnit,
}

impl CustomDimensions {
    /// Zero terms are clamped to 1.
    pub fn new(width: u32, height: u32, unit: CustomUnit) -> Self {
        Self {
            width: width.max(1),
            height: height.max(1),
            unit,
        }
    }

    pub fn to_mode(self) -> ConstraintMode {
        match self.unit {
            CustomUnit::Ratio => ConstraintMode::CustomRatio {
                width: self.width,
                height: self.height,
            },
            CustomUnit::Pixels => ConstraintMode::PixelTarget {
                width: self.width,
                height: self.height,
            },
        }
    }
}

impl Default for CustomDimensions {
    fn default() -> Self {
        Self::new(4, 3, CustomUnit::Ratio)
    }
}

/// The user's constraint selection. Exactly one is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConstraintMode {
    Free,
    NamedRatio(NamedRatio),
    CustomRatio { width: u32, height: u32 },
    PixelTarget { width: u32, height: u32 },
}

/// Direction for wheel-driven catalog cycling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleDirection {
    Next,
    Previous,
}

impl ConstraintMode {
    /// Catalog position of this mode. Both custom modes sit on `Custom`;
    /// `Free` is not in the catalog.
    pub fn catalog_index(&self) -> Option<usize> {
        match self {
            ConstraintMode::Free => None,
            ConstraintMode::NamedRatio(r) => Some(r.index()),
            ConstraintMode::CustomRatio { .. } | ConstraintMode::PixelTarget { .. } => {
                Some(CUSTOM_INDEX)
            }
        }
    }

    /// Mode for a catalog position; indices wrap modulo the catalog length.
    pub fn from_catalog_index(index: usize, custom: &CustomDimensions) -> Self {
        match NamedRatio::ALL.get(index % CATALOG_LEN) {
            Some(&r) => ConstraintMode::NamedRatio(r),
            None => custom.to_mode(),
        }
    }

    /// Step to the neighbouring catalog entry, wrapping at both ends.
    ///
    /// From `Free`, `Next` lands on the first entry and `Previous` on the last.
    pub fn cycle(&self, direction: CycleDirection, custom: &CustomDimensions) -> Self {
        let index = match (self.catalog_index(), direction) {
            (None, CycleDirection::Next) => 0,
            (None, CycleDirection::Previous) => CUSTOM_INDEX,
            (Some(i), CycleDirection::Next) => (i + 1) % CATALOG_LEN,
            (Some(i), CycleDirection::Previous) => (i + CATALOG_LEN - 1) % CATALOG_LEN,
        };
        Self::from_catalog_index(index, custom)
    }

    /// Short label for status captions.
    pub fn label(&self) -> String {
        match self {
            ConstraintMode::Free => "free".to_string(),
            ConstraintMode::NamedRatio(r) => r.to_string(),
            ConstraintMode::CustomRatio { width, height } => format!("{width}:{height}"),
            ConstraintMode::PixelTarget { width, height } => format!("{width} × {height} px"),
        }
    }
}

/// The single rule applied to the live rectangle at a given moment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EffectiveConstraint {
    None,
    Ratio(f64),
    PixelTarget { width: u32, height: u32 },
}

impl EffectiveConstraint {
    /// Width/height ratio the live rectangle must hold, if any.
    ///
    /// A pixel target is honoured during interaction only through its
    /// implied ratio; the exact size is applied at commit.
    pub fn ratio(&self) -> Option<f64> {
        match *self {
            EffectiveConstraint::None => None,
            EffectiveConstraint::Ratio(r) => Some(r),
            EffectiveConstraint::PixelTarget { width, height } => {
                Some(width as f64 / height as f64)
            }
        }
    }

    pub fn pixel_target(&self) -> Option<Dimensions> {
        match *self {
            EffectiveConstraint::PixelTarget { width, height } => {
                Some(Dimensions { width, height })
            }
            _ => None,
        }
    }
}

/// Resolve the selection into the constraint the editor enforces.
pub fn resolve_constraint(mode: &ConstraintMode, lock_enabled: bool) -> EffectiveConstraint {
    if !lock_enabled {
        return EffectiveConstraint::None;
    }
    match *mode {
        ConstraintMode::Free => EffectiveConstraint::None,
        ConstraintMode::NamedRatio(r) => EffectiveConstraint::Ratio(r.value()),
        ConstraintMode::CustomRatio { width, height } if width > 0 && height > 0 => {
            EffectiveConstraint::Ratio(width as f64 / height as f64)
        }
        ConstraintMode::PixelTarget { width, height } if width > 0 && height > 0 => {
            EffectiveConstraint::PixelTarget { width, height }
        }
        ConstraintMode::CustomRatio { .. } | ConstraintMode::PixelTarget { .. } => {
            EffectiveConstraint::None
        }
    }
}

/// Default share of the display box a fresh rectangle may cover.
pub const INITIAL_FILL: f64 = 0.8;

/// Size and centre a fresh crop rectangle inside the display box.
///
/// - Pixel target: the target projected into display space, uniformly
///   downscaled when it exceeds `fill` of the box on either axis.
/// - Otherwise width-first at `fill` of the box width; if the ratio makes the
///   height exceed `fill` of the box height, fall back to height-first.
///
/// The result never exceeds `fill` of either display dimension.
pub fn initialize_crop_rect(
    geometry: &DisplayGeometry,
    scale: ScaleFactors,
    constraint: &EffectiveConstraint,
    fill: f64,
) -> CropRect {
    let (display_w, display_h) = (geometry.width, geometry.height);

    let (width, height) = match *constraint {
        EffectiveConstraint::PixelTarget {
            width: tw,
            height: th,
        } => {
            let box_w = tw as f64 / scale.x;
            let box_h = th as f64 / scale.y;
            if box_w > display_w * fill || box_h > display_h * fill {
                let factor = (display_w / box_w).min(display_h / box_h) * fill;
                (box_w * factor, box_h * factor)
            } else {
                (box_w, box_h)
            }
        }
        _ => {
            let ratio = constraint.ratio();
            let width = display_w * fill;
            let height = ratio.map_or(display_h * fill, |r| width / r);
            if height > display_h * fill {
                let height = display_h * fill;
                (ratio.map_or(display_w * fill, |r| height * r), height)
            } else {
                (width, height)
            }
        }
    };

    CropRect::new(
        (display_w - width) / 2.0,
        (display_h - height) / 2.0,
        width,
        height,
    )
}
