//! Crop rectangle state machine.
//!
//! The editor is an owned [`EditorState`] value driven by
//! [`transition`]`(state, event) -> state'`. Nothing here knows how events
//! are delivered, so tests drive it with synthetic events.
//!
//! ```text
//!            pointer-down (body)            pointer-up / leave
//!   Idle ───────────────────────▶ Translating ─────────────────▶ Idle
//!    │
//!    │       pointer-down (handle)          pointer-up / leave
//!    └──────────────────────────▶ Resizing(h) ─────────────────▶ Idle
//! ```
//!
//! Every mutation ends in [`normalize`], so the rectangle always satisfies
//! the bounds and minimum-size invariants regardless of the event sequence.
//! Violations are corrected in place, never rejected.

use super::constraint::{
    CUSTOM_INDEX, ConstraintMode, CustomDimensions, CycleDirection, EffectiveConstraint, NamedRatio,
    initialize_crop_rect, resolve_constraint,
};
use super::geometry::{CropRect, DisplayGeometry, ScaleFactors, compute_scale, to_source};
use crate::config::CropConfig;
use crate::imaging::Dimensions;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, trace};

/// Resize handles around the crop rectangle, named by compass direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Handle {
    N,
    S,
    E,
    W,
    Ne,
    Nw,
    Se,
    Sw,
}

impl Handle {
    pub const ALL: [Handle; 8] = [
        Handle::N,
        Handle::S,
        Handle::E,
        Handle::W,
        Handle::Ne,
        Handle::Nw,
        Handle::Se,
        Handle::Sw,
    ];

    pub fn id(self) -> &'static str {
        match self {
            Handle::N => "n",
            Handle::S => "s",
            Handle::E => "e",
            Handle::W => "w",
            Handle::Ne => "ne",
            Handle::Nw => "nw",
            Handle::Se => "se",
            Handle::Sw => "sw",
        }
    }

    fn moves_north(self) -> bool {
        matches!(self, Handle::N | Handle::Ne | Handle::Nw)
    }

    fn moves_south(self) -> bool {
        matches!(self, Handle::S | Handle::Se | Handle::Sw)
    }

    fn moves_east(self) -> bool {
        matches!(self, Handle::E | Handle::Ne | Handle::Se)
    }

    fn moves_west(self) -> bool {
        matches!(self, Handle::W | Handle::Nw | Handle::Sw)
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// What a pointer-down landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointerTarget {
    Body,
    Handle(Handle),
}

/// Transient pointer interaction.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum InteractionState {
    #[default]
    Idle,
    /// Grab offset is the pointer position minus the rectangle origin.
    Translating { grab_x: f64, grab_y: f64 },
    Resizing(Handle),
}

/// Decode status of the image behind the editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImageStatus {
    #[default]
    Loading,
    Ready(Dimensions),
}

/// Input delivered to the state machine.
///
/// Pointer coordinates are client coordinates; the machine converts them
/// against the current display geometry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InputEvent {
    PointerDown {
        client_x: f64,
        client_y: f64,
        /// Explicit target id from the overlay; hit-tested when absent.
        #[serde(default)]
        target: Option<PointerTarget>,
    },
    PointerMove {
        client_x: f64,
        client_y: f64,
    },
    PointerUp,
    PointerLeave,
    Wheel {
        delta_y: f64,
        #[serde(default)]
        modifier: bool,
    },
    SetMode {
        mode: ConstraintMode,
    },
    SetLock {
        enabled: bool,
    },
    SetCustom {
        custom: CustomDimensions,
    },
    Layout {
        geometry: DisplayGeometry,
    },
    ImageReady {
        width: u32,
        height: u32,
    },
}

/// Complete editor state. Cheap to clone; transitions return a new value.
#[derive(Debug, Clone, PartialEq)]
pub struct EditorState {
    pub image: ImageStatus,
    pub geometry: Option<DisplayGeometry>,
    pub mode: ConstraintMode,
    pub lock_enabled: bool,
    pub custom: CustomDimensions,
    /// `None` until the first initialization and after the session ends.
    pub rect: Option<CropRect>,
    pub interaction: InteractionState,
    pub settings: CropConfig,
}

impl EditorState {
    pub fn new(settings: CropConfig) -> Self {
        Self {
            image: ImageStatus::Loading,
            geometry: None,
            mode: ConstraintMode::NamedRatio(NamedRatio::Widescreen),
            lock_enabled: false,
            custom: CustomDimensions::default(),
            rect: None,
            interaction: InteractionState::Idle,
            settings,
        }
    }

    pub fn effective_constraint(&self) -> EffectiveConstraint {
        resolve_constraint(&self.mode, self.lock_enabled)
    }

    /// Display geometry and scale, once the image is decoded and measured.
    pub fn ready(&self) -> Option<(DisplayGeometry, ScaleFactors)> {
        let ImageStatus::Ready(dims) = self.image else {
            return None;
        };
        let geometry = self.geometry?;
        compute_scale(&geometry, dims).map(|scale| (geometry, scale))
    }

    pub fn scale(&self) -> Option<ScaleFactors> {
        self.ready().map(|(_, scale)| scale)
    }

    /// Status line for the overlay, e.g. `"1280 × 720 px · 16:9"`.
    pub fn caption(&self) -> Option<String> {
        let rect = self.rect?;
        let scale = self.scale()?;
        let src = to_source(&rect, scale);
        let size = format!("{} × {} px", src.width, src.height);
        Some(if self.lock_enabled {
            format!("{size} · {}", self.mode.label())
        } else {
            size
        })
    }

    /// Recompute the rectangle from the current constraint, if ready.
    fn reinitialize(&mut self) {
        self.interaction = InteractionState::Idle;
        let Some((geometry, scale)) = self.ready() else {
            return;
        };
        let constraint = self.effective_constraint();
        let initial =
            initialize_crop_rect(&geometry, scale, &constraint, self.settings.initial_fill);
        // The fresh rectangle already has the ratio; it is only re-derived
        // when the minimum size forces it to grow.
        let min_size = self.settings.min_size;
        let ratio = constraint
            .ratio()
            .filter(|_| initial.width.min(initial.height) < min_size);
        let rect = normalize(&initial, &geometry, ratio, min_size);
        debug!(?constraint, ?rect, "crop rectangle initialized");
        self.rect = Some(rect);
    }

    /// Carry the rectangle proportionally into a new display box.
    fn relayout(&mut self, geometry: DisplayGeometry) {
        let previous = self.geometry.replace(geometry);
        match (previous, self.rect) {
            (Some(old), Some(rect)) if old.is_measured() && geometry.is_measured() => {
                let sx = geometry.width / old.width;
                let sy = geometry.height / old.height;
                let scaled = CropRect::new(rect.x * sx, rect.y * sy, rect.width * sx, rect.height * sy);
                let ratio = self.effective_constraint().ratio();
                self.rect = Some(normalize(&scaled, &geometry, ratio, self.settings.min_size));
                self.interaction = InteractionState::Idle;
            }
            _ => self.reinitialize(),
        }
    }

    fn pointer_down(&mut self, client_x: f64, client_y: f64, target: Option<PointerTarget>) {
        let (Some((geometry, _)), Some(rect)) = (self.ready(), self.rect) else {
            return;
        };
        let (px, py) = geometry.local(client_x, client_y);
        let target = target.or_else(|| hit_test(&rect, px, py, self.settings.handle_tolerance));
        self.interaction = match target {
            Some(PointerTarget::Body) => InteractionState::Translating {
                grab_x: px - rect.x,
                grab_y: py - rect.y,
            },
            Some(PointerTarget::Handle(handle)) => InteractionState::Resizing(handle),
            None => InteractionState::Idle,
        };
    }

    fn pointer_move(&mut self, client_x: f64, client_y: f64) {
        let (Some((geometry, _)), Some(rect)) = (self.ready(), self.rect) else {
            return;
        };
        let pointer = geometry.local(client_x, client_y);
        let next = match self.interaction {
            InteractionState::Idle => return,
            InteractionState::Translating { grab_x, grab_y } => {
                translate(&rect, pointer, (grab_x, grab_y), &geometry)
            }
            InteractionState::Resizing(handle) => resize(
                &rect,
                handle,
                pointer,
                self.effective_constraint().ratio(),
                &geometry,
                self.settings.min_size,
            ),
        };
        self.rect = Some(next);
    }

    fn wheel(&mut self, delta_y: f64, modifier: bool) {
        if delta_y == 0.0 || self.interaction != InteractionState::Idle {
            return;
        }
        let (Some((geometry, _)), Some(rect)) = (self.ready(), self.rect) else {
            return;
        };
        if modifier {
            let step = self.settings.wheel_step;
            let factor = if delta_y < 0.0 { 1.0 + step } else { 1.0 - step };
            self.rect = Some(scale_about_center(
                &rect,
                factor,
                self.effective_constraint().ratio(),
                &geometry,
                self.settings.min_size,
            ));
        } else if self.lock_enabled {
            let direction = if delta_y > 0.0 {
                CycleDirection::Next
            } else {
                CycleDirection::Previous
            };
            self.mode = self.mode.cycle(direction, &self.custom);
            debug!(mode = %self.mode.label(), "ratio cycled");
            self.reinitialize();
        }
    }
}

/// Apply one event, returning the next state.
pub fn transition(state: &EditorState, event: &InputEvent) -> EditorState {
    let mut next = state.clone();
    match *event {
        InputEvent::ImageReady { width, height } => {
            next.image = ImageStatus::Ready(Dimensions { width, height });
            next.reinitialize();
        }
        InputEvent::Layout { geometry } => next.relayout(geometry),
        InputEvent::SetMode { mode } => {
            if mode != next.mode {
                next.mode = mode;
                next.reinitialize();
            }
        }
        InputEvent::SetLock { enabled } => {
            if enabled != next.lock_enabled {
                next.lock_enabled = enabled;
                next.reinitialize();
            }
        }
        InputEvent::SetCustom { custom } => {
            next.custom = custom;
            if next.mode.catalog_index() == Some(CUSTOM_INDEX) {
                next.mode = custom.to_mode();
                next.reinitialize();
            }
        }
        InputEvent::PointerDown {
            client_x,
            client_y,
            target,
        } => next.pointer_down(client_x, client_y, target),
        InputEvent::PointerMove { client_x, client_y } => next.pointer_move(client_x, client_y),
        InputEvent::PointerUp | InputEvent::PointerLeave => {
            next.interaction = InteractionState::Idle;
        }
        InputEvent::Wheel { delta_y, modifier } => next.wheel(delta_y, modifier),
    }
    next
}

/// Fold a sequence of events over a starting state.
pub fn replay<'a>(
    state: &EditorState,
    events: impl IntoIterator<Item = &'a InputEvent>,
) -> EditorState {
    events
        .into_iter()
        .fold(state.clone(), |acc, event| transition(&acc, event))
}

// =============================================================================
// Pure rectangle operations
// =============================================================================

/// `value` limited to `[lo, hi]`; yields `hi` when the range is empty.
fn clamp(value: f64, lo: f64, hi: f64) -> f64 {
    value.max(lo).min(hi)
}

/// Size limits `(min_w, min_h, max_w, max_h)` inside the display box.
///
/// With a ratio the binding minimum is whichever axis would otherwise drop
/// below `min`, and the maximum is the largest box of that ratio that fits.
fn extent_limits(bounds: &DisplayGeometry, ratio: Option<f64>, min: f64) -> (f64, f64, f64, f64) {
    let (bw, bh) = (bounds.width, bounds.height);
    match ratio {
        Some(r) => {
            let max_w = bw.min(bh * r);
            let min_w = min.max(min * r).min(max_w);
            (min_w, min_w / r, max_w, max_w / r)
        }
        None => (min.min(bw), min.min(bh), bw, bh),
    }
}

/// Force a rectangle inside the display box with at least the minimum size.
///
/// Sizes are clamped first (height follows width when a ratio is given),
/// then the origin is shifted so the rectangle lies inside the box.
pub fn normalize(
    rect: &CropRect,
    bounds: &DisplayGeometry,
    ratio: Option<f64>,
    min: f64,
) -> CropRect {
    let (min_w, min_h, max_w, max_h) = extent_limits(bounds, ratio, min);
    let width = clamp(rect.width, min_w, max_w);
    let height = match ratio {
        Some(r) => width / r,
        None => clamp(rect.height, min_h, max_h),
    };
    let next = CropRect::new(
        clamp(rect.x, 0.0, (bounds.width - width).max(0.0)),
        clamp(rect.y, 0.0, (bounds.height - height).max(0.0)),
        width,
        height,
    );
    if next != *rect {
        trace!(?rect, ?next, "crop rectangle corrected");
    }
    next
}

/// Move the rectangle so its origin follows `pointer - grab`, clamped to the box.
pub fn translate(
    rect: &CropRect,
    pointer: (f64, f64),
    grab: (f64, f64),
    bounds: &DisplayGeometry,
) -> CropRect {
    CropRect::new(
        clamp(pointer.0 - grab.0, 0.0, (bounds.width - rect.width).max(0.0)),
        clamp(pointer.1 - grab.1, 0.0, (bounds.height - rect.height).max(0.0)),
        rect.width,
        rect.height,
    )
}

/// Drag `handle` to `pointer` (display space, box-relative).
///
/// The edge opposite each moved edge stays fixed. Under a ratio, edge
/// handles derive the orthogonal dimension from the dragged one; `w` and `n`
/// re-centre the orthogonal axis on the old centre. Corner handles derive
/// the height from the width, anchored on the fixed corner's row.
pub fn resize(
    rect: &CropRect,
    handle: Handle,
    pointer: (f64, f64),
    ratio: Option<f64>,
    bounds: &DisplayGeometry,
    min: f64,
) -> CropRect {
    let (px, py) = pointer;
    let (bw, bh) = (bounds.width, bounds.height);
    let (min_w, min_h) = (min.min(bw), min.min(bh));
    let (right, bottom) = (rect.right(), rect.bottom());
    let (cx, cy) = rect.center();
    let mut next = *rect;

    if handle.moves_east() {
        next.width = clamp(px - rect.x, min_w, bw - rect.x);
    } else if handle.moves_west() {
        next.x = clamp(px, 0.0, right - min_w);
        next.width = right - next.x;
    }
    if handle.moves_south() {
        next.height = clamp(py - rect.y, min_h, bh - rect.y);
    } else if handle.moves_north() {
        next.y = clamp(py, 0.0, bottom - min_h);
        next.height = bottom - next.y;
    }

    if let Some(r) = ratio {
        match handle {
            Handle::E => next.height = next.width / r,
            Handle::W => {
                next.height = next.width / r;
                next.y = cy - next.height / 2.0;
            }
            Handle::S => next.width = next.height * r,
            Handle::N => {
                next.width = next.height * r;
                next.x = cx - next.width / 2.0;
            }
            Handle::Se | Handle::Sw => {
                next.y = rect.y;
                next.height = next.width / r;
            }
            Handle::Ne | Handle::Nw => {
                next.height = next.width / r;
                next.y = bottom - next.height;
            }
        }
    }

    // Far-edge overflow shrinks the rectangle instead of moving it.
    if next.right() > bw {
        next.width = bw - next.x;
        if let Some(r) = ratio {
            next.height = next.width / r;
        }
    }
    if next.bottom() > bh {
        next.height = bh - next.y;
        if let Some(r) = ratio {
            let width = next.height * r;
            if handle.moves_west() {
                next.x = right - width;
            }
            next.width = width;
        }
    }
    // A north corner pushed past the top under a ratio keeps its bottom edge.
    if next.y < 0.0 && handle.moves_north() {
        if let Some(r) = ratio {
            next.height = bottom;
            next.y = 0.0;
            let width = next.height * r;
            if handle.moves_west() {
                next.x = right - width;
            }
            next.width = width;
        }
    }

    normalize(&next, bounds, ratio, min)
}

/// Scale about the rectangle centre by `factor`, fitted into the box.
pub fn scale_about_center(
    rect: &CropRect,
    factor: f64,
    ratio: Option<f64>,
    bounds: &DisplayGeometry,
    min: f64,
) -> CropRect {
    let (cx, cy) = rect.center();
    let width = rect.width * factor;
    let height = ratio.map_or(rect.height * factor, |r| width / r);
    normalize(
        &CropRect::from_center(cx, cy, width, height),
        bounds,
        ratio,
        min,
    )
}

/// Resolve which part of the rectangle a box-relative point targets.
///
/// Corners win over edges; edges win over the body.
pub fn hit_test(rect: &CropRect, px: f64, py: f64, tolerance: f64) -> Option<PointerTarget> {
    let near = |a: f64, b: f64| (a - b).abs() <= tolerance;
    let within_x = px >= rect.x - tolerance && px <= rect.right() + tolerance;
    let within_y = py >= rect.y - tolerance && py <= rect.bottom() + tolerance;
    if !within_x || !within_y {
        return None;
    }

    let (west, east) = (near(px, rect.x), near(px, rect.right()));
    let (north, south) = (near(py, rect.y), near(py, rect.bottom()));
    let handle = match (north, south, west, east) {
        (true, _, true, _) => Some(Handle::Nw),
        (true, _, _, true) => Some(Handle::Ne),
        (_, true, true, _) => Some(Handle::Sw),
        (_, true, _, true) => Some(Handle::Se),
        (true, _, _, _) => Some(Handle::N),
        (_, true, _, _) => Some(Handle::S),
        (_, _, true, _) => Some(Handle::W),
        (_, _, _, true) => Some(Handle::E),
        _ => None,
    };
    match handle {
        Some(h) => Some(PointerTarget::Handle(h)),
        None if rect.contains(px, py) => Some(PointerTarget::Body),
        None => None,
    }
}
