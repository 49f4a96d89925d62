//! Interactive crop engine.
//!
//! | Piece | Role |
//! |---|---|
//! | [`geometry`] | Display space ↔ source space mapping |
//! | [`constraint`] | Constraint resolution and rectangle initialization |
//! | [`state`] | Pointer/wheel state machine over the crop rectangle |
//!
//! All three are pure: no rendering surface, no I/O. The [`imaging`](crate::imaging)
//! module turns a finished rectangle into pixels.

pub mod constraint;
pub mod geometry;
pub mod state;

pub use constraint::{
    ConstraintMode, CustomDimensions, CustomUnit, CycleDirection, EffectiveConstraint, NamedRatio,
    initialize_crop_rect, resolve_constraint,
};
pub use geometry::{
    CropRect, DisplayGeometry, MIN_SIZE, ScaleFactors, SourceRect, compute_scale, to_display,
    to_source,
};
pub use state::{
    EditorState, Handle, ImageStatus, InputEvent, InteractionState, PointerTarget, replay,
    transition,
};
