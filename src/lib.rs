//! # Simple Crop
//!
//! An interactive, constraint-respecting crop engine. A rectangle is edited
//! over a *displayed* (scaled) image with pointer and wheel input, and the
//! finished rectangle is mapped back onto the image's native pixel grid for
//! export.
//!
//! # Architecture: Two Spaces, One Projection
//!
//! Everything interactive happens in **display space**, the box the image
//! is rendered into. Only the final commit touches **source space**:
//!
//! ```text
//! pointer/wheel ─► crop::state ─► CropRect (display px)
//!                       │
//!                 crop::constraint   (ratio / pixel target, initial rect)
//!                       │
//!          commit ─► crop::geometry::to_source ─► imaging::render ─► PixelBuffer
//! ```
//!
//! This separation exists for two reasons:
//!
//! - **Testability**: the state machine is a pure `transition(state, event)`
//!   function; every invariant can be checked without decoding an image.
//! - **Precision**: rounding happens exactly once, at projection time, so
//!   repeated drags never accumulate pixel drift.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`crop`] | Coordinate mapping, constraint policy, and the rectangle state machine |
//! | [`imaging`] | Raster backend trait, `image`-crate backend, render/resize/export |
//! | [`session`] | Commit and preview lifecycle; discards results after close |
//! | [`config`] | `simple-crop.toml` loading, validation, and merging |
//! | [`error`] | [`CropError`](error::CropError): not-ready and encode failures |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Clamp, Never Reject
//!
//! A drag that would push the rectangle out of the display box, or shrink it
//! below the minimum size, is corrected in place. The editor always holds a
//! valid rectangle; the only failures are "not ready yet" and "the raster
//! surface could not produce pixels".
//!
//! ## Pixel Targets Stretch
//!
//! A custom pixel target (e.g. 1920 × 1080) only fixes the *ratio* of the
//! live rectangle. At commit the sampled region is resampled to exactly the
//! target size, even if the user has since scaled the rectangle, so the
//! output can be an up- or down-sample of the region.
//!
//! ## Pure-Rust Imaging
//!
//! The [`imaging`] module uses the `image` crate for decode, resampling and
//! PNG/JPEG/WebP encoding. No system libraries are needed.

pub mod config;
pub mod crop;
pub mod error;
pub mod imaging;
pub mod output;
pub mod session;

#[cfg(test)]
pub(crate) mod test_helpers;
