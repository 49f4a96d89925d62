use thiserror::Error;

/// Failures surfaced by the crop engine.
///
/// Geometric violations are not errors: the state machine clamps them in
/// place. What remains is "not yet" and "could not produce pixels".
#[derive(Error, Debug)]
pub enum CropError {
    /// Image not decoded or display box not measured. Callers defer silently.
    #[error("crop editor is not ready")]
    NotReady,
    /// The raster surface could not produce the output buffer.
    #[error("rasterization failed: {0}")]
    EncodeFailure(String),
}

pub type Result<T> = std::result::Result<T, CropError>;
