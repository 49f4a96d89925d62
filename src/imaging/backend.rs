//! Raster backend trait and shared types.
//!
//! The [`RasterBackend`] trait is the only raster capability the crop engine
//! needs: report the source size and sample a source region into an output
//! buffer of a given size. Everything above it (rectangle math, constraint
//! handling, commit lifecycle) is backend-agnostic.
//!
//! The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend), which wraps a decoded
//! `image::DynamicImage`.

use super::params::SampleParams;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Processing failed: {0}")]
    ProcessingFailed(String),
}

/// Width and height in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

/// Interleaved RGBA8 pixels, row-major, no padding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

impl PixelBuffer {
    /// Wrap raw RGBA bytes. Returns `None` if the length does not match.
    pub fn from_raw(width: u32, height: u32, data: Vec<u8>) -> Option<Self> {
        let expected = width as usize * height as usize * 4;
        (data.len() == expected).then_some(Self {
            width,
            height,
            data,
        })
    }

    pub fn dimensions(&self) -> Dimensions {
        Dimensions {
            width: self.width,
            height: self.height,
        }
    }

    /// RGBA value at `(x, y)`, or `None` outside the buffer.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        self.data
            .get(i..i + 4)
            .and_then(|px| <[u8; 4]>::try_from(px).ok())
    }
}

/// Facts about an image file, reported by the `info` command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageInfo {
    pub dimensions: Dimensions,
    /// Lowercase format name (`"png"`, `"jpeg"`, ...).
    pub format: String,
    pub byte_size: u64,
}

/// Trait for raster backends.
///
/// Implementations hold one decoded source image. `sample` must produce a
/// buffer of exactly `params.output` pixels: a plain copy when the region and
/// output sizes match, a resample with `params.filter` otherwise.
pub trait RasterBackend {
    /// Natural size of the source image.
    fn dimensions(&self) -> Dimensions;

    /// Sample `params.region` of the source into a new buffer.
    fn sample(&self, params: &SampleParams) -> Result<PixelBuffer, BackendError>;
}
