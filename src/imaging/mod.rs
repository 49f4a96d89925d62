//! Rasterization: pure Rust, `image` crate only.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Identify** | `ImageReader::into_dimensions` |
//! | **Crop** | `crop_imm` (direct copy) |
//! | **Pixel target / resize** | `imageops::resize` with the configured filter |
//! | **Export** | PNG, JPEG (quality), WebP (lossless) encoders |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for region and output-size math (unit testable)
//! - **Parameters**: Data structures describing raster operations
//! - **Backend**: [`RasterBackend`] trait + [`RustBackend`]
//! - **Operations**: High-level functions combining calculations + backend

pub mod backend;
mod calculations;
pub mod operations;
mod params;
pub mod rust_backend;

pub use backend::{BackendError, Dimensions, ImageInfo, PixelBuffer, RasterBackend};
pub use calculations::{clamp_region, fit_dimensions, region_output_dimensions};
pub use operations::{plan_render, plan_resize, render, resize_image};
pub use params::{EncodeParams, ExportFormat, Quality, ResampleFilter, SampleParams};
pub use rust_backend::{RustBackend, identify, save_buffer};
