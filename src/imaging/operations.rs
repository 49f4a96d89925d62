//! High-level raster operations.
//!
//! These functions combine calculations with backend execution: they project
//! the crop rectangle into source space, decide the output size, and call the
//! backend once. Neither the rectangle nor the constraint is mutated.

use super::backend::{Dimensions, PixelBuffer, RasterBackend};
use super::calculations::{clamp_region, region_output_dimensions};
use super::params::{ResampleFilter, SampleParams};
use crate::crop::{CropRect, ScaleFactors, SourceRect, to_source};
use crate::error::{CropError, Result};
use tracing::debug;

/// Plan a crop render without executing it.
///
/// With a pixel `target` the output is exactly `target` and the projected
/// region is stretched into it. Without one the output is the rounded region
/// size and the copy is direct.
pub fn plan_render(
    rect: &CropRect,
    scale: ScaleFactors,
    source: Dimensions,
    target: Option<Dimensions>,
    filter: ResampleFilter,
) -> SampleParams {
    let projected = to_source(rect, scale);
    let output = target.unwrap_or_else(|| region_output_dimensions(projected));
    SampleParams {
        region: clamp_region(projected, source),
        output,
        filter,
    }
}

/// Plan a whole-image resize without executing it.
pub fn plan_resize(source: Dimensions, output: Dimensions, filter: ResampleFilter) -> SampleParams {
    SampleParams {
        region: SourceRect::full(source),
        output,
        filter,
    }
}

/// Rasterize the crop rectangle from the source image.
pub fn render(
    backend: &impl RasterBackend,
    rect: &CropRect,
    scale: ScaleFactors,
    target: Option<Dimensions>,
    filter: ResampleFilter,
) -> Result<PixelBuffer> {
    let source = ready_source(backend)?;
    if !(scale.x.is_finite() && scale.y.is_finite() && scale.x > 0.0 && scale.y > 0.0) {
        return Err(CropError::NotReady);
    }
    let params = plan_render(rect, scale, source, target, filter);
    execute(backend, &params)
}

/// Stretch the full source image to `width × height`.
pub fn resize_image(
    backend: &impl RasterBackend,
    width: u32,
    height: u32,
    filter: ResampleFilter,
) -> Result<PixelBuffer> {
    let source = ready_source(backend)?;
    let output = Dimensions {
        width: width.max(1),
        height: height.max(1),
    };
    execute(backend, &plan_resize(source, output, filter))
}

fn ready_source(backend: &impl RasterBackend) -> Result<Dimensions> {
    let source = backend.dimensions();
    if source.width == 0 || source.height == 0 {
        return Err(CropError::NotReady);
    }
    Ok(source)
}

fn execute(backend: &impl RasterBackend, params: &SampleParams) -> Result<PixelBuffer> {
    debug!(
        region = ?params.region,
        output = ?params.output,
        direct = params.is_direct_copy(),
        "sampling source"
    );
    let buffer = backend
        .sample(params)
        .map_err(|e| CropError::EncodeFailure(e.to_string()))?;
    if buffer.dimensions() != params.output {
        return Err(CropError::EncodeFailure(format!(
            "backend produced {}x{}, expected {}x{}",
            buffer.width, buffer.height, params.output.width, params.output.height
        )));
    }
    Ok(buffer)
}
