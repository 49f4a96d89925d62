//! Pure Rust raster backend built on the `image` crate.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Decode (JPEG, PNG, WebP) | `image::ImageReader` with content sniffing |
//! | Identify | `ImageReader::into_dimensions` (header only) |
//! | Region copy | `DynamicImage::crop_imm` |
//! | Resample | `image::imageops::resize` with the configured filter |
//! | Encode → PNG / JPEG / WebP | `PngEncoder`, `JpegEncoder`, `WebPEncoder` (lossless) |

use super::backend::{BackendError, Dimensions, ImageInfo, PixelBuffer, RasterBackend};
use super::params::{EncodeParams, ExportFormat, ResampleFilter, SampleParams};
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::codecs::webp::WebPEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, ExtendedColorType, ImageEncoder, ImageReader, RgbaImage};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

/// Backend over one decoded source image.
pub struct RustBackend {
    image: DynamicImage,
}

impl RustBackend {
    /// Decode the image at `path`. The format is sniffed from content, not
    /// the extension.
    pub fn open(path: &Path) -> Result<Self, BackendError> {
        let image = ImageReader::open(path)
            .map_err(BackendError::Io)?
            .with_guessed_format()
            .map_err(BackendError::Io)?
            .decode()
            .map_err(|e| {
                BackendError::ProcessingFailed(format!(
                    "Failed to decode {}: {}",
                    path.display(),
                    e
                ))
            })?;
        Ok(Self { image })
    }

    pub fn from_image(image: DynamicImage) -> Self {
        Self { image }
    }
}

fn filter_type(filter: ResampleFilter) -> FilterType {
    match filter {
        ResampleFilter::Nearest => FilterType::Nearest,
        ResampleFilter::Triangle => FilterType::Triangle,
        ResampleFilter::CatmullRom => FilterType::CatmullRom,
        ResampleFilter::Gaussian => FilterType::Gaussian,
        ResampleFilter::Lanczos3 => FilterType::Lanczos3,
    }
}

fn to_rgba_image(buffer: &PixelBuffer) -> Result<RgbaImage, BackendError> {
    RgbaImage::from_raw(buffer.width, buffer.height, buffer.data.clone()).ok_or_else(|| {
        BackendError::ProcessingFailed(format!(
            "pixel buffer length {} does not match {}x{}",
            buffer.data.len(),
            buffer.width,
            buffer.height
        ))
    })
}

impl RasterBackend for RustBackend {
    fn dimensions(&self) -> Dimensions {
        Dimensions {
            width: self.image.width(),
            height: self.image.height(),
        }
    }

    fn sample(&self, params: &SampleParams) -> Result<PixelBuffer, BackendError> {
        let region = params.region;
        if region.width == 0 || region.height == 0 {
            return Err(BackendError::ProcessingFailed(
                "cannot sample an empty region".into(),
            ));
        }
        let cropped = self
            .image
            .crop_imm(region.x, region.y, region.width, region.height)
            .to_rgba8();

        let Dimensions { width, height } = params.output;
        let pixels = if cropped.dimensions() == (width, height) {
            cropped
        } else {
            image::imageops::resize(&cropped, width, height, filter_type(params.filter))
        };

        PixelBuffer::from_raw(width, height, pixels.into_raw()).ok_or_else(|| {
            BackendError::ProcessingFailed(format!("resampled buffer is not {width}x{height}"))
        })
    }
}

/// Read dimensions, format and byte size without decoding pixels.
pub fn identify(path: &Path) -> Result<ImageInfo, BackendError> {
    let byte_size = std::fs::metadata(path).map_err(BackendError::Io)?.len();
    let reader = ImageReader::open(path)
        .map_err(BackendError::Io)?
        .with_guessed_format()
        .map_err(BackendError::Io)?;
    let format = reader
        .format()
        .map(|f| format!("{f:?}").to_ascii_lowercase())
        .unwrap_or_else(|| "unknown".to_string());
    let (width, height) = reader.into_dimensions().map_err(|e| {
        BackendError::ProcessingFailed(format!("Failed to read dimensions: {}", e))
    })?;
    Ok(ImageInfo {
        dimensions: Dimensions { width, height },
        format,
        byte_size,
    })
}

/// Encode `buffer` to `path`.
pub fn save_buffer(
    buffer: &PixelBuffer,
    path: &Path,
    params: &EncodeParams,
) -> Result<(), BackendError> {
    let rgba = to_rgba_image(buffer)?;
    let file = File::create(path).map_err(BackendError::Io)?;
    let writer = BufWriter::new(file);
    let (w, h) = rgba.dimensions();

    let result = match params.format {
        ExportFormat::Png => {
            PngEncoder::new(writer).write_image(rgba.as_raw(), w, h, ExtendedColorType::Rgba8)
        }
        ExportFormat::Jpeg => {
            // JPEG has no alpha channel
            let rgb = DynamicImage::ImageRgba8(rgba).to_rgb8();
            JpegEncoder::new_with_quality(writer, params.quality.value() as u8).write_image(
                rgb.as_raw(),
                w,
                h,
                ExtendedColorType::Rgb8,
            )
        }
        ExportFormat::WebP => WebPEncoder::new_lossless(writer).write_image(
            rgba.as_raw(),
            w,
            h,
            ExtendedColorType::Rgba8,
        ),
    };

    result.map_err(|e| {
        BackendError::ProcessingFailed(format!("{} encode failed: {}", params.format, e))
    })
}
