//! End-to-end crop sessions against the real `image` backend.
//!
//! Each test builds a synthetic gradient (red = x, green = y) so pixel
//! values in the output identify exactly which source pixel was copied.

use image::{DynamicImage, Rgba, RgbaImage};
use simple_crop::config::EditorConfig;
use simple_crop::crop::{
    ConstraintMode, CustomDimensions, CustomUnit, DisplayGeometry, Handle, InputEvent,
    NamedRatio, PointerTarget,
};
use simple_crop::imaging::{
    self, Dimensions, EncodeParams, ExportFormat, PixelBuffer, RasterBackend, ResampleFilter,
    RustBackend,
};
use simple_crop::session::CropSession;

fn gradient_backend(width: u32, height: u32) -> RustBackend {
    RustBackend::from_image(DynamicImage::ImageRgba8(RgbaImage::from_fn(
        width,
        height,
        |x, y| Rgba([(x % 256) as u8, (y % 256) as u8, 128, 255]),
    )))
}

/// 1600x1200 source in an 800x600 display box (2x scale), 16:9 locked.
fn locked_session() -> CropSession<RustBackend> {
    let mut session = CropSession::new(&EditorConfig::default());
    session.handle(&InputEvent::Layout {
        geometry: DisplayGeometry::sized(800.0, 600.0),
    });
    session.load_image(gradient_backend(1600, 1200));
    session.handle(&InputEvent::SetMode {
        mode: ConstraintMode::NamedRatio(NamedRatio::Widescreen),
    });
    session.handle(&InputEvent::SetLock { enabled: true });
    session
}

fn commit(session: &mut CropSession<RustBackend>) -> (PixelBuffer, Dimensions) {
    let mut result = None;
    let applied = session
        .commit(|buffer, size| result = Some((buffer, size)))
        .unwrap();
    assert!(applied);
    result.unwrap()
}

#[test]
fn initial_rectangle_is_centered() {
    let session = locked_session();
    let rect = session.state().rect.unwrap();
    // 80% of 800 wide → 640x360, centered in 800x600
    assert_eq!((rect.x, rect.y, rect.width, rect.height), (80.0, 120.0, 640.0, 360.0));
    assert_eq!(session.state().caption().as_deref(), Some("1280 × 720 px · 16:9"));
}

#[test]
fn drag_then_commit_copies_source_pixels() {
    let mut session = locked_session();
    session.handle(&InputEvent::PointerDown {
        client_x: 400.0,
        client_y: 300.0,
        target: None,
    });
    session.handle(&InputEvent::PointerMove {
        client_x: 420.0,
        client_y: 310.0,
    });
    session.handle(&InputEvent::PointerUp);

    let (buffer, size) = commit(&mut session);
    assert_eq!(size, Dimensions { width: 1280, height: 720 });
    // Rectangle moved to (100, 130) display → (200, 260) source
    assert_eq!(buffer.pixel(0, 0), Some([200, 4, 128, 255]));
    assert_eq!(buffer.pixel(55, 0), Some([255, 4, 128, 255]));
}

#[test]
fn corner_resize_keeps_ratio_in_source_space() {
    let mut session = locked_session();
    session.handle(&InputEvent::PointerDown {
        client_x: 720.0,
        client_y: 480.0,
        target: Some(PointerTarget::Handle(Handle::Se)),
    });
    session.handle(&InputEvent::PointerMove {
        client_x: 600.0,
        client_y: 400.0,
    });
    session.handle(&InputEvent::PointerUp);

    let (_, size) = commit(&mut session);
    let ratio = size.width as f64 / size.height as f64;
    assert!((ratio - 16.0 / 9.0).abs() < 0.01, "ratio drifted: {size:?}");
    assert!(size.width < 1280);
}

#[test]
fn pixel_target_output_is_exact() {
    let mut session = locked_session();
    session.handle(&InputEvent::SetCustom {
        custom: CustomDimensions::new(1920, 1080, CustomUnit::Pixels),
    });
    session.handle(&InputEvent::SetMode {
        mode: ConstraintMode::PixelTarget {
            width: 1920,
            height: 1080,
        },
    });
    // Scale the rectangle away from its initial size; output stays exact
    session.handle(&InputEvent::Wheel {
        delta_y: 1.0,
        modifier: true,
    });

    let (buffer, size) = commit(&mut session);
    assert_eq!(size, Dimensions { width: 1920, height: 1080 });
    assert_eq!(buffer.data.len(), 1920 * 1080 * 4);
}

#[test]
fn wheel_cycles_ratio_and_reinitializes() {
    let mut session = locked_session();
    session.handle(&InputEvent::Wheel {
        delta_y: 1.0,
        modifier: false,
    });
    assert_eq!(
        session.state().mode,
        ConstraintMode::NamedRatio(NamedRatio::Standard)
    );
    let rect = session.state().rect.unwrap();
    assert!((rect.width / rect.height - 4.0 / 3.0).abs() < 1e-9);
}

#[test]
fn closing_before_apply_discards_result() {
    let mut session = locked_session();
    let pending = session.begin_commit().unwrap();
    let rendered = pending.render(session.backend().unwrap()).unwrap();

    session.close();

    let mut delivered = false;
    assert!(!session.finish_commit(rendered, |_, _| delivered = true));
    assert!(!delivered);
    assert!(session.begin_commit().is_err());
}

#[test]
fn preview_matches_commit() {
    let mut session = locked_session();
    let preview = session.preview().unwrap();
    let (committed, _) = commit(&mut session);
    assert_eq!(preview, committed);
}

#[test]
fn resize_whole_image_and_export() {
    let tmp = tempfile::TempDir::new().unwrap();
    let backend = gradient_backend(400, 300);
    let target = imaging::fit_dimensions(backend.dimensions(), Some(200), None);

    let buffer =
        imaging::resize_image(&backend, target.width, target.height, ResampleFilter::Lanczos3)
            .unwrap();
    assert_eq!(buffer.dimensions(), Dimensions { width: 200, height: 150 });

    let path = tmp.path().join("small.jpg");
    imaging::save_buffer(
        &buffer,
        &path,
        &EncodeParams {
            format: ExportFormat::Jpeg,
            ..EncodeParams::default()
        },
    )
    .unwrap();

    let info = imaging::identify(&path).unwrap();
    assert_eq!(info.dimensions, Dimensions { width: 200, height: 150 });
    assert_eq!(info.format, "jpeg");
}
