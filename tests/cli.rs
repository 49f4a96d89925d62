//! Integration tests for the `simple-crop` binary.
//!
//! Every test runs the binary inside its own temp directory so a stray
//! `simple-crop.toml` in the working tree cannot leak into the results.

use image::{Rgba, RgbaImage};
use simple_crop::config::EditorConfig;
use simple_crop::imaging::{self, Dimensions};
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

fn run(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_simple-crop"))
        .current_dir(dir)
        .args(args)
        .output()
        .unwrap()
}

fn assert_success(out: &Output) {
    assert!(
        out.status.success(),
        "simple-crop failed: {}",
        String::from_utf8_lossy(&out.stderr)
    );
}

fn write_png(path: &Path, width: u32, height: u32) {
    RgbaImage::from_fn(width, height, |x, y| {
        Rgba([(x % 256) as u8, (y % 256) as u8, 128, 255])
    })
    .save(path)
    .unwrap();
}

fn output_size(path: &Path) -> Dimensions {
    imaging::identify(path).unwrap().dimensions
}

#[test]
fn gen_config_round_trips_to_defaults() {
    let tmp = TempDir::new().unwrap();
    let out = run(tmp.path(), &["gen-config"]);
    assert_success(&out);

    let config: EditorConfig = toml::from_str(&String::from_utf8(out.stdout).unwrap()).unwrap();
    assert_eq!(config, EditorConfig::default());
}

#[test]
fn info_prints_dimensions_and_format() {
    let tmp = TempDir::new().unwrap();
    write_png(&tmp.path().join("photo.png"), 300, 200);

    let out = run(tmp.path(), &["info", "photo.png"]);
    assert_success(&out);
    let stdout = String::from_utf8(out.stdout).unwrap();
    assert!(stdout.contains("Dimensions: 300 × 200 px"), "{stdout}");
    assert!(stdout.contains("Format: png"), "{stdout}");
}

#[test]
fn crop_default_display_uses_locked_ratio() {
    let tmp = TempDir::new().unwrap();
    write_png(&tmp.path().join("photo.png"), 2000, 1500);

    // Fits to 1000x750 display; 16:9 at 80% width → 800x450 → 1600x900 source
    let out = run(
        tmp.path(),
        &["crop", "photo.png", "-o", "out.png", "--ratio", "16:9"],
    );
    assert_success(&out);
    assert_eq!(
        output_size(&tmp.path().join("out.png")),
        Dimensions {
            width: 1600,
            height: 900
        }
    );
    let stdout = String::from_utf8(out.stdout).unwrap();
    assert!(stdout.contains("Constraint: 16:9 (locked)"), "{stdout}");
}

#[test]
fn crop_pixel_target_is_exact() {
    let tmp = TempDir::new().unwrap();
    write_png(&tmp.path().join("photo.png"), 1200, 900);

    let out = run(
        tmp.path(),
        &["crop", "photo.png", "-o", "out.webp", "--pixels", "640x360"],
    );
    assert_success(&out);
    assert_eq!(
        output_size(&tmp.path().join("out.webp")),
        Dimensions {
            width: 640,
            height: 360
        }
    );
}

#[test]
fn crop_replays_event_script() {
    let tmp = TempDir::new().unwrap();
    write_png(&tmp.path().join("photo.png"), 800, 800);
    // Free mode in a 400x400 display: initial 320x320 @ (40, 40).
    // Drag the south-east corner from (360, 360) to (200, 300).
    std::fs::write(
        tmp.path().join("events.json"),
        r#"[
            {"type": "pointer_down", "client_x": 360, "client_y": 360, "target": {"handle": "se"}},
            {"type": "pointer_move", "client_x": 200, "client_y": 300},
            {"type": "pointer_up"}
        ]"#,
    )
    .unwrap();

    let out = run(
        tmp.path(),
        &[
            "crop",
            "photo.png",
            "-o",
            "out.png",
            "--display",
            "400x400",
            "--ratio",
            "free",
            "--events",
            "events.json",
        ],
    );
    assert_success(&out);
    // 160x260 display at 2x scale
    assert_eq!(
        output_size(&tmp.path().join("out.png")),
        Dimensions {
            width: 320,
            height: 520
        }
    );
}

#[test]
fn crop_honours_config_file() {
    let tmp = TempDir::new().unwrap();
    write_png(&tmp.path().join("photo.png"), 1000, 1000);
    std::fs::write(
        tmp.path().join("simple-crop.toml"),
        "[crop]\ninitial_fill = 0.5\n",
    )
    .unwrap();

    let out = run(
        tmp.path(),
        &["crop", "photo.png", "-o", "out.png", "--ratio", "1:1"],
    );
    assert_success(&out);
    assert_eq!(
        output_size(&tmp.path().join("out.png")),
        Dimensions {
            width: 500,
            height: 500
        }
    );
}

#[test]
fn missing_explicit_config_is_an_error() {
    let tmp = TempDir::new().unwrap();
    write_png(&tmp.path().join("photo.png"), 100, 100);

    let out = run(
        tmp.path(),
        &["--config", "nope.toml", "crop", "photo.png", "-o", "out.png"],
    );
    assert!(!out.status.success());
    assert!(!tmp.path().join("out.png").exists());
}

#[test]
fn unknown_ratio_is_rejected() {
    let tmp = TempDir::new().unwrap();
    write_png(&tmp.path().join("photo.png"), 100, 100);

    let out = run(
        tmp.path(),
        &["crop", "photo.png", "-o", "out.png", "--ratio", "5:4"],
    );
    assert!(!out.status.success());
}

#[test]
fn resize_keeps_aspect_from_width() {
    let tmp = TempDir::new().unwrap();
    write_png(&tmp.path().join("photo.png"), 400, 300);

    let out = run(
        tmp.path(),
        &["resize", "photo.png", "-o", "small.jpg", "--width", "100"],
    );
    assert_success(&out);
    assert_eq!(
        output_size(&tmp.path().join("small.jpg")),
        Dimensions {
            width: 100,
            height: 75
        }
    );
    let stdout = String::from_utf8(out.stdout).unwrap();
    assert!(stdout.contains("400 × 300 px → 100 × 75 px"), "{stdout}");
}
