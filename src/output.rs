//! CLI output formatting for every command.
//!
//! # Output Format
//!
//! ## Info
//!
//! ```text
//! photo.jpg
//!     Dimensions: 4000 × 3000 px
//!     Format: jpeg
//!     Size: 2.4 MB
//! ```
//!
//! ## Crop
//!
//! ```text
//! photo.jpg → photo-crop.png
//!     Display: 1000 × 750
//!     Constraint: 16:9 (locked)
//!     Rectangle: 800 × 450 @ (100, 150)
//!     Output: 3200 × 1800 px
//! ```
//!
//! ## Resize
//!
//! ```text
//! photo.jpg → photo-small.jpg
//!     4000 × 3000 px → 1000 × 750 px
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format functions
//! are pure: no I/O, no side effects.

use crate::crop::EditorState;
use crate::imaging::{Dimensions, ImageInfo};
use std::path::Path;

// ============================================================================
// Shared display helpers
// ============================================================================

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn pixels(dims: Dimensions) -> String {
    format!("{} × {} px", dims.width, dims.height)
}

/// Human-readable byte count, one decimal place above 1 KB.
///
/// ```text
/// 512 B
/// 1.5 KB
/// 2.4 MB
/// ```
fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["KB", "MB", "GB", "TB"];
    if bytes < 1024 {
        return format!("{bytes} B");
    }
    let mut value = bytes as f64 / 1024.0;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{value:.1} {}", UNITS[unit])
}

// ============================================================================
// Info
// ============================================================================

pub fn format_info(path: &Path, info: &ImageInfo) -> Vec<String> {
    vec![
        file_label(path),
        format!("{}Dimensions: {}", indent(1), pixels(info.dimensions)),
        format!("{}Format: {}", indent(1), info.format),
        format!("{}Size: {}", indent(1), format_bytes(info.byte_size)),
    ]
}

pub fn print_info(path: &Path, info: &ImageInfo) {
    for line in format_info(path, info) {
        println!("{}", line);
    }
}

// ============================================================================
// Crop
// ============================================================================

/// Summarize a committed crop.
///
/// `state` is the editor state just before the commit, while the rectangle
/// still exists.
pub fn format_crop(input: &Path, output: &Path, state: &EditorState, size: Dimensions) -> Vec<String> {
    let mut lines = vec![format!("{} → {}", file_label(input), file_label(output))];

    if let Some(geometry) = state.geometry {
        lines.push(format!(
            "{}Display: {} × {}",
            indent(1),
            geometry.width.round(),
            geometry.height.round()
        ));
    }

    let lock = if state.lock_enabled { "locked" } else { "unlocked" };
    lines.push(format!("{}Constraint: {} ({})", indent(1), state.mode.label(), lock));

    if let Some(rect) = state.rect {
        lines.push(format!(
            "{}Rectangle: {} × {} @ ({}, {})",
            indent(1),
            rect.width.round(),
            rect.height.round(),
            rect.x.round(),
            rect.y.round()
        ));
    }

    lines.push(format!("{}Output: {}", indent(1), pixels(size)));
    lines
}

pub fn print_crop(input: &Path, output: &Path, state: &EditorState, size: Dimensions) {
    for line in format_crop(input, output, state, size) {
        println!("{}", line);
    }
}

// ============================================================================
// Resize
// ============================================================================

pub fn format_resize(input: &Path, output: &Path, from: Dimensions, to: Dimensions) -> Vec<String> {
    vec![
        format!("{} → {}", file_label(input), file_label(output)),
        format!("{}{} → {}", indent(1), pixels(from), pixels(to)),
    ]
}

pub fn print_resize(input: &Path, output: &Path, from: Dimensions, to: Dimensions) {
    for line in format_resize(input, output, from, to) {
        println!("{}", line);
    }
}
