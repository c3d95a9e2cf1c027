//! Collaborator-side intrinsic width measurement for file-backed hosts.
//!
//! Reads image headers only; no pixel data is decoded. The core itself never
//! opens files — hosts call this and feed the result through
//! `GalleryHost::intrinsic_width`.

use std::io::Cursor;
use std::path::Path;

use anyhow::{Context, Result};
use image::ImageReader;

/// Reads an image's pixel dimensions from its header.
pub fn read_dimensions(path: &Path) -> Result<(u32, u32)> {
    let bytes = std::fs::read(path).with_context(|| format!("Failed to read image: {:?}", path))?;
    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .context("Failed to guess image format")?;
    reader
        .into_dimensions()
        .with_context(|| format!("Failed to read dimensions: {:?}", path))
}

/// The natural width an image would render at if scaled to `row_height`,
/// aspect ratio preserved. This is the gallery's intrinsic width for the
/// file.
pub fn intrinsic_width_at(path: &Path, row_height: f32) -> Result<f32> {
    let (width, height) = read_dimensions(path)?;
    if height == 0 {
        // Degenerate header; treat as square rather than dividing by zero.
        return Ok(row_height);
    }
    Ok(width as f32 / height as f32 * row_height)
}
