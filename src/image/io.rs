//! I/O helpers for grayscale images and JSON.
//!
//! - `load_grayscale_volume`: read a PNG/JPEG/etc. into a 2-D [`Volume`] with
//!   intensities in [0, 1] and the supplied physical geometry.
//! - `save_grayscale`: write a 2-D [`Volume`] to a grayscale PNG.
//! - `write_json_file`: pretty-print a serializable value to disk.
use super::{ImageGeometry, Volume};
use image::{GrayImage, Luma};
use serde::Serialize;
use std::fs;
use std::path::Path;

/// Load an image from disk as 8-bit grayscale and scale it to [0, 1].
///
/// Image columns map to axis 0 and rows to axis 1.
pub fn load_grayscale_volume(
    path: &Path,
    origin: [f64; 2],
    spacing: [f64; 2],
) -> Result<Volume<2>, String> {
    let img = image::open(path)
        .map_err(|e| format!("Failed to open {}: {e}", path.display()))?
        .into_luma8();
    let size = [img.width() as usize, img.height() as usize];
    let data = img
        .into_raw()
        .into_iter()
        .map(|px| px as f32 / 255.0)
        .collect();
    Volume::from_data(ImageGeometry::new(origin, spacing, size), data)
        .map_err(|e| format!("Failed to wrap {}: {e}", path.display()))
}

/// Save a [0, 1] volume to a grayscale PNG, clamping values in [0, 255].
pub fn save_grayscale(image: &Volume<2>, path: &Path) -> Result<(), String> {
    ensure_parent_dir(path)?;
    let [width, height] = image.size();
    let mut out = GrayImage::new(width as u32, height as u32);
    for (y, row) in image.rows().enumerate() {
        for (x, &px) in row.iter().enumerate() {
            let v = (px * 255.0).clamp(0.0, 255.0);
            out.put_pixel(x as u32, y as u32, Luma([v as u8]));
        }
    }
    out.save(path)
        .map_err(|e| format!("Failed to save {}: {e}", path.display()))
}

/// Serialize a value as pretty JSON to `path`, creating parent directories.
pub fn write_json_file<T: Serialize>(path: &Path, value: &T) -> Result<(), String> {
    ensure_parent_dir(path)?;
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| format!("Failed to serialize JSON for {}: {e}", path.display()))?;
    fs::write(path, json).map_err(|e| format!("Failed to write JSON {}: {e}", path.display()))
}

fn ensure_parent_dir(path: &Path) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create {}: {e}", parent.display()))?;
        }
    }
    Ok(())
}
