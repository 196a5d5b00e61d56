//! Transparent-margin autocrop for rendered raster files.
//!
//! Screenshot renders come with large transparent borders around the
//! content. [`autocrop_file`] trims a PNG to the bounding box of its
//! non-transparent pixels, re-pads by a fixed margin, and overwrites the
//! source file. A fully transparent image has no bounding box and is
//! reported as an explicit error.

use image::{ImageFormat, Rgba, RgbaImage};
use std::path::Path;
use tracing::debug;

use crate::error::{Result, TufteError};
use crate::logging::log_export_stats;

/// Bounding box `(x, y, width, height)` of pixels with non-zero alpha.
///
/// Returns `None` when every pixel is fully transparent.
pub fn content_bbox(image: &RgbaImage) -> Option<(u32, u32, u32, u32)> {
    let (w, h) = image.dimensions();
    let mut min_x = w;
    let mut min_y = h;
    let mut max_x = 0u32;
    let mut max_y = 0u32;
    let mut found = false;

    for (x, y, pixel) in image.enumerate_pixels() {
        if pixel[3] > 0 {
            found = true;
            min_x = min_x.min(x);
            min_y = min_y.min(y);
            max_x = max_x.max(x);
            max_y = max_y.max(y);
        }
    }

    found.then(|| (min_x, min_y, max_x - min_x + 1, max_y - min_y + 1))
}

/// Crop an image to its content and re-pad with a transparent margin.
///
/// The output dimensions are the content bounding box grown by `margin`
/// pixels on every side. A fully transparent input is an error.
pub fn autocrop(image: &RgbaImage, margin: u32) -> Result<RgbaImage> {
    autocrop_from(image, margin, "<memory>")
}

/// Autocrop a raster file in place, overwriting it as PNG.
///
/// Returns the output dimensions.
pub fn autocrop_file<P: AsRef<Path>>(path: P, margin: u32) -> Result<(u32, u32)> {
    let path = path.as_ref();
    let image = image::open(path)?.to_rgba8();

    let cropped = autocrop_from(&image, margin, &path.display().to_string())?;
    cropped.save_with_format(path, ImageFormat::Png)?;

    let (w, h) = cropped.dimensions();
    log_export_stats(path, w, h, "autocrop");
    Ok((w, h))
}

fn autocrop_from(image: &RgbaImage, margin: u32, source: &str) -> Result<RgbaImage> {
    let (x, y, w, h) = content_bbox(image).ok_or_else(|| TufteError::EmptyImage {
        path: source.to_string(),
    })?;
    debug!(
        source = source,
        x = x,
        y = y,
        width = w,
        height = h,
        margin = margin,
        "Cropping to content bounding box"
    );

    let content = image::imageops::crop_imm(image, x, y, w, h).to_image();

    let mut output = RgbaImage::from_pixel(w + 2 * margin, h + 2 * margin, Rgba([0, 0, 0, 0]));
    image::imageops::replace(&mut output, &content, margin as i64, margin as i64);
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    /// Transparent canvas with an opaque block at (x, y).
    fn block_image(size: (u32, u32), x: u32, y: u32, block: (u32, u32)) -> RgbaImage {
        let mut img = RgbaImage::from_pixel(size.0, size.1, Rgba([0, 0, 0, 0]));
        for dy in 0..block.1 {
            for dx in 0..block.0 {
                img.put_pixel(x + dx, y + dy, Rgba([200, 40, 40, 255]));
            }
        }
        img
    }

    #[test]
    fn test_content_bbox() {
        let img = block_image((50, 40), 10, 5, (7, 3));
        assert_eq!(content_bbox(&img), Some((10, 5, 7, 3)));
    }

    #[test]
    fn test_content_bbox_empty() {
        let img = RgbaImage::from_pixel(8, 8, Rgba([0, 0, 0, 0]));
        assert_eq!(content_bbox(&img), None);
    }

    #[test]
    fn test_size_law() {
        // Content box W x H with margin m crops to (W + 2m, H + 2m)
        let img = block_image((100, 80), 20, 30, (15, 10));
        let out = autocrop(&img, 25).unwrap();
        assert_eq!(out.dimensions(), (15 + 50, 10 + 50));
        // Content relocated to the margin offset
        assert_eq!(out.get_pixel(25, 25)[3], 255);
        assert_eq!(out.get_pixel(0, 0)[3], 0);
    }

    #[test]
    fn test_zero_margin() {
        let img = block_image((30, 30), 4, 6, (5, 8));
        let out = autocrop(&img, 0).unwrap();
        assert_eq!(out.dimensions(), (5, 8));
    }

    #[test]
    fn test_idempotence() {
        let img = block_image((64, 64), 12, 9, (6, 11));
        let once = autocrop(&img, 7).unwrap();
        let twice = autocrop(&once, 7).unwrap();
        assert_eq!(once.dimensions(), twice.dimensions());
        assert_eq!(once.as_raw(), twice.as_raw());
    }

    #[test]
    fn test_fully_transparent_is_an_error() {
        let img = RgbaImage::from_pixel(16, 16, Rgba([0, 0, 0, 0]));
        let err = autocrop(&img, 5).unwrap_err();
        assert!(matches!(err, TufteError::EmptyImage { .. }));
    }

    #[test]
    fn test_autocrop_file_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shot.png");
        block_image((120, 90), 40, 20, (10, 30))
            .save_with_format(&path, ImageFormat::Png)
            .unwrap();

        let dims = autocrop_file(&path, 5).unwrap();
        assert_eq!(dims, (20, 40));

        let reloaded = image::open(&path).unwrap().to_rgba8();
        assert_eq!(reloaded.dimensions(), (20, 40));
    }

    #[test]
    fn test_autocrop_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.png");
        RgbaImage::from_pixel(10, 10, Rgba([0, 0, 0, 0]))
            .save_with_format(&path, ImageFormat::Png)
            .unwrap();

        let err = autocrop_file(&path, 3).unwrap_err();
        assert!(err.to_string().contains("empty.png"));
    }
}
