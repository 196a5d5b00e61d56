//! Image inspection utilities for testing.
//!
//! Helper functions for loading exported figures and checking their
//! pixel content.

use image::RgbaImage;
use std::path::Path;

/// Load a PNG export as an RGBA buffer.
pub fn load_rgba(path: &Path) -> RgbaImage {
    image::open(path)
        .unwrap_or_else(|e| panic!("failed to open {}: {}", path.display(), e))
        .to_rgba8()
}

/// Number of pixels with non-zero alpha.
pub fn count_opaque(image: &RgbaImage) -> usize {
    image.pixels().filter(|p| p[3] > 0).count()
}

/// Compare two images for approximate equality.
///
/// Returns an error message when dimensions differ or any channel
/// deviates by more than `max_diff`.
pub fn assert_images_approx_eq(
    actual: &RgbaImage,
    expected: &RgbaImage,
    max_diff: u8,
) -> Result<(), String> {
    if actual.dimensions() != expected.dimensions() {
        return Err(format!(
            "image dimensions differ: actual = {:?}, expected = {:?}",
            actual.dimensions(),
            expected.dimensions()
        ));
    }

    for (a, e) in actual.pixels().zip(expected.pixels()) {
        for c in 0..4 {
            if a[c].abs_diff(e[c]) > max_diff {
                return Err(format!(
                    "pixel channel differs by more than {}: actual = {:?}, expected = {:?}",
                    max_diff, a, e
                ));
            }
        }
    }
    Ok(())
}
