//! Raster payload rendering for the vector/raster split.
//!
//! A [`RasterCanvas`] is the heavy half of a split figure: a transparent
//! pixel grid spanning the captured axis ranges edge-to-edge, with no
//! margins and no axis decoration (those come from the vector layer).
//! Payloads are dense scatter points or a field grid mapped through a
//! colormap; the result is exported as a transparent PNG at a pixel
//! density well above the vector layer's nominal resolution.

use image::{ImageFormat, Rgba, RgbaImage};
use ndarray::ArrayView2;
use std::path::Path;
use tracing::debug;

use crate::colormaps::Colormap;
use crate::error::{Result, TufteError};
use crate::geometry::FigureGeometry;
use crate::logging::log_export_stats;

/// Raster drawing surface cloned from a vector figure's geometry.
#[derive(Debug)]
pub struct RasterCanvas {
    image: RgbaImage,
    geometry: FigureGeometry,
    raster_dpi: f64,
}

impl RasterCanvas {
    /// Create a transparent canvas matching `geometry` at `raster_dpi`.
    pub fn new(geometry: FigureGeometry, raster_dpi: f64) -> Result<Self> {
        let (w, h) = geometry.raster_px(raster_dpi)?;
        debug!(
            width = w,
            height = h,
            raster_dpi = raster_dpi,
            "Creating raster canvas"
        );
        Ok(Self {
            image: RgbaImage::from_pixel(w, h, Rgba([0, 0, 0, 0])),
            geometry,
            raster_dpi,
        })
    }

    /// The geometry this canvas was cloned from.
    pub fn geometry(&self) -> &FigureGeometry {
        &self.geometry
    }

    /// Pixel density of the canvas.
    pub fn raster_dpi(&self) -> f64 {
        self.raster_dpi
    }

    /// Canvas size in pixels.
    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    /// Map a data coordinate to a pixel-space position.
    ///
    /// The canvas spans the full x/y ranges, y increasing upward in data
    /// space and downward in pixel space.
    fn to_pixel(&self, x: f64, y: f64) -> (f64, f64) {
        let (w, h) = self.image.dimensions();
        let tx = (x - self.geometry.x_range.min) / self.geometry.x_range.span();
        let ty = (y - self.geometry.y_range.min) / self.geometry.y_range.span();
        (tx * w as f64, (1.0 - ty) * h as f64)
    }

    /// Stamp scatter points colored by `values` through the color range.
    ///
    /// Points with non-finite coordinates or values are skipped, matching
    /// the transparent treatment of missing data.
    pub fn draw_scatter(
        &mut self,
        xs: &[f64],
        ys: &[f64],
        values: &[f64],
        colormap: &Colormap,
        radius_px: f64,
    ) -> Result<()> {
        if xs.len() != ys.len() || xs.len() != values.len() {
            return Err(TufteError::InvalidParameter {
                param: "scatter".to_string(),
                message: format!(
                    "coordinate and value lengths differ: x={}, y={}, c={}",
                    xs.len(),
                    ys.len(),
                    values.len()
                ),
            });
        }
        if !(radius_px.is_finite() && radius_px > 0.0) {
            return Err(TufteError::InvalidParameter {
                param: "radius_px".to_string(),
                message: format!("marker radius must be positive, got {}", radius_px),
            });
        }

        let (w, h) = self.image.dimensions();
        let r2 = radius_px * radius_px;

        for i in 0..xs.len() {
            if !(xs[i].is_finite() && ys[i].is_finite()) {
                continue;
            }
            let color = colormap.map(values[i], &self.geometry.color_range);
            if color[3] == 0 {
                continue;
            }
            let (cx, cy) = self.to_pixel(xs[i], ys[i]);

            let px_min = (cx - radius_px).floor().max(0.0) as u32;
            let px_max = ((cx + radius_px).ceil() as i64).min(w as i64 - 1).max(0) as u32;
            let py_min = (cy - radius_px).floor().max(0.0) as u32;
            let py_max = ((cy + radius_px).ceil() as i64).min(h as i64 - 1).max(0) as u32;
            if cx + radius_px < 0.0 || cy + radius_px < 0.0 {
                continue;
            }

            for py in py_min..=py_max {
                for px in px_min..=px_max {
                    let dx = px as f64 + 0.5 - cx;
                    let dy = py as f64 + 0.5 - cy;
                    if dx * dx + dy * dy <= r2 {
                        self.image.put_pixel(px, py, color);
                    }
                }
            }
        }
        Ok(())
    }

    /// Fill the canvas with a field grid mapped through the colormap.
    ///
    /// Row 0 of `field` sits at the bottom of the y range and the last
    /// row at the top; values are resampled to the pixel grid with
    /// bilinear interpolation. Cells touching a non-finite sample render
    /// transparent.
    pub fn draw_field(&mut self, field: ArrayView2<'_, f64>, colormap: &Colormap) -> Result<()> {
        let rows = field.shape()[0];
        let cols = field.shape()[1];
        if rows == 0 || cols == 0 {
            return Err(TufteError::EmptyInput {
                message: "field grid has no samples".to_string(),
            });
        }

        let (w, h) = self.image.dimensions();
        for py in 0..h {
            for px in 0..w {
                let tx = (px as f64 + 0.5) / w as f64;
                let ty = 1.0 - (py as f64 + 0.5) / h as f64;
                let fx = tx * (cols - 1) as f64;
                let fy = ty * (rows - 1) as f64;
                let value = bilinear(&field, fy, fx);
                let color = colormap.map(value, &self.geometry.color_range);
                self.image.put_pixel(px, py, color);
            }
        }
        Ok(())
    }

    /// Borrow the pixel buffer.
    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    /// Take ownership of the pixel buffer.
    pub fn into_image(self) -> RgbaImage {
        self.image
    }

    /// Export the canvas as a transparent PNG.
    pub fn save_png<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        self.image.save_with_format(path, ImageFormat::Png)?;
        let (w, h) = self.image.dimensions();
        log_export_stats(path, w, h, "raster");
        Ok(())
    }
}

/// Bilinear sample of a field grid at fractional indices.
///
/// Any non-finite neighbor poisons the sample so missing regions stay
/// transparent instead of bleeding interpolated values.
fn bilinear(field: &ArrayView2<'_, f64>, fy: f64, fx: f64) -> f64 {
    let rows = field.shape()[0];
    let cols = field.shape()[1];

    let y0 = fy.floor().clamp(0.0, (rows - 1) as f64) as usize;
    let x0 = fx.floor().clamp(0.0, (cols - 1) as f64) as usize;
    let y1 = (y0 + 1).min(rows - 1);
    let x1 = (x0 + 1).min(cols - 1);
    let ty = (fy - y0 as f64).clamp(0.0, 1.0);
    let tx = (fx - x0 as f64).clamp(0.0, 1.0);

    let v00 = field[[y0, x0]];
    let v01 = field[[y0, x1]];
    let v10 = field[[y1, x0]];
    let v11 = field[[y1, x1]];
    if !(v00.is_finite() && v01.is_finite() && v10.is_finite() && v11.is_finite()) {
        return f64::NAN;
    }

    let top = v00 * (1.0 - tx) + v01 * tx;
    let bottom = v10 * (1.0 - tx) + v11 * tx;
    top * (1.0 - ty) + bottom * ty
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bounds::Bound;
    use ndarray::array;

    fn unit_geometry() -> FigureGeometry {
        FigureGeometry {
            width_in: 1.0,
            height_in: 1.0,
            x_range: Bound::new(0.0, 1.0),
            y_range: Bound::new(0.0, 1.0),
            color_range: Bound::new(0.0, 1.0),
        }
    }

    fn intensity(pixel: &Rgba<u8>) -> u32 {
        pixel[0] as u32 + pixel[1] as u32 + pixel[2] as u32
    }

    #[test]
    fn test_canvas_matches_geometry() {
        let geometry = unit_geometry();
        let canvas = RasterCanvas::new(geometry, 100.0).unwrap();
        assert_eq!(canvas.dimensions(), (100, 100));
        // Round trip: the canvas reports the geometry it was built from
        assert_eq!(canvas.geometry(), &geometry);
        // Starts fully transparent
        assert!(canvas.image().pixels().all(|p| p[3] == 0));
    }

    #[test]
    fn test_scatter_stamps_center() {
        let cmap = Colormap::by_name("viridis").unwrap();
        let mut canvas = RasterCanvas::new(unit_geometry(), 100.0).unwrap();
        canvas
            .draw_scatter(&[0.5], &[0.5], &[0.7], &cmap, 3.0)
            .unwrap();

        let expected = cmap.map(0.7, &Bound::new(0.0, 1.0));
        assert_eq!(*canvas.image().get_pixel(50, 50), expected);
        // Far corner stays transparent
        assert_eq!(canvas.image().get_pixel(5, 5)[3], 0);
    }

    #[test]
    fn test_scatter_skips_missing_points() {
        let cmap = Colormap::by_name("viridis").unwrap();
        let mut canvas = RasterCanvas::new(unit_geometry(), 50.0).unwrap();
        canvas
            .draw_scatter(
                &[f64::NAN, 0.5],
                &[0.5, 0.5],
                &[0.2, f64::NAN],
                &cmap,
                2.0,
            )
            .unwrap();
        // The NaN coordinate and the NaN value both draw nothing
        assert!(canvas.image().pixels().all(|p| p[3] == 0));
    }

    #[test]
    fn test_scatter_length_mismatch() {
        let cmap = Colormap::by_name("viridis").unwrap();
        let mut canvas = RasterCanvas::new(unit_geometry(), 50.0).unwrap();
        let result = canvas.draw_scatter(&[0.0, 1.0], &[0.0], &[0.0], &cmap, 2.0);
        assert!(result.is_err());
    }

    #[test]
    fn test_field_orientation() {
        // Values increase bottom-to-top and left-to-right in data space
        let field = array![[0.0, 0.2, 0.4], [0.3, 0.5, 0.7], [0.6, 0.8, 1.0]];
        let cmap = Colormap::by_name("viridis").unwrap();
        let mut canvas = RasterCanvas::new(unit_geometry(), 60.0).unwrap();
        canvas.draw_field(field.view(), &cmap).unwrap();

        let img = canvas.image();
        let bottom_left = img.get_pixel(2, 57);
        let top_right = img.get_pixel(57, 2);
        let top_left = img.get_pixel(2, 2);
        // viridis brightens with value, so the high corner reads brighter
        assert!(intensity(top_right) > intensity(bottom_left));
        assert!(intensity(top_right) > intensity(top_left));
    }

    #[test]
    fn test_field_missing_region_is_transparent() {
        let mut field = array![[0.1, 0.2, 0.3], [0.4, 0.5, 0.6], [0.7, 0.8, 0.9]];
        field[[2, 2]] = f64::NAN;
        let cmap = Colormap::by_name("viridis").unwrap();
        let mut canvas = RasterCanvas::new(unit_geometry(), 60.0).unwrap();
        canvas.draw_field(field.view(), &cmap).unwrap();

        let img = canvas.image();
        // The corner adjacent to the missing sample renders transparent
        assert_eq!(img.get_pixel(58, 1)[3], 0);
        // The opposite corner is unaffected
        assert_ne!(img.get_pixel(1, 58)[3], 0);
    }

    #[test]
    fn test_save_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("payload.png");
        let cmap = Colormap::by_name("viridis").unwrap();
        let mut canvas = RasterCanvas::new(unit_geometry(), 40.0).unwrap();
        canvas
            .draw_scatter(&[0.5], &[0.5], &[0.5], &cmap, 2.0)
            .unwrap();
        canvas.save_png(&path).unwrap();

        let reloaded = image::open(&path).unwrap().to_rgba8();
        assert_eq!(reloaded.dimensions(), (40, 40));
        assert_eq!(reloaded.get_pixel(1, 1)[3], 0);
    }
}
