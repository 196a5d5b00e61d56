//! Figure geometry capture for the vector/raster split.
//!
//! Embedding tens of thousands of vector points in a document is
//! prohibitively large, so a figure is rendered twice: a light vector
//! layer carrying axes, ticks, and legend, and a heavy raster layer
//! carrying the payload. [`FigureGeometry`] is the snapshot taken from
//! the vector layer (drawable size in inches plus the axis and color
//! ranges) that the raster layer must reproduce exactly for the two
//! exports to align pixel-for-pixel when composited.

use plotters::coord::CoordTranslate;
use plotters::prelude::{DrawingArea, DrawingBackend};
use serde::{Deserialize, Serialize};

use crate::bounds::Bound;
use crate::error::{Result, TufteError};

/// Print size and screen resolution of a figure.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FigureSize {
    /// Print width in inches
    pub width_in: f64,
    /// Print height in inches
    pub height_in: f64,
    /// Screen resolution in pixels per inch
    pub dpi: f64,
}

impl FigureSize {
    pub fn new(width_in: f64, height_in: f64, dpi: f64) -> Self {
        Self {
            width_in,
            height_in,
            dpi,
        }
    }

    /// Canvas size in whole pixels.
    pub fn px(&self) -> (u32, u32) {
        (
            (self.width_in * self.dpi).round().max(1.0) as u32,
            (self.height_in * self.dpi).round().max(1.0) as u32,
        )
    }
}

/// Snapshot of a rendered figure's drawable area.
///
/// Captured from the vector layer and reapplied verbatim to the raster
/// layer; any deviation misaligns the composite.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FigureGeometry {
    /// Drawable width in inches (pixels over device resolution)
    pub width_in: f64,
    /// Drawable height in inches
    pub height_in: f64,
    /// Visible x range
    pub x_range: Bound,
    /// Visible y range
    pub y_range: Bound,
    /// Color-scale range
    pub color_range: Bound,
}

impl FigureGeometry {
    /// Capture the geometry of a drawing area.
    ///
    /// `area` should be the chart's plotting area (the region inside the
    /// tick label bands), `dpi` the resolution the canvas was created
    /// with, and the ranges the bounds the chart was built on.
    pub fn capture<DB: DrawingBackend, CT: CoordTranslate>(
        area: &DrawingArea<DB, CT>,
        dpi: f64,
        x_range: Bound,
        y_range: Bound,
        color_range: Bound,
    ) -> Self {
        let (w, h) = area.dim_in_pixel();
        Self {
            width_in: w as f64 / dpi,
            height_in: h as f64 / dpi,
            x_range,
            y_range,
            color_range,
        }
    }

    /// Pixel footprint of the drawable area at a given raster resolution.
    ///
    /// The raster layer is exported at a much higher density than the
    /// vector layer's nominal dpi, so the same physical size maps to a
    /// larger pixel grid.
    pub fn raster_px(&self, raster_dpi: f64) -> Result<(u32, u32)> {
        if !(raster_dpi.is_finite() && raster_dpi > 0.0) {
            return Err(TufteError::InvalidParameter {
                param: "raster_dpi".to_string(),
                message: format!("resolution must be positive, got {}", raster_dpi),
            });
        }
        let w = (self.width_in * raster_dpi).round();
        let h = (self.height_in * raster_dpi).round();
        if w < 1.0 || h < 1.0 {
            return Err(TufteError::InvalidParameter {
                param: "raster_dpi".to_string(),
                message: format!(
                    "raster footprint collapses to zero pixels at {} dpi for {} x {} in",
                    raster_dpi, self.width_in, self.height_in
                ),
            });
        }
        Ok((w as u32, h as u32))
    }
}
