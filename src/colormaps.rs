//! Colormaps for raster payloads and mesh scalars.
//!
//! Named matplotlib-style colormaps backed by `colorgrad` gradients,
//! looked up by string and applied through a color-scale [`Bound`].

use image::Rgba;

use crate::bounds::Bound;
use crate::error::{Result, TufteError};

/// Names accepted by [`Colormap::by_name`].
pub const COLORMAP_NAMES: &[&str] = &[
    "viridis", "plasma", "inferno", "magma", "cividis", "turbo", "rdbu", "spectral",
];

/// A named color gradient.
pub struct Colormap {
    name: &'static str,
    gradient: colorgrad::Gradient,
}

impl Colormap {
    /// Look up a colormap by name.
    pub fn by_name(name: &str) -> Result<Self> {
        let (name, gradient) = match name.to_lowercase().as_str() {
            "viridis" => ("viridis", colorgrad::viridis()),
            "plasma" => ("plasma", colorgrad::plasma()),
            "inferno" => ("inferno", colorgrad::inferno()),
            "magma" => ("magma", colorgrad::magma()),
            "cividis" => ("cividis", colorgrad::cividis()),
            "turbo" => ("turbo", colorgrad::turbo()),
            "rdbu" => ("rdbu", colorgrad::rd_bu()),
            "spectral" => ("spectral", colorgrad::spectral()),
            _ => {
                return Err(TufteError::InvalidParameter {
                    param: "colormap".to_string(),
                    message: format!(
                        "Unknown colormap: {} (expected one of {})",
                        name,
                        COLORMAP_NAMES.join(", ")
                    ),
                })
            }
        };
        Ok(Self { name, gradient })
    }

    /// Name of this colormap.
    pub fn name(&self) -> &str {
        self.name
    }

    /// Sample the gradient at a normalized position in [0, 1], clamped.
    pub fn sample(&self, t: f64) -> Rgba<u8> {
        Rgba(self.gradient.at(t.clamp(0.0, 1.0)).to_rgba8())
    }

    /// Map a raw value to a color given the color-scale limits.
    ///
    /// Non-finite values map to fully transparent, matching the missing
    /// data convention of the raster payloads.
    pub fn map(&self, value: f64, limits: &Bound) -> Rgba<u8> {
        let t = limits.normalize(value);
        if t.is_nan() {
            Rgba([0, 0, 0, 0])
        } else {
            self.sample(t)
        }
    }
}

impl std::fmt::Debug for Colormap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Colormap").field("name", &self.name).finish()
    }
}
