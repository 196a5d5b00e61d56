//! Figure style configuration.
//!
//! The original plotting boilerplate set fonts, grid weights, and legend
//! styling through ambient library state. Here the same values live in an
//! explicit [`Theme`] that is passed to whatever builds a figure, with
//! serde defaults so a partial JSON file only overrides what it names.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{Result, TufteError};

/// Font settings for labels, titles, and legends.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FontConfig {
    /// Font family passed to the vector backend
    #[serde(default = "default_font_family")]
    pub family: String,

    /// Tick label size in points
    #[serde(default = "default_font_size")]
    pub label_size: f64,

    /// Axis description size in points
    #[serde(default = "default_font_size")]
    pub axis_size: f64,

    /// Title size in points
    #[serde(default = "default_title_size")]
    pub title_size: f64,

    /// Legend entry size in points
    #[serde(default = "default_font_size")]
    pub legend_size: f64,
}

/// Grid line settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridConfig {
    /// Draw major grid lines
    #[serde(default = "default_true")]
    pub major: bool,

    /// Draw minor grid lines
    #[serde(default = "default_true")]
    pub minor: bool,

    /// Major grid line width
    #[serde(default = "default_major_width")]
    pub major_width: f64,

    /// Minor grid line width
    #[serde(default = "default_minor_width")]
    pub minor_width: f64,
}

/// Default figure geometry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FigureConfig {
    /// Print width in inches
    #[serde(default = "default_width_in")]
    pub width_in: f64,

    /// Print height in inches
    #[serde(default = "default_height_in")]
    pub height_in: f64,

    /// Screen resolution in pixels per inch
    #[serde(default = "default_dpi")]
    pub dpi: f64,

    /// Outer margin in pixels
    #[serde(default = "default_margin_px")]
    pub margin_px: u32,

    /// Height of the x tick label band in pixels
    #[serde(default = "default_x_label_area_px")]
    pub x_label_area_px: u32,

    /// Width of the y tick label band in pixels
    #[serde(default = "default_y_label_area_px")]
    pub y_label_area_px: u32,
}

/// Complete figure style.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Theme {
    /// Font settings
    #[serde(default)]
    pub font: FontConfig,

    /// Grid settings
    #[serde(default)]
    pub grid: GridConfig,

    /// Figure geometry defaults
    #[serde(default)]
    pub figure: FigureConfig,

    /// Axis frame line width
    #[serde(default = "default_axis_line_width")]
    pub axis_line_width: f64,
}

impl Theme {
    /// Load a theme from a JSON file; absent fields keep their defaults.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let theme: Theme = serde_json::from_str(&content)?;
        theme.validate()?;
        Ok(theme)
    }

    /// Opacity of the major grid, zero when disabled.
    pub fn major_grid_alpha(&self) -> f64 {
        if self.grid.major {
            0.15
        } else {
            0.0
        }
    }

    /// Opacity of the minor grid, zero when disabled.
    pub fn minor_grid_alpha(&self) -> f64 {
        if self.grid.minor {
            0.05
        } else {
            0.0
        }
    }

    /// Check the style values for internal consistency.
    pub fn validate(&self) -> Result<()> {
        if self.font.family.trim().is_empty() {
            return Err(TufteError::Config {
                message: "font.family must not be empty".to_string(),
            });
        }
        for (name, value) in [
            ("font.label_size", self.font.label_size),
            ("font.axis_size", self.font.axis_size),
            ("font.title_size", self.font.title_size),
            ("font.legend_size", self.font.legend_size),
            ("figure.width_in", self.figure.width_in),
            ("figure.height_in", self.figure.height_in),
            ("figure.dpi", self.figure.dpi),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(TufteError::Config {
                    message: format!("{} must be positive, got {}", name, value),
                });
            }
        }
        if self.grid.major_width < 0.0 || self.grid.minor_width < 0.0 {
            return Err(TufteError::Config {
                message: "grid line widths must not be negative".to_string(),
            });
        }
        Ok(())
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            font: FontConfig::default(),
            grid: GridConfig::default(),
            figure: FigureConfig::default(),
            axis_line_width: default_axis_line_width(),
        }
    }
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            family: default_font_family(),
            label_size: default_font_size(),
            axis_size: default_font_size(),
            title_size: default_title_size(),
            legend_size: default_font_size(),
        }
    }
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            major: default_true(),
            minor: default_true(),
            major_width: default_major_width(),
            minor_width: default_minor_width(),
        }
    }
}

impl Default for FigureConfig {
    fn default() -> Self {
        Self {
            width_in: default_width_in(),
            height_in: default_height_in(),
            dpi: default_dpi(),
            margin_px: default_margin_px(),
            x_label_area_px: default_x_label_area_px(),
            y_label_area_px: default_y_label_area_px(),
        }
    }
}

fn default_axis_line_width() -> f64 {
    1.0
}

fn default_font_family() -> String {
    "serif".to_string()
}

fn default_font_size() -> f64 {
    9.0
}

fn default_title_size() -> f64 {
    10.0
}

fn default_true() -> bool {
    true
}

fn default_major_width() -> f64 {
    0.75
}

fn default_minor_width() -> f64 {
    0.25
}

fn default_width_in() -> f64 {
    6.0
}

fn default_height_in() -> f64 {
    4.0
}

fn default_dpi() -> f64 {
    100.0
}

fn default_margin_px() -> u32 {
    10
}

fn default_x_label_area_px() -> u32 {
    40
}

fn default_y_label_area_px() -> u32 {
    55
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_theme_is_valid() {
        assert!(Theme::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let theme: Theme = serde_json::from_str(r#"{"font": {"family": "sans-serif"}}"#).unwrap();
        assert_eq!(theme.font.family, "sans-serif");
        assert_eq!(theme.font.label_size, 9.0);
        assert_eq!(theme.figure.dpi, 100.0);
        assert!(theme.grid.major);
    }

    #[test]
    fn test_grid_alphas_follow_toggles() {
        let mut theme = Theme::default();
        assert!(theme.major_grid_alpha() > 0.0);
        theme.grid.major = false;
        theme.grid.minor = false;
        assert_eq!(theme.major_grid_alpha(), 0.0);
        assert_eq!(theme.minor_grid_alpha(), 0.0);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut theme = Theme::default();
        theme.figure.dpi = 0.0;
        assert!(theme.validate().is_err());

        let mut theme = Theme::default();
        theme.font.family = "  ".to_string();
        assert!(theme.validate().is_err());
    }

    #[test]
    fn test_from_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("theme.json");
        std::fs::write(&path, r#"{"figure": {"dpi": 200.0}}"#).unwrap();
        let theme = Theme::from_json_file(&path).unwrap();
        assert_eq!(theme.figure.dpi, 200.0);
    }
}
