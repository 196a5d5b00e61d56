//! # tufte
//!
//! A publication-quality figure toolkit.
//!
//! This library carries the machinery behind a set of figure scripts:
//! padded axis bounds and tick formatting for vector plots, the
//! vector/raster figure-split protocol that keeps dense payloads out of
//! document-format files, matplotlib-style colormaps, a small CPU mesh
//! renderer for 3D section figures, and a transparent-margin autocrop
//! for rendered screenshots.
//!
//! ## Key Features
//!
//! - **Padded bounds**: axis and color ranges derived from data with
//!   additive (linear-scale) or multiplicative (log-scale) padding
//! - **Figure cloning**: capture a vector figure's drawable geometry and
//!   replay it on a high-density raster canvas so the two exported
//!   layers align pixel-for-pixel
//! - **Mesh sections**: threshold, clip, and slice triangle meshes, then
//!   render them with replayable camera poses
//! - **Autocrop**: trim transparent borders from screenshot PNGs and
//!   re-pad by a fixed margin
//!
//! ## Architecture
//!
//! - **Vector layer**: charts are built directly with `plotters`; this
//!   crate supplies the bounds, ticks, theme values, and the geometry
//!   snapshot taken from the finished chart
//! - **Raster layer**: payloads (dense scatter, fields, mesh renders)
//!   rasterize through the `image` crate with colormaps from `colorgrad`
//! - **Postprocessing**: exported rasters pass through autocrop before
//!   they are handed to the document tool that composites the layers

pub mod autocrop;
pub mod bounds;
pub mod colormaps;
pub mod config;
pub mod error;
pub mod geometry;
pub mod logging;
pub mod mesh;
pub mod raster;
pub mod ticks;

pub use autocrop::{autocrop, autocrop_file, content_bbox};
pub use bounds::{linspace, logspace, Bound};
pub use colormaps::Colormap;
pub use config::Theme;
pub use error::{Result, TufteError};
pub use geometry::{FigureGeometry, FigureSize};
pub use logging::{init_tracing, log_export_stats, log_timed_operation};
pub use raster::RasterCanvas;
pub use ticks::{TickFormat, TickFormatter};
