//! Error types for the tufte figure toolkit.
//!
//! This module defines a single error enum covering every failure mode in
//! the crate, from invalid tick patterns to undecodable image files.

use thiserror::Error;

/// The main error type for tufte operations.
#[derive(Error, Debug)]
pub enum TufteError {
    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Image decode/encode errors
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid parameter errors
    #[error("Invalid parameter: {param} - {message}")]
    InvalidParameter { param: String, message: String },

    /// Configuration errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// An operation received an empty data collection
    #[error("Empty input: {message}")]
    EmptyInput { message: String },

    /// Autocrop found no opaque pixels to crop to
    #[error("Image is fully transparent, no content to crop: {path}")]
    EmptyImage { path: String },

    /// Mesh construction or filtering errors
    #[error("Mesh error: {message}")]
    Mesh { message: String },

    /// Figure or payload rendering errors
    #[error("Render error: {message}")]
    Render { message: String },
}

/// Convenience type alias for Results with TufteError
pub type Result<T> = std::result::Result<T, TufteError>;
