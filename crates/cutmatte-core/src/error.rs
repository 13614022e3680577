//! Error types for cutmatte-core
//!
//! Provides a unified error type for buffer construction and parameter
//! validation. Every other crate in the workspace wraps this type in its
//! own error enum through `#[from]`.

use thiserror::Error;

/// cutmatte error type
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Invalid image dimensions (the buffer would not fit in memory)
    #[error("invalid image dimensions: {width}x{height}")]
    InvalidDimension { width: u32, height: u32 },

    /// Pixel buffer length does not match `width * height * 4`
    #[error("buffer size mismatch: expected {expected} bytes, got {actual}")]
    BufferSizeMismatch { expected: usize, actual: usize },

    /// Coordinates outside the raster
    #[error("pixel ({x}, {y}) out of bounds for {width}x{height} raster")]
    OutOfBounds {
        x: u32,
        y: u32,
        width: u32,
        height: u32,
    },

    /// Image with zero width or height
    #[error("empty image: {width}x{height}")]
    EmptyImage { width: u32, height: u32 },

    /// Pipeline parameter outside its valid range
    #[error("parameter {name} = {value} out of range [{min}, {max}]")]
    ParameterOutOfRange {
        name: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    /// Invalid parameter value
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
}

/// Result type alias for cutmatte operations
pub type Result<T> = std::result::Result<T, Error>;
