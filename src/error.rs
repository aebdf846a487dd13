//! # Error standards
//!
//! This module provides a standardised error enum and result type for this crate.

// -----------------------------------------------------------------------------------------------
// TYPES
// -----------------------------------------------------------------------------------------------

/// Standard result type used in the disparity crate.
pub type Result<T> = std::result::Result<T, Error>;

// -----------------------------------------------------------------------------------------------
// ENUMERATIONS
// -----------------------------------------------------------------------------------------------

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Correlation window size must be odd and at least 1, got {0}")]
    InvalidWindowSize(usize),

    #[error("Correlation window size {size} exceeds the maximum of {max}")]
    WindowTooLarge {
        size: usize,
        max: usize
    },

    #[error("Maximum search distance {0} does not fit in a disparity value")]
    SearchDistanceTooLarge(usize),

    #[error("Stereo images differ in size: left is {left:?}, right is {right:?}")]
    DimensionMismatch {
        left: (usize, usize),
        right: (usize, usize)
    },

    #[error("Pixel buffer holds {actual} samples but a {width}x{height} image needs {expected}")]
    BufferSize {
        width: usize,
        height: usize,
        expected: usize,
        actual: usize
    },

    #[error("Disparity sweep cancelled after {rows_done} of {rows_total} rows")]
    Cancelled {
        rows_done: usize,
        rows_total: usize
    },

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Could not parse parameters: {0}")]
    Params(#[from] toml::de::Error)
}
