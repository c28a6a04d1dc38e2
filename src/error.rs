//! Error types for atlas construction, decoding and mutation.
//!
//! Content invalidity (a stored alpha outside the defined kinds) is not an
//! error: it is a data state reported by [`AtlasBuffer::validate`].
//!
//! [`AtlasBuffer::validate`]: crate::AtlasBuffer::validate

use thiserror::Error;

/// Errors reported by the atlas core and its collaborators.
#[derive(Debug, Error)]
pub enum AtlasError {
    /// Width or height was zero.
    #[error("invalid dimensions {width}x{height}: both must be at least 1")]
    InvalidDimensions {
        /// Requested width.
        width: u32,
        /// Requested height.
        height: u32,
    },

    /// Raw data length does not match `width * height * 4`.
    #[error("size mismatch: expected {expected} bytes, got {actual}; use the correct width/height")]
    SizeMismatch {
        /// Byte count implied by the dimensions.
        expected: u64,
        /// Byte count actually supplied.
        actual: u64,
    },

    /// Coordinate outside `[0, width) x [0, height)`.
    #[error("cell ({x}, {y}) is outside the {width}x{height} atlas")]
    OutOfBounds {
        /// Requested column.
        x: i32,
        /// Requested row.
        y: i32,
        /// Atlas width.
        width: u16,
        /// Atlas height.
        height: u16,
    },

    /// Glyph character outside visible ASCII (32..=126).
    #[error("character {0:?} is not visible ASCII (32..126)")]
    NonVisibleCharacter(char),

    /// Dimensions exceed a configured sanity ceiling.
    #[error("dimensions {width}x{height} exceed the limit of {max}")]
    DimensionLimit {
        /// Requested width.
        width: u32,
        /// Requested height.
        height: u32,
        /// Configured ceiling for either side.
        max: u32,
    },

    /// Underlying file I/O failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias for atlas operations.
pub type Result<T> = std::result::Result<T, AtlasError>;
