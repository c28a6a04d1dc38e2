//! Editor configuration: default dimensions and sanity ceilings.
//!
//! The atlas core accepts any non-zero `u16` dimensions. Memory is
//! proportional to `width * height * 4`, so front ends cap what they accept
//! here before creating or opening an atlas.

use crate::error::{AtlasError, Result};
use crate::preview::PreviewConfig;

/// Configuration for atlas front ends.
#[derive(Debug, Clone)]
pub struct EditorConfig {
    /// Width used when none is given.
    pub default_width: u16,
    /// Height used when none is given.
    pub default_height: u16,
    /// Largest side accepted when creating a new atlas.
    pub max_new_dimension: u16,
    /// Largest side accepted when opening an existing file.
    pub max_open_dimension: u16,
    /// Terminal preview settings.
    pub preview: PreviewConfig,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            default_width: 32,
            default_height: 16,
            max_new_dimension: 4096,
            max_open_dimension: 16384,
            preview: PreviewConfig::default(),
        }
    }
}

impl EditorConfig {
    /// Check dimensions for a new atlas.
    ///
    /// # Errors
    ///
    /// Returns [`AtlasError::InvalidDimensions`] for a zero side, or
    /// [`AtlasError::DimensionLimit`] above `max_new_dimension`.
    pub fn check_new(&self, width: u16, height: u16) -> Result<()> {
        check_limit(width, height, self.max_new_dimension)
    }

    /// Check dimensions for opening a file.
    ///
    /// # Errors
    ///
    /// Returns [`AtlasError::InvalidDimensions`] for a zero side, or
    /// [`AtlasError::DimensionLimit`] above `max_open_dimension`.
    pub fn check_open(&self, width: u16, height: u16) -> Result<()> {
        check_limit(width, height, self.max_open_dimension)
    }
}

fn check_limit(width: u16, height: u16, max: u16) -> Result<()> {
    if width == 0 || height == 0 {
        return Err(AtlasError::InvalidDimensions {
            width: width.into(),
            height: height.into(),
        });
    }
    if width > max || height > max {
        return Err(AtlasError::DimensionLimit {
            width: width.into(),
            height: height.into(),
            max: max.into(),
        });
    }
    Ok(())
}
