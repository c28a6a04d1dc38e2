//! Buffer module: The atlas format core.
//!
//! This module contains:
//! - [`Cell`]: One `(R, G, B, A)` quadruple
//! - [`CellKind`]: Alpha-channel dispatch (clear, solid, glyph, invalid)
//! - [`AtlasBuffer`]: The grid, with decode/encode, mutation and validation
//! - [`io`]: Whole-file load and save

mod atlas;
mod cell;
pub mod io;

pub use atlas::{byte_len, check_glyph, AtlasBuffer, KindCounts, ValidationReport, BYTES_PER_CELL};
pub use cell::{
    alpha_from_unorm, is_visible_ascii, Cell, CellKind, ParseRgbError, Rgb, ALPHA_CLEAR,
    ALPHA_SOLID, GLYPH_MAX, GLYPH_MIN,
};
