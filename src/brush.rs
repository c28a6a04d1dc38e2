//! Brush: Explicit editor state for painting an atlas.
//!
//! The current tool, color and glyph live here and are passed to each
//! paint call; the atlas itself holds no editor state.

use crate::buffer::{check_glyph, is_visible_ascii, AtlasBuffer, Rgb};
use crate::error::{AtlasError, Result};
use std::fmt::Write;

/// What a primary paint action writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tool {
    /// Solid pixels (`A = 1`).
    #[default]
    Pencil,
    /// Glyph cells using the brush's glyph.
    Text,
}

impl Tool {
    /// Lowercase name for status display.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Pencil => "pencil",
            Self::Text => "text",
        }
    }
}

/// Current tool, color and glyph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Brush {
    /// Active tool.
    pub tool: Tool,
    /// Paint color.
    pub color: Rgb,
    glyph: char,
}

impl Default for Brush {
    fn default() -> Self {
        Self {
            tool: Tool::Pencil,
            color: Rgb::GREEN,
            glyph: 'A',
        }
    }
}

impl Brush {
    /// Create a brush.
    ///
    /// # Errors
    ///
    /// Returns [`AtlasError::NonVisibleCharacter`] if `glyph` cannot be stored.
    pub fn new(tool: Tool, color: Rgb, glyph: char) -> Result<Self> {
        Ok(Self {
            tool,
            color,
            glyph: check_glyph(glyph)?,
        })
    }

    /// The glyph used by [`Tool::Text`].
    #[inline]
    pub const fn glyph(&self) -> char {
        self.glyph
    }

    /// Update the glyph from a key press.
    ///
    /// Returns `false` and keeps the current glyph for anything that is not
    /// visible ASCII.
    pub fn set_glyph_from_key(&mut self, c: char) -> bool {
        if is_visible_ascii(c) {
            self.glyph = c;
            true
        } else {
            false
        }
    }

    /// Update the glyph from pasted text, taking its first visible ASCII
    /// character.
    ///
    /// # Errors
    ///
    /// Returns [`AtlasError::NonVisibleCharacter`] carrying the first
    /// character of `text` (or `'\0'` for empty text) when nothing usable
    /// is found. The glyph is unchanged in that case.
    pub fn set_glyph_from_text(&mut self, text: &str) -> Result<char> {
        let c = text
            .chars()
            .find(|&c| is_visible_ascii(c))
            .ok_or_else(|| AtlasError::NonVisibleCharacter(text.chars().next().unwrap_or('\0')))?;
        self.glyph = c;
        Ok(c)
    }

    /// Apply the primary action at (x, y).
    ///
    /// # Errors
    ///
    /// Returns [`AtlasError::OutOfBounds`] outside the grid.
    pub fn paint(&self, atlas: &mut AtlasBuffer, x: i32, y: i32) -> Result<()> {
        match self.tool {
            Tool::Pencil => atlas.set_solid(x, y, self.color),
            Tool::Text => atlas.set_glyph(x, y, self.glyph, self.color),
        }
    }

    /// Clear the cell at (x, y).
    ///
    /// # Errors
    ///
    /// Returns [`AtlasError::OutOfBounds`] outside the grid.
    pub fn erase(&self, atlas: &mut AtlasBuffer, x: i32, y: i32) -> Result<()> {
        atlas.clear(x, y)
    }
}

/// One-line summary of the editor state, optionally with the hovered cell.
pub fn status_line(atlas: &AtlasBuffer, brush: &Brush, hover: Option<(i32, i32)>) -> String {
    let mut line = format!(
        "Mode: {} | Color: {} | char='{}' (alpha={}) | Size: {}x{}",
        brush.tool.name(),
        brush.color,
        brush.glyph,
        u32::from(brush.glyph),
        atlas.width(),
        atlas.height(),
    );
    if let Some((x, y)) = hover {
        if let Some(cell) = atlas.get(x, y) {
            let _ = write!(
                line,
                " | cell=({x},{y}) | RGBA=({},{},{},{})",
                cell.r, cell.g, cell.b, cell.a
            );
        }
    }
    line
}
