//! Stamp: Bulk placement of ASCII art as glyph cells.
//!
//! A stamp is parsed once from text and can be applied any number of times
//! at different origins. Placement is clipped at the atlas edges; the
//! returned [`StampReport`] says how much was clipped so callers can decide
//! whether a partial placement matters.
//!
//! Every write goes through [`AtlasBuffer::set_glyph`] or
//! [`AtlasBuffer::clear`].

use crate::buffer::{is_visible_ascii, AtlasBuffer, Rgb};
use crate::error::Result;
use crate::layout::Rect;
use tracing::trace;
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// What to do with space characters in the art.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SpacePolicy {
    /// Leave the underlying cell untouched.
    #[default]
    Transparent,
    /// Clear the underlying cell.
    Clear,
    /// Write a space glyph (alpha 32).
    Glyph,
}

/// One column of a parsed stamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StampCell {
    /// A visible ASCII character other than space.
    Glyph(char),
    /// A space.
    Space,
    /// Anything that cannot be stored (tab, control, non-ASCII).
    Rejected,
    /// Trailing column of a wide grapheme.
    Continuation,
}

/// Counts from one stamp placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StampReport {
    /// Glyph cells written.
    pub written: usize,
    /// Cells cleared because of [`SpacePolicy::Clear`].
    pub cleared: usize,
    /// Stamp columns that fell outside the atlas.
    pub clipped: usize,
    /// Graphemes skipped because they are not visible ASCII.
    pub rejected: usize,
}

impl StampReport {
    /// Whether any part of the stamp was clipped at the atlas edge.
    #[inline]
    pub const fn is_clipped(&self) -> bool {
        self.clipped > 0
    }
}

/// A rectangular block of ASCII art.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Stamp {
    rows: Vec<Vec<StampCell>>,
    width: usize,
}

impl Stamp {
    /// Parse text into a stamp.
    ///
    /// Lines end at `\n` or `\r\n`. Each extended grapheme cluster occupies
    /// its display width in columns (at least one), so art containing wide
    /// characters keeps the alignment it has in a text editor.
    pub fn parse(text: &str) -> Self {
        let rows: Vec<Vec<StampCell>> = text
            .lines()
            .map(|line| {
                let mut row = Vec::with_capacity(line.len());
                for grapheme in line.graphemes(true) {
                    let width = grapheme.width().max(1);
                    row.push(classify(grapheme));
                    row.extend(std::iter::repeat(StampCell::Continuation).take(width - 1));
                }
                row
            })
            .collect();
        let width = rows.iter().map(Vec::len).max().unwrap_or(0);
        Self { rows, width }
    }

    /// Width in columns (the longest line).
    #[inline]
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Height in rows.
    #[inline]
    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// Check whether the stamp has no content.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width == 0
    }

    /// Place the stamp with its top-left corner at `(origin_x, origin_y)`.
    ///
    /// The origin may be negative or past the atlas; whatever falls outside
    /// is counted in [`StampReport::clipped`] and otherwise ignored.
    ///
    /// # Errors
    ///
    /// Only propagates errors from the atlas write path, which cannot occur
    /// for in-bounds visible ASCII.
    pub fn apply(
        &self,
        atlas: &mut AtlasBuffer,
        origin_x: i32,
        origin_y: i32,
        color: Rgb,
        spaces: SpacePolicy,
    ) -> Result<StampReport> {
        let bounds = Rect::from_size(atlas.width(), atlas.height());
        let mut report = StampReport::default();

        for (dy, row) in self.rows.iter().enumerate() {
            let y = offset(origin_y, dy);
            for (dx, cell) in row.iter().enumerate() {
                let x = offset(origin_x, dx);
                let in_bounds = matches!(
                    (u16::try_from(x), u16::try_from(y)),
                    (Ok(cx), Ok(cy)) if bounds.contains(cx, cy)
                );

                match (*cell, spaces) {
                    (StampCell::Continuation, _) | (StampCell::Space, SpacePolicy::Transparent) => {}
                    (StampCell::Rejected, _) => report.rejected += 1,
                    _ if !in_bounds => report.clipped += 1,
                    (StampCell::Glyph(c), _) => {
                        atlas.set_glyph(x, y, c, color)?;
                        report.written += 1;
                    }
                    (StampCell::Space, SpacePolicy::Glyph) => {
                        atlas.set_glyph(x, y, ' ', color)?;
                        report.written += 1;
                    }
                    (StampCell::Space, SpacePolicy::Clear) => {
                        atlas.clear(x, y)?;
                        report.cleared += 1;
                    }
                }
            }
        }

        trace!(
            origin_x,
            origin_y,
            written = report.written,
            cleared = report.cleared,
            clipped = report.clipped,
            rejected = report.rejected,
            "applied stamp"
        );
        Ok(report)
    }
}

fn classify(grapheme: &str) -> StampCell {
    let mut chars = grapheme.chars();
    match (chars.next(), chars.next()) {
        (Some(' '), None) => StampCell::Space,
        (Some(c), None) if is_visible_ascii(c) => StampCell::Glyph(c),
        _ => StampCell::Rejected,
    }
}

/// Stamp offsets saturate instead of wrapping; anything that large is out of
/// bounds either way.
fn offset(origin: i32, delta: usize) -> i32 {
    i32::try_from(delta).map_or(i32::MAX, |d| origin.saturating_add(d))
}
