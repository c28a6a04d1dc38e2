//! `AtlasBuffer`: A fixed-size grid of RGBA cells.
//!
//! The buffer owns one contiguous byte arena in the exact on-disk layout,
//! so encoding is a borrow and decoding is a length check plus a move.
//! Cells are stored in row-major order: the bytes of `(x, y)` start at
//! `(y * width + x) * 4`.

use super::cell::{is_visible_ascii, Cell, CellKind, Rgb};
use crate::error::{AtlasError, Result};
use tracing::{debug, warn};

/// Bytes per cell.
pub const BYTES_PER_CELL: usize = 4;

/// A grid of `width * height` four-byte cells.
///
/// All writes go through [`set_solid`](Self::set_solid),
/// [`set_glyph`](Self::set_glyph) and [`clear`](Self::clear); there is no
/// mutable access to the raw bytes, so the length invariant and the
/// write-path glyph check hold everywhere.
#[derive(Clone, PartialEq, Eq)]
pub struct AtlasBuffer {
    /// Raw RGBA bytes, row-major.
    data: Vec<u8>,
    /// Width in cells.
    width: u16,
    /// Height in cells.
    height: u16,
}

/// Per-kind cell totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct KindCounts {
    /// Cells with `A == 0`.
    pub clear: usize,
    /// Cells with `A == 1`.
    pub solid: usize,
    /// Cells with `32 <= A <= 126`.
    pub glyph: usize,
    /// All other cells.
    pub invalid: usize,
}

/// Result of content validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationReport {
    /// Cells whose kind is not `Invalid`.
    pub valid: usize,
    /// Total cell count.
    pub total: usize,
}

impl ValidationReport {
    /// Number of invalid cells.
    #[inline]
    pub const fn invalid(&self) -> usize {
        self.total - self.valid
    }

    /// Whether every cell is content-valid.
    #[inline]
    pub const fn is_valid(&self) -> bool {
        self.valid == self.total
    }

    /// Share of valid cells, in percent.
    #[allow(clippy::cast_precision_loss)]
    pub fn percent(&self) -> f64 {
        if self.total == 0 {
            return 100.0;
        }
        100.0 * self.valid as f64 / self.total as f64
    }
}

impl std::fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Valid cells: {}/{} ({:.2}%)", self.valid, self.total, self.percent())
    }
}

/// Byte length of a `width x height` atlas.
#[inline]
pub const fn byte_len(width: u16, height: u16) -> usize {
    (width as usize) * (height as usize) * BYTES_PER_CELL
}

impl AtlasBuffer {
    /// Create an all-clear atlas.
    ///
    /// # Errors
    ///
    /// Returns [`AtlasError::InvalidDimensions`] if either side is zero.
    pub fn new(width: u16, height: u16) -> Result<Self> {
        check_dimensions(width, height)?;
        debug!(width, height, "creating atlas");
        Ok(Self {
            data: vec![0; byte_len(width, height)],
            width,
            height,
        })
    }

    /// Decode raw RGBA bytes against out-of-band dimensions.
    ///
    /// Only the length is checked. Cells with undefined alpha values are
    /// kept verbatim as [`CellKind::Invalid`] so damaged files stay
    /// inspectable.
    ///
    /// # Errors
    ///
    /// Returns [`AtlasError::InvalidDimensions`] for a zero side and
    /// [`AtlasError::SizeMismatch`] when `data.len() != width * height * 4`.
    pub fn from_raw(data: Vec<u8>, width: u16, height: u16) -> Result<Self> {
        check_dimensions(width, height)?;
        let expected = byte_len(width, height);
        if data.len() != expected {
            return Err(AtlasError::SizeMismatch {
                expected: expected as u64,
                actual: data.len() as u64,
            });
        }

        let buffer = Self { data, width, height };
        debug!(width, height, bytes = expected, "decoded atlas");
        let report = buffer.validate();
        if !report.is_valid() {
            warn!(invalid = report.invalid(), total = report.total, "atlas contains invalid cells");
        }
        Ok(buffer)
    }

    /// Decode from a borrowed slice. See [`from_raw`](Self::from_raw).
    ///
    /// # Errors
    ///
    /// Same as [`from_raw`](Self::from_raw).
    pub fn from_slice(data: &[u8], width: u16, height: u16) -> Result<Self> {
        check_dimensions(width, height)?;
        let expected = byte_len(width, height);
        if data.len() != expected {
            return Err(AtlasError::SizeMismatch {
                expected: expected as u64,
                actual: data.len() as u64,
            });
        }
        Self::from_raw(data.to_vec(), width, height)
    }

    /// Encode to raw bytes. Never fails; invalid cells are written verbatim.
    pub fn to_raw(&self) -> Vec<u8> {
        self.data.clone()
    }

    /// The encoded form, without copying.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Consume the atlas, returning its encoded bytes.
    #[inline]
    pub fn into_raw(self) -> Vec<u8> {
        self.data
    }

    /// Width in cells.
    #[inline]
    pub const fn width(&self) -> u16 {
        self.width
    }

    /// Height in cells.
    #[inline]
    pub const fn height(&self) -> u16 {
        self.height
    }

    /// Total number of cells.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len() / BYTES_PER_CELL
    }

    /// Always false after construction.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Convert (x, y) to a cell index.
    ///
    /// Returns `None` if the coordinate is out of bounds.
    #[inline]
    pub fn index_of(&self, x: i32, y: i32) -> Option<usize> {
        let x = u16::try_from(x).ok()?;
        let y = u16::try_from(y).ok()?;
        if x < self.width && y < self.height {
            Some((y as usize) * (self.width as usize) + (x as usize))
        } else {
            None
        }
    }

    /// Read the cell at (x, y).
    #[inline]
    pub fn get(&self, x: i32, y: i32) -> Option<Cell> {
        self.index_of(x, y).map(|i| self.cell_at(i))
    }

    /// Read the cell at (x, y).
    ///
    /// # Errors
    ///
    /// Returns [`AtlasError::OutOfBounds`] outside the grid.
    pub fn cell(&self, x: i32, y: i32) -> Result<Cell> {
        let idx = self.checked_index(x, y)?;
        Ok(self.cell_at(idx))
    }

    /// Classify the cell at (x, y) by its alpha byte.
    ///
    /// # Errors
    ///
    /// Returns [`AtlasError::OutOfBounds`] outside the grid.
    pub fn kind_of(&self, x: i32, y: i32) -> Result<CellKind> {
        self.cell(x, y).map(Cell::kind)
    }

    /// Write a solid pixel `(r, g, b, 1)`.
    ///
    /// # Errors
    ///
    /// Returns [`AtlasError::OutOfBounds`] outside the grid.
    pub fn set_solid(&mut self, x: i32, y: i32, rgb: Rgb) -> Result<()> {
        let idx = self.checked_index(x, y)?;
        self.write(idx, Cell::solid(rgb));
        Ok(())
    }

    /// Write a glyph `(r, g, b, ord(c))`.
    ///
    /// The buffer is left untouched on any error.
    ///
    /// # Errors
    ///
    /// Returns [`AtlasError::OutOfBounds`] outside the grid, and
    /// [`AtlasError::NonVisibleCharacter`] if `c` is not in `' '..='~'`.
    pub fn set_glyph(&mut self, x: i32, y: i32, c: char, rgb: Rgb) -> Result<()> {
        let idx = self.checked_index(x, y)?;
        let cell = Cell::glyph(c, rgb).ok_or(AtlasError::NonVisibleCharacter(c))?;
        self.write(idx, cell);
        Ok(())
    }

    /// Reset the cell to `(0, 0, 0, 0)`.
    ///
    /// # Errors
    ///
    /// Returns [`AtlasError::OutOfBounds`] outside the grid.
    pub fn clear(&mut self, x: i32, y: i32) -> Result<()> {
        let idx = self.checked_index(x, y)?;
        self.write(idx, Cell::CLEAR);
        Ok(())
    }

    /// Count valid cells against the total. Never mutates.
    pub fn validate(&self) -> ValidationReport {
        let valid = self
            .data
            .chunks_exact(BYTES_PER_CELL)
            .filter(|px| CellKind::from_alpha(px[3]).is_valid())
            .count();
        ValidationReport {
            valid,
            total: self.len(),
        }
    }

    /// Coordinates of every invalid cell, in row-major order.
    pub fn invalid_cells(&self) -> impl Iterator<Item = (u16, u16)> + '_ {
        self.cells()
            .filter(|(_, cell)| !cell.kind().is_valid())
            .map(|(pos, _)| pos)
    }

    /// Totals per kind.
    pub fn kind_counts(&self) -> KindCounts {
        let mut counts = KindCounts::default();
        for px in self.data.chunks_exact(BYTES_PER_CELL) {
            match CellKind::from_alpha(px[3]) {
                CellKind::Clear => counts.clear += 1,
                CellKind::Solid => counts.solid += 1,
                CellKind::Glyph(_) => counts.glyph += 1,
                CellKind::Invalid => counts.invalid += 1,
            }
        }
        counts
    }

    /// Iterate over all cells with their coordinates, row-major.
    pub fn cells(&self) -> impl Iterator<Item = ((u16, u16), Cell)> + '_ {
        let width = self.width as usize;
        self.data
            .chunks_exact(BYTES_PER_CELL)
            .enumerate()
            .map(move |(i, px)| {
                #[allow(clippy::cast_possible_truncation)]
                let pos = ((i % width) as u16, (i / width) as u16);
                (pos, Cell::new(px[0], px[1], px[2], px[3]))
            })
    }

    fn checked_index(&self, x: i32, y: i32) -> Result<usize> {
        self.index_of(x, y).ok_or(AtlasError::OutOfBounds {
            x,
            y,
            width: self.width,
            height: self.height,
        })
    }

    #[inline]
    fn cell_at(&self, idx: usize) -> Cell {
        let base = idx * BYTES_PER_CELL;
        let px = &self.data[base..base + BYTES_PER_CELL];
        Cell::new(px[0], px[1], px[2], px[3])
    }

    #[inline]
    fn write(&mut self, idx: usize, cell: Cell) {
        let base = idx * BYTES_PER_CELL;
        self.data[base..base + BYTES_PER_CELL].copy_from_slice(&cell.to_bytes());
    }
}

fn check_dimensions(width: u16, height: u16) -> Result<()> {
    if width == 0 || height == 0 {
        return Err(AtlasError::InvalidDimensions {
            width: u32::from(width),
            height: u32::from(height),
        });
    }
    Ok(())
}

/// Check a character for the glyph write path without touching a buffer.
///
/// # Errors
///
/// Returns [`AtlasError::NonVisibleCharacter`] for anything outside `' '..='~'`.
pub fn check_glyph(c: char) -> Result<char> {
    if is_visible_ascii(c) {
        Ok(c)
    } else {
        Err(AtlasError::NonVisibleCharacter(c))
    }
}

impl std::fmt::Debug for AtlasBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AtlasBuffer")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("bytes", &self.data.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> AtlasBuffer {
        // 2x2 with alphas [0, 1, 32, 200]
        let data = vec![
            0, 0, 0, 0, //
            9, 8, 7, 1, //
            1, 2, 3, 32, //
            4, 5, 6, 200,
        ];
        AtlasBuffer::from_raw(data, 2, 2).unwrap()
    }

    #[test]
    fn test_atlas_new() {
        let atlas = AtlasBuffer::new(32, 16).unwrap();
        assert_eq!(atlas.width(), 32);
        assert_eq!(atlas.height(), 16);
        assert_eq!(atlas.len(), 32 * 16);
        assert_eq!(atlas.as_bytes().len(), 32 * 16 * 4);
        assert!(atlas.as_bytes().iter().all(|&b| b == 0));
        assert_eq!(atlas.kind_of(31, 15).unwrap(), CellKind::Clear);
    }

    #[test]
    fn test_atlas_zero_dimensions() {
        assert!(matches!(
            AtlasBuffer::new(0, 16),
            Err(AtlasError::InvalidDimensions { width: 0, height: 16 })
        ));
        assert!(matches!(
            AtlasBuffer::new(16, 0),
            Err(AtlasError::InvalidDimensions { .. })
        ));
        assert!(matches!(
            AtlasBuffer::from_raw(Vec::new(), 0, 0),
            Err(AtlasError::InvalidDimensions { .. })
        ));
    }

    #[test]
    fn test_atlas_decode_layout() {
        let atlas = sample();
        assert_eq!(atlas.cell(0, 0).unwrap(), Cell::new(0, 0, 0, 0));
        assert_eq!(atlas.cell(1, 0).unwrap(), Cell::new(9, 8, 7, 1));
        assert_eq!(atlas.cell(0, 1).unwrap(), Cell::new(1, 2, 3, 32));
        assert_eq!(atlas.cell(1, 1).unwrap(), Cell::new(4, 5, 6, 200));
    }

    #[test]
    fn test_atlas_decode_size_mismatch() {
        for (w, h) in [(1u16, 1u16), (2, 3), (7, 5)] {
            let expected = byte_len(w, h);
            for actual in [0, expected - 1, expected + 1, expected * 2] {
                let err = AtlasBuffer::from_raw(vec![0; actual], w, h).unwrap_err();
                match err {
                    AtlasError::SizeMismatch { expected: e, actual: a } => {
                        assert_eq!(e, expected as u64);
                        assert_eq!(a, actual as u64);
                    }
                    other => panic!("unexpected error: {other:?}"),
                }
            }
        }
        assert!(AtlasBuffer::from_slice(&[0; 7], 1, 2).is_err());
    }

    #[test]
    fn test_atlas_round_trip() {
        let data: Vec<u8> = (0..=255u8).cycle().take(byte_len(5, 3)).collect();
        let atlas = AtlasBuffer::from_slice(&data, 5, 3).unwrap();
        assert_eq!(atlas.to_raw(), data);

        let again = AtlasBuffer::from_raw(atlas.to_raw(), 5, 3).unwrap();
        assert_eq!(again, atlas);
        assert_eq!(again.into_raw(), data);
    }

    #[test]
    fn test_atlas_validate_counts() {
        let report = sample().validate();
        assert_eq!(report, ValidationReport { valid: 3, total: 4 });
        assert_eq!(report.invalid(), 1);
        assert!(!report.is_valid());
        assert_eq!(report.to_string(), "Valid cells: 3/4 (75.00%)");
    }

    #[test]
    fn test_atlas_validate_is_pure() {
        let atlas = sample();
        let before = atlas.to_raw();
        assert_eq!(atlas.validate(), atlas.validate());
        assert_eq!(atlas.to_raw(), before);
    }

    #[test]
    fn test_atlas_invalid_cells_and_counts() {
        let atlas = sample();
        assert_eq!(atlas.invalid_cells().collect::<Vec<_>>(), vec![(1, 1)]);
        assert_eq!(
            atlas.kind_counts(),
            KindCounts { clear: 1, solid: 1, glyph: 1, invalid: 1 }
        );
    }

    #[test]
    fn test_atlas_set_solid() {
        let mut atlas = sample();
        atlas.set_solid(1, 1, Rgb::new(10, 20, 30)).unwrap();
        assert_eq!(atlas.kind_of(1, 1).unwrap(), CellKind::Solid);
        assert_eq!(atlas.cell(1, 1).unwrap().rgb(), Rgb::new(10, 20, 30));
        assert!(atlas.validate().is_valid());
    }

    #[test]
    fn test_atlas_set_glyph_rejects_and_preserves() {
        let mut atlas = sample();
        let before = atlas.to_raw();
        for c in ['€', '\u{1f}', '\u{7f}', '\n', 'é'] {
            let err = atlas.set_glyph(1, 0, c, Rgb::WHITE).unwrap_err();
            assert!(matches!(err, AtlasError::NonVisibleCharacter(got) if got == c));
        }
        assert_eq!(atlas.to_raw(), before);

        atlas.set_glyph(1, 0, '~', Rgb::new(1, 1, 1)).unwrap();
        assert_eq!(atlas.kind_of(1, 0).unwrap(), CellKind::Glyph('~'));
    }

    #[test]
    fn test_atlas_clear_idempotent() {
        let mut atlas = sample();
        atlas.clear(1, 1).unwrap();
        let once = atlas.to_raw();
        atlas.clear(1, 1).unwrap();
        assert_eq!(atlas.to_raw(), once);
        assert_eq!(atlas.cell(1, 1).unwrap(), Cell::CLEAR);
        assert_eq!(atlas.kind_of(1, 1).unwrap(), CellKind::Clear);
    }

    #[test]
    fn test_atlas_out_of_bounds() {
        let mut atlas = AtlasBuffer::new(3, 2).unwrap();
        let before = atlas.to_raw();

        assert!(matches!(
            atlas.set_solid(-1, 0, Rgb::RED),
            Err(AtlasError::OutOfBounds { x: -1, y: 0, width: 3, height: 2 })
        ));
        assert!(atlas.set_solid(3, 0, Rgb::RED).is_err());
        assert!(atlas.set_glyph(0, -5, 'A', Rgb::RED).is_err());
        assert!(atlas.clear(0, 2).is_err());
        assert!(atlas.kind_of(i32::MAX, 0).is_err());
        assert!(atlas.get(0, 2).is_none());
        assert_eq!(atlas.to_raw(), before);
    }

    #[test]
    fn test_atlas_out_of_bounds_checked_before_glyph() {
        let mut atlas = AtlasBuffer::new(1, 1).unwrap();
        assert!(matches!(
            atlas.set_glyph(5, 5, '\t', Rgb::WHITE),
            Err(AtlasError::OutOfBounds { .. })
        ));
    }

    #[test]
    fn test_atlas_end_to_end_bytes() {
        let mut atlas = AtlasBuffer::new(2, 1).unwrap();
        atlas.set_glyph(0, 0, 'A', Rgb::new(10, 20, 30)).unwrap();
        atlas.set_solid(1, 0, Rgb::new(1, 2, 3)).unwrap();
        assert_eq!(atlas.to_raw(), vec![10, 20, 30, 65, 1, 2, 3, 1]);
    }

    #[test]
    fn test_atlas_index_coords() {
        let atlas = AtlasBuffer::new(80, 24).unwrap();
        assert_eq!(atlas.index_of(5, 10), Some(10 * 80 + 5));
        assert_eq!(atlas.index_of(79, 23), Some(80 * 24 - 1));
        assert_eq!(atlas.index_of(80, 0), None);
        assert_eq!(atlas.index_of(0, -1), None);
    }

    #[test]
    fn test_atlas_iterators() {
        let atlas = sample();
        let cells: Vec<_> = atlas.cells().collect();
        assert_eq!(cells.len(), 4);
        assert_eq!(cells[2], ((0, 1), Cell::new(1, 2, 3, 32)));
    }

    #[test]
    fn test_check_glyph() {
        assert_eq!(check_glyph('a').unwrap(), 'a');
        assert!(check_glyph('\u{0}').is_err());
    }
}
