//! Cell: The atomic unit of an atlas.
//!
//! # Layout
//!
//! A cell is four bytes, stored and serialized in this order:
//!
//! ```text
//! ┌──────┬──────┬──────┬──────┐
//! │  R   │  G   │  B   │  A   │
//! │  u8  │  u8  │  u8  │  u8  │
//! └──────┴──────┴──────┴──────┘
//! ```
//!
//! The alpha byte is overloaded. It selects the cell's [`CellKind`]:
//!
//! | A          | Kind      | RGB meaning       |
//! |------------|-----------|-------------------|
//! | 0          | `Clear`   | ignored           |
//! | 1          | `Solid`   | opaque color      |
//! | 32..=126   | `Glyph`   | glyph color       |
//! | otherwise  | `Invalid` | undefined         |

use std::fmt;
use std::str::FromStr;

/// Alpha value of a clear (transparent) cell.
pub const ALPHA_CLEAR: u8 = 0;
/// Alpha value of a solid pixel cell.
pub const ALPHA_SOLID: u8 = 1;
/// Smallest alpha that encodes a glyph (`' '`).
pub const GLYPH_MIN: u8 = 32;
/// Largest alpha that encodes a glyph (`'~'`).
pub const GLYPH_MAX: u8 = 126;

/// True-color RGB representation.
#[repr(C)]
#[derive(Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Rgb {
    /// Red channel (0-255)
    pub r: u8,
    /// Green channel (0-255)
    pub g: u8,
    /// Blue channel (0-255)
    pub b: u8,
}

impl Rgb {
    /// Create a new RGB color.
    #[inline]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// White (255, 255, 255)
    pub const WHITE: Self = Self::new(255, 255, 255);
    /// Pure red, used for invalid-cell markers.
    pub const RED: Self = Self::new(255, 0, 0);
    /// Pure green, the default brush color.
    pub const GREEN: Self = Self::new(0, 255, 0);

    /// Create from a 24-bit hex color (e.g., 0xFF5500).
    #[inline]
    pub const fn from_u32(hex: u32) -> Self {
        Self::new(
            ((hex >> 16) & 0xFF) as u8,
            ((hex >> 8) & 0xFF) as u8,
            (hex & 0xFF) as u8,
        )
    }
}

impl fmt::Debug for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

impl From<(u8, u8, u8)> for Rgb {
    #[inline]
    fn from((r, g, b): (u8, u8, u8)) -> Self {
        Self::new(r, g, b)
    }
}

impl From<u32> for Rgb {
    /// Convert from a 24-bit hex color (e.g., 0xFF5500)
    #[inline]
    fn from(hex: u32) -> Self {
        Self::from_u32(hex)
    }
}

/// Error returned when parsing an [`Rgb`] from text fails.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("expected a color of the form #rrggbb, got {0:?}")]
pub struct ParseRgbError(String);

impl FromStr for Rgb {
    type Err = ParseRgbError;

    /// Parse `#rrggbb` or `rrggbb`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s.strip_prefix('#').unwrap_or(s);
        if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(ParseRgbError(s.to_string()));
        }
        u32::from_str_radix(hex, 16)
            .map(Self::from_u32)
            .map_err(|_| ParseRgbError(s.to_string()))
    }
}

/// Semantic classification of a cell, derived solely from its alpha byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellKind {
    /// `A == 0`: transparent, RGB ignored.
    Clear,
    /// `A == 1`: opaque pixel of the stored RGB.
    Solid,
    /// `32 <= A <= 126`: the visible ASCII character `A`, drawn in the stored RGB.
    Glyph(char),
    /// Any other alpha. Rendered as an error marker and fails validation.
    Invalid,
}

impl CellKind {
    /// Classify an alpha byte.
    ///
    /// This is the single source of truth for alpha dispatch; validation,
    /// preview and any exporter go through it.
    #[inline]
    pub const fn from_alpha(alpha: u8) -> Self {
        match alpha {
            ALPHA_CLEAR => Self::Clear,
            ALPHA_SOLID => Self::Solid,
            GLYPH_MIN..=GLYPH_MAX => Self::Glyph(alpha as char),
            _ => Self::Invalid,
        }
    }

    /// Whether this kind passes content validation.
    #[inline]
    pub const fn is_valid(self) -> bool {
        !matches!(self, Self::Invalid)
    }

    /// Short lowercase name, used by the CLI and status lines.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Clear => "clear",
            Self::Solid => "solid",
            Self::Glyph(_) => "glyph",
            Self::Invalid => "invalid",
        }
    }
}

/// Check whether `c` may be stored as a glyph.
#[inline]
pub const fn is_visible_ascii(c: char) -> bool {
    let code = c as u32;
    code >= GLYPH_MIN as u32 && code <= GLYPH_MAX as u32
}

/// Recover the exact stored alpha from a normalized float sample.
///
/// Consumers that upload the atlas as a normalized texture read alpha back
/// as `A / 255.0`; `round(v * 255)` recovers `A` exactly. Truncating instead
/// of rounding misclassifies cells.
#[inline]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn alpha_from_unorm(value: f32) -> u8 {
    (value * 255.0).round().clamp(0.0, 255.0) as u8
}

/// One `(R, G, B, A)` quadruple.
///
/// Cells are plain values: the [`AtlasBuffer`](crate::AtlasBuffer) owns the
/// bytes and hands out copies.
#[repr(C)]
#[derive(Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Cell {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha byte, interpreted by [`CellKind::from_alpha`].
    pub a: u8,
}

const _: () = assert!(std::mem::size_of::<Cell>() == 4, "Cell must be exactly 4 bytes");

impl Cell {
    /// A clear cell: all four bytes zero.
    pub const CLEAR: Self = Self::new(0, 0, 0, ALPHA_CLEAR);

    /// Create a cell from raw components.
    #[inline]
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Create a solid pixel cell.
    #[inline]
    pub const fn solid(rgb: Rgb) -> Self {
        Self::new(rgb.r, rgb.g, rgb.b, ALPHA_SOLID)
    }

    /// Create a glyph cell.
    ///
    /// Returns `None` if `c` is not visible ASCII.
    #[inline]
    #[allow(clippy::cast_possible_truncation)]
    pub const fn glyph(c: char, rgb: Rgb) -> Option<Self> {
        if is_visible_ascii(c) {
            Some(Self::new(rgb.r, rgb.g, rgb.b, c as u32 as u8))
        } else {
            None
        }
    }

    /// Serialize to `[R, G, B, A]`.
    #[inline]
    pub const fn to_bytes(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// The stored color channels.
    #[inline]
    pub const fn rgb(self) -> Rgb {
        Rgb::new(self.r, self.g, self.b)
    }

    /// Classify this cell.
    #[inline]
    pub const fn kind(self) -> CellKind {
        CellKind::from_alpha(self.a)
    }
}

impl fmt::Debug for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Cell({}, {}, {}, {}; {:?})", self.r, self.g, self.b, self.a, self.kind())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_size() {
        assert_eq!(std::mem::size_of::<Cell>(), 4);
    }

    #[test]
    fn test_rgb_from_tuple() {
        let rgb: Rgb = (255, 128, 0).into();
        assert_eq!(rgb, Rgb::new(255, 128, 0));
    }

    #[test]
    fn test_rgb_from_hex() {
        let rgb: Rgb = 0xFF8000.into();
        assert_eq!(rgb, Rgb::new(255, 128, 0));
    }

    #[test]
    fn test_rgb_parse() {
        assert_eq!("#0aff10".parse::<Rgb>(), Ok(Rgb::new(10, 255, 16)));
        assert_eq!("0AFF10".parse::<Rgb>(), Ok(Rgb::new(10, 255, 16)));
        assert!("#fff".parse::<Rgb>().is_err());
        assert!("#gg0000".parse::<Rgb>().is_err());
        assert!("+12345".parse::<Rgb>().is_err());
    }

    #[test]
    fn test_rgb_display() {
        assert_eq!(Rgb::GREEN.to_string(), "#00ff00");
    }

    #[test]
    fn test_kind_boundaries() {
        assert_eq!(CellKind::from_alpha(0), CellKind::Clear);
        assert_eq!(CellKind::from_alpha(1), CellKind::Solid);
        assert_eq!(CellKind::from_alpha(2), CellKind::Invalid);
        assert_eq!(CellKind::from_alpha(31), CellKind::Invalid);
        assert_eq!(CellKind::from_alpha(32), CellKind::Glyph(' '));
        assert_eq!(CellKind::from_alpha(65), CellKind::Glyph('A'));
        assert_eq!(CellKind::from_alpha(126), CellKind::Glyph('~'));
        assert_eq!(CellKind::from_alpha(127), CellKind::Invalid);
        assert_eq!(CellKind::from_alpha(255), CellKind::Invalid);
    }

    #[test]
    fn test_kind_total_over_all_bytes() {
        let mut counts = [0usize; 4];
        for a in 0..=255u8 {
            let slot = match CellKind::from_alpha(a) {
                CellKind::Clear => 0,
                CellKind::Solid => 1,
                CellKind::Glyph(c) => {
                    assert_eq!(c as u32, u32::from(a));
                    2
                }
                CellKind::Invalid => 3,
            };
            counts[slot] += 1;
        }
        assert_eq!(counts, [1, 1, 95, 159]);
    }

    #[test]
    fn test_visible_ascii() {
        assert!(is_visible_ascii(' '));
        assert!(is_visible_ascii('~'));
        assert!(!is_visible_ascii('\u{1f}'));
        assert!(!is_visible_ascii('\u{7f}'));
        assert!(!is_visible_ascii('€'));
        assert!(!is_visible_ascii('é'));
    }

    #[test]
    fn test_cell_constructors() {
        let solid = Cell::solid(Rgb::new(1, 2, 3));
        assert_eq!(solid.to_bytes(), [1, 2, 3, 1]);
        assert_eq!(solid.kind(), CellKind::Solid);

        let glyph = Cell::glyph('A', Rgb::new(10, 20, 30)).unwrap();
        assert_eq!(glyph.to_bytes(), [10, 20, 30, 65]);
        assert_eq!(glyph.kind(), CellKind::Glyph('A'));

        assert!(Cell::glyph('\t', Rgb::WHITE).is_none());
        assert!(Cell::glyph('€', Rgb::WHITE).is_none());
        assert_eq!(Cell::default(), Cell::CLEAR);
    }

    #[test]
    fn test_alpha_from_unorm() {
        for a in 0..=255u8 {
            let sampled = f32::from(a) / 255.0;
            assert_eq!(alpha_from_unorm(sampled), a);
        }
        // Slightly below the exact value still recovers the integer.
        assert_eq!(alpha_from_unorm(65.0 / 255.0 - 0.001), 65);
        assert_eq!(alpha_from_unorm(-0.5), 0);
        assert_eq!(alpha_from_unorm(2.0), 255);
    }
}
