//! Preview: Render an atlas to a true-color terminal.
//!
//! Each atlas cell becomes two terminal columns so the grid looks roughly
//! square. Cell appearance is chosen from [`CellKind`] only:
//!
//! - **Clear**: the backdrop (checkerboard or default background)
//! - **Solid**: background in the stored color
//! - **Glyph**: the character in the stored color over the backdrop
//! - **Invalid**: a red `XX` marker
//!
//! Like the diff engine it is modelled on, the renderer tracks the current
//! pen and only emits SGR sequences when a color actually changes.

mod output;

pub use output::OutputBuffer;

use crate::buffer::{AtlasBuffer, CellKind, Rgb};
use crate::layout::Rect;
use bitflags::bitflags;

/// Terminal columns per atlas cell.
pub const COLUMNS_PER_CELL: u16 = 2;

bitflags! {
    /// Preview rendering options.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct PreviewFlags: u8 {
        /// Draw a checkerboard behind clear cells and glyphs.
        const CHECKERBOARD = 0b0000_0001;
        /// Draw invalid cells as error markers instead of as clear.
        const MARK_INVALID = 0b0000_0010;
    }
}

impl Default for PreviewFlags {
    fn default() -> Self {
        Self::CHECKERBOARD | Self::MARK_INVALID
    }
}

/// Configuration for the terminal preview.
#[derive(Debug, Clone)]
pub struct PreviewConfig {
    /// Rendering options.
    pub flags: PreviewFlags,
    /// Checkerboard color on even cells.
    pub checker_light: Rgb,
    /// Checkerboard color on odd cells.
    pub checker_dark: Rgb,
    /// Marker color for invalid cells.
    pub invalid: Rgb,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            flags: PreviewFlags::default(),
            checker_light: Rgb::new(200, 200, 200),
            checker_dark: Rgb::new(160, 160, 160),
            invalid: Rgb::RED,
        }
    }
}

impl PreviewConfig {
    /// Backdrop for cell (x, y). `None` is the terminal default.
    fn backdrop(&self, x: u16, y: u16) -> Option<Rgb> {
        if !self.flags.contains(PreviewFlags::CHECKERBOARD) {
            return None;
        }
        if (u32::from(x) + u32::from(y)) % 2 == 0 {
            Some(self.checker_light)
        } else {
            Some(self.checker_dark)
        }
    }
}

/// Last emitted colors. `None` means the terminal default.
#[derive(Debug, Default)]
struct Pen {
    fg: Option<Rgb>,
    bg: Option<Rgb>,
}

impl Pen {
    fn fg(&mut self, out: &mut OutputBuffer, fg: Option<Rgb>) {
        if self.fg != fg {
            match fg {
                Some(color) => out.set_fg(color),
                None => out.default_fg(),
            }
            self.fg = fg;
        }
    }

    fn bg(&mut self, out: &mut OutputBuffer, bg: Option<Rgb>) {
        if self.bg != bg {
            match bg {
                Some(color) => out.set_bg(color),
                None => out.default_bg(),
            }
            self.bg = bg;
        }
    }
}

/// Statistics about a rendered preview.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PreviewResult {
    /// The part of the atlas that was drawn.
    pub area: Rect,
    /// Number of color change sequences emitted.
    pub color_changes: usize,
}

/// Render `viewport` of the atlas into `out`.
///
/// The viewport is clipped to the atlas. Each row ends with an attribute
/// reset and `\r\n`.
pub fn render(
    atlas: &AtlasBuffer,
    viewport: Rect,
    config: &PreviewConfig,
    out: &mut OutputBuffer,
) -> PreviewResult {
    let area = viewport.intersection(&Rect::from_size(atlas.width(), atlas.height()));
    let mut result = PreviewResult {
        area,
        color_changes: 0,
    };

    out.reset_attrs();
    for y in area.y..area.bottom() {
        let mut pen = Pen::default();
        for x in area.x..area.right() {
            let Some(cell) = atlas.get(x.into(), y.into()) else {
                continue;
            };
            let backdrop = config.backdrop(x, y);
            let before = out.len();

            match cell.kind() {
                CellKind::Solid => {
                    pen.bg(out, Some(cell.rgb()));
                    out.write_raw(b"  ");
                }
                CellKind::Glyph(c) => {
                    pen.bg(out, backdrop);
                    pen.fg(out, Some(cell.rgb()));
                    out.write_char(c);
                    out.write_raw(b" ");
                }
                CellKind::Invalid if config.flags.contains(PreviewFlags::MARK_INVALID) => {
                    pen.bg(out, backdrop);
                    pen.fg(out, Some(config.invalid));
                    out.write_raw(b"XX");
                }
                CellKind::Clear | CellKind::Invalid => {
                    pen.bg(out, backdrop);
                    out.write_raw(b"  ");
                }
            }

            // Anything beyond the two visible columns was an SGR sequence.
            if out.len() - before > COLUMNS_PER_CELL as usize {
                result.color_changes += 1;
            }
        }
        out.reset_attrs();
        out.newline();
    }

    result
}

/// Render the whole atlas into a fresh buffer.
pub fn render_atlas(atlas: &AtlasBuffer, config: &PreviewConfig) -> OutputBuffer {
    let mut out = OutputBuffer::with_capacity(atlas.len() * 8);
    render(atlas, Rect::from_size(atlas.width(), atlas.height()), config, &mut out);
    out
}

/// The largest top-left viewport that fits a `columns x rows` terminal.
///
/// One row is kept free for the shell prompt.
pub fn fit_viewport(atlas: &AtlasBuffer, columns: u16, rows: u16) -> Rect {
    let width = (columns / COLUMNS_PER_CELL).min(atlas.width());
    let height = rows.saturating_sub(1).min(atlas.height());
    Rect::new(0, 0, width, height)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn screen_of(out: &OutputBuffer, rows: u16, cols: u16) -> vt100::Parser {
        let mut parser = vt100::Parser::new(rows, cols, 0);
        parser.process(out.as_bytes());
        parser
    }

    #[test]
    fn test_preview_dispatch() {
        let mut atlas = AtlasBuffer::from_raw(vec![0, 0, 0, 200, 0, 0, 0, 0], 2, 1).unwrap();
        atlas.set_glyph(0, 0, 'A', Rgb::new(10, 20, 30)).unwrap();
        atlas.set_solid(1, 0, Rgb::new(1, 2, 3)).unwrap();

        let out = render_atlas(&atlas, &PreviewConfig::default());
        let parser = screen_of(&out, 3, 10);
        let screen = parser.screen();

        let glyph = screen.cell(0, 0).unwrap();
        assert_eq!(glyph.contents(), "A");
        assert_eq!(glyph.fgcolor(), vt100::Color::Rgb(10, 20, 30));
        assert_eq!(glyph.bgcolor(), vt100::Color::Rgb(200, 200, 200));

        let solid = screen.cell(0, 2).unwrap();
        assert_eq!(solid.bgcolor(), vt100::Color::Rgb(1, 2, 3));
        assert_eq!(screen.cell(0, 3).unwrap().bgcolor(), vt100::Color::Rgb(1, 2, 3));
    }

    #[test]
    fn test_preview_invalid_marker() {
        let atlas = AtlasBuffer::from_raw(vec![0, 0, 0, 200, 0, 0, 0, 0], 2, 1).unwrap();

        let out = render_atlas(&atlas, &PreviewConfig::default());
        let parser = screen_of(&out, 3, 10);
        let screen = parser.screen();
        assert_eq!(screen.cell(0, 0).unwrap().contents(), "X");
        assert_eq!(screen.cell(0, 1).unwrap().contents(), "X");
        assert_eq!(screen.cell(0, 0).unwrap().fgcolor(), vt100::Color::Rgb(255, 0, 0));
        // The clear neighbour shows the dark checker square.
        assert_eq!(screen.cell(0, 2).unwrap().bgcolor(), vt100::Color::Rgb(160, 160, 160));

        let plain = PreviewConfig {
            flags: PreviewFlags::empty(),
            ..PreviewConfig::default()
        };
        let out = render_atlas(&atlas, &plain);
        let parser = screen_of(&out, 3, 10);
        assert_ne!(parser.screen().cell(0, 0).unwrap().contents(), "X");
        assert_eq!(parser.screen().cell(0, 0).unwrap().bgcolor(), vt100::Color::Default);
    }

    #[test]
    fn test_preview_rows() {
        let mut atlas = AtlasBuffer::new(3, 2).unwrap();
        atlas.set_glyph(2, 1, 'z', Rgb::WHITE).unwrap();

        let out = render_atlas(&atlas, &PreviewConfig::default());
        let parser = screen_of(&out, 4, 10);
        assert_eq!(parser.screen().cell(1, 4).unwrap().contents(), "z");
    }

    #[test]
    fn test_preview_viewport_clipped() {
        let mut atlas = AtlasBuffer::new(4, 4).unwrap();
        atlas.set_glyph(3, 3, 'q', Rgb::WHITE).unwrap();

        let mut out = OutputBuffer::new();
        let result = render(&atlas, Rect::new(2, 2, 10, 10), &PreviewConfig::default(), &mut out);
        assert_eq!(result.area, Rect::new(2, 2, 2, 2));

        let parser = screen_of(&out, 4, 10);
        assert_eq!(parser.screen().cell(1, 2).unwrap().contents(), "q");
    }

    #[test]
    fn test_preview_skips_redundant_colors() {
        let mut atlas = AtlasBuffer::new(4, 1).unwrap();
        for x in 0..4 {
            atlas.set_solid(x, 0, Rgb::new(9, 9, 9)).unwrap();
        }
        let mut out = OutputBuffer::new();
        let result = render(&atlas, Rect::from_size(4, 1), &PreviewConfig::default(), &mut out);
        assert_eq!(result.color_changes, 1);
    }

    #[test]
    fn test_fit_viewport() {
        let atlas = AtlasBuffer::new(100, 50).unwrap();
        assert_eq!(fit_viewport(&atlas, 80, 24), Rect::new(0, 0, 40, 23));
        let small = AtlasBuffer::new(4, 4).unwrap();
        assert_eq!(fit_viewport(&small, 80, 24), Rect::new(0, 0, 4, 4));
    }
}
