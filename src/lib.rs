//! # Atlas
//!
//! Codec and validation core for the Special RGBA Atlas format.
//!
//! An atlas is a raw, headerless stream of `width * height` RGBA8 cells in
//! row-major order. The alpha byte is overloaded:
//!
//! - `A == 0`: clear (transparent)
//! - `A == 1`: solid pixel in the stored RGB
//! - `32 <= A <= 126`: the ASCII glyph `A`, drawn in the stored RGB
//! - anything else: invalid
//!
//! ## Core Concepts
//!
//! - **Structural validity**: the byte length matches the dimensions; the only
//!   check performed when decoding
//! - **Content validity**: every alpha falls into a defined kind; reported by
//!   [`AtlasBuffer::validate`], never enforced on load
//! - **Guarded writes**: the mutation API cannot create invalid content
//!
//! ## Example
//!
//! ```rust
//! use atlas::{AtlasBuffer, CellKind, Rgb};
//!
//! let mut atlas = AtlasBuffer::new(2, 1)?;
//! atlas.set_glyph(0, 0, 'A', Rgb::new(10, 20, 30))?;
//! atlas.set_solid(1, 0, Rgb::new(1, 2, 3))?;
//!
//! assert_eq!(atlas.kind_of(0, 0)?, CellKind::Glyph('A'));
//! assert_eq!(atlas.as_bytes(), &[10, 20, 30, 65, 1, 2, 3, 1]);
//! # Ok::<(), atlas::AtlasError>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod brush;
pub mod buffer;
pub mod config;
pub mod error;
pub mod layout;
pub mod preview;
pub mod stamp;

// Re-exports for convenience
pub use brush::{status_line, Brush, Tool};
pub use buffer::{io, AtlasBuffer, Cell, CellKind, KindCounts, Rgb, ValidationReport};
pub use config::EditorConfig;
pub use error::{AtlasError, Result};
pub use layout::Rect;
pub use preview::{PreviewConfig, PreviewFlags};
pub use stamp::{SpacePolicy, Stamp, StampReport};
