//! Layout module: Rectangles in atlas cell space.

mod rect;

pub use rect::Rect;
