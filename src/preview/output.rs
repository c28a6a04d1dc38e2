//! `OutputBuffer`: Single-write buffer for ANSI preview output.

use crate::buffer::Rgb;
use std::io::Write;

/// Pre-allocated buffer for building ANSI escape sequences.
///
/// A preview is accumulated here, then flushed in a single `write()` call.
pub struct OutputBuffer {
    data: Vec<u8>,
}

impl OutputBuffer {
    /// Create a new output buffer with the given capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: Vec::with_capacity(capacity),
        }
    }

    /// Create a buffer with a 4KB starting capacity.
    pub fn new() -> Self {
        Self::with_capacity(4096)
    }

    /// Get the buffer contents.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Get the buffer length.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if buffer is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Write raw bytes.
    #[inline]
    pub fn write_raw(&mut self, bytes: &[u8]) {
        self.data.extend_from_slice(bytes);
    }

    /// Write a single character.
    #[inline]
    pub fn write_char(&mut self, c: char) {
        let mut utf8 = [0u8; 4];
        self.data.extend_from_slice(c.encode_utf8(&mut utf8).as_bytes());
    }

    /// Set foreground color (true color).
    #[inline]
    pub fn set_fg(&mut self, color: Rgb) {
        let _ = write!(self.data, "\x1b[38;2;{};{};{}m", color.r, color.g, color.b);
    }

    /// Set background color (true color).
    #[inline]
    pub fn set_bg(&mut self, color: Rgb) {
        let _ = write!(self.data, "\x1b[48;2;{};{};{}m", color.r, color.g, color.b);
    }

    /// Restore the terminal's default foreground.
    #[inline]
    pub fn default_fg(&mut self) {
        self.data.extend_from_slice(b"\x1b[39m");
    }

    /// Restore the terminal's default background.
    #[inline]
    pub fn default_bg(&mut self) {
        self.data.extend_from_slice(b"\x1b[49m");
    }

    /// Reset all attributes.
    #[inline]
    pub fn reset_attrs(&mut self) {
        self.data.extend_from_slice(b"\x1b[0m");
    }

    /// End the current line (carriage return + line feed).
    #[inline]
    pub fn newline(&mut self) {
        self.data.extend_from_slice(b"\r\n");
    }

    /// Flush to a writer in a single call.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying writer fails.
    pub fn flush_to<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        writer.write_all(&self.data)?;
        writer.flush()
    }
}

impl Default for OutputBuffer {
    fn default() -> Self {
        Self::new()
    }
}
