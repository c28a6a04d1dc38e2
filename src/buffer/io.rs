//! Whole-file load and save.
//!
//! The format is headerless, so every reader and writer supplies the
//! dimensions. Files are read and written in one piece.

use super::atlas::{byte_len, AtlasBuffer};
use crate::error::{AtlasError, Result};
use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::Path;
use tracing::debug;

/// Read an atlas from any reader.
///
/// An oversized stream is drained so the mismatch reports its full length.
///
/// # Errors
///
/// Returns [`AtlasError::SizeMismatch`] on a length mismatch, or
/// [`AtlasError::Io`] if reading fails.
pub fn read_from<R: Read>(reader: R, width: u16, height: u16) -> Result<AtlasBuffer> {
    let expected = byte_len(width, height);
    let mut data = Vec::with_capacity(expected);
    let mut limited = reader.take(expected as u64 + 1);
    limited.read_to_end(&mut data)?;
    if data.len() > expected {
        let rest = std::io::copy(&mut limited.into_inner(), &mut std::io::sink())?;
        return Err(AtlasError::SizeMismatch {
            expected: expected as u64,
            actual: data.len() as u64 + rest,
        });
    }
    AtlasBuffer::from_raw(data, width, height)
}

/// Write the encoded atlas to any writer.
///
/// # Errors
///
/// Returns [`AtlasError::Io`] if the writer fails.
pub fn write_to<W: Write>(atlas: &AtlasBuffer, writer: &mut W) -> Result<()> {
    writer.write_all(atlas.as_bytes())?;
    writer.flush()?;
    Ok(())
}

/// Load an atlas file.
///
/// For regular files the size is checked against the dimensions before any
/// data is read. Pipes and devices report no useful size and are checked
/// while reading.
///
/// # Errors
///
/// Returns [`AtlasError::SizeMismatch`] if the file has the wrong length,
/// or [`AtlasError::Io`] if it cannot be read.
pub fn load_raw(path: impl AsRef<Path>, width: u16, height: u16) -> Result<AtlasBuffer> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let metadata = file.metadata()?;
    let expected = byte_len(width, height) as u64;
    if metadata.is_file() && metadata.len() != expected {
        return Err(AtlasError::SizeMismatch {
            expected,
            actual: metadata.len(),
        });
    }
    debug!(path = %path.display(), width, height, "loading atlas");
    read_from(file, width, height)
}

/// Save an atlas file, replacing any existing content.
///
/// # Errors
///
/// Returns [`AtlasError::Io`] if the file cannot be written.
pub fn save_raw(atlas: &AtlasBuffer, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    debug!(
        path = %path.display(),
        width = atlas.width(),
        height = atlas.height(),
        bytes = atlas.as_bytes().len(),
        "saving atlas"
    );
    fs::write(path, atlas.as_bytes())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::Rgb;

    #[test]
    fn test_read_from_exact() {
        let data = [1u8, 2, 3, 1, 0, 0, 0, 0];
        let atlas = read_from(&data[..], 2, 1).unwrap();
        assert_eq!(atlas.as_bytes(), &data);
    }

    #[test]
    fn test_read_from_too_long() {
        let data = vec![0u8; 64];
        let err = read_from(&data[..], 2, 1).unwrap_err();
        assert!(matches!(err, AtlasError::SizeMismatch { expected: 8, actual: 64 }));

        let err = read_from(&[0u8; 9][..], 2, 1).unwrap_err();
        assert!(matches!(err, AtlasError::SizeMismatch { expected: 8, actual: 9 }));
    }

    #[test]
    fn test_read_from_too_short() {
        let err = read_from(&[0u8; 3][..], 1, 1).unwrap_err();
        assert!(matches!(err, AtlasError::SizeMismatch { expected: 4, actual: 3 }));
    }

    #[test]
    fn test_write_to() {
        let mut atlas = AtlasBuffer::new(1, 2).unwrap();
        atlas.set_glyph(0, 1, 'z', Rgb::new(7, 8, 9)).unwrap();
        let mut out = Vec::new();
        write_to(&atlas, &mut out).unwrap();
        assert_eq!(out, vec![0, 0, 0, 0, 7, 8, 9, b'z']);
    }
}
