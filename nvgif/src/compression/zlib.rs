//! Whole-frame compression used by NVGIF v4.

use std::io::{Read, Write};

use flate2::{read::ZlibDecoder, write::ZlibEncoder, Compression};

use crate::error::Error;

/// A lossless byte-stream compressor applied to an entire frame at once.
pub trait FrameCompressor {
    fn compress(&self, data: &[u8]) -> Result<Vec<u8>, Error>;

    /// Undo [`FrameCompressor::compress`]. Any failure is reported as
    /// [`Error::MalformedPayload`].
    fn decompress(&self, data: &[u8]) -> Result<Vec<u8>, Error>;
}

/// zlib-wrapped deflate, the compressor NVGIF v4 files are written with.
#[derive(Debug, Clone, Copy)]
pub struct Zlib {
    level: Compression,
}

impl Default for Zlib {
    fn default() -> Self {
        Self {
            level: Compression::best(),
        }
    }
}

impl Zlib {
    /// Use a specific compression level, `0..=9`.
    pub fn with_level(level: u32) -> Self {
        Self {
            level: Compression::new(level.min(9)),
        }
    }
}

impl FrameCompressor for Zlib {
    fn compress(&self, data: &[u8]) -> Result<Vec<u8>, Error> {
        let mut encoder = ZlibEncoder::new(Vec::with_capacity(data.len() / 2), self.level);
        encoder.write_all(data)?;

        Ok(encoder.finish()?)
    }

    fn decompress(&self, data: &[u8]) -> Result<Vec<u8>, Error> {
        let mut output = Vec::new();
        ZlibDecoder::new(data)
            .read_to_end(&mut output)
            .map_err(|e| Error::MalformedPayload(format!("zlib decompression failed: {e}")))?;

        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip() {
        let data: Vec<u8> = (0..4096u32).map(|i| (i % 251) as u8).collect();
        let zlib = Zlib::default();

        let compressed = zlib.compress(&data).unwrap();
        assert!(compressed.len() < data.len());
        assert_eq!(zlib.decompress(&compressed).unwrap(), data);
    }

    #[test]
    fn lower_levels_still_roundtrip() {
        let data = b"NVGNVGNVGNVGNVG".repeat(20);
        let zlib = Zlib::with_level(1);

        assert_eq!(zlib.decompress(&zlib.compress(&data).unwrap()).unwrap(), data);
    }

    #[test]
    fn garbage_is_malformed_payload() {
        let result = Zlib::default().decompress(&[0xDE, 0xAD, 0xBE, 0xEF]);
        assert!(matches!(result, Err(Error::MalformedPayload(_))));
    }
}
