//! NVGIF v4: adds whole-frame zlib compression to v3.
//!
//! ```text
//! "NVG" | 4 | compression: u8 | alpha: u8 | width: u16 BE | height: u16 BE | reserved: u8 | payload
//! ```
//!
//! The payload is built in two stages, always applied in this order:
//!
//! 1. Framing. Either length-prefixed rows (optionally RLE encoded per row,
//!    exactly like v3) or the bare row-major pixel buffer.
//! 2. Optionally, the whole output of stage 1 is compressed as one blob.
//!
//! | mode | framing        | whole-frame |
//! |------|----------------|-------------|
//! | 0    | raw rows       | no          |
//! | 1    | RLE rows       | no          |
//! | 2    | bare buffer    | zlib        |
//! | 3    | RLE rows       | zlib        |

use std::io::{Cursor, Write};

use byteorder::{ReadBytesExt, WriteBytesExt, BE};
use log::{debug, trace, warn};

use crate::{
    binio::{read_rows, write_rows, RowReader},
    compression::zlib::{FrameCompressor, Zlib},
    error::Error,
    header::{expect_version, CompressionName, Version, MAGIC},
    operations::{bpp, dimensions, extract_frame, into_surface, push_row},
    surface::{ImageSurface, RgbaSurface},
};

#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Compression {
    None = 0,
    Rle = 1,
    Zlib = 2,
    #[default]
    RleZlib = 3,
}

/// How the pixel data is laid out before any whole-frame compression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Framing {
    /// Length-prefixed rows, each optionally RLE encoded.
    Rows { rle: bool },

    /// The row-major pixel buffer with no per-row framing.
    Bare,
}

impl Compression {
    pub fn name(self) -> CompressionName {
        match self {
            Compression::None => CompressionName::None,
            Compression::Rle => CompressionName::Rle,
            Compression::Zlib => CompressionName::Zlib,
            Compression::RleZlib => CompressionName::RleZlib,
        }
    }

    pub fn from_name(name: CompressionName) -> Self {
        match name {
            CompressionName::None => Compression::None,
            CompressionName::Rle => Compression::Rle,
            CompressionName::Zlib => Compression::Zlib,
            CompressionName::RleZlib => Compression::RleZlib,
        }
    }

    /// The framing stage of this mode.
    pub fn framing(self) -> Framing {
        match self {
            Compression::None => Framing::Rows { rle: false },
            Compression::Rle | Compression::RleZlib => Framing::Rows { rle: true },
            Compression::Zlib => Framing::Bare,
        }
    }

    /// Whether the framed payload is compressed as a whole.
    pub fn whole_frame(self) -> bool {
        matches!(self, Compression::Zlib | Compression::RleZlib)
    }
}

impl TryFrom<u8> for Compression {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Ok(match value {
            0 => Self::None,
            1 => Self::Rle,
            2 => Self::Zlib,
            3 => Self::RleZlib,
            v => {
                return Err(Error::UnsupportedCompression {
                    compression: v.to_string(),
                    version: 4,
                })
            }
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    pub compression: Compression,

    /// Whether pixels carry an alpha byte.
    pub alpha: bool,

    pub width: u16,
    pub height: u16,
}

impl Header {
    pub const LEN: usize = 11;

    pub fn to_bytes(&self) -> Result<Vec<u8>, Error> {
        let mut buf = Cursor::new(Vec::with_capacity(Self::LEN));

        buf.write_all(&MAGIC)?;
        buf.write_u8(Version::V4 as u8)?;
        buf.write_u8(self.compression as u8)?;
        buf.write_u8(self.alpha as u8)?;
        buf.write_u16::<BE>(self.width)?;
        buf.write_u16::<BE>(self.height)?;

        // Reserved
        buf.write_u8(0)?;

        Ok(buf.into_inner())
    }

    pub fn read_from(data: &[u8]) -> Result<Self, Error> {
        expect_version(data, Version::V4, Self::LEN)?;

        let mut input = Cursor::new(&data[4..Self::LEN]);
        let header = Header {
            compression: input.read_u8()?.try_into()?,
            alpha: match input.read_u8()? {
                0 => false,
                1 => true,
                v => return Err(Error::InvalidAlpha(v)),
            },
            width: input.read_u16::<BE>()?,
            height: input.read_u16::<BE>()?,
        };

        let reserved = input.read_u8()?;
        if reserved != 0 {
            warn!("reserved header byte is {reserved}, ignoring");
        }

        Ok(header)
    }

    fn bpp(&self) -> usize {
        bpp(self.alpha)
    }
}

/// Encode `surface` as v4 using zlib for whole-frame compression.
pub fn encode<S, O>(
    surface: &S,
    compression: Compression,
    alpha: bool,
    output: &mut O,
) -> Result<(), Error>
where
    S: ImageSurface + ?Sized,
    O: Write + WriteBytesExt,
{
    encode_with(surface, compression, alpha, &Zlib::default(), output)
}

/// Encode `surface` as v4 with a custom whole-frame compressor.
pub fn encode_with<S, C, O>(
    surface: &S,
    compression: Compression,
    alpha: bool,
    compressor: &C,
    output: &mut O,
) -> Result<(), Error>
where
    S: ImageSurface + ?Sized,
    C: FrameCompressor + ?Sized,
    O: Write + WriteBytesExt,
{
    let (width, height) = dimensions(surface)?;
    debug!("encoding NVGIF v4, {width}x{height}, {compression:?}, alpha: {alpha}");

    let bpp = bpp(alpha);
    let mut payload = match compression.framing() {
        Framing::Rows { rle } => {
            let mut rows = Vec::new();
            write_rows(surface, bpp, rle, &mut rows)?;
            rows
        }
        Framing::Bare => extract_frame(surface, bpp),
    };

    if compression.whole_frame() {
        let framed_len = payload.len();
        payload = compressor.compress(&payload)?;
        trace!("whole-frame compression {framed_len} -> {} bytes", payload.len());
    }

    let header = Header {
        compression,
        alpha,
        width,
        height,
    };
    output.write_all(&header.to_bytes()?)?;
    output.write_all(&payload)?;

    Ok(())
}

/// Decode a complete v4 file using zlib for whole-frame decompression.
pub fn decode(data: &[u8]) -> Result<RgbaSurface, Error> {
    decode_with(data, &Zlib::default())
}

/// Decode a complete v4 file with a custom whole-frame compressor.
pub fn decode_with<C: FrameCompressor + ?Sized>(
    data: &[u8],
    compressor: &C,
) -> Result<RgbaSurface, Error> {
    let header = Header::read_from(data)?;
    debug!(
        "decoding NVGIF v4, {}x{}, {:?}, alpha: {}",
        header.width, header.height, header.compression, header.alpha
    );

    let payload = &data[Header::LEN..];
    let decompressed;
    let framed = if header.compression.whole_frame() {
        decompressed = compressor.decompress(payload)?;
        trace!(
            "whole-frame decompression {} -> {} bytes",
            payload.len(),
            decompressed.len()
        );
        &decompressed[..]
    } else {
        payload
    };

    let bpp = header.bpp();

    match header.compression.framing() {
        Framing::Rows { rle } => {
            let mut reader = RowReader::new(framed);
            let surface = read_rows(&mut reader, header.width, header.height, bpp, rle)?;
            super::warn_trailing(reader.remaining());

            Ok(surface)
        }
        Framing::Bare => {
            let row_len = header.width as usize * bpp;
            let expected = row_len * header.height as usize;
            if framed.len() != expected {
                return Err(Error::MalformedPayload(format!(
                    "expected {expected} bytes of pixel data, got {}",
                    framed.len()
                )));
            }

            let mut bitmap = Vec::with_capacity(framed.len() / bpp * 4);
            if row_len > 0 {
                for row in framed.chunks_exact(row_len) {
                    push_row(&mut bitmap, row, bpp);
                }
            }

            into_surface(header.width, header.height, bitmap)
        }
    }
}
