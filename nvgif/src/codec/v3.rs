//! NVGIF v3: adds an optional alpha channel to v2.
//!
//! ```text
//! "NVG" | 3 | compression: u8 | alpha: u8 | width: u16 BE | height: u16 BE | rows...
//! ```
//!
//! Rows hold `width * bpp` bytes once expanded, where `bpp` is 4 with alpha
//! and 3 without. RLE units are `bpp` bytes long.

use std::io::{Cursor, Write};

use byteorder::{ReadBytesExt, WriteBytesExt, BE};
use log::debug;

use crate::{
    binio::{read_rows, write_rows, RowReader},
    error::Error,
    header::{expect_version, CompressionName, Version, MAGIC},
    operations::{bpp, dimensions},
    surface::{ImageSurface, RgbaSurface},
};

#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Compression {
    None = 0,
    #[default]
    Rle = 1,
}

impl Compression {
    pub fn name(self) -> CompressionName {
        match self {
            Compression::None => CompressionName::None,
            Compression::Rle => CompressionName::Rle,
        }
    }

    pub fn from_name(name: CompressionName) -> Result<Self, Error> {
        match name {
            CompressionName::None => Ok(Compression::None),
            CompressionName::Rle => Ok(Compression::Rle),
            other => Err(Error::UnsupportedCompression {
                compression: other.to_string(),
                version: 3,
            }),
        }
    }
}

impl TryFrom<u8> for Compression {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Ok(match value {
            0 => Self::None,
            1 => Self::Rle,
            v => {
                return Err(Error::UnsupportedCompression {
                    compression: v.to_string(),
                    version: 3,
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
    pub const LEN: usize = 10;

    pub fn to_bytes(&self) -> Result<Vec<u8>, Error> {
        let mut buf = Cursor::new(Vec::with_capacity(Self::LEN));

        buf.write_all(&MAGIC)?;
        buf.write_u8(Version::V3 as u8)?;
        buf.write_u8(self.compression as u8)?;
        buf.write_u8(self.alpha as u8)?;
        buf.write_u16::<BE>(self.width)?;
        buf.write_u16::<BE>(self.height)?;

        Ok(buf.into_inner())
    }

    pub fn read_from(data: &[u8]) -> Result<Self, Error> {
        expect_version(data, Version::V3, Self::LEN)?;

        let mut input = Cursor::new(&data[4..Self::LEN]);
        Ok(Header {
            compression: input.read_u8()?.try_into()?,
            alpha: match input.read_u8()? {
                0 => false,
                1 => true,
                v => return Err(Error::InvalidAlpha(v)),
            },
            width: input.read_u16::<BE>()?,
            height: input.read_u16::<BE>()?,
        })
    }
}

/// Encode `surface` as v3, keeping the alpha channel if `alpha` is set.
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
    let (width, height) = dimensions(surface)?;
    debug!("encoding NVGIF v3, {width}x{height}, {compression:?}, alpha: {alpha}");

    let header = Header {
        compression,
        alpha,
        width,
        height,
    };
    output.write_all(&header.to_bytes()?)?;

    write_rows(surface, bpp(alpha), compression == Compression::Rle, output)
}

/// Decode a complete v3 file. Without alpha every pixel comes back opaque.
pub fn decode(data: &[u8]) -> Result<RgbaSurface, Error> {
    let header = Header::read_from(data)?;
    debug!(
        "decoding NVGIF v3, {}x{}, {:?}, alpha: {}",
        header.width, header.height, header.compression, header.alpha
    );

    let mut reader = RowReader::new(&data[Header::LEN..]);
    let surface = read_rows(
        &mut reader,
        header.width,
        header.height,
        bpp(header.alpha),
        header.compression == Compression::Rle,
    )?;

    super::warn_trailing(reader.remaining());
    Ok(surface)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_bytes() {
        let header = Header {
            compression: Compression::Rle,
            alpha: true,
            width: 258,
            height: 3,
        };
        let bytes = header.to_bytes().unwrap();

        assert_eq!(bytes, vec![b'N', b'V', b'G', 3, 1, 1, 1, 2, 0, 3]);
        assert_eq!(Header::read_from(&bytes).unwrap(), header);
    }

    #[test]
    fn transparent_pixel_raw() {
        let surface = RgbaSurface::new(1, 1);
        let mut out = Vec::new();
        encode(&surface, Compression::None, true, &mut out).unwrap();

        assert_eq!(
            out,
            vec![b'N', b'V', b'G', 3, 0, 1, 0, 1, 0, 1, 0, 4, 0, 0, 0, 0]
        );
        assert_eq!(decode(&out).unwrap(), surface);
    }

    #[test]
    fn rle_uses_four_byte_units_with_alpha() {
        let surface = RgbaSurface::from_raw(
            3,
            1,
            vec![1, 1, 1, 0, 1, 1, 1, 0, 1, 1, 1, 9],
        )
        .unwrap();
        let mut out = Vec::new();
        encode(&surface, Compression::Rle, true, &mut out).unwrap();

        assert_eq!(
            &out[Header::LEN..],
            &[0, 10, 2, 1, 1, 1, 0, 1, 1, 1, 1, 9]
        );
        assert_eq!(decode(&out).unwrap(), surface);
    }

    #[test]
    fn without_alpha_is_opaque() {
        let surface = RgbaSurface::from_raw(2, 1, vec![1, 2, 3, 4, 5, 6, 7, 8]).unwrap();

        for compression in [Compression::None, Compression::Rle] {
            let mut out = Vec::new();
            encode(&surface, compression, false, &mut out).unwrap();
            assert_eq!(out[5], 0);

            let decoded = decode(&out).unwrap();
            assert_eq!(decoded.as_raw(), &[1, 2, 3, 255, 5, 6, 7, 255]);
        }
    }

    #[test]
    fn rejects_v2_files() {
        let data = [b'N', b'V', b'G', 2, 0, 0, 1, 0, 1, 0, 3, 1, 2, 3];
        assert!(matches!(
            decode(&data),
            Err(Error::VersionMismatch { version: 2, expected: 3 })
        ));
    }

    #[test]
    fn invalid_alpha_flag() {
        let data = [b'N', b'V', b'G', 3, 0, 2, 0, 0, 0, 0];
        assert!(matches!(decode(&data), Err(Error::InvalidAlpha(2))));
    }

    #[test]
    fn row_too_short_for_alpha() {
        // Alpha on, but the row only has RGB bytes
        let data = [b'N', b'V', b'G', 3, 0, 1, 0, 1, 0, 1, 0, 3, 1, 2, 3];
        assert!(matches!(
            decode(&data),
            Err(Error::MalformedRow { row: 0, .. })
        ));
    }
}
