//! NVGIF v2: RGB rows, optionally run-length encoded.
//!
//! ```text
//! "NVG" | 2 | compression: u8 | width: u16 BE | height: u16 BE | rows...
//! ```

use std::io::{Cursor, Write};

use byteorder::{ReadBytesExt, WriteBytesExt, BE};
use log::debug;

use crate::{
    binio::{read_rows, write_rows, RowReader},
    error::Error,
    header::{expect_version, CompressionName, Version, MAGIC},
    operations::dimensions,
    surface::{ImageSurface, RgbaSurface},
};

const BPP: usize = 3;

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

    /// Map a symbolic name onto this version's constants, if it supports it.
    pub fn from_name(name: CompressionName) -> Result<Self, Error> {
        match name {
            CompressionName::None => Ok(Compression::None),
            CompressionName::Rle => Ok(Compression::Rle),
            other => Err(Error::UnsupportedCompression {
                compression: other.to_string(),
                version: 2,
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
                    version: 2,
                })
            }
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    pub compression: Compression,
    pub width: u16,
    pub height: u16,
}

impl Header {
    pub const LEN: usize = 9;

    pub fn to_bytes(&self) -> Result<Vec<u8>, Error> {
        let mut buf = Cursor::new(Vec::with_capacity(Self::LEN));

        buf.write_all(&MAGIC)?;
        buf.write_u8(Version::V2 as u8)?;
        buf.write_u8(self.compression as u8)?;
        buf.write_u16::<BE>(self.width)?;
        buf.write_u16::<BE>(self.height)?;

        Ok(buf.into_inner())
    }

    pub fn read_from(data: &[u8]) -> Result<Self, Error> {
        expect_version(data, Version::V2, Self::LEN)?;

        let mut input = Cursor::new(&data[4..Self::LEN]);
        Ok(Header {
            compression: input.read_u8()?.try_into()?,
            width: input.read_u16::<BE>()?,
            height: input.read_u16::<BE>()?,
        })
    }
}

/// Encode `surface` as v2. The alpha channel is dropped.
pub fn encode<S, O>(surface: &S, compression: Compression, output: &mut O) -> Result<(), Error>
where
    S: ImageSurface + ?Sized,
    O: Write + WriteBytesExt,
{
    let (width, height) = dimensions(surface)?;
    debug!("encoding NVGIF v2, {width}x{height}, {:?}", compression);

    let header = Header {
        compression,
        width,
        height,
    };
    output.write_all(&header.to_bytes()?)?;

    write_rows(surface, BPP, compression == Compression::Rle, output)
}

/// Decode a complete v2 file.
pub fn decode(data: &[u8]) -> Result<RgbaSurface, Error> {
    let header = Header::read_from(data)?;
    debug!(
        "decoding NVGIF v2, {}x{}, {:?}",
        header.width, header.height, header.compression
    );

    let mut reader = RowReader::new(&data[Header::LEN..]);
    let surface = read_rows(
        &mut reader,
        header.width,
        header.height,
        BPP,
        header.compression == Compression::Rle,
    )?;

    super::warn_trailing(reader.remaining());
    Ok(surface)
}
