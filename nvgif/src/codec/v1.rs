//! NVGIF v1: fixed RGB, every row stored raw.
//!
//! ```text
//! "NVG" | 1 | width: u16 BE | height: u16 BE | rows...
//! ```

use std::io::{Cursor, Write};

use byteorder::{ReadBytesExt, WriteBytesExt, BE};
use log::debug;

use crate::{
    binio::{read_rows, write_rows, RowReader},
    error::Error,
    header::{expect_version, Version, MAGIC},
    operations::dimensions,
    surface::{ImageSurface, RgbaSurface},
};

const BPP: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    pub width: u16,
    pub height: u16,
}

impl Header {
    pub const LEN: usize = 8;

    pub fn to_bytes(&self) -> Result<Vec<u8>, Error> {
        let mut buf = Cursor::new(Vec::with_capacity(Self::LEN));

        buf.write_all(&MAGIC)?;
        buf.write_u8(Version::V1 as u8)?;
        buf.write_u16::<BE>(self.width)?;
        buf.write_u16::<BE>(self.height)?;

        Ok(buf.into_inner())
    }

    pub fn read_from(data: &[u8]) -> Result<Self, Error> {
        expect_version(data, Version::V1, Self::LEN)?;

        let mut input = Cursor::new(&data[4..Self::LEN]);
        Ok(Header {
            width: input.read_u16::<BE>()?,
            height: input.read_u16::<BE>()?,
        })
    }
}

/// Encode `surface` as v1. The alpha channel is dropped.
pub fn encode<S, O>(surface: &S, output: &mut O) -> Result<(), Error>
where
    S: ImageSurface + ?Sized,
    O: Write + WriteBytesExt,
{
    let (width, height) = dimensions(surface)?;
    debug!("encoding NVGIF v1, {width}x{height}");

    output.write_all(&Header { width, height }.to_bytes()?)?;
    write_rows(surface, BPP, false, output)
}

/// Decode a complete v1 file.
pub fn decode(data: &[u8]) -> Result<RgbaSurface, Error> {
    let header = Header::read_from(data)?;
    debug!("decoding NVGIF v1, {}x{}", header.width, header.height);

    let mut reader = RowReader::new(&data[Header::LEN..]);
    let surface = read_rows(&mut reader, header.width, header.height, BPP, false)?;

    super::warn_trailing(reader.remaining());
    Ok(surface)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_bytes() {
        let header = Header { width: 258, height: 3 };
        let bytes = header.to_bytes().unwrap();

        assert_eq!(bytes, vec![b'N', b'V', b'G', 1, 1, 2, 0, 3]);
        assert_eq!(Header::read_from(&bytes).unwrap(), header);
    }

    #[test]
    fn layout() {
        let surface = RgbaSurface::from_raw(2, 1, vec![1, 2, 3, 4, 5, 6, 7, 8]).unwrap();
        let mut out = Vec::new();
        encode(&surface, &mut out).unwrap();

        assert_eq!(
            out,
            vec![b'N', b'V', b'G', 1, 0, 2, 0, 1, 0, 6, 1, 2, 3, 5, 6, 7]
        );
    }

    #[test]
    fn roundtrip_makes_opaque() {
        let surface = RgbaSurface::from_raw(1, 2, vec![9, 8, 7, 0, 6, 5, 4, 100]).unwrap();
        let mut out = Vec::new();
        encode(&surface, &mut out).unwrap();

        let decoded = decode(&out).unwrap();
        assert_eq!(decoded.as_raw(), &[9, 8, 7, 255, 6, 5, 4, 255]);
    }

    #[test]
    fn row_length_mismatch() {
        // 2 pixels wide but the row only holds 1
        let data = [b'N', b'V', b'G', 1, 0, 2, 0, 1, 0, 3, 1, 2, 3];
        assert!(matches!(
            decode(&data),
            Err(Error::MalformedRow { row: 0, .. })
        ));
    }

    #[test]
    fn missing_rows() {
        let data = [b'N', b'V', b'G', 1, 0, 1, 0, 2, 0, 3, 1, 2, 3];
        assert!(matches!(
            decode(&data),
            Err(Error::MalformedRow { row: 1, .. })
        ));
    }

    #[test]
    fn wrong_version() {
        let data = [b'N', b'V', b'G', 2, 0, 0, 1, 0, 1];
        assert!(matches!(
            decode(&data),
            Err(Error::VersionMismatch { version: 2, expected: 1 })
        ));
    }
}
