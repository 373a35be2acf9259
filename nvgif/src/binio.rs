use std::io::Write;

use byteorder::{ByteOrder, WriteBytesExt, BE};
use log::trace;

use crate::{
    compression::rle,
    error::Error,
    operations::{extract_row, into_surface, push_row},
    surface::{ImageSurface, RgbaSurface},
};

/// Writes length-prefixed rows, each prefix a big-endian `u16`.
pub struct RowWriter<'a, O: Write + WriteBytesExt> {
    output: &'a mut O,
    row: usize,
}

impl<'a, O: Write + WriteBytesExt> RowWriter<'a, O> {
    pub fn new(output: &'a mut O) -> Self {
        Self { output, row: 0 }
    }

    /// Write one row chunk, failing if it can't be described by the prefix.
    pub fn write_row(&mut self, chunk: &[u8]) -> Result<(), Error> {
        let len = u16::try_from(chunk.len()).map_err(|_| Error::RowTooLong {
            row: self.row,
            len: chunk.len(),
        })?;

        self.output.write_u16::<BE>(len)?;
        self.output.write_all(chunk)?;
        self.row += 1;

        Ok(())
    }
}

/// Reads length-prefixed rows back out of a buffer.
pub struct RowReader<'a> {
    input: &'a [u8],
    offset: usize,
    row: usize,
}

impl<'a> RowReader<'a> {
    pub fn new(input: &'a [u8]) -> Self {
        Self {
            input,
            offset: 0,
            row: 0,
        }
    }

    /// Index of the next row to be read.
    pub fn row(&self) -> usize {
        self.row
    }

    /// Number of bytes not yet consumed.
    pub fn remaining(&self) -> usize {
        self.input.len() - self.offset
    }

    /// Read the next row chunk, exactly as it was written.
    pub fn read_row(&mut self) -> Result<&'a [u8], Error> {
        if self.remaining() < 2 {
            return Err(Error::row(self.row, "missing length prefix"));
        }

        let input = self.input;
        let len = BE::read_u16(&input[self.offset..]) as usize;
        self.offset += 2;

        let chunk = input
            .get(self.offset..self.offset + len)
            .ok_or_else(|| {
                Error::row(
                    self.row,
                    format!("truncated row, declared {len} bytes but {} remain", self.remaining()),
                )
            })?;

        self.offset += len;
        self.row += 1;

        Ok(chunk)
    }
}

/// Write every scanline of `surface` as a row, optionally run-length encoded
/// with `bpp`-sized units.
pub fn write_rows<S, O>(surface: &S, bpp: usize, rle: bool, output: &mut O) -> Result<(), Error>
where
    S: ImageSurface + ?Sized,
    O: Write + WriteBytesExt,
{
    let mut writer = RowWriter::new(output);
    for y in 0..surface.height() {
        let row = extract_row(surface, y, bpp);

        if rle {
            let encoded = rle::encode(&row, bpp);
            trace!("row {y}: {} raw bytes, {} encoded", row.len(), encoded.len());
            writer.write_row(&encoded)?;
        } else {
            writer.write_row(&row)?;
        }
    }

    Ok(())
}

/// Read `height` rows of `width` pixels from `reader`, the inverse of
/// [`write_rows`].
pub fn read_rows(
    reader: &mut RowReader,
    width: u16,
    height: u16,
    bpp: usize,
    rle: bool,
) -> Result<RgbaSurface, Error> {
    let expected = width as usize * bpp;
    let mut bitmap = Vec::new();

    for _ in 0..height {
        let row_index = reader.row();
        let chunk = reader.read_row()?;

        let decoded;
        let row = if rle {
            decoded = rle::decode(chunk, bpp)
                .map_err(|e| Error::row(row_index, e.to_string()))?;
            &decoded[..]
        } else {
            chunk
        };

        if row.len() != expected {
            return Err(Error::row(
                row_index,
                format!("length mismatch: {} vs expected {expected}", row.len()),
            ));
        }

        push_row(&mut bitmap, row, bpp);
    }

    into_surface(width, height, bitmap)
}
