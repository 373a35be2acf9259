//! Picks the right version codec for a file or a set of encoding options.

use std::{
    fs::{self, File},
    io::Read,
    path::Path,
};

use log::{debug, info};

use crate::{
    codec::{v1, v2, v3, v4},
    error::Error,
    header::{read_preamble, CompressionName, HeaderInfo, Version, PREAMBLE_LEN},
    surface::{ImageSurface, RgbaSurface, SurfaceWriter},
};

/// What the caller asked for when encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodeOptions {
    /// Format version, `1..=4`.
    pub version: u8,

    /// Compression to use. [`None`] picks the version's default.
    pub compression: Option<CompressionName>,

    /// Keep the alpha channel. Only v3 and v4 can store it.
    pub alpha: bool,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        Self {
            version: 4,
            compression: None,
            alpha: false,
        }
    }
}

impl EncodeOptions {
    pub fn new(version: u8) -> Self {
        Self {
            version,
            ..Default::default()
        }
    }

    pub fn compression(mut self, compression: CompressionName) -> Self {
        self.compression = Some(compression);
        self
    }

    pub fn alpha(mut self, alpha: bool) -> Self {
        self.alpha = alpha;
        self
    }
}

/// A fully resolved codec choice, with that version's own constants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Codec {
    V1,
    V2(v2::Compression),
    V3 {
        compression: v3::Compression,
        alpha: bool,
    },
    V4 {
        compression: v4::Compression,
        alpha: bool,
    },
}

impl Codec {
    /// Validate `options` and turn them into a concrete codec.
    pub fn resolve(options: &EncodeOptions) -> Result<Self, Error> {
        let version = Version::try_from(options.version)?;
        let name = options
            .compression
            .unwrap_or_else(|| version.default_compression());

        Ok(match version {
            Version::V1 => {
                if options.compression.is_some() || options.alpha {
                    debug!("NVGIF v1 has no compression or alpha, ignoring them");
                }
                Codec::V1
            }
            Version::V2 => {
                if options.alpha {
                    debug!("NVGIF v2 has no alpha channel, ignoring it");
                }
                Codec::V2(v2::Compression::from_name(name)?)
            }
            Version::V3 => Codec::V3 {
                compression: v3::Compression::from_name(name)?,
                alpha: options.alpha,
            },
            Version::V4 => Codec::V4 {
                compression: v4::Compression::from_name(name),
                alpha: options.alpha,
            },
        })
    }

    pub fn version(&self) -> Version {
        match self {
            Codec::V1 => Version::V1,
            Codec::V2(_) => Version::V2,
            Codec::V3 { .. } => Version::V3,
            Codec::V4 { .. } => Version::V4,
        }
    }

    /// Encode `surface` into a new buffer.
    pub fn encode<S: ImageSurface + ?Sized>(&self, surface: &S) -> Result<Vec<u8>, Error> {
        let mut output = Vec::new();
        match *self {
            Codec::V1 => v1::encode(surface, &mut output)?,
            Codec::V2(compression) => v2::encode(surface, compression, &mut output)?,
            Codec::V3 { compression, alpha } => v3::encode(surface, compression, alpha, &mut output)?,
            Codec::V4 { compression, alpha } => v4::encode(surface, compression, alpha, &mut output)?,
        }

        Ok(output)
    }
}

/// Encode `surface` into memory according to `options`.
pub fn encode<S: ImageSurface + ?Sized>(surface: &S, options: &EncodeOptions) -> Result<Vec<u8>, Error> {
    Codec::resolve(options)?.encode(surface)
}

/// Encode `surface` and write it to `path`.
///
/// The file is only created once encoding has succeeded.
pub fn save<S, P>(surface: &S, path: P, options: &EncodeOptions) -> Result<(), Error>
where
    S: ImageSurface + ?Sized,
    P: AsRef<Path>,
{
    let codec = Codec::resolve(options)?;
    let data = codec.encode(surface)?;

    fs::write(path.as_ref(), &data)?;
    info!(
        "wrote {} bytes of NVGIF v{} to {:?}",
        data.len(),
        codec.version() as u8,
        path.as_ref()
    );

    Ok(())
}

/// Decode a complete NVGIF of any version from memory.
pub fn decode(data: &[u8]) -> Result<RgbaSurface, Error> {
    let version = Version::try_from(read_preamble(data)?)?;
    debug!("dispatching to the NVGIF v{} decoder", version as u8);

    match version {
        Version::V1 => v1::decode(data),
        Version::V2 => v2::decode(data),
        Version::V3 => v3::decode(data),
        Version::V4 => v4::decode(data),
    }
}

/// Open and decode an NVGIF file.
///
/// Only the magic and version byte are read before deciding whether to read
/// the rest of the file.
pub fn open<P: AsRef<Path>>(path: P) -> Result<RgbaSurface, Error> {
    let mut file = File::open(path.as_ref())?;

    let mut data = vec![0u8; PREAMBLE_LEN];
    let read = read_up_to(&mut file, &mut data)?;
    data.truncate(read);

    Version::try_from(read_preamble(&data)?)?;

    file.read_to_end(&mut data)?;
    decode(&data)
}

/// Open and decode an NVGIF file, then hand the result to `writer` to be
/// saved at `out`. This works the same way for every version.
///
/// The decoded surface is returned as well.
pub fn open_to<P, Q, W>(path: P, out: Q, writer: &W) -> Result<RgbaSurface, Error>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
    W: SurfaceWriter + ?Sized,
{
    let surface = open(path)?;
    writer
        .write_surface(&surface, out.as_ref())
        .map_err(Error::Output)?;

    Ok(surface)
}

/// Read only the header of an NVGIF file.
pub fn info<P: AsRef<Path>>(path: P) -> Result<HeaderInfo, Error> {
    let mut file = File::open(path.as_ref())?;
    HeaderInfo::read_from(&mut file)
}

fn read_up_to<R: Read>(input: &mut R, buf: &mut [u8]) -> Result<usize, Error> {
    let mut filled = 0;
    while filled < buf.len() {
        match input.read(&mut buf[filled..])? {
            0 => break,
            n => filled += n,
        }
    }

    Ok(filled)
}
