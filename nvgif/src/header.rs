use std::{fmt, io::Read, str::FromStr};

use crate::{
    codec::{v1, v2, v3, v4},
    error::Error,
};

/// Identifier at the start of every NVGIF file, whatever the version.
pub const MAGIC: [u8; 3] = *b"NVG";

/// Length of the magic plus the version byte.
pub const PREAMBLE_LEN: usize = 4;

/// Compression used when the caller does not ask for one, indexed by
/// `version - 1`.
const DEFAULT_COMPRESSIONS: [CompressionName; 4] = [
    CompressionName::None,
    CompressionName::Rle,
    CompressionName::Rle,
    CompressionName::RleZlib,
];

/// The on-disk versions of the format.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Version {
    /// Fixed RGB, no compression.
    V1 = 1,

    /// RGB with optional per-row RLE.
    V2 = 2,

    /// Optional alpha channel.
    V3 = 3,

    /// Whole-frame zlib compression.
    V4 = 4,
}

impl Version {
    pub const ALL: [Version; 4] = [Version::V1, Version::V2, Version::V3, Version::V4];

    /// The compression this version is written with when none is given.
    pub fn default_compression(self) -> CompressionName {
        DEFAULT_COMPRESSIONS[self as usize - 1]
    }

    /// Total header length, magic and version byte included.
    pub fn header_len(self) -> usize {
        match self {
            Version::V1 => v1::Header::LEN,
            Version::V2 => v2::Header::LEN,
            Version::V3 => v3::Header::LEN,
            Version::V4 => v4::Header::LEN,
        }
    }
}

impl TryFrom<u8> for Version {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Ok(match value {
            1 => Self::V1,
            2 => Self::V2,
            3 => Self::V3,
            4 => Self::V4,
            v => return Err(Error::UnsupportedVersion(v)),
        })
    }
}

impl From<Version> for u8 {
    fn from(version: Version) -> u8 {
        version as u8
    }
}

/// Version independent names for the compression modes.
///
/// Which of these a file can use depends on its version, each version codec
/// maps them onto its own numeric constants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompressionName {
    /// Raw bytes
    None,

    /// Per-row run-length encoding
    Rle,

    /// The whole frame compressed with zlib
    Zlib,

    /// Per-row RLE, then the whole stream compressed with zlib
    RleZlib,
}

impl CompressionName {
    pub fn as_str(&self) -> &'static str {
        match self {
            CompressionName::None => "none",
            CompressionName::Rle => "rle",
            CompressionName::Zlib => "zlib",
            CompressionName::RleZlib => "rlezlib",
        }
    }
}

impl fmt::Display for CompressionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CompressionName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.to_ascii_lowercase().as_str() {
            "none" => Self::None,
            "rle" => Self::Rle,
            "zlib" => Self::Zlib,
            "rlezlib" => Self::RleZlib,
            _ => return Err(format!("invalid compression {s}")),
        })
    }
}

/// Check the magic and return the raw version byte.
pub(crate) fn read_preamble(data: &[u8]) -> Result<u8, Error> {
    if data.len() < PREAMBLE_LEN {
        return Err(Error::TruncatedHeader {
            needed: PREAMBLE_LEN,
            actual: data.len(),
        });
    }

    let magic: [u8; 3] = [data[0], data[1], data[2]];
    if magic != MAGIC {
        return Err(Error::BadMagic(magic));
    }

    Ok(data[3])
}

/// Like [`read_preamble`], but for codecs that only accept one version.
pub(crate) fn expect_version(data: &[u8], expected: Version, header_len: usize) -> Result<(), Error> {
    let version = read_preamble(data)?;
    if version != expected as u8 {
        return Err(Error::VersionMismatch {
            version,
            expected: expected as u8,
        });
    }

    if data.len() < header_len {
        return Err(Error::TruncatedHeader {
            needed: header_len,
            actual: data.len(),
        });
    }

    Ok(())
}

/// A summary of any version's header, without touching the payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderInfo {
    pub version: Version,

    /// Width of the image in pixels.
    pub width: u16,

    /// Height of the image in pixels.
    pub height: u16,

    /// [`None`] for v1, which has no compression field.
    pub compression: Option<CompressionName>,

    /// [`None`] for v1 and v2, which are always RGB.
    pub alpha: Option<bool>,
}

impl HeaderInfo {
    /// Parse the header at the start of `data`.
    pub fn parse(data: &[u8]) -> Result<Self, Error> {
        let version = Version::try_from(read_preamble(data)?)?;

        Ok(match version {
            Version::V1 => {
                let header = v1::Header::read_from(data)?;
                HeaderInfo {
                    version,
                    width: header.width,
                    height: header.height,
                    compression: None,
                    alpha: None,
                }
            }
            Version::V2 => {
                let header = v2::Header::read_from(data)?;
                HeaderInfo {
                    version,
                    width: header.width,
                    height: header.height,
                    compression: Some(header.compression.name()),
                    alpha: None,
                }
            }
            Version::V3 => {
                let header = v3::Header::read_from(data)?;
                HeaderInfo {
                    version,
                    width: header.width,
                    height: header.height,
                    compression: Some(header.compression.name()),
                    alpha: Some(header.alpha),
                }
            }
            Version::V4 => {
                let header = v4::Header::read_from(data)?;
                HeaderInfo {
                    version,
                    width: header.width,
                    height: header.height,
                    compression: Some(header.compression.name()),
                    alpha: Some(header.alpha),
                }
            }
        })
    }

    /// Read just enough of `input` to parse the header.
    pub fn read_from<T: Read>(input: &mut T) -> Result<Self, Error> {
        let mut buf = vec![0u8; PREAMBLE_LEN];
        read_header_bytes(input, &mut buf, PREAMBLE_LEN)?;

        let version = Version::try_from(read_preamble(&buf)?)?;
        let header_len = version.header_len();

        buf.resize(header_len, 0);
        read_header_bytes(input, &mut buf[PREAMBLE_LEN..], header_len)?;

        Self::parse(&buf)
    }
}

fn read_header_bytes<T: Read>(input: &mut T, buf: &mut [u8], needed: usize) -> Result<(), Error> {
    let wanted = buf.len();
    let mut filled = 0;
    while filled < wanted {
        match input.read(&mut buf[filled..])? {
            0 => {
                return Err(Error::TruncatedHeader {
                    needed,
                    actual: needed - wanted + filled,
                })
            }
            n => filled += n,
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    #[test]
    fn default_table() {
        assert_eq!(Version::V1.default_compression(), CompressionName::None);
        assert_eq!(Version::V2.default_compression(), CompressionName::Rle);
        assert_eq!(Version::V3.default_compression(), CompressionName::Rle);
        assert_eq!(Version::V4.default_compression(), CompressionName::RleZlib);
    }

    #[test]
    fn compression_names() {
        for name in ["none", "rle", "zlib", "rlezlib"] {
            assert_eq!(name.parse::<CompressionName>().unwrap().to_string(), name);
        }
        assert_eq!("RLE".parse::<CompressionName>(), Ok(CompressionName::Rle));
        assert!("lzw".parse::<CompressionName>().is_err());
    }

    #[test]
    fn bad_magic() {
        let data = b"XYZ\x01\x00\x01\x00\x01\x00\x03\x01\x02\x03";
        assert!(matches!(read_preamble(data), Err(Error::BadMagic(m)) if &m == b"XYZ"));
        assert!(matches!(HeaderInfo::parse(data), Err(Error::BadMagic(_))));
    }

    #[test]
    fn unknown_version() {
        let data = b"NVG\x07\x00\x00\x00\x00\x00\x00\x00";
        assert!(matches!(
            HeaderInfo::parse(data),
            Err(Error::UnsupportedVersion(7))
        ));
    }

    #[test]
    fn too_short_for_preamble() {
        assert!(matches!(
            read_preamble(b"NV"),
            Err(Error::TruncatedHeader { needed: 4, actual: 2 })
        ));
    }

    #[test]
    fn info_for_each_version() {
        let v1 = HeaderInfo::parse(b"NVG\x01\x00\x02\x00\x03").unwrap();
        assert_eq!((v1.width, v1.height), (2, 3));
        assert_eq!(v1.compression, None);
        assert_eq!(v1.alpha, None);

        let v2 = HeaderInfo::parse(b"NVG\x02\x01\x00\x02\x00\x03").unwrap();
        assert_eq!(v2.compression, Some(CompressionName::Rle));
        assert_eq!(v2.alpha, None);

        let v3 = HeaderInfo::parse(b"NVG\x03\x00\x01\x01\x00\x00\x01").unwrap();
        assert_eq!(v3.compression, Some(CompressionName::None));
        assert_eq!(v3.alpha, Some(true));
        assert_eq!((v3.width, v3.height), (256, 1));

        let v4 = HeaderInfo::parse(b"NVG\x04\x03\x00\x00\x04\x00\x04\x00").unwrap();
        assert_eq!(v4.version, Version::V4);
        assert_eq!(v4.compression, Some(CompressionName::RleZlib));
        assert_eq!(v4.alpha, Some(false));
    }

    #[test]
    fn read_from_stops_after_header() {
        let mut input = Cursor::new(b"NVG\x02\x00\x00\x01\x00\x01\x00\x03\x01\x02\x03".to_vec());
        let info = HeaderInfo::read_from(&mut input).unwrap();

        assert_eq!(info.version, Version::V2);
        assert_eq!(input.position(), 9);
    }

    #[test]
    fn read_from_truncated() {
        let mut input = Cursor::new(b"NVG\x04\x01\x00".to_vec());
        assert!(matches!(
            HeaderInfo::read_from(&mut input),
            Err(Error::TruncatedHeader { needed: 11, actual: 6 })
        ));
    }
}
