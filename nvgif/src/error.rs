use thiserror::Error;

/// Everything that can go wrong while encoding or decoding an NVGIF.
#[derive(Error, Debug)]
pub enum Error {
    #[error("incorrect identifier, got {0:?}")]
    BadMagic([u8; 3]),

    #[error("unsupported NVGIF version {0}")]
    UnsupportedVersion(u8),

    #[error("NVGIF v{version} file handed to the v{expected} codec")]
    VersionMismatch { version: u8, expected: u8 },

    #[error("unsupported compression {compression} for NVGIF v{version}")]
    UnsupportedCompression { compression: String, version: u8 },

    #[error("invalid alpha flag {0}")]
    InvalidAlpha(u8),

    #[error("header truncated, need {needed} bytes but the file has {actual}")]
    TruncatedHeader { needed: usize, actual: usize },

    #[error("row {row}: {reason}")]
    MalformedRow { row: usize, reason: String },

    #[error("malformed payload: {0}")]
    MalformedPayload(String),

    #[error("RLE stream ends mid-run at byte {0}")]
    MalformedRle(usize),

    #[error("dimensions too large: {width}x{height}")]
    DimensionsTooLarge { width: u32, height: u32 },

    #[error("row {row} is {len} bytes, which does not fit a 16-bit length prefix")]
    RowTooLong { row: usize, len: usize },

    #[error("could not write decoded image: {0}")]
    Output(Box<dyn std::error::Error + Send + Sync>),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    pub(crate) fn row(row: usize, reason: impl Into<String>) -> Self {
        Error::MalformedRow {
            row,
            reason: reason.into(),
        }
    }
}
