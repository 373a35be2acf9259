//! NVGIF is a family of small raster image formats. There are four on-disk
//! versions, each one adding a feature to the previous:
//!
//! | version | pixels      | compression                         |
//! |---------|-------------|-------------------------------------|
//! | 1       | RGB         | none                                |
//! | 2       | RGB         | none, per-row RLE                   |
//! | 3       | RGB or RGBA | none, per-row RLE                   |
//! | 4       | RGB or RGBA | none, per-row RLE, zlib, RLE + zlib |
//!
//! Every file starts with the magic `NVG` and a version byte, which together
//! decide how the rest of the file is read. The [`format`] functions look at
//! that header and hand the work to the matching codec in [`codec`].
//!
//! Loading and saving other raster formats is left to other crates. Anything
//! implementing [`ImageSurface`] can be encoded, and decoding produces an
//! [`RgbaSurface`].
//!
//! # Example
//! ## Encoding an image
//! ```no_run
//! use nvgif::{CompressionName, EncodeOptions, RgbaSurface};
//!
//! let bitmap = vec![
//!     0xFF, 0xFF, 0xFF, 0xFF,
//!     0x00, 0x80, 0x00, 0x80,
//!     0xFF, 0xFF, 0xFF, 0xFF,
//!     0x00, 0x80, 0x00, 0x80,
//! ];
//! let surface = RgbaSurface::from_raw(2, 2, bitmap).unwrap();
//!
//! let options = EncodeOptions::new(4)
//!     .compression(CompressionName::Zlib)
//!     .alpha(true);
//!
//! nvgif::save(&surface, "my_image.nvg", &options).expect("Could not save the image");
//! ```
//!
//! ## Decoding an image
//! ```no_run
//! let image = nvgif::open("my_image.nvg").expect("Could not open file");
//!
//! // Or just look at the header
//! let info = nvgif::info("my_image.nvg").expect("Could not read header");
//! println!("{}x{} v{}", info.width, info.height, info.version as u8);
//! ```

mod binio;
mod operations;

pub mod codec;
pub mod compression;
pub mod error;
pub mod format;
pub mod header;
pub mod surface;

// ----------------------- //
// INLINED USEFUL FEATURES //
// ----------------------- //
#[doc(inline)]
pub use error::Error;

#[doc(inline)]
pub use format::{decode, encode, info, open, open_to, save, Codec, EncodeOptions};

#[doc(inline)]
pub use header::{CompressionName, HeaderInfo, Version, MAGIC};

#[doc(inline)]
pub use surface::{ImageSurface, RgbaSurface, SurfaceWriter};

#[doc(inline)]
pub use compression::zlib::{FrameCompressor, Zlib};
