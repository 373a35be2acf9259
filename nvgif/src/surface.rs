//! In-memory pixel surfaces consumed by the encoders and produced by the
//! decoders.

use std::path::Path;

/// A width×height grid of RGBA pixels which can be read one pixel at a time.
///
/// This is the only thing the encoders need from an image, so any raster
/// library can be hooked up by implementing it.
pub trait ImageSurface {
    /// Width of the image in pixels.
    fn width(&self) -> u32;

    /// Height of the image in pixels.
    fn height(&self) -> u32;

    /// The `[r, g, b, a]` value of the pixel at `(x, y)`.
    fn get_pixel(&self, x: u32, y: u32) -> [u8; 4];
}

/// Saves a decoded surface somewhere, usually to a file in a format owned by
/// an external raster library.
pub trait SurfaceWriter {
    fn write_surface(
        &self,
        surface: &RgbaSurface,
        path: &Path,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;
}

/// An owned RGBA bitmap, 8 bits per channel, stored row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RgbaSurface {
    width: u32,
    height: u32,
    bitmap: Vec<u8>,
}

impl RgbaSurface {
    /// Create a surface with every pixel set to transparent black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            bitmap: vec![0; width as usize * height as usize * 4],
        }
    }

    /// Wrap an existing RGBA8 bitmap.
    ///
    /// Returns [`None`] if the bitmap length is not `width * height * 4`.
    pub fn from_raw(width: u32, height: u32, bitmap: Vec<u8>) -> Option<Self> {
        if bitmap.len() != width as usize * height as usize * 4 {
            return None;
        }

        Some(Self {
            width,
            height,
            bitmap,
        })
    }

    pub fn set_pixel(&mut self, x: u32, y: u32, pixel: [u8; 4]) {
        let offset = self.offset(x, y);
        self.bitmap[offset..offset + 4].copy_from_slice(&pixel);
    }

    /// Borrow the raw RGBA8 bitmap.
    pub fn as_raw(&self) -> &[u8] {
        &self.bitmap
    }

    /// Consume the surface and return the raw RGBA8 bitmap.
    pub fn into_raw(self) -> Vec<u8> {
        self.bitmap
    }

    fn offset(&self, x: u32, y: u32) -> usize {
        assert!(
            x < self.width && y < self.height,
            "pixel ({x}, {y}) out of bounds for {}x{} surface",
            self.width,
            self.height
        );

        (y as usize * self.width as usize + x as usize) * 4
    }
}

impl ImageSurface for RgbaSurface {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn get_pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let offset = self.offset(x, y);
        self.bitmap[offset..offset + 4].try_into().unwrap()
    }
}
