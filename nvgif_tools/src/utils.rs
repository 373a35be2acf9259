use std::{
    io::{self, Write},
    path::Path,
};

use image::{ColorType, DynamicImage, ImageFormat, RgbaImage};
use log::{info, Level};
use nvgif::{CompressionName, HeaderInfo, ImageSurface, RgbaSurface, SurfaceWriter};
use text_io::read;

pub enum Assume {
    Yes,
    No,
}

pub fn compression_name(s: &str) -> Result<CompressionName, String> {
    if !s.is_ascii() {
        return Err(format!("Invalid compression {}", s))
    }

    s.parse()
}

/// The color type a decoded image is saved with, based on what the output
/// format can store.
pub fn output_color_type(path: &Path) -> ColorType {
    match ImageFormat::from_path(path) {
        Ok(ImageFormat::Jpeg) => ColorType::Rgb8,
        _ => ColorType::Rgba8,
    }
}

/// Saves decoded surfaces with the `image` crate, which picks the format from
/// the file extension.
pub struct ImageWriter;

impl SurfaceWriter for ImageWriter {
    fn write_surface(
        &self,
        surface: &RgbaSurface,
        path: &Path,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let image = RgbaImage::from_raw(surface.width(), surface.height(), surface.as_raw().to_vec())
            .ok_or("surface bitmap does not match its dimensions")?;

        let color_type = output_color_type(path);
        info!("saving {path:?} as {color_type:?}");

        match color_type {
            ColorType::Rgb8 => DynamicImage::ImageRgba8(image).into_rgb8().save(path)?,
            _ => image.save(path)?,
        }

        Ok(())
    }
}

/// One line summary of a header, e.g. `NVGIF v4 — 640×480, compression=RLE+Zlib, alpha=Yes`.
pub fn describe(header: &HeaderInfo) -> String {
    let mut out = format!(
        "NVGIF v{} — {}×{}",
        header.version as u8, header.width, header.height
    );

    if let Some(compression) = header.compression {
        let name = match compression {
            CompressionName::None => "None",
            CompressionName::Rle => "RLE",
            CompressionName::Zlib => "Zlib",
            CompressionName::RleZlib => "RLE+Zlib",
        };
        let alpha = if header.alpha.unwrap_or(false) { "Yes" } else { "No" };

        out.push_str(&format!(", compression={name}, alpha={alpha}"));
    }

    out
}

/// Set up logging, `verbose` is the number of times `-v` was given
pub fn setup_logger(verbose: u8) -> anyhow::Result<()> {
    let log_level = match verbose {
        0 => Level::Warn,
        1 => Level::Info,
        2 => Level::Debug,
        _ => Level::Trace,
    };

    simple_logger::init_with_level(log_level)?;

    info!("Log level: {}", log_level);
    Ok(())
}

pub fn exists_decision<P: AsRef<Path>>(place: &str, action: &str, path: &P, assume: Option<Assume>) -> bool {
    let path = path.as_ref();

    match assume {
        Some(Assume::Yes) => return true,
        Some(Assume::No) => return false,
        None => (),
    }

    loop {
        print!("{place} file {path:?} already exists. {action}? [y/N] ");
        let _ = io::stdout().flush();

        let opt: String = read!("{}\n");
        let opt = opt.to_lowercase();

        if opt == "y" {
            return true
        } else if opt.is_empty() || opt == "n" {
            return false
        }
    }
}

#[cfg(test)]
mod tests {
    use nvgif::Version;

    use super::*;

    #[test]
    fn describe_v1() {
        let header = HeaderInfo {
            version: Version::V1,
            width: 3,
            height: 2,
            compression: None,
            alpha: None,
        };
        assert_eq!(describe(&header), "NVGIF v1 — 3×2");
    }

    #[test]
    fn describe_v4() {
        let header = HeaderInfo {
            version: Version::V4,
            width: 640,
            height: 480,
            compression: Some(CompressionName::RleZlib),
            alpha: Some(true),
        };
        assert_eq!(
            describe(&header),
            "NVGIF v4 — 640×480, compression=RLE+Zlib, alpha=Yes"
        );
    }

    #[test]
    fn jpeg_drops_alpha() {
        assert_eq!(output_color_type(Path::new("out.jpg")), ColorType::Rgb8);
        assert_eq!(output_color_type(Path::new("out.jpeg")), ColorType::Rgb8);
        assert_eq!(output_color_type(Path::new("out.png")), ColorType::Rgba8);
        assert_eq!(output_color_type(Path::new("out")), ColorType::Rgba8);
    }

    #[test]
    fn writes_jpeg_from_rgba_surface() {
        let surface = RgbaSurface::from_raw(2, 2, [10, 20, 30, 128].repeat(4)).unwrap();
        let path = std::env::temp_dir().join(format!("nvgif-tools-{}.jpg", std::process::id()));

        ImageWriter.write_surface(&surface, &path).unwrap();
        let saved = image::open(&path).unwrap();
        assert_eq!((saved.width(), saved.height()), (2, 2));
        assert!(!saved.color().has_alpha());

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn compression_flag() {
        assert_eq!(compression_name("rlezlib"), Ok(CompressionName::RleZlib));
        assert!(compression_name("lz4").is_err());
    }
}
