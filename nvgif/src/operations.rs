use crate::{
    error::Error,
    surface::{ImageSurface, RgbaSurface},
};

/// Bytes per pixel for a given alpha flag.
pub fn bpp(alpha: bool) -> usize {
    if alpha {
        4
    } else {
        3
    }
}

/// Width and height as the 16 bit values the headers store.
pub fn dimensions<S: ImageSurface + ?Sized>(surface: &S) -> Result<(u16, u16), Error> {
    let (width, height) = (surface.width(), surface.height());

    match (u16::try_from(width), u16::try_from(height)) {
        (Ok(w), Ok(h)) => Ok((w, h)),
        _ => Err(Error::DimensionsTooLarge { width, height }),
    }
}

/// Pull scanline `y` out of a surface as packed RGB or RGBA bytes.
pub fn extract_row<S: ImageSurface + ?Sized>(surface: &S, y: u32, bpp: usize) -> Vec<u8> {
    let mut row = Vec::with_capacity(surface.width() as usize * bpp);
    for x in 0..surface.width() {
        row.extend_from_slice(&surface.get_pixel(x, y)[..bpp]);
    }

    row
}

/// The whole surface as one row-major buffer of RGB or RGBA bytes.
pub fn extract_frame<S: ImageSurface + ?Sized>(surface: &S, bpp: usize) -> Vec<u8> {
    let mut frame = Vec::with_capacity(surface.width() as usize * surface.height() as usize * bpp);
    for y in 0..surface.height() {
        frame.extend(extract_row(surface, y, bpp));
    }

    frame
}

/// Append packed RGB or RGBA bytes to an RGBA bitmap. RGB pixels become opaque.
pub fn push_row(bitmap: &mut Vec<u8>, row: &[u8], bpp: usize) {
    bitmap.reserve(row.len() / bpp * 4);
    for px in row.chunks_exact(bpp) {
        let alpha = if bpp == 4 { px[3] } else { 255 };
        bitmap.extend_from_slice(&[px[0], px[1], px[2], alpha]);
    }
}

/// Turn a bitmap built up with [`push_row`] into a surface.
///
/// Decoders never size a bitmap from the header alone, it only grows with the
/// rows the payload actually holds.
pub fn into_surface(width: u16, height: u16, bitmap: Vec<u8>) -> Result<RgbaSurface, Error> {
    let len = bitmap.len();
    RgbaSurface::from_raw(width.into(), height.into(), bitmap).ok_or_else(|| {
        Error::MalformedPayload(format!(
            "decoded {len} bytes of RGBA for a {width}x{height} image"
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> RgbaSurface {
        RgbaSurface::from_raw(2, 1, vec![1, 2, 3, 4, 5, 6, 7, 8]).unwrap()
    }

    #[test]
    fn extract_drops_alpha_for_rgb() {
        assert_eq!(extract_row(&sample(), 0, 3), vec![1, 2, 3, 5, 6, 7]);
        assert_eq!(extract_row(&sample(), 0, 4), vec![1, 2, 3, 4, 5, 6, 7, 8]);
    }

    #[test]
    fn push_rgb_is_opaque() {
        let mut bitmap = Vec::new();
        push_row(&mut bitmap, &[1, 2, 3, 5, 6, 7], 3);
        push_row(&mut bitmap, &[9, 9, 9, 0], 4);
        assert_eq!(bitmap, vec![1, 2, 3, 255, 5, 6, 7, 255, 9, 9, 9, 0]);
    }

    #[test]
    fn surface_size_must_match() {
        let surface = into_surface(1, 2, vec![1, 1, 1, 1, 2, 2, 2, 2]).unwrap();
        assert_eq!(surface.get_pixel(0, 1), [2, 2, 2, 2]);

        assert!(matches!(
            into_surface(2, 2, vec![0; 8]),
            Err(Error::MalformedPayload(_))
        ));
    }

    #[test]
    fn frame_is_row_major() {
        let surface = RgbaSurface::from_raw(1, 2, vec![1, 1, 1, 1, 2, 2, 2, 2]).unwrap();
        assert_eq!(extract_frame(&surface, 3), vec![1, 1, 1, 2, 2, 2]);
    }

    #[test]
    fn dimensions_fit_u16() {
        assert_eq!(dimensions(&RgbaSurface::new(3, 7)).unwrap(), (3, 7));
    }

    struct Huge;

    impl ImageSurface for Huge {
        fn width(&self) -> u32 {
            70_000
        }

        fn height(&self) -> u32 {
            1
        }

        fn get_pixel(&self, _x: u32, _y: u32) -> [u8; 4] {
            [0; 4]
        }
    }

    #[test]
    fn oversized_dimensions() {
        assert!(matches!(
            dimensions(&Huge),
            Err(Error::DimensionsTooLarge { width: 70_000, height: 1 })
        ));
    }
}
