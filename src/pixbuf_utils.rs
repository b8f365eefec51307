//! Conversions between Cairo image surfaces and `GdkPixbuf`.

use gdk_pixbuf::{Colorspace, Pixbuf};
use rgb::FromSlice;

use crate::error::RenderingError;
use crate::surface_utils::{
    AsCairoARGB, PixelOps, ToCairoARGB, ToGdkPixbufRGBA, ToPixel,
};

fn pixbuf_new(width: i32, height: i32) -> Result<Pixbuf, RenderingError> {
    Pixbuf::new(Colorspace::Rgb, true, 8, width, height)
        .ok_or_else(|| RenderingError::OutOfMemory(String::from("creating a Pixbuf")))
}

pub fn empty_pixbuf() -> Result<Pixbuf, RenderingError> {
    // GdkPixbuf does not allow zero-sized pixbufs, but Cairo allows zero-sized
    // surfaces.  In this case, return a 1-pixel transparent pixbuf.

    let pixbuf = pixbuf_new(1, 1)?;
    pixbuf.put_pixel(0, 0, 0, 0, 0, 0);

    Ok(pixbuf)
}

/// Copies a premultiplied `ARgb32` surface into a new, unpremultiplied RGBA pixbuf.
pub fn pixbuf_from_surface(surface: &cairo::ImageSurface) -> Result<Pixbuf, RenderingError> {
    let width = surface.width();
    let height = surface.height();

    if width == 0 || height == 0 {
        return empty_pixbuf();
    }

    let pixbuf = pixbuf_new(width, height)?;

    assert!(pixbuf.colorspace() == Colorspace::Rgb);
    assert!(pixbuf.bits_per_sample() == 8);
    assert!(pixbuf.n_channels() == 4);

    let pixbuf_data = unsafe { pixbuf.pixels() };
    let stride = pixbuf.rowstride() as usize;
    let surface_stride = surface.stride() as usize;
    let row_bytes = width as usize * 4;

    surface.with_data(|data| {
        // We use chunks_mut(), not chunks_exact_mut(), because gdk-pixbuf tends
        // to make the last row *not* have the full stride (i.e. it is
        // only as wide as the pixels in that row).
        pixbuf_data
            .chunks_mut(stride)
            .take(height as usize)
            .map(|row| row.as_rgba_mut())
            .zip(data.chunks(surface_stride))
            .flat_map(|(dest_row, src_row)| {
                src_row[..row_bytes]
                    .as_cairo_argb()
                    .iter()
                    .zip(dest_row.iter_mut())
            })
            .for_each(|(src, dest)| *dest = src.to_pixel().unpremultiply().to_pixbuf_rgba());
    })?;

    Ok(pixbuf)
}

/// Copies a pixbuf into a new `ARgb32` surface, premultiplying its pixels.
///
/// Pixbufs without an alpha channel are copied as opaque.
pub fn surface_from_pixbuf(pixbuf: &Pixbuf) -> Result<cairo::ImageSurface, RenderingError> {
    assert!(pixbuf.colorspace() == Colorspace::Rgb);
    assert!(pixbuf.bits_per_sample() == 8);

    let n_channels = pixbuf.n_channels();
    assert!(n_channels == 3 || n_channels == 4);

    let width = pixbuf.width();
    let height = pixbuf.height();
    let stride = pixbuf.rowstride() as usize;
    let row_bytes = width as usize * n_channels as usize;

    let mut surface = cairo::ImageSurface::create(cairo::Format::ARgb32, width, height)?;
    let surface_stride = surface.stride() as usize;

    let bytes = pixbuf.read_pixel_bytes();
    let pixels: &[u8] = &bytes;

    {
        let mut data = surface.data()?;

        let src_rows = pixels.chunks(stride).take(height as usize);
        let dest_rows = data.chunks_mut(surface_stride);

        for (src_row, dest_row) in src_rows.zip(dest_rows) {
            let dest = dest_row[..width as usize * 4].as_cairo_argb_mut();

            if n_channels == 4 {
                for (src, dest) in src_row[..row_bytes].as_rgba().iter().zip(dest.iter_mut()) {
                    *dest = src.to_pixel().premultiply().to_cairo_argb();
                }
            } else {
                for (src, dest) in src_row[..row_bytes].as_rgb().iter().zip(dest.iter_mut()) {
                    *dest = src.to_pixel().to_cairo_argb();
                }
            }
        }
    }

    Ok(surface)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface_utils::{ImageSurfaceDataExt, Pixel};

    #[test]
    fn empty_pixbuf_is_transparent() {
        let pixbuf = empty_pixbuf().unwrap();

        assert_eq!((pixbuf.width(), pixbuf.height()), (1, 1));
        assert_eq!(&pixbuf.read_pixel_bytes()[..4], &[0, 0, 0, 0]);
    }

    #[test]
    fn unpremultiplies_into_pixbuf() {
        let mut surface = cairo::ImageSurface::create(cairo::Format::ARgb32, 2, 2).unwrap();
        let stride = surface.stride() as usize;

        {
            let mut data = surface.data().unwrap();
            data.set_pixel(stride, Pixel::new(0x40, 0x20, 0x10, 0x80), 0, 0);
            data.set_pixel(stride, Pixel::new(0xff, 0x00, 0x00, 0xff), 1, 1);
        }

        let pixbuf = pixbuf_from_surface(&surface).unwrap();
        let bytes = pixbuf.read_pixel_bytes();
        let row = pixbuf.rowstride() as usize;

        assert_eq!(&bytes[0..4], &[0x80, 0x40, 0x20, 0x80]);
        assert_eq!(&bytes[4..8], &[0, 0, 0, 0]);
        assert_eq!(&bytes[row + 4..row + 8], &[0xff, 0, 0, 0xff]);
    }

    #[test]
    fn premultiplies_from_pixbuf() {
        let pixbuf = Pixbuf::new(Colorspace::Rgb, true, 8, 1, 1).unwrap();
        pixbuf.put_pixel(0, 0, 0x80, 0x40, 0x20, 0x80);

        let mut surface = surface_from_pixbuf(&pixbuf).unwrap();
        let stride = surface.stride() as usize;
        let data = surface.data().unwrap();

        assert_eq!(data.get_pixel(stride, 0, 0), Pixel::new(0x40, 0x20, 0x10, 0x80));
    }

    #[test]
    fn opaque_pixbuf_gets_full_alpha() {
        let pixbuf = Pixbuf::new(Colorspace::Rgb, false, 8, 1, 1).unwrap();
        pixbuf.put_pixel(0, 0, 0x12, 0x34, 0x56, 0);

        let mut surface = surface_from_pixbuf(&pixbuf).unwrap();
        let stride = surface.stride() as usize;
        let data = surface.data().unwrap();

        assert_eq!(data.get_pixel(stride, 0, 0), Pixel::new(0x12, 0x34, 0x56, 0xff));
    }

    #[test]
    fn zero_sized_surface_gives_empty_pixbuf() {
        let surface = cairo::ImageSurface::create(cairo::Format::ARgb32, 0, 0).unwrap();
        let pixbuf = pixbuf_from_surface(&surface).unwrap();

        assert_eq!((pixbuf.width(), pixbuf.height()), (1, 1));
    }
}
