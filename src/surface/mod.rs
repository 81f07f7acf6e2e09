// MIT/Apache2 License

use crate::{
    bits::{pack_pixels, unpack_pixels},
    error::try_alloc,
    BoolOp, Error, NSOpType, Pattern, PixelFormat, Point, Rectangle, Result,
};

/// Provides the `SurfaceFeatures` type.
mod features;
/// Implements `Surface` on `&mut Surface`.
mod mut_impl;
/// Provides the in-memory `Pixmap` surface.
mod pixmap;
/// Provides the register file that runs raster operations against a `Surface`.
mod registers;

pub use features::SurfaceFeatures;
pub use pixmap::Pixmap;
pub use registers::*;

/// A rectangular block of native pixels that raster operations are carried out on.
///
/// `Surface`s are usually windows, offscreen images or plain buffers in memory. The pixel format is
/// fixed when the surface is created. Pixels cross the trait as `u32` values of that format, one
/// per pixel, in top-down rows.
///
/// No matter what, `Surface`s should be capable of the following:
///
/// * Reporting their pixel format, size and [`SurfaceFeatures`].
/// * Combining a block of pixels with the pixels already present using any [`BoolOp`], through
///   `write_pixels()`. Pixels outside of the surface are dropped.
///
/// The remaining methods are implemented in terms of those, but a surface may be able to do them
/// more efficiently using the system drawing API.
///
/// If the `SurfaceFeatures` says that this surface implements additional features, it is also capable
/// of the following. Surfaces lacking a feature should return `NotSupported` when asked to use it:
///
/// * If the `read_back` field is enabled, `read_pixels()` returns the pixels in a rectangle. This is
///   needed for any raster operation that reads the destination, and for `get_image()`.
/// * If the `in_place_combine` field is enabled, raster operations whose destination is only ever
///   combined into may skip the scratch copy of the destination.
pub trait Surface {
    /// The format of the pixels of this surface.
    fn format(&self) -> PixelFormat;

    /// Width and height, in pixels.
    fn size(&self) -> (u32, u32);

    /// Get an enumeration of the features that this `Surface` is capable of.
    ///
    /// See the [`SurfaceFeatures`]
    /// structure for more information.
    fn features(&self) -> SurfaceFeatures;

    /// Set every pixel `d` of `rect` to `op(s, d)`, where `s` is the matching entry of `pixels`.
    fn write_pixels(&mut self, rect: Rectangle, pixels: &[u32], op: BoolOp) -> Result;

    #[inline]
    fn bounds(&self) -> Rectangle {
        let (width, height) = self.size();
        Rectangle::from_size(0, 0, width, height)
    }

    /// Read the pixels of `rect`, which must lie inside of the surface.
    #[inline]
    fn read_pixels(&self, _rect: Rectangle) -> Result<Vec<u32>> {
        Err(Error::NotSupported(NSOpType::ReadBack))
    }

    /// Combine every pixel of `rect` with one pixel value.
    #[inline]
    fn fill_rect(&mut self, rect: Rectangle, pixel: u32, op: BoolOp) -> Result {
        let len = rect.width() as usize * rect.height() as usize;
        let pixels = try_alloc(len, pixel)?;
        self.write_pixels(rect, &pixels, op)
    }

    /// Combine `rect` with a pattern tiled from the origin of the surface.
    #[inline]
    fn fill_pattern(&mut self, rect: Rectangle, pattern: &Pattern, op: BoolOp) -> Result {
        if let Some(pixel) = pattern.solid_pixel() {
            return self.fill_rect(rect, pixel, op);
        }

        let mut pixels = try_alloc(rect.width() as usize * rect.height() as usize, 0u32)?;
        let width = rect.width() as usize;
        for (i, p) in pixels.iter_mut().enumerate() {
            let (x, y) = ((i % width) as i32, (i / width) as i32);
            *p = pattern.pixel_at(rect.x1 + x, rect.y1 + y);
        }
        self.write_pixels(rect, &pixels, op)
    }

    /// Combine the pixels of `src` into the rectangle of the same size at `dst`.
    ///
    /// The source is read in full before anything is written, so the two may overlap.
    #[inline]
    fn copy_area(&mut self, src: Rectangle, dst: Point, op: BoolOp) -> Result {
        let pixels = self.read_pixels(src)?;
        let dst = Rectangle::from_size(dst.x, dst.y, src.width(), src.height());
        self.write_pixels(dst, &pixels, op)
    }

    /// Combine a packed image in the native layout of this surface into `rect`. The image is
    /// top-down with `stride` bytes per row.
    #[inline]
    fn put_image(&mut self, rect: Rectangle, bits: &[u8], stride: usize, op: BoolOp) -> Result {
        let layout = self.format().layout();
        let pixels = unpack_pixels(bits, stride, 0, rect.width(), rect.height(), &layout)?;
        self.write_pixels(rect, &pixels, op)
    }

    /// Pack the pixels of `rect` into the native layout of this surface, top-down.
    #[inline]
    fn get_image(&self, rect: Rectangle) -> Result<Vec<u8>> {
        let pixels = self.read_pixels(rect)?;
        pack_pixels(&pixels, rect.width(), rect.height(), &self.format().layout())
    }
}
