// MIT/Apache2 License

use super::{Surface, SurfaceFeatures};
use crate::{BoolOp, Pattern, PixelFormat, Point, Rectangle, Result};

impl<S: Surface + ?Sized> Surface for &mut S {
    #[inline]
    fn format(&self) -> PixelFormat {
        (**self).format()
    }
    #[inline]
    fn size(&self) -> (u32, u32) {
        (**self).size()
    }
    #[inline]
    fn features(&self) -> SurfaceFeatures {
        (**self).features()
    }
    #[inline]
    fn write_pixels(&mut self, rect: Rectangle, pixels: &[u32], op: BoolOp) -> Result {
        (**self).write_pixels(rect, pixels, op)
    }
    #[inline]
    fn bounds(&self) -> Rectangle {
        (**self).bounds()
    }
    #[inline]
    fn read_pixels(&self, rect: Rectangle) -> Result<Vec<u32>> {
        (**self).read_pixels(rect)
    }
    #[inline]
    fn fill_rect(&mut self, rect: Rectangle, pixel: u32, op: BoolOp) -> Result {
        (**self).fill_rect(rect, pixel, op)
    }
    #[inline]
    fn fill_pattern(&mut self, rect: Rectangle, pattern: &Pattern, op: BoolOp) -> Result {
        (**self).fill_pattern(rect, pattern, op)
    }
    #[inline]
    fn copy_area(&mut self, src: Rectangle, dst: Point, op: BoolOp) -> Result {
        (**self).copy_area(src, dst, op)
    }
    #[inline]
    fn put_image(&mut self, rect: Rectangle, bits: &[u8], stride: usize, op: BoolOp) -> Result {
        (**self).put_image(rect, bits, stride, op)
    }
    #[inline]
    fn get_image(&self, rect: Rectangle) -> Result<Vec<u8>> {
        (**self).get_image(rect)
    }
}
