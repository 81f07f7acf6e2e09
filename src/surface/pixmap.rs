// MIT/Apache2 License

use super::{Surface, SurfaceFeatures};
use crate::{error::try_alloc, BoolOp, Error, PixelFormat, Rectangle, Result};

/// A surface held in memory, one `u32` per pixel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pixmap {
    width: u32,
    height: u32,
    format: PixelFormat,
    pixels: Vec<u32>,
}

impl Pixmap {
    /// Create a pixmap with every pixel set to zero.
    #[inline]
    pub fn new(width: u32, height: u32, format: PixelFormat) -> Result<Self> {
        let pixels = try_alloc(width as usize * height as usize, 0u32)?;
        Ok(Self {
            width,
            height,
            format,
            pixels,
        })
    }

    /// Create a pixmap out of top-down rows of pixels.
    #[inline]
    pub fn from_pixels(width: u32, height: u32, format: PixelFormat, pixels: Vec<u32>) -> Result<Self> {
        if pixels.len() != width as usize * height as usize {
            return Err(Error::BadParameter("pixel count does not match pixmap size"));
        }
        let mask = format.pixel_mask();
        let pixels = pixels.into_iter().map(|p| p & mask).collect();
        Ok(Self {
            width,
            height,
            format,
            pixels,
        })
    }

    #[inline]
    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> Option<u32> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels
            .get(y as usize * self.width as usize + x as usize)
            .copied()
    }
}

impl Surface for Pixmap {
    #[inline]
    fn format(&self) -> PixelFormat {
        self.format
    }

    #[inline]
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    #[inline]
    fn features(&self) -> SurfaceFeatures {
        SurfaceFeatures {
            in_place_combine: true,
            read_back: true,
        }
    }

    fn write_pixels(&mut self, rect: Rectangle, pixels: &[u32], op: BoolOp) -> Result {
        let rect_width = rect.width() as usize;
        if pixels.len() != rect_width * rect.height() as usize {
            return Err(Error::BadParameter("pixel count does not match rectangle"));
        }

        let clipped = match rect.intersection(&self.bounds()) {
            Some(clipped) => clipped,
            None => return Ok(()),
        };

        let mask = self.format.pixel_mask();
        let width = self.width as usize;
        let (dx, dy) = ((clipped.x1 - rect.x1) as usize, (clipped.y1 - rect.y1) as usize);

        for row in 0..clipped.height() as usize {
            let src_start = (dy + row) * rect_width + dx;
            let src = &pixels[src_start..src_start + clipped.width() as usize];
            let dst_start = (clipped.y1 as usize + row) * width + clipped.x1 as usize;
            let dst = &mut self.pixels[dst_start..dst_start + clipped.width() as usize];
            for (d, &s) in dst.iter_mut().zip(src) {
                *d = op.apply(s, *d) & mask;
            }
        }

        Ok(())
    }

    fn read_pixels(&self, rect: Rectangle) -> Result<Vec<u32>> {
        if !self.bounds().contains(&rect) {
            return Err(Error::BadParameter("rectangle lies outside of the pixmap"));
        }

        let mut out = try_alloc(rect.width() as usize * rect.height() as usize, 0u32)?;
        if rect.is_empty() {
            return Ok(out);
        }

        let width = self.width as usize;
        for (row, dst) in out.chunks_exact_mut(rect.width() as usize).enumerate() {
            let start = (rect.y1 as usize + row) * width + rect.x1 as usize;
            dst.copy_from_slice(&self.pixels[start..start + dst.len()]);
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ByteOrder, Pattern, Point};

    #[test]
    fn test_writes_are_clipped() {
        let mut pixmap = Pixmap::new(2, 2, PixelFormat::indexed(8)).unwrap();
        pixmap
            .write_pixels(Rectangle::new(-1, -1, 1, 1), &[1, 2, 3, 4], BoolOp::Copy)
            .unwrap();
        assert_eq!(pixmap.pixels(), &[4, 0, 0, 0]);
        assert!(pixmap
            .write_pixels(Rectangle::new(0, 0, 2, 2), &[1], BoolOp::Copy)
            .is_err());
    }

    #[test]
    fn test_pixels_are_masked_to_depth() {
        let mut pixmap = Pixmap::new(1, 1, PixelFormat::indexed(4)).unwrap();
        pixmap.fill_rect(pixmap.bounds(), 0, BoolOp::Set).unwrap();
        assert_eq!(pixmap.pixel(0, 0), Some(0xf));
    }

    #[test]
    fn test_read_back() {
        let pixmap =
            Pixmap::from_pixels(3, 2, PixelFormat::indexed(8), vec![1, 2, 3, 4, 5, 6]).unwrap();
        assert_eq!(
            pixmap.read_pixels(Rectangle::new(1, 0, 3, 2)).unwrap(),
            vec![2, 3, 5, 6]
        );
        assert!(pixmap.read_pixels(Rectangle::new(2, 0, 4, 1)).is_err());
    }

    #[test]
    fn test_overlapping_copy() {
        let mut pixmap =
            Pixmap::from_pixels(4, 1, PixelFormat::indexed(8), vec![1, 2, 3, 4]).unwrap();
        pixmap
            .copy_area(Rectangle::new(0, 0, 3, 1), Point::new(1, 0), BoolOp::Copy)
            .unwrap();
        assert_eq!(pixmap.pixels(), &[1, 1, 2, 3]);
    }

    #[test]
    fn test_pattern_anchored_at_origin() {
        let mut pixmap = Pixmap::new(3, 1, PixelFormat::indexed(8)).unwrap();
        let pattern = Pattern::new(2, 1, vec![7, 9]).unwrap();
        pixmap
            .fill_pattern(Rectangle::new(1, 0, 3, 1), &pattern, BoolOp::Copy)
            .unwrap();
        assert_eq!(pixmap.pixels(), &[0, 9, 7]);
    }

    #[test]
    fn test_image_round_trip_in_native_layout() {
        let mut pixmap = Pixmap::new(3, 1, PixelFormat::rgb565().with_byte_order(ByteOrder::LsbFirst)).unwrap();
        let bits = [0x1f, 0x00, 0xe0, 0x07, 0x00, 0xf8, 0, 0];
        pixmap
            .put_image(Rectangle::new(0, 0, 3, 1), &bits, 8, BoolOp::Copy)
            .unwrap();
        assert_eq!(pixmap.pixels(), &[0x001f, 0x07e0, 0xf800]);
        assert_eq!(pixmap.get_image(pixmap.bounds()).unwrap(), bits.to_vec());
    }
}
