// MIT/Apache2 License

use crate::{ColorShifts, Error, Result};

/// Order of bytes within a multi-byte pixel, or of pixels within a byte.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ByteOrder {
    LsbFirst,
    MsbFirst,
}

impl ByteOrder {
    /// The byte order of the machine we are running on.
    #[inline]
    pub fn native() -> ByteOrder {
        if cfg!(target_endian = "big") {
            ByteOrder::MsbFirst
        } else {
            ByteOrder::LsbFirst
        }
    }
}

impl Default for ByteOrder {
    #[inline]
    fn default() -> Self {
        Self::native()
    }
}

/// How the bits of a native pixel are interpreted.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ColorKind {
    /// One bit per pixel; set bits are white.
    Mono,
    /// Pixels are colormap cells.
    Indexed,
    /// Pixels are gray levels from zero up to `max`.
    Gray { max: u32 },
    /// Pixels hold red, green and blue channels at the given positions.
    Direct(ColorShifts),
}

/// Immutable description of a surface's native pixel encoding.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct PixelFormat {
    /// Number of significant bits in a pixel.
    pub depth: u8,
    /// Number of bits a pixel occupies in memory.
    pub bits_per_pixel: u8,
    pub kind: ColorKind,
    pub byte_order: ByteOrder,
    pub bit_order: ByteOrder,
    /// Scanline alignment, in bits.
    pub scanline_pad: u8,
}

/// The number of bits a pixel of `depth` occupies in memory.
#[inline]
pub fn bits_per_pixel_for_depth(depth: u8) -> u8 {
    match depth {
        1 => 1,
        2..=4 => 4,
        5..=8 => 8,
        9..=16 => 16,
        _ => 32,
    }
}

impl PixelFormat {
    #[inline]
    fn with_kind(depth: u8, bits_per_pixel: u8, kind: ColorKind) -> PixelFormat {
        PixelFormat {
            depth,
            bits_per_pixel,
            kind,
            byte_order: ByteOrder::native(),
            bit_order: ByteOrder::MsbFirst,
            scanline_pad: 32,
        }
    }

    /// A one-bit monochrome format.
    #[inline]
    pub fn mono() -> PixelFormat {
        Self::with_kind(1, 1, ColorKind::Mono)
    }

    /// A colormap-indexed format.
    #[inline]
    pub fn indexed(depth: u8) -> PixelFormat {
        Self::with_kind(depth, bits_per_pixel_for_depth(depth), ColorKind::Indexed)
    }

    /// A static grayscale format.
    #[inline]
    pub fn gray(depth: u8) -> PixelFormat {
        let max = (1u32 << depth.min(31)) - 1;
        Self::with_kind(depth, bits_per_pixel_for_depth(depth), ColorKind::Gray { max })
    }

    /// A direct color format with the given channel masks.
    ///
    /// Fails if the masks overlap or do not fit into `bits_per_pixel`.
    #[inline]
    pub fn direct(depth: u8, bits_per_pixel: u8, red: u32, green: u32, blue: u32) -> Result<PixelFormat> {
        if red & green != 0 || red & blue != 0 || green & blue != 0 {
            return Err(Error::BadParameter("channel masks overlap"));
        }
        if bits_per_pixel < 32 && (red | green | blue) >> bits_per_pixel != 0 {
            return Err(Error::BadParameter("channel masks exceed the pixel size"));
        }
        Ok(Self::with_kind(
            depth,
            bits_per_pixel,
            ColorKind::Direct(ColorShifts::from_masks(red, green, blue)),
        ))
    }

    /// 24-bit color in 32-bit pixels, `0x00rrggbb`.
    #[inline]
    pub fn rgb888() -> PixelFormat {
        Self::with_kind(
            24,
            32,
            ColorKind::Direct(ColorShifts::from_masks(0xff0000, 0xff00, 0xff)),
        )
    }

    /// 24-bit color packed into three bytes.
    #[inline]
    pub fn packed_rgb888() -> PixelFormat {
        Self::with_kind(
            24,
            24,
            ColorKind::Direct(ColorShifts::from_masks(0xff0000, 0xff00, 0xff)),
        )
    }

    #[inline]
    pub fn rgb565() -> PixelFormat {
        Self::with_kind(
            16,
            16,
            ColorKind::Direct(ColorShifts::from_masks(0xf800, 0x07e0, 0x001f)),
        )
    }

    #[inline]
    pub fn rgb555() -> PixelFormat {
        Self::with_kind(
            15,
            16,
            ColorKind::Direct(ColorShifts::from_masks(0x7c00, 0x03e0, 0x001f)),
        )
    }

    /// Use a different byte order for multi-byte pixels.
    #[inline]
    pub fn with_byte_order(mut self, byte_order: ByteOrder) -> PixelFormat {
        self.byte_order = byte_order;
        self
    }

    /// Use a different order for pixels packed into one byte.
    #[inline]
    pub fn with_bit_order(mut self, bit_order: ByteOrder) -> PixelFormat {
        self.bit_order = bit_order;
        self
    }

    #[inline]
    pub fn is_mono(&self) -> bool {
        self.depth == 1
    }

    #[inline]
    pub fn is_indexed(&self) -> bool {
        matches!(self.kind, ColorKind::Indexed)
    }

    #[inline]
    pub fn shifts(&self) -> Option<&ColorShifts> {
        match self.kind {
            ColorKind::Direct(ref shifts) => Some(shifts),
            _ => None,
        }
    }

    /// Mask covering the significant bits of a pixel.
    #[inline]
    pub fn pixel_mask(&self) -> u32 {
        if self.depth >= 32 {
            u32::MAX
        } else {
            (1 << self.depth) - 1
        }
    }

    /// Do pixels of `self` and `other` mean the same thing?
    #[inline]
    pub fn same_format(&self, other: &PixelFormat) -> bool {
        self.depth == other.depth && self.kind == other.kind
    }

    /// Bytes in one scanline of `width` pixels.
    #[inline]
    pub fn stride(&self, width: u32) -> usize {
        let pad = self.scanline_pad.max(8) as usize;
        let bits = width as usize * self.bits_per_pixel as usize;
        (bits + pad - 1) / pad * (pad / 8)
    }

    /// The memory layout used for packed images of this format.
    #[inline]
    pub fn layout(&self) -> ImageLayout {
        ImageLayout {
            bits_per_pixel: self.bits_per_pixel,
            byte_order: self.byte_order,
            bit_order: self.bit_order,
            scanline_pad: self.scanline_pad,
            is_r8g8b8: self.bits_per_pixel == 24
                && self.shifts().map_or(false, |s| {
                    let m = s.masks();
                    m[0] == 0xff0000 && m[2] == 0xff
                }),
        }
    }
}

/// The packing of a native image in memory.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct ImageLayout {
    pub bits_per_pixel: u8,
    pub byte_order: ByteOrder,
    pub bit_order: ByteOrder,
    /// Scanline alignment, in bits.
    pub scanline_pad: u8,
    /// Three-byte pixels laid out as red, green, blue from high to low.
    pub is_r8g8b8: bool,
}

impl ImageLayout {
    /// Bytes in one scanline of `width` pixels.
    #[inline]
    pub fn bytes_per_line(&self, width: u32) -> usize {
        let pad = self.scanline_pad.max(8) as usize;
        let bits = width as usize * self.bits_per_pixel as usize;
        (bits + pad - 1) / pad * (pad / 8)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlapping_masks_rejected() {
        assert!(PixelFormat::direct(16, 16, 0xf800, 0x0fe0, 0x1f).is_err());
        assert!(PixelFormat::direct(16, 16, 0xf8000, 0x07e0, 0x1f).is_err());
        assert!(PixelFormat::direct(16, 16, 0xf800, 0x07e0, 0x1f).is_ok());
    }

    #[test]
    fn test_stride() {
        assert_eq!(PixelFormat::mono().stride(1), 4);
        assert_eq!(PixelFormat::mono().stride(33), 8);
        assert_eq!(PixelFormat::indexed(8).stride(5), 8);
        assert_eq!(PixelFormat::packed_rgb888().stride(3), 12);
        assert_eq!(PixelFormat::rgb888().stride(3), 12);
    }

    #[test]
    fn test_r8g8b8_only_for_packed() {
        assert!(PixelFormat::packed_rgb888().layout().is_r8g8b8);
        assert!(!PixelFormat::rgb888().layout().is_r8g8b8);
    }
}
