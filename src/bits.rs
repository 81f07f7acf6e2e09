// MIT/Apache2 License

//! Transfer of packed pixel rows between device-independent bitmaps and native images.
//!
//! A device-independent bitmap (DIB) stores its rows padded to 32 bits, usually bottom-up, with
//! multi-byte pixels in the machine's byte order and sub-byte pixels with the leftmost pixel in the
//! high bits. A native image may disagree on any of those points. [`copy_image_bits`] fixes up the
//! differences in a single pass and avoids copying at all when there is nothing to fix.

use crate::{error::try_alloc, BitmapInfo, ByteOrder, Error, ImageLayout, Rectangle, Result};
use std::{cmp, convert::TryFrom};

const fn build_bit_swap() -> [u8; 256] {
    let mut table = [0u8; 256];
    let mut i = 0;
    while i < 256 {
        table[i] = (i as u8).reverse_bits();
        i += 1;
    }
    table
}

/// Reverses the order of the bits in a byte.
pub static BIT_SWAP: [u8; 256] = build_bit_swap();

/// The mask that clears the bits past the last pixel in the last dword of a row.
///
/// The mask is expressed as a little-endian dword, i.e. its lowest byte applies to the first
/// byte of the dword.
#[inline]
pub fn zeropad_mask(width: u32, bits_per_pixel: u8) -> u32 {
    let bits = (width.wrapping_mul(bits_per_pixel as u32)) & 31;
    if bits == 0 {
        return !0;
    }

    let whole = bits / 8;
    let partial = bits % 8;
    let full_bytes = (1u32 << (8 * whole)) - 1;
    let partial_byte = ((0xffu32 << (8 - partial)) & 0xff) << (8 * whole);
    full_bytes | partial_byte
}

/// Does copying a DIB of `bit_count` into `layout` require swapping bytes, nibbles or bits?
#[inline]
pub fn needs_byteswap(layout: &ImageLayout, bit_count: u16) -> bool {
    match bit_count {
        1 => layout.bit_order != ByteOrder::MsbFirst,
        4 => layout.byte_order != ByteOrder::MsbFirst,
        16 | 32 => layout.byte_order != ByteOrder::native(),
        24 => (layout.byte_order == ByteOrder::MsbFirst) ^ !layout.is_r8g8b8,
        _ => false,
    }
}

#[derive(Debug)]
enum Storage<'a> {
    Borrowed(&'a [u8]),
    Owned(Vec<u8>),
}

/// Pixel rows produced by [`copy_image_bits`].
///
/// This is either a view into the caller's buffer or a buffer we allocated. Which one it is only
/// matters to the caller in that `is_copy()` tells it whether further transforms can be done in
/// place. Either way the storage is released when this is dropped.
#[derive(Debug)]
pub struct DeviceImageBits<'a> {
    storage: Storage<'a>,
    offset: usize,
    stride: usize,
}

impl<'a> DeviceImageBits<'a> {
    /// View rows owned by somebody else.
    #[inline]
    pub fn borrowed(bits: &'a [u8]) -> Self {
        Self {
            storage: Storage::Borrowed(bits),
            offset: 0,
            stride: 0,
        }
    }

    /// Take ownership of some rows. Rows that we own can be transformed in place.
    #[inline]
    pub fn owned(bits: Vec<u8>) -> DeviceImageBits<'static> {
        DeviceImageBits {
            storage: Storage::Owned(bits),
            offset: 0,
            stride: 0,
        }
    }

    /// Rows of this buffer are `stride` bytes apart instead of the bitmap's own 32-bit aligned
    /// stride. Used for rows packed in a native layout.
    #[inline]
    pub fn with_stride(mut self, stride: usize) -> Self {
        self.stride = stride;
        self
    }

    /// Is this a buffer we own?
    #[inline]
    pub fn is_copy(&self) -> bool {
        matches!(self.storage, Storage::Owned(_))
    }

    /// Distance in bytes between the starts of two rows. Zero unless set by the codec or
    /// [`with_stride`](Self::with_stride).
    #[inline]
    pub fn stride(&self) -> usize {
        self.stride
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        match self.storage {
            Storage::Borrowed(bits) => &bits[self.offset..],
            Storage::Owned(ref bits) => &bits[self.offset..],
        }
    }

    /// Get the rows as an owned buffer, copying them if they were borrowed.
    #[inline]
    pub fn into_owned(self) -> Vec<u8> {
        match self.storage {
            Storage::Borrowed(bits) => bits[self.offset..].to_vec(),
            Storage::Owned(mut bits) => {
                if self.offset != 0 {
                    bits.drain(..self.offset);
                }
                bits
            }
        }
    }

    #[inline]
    fn len(&self) -> usize {
        match self.storage {
            Storage::Borrowed(bits) => bits.len(),
            Storage::Owned(ref bits) => bits.len(),
        }
    }
}

/// Per-call parameters for [`copy_image_bits`].
#[derive(Debug, Copy, Clone)]
pub struct Transfer<'m> {
    /// Remap 4 and 8 bpp pixel values through this table.
    pub mapping: Option<&'m [u32]>,
    /// ANDed into the last dword of every row; see [`zeropad_mask`].
    pub zeropad_mask: u32,
    /// ORed into every 32 bpp pixel.
    pub alpha_bits: u32,
}

impl<'m> Default for Transfer<'m> {
    #[inline]
    fn default() -> Self {
        Self {
            mapping: None,
            zeropad_mask: !0,
            alpha_bits: 0,
        }
    }
}

/// Copy the rows `rect.y1..rect.y2` of a DIB into the native `layout`, fixing up alignment, byte
/// order, pixel values and orientation as needed. The output rows are top-down and 32-bit aligned.
///
/// Input rows are read with the stride of `info`, unless `src` carries a stride of its own.
/// When the input already satisfies all of that it is returned as is, without copying.
pub fn copy_image_bits<'a>(
    info: &BitmapInfo,
    layout: &ImageLayout,
    src: DeviceImageBits<'a>,
    rect: Rectangle,
    transfer: &Transfer<'_>,
) -> Result<DeviceImageBits<'a>> {
    let byteswap = needs_byteswap(layout, info.bit_count);
    let width = u32::try_from(info.width).map_err(|_| Error::BadParameter("negative width"))?;
    let height = usize::try_from(rect.height()).map_err(|_| Error::BadParameter("bad rectangle"))?;
    let dst_stride = info.stride();
    let stride = match src.stride {
        0 => dst_stride,
        stride => stride,
    };
    let row_len = cmp::min(stride, dst_stride);
    let bottom_up = info.height > 0;

    // start of the first row we need
    let first_row = if bottom_up {
        info.height - rect.y2
    } else {
        rect.y1
    };
    let first_row = usize::try_from(first_row).map_err(|_| Error::BadParameter("bad rectangle"))?;
    let offset = src.offset + first_row * stride;
    if src.len() < offset + height * stride {
        return Err(Error::BadParameter("image buffer is too small"));
    }

    if let Some(mapping) = transfer.mapping {
        if (info.bit_count == 4 || info.bit_count == 8) && mapping.len() < 1 << info.bit_count {
            return Err(Error::BadParameter("pixel mapping is too short"));
        }
    }

    let is_copy = src.is_copy();
    let needs_copy = (byteswap && !is_copy)
        || (transfer.zeropad_mask != !0 && !is_copy)
        || (transfer.mapping.is_some() && !is_copy)
        || (transfer.alpha_bits != 0 && !is_copy)
        || stride != dst_stride
        || bottom_up;

    let convert = RowConvert {
        bit_count: info.bit_count,
        width: width as usize,
        byteswap,
        mapping: transfer.mapping,
        zeropad_mask: transfer.zeropad_mask,
        alpha_bits: transfer.alpha_bits,
    };

    if needs_copy {
        log::debug!(
            "Copying {} rows of {} bpp ({} -> {} bytes per row), byteswap: {}",
            height,
            info.bit_count,
            stride,
            dst_stride,
            byteswap
        );

        let mut dst = try_alloc(dst_stride * height, 0u8)?;
        let src_bytes = src.as_bytes();
        let src_base = offset - src.offset;

        for y in 0..height {
            let src_row = &src_bytes[src_base + y * stride..src_base + y * stride + row_len];
            let dst_y = if bottom_up { height - 1 - y } else { y };
            let dst_row = &mut dst[dst_y * dst_stride..(dst_y + 1) * dst_stride];
            dst_row[..row_len].copy_from_slice(src_row);
            convert.apply(dst_row, row_len);
        }

        let mut out = DeviceImageBits::owned(dst);
        out.stride = dst_stride;
        return Ok(out);
    }

    let mut out = src;
    out.offset = offset;
    out.stride = stride;

    if !convert.is_identity() && stride > 0 {
        // rows are already aligned and top-down, and we own them
        if let Storage::Owned(ref mut bits) = out.storage {
            log::debug!("Converting {} rows of {} bpp in place", height, info.bit_count);
            for row in bits[offset..offset + height * stride].chunks_exact_mut(stride) {
                convert.apply(row, stride);
            }
        }
    } else {
        log::trace!("Image bits need no conversion");
    }

    Ok(out)
}

struct RowConvert<'m> {
    bit_count: u16,
    width: usize,
    byteswap: bool,
    mapping: Option<&'m [u32]>,
    zeropad_mask: u32,
    alpha_bits: u32,
}

impl<'m> RowConvert<'m> {
    #[inline]
    fn is_identity(&self) -> bool {
        !self.byteswap && self.mapping.is_none() && self.zeropad_mask == !0 && self.alpha_bits == 0
    }

    /// Convert the first `len` bytes of `row` and clear the padding of its last dword.
    fn apply(&self, row: &mut [u8], len: usize) {
        let pixels = &mut row[..len];

        match (self.bit_count, self.mapping) {
            (1, _) => {
                if self.byteswap {
                    pixels.iter_mut().for_each(|b| *b = BIT_SWAP[*b as usize]);
                }
            }
            (4, Some(map)) => {
                let map = |n: u8| map[n as usize] as u8 & 0x0f;
                if self.byteswap {
                    pixels
                        .iter_mut()
                        .for_each(|b| *b = (map(*b & 0x0f) << 4) | map(*b >> 4));
                } else {
                    pixels
                        .iter_mut()
                        .for_each(|b| *b = map(*b & 0x0f) | (map(*b >> 4) << 4));
                }
            }
            (4, None) => {
                if self.byteswap {
                    pixels.iter_mut().for_each(|b| *b = b.rotate_left(4));
                }
            }
            (8, Some(map)) => {
                pixels.iter_mut().for_each(|b| *b = map[*b as usize] as u8);
            }
            (16, _) => {
                if self.byteswap {
                    pixels
                        .chunks_exact_mut(2)
                        .take(self.width)
                        .for_each(|p| p.swap(0, 1));
                }
            }
            (24, _) => {
                if self.byteswap {
                    pixels
                        .chunks_exact_mut(3)
                        .take(self.width)
                        .for_each(|p| p.swap(0, 2));
                }
            }
            (32, _) => {
                if self.byteswap || self.alpha_bits != 0 {
                    for p in pixels.chunks_exact_mut(4).take(self.width) {
                        let mut value = u32::from_ne_bytes([p[0], p[1], p[2], p[3]]);
                        if self.byteswap {
                            value = value.swap_bytes();
                        }
                        value |= self.alpha_bits;
                        p.copy_from_slice(&value.to_ne_bytes());
                    }
                }
            }
            _ => {}
        }

        if self.zeropad_mask != !0 && row.len() >= 4 {
            let last = row.len() - 4;
            let dword = &mut row[last..];
            let masked =
                u32::from_le_bytes([dword[0], dword[1], dword[2], dword[3]]) & self.zeropad_mask;
            dword.copy_from_slice(&masked.to_le_bytes());
        }
    }
}

/// Read pixel `x` out of a packed row.
#[inline]
pub fn read_pixel(row: &[u8], x: usize, layout: &ImageLayout) -> u32 {
    match layout.bits_per_pixel {
        1 => {
            let bit = x & 7;
            let shift = match layout.bit_order {
                ByteOrder::MsbFirst => 7 - bit,
                ByteOrder::LsbFirst => bit,
            };
            ((row[x >> 3] >> shift) & 1) as u32
        }
        4 => {
            let byte = row[x >> 1];
            let high = (x & 1 == 0) == (layout.byte_order == ByteOrder::MsbFirst);
            if high {
                (byte >> 4) as u32
            } else {
                (byte & 0x0f) as u32
            }
        }
        8 => row[x] as u32,
        bpp => {
            let n = bpp as usize / 8;
            let bytes = &row[x * n..(x + 1) * n];
            match layout.byte_order {
                ByteOrder::LsbFirst => bytes
                    .iter()
                    .rev()
                    .fold(0, |acc, &b| (acc << 8) | b as u32),
                ByteOrder::MsbFirst => bytes.iter().fold(0, |acc, &b| (acc << 8) | b as u32),
            }
        }
    }
}

/// Write pixel `x` into a packed row.
#[inline]
pub fn write_pixel(row: &mut [u8], x: usize, value: u32, layout: &ImageLayout) {
    match layout.bits_per_pixel {
        1 => {
            let bit = x & 7;
            let shift = match layout.bit_order {
                ByteOrder::MsbFirst => 7 - bit,
                ByteOrder::LsbFirst => bit,
            };
            let byte = &mut row[x >> 3];
            *byte = (*byte & !(1 << shift)) | (((value & 1) as u8) << shift);
        }
        4 => {
            let byte = &mut row[x >> 1];
            let high = (x & 1 == 0) == (layout.byte_order == ByteOrder::MsbFirst);
            let value = (value & 0x0f) as u8;
            if high {
                *byte = (*byte & 0x0f) | (value << 4);
            } else {
                *byte = (*byte & 0xf0) | value;
            }
        }
        8 => row[x] = value as u8,
        bpp => {
            let n = bpp as usize / 8;
            let bytes = &mut row[x * n..(x + 1) * n];
            for (i, b) in bytes.iter_mut().enumerate() {
                let shift = match layout.byte_order {
                    ByteOrder::LsbFirst => 8 * i,
                    ByteOrder::MsbFirst => 8 * (n - 1 - i),
                };
                *b = (value >> shift) as u8;
            }
        }
    }
}

/// Pack top-down rows of native pixels into `layout`.
pub fn pack_pixels(pixels: &[u32], width: u32, height: u32, layout: &ImageLayout) -> Result<Vec<u8>> {
    let stride = layout.bytes_per_line(width);
    let mut out = try_alloc(stride * height as usize, 0u8)?;
    if stride == 0 {
        return Ok(out);
    }

    for (row, src) in out
        .chunks_exact_mut(stride)
        .zip(pixels.chunks(width.max(1) as usize))
    {
        for (x, &p) in src.iter().enumerate() {
            write_pixel(row, x, p, layout);
        }
    }
    Ok(out)
}

/// Unpack a `width` by `height` block of pixels, starting at column `x_offset` of each row.
pub fn unpack_pixels(
    bits: &[u8],
    stride: usize,
    x_offset: usize,
    width: u32,
    height: u32,
    layout: &ImageLayout,
) -> Result<Vec<u32>> {
    let (width, height) = (width as usize, height as usize);
    let last_row = ((x_offset + width) * layout.bits_per_pixel as usize + 7) / 8;
    if height > 0 && bits.len() < (height - 1) * stride + last_row {
        return Err(Error::BadParameter("image buffer is too small"));
    }

    let mut out = try_alloc(width * height, 0u32)?;
    for y in 0..height {
        let row = &bits[y * stride..];
        for x in 0..width {
            out[y * width + x] = read_pixel(row, x_offset + x, layout);
        }
    }
    Ok(out)
}

/// The layout of the bits of a device-independent bitmap with `bit_count` bits per pixel.
#[inline]
pub fn dib_layout(bit_count: u16) -> ImageLayout {
    ImageLayout {
        bits_per_pixel: bit_count as u8,
        byte_order: match bit_count {
            4 => ByteOrder::MsbFirst,
            24 => ByteOrder::LsbFirst,
            _ => ByteOrder::native(),
        },
        bit_order: ByteOrder::MsbFirst,
        scanline_pad: 32,
        is_r8g8b8: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::BitmapInfo;

    fn layout(bpp: u8, byte_order: ByteOrder) -> ImageLayout {
        ImageLayout {
            bits_per_pixel: bpp,
            byte_order,
            bit_order: ByteOrder::MsbFirst,
            scanline_pad: 32,
            is_r8g8b8: false,
        }
    }

    #[test]
    fn test_zeropad_masks() {
        assert_eq!(zeropad_mask(32, 1), !0);
        assert_eq!(zeropad_mask(1, 1), 0x0000_0080);
        assert_eq!(zeropad_mask(9, 1), 0x0000_80ff);
        assert_eq!(zeropad_mask(3, 8), 0x00ff_ffff);
        assert_eq!(zeropad_mask(31, 1), 0xfeff_ffff);
        assert_eq!(zeropad_mask(5, 4), 0x00f0_ffff);
    }

    #[test]
    fn test_bit_swap() {
        assert_eq!(BIT_SWAP[0x01], 0x80);
        assert_eq!(BIT_SWAP[0xf0], 0x0f);
        assert_eq!(BIT_SWAP[0xa5], 0xa5);
    }

    #[test]
    fn test_byteswap_decisions() {
        let native = ByteOrder::native();
        assert!(!needs_byteswap(&layout(8, ByteOrder::LsbFirst), 8));
        assert!(!needs_byteswap(&layout(32, native), 32));
        assert!(needs_byteswap(&layout(4, ByteOrder::LsbFirst), 4));
        assert!(!needs_byteswap(&layout(4, ByteOrder::MsbFirst), 4));

        let mut l = layout(24, ByteOrder::LsbFirst);
        assert!(needs_byteswap(&l, 24));
        l.is_r8g8b8 = true;
        assert!(!needs_byteswap(&l, 24));
        l.byte_order = ByteOrder::MsbFirst;
        assert!(needs_byteswap(&l, 24));
    }

    #[test]
    fn test_zero_copy_when_nothing_to_do() {
        let info = BitmapInfo::new(4, -2, 8);
        let bits = [1u8, 2, 3, 4, 5, 6, 7, 8];
        let out = copy_image_bits(
            &info,
            &layout(8, ByteOrder::LsbFirst),
            DeviceImageBits::borrowed(&bits),
            Rectangle::new(0, 0, 4, 2),
            &Transfer::default(),
        )
        .unwrap();
        assert!(!out.is_copy());
        assert_eq!(out.as_bytes().as_ptr(), bits.as_ptr());
    }

    #[test]
    fn test_rows_read_with_bitmap_stride() {
        // a byte-padded native layout must not change where bitmap rows start
        let info = BitmapInfo::new(3, -2, 8);
        let bits = [1u8, 2, 3, 0, 4, 5, 6, 0];
        let mut l = layout(8, ByteOrder::LsbFirst);
        l.scanline_pad = 8;
        let out = copy_image_bits(
            &info,
            &l,
            DeviceImageBits::borrowed(&bits),
            Rectangle::new(0, 0, 3, 2),
            &Transfer::default(),
        )
        .unwrap();
        assert!(!out.is_copy());
        assert_eq!(out.stride(), 4);
        assert_eq!(
            unpack_pixels(out.as_bytes(), out.stride(), 0, 3, 2, &l).unwrap(),
            vec![1, 2, 3, 4, 5, 6]
        );
    }

    #[test]
    fn test_native_rows_are_realigned() {
        let info = BitmapInfo::new(3, -2, 8);
        let mut l = layout(8, ByteOrder::LsbFirst);
        l.scanline_pad = 8;
        let out = copy_image_bits(
            &info,
            &l,
            DeviceImageBits::owned(vec![1, 2, 3, 4, 5, 6]).with_stride(3),
            Rectangle::new(0, 0, 3, 2),
            &Transfer::default(),
        )
        .unwrap();
        assert_eq!(out.stride(), 4);
        assert_eq!(out.as_bytes(), &[1, 2, 3, 0, 4, 5, 6, 0]);
    }

    #[test]
    fn test_bottom_up_is_flipped() {
        let info = BitmapInfo::new(4, 2, 8);
        let bits = [1u8, 2, 3, 4, 5, 6, 7, 8];
        let out = copy_image_bits(
            &info,
            &layout(8, ByteOrder::LsbFirst),
            DeviceImageBits::borrowed(&bits),
            Rectangle::new(0, 0, 4, 2),
            &Transfer::default(),
        )
        .unwrap();
        assert!(out.is_copy());
        assert_eq!(out.as_bytes(), &[5, 6, 7, 8, 1, 2, 3, 4]);
    }

    #[test]
    fn test_partial_rows_bottom_up() {
        // rows 1..3 of a 4-row bottom-up image are stored at memory rows 2 and 1
        let info = BitmapInfo::new(4, 4, 8);
        let bits: Vec<u8> = (0..16).collect();
        let out = copy_image_bits(
            &info,
            &layout(8, ByteOrder::LsbFirst),
            DeviceImageBits::borrowed(&bits),
            Rectangle::new(0, 1, 4, 3),
            &Transfer::default(),
        )
        .unwrap();
        assert_eq!(out.as_bytes(), &[8, 9, 10, 11, 4, 5, 6, 7]);
    }

    #[test]
    fn test_mapping_8bpp() {
        let info = BitmapInfo::new(4, -1, 8);
        let bits = [0u8, 1, 2, 3];
        let mapping: Vec<u32> = (0..256).map(|i| 255 - i).collect();
        let out = copy_image_bits(
            &info,
            &layout(8, ByteOrder::LsbFirst),
            DeviceImageBits::borrowed(&bits),
            Rectangle::new(0, 0, 4, 1),
            &Transfer {
                mapping: Some(&mapping),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(out.as_bytes(), &[255, 254, 253, 252]);
    }

    #[test]
    fn test_mapping_4bpp_both_orders() {
        let info = BitmapInfo::new(2, -1, 4);
        let bits = [0x12u8, 0, 0, 0];
        let mapping: Vec<u32> = (0..16).map(|i| (i + 1) & 0xf).collect();

        let run = |order| {
            copy_image_bits(
                &info,
                &layout(4, order),
                DeviceImageBits::borrowed(&bits),
                Rectangle::new(0, 0, 2, 1),
                &Transfer {
                    mapping: Some(&mapping),
                    ..Default::default()
                },
            )
            .unwrap()
            .into_owned()
        };

        assert_eq!(run(ByteOrder::MsbFirst)[0], 0x23);
        assert_eq!(run(ByteOrder::LsbFirst)[0], 0x32);
    }

    #[test]
    fn test_in_place_on_owned_copy() {
        let info = BitmapInfo::new(1, -1, 16);
        let swapped = if ByteOrder::native() == ByteOrder::LsbFirst {
            ByteOrder::MsbFirst
        } else {
            ByteOrder::LsbFirst
        };
        let out = copy_image_bits(
            &info,
            &layout(16, swapped),
            DeviceImageBits::owned(vec![0x12, 0x34, 0xaa, 0xbb]),
            Rectangle::new(0, 0, 1, 1),
            &Transfer::default(),
        )
        .unwrap();
        assert!(out.is_copy());
        // only the first pixel is swapped; the padding is left alone
        assert_eq!(out.as_bytes(), &[0x34, 0x12, 0xaa, 0xbb]);
    }

    #[test]
    fn test_alpha_bits_force_a_copy() {
        let info = BitmapInfo::new(1, -1, 32);
        let bits = 0x0012_3456u32.to_ne_bytes();
        let out = copy_image_bits(
            &info,
            &layout(32, ByteOrder::native()),
            DeviceImageBits::borrowed(&bits),
            Rectangle::new(0, 0, 1, 1),
            &Transfer {
                alpha_bits: 0xff00_0000,
                ..Default::default()
            },
        )
        .unwrap();
        assert!(out.is_copy());
        assert_eq!(out.as_bytes(), &0xff12_3456u32.to_ne_bytes());
    }

    #[test]
    fn test_pack_unpack_1bpp_lsb() {
        let mut l = layout(1, ByteOrder::LsbFirst);
        l.bit_order = ByteOrder::LsbFirst;
        let packed = pack_pixels(&[1, 0, 0, 1], 4, 1, &l).unwrap();
        assert_eq!(packed, vec![0b1001, 0, 0, 0]);
        assert_eq!(unpack_pixels(&packed, 4, 0, 4, 1, &l).unwrap(), vec![1, 0, 0, 1]);
    }

    #[test]
    fn test_read_write_24bpp() {
        let l = layout(24, ByteOrder::LsbFirst);
        let mut row = [0u8; 8];
        write_pixel(&mut row, 1, 0x00ab_cdef, &l);
        assert_eq!(&row[3..6], &[0xef, 0xcd, 0xab]);
        assert_eq!(read_pixel(&row, 1, &l), 0x00ab_cdef);
    }
}
