// MIT/Apache2 License

use crate::{
    bits::{dib_layout, read_pixel, write_pixel},
    error::try_alloc,
    palette::{default_color_table, PaletteStore},
    ColorShifts, Error, ImageLayout, PixelFormat, Result, Rgb,
};
use std::{borrow::Cow, convert::TryFrom};

/// How the pixels of a device-independent bitmap are encoded.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Compression {
    /// Uncompressed, with the default channel layout for the depth.
    Rgb,
    /// Uncompressed 16 or 32 bpp with explicit channel masks.
    Bitfields { red: u32, green: u32, blue: u32 },
    Rle8,
    Rle4,
}

/// Header of a device-independent bitmap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitmapInfo {
    pub width: i32,
    /// Positive for bottom-up bitmaps, negative for top-down ones.
    pub height: i32,
    pub bit_count: u16,
    pub compression: Compression,
    /// The color table. Empty means the default table for `bit_count`.
    pub colors: Vec<Rgb>,
}

/// Bytes in one row of a DIB: rows are padded to 32 bits.
#[inline]
pub fn dib_stride(width: u32, bit_count: u16) -> usize {
    ((width as usize * bit_count as usize + 31) >> 3) & !3
}

impl BitmapInfo {
    /// An uncompressed bitmap without a color table.
    #[inline]
    pub fn new(width: i32, height: i32, bit_count: u16) -> Self {
        Self {
            width,
            height,
            bit_count,
            compression: Compression::Rgb,
            colors: Vec::new(),
        }
    }

    #[inline]
    pub fn with_colors(mut self, colors: Vec<Rgb>) -> Self {
        self.colors = colors;
        self
    }

    #[inline]
    pub fn with_bitfields(mut self, red: u32, green: u32, blue: u32) -> Self {
        self.compression = Compression::Bitfields { red, green, blue };
        self
    }

    #[inline]
    pub fn abs_height(&self) -> u32 {
        self.height.unsigned_abs()
    }

    #[inline]
    pub fn is_bottom_up(&self) -> bool {
        self.height > 0
    }

    #[inline]
    pub fn stride(&self) -> usize {
        dib_stride(self.width.unsigned_abs(), self.bit_count)
    }

    /// Bytes of pixel data.
    #[inline]
    pub fn image_size(&self) -> usize {
        self.stride() * self.abs_height() as usize
    }

    #[inline]
    pub fn layout(&self) -> ImageLayout {
        dib_layout(self.bit_count)
    }

    /// Can the pixels be transferred at all?
    #[inline]
    pub fn is_supported(&self) -> bool {
        match (self.bit_count, self.compression) {
            (1, Compression::Rgb)
            | (4, Compression::Rgb)
            | (8, Compression::Rgb)
            | (16, Compression::Rgb)
            | (24, Compression::Rgb)
            | (32, Compression::Rgb) => true,
            (16, Compression::Bitfields { .. }) | (32, Compression::Bitfields { .. }) => true,
            _ => false,
        }
    }

    /// Channel masks of a direct color bitmap.
    #[inline]
    pub fn masks(&self) -> Option<[u32; 3]> {
        match (self.bit_count, self.compression) {
            (16, Compression::Bitfields { red, green, blue })
            | (32, Compression::Bitfields { red, green, blue }) => Some([red, green, blue]),
            (16, Compression::Rgb) => Some([0x7c00, 0x03e0, 0x001f]),
            (24, Compression::Rgb) | (32, Compression::Rgb) => Some([0xff0000, 0x00ff00, 0x0000ff]),
            _ => None,
        }
    }

    /// The colors of an indexed bitmap.
    #[inline]
    pub fn color_table(&self) -> Cow<'_, [Rgb]> {
        if self.colors.is_empty() {
            Cow::Borrowed(default_color_table(self.bit_count).unwrap_or(&[]))
        } else {
            Cow::Borrowed(&self.colors)
        }
    }
}

/// Can a DIB described by `info` be handed to a surface of `format` without converting it?
pub fn matching_color_info(info: &BitmapInfo, format: &PixelFormat, store: &PaletteStore) -> bool {
    let masks = format.shifts().map(ColorShifts::masks);

    match (info.bit_count, info.compression) {
        (1, Compression::Rgb) => info.colors.is_empty(),
        (4, Compression::Rgb) | (8, Compression::Rgb) => {
            let system = store.system_color_table(info.bit_count);
            system.len() == info.colors.len() && system == info.colors
        }
        (16, Compression::Bitfields { red, green, blue })
        | (32, Compression::Bitfields { red, green, blue }) => masks == Some([red, green, blue]),
        (16, Compression::Rgb) => masks == Some([0x7c00, 0x03e0, 0x001f]),
        (24, Compression::Rgb) | (32, Compression::Rgb) => {
            masks == Some([0xff0000, 0x00ff00, 0x0000ff])
        }
        _ => false,
    }
}

/// The top-down header for bitmaps in the native encoding of `format`, keeping the size of
/// `info`.
pub fn native_bitmap_info(
    info: &BitmapInfo,
    format: &PixelFormat,
    store: &PaletteStore,
    has_alpha: bool,
) -> BitmapInfo {
    let bit_count = format.bits_per_pixel as u16;
    let mut native = BitmapInfo::new(info.width, -(info.height.abs()), bit_count);
    let masks = format.shifts().map(ColorShifts::masks).unwrap_or([0; 3]);

    match bit_count {
        4 | 8 => {
            let mut colors = store.system_color_table(bit_count);
            colors.resize(1 << bit_count, Rgb::BLACK);
            native.colors = colors;
        }
        16 => native.compression = bitfields(masks),
        32 => {
            if masks != [0xff0000, 0x00ff00, 0x0000ff] || !has_alpha {
                native.compression = bitfields(masks);
            }
        }
        _ => {}
    }

    native
}

#[inline]
fn bitfields(masks: [u32; 3]) -> Compression {
    Compression::Bitfields {
        red: masks[0],
        green: masks[1],
        blue: masks[2],
    }
}

/// Convert the pixels of a DIB into another DIB format, of the same size.
///
/// Indexed targets get the nearest entry of their color table. Rows come out in the orientation
/// `dst_info` asks for.
pub fn convert_bits(src_info: &BitmapInfo, src: &[u8], dst_info: &BitmapInfo) -> Result<Vec<u8>> {
    if !src_info.is_supported() || !dst_info.is_supported() {
        return Err(Error::UnsupportedFormat);
    }
    if src_info.width != dst_info.width || src_info.abs_height() != dst_info.abs_height() {
        return Err(Error::BadParameter("bitmap sizes differ"));
    }

    let width = usize::try_from(src_info.width).map_err(|_| Error::BadParameter("negative width"))?;
    let height = src_info.abs_height() as usize;
    let (src_stride, dst_stride) = (src_info.stride(), dst_info.stride());
    if src.len() < src_stride * height {
        return Err(Error::BadParameter("image buffer is too small"));
    }

    log::debug!(
        "Converting {}x{} DIB from {} to {} bpp",
        width,
        height,
        src_info.bit_count,
        dst_info.bit_count
    );

    let reader = PixelReader::new(src_info);
    let writer = PixelWriter::new(dst_info);
    let flip = src_info.is_bottom_up() != dst_info.is_bottom_up();

    let mut dst = try_alloc(dst_stride * height, 0u8)?;
    for y in 0..height {
        let src_row = &src[y * src_stride..(y + 1) * src_stride];
        let dst_y = if flip { height - 1 - y } else { y };
        let dst_row = &mut dst[dst_y * dst_stride..(dst_y + 1) * dst_stride];

        for x in 0..width {
            let color = reader.read(src_row, x);
            writer.write(dst_row, x, color);
        }
    }

    Ok(dst)
}

struct PixelReader<'a> {
    layout: ImageLayout,
    colors: Cow<'a, [Rgb]>,
    shifts: Option<ColorShifts>,
}

impl<'a> PixelReader<'a> {
    fn new(info: &'a BitmapInfo) -> Self {
        Self {
            layout: info.layout(),
            colors: info.color_table(),
            shifts: info.masks().map(|m| ColorShifts::from_masks(m[0], m[1], m[2])),
        }
    }

    #[inline]
    fn read(&self, row: &[u8], x: usize) -> Rgb {
        let pixel = read_pixel(row, x, &self.layout);
        match self.shifts {
            Some(ref shifts) => shifts.to_rgb(pixel),
            None => self.colors.get(pixel as usize).copied().unwrap_or(Rgb::BLACK),
        }
    }
}

struct PixelWriter<'a> {
    layout: ImageLayout,
    colors: Cow<'a, [Rgb]>,
    shifts: Option<ColorShifts>,
}

impl<'a> PixelWriter<'a> {
    fn new(info: &'a BitmapInfo) -> Self {
        Self {
            layout: info.layout(),
            colors: info.color_table(),
            shifts: info.masks().map(|m| ColorShifts::from_masks(m[0], m[1], m[2])),
        }
    }

    #[inline]
    fn write(&self, row: &mut [u8], x: usize, color: Rgb) {
        let pixel = match self.shifts {
            Some(ref shifts) => shifts.to_physical(color),
            None => nearest_color_index(&self.colors, color) as u32,
        };
        write_pixel(row, x, pixel, &self.layout);
    }
}

/// The first of the closest entries of a color table.
#[inline]
pub fn nearest_color_index(colors: &[Rgb], color: Rgb) -> usize {
    let mut best = 0;
    let mut best_diff = u32::MAX;
    for (i, c) in colors.iter().enumerate() {
        let diff = c.distance_squared(color);
        if diff < best_diff {
            best = i;
            best_diff = diff;
            if diff == 0 {
                break;
            }
        }
    }
    best
}
