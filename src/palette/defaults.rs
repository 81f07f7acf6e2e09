// MIT/Apache2 License

use crate::Rgb;

#[inline]
const fn rgb(red: u8, green: u8, blue: u8) -> Rgb {
    Rgb::new(red, green, blue)
}

/// Number of stock colors that are always present in the system palette.
pub const NB_RESERVED_COLORS: usize = 20;

/// The default color table of a 1 bpp bitmap.
pub static DEFAULT_COLORS_1: [Rgb; 2] = [rgb(0x00, 0x00, 0x00), rgb(0xff, 0xff, 0xff)];

/// The default color table of a 4 bpp bitmap.
pub static DEFAULT_COLORS_4: [Rgb; 16] = [
    rgb(0x00, 0x00, 0x00), rgb(0x80, 0x00, 0x00), rgb(0x00, 0x80, 0x00), rgb(0x80, 0x80, 0x00),
    rgb(0x00, 0x00, 0x80), rgb(0x80, 0x00, 0x80), rgb(0x00, 0x80, 0x80), rgb(0x80, 0x80, 0x80),
    rgb(0xc0, 0xc0, 0xc0), rgb(0xff, 0x00, 0x00), rgb(0x00, 0xff, 0x00), rgb(0xff, 0xff, 0x00),
    rgb(0x00, 0x00, 0xff), rgb(0xff, 0x00, 0xff), rgb(0x00, 0xff, 0xff), rgb(0xff, 0xff, 0xff),
];

/// The default color table of an 8 bpp bitmap. Its first and last ten entries are the stock
/// system colors.
pub static DEFAULT_COLORS_8: [Rgb; 256] = [
    rgb(0x00, 0x00, 0x00), rgb(0x80, 0x00, 0x00), rgb(0x00, 0x80, 0x00), rgb(0x80, 0x80, 0x00),
    rgb(0x00, 0x00, 0x80), rgb(0x80, 0x00, 0x80), rgb(0x00, 0x80, 0x80), rgb(0xc0, 0xc0, 0xc0),
    rgb(0xc0, 0xdc, 0xc0), rgb(0xa6, 0xca, 0xf0), rgb(0x40, 0x20, 0x00), rgb(0x60, 0x20, 0x00),
    rgb(0x80, 0x20, 0x00), rgb(0xa0, 0x20, 0x00), rgb(0xc0, 0x20, 0x00), rgb(0xe0, 0x20, 0x00),
    rgb(0x00, 0x40, 0x00), rgb(0x20, 0x40, 0x00), rgb(0x40, 0x40, 0x00), rgb(0x60, 0x40, 0x00),
    rgb(0x80, 0x40, 0x00), rgb(0xa0, 0x40, 0x00), rgb(0xc0, 0x40, 0x00), rgb(0xe0, 0x40, 0x00),
    rgb(0x00, 0x60, 0x00), rgb(0x20, 0x60, 0x00), rgb(0x40, 0x60, 0x00), rgb(0x60, 0x60, 0x00),
    rgb(0x80, 0x60, 0x00), rgb(0xa0, 0x60, 0x00), rgb(0xc0, 0x60, 0x00), rgb(0xe0, 0x60, 0x00),
    rgb(0x00, 0x80, 0x00), rgb(0x20, 0x80, 0x00), rgb(0x40, 0x80, 0x00), rgb(0x60, 0x80, 0x00),
    rgb(0x80, 0x80, 0x00), rgb(0xa0, 0x80, 0x00), rgb(0xc0, 0x80, 0x00), rgb(0xe0, 0x80, 0x00),
    rgb(0x00, 0xa0, 0x00), rgb(0x20, 0xa0, 0x00), rgb(0x40, 0xa0, 0x00), rgb(0x60, 0xa0, 0x00),
    rgb(0x80, 0xa0, 0x00), rgb(0xa0, 0xa0, 0x00), rgb(0xc0, 0xa0, 0x00), rgb(0xe0, 0xa0, 0x00),
    rgb(0x00, 0xc0, 0x00), rgb(0x20, 0xc0, 0x00), rgb(0x40, 0xc0, 0x00), rgb(0x60, 0xc0, 0x00),
    rgb(0x80, 0xc0, 0x00), rgb(0xa0, 0xc0, 0x00), rgb(0xc0, 0xc0, 0x00), rgb(0xe0, 0xc0, 0x00),
    rgb(0x00, 0xe0, 0x00), rgb(0x20, 0xe0, 0x00), rgb(0x40, 0xe0, 0x00), rgb(0x60, 0xe0, 0x00),
    rgb(0x80, 0xe0, 0x00), rgb(0xa0, 0xe0, 0x00), rgb(0xc0, 0xe0, 0x00), rgb(0xe0, 0xe0, 0x00),
    rgb(0x00, 0x00, 0x40), rgb(0x20, 0x00, 0x40), rgb(0x40, 0x00, 0x40), rgb(0x60, 0x00, 0x40),
    rgb(0x80, 0x00, 0x40), rgb(0xa0, 0x00, 0x40), rgb(0xc0, 0x00, 0x40), rgb(0xe0, 0x00, 0x40),
    rgb(0x00, 0x20, 0x40), rgb(0x20, 0x20, 0x40), rgb(0x40, 0x20, 0x40), rgb(0x60, 0x20, 0x40),
    rgb(0x80, 0x20, 0x40), rgb(0xa0, 0x20, 0x40), rgb(0xc0, 0x20, 0x40), rgb(0xe0, 0x20, 0x40),
    rgb(0x00, 0x40, 0x40), rgb(0x20, 0x40, 0x40), rgb(0x40, 0x40, 0x40), rgb(0x60, 0x40, 0x40),
    rgb(0x80, 0x40, 0x40), rgb(0xa0, 0x40, 0x40), rgb(0xc0, 0x40, 0x40), rgb(0xe0, 0x40, 0x40),
    rgb(0x00, 0x60, 0x40), rgb(0x20, 0x60, 0x40), rgb(0x40, 0x60, 0x40), rgb(0x60, 0x60, 0x40),
    rgb(0x80, 0x60, 0x40), rgb(0xa0, 0x60, 0x40), rgb(0xc0, 0x60, 0x40), rgb(0xe0, 0x60, 0x40),
    rgb(0x00, 0x80, 0x40), rgb(0x20, 0x80, 0x40), rgb(0x40, 0x80, 0x40), rgb(0x60, 0x80, 0x40),
    rgb(0x80, 0x80, 0x40), rgb(0xa0, 0x80, 0x40), rgb(0xc0, 0x80, 0x40), rgb(0xe0, 0x80, 0x40),
    rgb(0x00, 0xa0, 0x40), rgb(0x20, 0xa0, 0x40), rgb(0x40, 0xa0, 0x40), rgb(0x60, 0xa0, 0x40),
    rgb(0x80, 0xa0, 0x40), rgb(0xa0, 0xa0, 0x40), rgb(0xc0, 0xa0, 0x40), rgb(0xe0, 0xa0, 0x40),
    rgb(0x00, 0xc0, 0x40), rgb(0x20, 0xc0, 0x40), rgb(0x40, 0xc0, 0x40), rgb(0x60, 0xc0, 0x40),
    rgb(0x80, 0xc0, 0x40), rgb(0xa0, 0xc0, 0x40), rgb(0xc0, 0xc0, 0x40), rgb(0xe0, 0xc0, 0x40),
    rgb(0x00, 0xe0, 0x40), rgb(0x20, 0xe0, 0x40), rgb(0x40, 0xe0, 0x40), rgb(0x60, 0xe0, 0x40),
    rgb(0x80, 0xe0, 0x40), rgb(0xa0, 0xe0, 0x40), rgb(0xc0, 0xe0, 0x40), rgb(0xe0, 0xe0, 0x40),
    rgb(0x00, 0x00, 0x80), rgb(0x20, 0x00, 0x80), rgb(0x40, 0x00, 0x80), rgb(0x60, 0x00, 0x80),
    rgb(0x80, 0x00, 0x80), rgb(0xa0, 0x00, 0x80), rgb(0xc0, 0x00, 0x80), rgb(0xe0, 0x00, 0x80),
    rgb(0x00, 0x20, 0x80), rgb(0x20, 0x20, 0x80), rgb(0x40, 0x20, 0x80), rgb(0x60, 0x20, 0x80),
    rgb(0x80, 0x20, 0x80), rgb(0xa0, 0x20, 0x80), rgb(0xc0, 0x20, 0x80), rgb(0xe0, 0x20, 0x80),
    rgb(0x00, 0x40, 0x80), rgb(0x20, 0x40, 0x80), rgb(0x40, 0x40, 0x80), rgb(0x60, 0x40, 0x80),
    rgb(0x80, 0x40, 0x80), rgb(0xa0, 0x40, 0x80), rgb(0xc0, 0x40, 0x80), rgb(0xe0, 0x40, 0x80),
    rgb(0x00, 0x60, 0x80), rgb(0x20, 0x60, 0x80), rgb(0x40, 0x60, 0x80), rgb(0x60, 0x60, 0x80),
    rgb(0x80, 0x60, 0x80), rgb(0xa0, 0x60, 0x80), rgb(0xc0, 0x60, 0x80), rgb(0xe0, 0x60, 0x80),
    rgb(0x00, 0x80, 0x80), rgb(0x20, 0x80, 0x80), rgb(0x40, 0x80, 0x80), rgb(0x60, 0x80, 0x80),
    rgb(0x80, 0x80, 0x80), rgb(0xa0, 0x80, 0x80), rgb(0xc0, 0x80, 0x80), rgb(0xe0, 0x80, 0x80),
    rgb(0x00, 0xa0, 0x80), rgb(0x20, 0xa0, 0x80), rgb(0x40, 0xa0, 0x80), rgb(0x60, 0xa0, 0x80),
    rgb(0x80, 0xa0, 0x80), rgb(0xa0, 0xa0, 0x80), rgb(0xc0, 0xa0, 0x80), rgb(0xe0, 0xa0, 0x80),
    rgb(0x00, 0xc0, 0x80), rgb(0x20, 0xc0, 0x80), rgb(0x40, 0xc0, 0x80), rgb(0x60, 0xc0, 0x80),
    rgb(0x80, 0xc0, 0x80), rgb(0xa0, 0xc0, 0x80), rgb(0xc0, 0xc0, 0x80), rgb(0xe0, 0xc0, 0x80),
    rgb(0x00, 0xe0, 0x80), rgb(0x20, 0xe0, 0x80), rgb(0x40, 0xe0, 0x80), rgb(0x60, 0xe0, 0x80),
    rgb(0x80, 0xe0, 0x80), rgb(0xa0, 0xe0, 0x80), rgb(0xc0, 0xe0, 0x80), rgb(0xe0, 0xe0, 0x80),
    rgb(0x00, 0x00, 0xc0), rgb(0x20, 0x00, 0xc0), rgb(0x40, 0x00, 0xc0), rgb(0x60, 0x00, 0xc0),
    rgb(0x80, 0x00, 0xc0), rgb(0xa0, 0x00, 0xc0), rgb(0xc0, 0x00, 0xc0), rgb(0xe0, 0x00, 0xc0),
    rgb(0x00, 0x20, 0xc0), rgb(0x20, 0x20, 0xc0), rgb(0x40, 0x20, 0xc0), rgb(0x60, 0x20, 0xc0),
    rgb(0x80, 0x20, 0xc0), rgb(0xa0, 0x20, 0xc0), rgb(0xc0, 0x20, 0xc0), rgb(0xe0, 0x20, 0xc0),
    rgb(0x00, 0x40, 0xc0), rgb(0x20, 0x40, 0xc0), rgb(0x40, 0x40, 0xc0), rgb(0x60, 0x40, 0xc0),
    rgb(0x80, 0x40, 0xc0), rgb(0xa0, 0x40, 0xc0), rgb(0xc0, 0x40, 0xc0), rgb(0xe0, 0x40, 0xc0),
    rgb(0x00, 0x60, 0xc0), rgb(0x20, 0x60, 0xc0), rgb(0x40, 0x60, 0xc0), rgb(0x60, 0x60, 0xc0),
    rgb(0x80, 0x60, 0xc0), rgb(0xa0, 0x60, 0xc0), rgb(0xc0, 0x60, 0xc0), rgb(0xe0, 0x60, 0xc0),
    rgb(0x00, 0x80, 0xc0), rgb(0x20, 0x80, 0xc0), rgb(0x40, 0x80, 0xc0), rgb(0x60, 0x80, 0xc0),
    rgb(0x80, 0x80, 0xc0), rgb(0xa0, 0x80, 0xc0), rgb(0xc0, 0x80, 0xc0), rgb(0xe0, 0x80, 0xc0),
    rgb(0x00, 0xa0, 0xc0), rgb(0x20, 0xa0, 0xc0), rgb(0x40, 0xa0, 0xc0), rgb(0x60, 0xa0, 0xc0),
    rgb(0x80, 0xa0, 0xc0), rgb(0xa0, 0xa0, 0xc0), rgb(0xc0, 0xa0, 0xc0), rgb(0xe0, 0xa0, 0xc0),
    rgb(0x00, 0xc0, 0xc0), rgb(0x20, 0xc0, 0xc0), rgb(0x40, 0xc0, 0xc0), rgb(0x60, 0xc0, 0xc0),
    rgb(0x80, 0xc0, 0xc0), rgb(0xa0, 0xc0, 0xc0), rgb(0xff, 0xfb, 0xf0), rgb(0xa0, 0xa0, 0xa4),
    rgb(0x80, 0x80, 0x80), rgb(0xff, 0x00, 0x00), rgb(0x00, 0xff, 0x00), rgb(0xff, 0xff, 0x00),
    rgb(0x00, 0x00, 0xff), rgb(0xff, 0x00, 0xff), rgb(0x00, 0xff, 0xff), rgb(0xff, 0xff, 0xff),
];

/// The default color table for bitmaps of `bit_count` bits per pixel.
#[inline]
pub fn default_color_table(bit_count: u16) -> Option<&'static [Rgb]> {
    match bit_count {
        1 => Some(&DEFAULT_COLORS_1),
        4 => Some(&DEFAULT_COLORS_4),
        8 => Some(&DEFAULT_COLORS_8),
        _ => None,
    }
}

/// Stock system color `i`, for `i` in `0..20`.
#[inline]
pub fn stock_color(i: usize) -> Rgb {
    if i < NB_RESERVED_COLORS / 2 {
        DEFAULT_COLORS_8[i]
    } else {
        DEFAULT_COLORS_8[256 - NB_RESERVED_COLORS + i]
    }
}

/// The twenty stock system colors, in default palette order.
#[inline]
pub fn stock_colors() -> [Rgb; NB_RESERVED_COLORS] {
    let mut colors = [Rgb::BLACK; NB_RESERVED_COLORS];
    for (i, c) in colors.iter_mut().enumerate() {
        *c = stock_color(i);
    }
    colors
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stock_colors() {
        let stock = stock_colors();
        assert_eq!(stock[0], Rgb::BLACK);
        assert_eq!(stock[1], Rgb::new(0x80, 0, 0));
        assert_eq!(stock[7], Rgb::new(0xc0, 0xc0, 0xc0));
        assert_eq!(stock[12], Rgb::new(0x80, 0x80, 0x80));
        assert_eq!(stock[19], Rgb::WHITE);
    }
}
