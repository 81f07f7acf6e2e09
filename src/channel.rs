// MIT/Apache2 License

use crate::Rgb;
use std::cmp;

/// Position and width of one color channel inside a native pixel.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
pub struct ChannelShift {
    /// Index of the lowest bit of the channel.
    pub shift: u32,
    /// Number of bits in the channel.
    pub scale: u32,
    /// Largest value the channel can hold, `2^scale - 1`.
    pub max: u32,
}

impl ChannelShift {
    /// The channel is absent from the pixel.
    pub const NONE: ChannelShift = ChannelShift {
        shift: 0,
        scale: 0,
        max: 0,
    };

    /// Read the shift and scale off of a channel mask.
    #[inline]
    pub fn from_mask(mask: u32) -> ChannelShift {
        if mask == 0 {
            return Self::NONE;
        }

        let shift = mask.trailing_zeros();
        let scale = 32 - (mask >> shift).leading_zeros();
        ChannelShift {
            shift,
            scale,
            max: low_bits(scale),
        }
    }

    #[inline]
    pub fn is_present(&self) -> bool {
        self.scale != 0
    }

    /// The mask this channel occupies.
    #[inline]
    pub fn mask(&self) -> u32 {
        self.max << self.shift
    }

    /// Narrow a wide channel to at most 8 bits by dropping its low bits.
    #[inline]
    pub fn to_logical(self) -> ChannelShift {
        if self.scale > 8 {
            ChannelShift {
                shift: self.shift + self.scale - 8,
                scale: 8,
                max: 0xff,
            }
        } else {
            self
        }
    }

    /// Place an 8-bit channel value into its native bit position.
    #[inline]
    pub fn encode(&self, value: u8) -> u32 {
        if !self.is_present() {
            return 0;
        }
        (scale_up(value as u32, 8, self.scale) & self.max) << self.shift
    }

    /// Pull this channel out of a native pixel and widen it to 8 bits.
    #[inline]
    pub fn decode(&self, pixel: u32) -> u8 {
        if !self.is_present() {
            return 0;
        }
        let value = (pixel >> self.shift) & self.max;
        scale_up(value, self.scale, 8) as u8
    }
}

/// Compute the [`ChannelShift`] for a channel mask.
#[inline]
pub fn compute_shift(mask: u32) -> ChannelShift {
    ChannelShift::from_mask(mask)
}

/// Change the bit width of a channel value.
///
/// When widening, the high bits of the value are replicated into the vacated low bits so that
/// the maximum value maps onto the maximum value. When narrowing, the low bits are dropped.
#[inline]
pub fn scale_up(value: u32, from_bits: u32, to_bits: u32) -> u32 {
    if from_bits == 0 || to_bits == 0 {
        return 0;
    }
    if from_bits >= to_bits {
        return scale_down(value, from_bits, to_bits);
    }

    let value = value & low_bits(from_bits);
    let mut out = 0;
    let mut filled = 0;
    while filled < to_bits {
        let take = cmp::min(from_bits, to_bits - filled);
        out = (out << take) | (value >> (from_bits - take));
        filled += take;
    }
    out
}

/// Narrow a channel value by truncating its low bits.
#[inline]
pub fn scale_down(value: u32, from_bits: u32, to_bits: u32) -> u32 {
    if to_bits == 0 {
        return 0;
    }
    if to_bits >= from_bits {
        return value & low_bits(from_bits);
    }
    (value & low_bits(from_bits)) >> (from_bits - to_bits)
}

/// Like [`scale_down`], but rounds to the nearest representable value.
#[inline]
pub fn scale_down_rounded(value: u32, from_bits: u32, to_bits: u32) -> u32 {
    if to_bits == 0 || to_bits >= from_bits {
        return scale_down(value, from_bits, to_bits);
    }
    let from_max = low_bits(from_bits) as u64;
    let to_max = low_bits(to_bits) as u64;
    let value = (value as u64).min(from_max);
    ((value * to_max + from_max / 2) / from_max) as u32
}

#[inline]
fn low_bits(bits: u32) -> u32 {
    if bits >= 32 {
        u32::MAX
    } else {
        (1 << bits) - 1
    }
}

/// Per-channel placement for a direct color format.
///
/// The physical shifts describe the device encoding. The logical shifts cover at most 8 bits
/// of each channel and are used to read pixels back as RGB.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
pub struct ColorShifts {
    pub physical_red: ChannelShift,
    pub physical_green: ChannelShift,
    pub physical_blue: ChannelShift,
    pub logical_red: ChannelShift,
    pub logical_green: ChannelShift,
    pub logical_blue: ChannelShift,
}

impl ColorShifts {
    /// Compute the shifts for a set of channel masks.
    #[inline]
    pub fn from_masks(red: u32, green: u32, blue: u32) -> ColorShifts {
        let (physical_red, physical_green, physical_blue) = (
            ChannelShift::from_mask(red),
            ChannelShift::from_mask(green),
            ChannelShift::from_mask(blue),
        );
        ColorShifts {
            physical_red,
            physical_green,
            physical_blue,
            logical_red: physical_red.to_logical(),
            logical_green: physical_green.to_logical(),
            logical_blue: physical_blue.to_logical(),
        }
    }

    /// The channel masks these shifts were computed from.
    #[inline]
    pub fn masks(&self) -> [u32; 3] {
        [
            self.physical_red.mask(),
            self.physical_green.mask(),
            self.physical_blue.mask(),
        ]
    }

    /// Do the masks describe the plain `0xff0000/0xff00/0xff` layout?
    #[inline]
    pub fn is_r8g8b8(&self) -> bool {
        self.masks() == [0x00ff_0000, 0x0000_ff00, 0x0000_00ff]
    }

    /// Encode a color as a native pixel.
    #[inline]
    pub fn to_physical(&self, color: Rgb) -> u32 {
        self.physical_red.encode(color.red)
            | self.physical_green.encode(color.green)
            | self.physical_blue.encode(color.blue)
    }

    /// Decode a native pixel to a color.
    #[inline]
    pub fn to_rgb(&self, pixel: u32) -> Rgb {
        Rgb::new(
            self.logical_red.decode(pixel),
            self.logical_green.decode(pixel),
            self.logical_blue.decode(pixel),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compute_shift() {
        let s = compute_shift(0xf800);
        assert_eq!(s, ChannelShift { shift: 11, scale: 5, max: 31 });
        assert_eq!(compute_shift(0), ChannelShift::NONE);
        assert_eq!(compute_shift(0xff00_0000).shift, 24);
    }

    #[test]
    fn test_wide_channel_logical() {
        let s = compute_shift(0x3ff << 20);
        assert_eq!(s.scale, 10);
        let l = s.to_logical();
        assert_eq!(l, ChannelShift { shift: 22, scale: 8, max: 0xff });
    }

    #[test]
    fn test_scale_extremes() {
        for &bits in [1u32, 4, 5, 6, 8].iter() {
            assert_eq!(scale_down(0xff, 8, bits), (1 << bits) - 1);
            assert_eq!(scale_up((1 << bits) - 1, bits, 8), 0xff);
            assert_eq!(scale_up(0, bits, 8), 0);
        }
        assert_eq!(scale_up(0x10, 5, 8), 0x84);
        assert_eq!(scale_up(0xab, 8, 10), 0x2ae);
        assert_eq!(scale_down_rounded(0x80, 8, 1), 1);
        assert_eq!(scale_down_rounded(0x7f, 8, 1), 0);
    }

    #[test]
    fn test_round_trip_within_step() {
        for &bits in [1u32, 4, 5, 6, 8].iter() {
            let step = 1i32 << (8 - bits);
            let mut last = 0;
            for v in 0..=255u32 {
                let down = scale_down(v, 8, bits);
                assert!(down >= last);
                last = down;
                let back = scale_up(down, bits, 8) as i32;
                assert!((back - v as i32).abs() < step, "{} bits, {} -> {}", bits, v, back);
            }
        }
    }

    #[test]
    fn test_rgb565_round_trip() {
        let shifts = ColorShifts::from_masks(0xf800, 0x07e0, 0x001f);
        assert_eq!(shifts.to_physical(Rgb::WHITE), 0xffff);
        assert_eq!(shifts.to_physical(Rgb::new(0xff, 0, 0)), 0xf800);
        assert_eq!(shifts.to_rgb(0x07e0), Rgb::new(0, 0xff, 0));
        assert!(!shifts.is_r8g8b8());
        assert!(ColorShifts::from_masks(0xff0000, 0xff00, 0xff).is_r8g8b8());
    }
}
