// MIT/Apache2 License

use proptest::prelude::*;
use rasterop::{
    copy_image_bits, dib_layout, zeropad_mask, BitmapInfo, DeviceImageBits, ImageLayout, Rectangle,
    Transfer,
};

fn layout(bit_count: u16) -> ImageLayout {
    ImageLayout {
        is_r8g8b8: true,
        ..dib_layout(bit_count)
    }
}

#[test]
fn unchanged_bits_are_not_copied() {
    for &bit_count in &[1u16, 4, 8, 16, 24, 32] {
        let info = BitmapInfo::new(5, -3, bit_count);
        let bits: Vec<u8> = (0..info.image_size()).map(|i| i as u8).collect();
        let out = copy_image_bits(
            &info,
            &layout(bit_count),
            DeviceImageBits::borrowed(&bits),
            Rectangle::new(0, 0, 5, 3),
            &Transfer::default(),
        )
        .unwrap();
        assert!(!out.is_copy(), "{} bpp", bit_count);
        assert_eq!(out.as_bytes(), &bits[..]);
        assert_eq!(out.as_bytes().as_ptr(), bits.as_ptr());
    }
}

/// Is bit `bit` of the row, counting from the most significant bit of the first byte, set?
fn bit_set(row: &[u8], bit: usize) -> bool {
    row[bit / 8] & (0x80 >> (bit % 8)) != 0
}

proptest! {
    #[test]
    fn padding_is_cleared_on_request(
        width in 1u32..70,
        height in 1u32..4,
        bit_count in prop::sample::select(vec![1u16, 4, 8, 16, 24]),
        seed in any::<u8>(),
        bottom_up in any::<bool>(),
    ) {
        let signed_height = if bottom_up { height as i32 } else { -(height as i32) };
        let info = BitmapInfo::new(width as i32, signed_height, bit_count);
        let stride = info.stride();
        let bits: Vec<u8> = (0..info.image_size())
            .map(|i| (i as u8).wrapping_mul(31).wrapping_add(seed) | 0x11)
            .collect();
        let rect = Rectangle::new(0, 0, width as i32, height as i32);
        let used_bits = width as usize * bit_count as usize;

        let cleared = copy_image_bits(
            &info,
            &layout(bit_count),
            DeviceImageBits::borrowed(&bits),
            rect,
            &Transfer {
                zeropad_mask: zeropad_mask(width, bit_count as u8),
                ..Default::default()
            },
        )
        .unwrap();
        prop_assert_eq!(cleared.stride(), stride);
        for row in cleared.as_bytes().chunks_exact(stride).take(height as usize) {
            for bit in used_bits..stride * 8 {
                prop_assert!(!bit_set(row, bit), "padding bit {} is set", bit);
            }
        }

        let untouched = copy_image_bits(
            &info,
            &layout(bit_count),
            DeviceImageBits::borrowed(&bits),
            rect,
            &Transfer::default(),
        )
        .unwrap();
        for (y, row) in untouched.as_bytes().chunks_exact(stride).take(height as usize).enumerate() {
            let src_y = if bottom_up { height as usize - 1 - y } else { y };
            prop_assert_eq!(row, &bits[src_y * stride..(src_y + 1) * stride]);
        }
    }
}
