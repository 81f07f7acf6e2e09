// MIT/Apache2 License

use proptest::prelude::*;
use rasterop::{scale_down, scale_up, ColorShifts, Rgb};

proptest! {
    #[test]
    fn narrowing_is_monotonic(
        a in 0u32..256,
        b in 0u32..256,
        width in prop::sample::select(vec![1u32, 4, 5, 6, 8]),
    ) {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(scale_down(lo, 8, width) <= scale_down(hi, 8, width));
    }

    #[test]
    fn round_trip_within_one_step(
        value in 0u32..256,
        width in prop::sample::select(vec![1u32, 4, 5, 6, 8]),
    ) {
        let back = scale_up(scale_down(value, 8, width), width, 8);
        let step = 1 << (8 - width);
        prop_assert!((back as i32 - value as i32).abs() < step);
        if width == 8 {
            prop_assert_eq!(back, value);
        }
    }

    #[test]
    fn direct_colors_keep_their_order(r in any::<u8>(), g in any::<u8>(), b in any::<u8>()) {
        let shifts = ColorShifts::from_masks(0xf800, 0x07e0, 0x001f);
        let rgb = shifts.to_rgb(shifts.to_physical(Rgb::new(r, g, b)));
        prop_assert!((rgb.red as i32 - r as i32).abs() < 8);
        prop_assert!((rgb.green as i32 - g as i32).abs() < 4);
        prop_assert!((rgb.blue as i32 - b as i32).abs() < 8);
    }
}

#[test]
fn extremes_survive_widening() {
    for &width in &[1u32, 4, 5, 6, 8] {
        let max = (1 << width) - 1;
        assert_eq!(scale_up(max, width, 8), 255);
        assert_eq!(scale_up(0, width, 8), 0);
    }
}
