// MIT/Apache2 License

use crate::{
    palette::{stock_color, LogicalPalette, PaletteStore, NB_RESERVED_COLORS},
    ColorKind, ColorRef, PixelFormat, Rgb,
};

/// Turns logical colors into native pixels and back.
///
/// A resolver borrows the system palette store, and optionally the logical palette currently
/// selected for drawing. Without a logical palette, palette references are looked up in the
/// stock palette. Resolution never fails: bad indices and unrealized palettes degrade to the
/// closest thing we can draw, with a warning.
#[derive(Debug, Copy, Clone)]
pub struct ColorResolver<'a> {
    store: &'a PaletteStore,
    palette: Option<&'a LogicalPalette>,
}

impl<'a> ColorResolver<'a> {
    #[inline]
    pub fn new(store: &'a PaletteStore) -> Self {
        Self {
            store,
            palette: None,
        }
    }

    /// Resolve palette references against `palette`.
    #[inline]
    pub fn with_palette(mut self, palette: &'a LogicalPalette) -> Self {
        self.palette = Some(palette);
        self
    }

    #[inline]
    pub fn store(&self) -> &'a PaletteStore {
        self.store
    }

    #[inline]
    pub fn palette(&self) -> Option<&'a LogicalPalette> {
        self.palette
    }

    /// The native pixel that draws `color` on a surface of `format`.
    pub fn resolve_to_native(&self, color: ColorRef, format: &PixelFormat) -> u32 {
        if let ColorRef::DibIndex(_) = color {
            return 0;
        }

        match format.kind {
            ColorKind::Mono => self.color_rgb(color).is_light() as u32,
            ColorKind::Direct(ref shifts) => match self.mapped_index(color) {
                Some(pixel) => pixel,
                None => shifts.to_physical(self.color_rgb(color)),
            },
            ColorKind::Gray { max } => match self.mapped_index(color) {
                Some(pixel) => pixel,
                None => {
                    let luma = self.color_rgb(color).luma_weighted() as u64;
                    (luma * max as u64 / 25500) as u32
                }
            },
            ColorKind::Indexed => self.indexed_pixel(color),
        }
    }

    /// The color a native pixel of `format` shows.
    pub fn resolve_to_rgb(&self, pixel: u32, format: &PixelFormat) -> Rgb {
        match format.kind {
            ColorKind::Mono => {
                if pixel & 1 != 0 {
                    Rgb::WHITE
                } else {
                    Rgb::BLACK
                }
            }
            ColorKind::Direct(ref shifts) => shifts.to_rgb(pixel),
            ColorKind::Gray { max } => {
                let level = if max == 0 {
                    0
                } else {
                    ((pixel.min(max) as u64 * 255) / max as u64) as u8
                };
                Rgb::new(level, level, level)
            }
            ColorKind::Indexed => self.store.pixel_color(pixel),
        }
    }

    /// The system palette color closest to `color`.
    ///
    /// Palette references are first looked up in the logical palette.
    pub fn get_nearest_color(&self, color: ColorRef) -> Rgb {
        let rgb = match color {
            ColorRef::Rgb(rgb) => rgb,
            ColorRef::DibIndex(_) => Rgb::BLACK,
            ColorRef::PaletteIndex(index) => match self.palette_entry(index as usize) {
                Some(rgb) => rgb,
                None => {
                    log::warn!("Palette index {} is out of range, using entry 0", index);
                    self.palette_entry(0).unwrap_or(Rgb::BLACK)
                }
            },
            ColorRef::PaletteRgb(rgb) => match self.palette {
                Some(palette) if !palette.is_empty() => {
                    palette.entries()[palette.nearest_index(rgb)].rgb()
                }
                Some(_) => rgb,
                None => stock_color(nearest_stock_index(rgb)),
            },
        };

        if self.store.palette_size() == 0 {
            return rgb;
        }

        let nearest = self.store.nearest_system_color(rgb);
        log::trace!("{:?} -> nearest {:?}", color, nearest);
        nearest
    }

    /// Can `color` be drawn without dithering?
    #[inline]
    pub fn is_solid_color(&self, color: ColorRef) -> bool {
        match color {
            ColorRef::Rgb(rgb) => self.store.is_solid_color(rgb),
            _ => true,
        }
    }

    /// The color a logical color stands for, ignoring any realization.
    fn color_rgb(&self, color: ColorRef) -> Rgb {
        match color {
            ColorRef::Rgb(rgb) | ColorRef::PaletteRgb(rgb) => rgb,
            ColorRef::DibIndex(_) => Rgb::BLACK,
            ColorRef::PaletteIndex(index) => match self.palette_entry(index as usize) {
                Some(rgb) => rgb,
                None => {
                    log::warn!("Palette index {} is out of range, using black", index);
                    Rgb::BLACK
                }
            },
        }
    }

    /// On fixed displays, a palette index keeps whatever pixel its palette was realized to.
    fn mapped_index(&self, color: ColorRef) -> Option<u32> {
        let index = match color {
            ColorRef::PaletteIndex(index) => index as usize,
            _ => return None,
        };
        self.palette?.mapping()?.get(index).copied()
    }

    fn indexed_pixel(&self, color: ColorRef) -> u32 {
        match color {
            ColorRef::Rgb(rgb) => self.store.lookup_pixel(rgb),
            ColorRef::DibIndex(_) => 0,
            ColorRef::PaletteIndex(index) => {
                let index = index as usize;
                let rgb = match self.palette_entry(index) {
                    Some(rgb) => rgb,
                    None => {
                        log::warn!("Palette index {} is out of range, using black", index);
                        return self.store.palette_to_native(0);
                    }
                };
                self.realized_pixel(index, rgb)
            }
            ColorRef::PaletteRgb(rgb) => match self.palette {
                Some(palette) if !palette.is_empty() => {
                    let index = palette.nearest_index(rgb);
                    self.realized_pixel(index, palette.entries()[index].rgb())
                }
                _ => self.store.lookup_pixel(rgb),
            },
        }
    }

    /// Pixel of logical entry `index`, or the nearest system color if the palette has not been
    /// realized.
    fn realized_pixel(&self, index: usize, rgb: Rgb) -> u32 {
        match self.palette {
            Some(palette) => match palette.mapping().and_then(|m| m.get(index)) {
                Some(&pixel) => pixel,
                None => {
                    log::warn!("Palette is not realized, using the nearest system color");
                    self.store.lookup_pixel(rgb)
                }
            },
            None => self.store.lookup_system_pixel(rgb),
        }
    }

    fn palette_entry(&self, index: usize) -> Option<Rgb> {
        match self.palette {
            Some(palette) => palette.entry(index).map(|e| e.rgb()),
            None if index < NB_RESERVED_COLORS => Some(stock_color(index)),
            None => None,
        }
    }
}

fn nearest_stock_index(rgb: Rgb) -> usize {
    (0..NB_RESERVED_COLORS)
        .min_by_key(|&i| stock_color(i).distance_squared(rgb))
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::palette::{PaletteConfig, PaletteEntry, SoftColormap, Visual};

    fn true_color() -> PaletteStore {
        PaletteStore::new(
            Visual::true_color(16, 0xf800, 0x07e0, 0x001f),
            Box::new(SoftColormap::new(256)),
            PaletteConfig::default(),
        )
        .unwrap()
    }

    fn pseudo_color() -> PaletteStore {
        PaletteStore::new(
            Visual::pseudo_color(8),
            Box::new(SoftColormap::new(256)),
            PaletteConfig {
                copy_default_colors: 0,
                ..Default::default()
            },
        )
        .unwrap()
    }

    #[test]
    fn test_direct_color() {
        let store = true_color();
        let resolver = ColorResolver::new(&store);
        let format = PixelFormat::rgb565();

        let red = ColorRef::Rgb(Rgb::new(0xff, 0, 0));
        assert_eq!(resolver.resolve_to_native(red, &format), 0xf800);
        assert_eq!(resolver.resolve_to_rgb(0xf800, &format), Rgb::new(0xff, 0, 0));
        assert_eq!(resolver.resolve_to_native(ColorRef::DibIndex(7), &format), 0);
    }

    #[test]
    fn test_mono_threshold() {
        let store = true_color();
        let resolver = ColorResolver::new(&store);
        let mono = PixelFormat::mono();

        let above = ColorRef::Rgb(Rgb::new(0x80, 0x80, 0x7f));
        let at = ColorRef::Rgb(Rgb::new(0x7f, 0x7f, 0x80));
        assert_eq!(resolver.resolve_to_native(above, &mono), 1);
        assert_eq!(resolver.resolve_to_native(at, &mono), 0);
    }

    #[test]
    fn test_gray_levels() {
        let store = true_color();
        let resolver = ColorResolver::new(&store);
        let gray = PixelFormat::gray(8);

        assert_eq!(resolver.resolve_to_native(ColorRef::WHITE, &gray), 255);
        assert_eq!(resolver.resolve_to_native(ColorRef::BLACK, &gray), 0);
        assert_eq!(resolver.resolve_to_rgb(255, &gray), Rgb::WHITE);
    }

    #[test]
    fn test_palette_index_through_mapping() {
        let store = pseudo_color();
        let mut palette = LogicalPalette::new(vec![
            PaletteEntry::new(1, 2, 3),
            PaletteEntry::new(0xff, 0xff, 0xff),
        ]);
        store.realize(&mut palette, true);

        let resolver = ColorResolver::new(&store).with_palette(&palette);
        let format = PixelFormat::indexed(8);
        let mapping = palette.mapping().unwrap().to_vec();

        assert_eq!(
            resolver.resolve_to_native(ColorRef::PaletteIndex(0), &format),
            mapping[0]
        );
        assert_eq!(
            resolver.resolve_to_native(ColorRef::PaletteRgb(Rgb::new(0xf0, 0xf0, 0xf0)), &format),
            mapping[1]
        );
        // out of range falls back to black
        assert_eq!(
            resolver.resolve_to_native(ColorRef::PaletteIndex(9), &format),
            store.palette_to_native(0)
        );
        assert_eq!(resolver.resolve_to_rgb(mapping[0], &format), Rgb::new(1, 2, 3));
    }

    #[test]
    fn test_unrealized_palette_uses_nearest() {
        let store = pseudo_color();
        let palette = LogicalPalette::new(vec![PaletteEntry::new(0xfe, 0, 0)]);
        let resolver = ColorResolver::new(&store).with_palette(&palette);
        let format = PixelFormat::indexed(8);

        assert_eq!(
            resolver.resolve_to_native(ColorRef::PaletteIndex(0), &format),
            store.lookup_pixel(Rgb::new(0xff, 0, 0))
        );
    }

    #[test]
    fn test_nearest_color() {
        let store = pseudo_color();
        let resolver = ColorResolver::new(&store);
        assert_eq!(
            resolver.get_nearest_color(ColorRef::Rgb(Rgb::new(0xfe, 0xfe, 0xfe))),
            Rgb::WHITE
        );
        assert_eq!(
            resolver.get_nearest_color(ColorRef::PaletteIndex(1)),
            Rgb::new(0x80, 0, 0)
        );

        let virt = true_color();
        let resolver = ColorResolver::new(&virt);
        let odd = Rgb::new(1, 2, 3);
        assert_eq!(resolver.get_nearest_color(ColorRef::Rgb(odd)), odd);
    }

    #[test]
    fn test_index_refs_are_solid() {
        let store = pseudo_color();
        let resolver = ColorResolver::new(&store);
        assert!(resolver.is_solid_color(ColorRef::PaletteIndex(3)));
        assert!(resolver.is_solid_color(ColorRef::WHITE));
    }
}
