// MIT/Apache2 License

use crate::{ColorRef, ColorResolver, Error, PixelFormat, Result, Rgb};

/// A tile of native pixels, repeated across a surface starting at the surface origin.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Pattern {
    width: u32,
    height: u32,
    pixels: Vec<u32>,
}

impl Pattern {
    /// A tile of one pixel.
    #[inline]
    pub fn solid(pixel: u32) -> Self {
        Self {
            width: 1,
            height: 1,
            pixels: vec![pixel],
        }
    }

    /// A tile of `width` by `height` pixels, given row by row.
    #[inline]
    pub fn new(width: u32, height: u32, pixels: Vec<u32>) -> Result<Self> {
        if width == 0 || height == 0 || pixels.len() != width as usize * height as usize {
            return Err(Error::BadParameter("pattern size does not match its pixels"));
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    /// The pixel of a one-pixel tile.
    #[inline]
    pub fn solid_pixel(&self) -> Option<u32> {
        match self.pixels.as_slice() {
            [pixel] => Some(*pixel),
            _ => None,
        }
    }

    /// The pattern pixel that lands on surface coordinate `(x, y)`.
    #[inline]
    pub fn pixel_at(&self, x: i32, y: i32) -> u32 {
        let (w, h) = (self.width as i64, self.height as i64);
        let tx = (x as i64).rem_euclid(w) as usize;
        let ty = (y as i64).rem_euclid(h) as usize;
        self.pixels[ty * self.width as usize + tx]
    }

    /// Replace every pixel of the tile.
    #[inline]
    pub fn map<F: FnMut(u32) -> u32>(&self, f: F) -> Pattern {
        Pattern {
            width: self.width,
            height: self.height,
            pixels: self.pixels.iter().copied().map(f).collect(),
        }
    }
}

/// What areas are filled with.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Brush {
    Solid(ColorRef),
    /// A tile of colors.
    Tile { width: u32, height: u32, colors: Vec<Rgb> },
    /// Draws nothing.
    Null,
}

impl Default for Brush {
    #[inline]
    fn default() -> Self {
        Brush::Solid(ColorRef::WHITE)
    }
}

impl From<ColorRef> for Brush {
    #[inline]
    fn from(color: ColorRef) -> Brush {
        Brush::Solid(color)
    }
}

impl From<Rgb> for Brush {
    #[inline]
    fn from(color: Rgb) -> Brush {
        Brush::Solid(ColorRef::Rgb(color))
    }
}

impl Brush {
    #[inline]
    pub fn is_null(&self) -> bool {
        matches!(self, Brush::Null)
    }

    /// The native tile this brush paints on a surface of `format`. A null brush has none.
    pub fn resolve(&self, resolver: &ColorResolver<'_>, format: &PixelFormat) -> Result<Option<Pattern>> {
        match self {
            Brush::Null => Ok(None),
            Brush::Solid(color) => Ok(Some(Pattern::solid(
                resolver.resolve_to_native(*color, format),
            ))),
            Brush::Tile {
                width,
                height,
                colors,
            } => {
                let pixels = colors
                    .iter()
                    .map(|&c| resolver.resolve_to_native(ColorRef::Rgb(c), format))
                    .collect();
                Pattern::new(*width, *height, pixels).map(Some)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::palette::{PaletteConfig, PaletteStore, SoftColormap, Visual};

    #[test]
    fn test_pattern_wraps_from_origin() {
        let pattern = Pattern::new(2, 2, vec![1, 2, 3, 4]).unwrap();
        assert_eq!(pattern.pixel_at(0, 0), 1);
        assert_eq!(pattern.pixel_at(3, 0), 2);
        assert_eq!(pattern.pixel_at(-1, -1), 4);
        assert_eq!(pattern.pixel_at(2, 5), 3);
        assert!(Pattern::new(2, 2, vec![1]).is_err());
    }

    #[test]
    fn test_resolve_brushes() {
        let store = PaletteStore::new(
            Visual::true_color(24, 0xff0000, 0xff00, 0xff),
            Box::new(SoftColormap::new(256)),
            PaletteConfig::default(),
        )
        .unwrap();
        let resolver = ColorResolver::new(&store);
        let format = PixelFormat::rgb888();

        assert_eq!(Brush::Null.resolve(&resolver, &format).unwrap(), None);
        let solid = Brush::from(Rgb::new(0x12, 0x34, 0x56))
            .resolve(&resolver, &format)
            .unwrap()
            .unwrap();
        assert_eq!(solid.solid_pixel(), Some(0x123456));

        let tile = Brush::Tile {
            width: 2,
            height: 1,
            colors: vec![Rgb::BLACK, Rgb::WHITE],
        };
        let tile = tile.resolve(&resolver, &format).unwrap().unwrap();
        assert_eq!(tile.pixels(), &[0, 0xffffff]);
    }
}
