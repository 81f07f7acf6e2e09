// MIT/Apache2 License

/// A device-independent 24-bit color.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Rgb {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);
    pub const WHITE: Rgb = Rgb::new(0xff, 0xff, 0xff);

    #[inline]
    pub const fn new(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// Unpack a `0x00bbggrr` value.
    #[inline]
    pub const fn from_colorref(raw: u32) -> Self {
        Self::new(raw as u8, (raw >> 8) as u8, (raw >> 16) as u8)
    }

    /// Pack into a `0x00bbggrr` value.
    #[inline]
    pub const fn into_colorref(self) -> u32 {
        self.red as u32 | (self.green as u32) << 8 | (self.blue as u32) << 16
    }

    /// Squared euclidean distance between two colors.
    #[inline]
    pub fn distance_squared(self, other: Rgb) -> u32 {
        let dr = self.red as i32 - other.red as i32;
        let dg = self.green as i32 - other.green as i32;
        let db = self.blue as i32 - other.blue as i32;
        (dr * dr + dg * dg + db * db) as u32
    }

    /// Is this color brighter than 50% gray, going by the sum of its channels?
    #[inline]
    pub fn is_light(self) -> bool {
        self.red as u32 + self.green as u32 + self.blue as u32 > 255 * 3 / 2
    }

    /// Weighted luma on a 0..=25500 scale.
    #[inline]
    pub fn luma_weighted(self) -> u32 {
        self.red as u32 * 30 + self.green as u32 * 59 + self.blue as u32 * 11
    }

    /// Widen each channel to 16 bits, the way colormap cells store them.
    #[inline]
    pub fn clamp_u16(self) -> (u16, u16, u16) {
        let widen = |c: u8| c as u16 * (65535 / 255);
        (widen(self.red), widen(self.green), widen(self.blue))
    }
}

/// A logical color request.
///
/// This mirrors the four kinds of `COLORREF` a drawing call can carry. Only `Rgb` is
/// device independent; the other three are interpreted against a palette.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ColorRef {
    /// An explicit color.
    Rgb(Rgb),
    /// An index into the currently selected logical palette.
    PaletteIndex(u16),
    /// The logical palette entry nearest to this color.
    PaletteRgb(Rgb),
    /// An index into a DIB color table. Devices render these as pixel 0.
    DibIndex(u16),
}

impl ColorRef {
    pub const BLACK: ColorRef = ColorRef::Rgb(Rgb::BLACK);
    pub const WHITE: ColorRef = ColorRef::Rgb(Rgb::WHITE);

    /// Decode a raw `COLORREF`.
    #[inline]
    pub fn from_raw(raw: u32) -> Self {
        if raw >> 16 == 0x10ff {
            ColorRef::DibIndex(raw as u16)
        } else if raw & (1 << 24) != 0 {
            ColorRef::PaletteIndex(raw as u16)
        } else if raw >> 24 == 2 {
            ColorRef::PaletteRgb(Rgb::from_colorref(raw))
        } else {
            ColorRef::Rgb(Rgb::from_colorref(raw))
        }
    }

    /// Encode as a raw `COLORREF`.
    #[inline]
    pub fn into_raw(self) -> u32 {
        match self {
            ColorRef::Rgb(rgb) => rgb.into_colorref(),
            ColorRef::PaletteIndex(i) => 0x0100_0000 | i as u32,
            ColorRef::PaletteRgb(rgb) => 0x0200_0000 | rgb.into_colorref(),
            ColorRef::DibIndex(i) => 0x10ff_0000 | i as u32,
        }
    }
}

impl From<Rgb> for ColorRef {
    #[inline]
    fn from(rgb: Rgb) -> ColorRef {
        ColorRef::Rgb(rgb)
    }
}
