// MIT/Apache2 License

use super::defaults::stock_colors;
use crate::Rgb;

bitflags::bitflags! {
    /// Flags an application can put on a logical palette entry.
    #[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
    pub struct PaletteEntryFlags: u8 {
        /// The entry will be animated; nothing else may map onto its system slot.
        const RESERVED = 0x01;
        /// The red and green bytes hold an index into the system palette.
        const EXPLICIT = 0x02;
        /// Always give the entry its own system slot, even if its color already exists.
        const NOCOLLAPSE = 0x04;
    }
}

/// One entry of a logical palette.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct PaletteEntry {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
    pub flags: PaletteEntryFlags,
}

impl PaletteEntry {
    #[inline]
    pub const fn new(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red,
            green,
            blue,
            flags: PaletteEntryFlags::empty(),
        }
    }

    /// An entry that refers straight to system palette slot `index`.
    #[inline]
    pub const fn explicit(index: u16) -> Self {
        Self {
            red: index as u8,
            green: (index >> 8) as u8,
            blue: 0,
            flags: PaletteEntryFlags::EXPLICIT,
        }
    }

    #[inline]
    pub fn with_flags(mut self, flags: PaletteEntryFlags) -> Self {
        self.flags = flags;
        self
    }

    #[inline]
    pub fn rgb(&self) -> Rgb {
        Rgb::new(self.red, self.green, self.blue)
    }

    /// The system palette slot an explicit entry refers to.
    #[inline]
    pub fn explicit_index(&self) -> u16 {
        self.red as u16 | (self.green as u16) << 8
    }
}

impl From<Rgb> for PaletteEntry {
    #[inline]
    fn from(rgb: Rgb) -> Self {
        Self::new(rgb.red, rgb.green, rgb.blue)
    }
}

/// An application-defined palette, plus the pixels its entries were realized to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogicalPalette {
    entries: Vec<PaletteEntry>,
    mapping: Option<Vec<u32>>,
}

impl LogicalPalette {
    #[inline]
    pub fn new(entries: Vec<PaletteEntry>) -> Self {
        Self {
            entries,
            mapping: None,
        }
    }

    /// The stock palette holding the twenty system colors.
    #[inline]
    pub fn default_palette() -> Self {
        Self::new(stock_colors().iter().map(|&c| PaletteEntry::from(c)).collect())
    }

    #[inline]
    pub fn entries(&self) -> &[PaletteEntry] {
        &self.entries
    }

    #[inline]
    pub fn entry(&self, index: usize) -> Option<&PaletteEntry> {
        self.entries.get(index)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Replace entries starting at `start`. Returns how many entries were replaced.
    ///
    /// The palette keeps its old realization until it is realized again.
    #[inline]
    pub fn set_entries(&mut self, start: usize, entries: &[PaletteEntry]) -> usize {
        let slots = self.entries.iter_mut().skip(start);
        let mut count = 0;
        for (slot, entry) in slots.zip(entries) {
            *slot = *entry;
            count += 1;
        }
        count
    }

    /// Index of the entry closest to `color`. The first of several equally close entries wins.
    #[inline]
    pub fn nearest_index(&self, color: Rgb) -> usize {
        let mut best = 0;
        let mut best_diff = u32::MAX;
        for (i, entry) in self.entries.iter().enumerate() {
            let diff = entry.rgb().distance_squared(color);
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

    /// The native pixel of each entry, if the palette has been realized.
    #[inline]
    pub fn mapping(&self) -> Option<&[u32]> {
        self.mapping.as_deref()
    }

    #[inline]
    pub fn is_realized(&self) -> bool {
        self.mapping.is_some()
    }

    #[inline]
    pub(crate) fn take_mapping(&mut self) -> Option<Vec<u32>> {
        self.mapping.take()
    }

    #[inline]
    pub(crate) fn set_mapping(&mut self, mapping: Vec<u32>) {
        self.mapping = Some(mapping);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_index() {
        let e = PaletteEntry::explicit(0x1234);
        assert_eq!(e.explicit_index(), 0x1234);
        assert!(e.flags.contains(PaletteEntryFlags::EXPLICIT));
    }

    #[test]
    fn test_nearest_first_match_wins() {
        let pal = LogicalPalette::new(vec![
            PaletteEntry::new(0, 0, 0),
            PaletteEntry::new(10, 0, 0),
            PaletteEntry::new(10, 0, 0),
        ]);
        assert_eq!(pal.nearest_index(Rgb::new(9, 0, 0)), 1);
        // equidistant from entries 0 and 1
        assert_eq!(pal.nearest_index(Rgb::new(5, 0, 0)), 0);
    }

    #[test]
    fn test_default_palette() {
        let pal = LogicalPalette::default_palette();
        assert_eq!(pal.len(), 20);
        assert_eq!(pal.entry(19).unwrap().rgb(), Rgb::WHITE);
        assert!(!pal.is_realized());
    }
}
