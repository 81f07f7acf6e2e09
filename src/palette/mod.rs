// MIT/Apache2 License

//! The system palette.
//!
//! Windows programs expect a contiguous palette of up to 256 colors, the first and last ten of
//! which are fixed stock colors. On a display with a private colormap that is simply the colormap
//! itself. Otherwise we share the colormap with other clients, so we grab as many cells as we can,
//! split them around a "gap" in the middle of the palette, and keep tables that translate between
//! palette indices and the pixels the cells actually live at. Displays with fixed visuals need no
//! palette at all; their pixels are computed from the color.

/// Provides the `Colormap` trait and an in-memory colormap.
mod colormap;
/// Stock colors and default color tables.
mod defaults;
/// Provides `LogicalPalette`.
mod logical;

pub use colormap::*;
pub use defaults::*;
pub use logical::*;

use crate::{
    error::try_alloc, format::bits_per_pixel_for_depth, ColorShifts, PixelFormat, Result, Rgb,
};
use parking_lot::Mutex;
use std::fmt;

/// Marks a palette slot that has no pixel, or a pixel that has no palette slot.
pub const NO_PIXEL: u32 = u32::MAX;

/// First channel value used by the default color cube.
const COLOR_CUBE_START: usize = 63;

bitflags::bitflags! {
    /// State of a system palette slot.
    #[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
    pub struct SystemEntryFlags: u8 {
        /// The slot holds a color that can be mapped to.
        const USED = 0x80;
        /// Nothing else may be mapped onto this slot.
        const RESERVED = 0x40;
    }
}

bitflags::bitflags! {
    /// How the system palette relates to the display.
    #[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
    pub struct PaletteFlags: u8 {
        /// The colormap cannot be changed.
        const FIXED = 0x01;
        /// Pixels are computed from colors; there is no palette.
        const VIRTUAL = 0x02;
        /// We own the whole colormap, so palette indices are pixels.
        const PRIVATE = 0x04;
    }
}

/// One slot of the system palette.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct SystemPaletteEntry {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
    pub flags: SystemEntryFlags,
}

impl SystemPaletteEntry {
    #[inline]
    pub fn new(color: Rgb, flags: SystemEntryFlags) -> Self {
        Self {
            red: color.red,
            green: color.green,
            blue: color.blue,
            flags,
        }
    }

    #[inline]
    pub fn rgb(&self) -> Rgb {
        Rgb::new(self.red, self.green, self.blue)
    }

    #[inline]
    fn is_used(&self) -> bool {
        self.flags.contains(SystemEntryFlags::USED)
    }
}

impl Default for SystemPaletteEntry {
    #[inline]
    fn default() -> Self {
        Self::new(Rgb::BLACK, SystemEntryFlags::empty())
    }
}

/// The class of a display visual.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum VisualClass {
    StaticGray,
    GrayScale,
    StaticColor,
    PseudoColor,
    TrueColor,
    DirectColor,
}

/// The display's default visual.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Visual {
    pub class: VisualClass,
    pub depth: u8,
    pub red_mask: u32,
    pub green_mask: u32,
    pub blue_mask: u32,
    pub colormap_size: u32,
}

impl Visual {
    /// An indexed visual with a colormap of `2^depth` cells.
    #[inline]
    pub fn pseudo_color(depth: u8) -> Self {
        Self {
            class: VisualClass::PseudoColor,
            depth,
            red_mask: 0,
            green_mask: 0,
            blue_mask: 0,
            colormap_size: 1 << depth.min(8),
        }
    }

    /// A direct color visual with the given channel masks.
    #[inline]
    pub fn true_color(depth: u8, red_mask: u32, green_mask: u32, blue_mask: u32) -> Self {
        Self {
            class: VisualClass::TrueColor,
            depth,
            red_mask,
            green_mask,
            blue_mask,
            colormap_size: 1 << depth.min(8),
        }
    }

    /// The native format of surfaces on this visual.
    #[inline]
    pub fn pixel_format(&self) -> Result<PixelFormat> {
        if self.depth == 1 {
            return Ok(PixelFormat::mono());
        }

        match self.class {
            VisualClass::TrueColor | VisualClass::DirectColor | VisualClass::StaticColor => {
                PixelFormat::direct(
                    self.depth,
                    bits_per_pixel_for_depth(self.depth),
                    self.red_mask,
                    self.green_mask,
                    self.blue_mask,
                )
            }
            VisualClass::StaticGray => Ok(PixelFormat::gray(self.depth)),
            VisualClass::GrayScale | VisualClass::PseudoColor => Ok(PixelFormat::indexed(self.depth)),
        }
    }
}

/// Knobs for building the system palette.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct PaletteConfig {
    /// Take over the whole colormap on dynamic visuals.
    pub private_color_map: bool,
    /// Upper bound on the size of a shared system palette, clamped into `20..=256`.
    pub alloc_system_colors: u32,
    /// Number of cells to copy from the colormap before building a shared palette.
    pub copy_default_colors: u32,
}

impl Default for PaletteConfig {
    #[inline]
    fn default() -> Self {
        Self {
            private_color_map: false,
            alloc_system_colors: 256,
            copy_default_colors: 128,
        }
    }
}

impl PaletteConfig {
    #[inline]
    fn alloc_system_colors(&self) -> usize {
        self.alloc_system_colors
            .max(NB_RESERVED_COLORS as u32)
            .min(256) as usize
    }
}

struct FreeList {
    /// First free slot, zero once the list runs out.
    first: usize,
    next: [u8; 256],
}

struct SystemPalette {
    entries: Vec<SystemPaletteEntry>,
    size: usize,
    /// Inclusive range of slots we have no cells for.
    gap: Option<(usize, usize)>,
    /// `None` if slots can never be changed.
    free: Option<FreeList>,
    palette_to_native: Option<Vec<u32>>,
    native_to_palette: Option<Vec<u32>>,
    /// Realization of the stock palette.
    default_mapping: Vec<u32>,
    colormap: Box<dyn Colormap + Send>,
}

/// The process-wide system palette, with the tables that map it onto the display.
///
/// All state sits behind one lock, which every lookup takes.
pub struct PaletteStore {
    visual: Visual,
    flags: PaletteFlags,
    graymax: u32,
    shifts: ColorShifts,
    config: PaletteConfig,
    inner: Mutex<SystemPalette>,
}

impl fmt::Debug for PaletteStore {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PaletteStore")
            .field("visual", &self.visual)
            .field("flags", &self.flags)
            .field("palette_size", &self.palette_size())
            .finish()
    }
}

impl PaletteStore {
    /// Build the system palette for `visual` on top of `colormap`.
    pub fn new(
        visual: Visual,
        colormap: Box<dyn Colormap + Send>,
        config: PaletteConfig,
    ) -> Result<PaletteStore> {
        log::trace!("Initializing palette manager for {:?}", visual);

        let mut flags = PaletteFlags::empty();
        let mut graymax = 0;
        let mut shifts = ColorShifts::default();

        match visual.class {
            VisualClass::TrueColor | VisualClass::DirectColor => {
                flags |= PaletteFlags::VIRTUAL | PaletteFlags::FIXED;
                shifts = ColorShifts::from_masks(visual.red_mask, visual.green_mask, visual.blue_mask);
            }
            VisualClass::StaticColor => {
                flags |= PaletteFlags::FIXED;
                shifts = ColorShifts::from_masks(visual.red_mask, visual.green_mask, visual.blue_mask);
            }
            VisualClass::StaticGray => {
                flags |= PaletteFlags::FIXED;
                graymax = (1u32 << visual.depth.min(31)) - 1;
            }
            VisualClass::GrayScale | VisualClass::PseudoColor => {
                if config.private_color_map {
                    flags |= PaletteFlags::PRIVATE;
                }
            }
        }

        let mut palette = SystemPalette {
            entries: Vec::new(),
            size: 0,
            gap: None,
            free: None,
            palette_to_native: None,
            native_to_palette: None,
            default_mapping: vec![0; NB_RESERVED_COLORS],
            colormap,
        };

        if !flags.contains(PaletteFlags::VIRTUAL) {
            let template = stock_colors();
            palette.entries = try_alloc(256, SystemPaletteEntry::default())?;

            if flags.contains(PaletteFlags::PRIVATE) {
                palette.build_private_map(&template);
            } else {
                palette.build_shared_map(&template, &visual, flags, &config)?;
            }

            if palette.free.is_some() {
                palette.format_system_palette();
            }

            palette.fill_default_colors(&template, flags, &config);
            palette.size = (visual.colormap_size as usize).min(256);
        }

        Ok(PaletteStore {
            visual,
            flags,
            graymax,
            shifts,
            config,
            inner: Mutex::new(palette),
        })
    }

    #[inline]
    pub fn visual(&self) -> &Visual {
        &self.visual
    }

    #[inline]
    pub fn flags(&self) -> PaletteFlags {
        self.flags
    }

    #[inline]
    pub fn config(&self) -> &PaletteConfig {
        &self.config
    }

    /// Are pixels computed from colors without any palette?
    #[inline]
    pub fn is_virtual(&self) -> bool {
        self.flags.contains(PaletteFlags::VIRTUAL)
    }

    #[inline]
    pub fn is_fixed(&self) -> bool {
        self.flags.contains(PaletteFlags::FIXED)
    }

    #[inline]
    pub fn is_private(&self) -> bool {
        self.flags.contains(PaletteFlags::PRIVATE)
    }

    /// Largest gray level of a static grayscale display, zero otherwise.
    #[inline]
    pub fn graymax(&self) -> u32 {
        self.graymax
    }

    /// Channel placement on fixed color displays.
    #[inline]
    pub fn shifts(&self) -> &ColorShifts {
        &self.shifts
    }

    /// Number of slots in the system palette; zero without a palette.
    #[inline]
    pub fn palette_size(&self) -> usize {
        self.inner.lock().size
    }

    /// The inclusive range of slots that are left unallocated.
    #[inline]
    pub fn gap(&self) -> Option<(usize, usize)> {
        self.inner.lock().gap
    }

    /// The pixel system palette slot `index` lives at.
    #[inline]
    pub fn palette_to_native(&self, index: usize) -> u32 {
        self.inner.lock().to_native(index)
    }

    /// The system palette slot pixel `pixel` represents, if any.
    #[inline]
    pub fn native_to_palette(&self, pixel: u32) -> Option<u32> {
        let inner = self.inner.lock();
        match inner.native_to_palette {
            Some(ref table) => table
                .get(pixel as usize)
                .copied()
                .filter(|&i| i != NO_PIXEL),
            None => Some(pixel),
        }
    }

    /// A copy of the slot to pixel table, if slots are not pixels.
    #[inline]
    pub fn palette_to_native_table(&self) -> Option<Vec<u32>> {
        self.inner.lock().palette_to_native.clone()
    }

    /// A copy of the pixel to slot table, if slots are not pixels.
    #[inline]
    pub fn native_to_palette_table(&self) -> Option<Vec<u32>> {
        self.inner.lock().native_to_palette.clone()
    }

    /// Both translation tables, taken under one lock, when raster operations have to run on
    /// palette indices instead of pixels.
    #[inline]
    pub fn index_space_tables(&self) -> Option<(Vec<u32>, Vec<u32>)> {
        if self.is_virtual() {
            return None;
        }

        let inner = self.inner.lock();
        match (&inner.palette_to_native, &inner.native_to_palette) {
            (Some(p2n), Some(n2p)) => Some((p2n.clone(), n2p.clone())),
            _ => None,
        }
    }

    /// Copy out `count` system palette entries starting at `start`. The flags are not reported.
    pub fn get_system_entries(&self, start: usize, count: usize) -> Vec<SystemPaletteEntry> {
        let inner = self.inner.lock();

        if inner.size == 0 {
            return DEFAULT_COLORS_8
                .iter()
                .skip(start)
                .take(count)
                .map(|&c| SystemPaletteEntry::new(c, SystemEntryFlags::empty()))
                .collect();
        }

        if start >= inner.size {
            return Vec::new();
        }
        let count = count.min(inner.size - start);

        inner.entries[start..start + count]
            .iter()
            .enumerate()
            .map(|(i, e)| {
                log::trace!("idx({:02x}) -> {:?}", start + i, e.rgb());
                SystemPaletteEntry::new(e.rgb(), SystemEntryFlags::empty())
            })
            .collect()
    }

    /// The leading system palette colors, as many as a color table of `bit_count` has room for.
    #[inline]
    pub fn system_color_table(&self, bit_count: u16) -> Vec<Rgb> {
        self.get_system_entries(0, 1 << bit_count.min(8))
            .iter()
            .map(|e| e.rgb())
            .collect()
    }

    /// The color currently held by system palette slot `index`.
    #[inline]
    pub fn system_color(&self, index: usize) -> Rgb {
        self.inner
            .lock()
            .entries
            .get(index)
            .map_or(Rgb::BLACK, |e| e.rgb())
    }

    /// Index of the used system palette slot nearest to `color`.
    #[inline]
    pub fn lookup_index(&self, color: Rgb, skip_reserved: bool) -> usize {
        self.inner.lock().lookup_index(color, skip_reserved)
    }

    /// The pixel of the used system palette slot nearest to `color`.
    #[inline]
    pub fn lookup_pixel(&self, color: Rgb) -> u32 {
        let inner = self.inner.lock();
        let index = inner.lookup_index(color, false);
        inner.to_native(index)
    }

    /// The pixel of the stock color nearest to `color`.
    #[inline]
    pub fn lookup_system_pixel(&self, color: Rgb) -> u32 {
        self.inner.lock().lookup_system_pixel(color)
    }

    /// Snap `color` to the nearest color in the system palette.
    #[inline]
    pub fn nearest_system_color(&self, color: Rgb) -> Rgb {
        let inner = self.inner.lock();
        if inner.size == 0 {
            return color;
        }
        inner.entries[inner.lookup_index(color, false)].rgb()
    }

    /// Can `color` be drawn without dithering?
    pub fn is_solid_color(&self, color: Rgb) -> bool {
        if color == Rgb::BLACK || color == Rgb::WHITE || self.is_virtual() {
            return true;
        }

        let inner = self.inner.lock();
        inner.entries[..inner.size]
            .iter()
            .enumerate()
            .any(|(i, e)| !inner.in_gap(i) && e.rgb() == color)
    }

    /// The color pixel `pixel` of an indexed display shows.
    pub fn pixel_color(&self, pixel: u32) -> Rgb {
        let inner = self.inner.lock();

        if self.visual.depth <= 8 && pixel < 256 && !self.is_fixed() {
            let index = match inner.native_to_palette {
                Some(ref table) => table[pixel as usize],
                None => pixel,
            };
            if let Some(entry) = inner.entries.get(index as usize) {
                return entry.rgb();
            }
        }

        inner.colormap.query_color(pixel).to_rgb()
    }

    /// Realize a logical palette into the system palette.
    ///
    /// Every entry is given a pixel, claiming free system slots for new colors as long as there
    /// are any. Returns the number of entries whose pixel changed since the last realization.
    pub fn realize(&self, palette: &mut LogicalPalette, primary: bool) -> u32 {
        if self.is_virtual() {
            return 0;
        }

        let mut num_entries = palette.len();
        if num_entries > 256 {
            log::warn!("Palettes with more than 256 entries are not supported");
            num_entries = 256;
        }
        if num_entries == 0 {
            return 0;
        }

        let prev_mapping = palette.take_mapping();
        let mut mapping = Vec::with_capacity(num_entries);
        let mut remapped = 0;

        let mut inner = self.inner.lock();
        if primary && inner.free.is_some() {
            inner.format_system_palette();
        }

        for (i, entry) in palette.entries()[..num_entries].iter().enumerate() {
            let index = inner.realize_entry(entry);

            let changed = prev_mapping
                .as_ref()
                .map_or(true, |prev| prev.get(i) != Some(&index));
            if changed {
                remapped += 1;
            }

            log::trace!("entry {} {:?} -> pixel {}", i, entry.rgb(), index);
            mapping.push(index);
        }
        drop(inner);

        palette.set_mapping(mapping);
        remapped
    }

    /// Forget a palette's realization.
    #[inline]
    pub fn unrealize(&self, palette: &mut LogicalPalette) {
        palette.take_mapping();
    }

    /// Re-map the stock palette. Returns the number of stock colors whose pixel changed.
    pub fn realize_default_palette(&self) -> u32 {
        let mut inner = self.inner.lock();
        if inner.size == 0 {
            return 0;
        }

        let mut changed = 0;
        for (i, color) in stock_colors().iter().enumerate() {
            let index = inner.lookup_system_pixel(*color);
            if index != inner.default_mapping[i] {
                inner.default_mapping[i] = index;
                changed += 1;
            }
        }
        changed
    }

    /// The pixels the stock palette is realized to.
    #[inline]
    pub fn default_mapping(&self) -> Vec<u32> {
        self.inner.lock().default_mapping.clone()
    }

    /// The pixel the display considers white.
    #[inline]
    pub fn white_pixel(&self) -> u32 {
        self.inner.lock().colormap.white_pixel()
    }

    /// The pixel the display considers black.
    #[inline]
    pub fn black_pixel(&self) -> u32 {
        self.inner.lock().colormap.black_pixel()
    }
}

impl SystemPalette {
    #[inline]
    fn in_gap(&self, i: usize) -> bool {
        self.gap.map_or(false, |(start, end)| i >= start && i <= end)
    }

    #[inline]
    fn to_native(&self, index: usize) -> u32 {
        match self.palette_to_native {
            Some(ref table) => table.get(index).copied().unwrap_or(NO_PIXEL),
            None => index as u32,
        }
    }

    /// Private colormap: the palette is the colormap.
    fn build_private_map(&mut self, template: &[Rgb; NB_RESERVED_COLORS]) {
        let size = (self.colormap.size() as usize).min(256);
        log::trace!("Building private map - {} palette entries", size);

        for i in 0..size {
            let color = if i < NB_RESERVED_COLORS / 2 {
                Some(template[i])
            } else if i + NB_RESERVED_COLORS / 2 >= size {
                Some(template[NB_RESERVED_COLORS + i - size])
            } else {
                None
            };

            if let Some(color) = color {
                self.entries[i] = SystemPaletteEntry::new(color, SystemEntryFlags::USED);
            }
            self.colormap
                .store_color(i as u32, CellColor::from_rgb(color.unwrap_or(Rgb::BLACK)));
        }

        self.palette_to_native = None;
        self.native_to_palette = None;
        self.gap = None;
        self.size = size;
        self.free = if size > NB_RESERVED_COLORS {
            Some(FreeList {
                first: NB_RESERVED_COLORS / 2,
                next: [0; 256],
            })
        } else {
            None
        };
    }

    /// Shared colormap: grab what we can and build the index to pixel tables.
    fn build_shared_map(
        &mut self,
        template: &[Rgb; NB_RESERVED_COLORS],
        visual: &Visual,
        flags: PaletteFlags,
        config: &PaletteConfig,
    ) -> Result {
        let cmap_size = self.colormap.size();

        // keep the cells other clients use most, so they do not flash
        let copy = config.copy_default_colors.min(256).min(cmap_size);
        for pixel in 0..copy {
            let color = self.colormap.query_color(pixel);
            let _ = self.colormap.alloc_color(color);
        }

        let alloc_system_colors = config.alloc_system_colors();
        log::trace!("{} colors configured", alloc_system_colors);

        let mut sys_pixel = [0u32; NB_RESERVED_COLORS];
        let mut warned = false;
        for (i, color) in template.iter().enumerate() {
            let cell = CellColor::from_rgb(*color);
            sys_pixel[i] = match self.colormap.alloc_color(cell) {
                Some(pixel) => pixel,
                None => {
                    if !warned {
                        log::warn!("Not enough colors for the full system palette");
                        warned = true;
                    }
                    self.closest_shared_cell(cell, visual.depth, i)
                }
            };
            log::trace!("syscolor {:?} -> pixel {}", color, sys_pixel[i]);
        }

        let mut dynamic = None;
        let size = if !flags.contains(PaletteFlags::FIXED) {
            log::trace!("Dynamic colormap");

            // largest number of cells we could get
            let (mut c_min, mut c_max) = (0u32, cmap_size.min(256));
            while c_max > c_min {
                let c_val = (c_max + c_min) / 2 + (c_max + c_min) % 2;
                match self.colormap.alloc_color_cells(c_val) {
                    Some(pixels) => {
                        self.colormap.free_colors(&pixels);
                        c_min = c_val;
                    }
                    None => c_max = c_val - 1,
                }
            }

            let mut cells = (c_min as usize).min(alloc_system_colors - NB_RESERVED_COLORS);
            // the palette is split in two halves
            cells = cells / 2 * 2;

            if cells > 0 {
                match self.colormap.alloc_color_cells(cells as u32) {
                    Some(pixels) => dynamic = Some(pixels),
                    None => {
                        log::warn!("Inexplicable failure during colorcell allocation");
                        cells = 0;
                    }
                }
            }

            cells + NB_RESERVED_COLORS
        } else {
            NB_RESERVED_COLORS
        };

        log::trace!("Shared system palette uses {} colors", size);

        // the gap has to sit in the middle, or raster operations break
        self.gap = if size >= 256 {
            None
        } else {
            Some((size / 2, 255 - size / 2))
        };
        self.size = size;
        self.free = if size > NB_RESERVED_COLORS && !flags.contains(PaletteFlags::FIXED) {
            Some(FreeList {
                first: NB_RESERVED_COLORS / 2,
                next: [0; 256],
            })
        } else {
            None
        };

        let mut n2p = if visual.depth <= 8 {
            Some(try_alloc(256, NO_PIXEL)?)
        } else {
            None
        };
        let mut p2n = try_alloc(256, 0u32)?;
        let mut dynamic = dynamic.unwrap_or_default().into_iter();

        for i in 0..256 {
            if self.in_gap(i) {
                p2n[i] = NO_PIXEL;
                self.entries[i].flags = SystemEntryFlags::empty();
                continue;
            }

            if i < NB_RESERVED_COLORS / 2 {
                p2n[i] = sys_pixel[i];
                self.entries[i] = SystemPaletteEntry::new(template[i], SystemEntryFlags::USED);
            } else if i >= 256 - NB_RESERVED_COLORS / 2 {
                let j = i + NB_RESERVED_COLORS - 256;
                p2n[i] = sys_pixel[j];
                self.entries[i] = SystemPaletteEntry::new(template[j], SystemEntryFlags::USED);
            } else {
                p2n[i] = dynamic.next().unwrap_or(i as u32);
            }

            log::trace!("index {} -> pixel {}", i, p2n[i]);
            if let Some(ref mut n2p) = n2p {
                if let Some(slot) = n2p.get_mut(p2n[i] as usize) {
                    *slot = i as u32;
                }
            }
        }

        self.palette_to_native = Some(p2n);
        self.native_to_palette = n2p;
        Ok(())
    }

    /// Find and share the existing cell closest to `color`, or fall back to black or white.
    fn closest_shared_cell(&mut self, color: CellColor, depth: u8, stock_index: usize) -> u32 {
        let mut max = if depth >= 32 {
            u32::MAX
        } else {
            (1u32 << depth) - 1
        };
        let mut step = 1;
        if max > 256 {
            step = max / 256;
            max = 256;
        }

        let channel = |a: u16, b: u16| ((a as i32 - b as i32) >> 8).pow(2);
        let mut best = CellColor::default();
        let mut best_diff = i32::MAX;
        let mut pixel = 0;
        while pixel < max {
            let c = self.colormap.query_color(pixel);
            let diff = channel(c.red, color.red)
                + channel(c.green, color.green)
                + channel(c.blue, color.blue);
            if diff < best_diff {
                best = c;
                best_diff = diff;
            }
            pixel += step;
        }

        match self.colormap.alloc_color(best) {
            Some(pixel) => pixel,
            None if stock_index < NB_RESERVED_COLORS / 2 => self.colormap.black_pixel(),
            None => self.colormap.white_pixel(),
        }
    }

    /// Mark every changeable slot unused and chain them into the free list.
    fn format_system_palette(&mut self) {
        let gap = self.gap;
        let in_gap = |i: usize| gap.map_or(false, |(start, end)| i >= start && i <= end);

        let first = NB_RESERVED_COLORS / 2;
        let mut next = [0u8; 256];
        let mut j = first;
        self.entries[j].flags = SystemEntryFlags::empty();

        for i in first + 1..256 - NB_RESERVED_COLORS / 2 {
            if !in_gap(i) {
                self.entries[i].flags = SystemEntryFlags::empty();
                next[j] = i as u8;
                j = i;
            }
        }
        next[j] = 0;

        self.free = Some(FreeList { first, next });
    }

    /// Paint the free slots with a color cube, and adopt cells in the gap that other clients
    /// have already filled with useful colors.
    fn fill_default_colors(
        &mut self,
        template: &[Rgb; NB_RESERVED_COLORS],
        flags: PaletteFlags,
        config: &PaletteConfig,
    ) {
        if self.size <= NB_RESERVED_COLORS {
            return;
        }

        let room = self.size - NB_RESERVED_COLORS;
        let mut i = 1;
        while i * i * i <= room {
            i += 1;
        }
        let (no_r, mut no_g, mut no_b) = (i - 1, i - 1, i - 1);
        if no_r * (no_g + 1) * no_b <= room {
            no_g += 1;
        }
        if no_r * no_g * (no_b + 1) <= room {
            no_b += 1;
        }
        let inc_r = (255 - COLOR_CUBE_START) / no_r;
        let inc_g = (255 - COLOR_CUBE_START) / no_g;
        let inc_b = (255 - COLOR_CUBE_START) / no_b;

        if let Some(mut idx) = self.free.as_ref().map(|f| f.first) {
            'cube: for blue in (COLOR_CUBE_START..256).step_by(inc_b) {
                for green in (COLOR_CUBE_START..256).step_by(inc_g) {
                    for red in (COLOR_CUBE_START..256).step_by(inc_r) {
                        if idx == 0 {
                            break 'cube;
                        }
                        if red == COLOR_CUBE_START && green == red && blue == green {
                            continue;
                        }

                        let color = Rgb::new(red as u8, green as u8, blue as u8);
                        let entry = &mut self.entries[idx];
                        entry.red = color.red;
                        entry.green = color.green;
                        entry.blue = color.blue;

                        if !flags.contains(PaletteFlags::FIXED) {
                            let pixel = self.to_native(idx);
                            self.colormap.store_color(pixel, CellColor::from_rgb(color));
                        }

                        idx = self.free.as_ref().map_or(0, |f| f.next[idx] as usize);
                    }
                }
            }
        }

        let (gap_start, gap_end) = match self.gap {
            Some(gap) if gap.0 < gap.1 => gap,
            _ => return,
        };
        let (p2n, n2p) = match (&mut self.palette_to_native, &mut self.native_to_palette) {
            (Some(p2n), Some(n2p)) => (p2n, n2p),
            _ => return,
        };

        let mut max = config.alloc_system_colors() as i64 - (256 - (gap_end - gap_start)) as i64;
        let mut idx = gap_start;
        for pixel in 0..256u32 {
            if idx > gap_end {
                break;
            }
            if n2p[pixel as usize] != NO_PIXEL {
                continue;
            }

            let cell = self.colormap.query_color(pixel);
            let color = cell.to_rgb();
            if template.contains(&color) {
                continue;
            }

            let shared = match self.colormap.alloc_color(cell) {
                Some(shared) if shared < 256 => shared,
                _ => continue,
            };

            n2p[shared as usize] = idx as u32;
            p2n[idx] = shared;
            self.entries[idx] = SystemPaletteEntry::new(color, SystemEntryFlags::USED);
            idx += 1;

            max -= 1;
            if max <= 0 {
                break;
            }
        }
    }

    /// Nearest used slot, the first of several equally close slots winning.
    fn lookup_index(&self, color: Rgb, skip_reserved: bool) -> usize {
        let mut best = 0;
        let mut best_diff = u32::MAX;

        for (i, entry) in self.entries[..self.size].iter().enumerate() {
            if !entry.is_used() || (skip_reserved && entry.flags.contains(SystemEntryFlags::RESERVED))
            {
                continue;
            }

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

    fn lookup_exact(&self, color: Rgb) -> Option<usize> {
        self.entries[..self.size]
            .iter()
            .position(|e| e.is_used() && e.rgb() == color)
    }

    /// Nearest slot among the stock colors only.
    fn lookup_system_pixel(&self, color: Rgb) -> u32 {
        let size = self.size;
        let high = size.saturating_sub(NB_RESERVED_COLORS / 2);
        let stock = (0..(NB_RESERVED_COLORS / 2).min(size)).chain(high.max(NB_RESERVED_COLORS / 2)..size);

        let mut best = 0;
        let mut best_diff = u32::MAX;
        for i in stock {
            let diff = self.entries[i].rgb().distance_squared(color);
            if diff < best_diff {
                best = i;
                best_diff = diff;
                if diff == 0 {
                    break;
                }
            }
        }
        self.to_native(best)
    }

    fn realize_entry(&mut self, entry: &PaletteEntry) -> u32 {
        if entry.flags.contains(PaletteEntryFlags::EXPLICIT) {
            let mut index = entry.explicit_index() as usize;
            if index > 255 || self.in_gap(index) {
                log::warn!(
                    "Explicit index {} is out of the system palette, assuming black",
                    index
                );
                index = 0;
            }
            return self.to_native(index);
        }

        let mut flags = SystemEntryFlags::USED;
        if entry.flags.contains(PaletteEntryFlags::RESERVED) {
            flags |= SystemEntryFlags::RESERVED;
        }

        let color = entry.rgb();
        let mut index = if entry.flags.contains(PaletteEntryFlags::NOCOLLAPSE) {
            None
        } else {
            self.lookup_exact(color)
        };

        if index.is_none() {
            if let Some(slot) = self.take_free_slot() {
                let pixel = self.to_native(slot);
                self.colormap.store_color(pixel, CellColor::from_rgb(color));
                self.entries[slot] = SystemPaletteEntry::new(color, flags);
                index = Some(slot);
            }
        }

        let index = match index {
            Some(index) => index,
            None => self.lookup_index(color, true),
        };
        self.to_native(index)
    }

    fn take_free_slot(&mut self) -> Option<usize> {
        let free = self.free.as_mut()?;
        if free.first == 0 {
            return None;
        }

        let slot = free.first;
        free.first = free.next[slot] as usize;
        free.next[slot] = 0;
        Some(slot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shared_store(cells: u32) -> PaletteStore {
        let mut visual = Visual::pseudo_color(8);
        visual.colormap_size = 256;
        let mut cmap = SoftColormap::new(256);
        cmap.occupy_writable(0, 256 - cells);
        PaletteStore::new(
            visual,
            Box::new(cmap),
            PaletteConfig {
                copy_default_colors: 0,
                ..Default::default()
            },
        )
        .unwrap()
    }

    #[test]
    fn test_full_shared_map_has_no_gap() {
        let store = shared_store(256);
        assert_eq!(store.gap(), None);
        assert_eq!(store.palette_size(), 256);
        assert_eq!(store.system_color(0), Rgb::BLACK);
        assert_eq!(store.system_color(255), Rgb::WHITE);

        let n2p = store.native_to_palette_table().unwrap();
        let p2n = store.palette_to_native_table().unwrap();
        for i in 0..256 {
            assert_eq!(n2p[p2n[i] as usize], i as u32);
        }
    }

    #[test]
    fn test_short_colormap_leaves_gap() {
        // twenty stock colors plus 40 dynamic cells
        let store = shared_store(61);
        assert_eq!(store.gap(), Some((30, 225)));

        let p2n = store.palette_to_native_table().unwrap();
        let n2p = store.native_to_palette_table().unwrap();
        for i in 0..256 {
            if (30..=225).contains(&i) {
                assert_eq!(p2n[i], NO_PIXEL);
            } else {
                assert_eq!(n2p[p2n[i] as usize], i as u32);
            }
        }
    }

    #[test]
    fn test_alloc_system_colors_limits_palette() {
        let store = PaletteStore::new(
            Visual::pseudo_color(8),
            Box::new(SoftColormap::new(256)),
            PaletteConfig {
                alloc_system_colors: 5,
                copy_default_colors: 0,
                ..Default::default()
            },
        )
        .unwrap();
        // clamped to the twenty stock colors
        assert_eq!(store.gap(), Some((10, 245)));
    }

    #[test]
    fn test_private_map_is_identity() {
        let store = PaletteStore::new(
            Visual::pseudo_color(8),
            Box::new(SoftColormap::new(256)),
            PaletteConfig {
                private_color_map: true,
                ..Default::default()
            },
        )
        .unwrap();
        assert!(store.is_private());
        assert_eq!(store.palette_to_native(77), 77);
        assert_eq!(store.native_to_palette(77), Some(77));
        assert_eq!(store.gap(), None);
        assert!(store.index_space_tables().is_none());
    }

    #[test]
    fn test_realize_claims_free_slots() {
        let store = shared_store(256);
        let mut pal = LogicalPalette::new(vec![
            PaletteEntry::new(1, 2, 3),
            PaletteEntry::new(0, 0, 0),
            PaletteEntry::new(1, 2, 3),
        ]);

        assert_eq!(store.realize(&mut pal, true), 3);
        let mapping = pal.mapping().unwrap().to_vec();
        // first free slot is 10
        assert_eq!(mapping[0], store.palette_to_native(10));
        assert_eq!(store.system_color(10), Rgb::new(1, 2, 3));
        // black collapses onto the stock slot
        assert_eq!(mapping[1], store.palette_to_native(0));
        // and so does the repeated color
        assert_eq!(mapping[2], mapping[0]);

        // realizing again as a background palette keeps the same pixels
        assert_eq!(store.realize(&mut pal, false), 0);
    }

    #[test]
    fn test_realize_nocollapse_and_explicit() {
        let store = shared_store(256);
        let mut pal = LogicalPalette::new(vec![
            PaletteEntry::new(0, 0, 0).with_flags(PaletteEntryFlags::NOCOLLAPSE),
            PaletteEntry::explicit(255),
            PaletteEntry::explicit(300),
        ]);
        store.realize(&mut pal, true);
        let mapping = pal.mapping().unwrap();
        assert_eq!(mapping[0], store.palette_to_native(10));
        assert_eq!(mapping[1], store.palette_to_native(255));
        assert_eq!(mapping[2], store.palette_to_native(0));
    }

    #[test]
    fn test_realize_without_free_slots_uses_nearest() {
        let store = PaletteStore::new(
            Visual::pseudo_color(8),
            Box::new(SoftColormap::new(256)),
            PaletteConfig {
                alloc_system_colors: 20,
                copy_default_colors: 0,
                ..Default::default()
            },
        )
        .unwrap();
        let mut pal = LogicalPalette::new(vec![PaletteEntry::new(0xfe, 0, 0)]);
        store.realize(&mut pal, true);
        assert_eq!(pal.mapping().unwrap()[0], store.palette_to_native(249));
    }

    #[test]
    fn test_unrealize_forgets_mapping() {
        let store = shared_store(256);
        let mut pal = LogicalPalette::default_palette();
        store.realize(&mut pal, false);
        assert!(pal.is_realized());
        store.unrealize(&mut pal);
        assert!(!pal.is_realized());
    }

    #[test]
    fn test_default_palette_realization() {
        let store = shared_store(256);
        // the stock mapping starts out all zeros
        assert_eq!(store.realize_default_palette(), 19);
        assert_eq!(store.realize_default_palette(), 0);
        assert_eq!(store.default_mapping()[19], store.palette_to_native(255));
    }

    #[test]
    fn test_system_entries_are_clipped() {
        let store = shared_store(256);
        assert_eq!(store.get_system_entries(250, 10).len(), 6);
        assert!(store.get_system_entries(256, 1).is_empty());
        assert_eq!(store.system_color_table(4).len(), 16);
    }

    #[test]
    fn test_solid_colors() {
        let store = shared_store(61);
        assert!(store.is_solid_color(Rgb::BLACK));
        assert!(store.is_solid_color(Rgb::new(0x80, 0, 0)));
        assert!(!store.is_solid_color(Rgb::new(1, 2, 3)));

        let virt = PaletteStore::new(
            Visual::true_color(24, 0xff0000, 0xff00, 0xff),
            Box::new(SoftColormap::new(256)),
            PaletteConfig::default(),
        )
        .unwrap();
        assert!(virt.is_virtual());
        assert!(virt.is_solid_color(Rgb::new(1, 2, 3)));
        assert_eq!(virt.palette_size(), 0);
    }

    #[test]
    fn test_color_cube_fills_free_slots() {
        let store = shared_store(256);
        // the first cube color is skipped
        assert_eq!(store.system_color(10), Rgb::new(63 + 32, 63, 63));
    }
}
