// MIT/Apache2 License

/// A 48-bit colormap cell color, the way display servers store them.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
pub struct CellColor {
    pub red: u16,
    pub green: u16,
    pub blue: u16,
}

impl CellColor {
    #[inline]
    pub const fn new(red: u16, green: u16, blue: u16) -> Self {
        Self { red, green, blue }
    }

    /// Widen an 8-bit color into a cell color.
    #[inline]
    pub fn from_rgb(rgb: crate::Rgb) -> Self {
        let (red, green, blue) = rgb.clamp_u16();
        Self { red, green, blue }
    }

    /// Keep the high byte of every channel.
    #[inline]
    pub fn to_rgb(self) -> crate::Rgb {
        crate::Rgb::new(
            (self.red >> 8) as u8,
            (self.green >> 8) as u8,
            (self.blue >> 8) as u8,
        )
    }
}

/// The device colormap that backs the system palette.
///
/// This is the part of the display server the palette code talks to: it hands out shared
/// read-only cells for a color, or private writable cells whose color we control.
pub trait Colormap {
    /// Number of cells in the colormap.
    fn size(&self) -> u32;

    /// Allocate a shared read-only cell holding `color`, returning its pixel.
    fn alloc_color(&mut self, color: CellColor) -> Option<u32>;

    /// Allocate `count` private writable cells.
    ///
    /// This either allocates all of them or none of them.
    fn alloc_color_cells(&mut self, count: u32) -> Option<Vec<u32>>;

    /// Give cells back to the colormap.
    fn free_colors(&mut self, pixels: &[u32]);

    /// Set the color of a writable cell.
    fn store_color(&mut self, pixel: u32, color: CellColor);

    /// Get the color of any cell.
    fn query_color(&self, pixel: u32) -> CellColor;

    /// The pixel the display server considers black.
    #[inline]
    fn black_pixel(&self) -> u32 {
        0
    }

    /// The pixel the display server considers white.
    #[inline]
    fn white_pixel(&self) -> u32 {
        1
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum CellState {
    Free,
    /// Shared, with a reference count.
    ReadOnly(u32),
    ReadWrite,
}

/// A colormap that lives in memory.
///
/// This is what a palette store uses when there is no display server behind it, and is handy for
/// simulating colormaps that other clients have already filled up.
#[derive(Debug, Clone)]
pub struct SoftColormap {
    cells: Vec<(CellColor, CellState)>,
    black: u32,
    white: u32,
}

impl SoftColormap {
    /// Create a colormap with `size` free black cells.
    #[inline]
    pub fn new(size: u32) -> Self {
        Self {
            cells: vec![(CellColor::default(), CellState::Free); size as usize],
            black: 0,
            white: size.saturating_sub(1),
        }
    }

    /// Fill the leading cells with shared colors allocated by somebody else.
    #[inline]
    pub fn occupy<I: IntoIterator<Item = CellColor>>(&mut self, colors: I) {
        for (cell, color) in self.cells.iter_mut().zip(colors) {
            *cell = (color, CellState::ReadOnly(1));
        }
    }

    /// Mark `count` cells, starting at `start`, as writable cells of another client.
    #[inline]
    pub fn occupy_writable(&mut self, start: u32, count: u32) {
        for cell in self.cells.iter_mut().skip(start as usize).take(count as usize) {
            cell.1 = CellState::ReadWrite;
        }
    }

    /// Set which pixels are reported as the black and white pixels.
    #[inline]
    pub fn set_black_white(&mut self, black: u32, white: u32) {
        self.black = black;
        self.white = white;
    }

    /// Number of cells that are still free.
    #[inline]
    pub fn free_cells(&self) -> usize {
        self.cells
            .iter()
            .filter(|(_, state)| *state == CellState::Free)
            .count()
    }
}

impl Colormap for SoftColormap {
    #[inline]
    fn size(&self) -> u32 {
        self.cells.len() as u32
    }

    fn alloc_color(&mut self, color: CellColor) -> Option<u32> {
        if let Some((i, cell)) = self
            .cells
            .iter_mut()
            .enumerate()
            .find(|(_, (c, s))| *c == color && matches!(s, CellState::ReadOnly(_)))
        {
            if let CellState::ReadOnly(ref mut refs) = cell.1 {
                *refs += 1;
            }
            return Some(i as u32);
        }

        let (i, cell) = self
            .cells
            .iter_mut()
            .enumerate()
            .find(|(_, (_, s))| *s == CellState::Free)?;
        *cell = (color, CellState::ReadOnly(1));
        Some(i as u32)
    }

    fn alloc_color_cells(&mut self, count: u32) -> Option<Vec<u32>> {
        let free: Vec<u32> = self
            .cells
            .iter()
            .enumerate()
            .filter(|(_, (_, s))| *s == CellState::Free)
            .map(|(i, _)| i as u32)
            .take(count as usize)
            .collect();
        if free.len() < count as usize {
            return None;
        }

        for &pixel in free.iter() {
            self.cells[pixel as usize].1 = CellState::ReadWrite;
        }
        Some(free)
    }

    fn free_colors(&mut self, pixels: &[u32]) {
        for &pixel in pixels {
            if let Some(cell) = self.cells.get_mut(pixel as usize) {
                cell.1 = match cell.1 {
                    CellState::ReadOnly(refs) if refs > 1 => CellState::ReadOnly(refs - 1),
                    _ => CellState::Free,
                };
            }
        }
    }

    #[inline]
    fn store_color(&mut self, pixel: u32, color: CellColor) {
        if let Some(cell) = self.cells.get_mut(pixel as usize) {
            cell.0 = color;
        }
    }

    #[inline]
    fn query_color(&self, pixel: u32) -> CellColor {
        self.cells
            .get(pixel as usize)
            .map(|(c, _)| *c)
            .unwrap_or_default()
    }

    #[inline]
    fn black_pixel(&self) -> u32 {
        self.black
    }

    #[inline]
    fn white_pixel(&self) -> u32 {
        self.white
    }
}
