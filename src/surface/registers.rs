// MIT/Apache2 License

use super::Surface;
use crate::{
    error::try_alloc, BoolOp, Error, Pattern, Rectangle, Register, RopBackend, RopProgram, Result,
};
use std::mem;

/// Pixel values for the raster operations that ignore both source and pattern.
///
/// When a value is missing, the matching boolean function is applied as is.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash)]
pub struct SolidPixels {
    /// Copied in for `BLACKNESS`.
    pub black: Option<u32>,
    /// Copied in for `WHITENESS`.
    pub white: Option<u32>,
    /// XORed in for `DSTINVERT`.
    pub invert: Option<u32>,
}

/// Tables for running raster operations on system palette indices instead of native pixels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexSpace {
    pub palette_to_native: Vec<u32>,
    pub native_to_palette: Vec<u32>,
}

impl IndexSpace {
    #[inline]
    pub fn new(palette_to_native: Vec<u32>, native_to_palette: Vec<u32>) -> Self {
        Self {
            palette_to_native,
            native_to_palette,
        }
    }

    /// The palette index of a native pixel.
    #[inline]
    pub fn to_index(&self, pixel: u32) -> u32 {
        self.native_to_palette
            .get(pixel as usize)
            .copied()
            .unwrap_or(0)
    }

    /// The native pixel of a palette index. Bits above the palette size are ignored.
    #[inline]
    pub fn to_native(&self, index: u32) -> u32 {
        match self.palette_to_native.len() {
            0 => index,
            len => self.palette_to_native[index as usize % len],
        }
    }
}

/// The registers of a raster operation over one rectangle of a [`Surface`].
///
/// The source and pattern registers are loaded up front. The destination register is a scratch
/// copy of the rectangle, unless the surface can combine in place and the program allows it.
#[derive(Debug)]
pub struct SurfaceRegisters<'s, S: Surface + ?Sized> {
    surface: &'s mut S,
    rect: Rectangle,
    source: Vec<u32>,
    pattern: Option<Pattern>,
    destination: Option<Vec<u32>>,
    temporary: Option<Vec<u32>>,
    index_space: Option<IndexSpace>,
    solid: SolidPixels,
    in_place: bool,
}

impl<'s, S: Surface + ?Sized> SurfaceRegisters<'s, S> {
    /// Registers for `rect`, which should already be clipped to the surface.
    #[inline]
    pub fn new(surface: &'s mut S, rect: Rectangle) -> Self {
        Self {
            surface,
            rect,
            source: Vec::new(),
            pattern: None,
            destination: None,
            temporary: None,
            index_space: None,
            solid: SolidPixels::default(),
            in_place: false,
        }
    }

    #[inline]
    fn len(&self) -> usize {
        self.rect.width() as usize * self.rect.height() as usize
    }

    /// Load the source register with one pixel for every pixel of the rectangle.
    #[inline]
    pub fn with_source(mut self, pixels: Vec<u32>) -> Result<Self> {
        if pixels.len() != self.len() {
            return Err(Error::BadParameter("source does not match the destination rectangle"));
        }
        self.source = pixels;
        Ok(self)
    }

    #[inline]
    pub fn with_pattern(mut self, pattern: Option<Pattern>) -> Self {
        self.pattern = pattern;
        self
    }

    /// Run on palette indices. Source and pattern must already hold indices.
    #[inline]
    pub fn with_index_space(mut self, index_space: Option<IndexSpace>) -> Self {
        self.index_space = index_space;
        self
    }

    #[inline]
    pub fn with_solid_pixels(mut self, solid: SolidPixels) -> Self {
        self.solid = solid;
        self
    }

    /// Combine straight into the surface when running `program` that way gives the same result.
    #[inline]
    pub fn allow_in_place(mut self, program: &RopProgram) -> Self {
        self.in_place = self.surface.features().in_place_combine
            && self.index_space.is_none()
            && !program.uses_temporary()
            && !program
                .ops()
                .iter()
                .any(|op| op.src == Register::Destination);
        self
    }

    #[inline]
    pub fn is_in_place(&self) -> bool {
        self.in_place
    }

    #[inline]
    pub fn rect(&self) -> Rectangle {
        self.rect
    }

    fn take(&mut self, register: Register) -> Result<Vec<u32>> {
        match register {
            Register::Source => Ok(mem::take(&mut self.source)),
            Register::Destination => self
                .destination
                .take()
                .ok_or(Error::BadParameter("destination register is not allocated")),
            Register::Temporary => self
                .temporary
                .take()
                .ok_or(Error::BadParameter("temporary register is not allocated")),
            Register::Pattern => Err(Error::BadParameter("pattern register is read only")),
        }
    }

    fn put(&mut self, register: Register, pixels: Vec<u32>) {
        match register {
            Register::Source => self.source = pixels,
            Register::Destination => self.destination = Some(pixels),
            Register::Temporary => self.temporary = Some(pixels),
            Register::Pattern => {}
        }
    }

    fn get(&self, register: Register) -> Result<&[u32]> {
        match register {
            Register::Source => Ok(&self.source),
            Register::Destination => self
                .destination
                .as_deref()
                .ok_or(Error::BadParameter("destination register is not allocated")),
            Register::Temporary => self
                .temporary
                .as_deref()
                .ok_or(Error::BadParameter("temporary register is not allocated")),
            Register::Pattern => Err(Error::BadParameter("pattern register has no pixels")),
        }
    }
}

impl<'s, S: Surface + ?Sized> RopBackend for SurfaceRegisters<'s, S> {
    fn allocate_scratch(&mut self, register: Register) -> Result {
        let len = self.len();
        match register {
            Register::Destination if !self.in_place => {
                self.destination = Some(try_alloc(len, 0u32)?);
            }
            Register::Temporary => {
                self.temporary = Some(try_alloc(len, 0u32)?);
            }
            _ => {}
        }
        Ok(())
    }

    #[inline]
    fn release_scratch(&mut self, register: Register) {
        match register {
            Register::Destination => self.destination = None,
            Register::Temporary => self.temporary = None,
            _ => {}
        }
    }

    fn fetch_destination(&mut self) -> Result {
        if self.in_place {
            return Ok(());
        }

        let mut pixels = self.surface.read_pixels(self.rect)?;
        if let Some(ref space) = self.index_space {
            pixels.iter_mut().for_each(|p| *p = space.to_index(*p));
        }
        self.destination = Some(pixels);
        Ok(())
    }

    fn combine(&mut self, src: Register, dst: Register, op: BoolOp) -> Result {
        if src == Register::Pattern {
            return self.fill(dst, op);
        }

        if self.in_place && dst == Register::Destination {
            let pixels = self.take(src)?;
            let result = self.surface.write_pixels(self.rect, &pixels, op);
            self.put(src, pixels);
            return result;
        }

        let mut target = self.take(dst)?;
        let result = if src == dst {
            target.iter_mut().for_each(|d| *d = op.apply(*d, *d));
            Ok(())
        } else {
            self.get(src).map(|pixels| {
                for (d, &s) in target.iter_mut().zip(pixels) {
                    *d = op.apply(s, *d);
                }
            })
        };
        self.put(dst, target);
        result
    }

    fn fill(&mut self, dst: Register, op: BoolOp) -> Result {
        if self.in_place && dst == Register::Destination {
            return match self.pattern {
                Some(ref pattern) => self.surface.fill_pattern(self.rect, pattern, op),
                None => Err(Error::BadParameter("no pattern to fill with")),
            };
        }

        let mut target = self.take(dst)?;
        let width = self.rect.width() as usize;
        let (x1, y1) = (self.rect.x1, self.rect.y1);
        let result = match self.pattern {
            Some(ref pattern) => {
                for (i, d) in target.iter_mut().enumerate() {
                    let (x, y) = ((i % width) as i32, (i / width) as i32);
                    *d = op.apply(pattern.pixel_at(x1 + x, y1 + y), *d);
                }
                Ok(())
            }
            None => Err(Error::BadParameter("no pattern to fill with")),
        };
        self.put(dst, target);
        result
    }

    fn fill_solid(&mut self, op: BoolOp) -> Result {
        let rect = self.rect;
        match (op, self.solid) {
            (BoolOp::Noop, _) => Ok(()),
            (BoolOp::Clear, SolidPixels { black: Some(p), .. })
            | (BoolOp::Set, SolidPixels { white: Some(p), .. }) => {
                self.surface.fill_rect(rect, p, BoolOp::Copy)
            }
            (BoolOp::Invert, SolidPixels { invert: Some(p), .. }) => {
                self.surface.fill_rect(rect, p, BoolOp::Xor)
            }
            (op, _) => self.surface.fill_rect(rect, 0, op),
        }
    }

    fn commit(&mut self, register: Register) -> Result {
        if self.in_place && register == Register::Destination {
            return Ok(());
        }

        let mut pixels = self.take(register)?;
        if let Some(ref space) = self.index_space {
            pixels.iter_mut().for_each(|p| *p = space.to_native(*p));
        }
        let result = self.surface.write_pixels(self.rect, &pixels, BoolOp::Copy);
        self.put(register, pixels);
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{decompose, PixelFormat, Pixmap, Rop3, RopExecutor};

    fn run(rop: Rop3, in_place: bool) -> Vec<u32> {
        let mut pixmap =
            Pixmap::from_pixels(4, 1, PixelFormat::indexed(8), vec![0xaa; 4]).unwrap();
        let rect = pixmap.bounds();
        let mut registers = SurfaceRegisters::new(&mut pixmap, rect)
            .with_source(vec![0xcc; 4])
            .unwrap()
            .with_pattern(Some(Pattern::solid(0xf0)));
        if in_place {
            registers = registers.allow_in_place(&decompose(rop));
        }
        RopExecutor::new().execute(&mut registers, rop).unwrap();
        pixmap.pixels().to_vec()
    }

    #[test]
    fn test_every_rop_on_a_pixmap() {
        for code in 0..=255u8 {
            let expected = vec![code as u32; 4];
            assert_eq!(run(Rop3(code), false), expected, "{:?}", Rop3(code));
            assert_eq!(run(Rop3(code), true), expected, "{:?} in place", Rop3(code));
        }
    }

    #[test]
    fn test_in_place_only_when_destination_is_not_an_operand() {
        let mut pixmap = Pixmap::new(1, 1, PixelFormat::indexed(8)).unwrap();
        let rect = pixmap.bounds();
        let registers = SurfaceRegisters::new(&mut pixmap, rect).allow_in_place(&Rop3::SRCINVERT.program());
        assert!(registers.is_in_place());

        let rop = (0..=255u8)
            .map(Rop3)
            .find(|r| decompose(*r).uses_temporary())
            .unwrap();
        let registers = SurfaceRegisters::new(&mut pixmap, rect).allow_in_place(&decompose(rop));
        assert!(!registers.is_in_place());
    }

    #[test]
    fn test_index_space_round_trip() {
        // native pixel = index + 100
        let p2n: Vec<u32> = (0..256).map(|i| i + 100).collect();
        let mut n2p = vec![0; 356];
        for i in 0..256 {
            n2p[i + 100] = i as u32;
        }

        let mut pixmap =
            Pixmap::from_pixels(2, 1, PixelFormat::indexed(16), vec![100 + 0x0f, 100 + 0x30]).unwrap();
        let rect = pixmap.bounds();
        let mut registers = SurfaceRegisters::new(&mut pixmap, rect)
            .with_source(vec![0x01, 0x02])
            .unwrap()
            .with_index_space(Some(IndexSpace::new(p2n, n2p)));
        RopExecutor::new()
            .execute(&mut registers, Rop3::SRCPAINT)
            .unwrap();
        assert_eq!(pixmap.pixels(), &[100 + 0x0f, 100 + 0x32]);
    }

    #[test]
    fn test_solid_pixels() {
        let mut pixmap = Pixmap::from_pixels(1, 1, PixelFormat::indexed(8), vec![3]).unwrap();
        let rect = pixmap.bounds();
        let solid = SolidPixels {
            black: Some(7),
            white: Some(9),
            invert: Some(0x0f),
        };

        let mut registers = SurfaceRegisters::new(&mut pixmap, rect).with_solid_pixels(solid);
        RopExecutor::new()
            .execute(&mut registers, Rop3::DSTINVERT)
            .unwrap();
        assert_eq!(pixmap.pixels(), &[0x0c]);

        let mut registers = SurfaceRegisters::new(&mut pixmap, rect).with_solid_pixels(solid);
        RopExecutor::new()
            .execute(&mut registers, Rop3::BLACKNESS)
            .unwrap();
        assert_eq!(pixmap.pixels(), &[7]);

        let mut registers = SurfaceRegisters::new(&mut pixmap, rect);
        RopExecutor::new()
            .execute(&mut registers, Rop3::WHITENESS)
            .unwrap();
        assert_eq!(pixmap.pixels(), &[0xff]);
    }
}
