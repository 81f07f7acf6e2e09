// MIT/Apache2 License

//! The drawing entry points: pattern fills, surface to surface copies and image transfers.
//!
//! Every blit works on one destination rectangle, clipped to the destination surface. The
//! source, if the raster operation has one, is staged into the destination's pixel format first
//! and then combined through the register file of the destination. Plain transfers skip the
//! staging where they can.

use crate::{
    bits::{copy_image_bits, unpack_pixels, zeropad_mask, DeviceImageBits, Transfer},
    convert_bits,
    error::try_alloc,
    matching_color_info, native_bitmap_info, BitmapInfo, BoolOp, Brush, ColorRef, ColorResolver,
    DirtyRegion, Error, IndexSpace, ImageLayout, LogicalPalette, PaletteStore, Pattern, PixelFormat,
    Rectangle, Register, Resampler, Result, Rop3, RopExecutor, SolidPixels, Surface,
    SurfaceRegisters,
};
use std::{fmt, mem};

/// Knobs for a [`Blitter`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct BlitConfig {
    /// Send operations that need a single boolean function straight to the surface.
    pub fast_paths: bool,
    /// Set the alpha byte of 32 bpp pixels read back from surfaces without an alpha channel.
    pub opaque_alpha: bool,
}

impl Default for BlitConfig {
    #[inline]
    fn default() -> Self {
        Self {
            fast_paths: true,
            opaque_alpha: false,
        }
    }
}

/// Drawing state for blits onto surfaces, and the blits themselves.
///
/// The text and background colors decide what monochrome sources look like on color surfaces,
/// and the other way around. The brush is the pattern of raster operations that use one.
pub struct Blitter<'a> {
    store: &'a PaletteStore,
    palette: Option<&'a LogicalPalette>,
    resampler: Option<&'a dyn Resampler>,
    config: BlitConfig,
    text_color: ColorRef,
    bk_color: ColorRef,
    brush: Brush,
    dirty: DirtyRegion,
}

impl<'a> fmt::Debug for Blitter<'a> {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Blitter")
            .field("palette", &self.palette)
            .field("resampler", &self.resampler.is_some())
            .field("config", &self.config)
            .field("text_color", &self.text_color)
            .field("bk_color", &self.bk_color)
            .field("brush", &self.brush)
            .field("dirty", &self.dirty)
            .finish()
    }
}

impl<'a> Blitter<'a> {
    #[inline]
    pub fn new(store: &'a PaletteStore) -> Self {
        Self {
            store,
            palette: None,
            resampler: None,
            config: BlitConfig::default(),
            text_color: ColorRef::BLACK,
            bk_color: ColorRef::WHITE,
            brush: Brush::default(),
            dirty: DirtyRegion::new(),
        }
    }

    #[inline]
    pub fn with_config(mut self, config: BlitConfig) -> Self {
        self.config = config;
        self
    }

    /// Resolve palette colors against `palette`.
    #[inline]
    pub fn with_palette(mut self, palette: &'a LogicalPalette) -> Self {
        self.palette = Some(palette);
        self
    }

    /// Stretch sources with `resampler`. Without one, stretching fails.
    #[inline]
    pub fn with_resampler(mut self, resampler: &'a dyn Resampler) -> Self {
        self.resampler = Some(resampler);
        self
    }

    #[inline]
    pub fn config(&self) -> &BlitConfig {
        &self.config
    }

    #[inline]
    pub fn text_color(&self) -> ColorRef {
        self.text_color
    }

    #[inline]
    pub fn set_text_color(&mut self, color: ColorRef) {
        self.text_color = color;
    }

    #[inline]
    pub fn bk_color(&self) -> ColorRef {
        self.bk_color
    }

    #[inline]
    pub fn set_bk_color(&mut self, color: ColorRef) {
        self.bk_color = color;
    }

    #[inline]
    pub fn brush(&self) -> &Brush {
        &self.brush
    }

    #[inline]
    pub fn set_brush(&mut self, brush: Brush) {
        self.brush = brush;
    }

    #[inline]
    pub fn resolver(&self) -> ColorResolver<'a> {
        let resolver = ColorResolver::new(self.store);
        match self.palette {
            Some(palette) => resolver.with_palette(palette),
            None => resolver,
        }
    }

    /// The native pixel for `color` on surfaces of `format`.
    #[inline]
    pub fn resolve_color(&self, color: ColorRef, format: &PixelFormat) -> u32 {
        self.resolver().resolve_to_native(color, format)
    }

    /// Everything drawn since the region was last taken.
    ///
    /// The region only grows until the caller drains it with
    /// [`take_dirty_region`](Self::take_dirty_region). Past [`DirtyRegion::MAX_RECTS`] rectangles
    /// it degrades to a bounding box.
    #[inline]
    pub fn dirty_region(&self) -> &DirtyRegion {
        &self.dirty
    }

    /// Take everything drawn so far, leaving the region empty.
    #[inline]
    pub fn take_dirty_region(&mut self) -> DirtyRegion {
        mem::take(&mut self.dirty)
    }

    #[inline]
    fn touch(&mut self, rect: Rectangle) -> DirtyRegion {
        self.dirty.add(rect);
        DirtyRegion::from_rect(rect)
    }

    /// Combine `rect` with the brush, for raster operations without a source.
    pub fn blit_solid<D: Surface + ?Sized>(
        &mut self,
        dst: &mut D,
        rect: Rectangle,
        rop: Rop3,
    ) -> Result<DirtyRegion> {
        if rop.uses_source() {
            return Err(Error::BadParameter("raster operation needs a source"));
        }
        let rect = match rect.intersection(&dst.bounds()) {
            Some(rect) => rect,
            None => return Ok(DirtyRegion::new()),
        };

        let format = dst.format();
        let pattern = match self.pattern(rop, &format)? {
            Some(pattern) => Some(pattern),
            None if rop.uses_pattern() => {
                log::debug!("{:?} with a null brush draws nothing", rop);
                return Ok(DirtyRegion::new());
            }
            None => None,
        };
        let index_space = self.index_space(&format);

        if self.config.fast_paths {
            if let (Some(pattern), [op]) = (pattern.as_ref(), rop.program().ops()) {
                if op.is_fill()
                    && op.dst == Register::Destination
                    && (index_space.is_none() || op.func == BoolOp::Copy)
                {
                    log::debug!("Filling with {:?} straight onto the surface", op.func);
                    dst.fill_pattern(rect, pattern, op.func)?;
                    return Ok(self.touch(rect));
                }
            }
        }

        self.run(dst, rect, None, pattern, index_space, rop)
    }

    /// Combine `src_rect` of `src` into `dst_rect` of `dst`, stretching it if the sizes differ.
    pub fn blit_copy<D: Surface + ?Sized, S: Surface + ?Sized>(
        &mut self,
        dst: &mut D,
        dst_rect: Rectangle,
        src: &S,
        src_rect: Rectangle,
        rop: Rop3,
    ) -> Result<DirtyRegion> {
        if !rop.uses_source() {
            return self.blit_solid(dst, dst_rect, rop);
        }

        match self.stage_copy(src, src_rect, dst_rect, dst.bounds())? {
            Some((rect, pixels)) => self.blit_staged(dst, rect, pixels, &src.format(), rop),
            None => Ok(DirtyRegion::new()),
        }
    }

    /// Like [`blit_copy`](Self::blit_copy), where source and destination are the same surface and
    /// may overlap.
    pub fn blit_copy_within<S: Surface + ?Sized>(
        &mut self,
        surface: &mut S,
        dst_rect: Rectangle,
        src_rect: Rectangle,
        rop: Rop3,
    ) -> Result<DirtyRegion> {
        if !rop.uses_source() {
            return self.blit_solid(surface, dst_rect, rop);
        }

        let format = surface.format();
        let bounds = surface.bounds();
        let same_size =
            src_rect.width() == dst_rect.width() && src_rect.height() == dst_rect.height();

        if self.config.fast_paths && same_size {
            if let Some(func) = rop.program().single_source_op() {
                if func == BoolOp::Copy || self.index_space(&format).is_none() {
                    let (visible, dx, dy) = match clip_copy(dst_rect, bounds, src_rect, bounds) {
                        Some(clipped) => clipped,
                        None => return Ok(DirtyRegion::new()),
                    };
                    log::debug!("Copying area with {:?}", func);
                    surface.copy_area(visible.offset(dx, dy), visible.origin(), func)?;
                    return Ok(self.touch(visible));
                }
            }
        }

        match self.stage_copy(&*surface, src_rect, dst_rect, bounds)? {
            Some((rect, pixels)) => self.blit_staged(surface, rect, pixels, &format, rop),
            None => Ok(DirtyRegion::new()),
        }
    }

    /// Combine a device-independent bitmap into `dst_rect`, stretching it if the sizes differ.
    ///
    /// Bitmaps that are not in the native encoding of the surface are converted first.
    pub fn blit_image<D: Surface + ?Sized>(
        &mut self,
        dst: &mut D,
        dst_rect: Rectangle,
        info: &BitmapInfo,
        bits: &[u8],
        rop: Rop3,
    ) -> Result<DirtyRegion> {
        if !rop.uses_source() {
            return self.blit_solid(dst, dst_rect, rop);
        }
        if !info.is_supported() {
            return Err(Error::UnsupportedFormat);
        }
        if bits.len() < info.image_size() {
            return Err(Error::BadParameter("image buffer is too small"));
        }

        match self.put_image(dst, dst_rect, info, bits, rop) {
            Err(Error::BadFormat(native)) => {
                log::debug!(
                    "Converting {} bpp image to the native {} bpp",
                    info.bit_count,
                    native.bit_count
                );
                let converted = convert_bits(info, bits, &native)?;
                match self.put_image(dst, dst_rect, &native, &converted, rop) {
                    Err(Error::BadFormat(_)) => Err(Error::UnsupportedFormat),
                    result => result,
                }
            }
            result => result,
        }
    }

    /// Read `rect` of `src` back as a top-down bitmap in the native encoding of the surface.
    pub fn get_image<S: Surface + ?Sized>(
        &self,
        src: &S,
        rect: Rectangle,
    ) -> Result<(BitmapInfo, Vec<u8>)> {
        let rect = rect
            .intersection(&src.bounds())
            .ok_or(Error::BadParameter("rectangle lies outside of the surface"))?;
        let format = src.format();
        let (width, height) = (rect.width(), rect.height());
        let packed = src.get_image(rect)?;

        let alpha_bits = if self.config.opaque_alpha && format.bits_per_pixel == 32 && format.depth < 32
        {
            0xff00_0000
        } else {
            0
        };
        let info = native_bitmap_info(
            &BitmapInfo::new(width as i32, height as i32, format.bits_per_pixel as u16),
            &format,
            self.store,
            alpha_bits != 0,
        );

        let native_to_palette = match format.bits_per_pixel {
            4 | 8 if format.is_indexed() => self.store.native_to_palette_table(),
            _ => None,
        };
        let transfer = Transfer {
            mapping: native_to_palette.as_deref(),
            zeropad_mask: zeropad_mask(width, format.bits_per_pixel),
            alpha_bits,
        };

        let layout = format.layout();
        let bits = copy_image_bits(
            &info,
            &layout,
            DeviceImageBits::owned(packed).with_stride(layout.bytes_per_line(width)),
            Rectangle::from_size(0, 0, width, height),
            &transfer,
        )?;
        Ok((info, bits.into_owned()))
    }

    /// One attempt at transferring a bitmap, failing with `BadFormat` if it must be converted.
    fn put_image<D: Surface + ?Sized>(
        &mut self,
        dst: &mut D,
        dst_rect: Rectangle,
        info: &BitmapInfo,
        bits: &[u8],
        rop: Rop3,
    ) -> Result<DirtyRegion> {
        let format = dst.format();
        if info.bit_count != format.bits_per_pixel as u16
            || !matching_color_info(info, &format, self.store)
        {
            return Err(Error::BadFormat(native_bitmap_info(
                info,
                &format,
                self.store,
                false,
            )));
        }

        let (width, height) = (info.width.unsigned_abs(), info.abs_height());
        let layout = format.layout();
        let index_space = self.index_space(&format);
        let palette_to_native = match info.bit_count {
            4 | 8 if format.is_indexed() => self.store.palette_to_native_table(),
            _ => None,
        };
        // in index space the bitmap values already are system palette indices
        let mapping = match index_space {
            Some(_) => None,
            None => palette_to_native.as_deref(),
        };

        if width != dst_rect.width() || height != dst_rect.height() {
            if dst_rect.is_empty() {
                return Ok(DirtyRegion::new());
            }
            let resampler = self.resampler.ok_or(Error::TransformNotSupported)?;
            let whole = Rectangle::from_size(0, 0, width, height);
            let pixels = decode_image(info, bits, &layout, whole, mapping)?;
            let stretched =
                resampler.resample(&pixels, width, height, dst_rect.width(), dst_rect.height())?;
            return match crop(stretched, dst_rect, dst.bounds())? {
                Some((rect, pixels)) => self.blit_decoded(dst, rect, pixels, index_space, rop),
                None => Ok(DirtyRegion::new()),
            };
        }

        let visible = match dst_rect.intersection(&dst.bounds()) {
            Some(visible) => visible,
            None => return Ok(DirtyRegion::new()),
        };
        let src = visible.offset(-dst_rect.x1, -dst_rect.y1);

        if self.config.fast_paths {
            if let Some(func) = rop.program().single_source_op() {
                let transfer = Transfer {
                    mapping: palette_to_native.as_deref(),
                    ..Default::default()
                };
                let image =
                    copy_image_bits(info, &layout, DeviceImageBits::borrowed(bits), src, &transfer)?;
                log::debug!(
                    "Putting image with {:?}, {}",
                    func,
                    if image.is_copy() { "converted" } else { "zero copy" }
                );

                if src.x1 == 0 {
                    dst.put_image(visible, image.as_bytes(), image.stride(), func)?;
                } else {
                    let pixels = unpack_pixels(
                        image.as_bytes(),
                        image.stride(),
                        src.x1 as usize,
                        visible.width(),
                        visible.height(),
                        &layout,
                    )?;
                    dst.write_pixels(visible, &pixels, func)?;
                }
                return Ok(self.touch(visible));
            }
        }

        let pixels = decode_image(info, bits, &layout, src, mapping)?;
        self.blit_decoded(dst, visible, pixels, index_space, rop)
    }

    /// Blit decoded bitmap pixels, which are palette indices when `index_space` is set.
    fn blit_decoded<D: Surface + ?Sized>(
        &mut self,
        dst: &mut D,
        rect: Rectangle,
        mut pixels: Vec<u32>,
        index_space: Option<IndexSpace>,
        rop: Rop3,
    ) -> Result<DirtyRegion> {
        if self.config.fast_paths {
            if let Some(func) = rop.program().single_source_op() {
                if let Some(ref space) = index_space {
                    pixels.iter_mut().for_each(|p| *p = space.to_native(*p));
                }
                dst.write_pixels(rect, &pixels, func)?;
                return Ok(self.touch(rect));
            }
        }

        let pattern = self.pattern(rop, &dst.format())?;
        self.run(dst, rect, Some(pixels), pattern, index_space, rop)
    }

    /// Blit native pixels of `src_format` that line up with `rect`.
    fn blit_staged<D: Surface + ?Sized>(
        &mut self,
        dst: &mut D,
        rect: Rectangle,
        mut pixels: Vec<u32>,
        src_format: &PixelFormat,
        rop: Rop3,
    ) -> Result<DirtyRegion> {
        let format = dst.format();
        self.convert_pixels(&mut pixels, src_format, &format);
        let index_space = self.index_space(&format);

        if self.config.fast_paths {
            if let Some(func) = rop.program().single_source_op() {
                if index_space.is_none() || func == BoolOp::Copy {
                    log::debug!("{:?} goes straight to the surface", rop);
                    dst.write_pixels(rect, &pixels, func)?;
                    return Ok(self.touch(rect));
                }
            }
        }

        if let Some(ref space) = index_space {
            pixels.iter_mut().for_each(|p| *p = space.to_index(*p));
        }
        let pattern = self.pattern(rop, &format)?;
        self.run(dst, rect, Some(pixels), pattern, index_space, rop)
    }

    /// Run `rop` through the register file of `dst`. `source` and `pattern` hold native pixels,
    /// or palette indices for the source when `index_space` is set.
    fn run<D: Surface + ?Sized>(
        &mut self,
        dst: &mut D,
        rect: Rectangle,
        source: Option<Vec<u32>>,
        pattern: Option<Pattern>,
        index_space: Option<IndexSpace>,
        rop: Rop3,
    ) -> Result<DirtyRegion> {
        let program = rop.program();
        let solid = self.solid_pixels(&dst.format());
        let pattern = match (&index_space, pattern) {
            (Some(space), Some(pattern)) => Some(pattern.map(|p| space.to_index(p))),
            (_, pattern) => pattern,
        };
        let null_brush = pattern.is_none() && rop.uses_pattern();

        let mut registers = SurfaceRegisters::new(&mut *dst, rect);
        if let Some(source) = source {
            registers = registers.with_source(source)?;
        }
        let mut registers = registers
            .with_pattern(pattern)
            .with_index_space(index_space)
            .with_solid_pixels(solid)
            .allow_in_place(&program);

        log::trace!(
            "Running {:?} over {:?}, in place: {}",
            rop,
            rect,
            registers.is_in_place()
        );
        RopExecutor::new()
            .with_null_brush(null_brush)
            .execute(&mut registers, rop)?;
        Ok(self.touch(rect))
    }

    #[inline]
    fn pattern(&self, rop: Rop3, format: &PixelFormat) -> Result<Option<Pattern>> {
        if rop.uses_pattern() {
            self.brush.resolve(&self.resolver(), format)
        } else {
            Ok(None)
        }
    }

    #[inline]
    fn index_space(&self, format: &PixelFormat) -> Option<IndexSpace> {
        if !format.is_indexed() {
            return None;
        }
        self.store
            .index_space_tables()
            .map(|(p2n, n2p)| IndexSpace::new(p2n, n2p))
    }

    fn solid_pixels(&self, format: &PixelFormat) -> SolidPixels {
        if format.is_mono() || self.store.is_virtual() {
            return SolidPixels::default();
        }

        let white = self.store.white_pixel();
        SolidPixels {
            black: Some(self.store.palette_to_native(0)),
            white: Some(white),
            invert: if self.store.is_private() {
                None
            } else {
                Some(white ^ self.store.black_pixel())
            },
        }
    }

    /// Turn pixels of `from` into pixels of `to`.
    fn convert_pixels(&self, pixels: &mut [u32], from: &PixelFormat, to: &PixelFormat) {
        if from.same_format(to) {
            return;
        }

        let resolver = self.resolver();
        if from.is_mono() {
            let text = resolver.resolve_to_native(self.text_color, to);
            let bk = resolver.resolve_to_native(self.bk_color, to);
            log::debug!("Expanding mono source to {:#x}/{:#x}", text, bk);
            pixels
                .iter_mut()
                .for_each(|p| *p = if *p & 1 == 0 { text } else { bk });
        } else if to.is_mono() {
            let bk = resolver.resolve_to_native(self.bk_color, from);
            log::debug!("Reducing source to mono against {:#x}", bk);
            pixels.iter_mut().for_each(|p| *p = (*p == bk) as u32);
        } else {
            for p in pixels.iter_mut() {
                let rgb = resolver.resolve_to_rgb(*p, from);
                *p = resolver.resolve_to_native(ColorRef::Rgb(rgb), to);
            }
        }
    }

    /// Read the source block of a copy, stretched to the size of `dst_rect` if necessary, and
    /// clip it to `bounds`.
    fn stage_copy<S: Surface + ?Sized>(
        &self,
        src: &S,
        src_rect: Rectangle,
        dst_rect: Rectangle,
        bounds: Rectangle,
    ) -> Result<Option<(Rectangle, Vec<u32>)>> {
        if dst_rect.is_empty() || src_rect.is_empty() {
            return Ok(None);
        }

        if src_rect.width() == dst_rect.width() && src_rect.height() == dst_rect.height() {
            let (visible, dx, dy) = match clip_copy(dst_rect, bounds, src_rect, src.bounds()) {
                Some(clipped) => clipped,
                None => return Ok(None),
            };
            let pixels = src.read_pixels(visible.offset(dx, dy))?;
            return Ok(Some((visible, pixels)));
        }

        let resampler = self.resampler.ok_or(Error::TransformNotSupported)?;
        if !src.bounds().contains(&src_rect) {
            return Err(Error::BadParameter(
                "stretched source must lie inside of the source surface",
            ));
        }
        let pixels = src.read_pixels(src_rect)?;
        let stretched = resampler.resample(
            &pixels,
            src_rect.width(),
            src_rect.height(),
            dst_rect.width(),
            dst_rect.height(),
        )?;
        crop(stretched, dst_rect, bounds)
    }
}

/// The part of a same-size copy that is inside of both surfaces, in destination coordinates,
/// and the offset from there to the source.
#[inline]
fn clip_copy(
    dst_rect: Rectangle,
    dst_bounds: Rectangle,
    src_rect: Rectangle,
    src_bounds: Rectangle,
) -> Option<(Rectangle, i32, i32)> {
    let (dx, dy) = (src_rect.x1 - dst_rect.x1, src_rect.y1 - dst_rect.y1);
    let visible = dst_rect
        .intersection(&dst_bounds)?
        .intersection(&src_bounds.offset(-dx, -dy))?;
    Some((visible, dx, dy))
}

/// Cut the part of `pixels`, covering `rect`, that lies inside of `bounds`.
fn crop(
    pixels: Vec<u32>,
    rect: Rectangle,
    bounds: Rectangle,
) -> Result<Option<(Rectangle, Vec<u32>)>> {
    let visible = match rect.intersection(&bounds) {
        Some(visible) => visible,
        None => return Ok(None),
    };
    if visible == rect {
        return Ok(Some((rect, pixels)));
    }

    let width = rect.width() as usize;
    let (dx, dy) = ((visible.x1 - rect.x1) as usize, (visible.y1 - rect.y1) as usize);
    let mut out = try_alloc(visible.width() as usize * visible.height() as usize, 0u32)?;
    for (row, dst) in out.chunks_exact_mut(visible.width() as usize).enumerate() {
        let start = (dy + row) * width + dx;
        dst.copy_from_slice(&pixels[start..start + dst.len()]);
    }
    Ok(Some((visible, out)))
}

/// Decode `rect`, in top-down bitmap coordinates, of a bitmap already in the native encoding.
fn decode_image(
    info: &BitmapInfo,
    bits: &[u8],
    layout: &ImageLayout,
    rect: Rectangle,
    mapping: Option<&[u32]>,
) -> Result<Vec<u32>> {
    let transfer = Transfer {
        mapping,
        ..Default::default()
    };
    let image = copy_image_bits(info, layout, DeviceImageBits::borrowed(bits), rect, &transfer)?;
    unpack_pixels(
        image.as_bytes(),
        image.stride(),
        rect.x1 as usize,
        rect.width(),
        rect.height(),
        layout,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        ByteOrder, NearestNeighbor, PaletteConfig, Pixmap, Rgb, SoftColormap, Visual,
    };

    fn true_color() -> PaletteStore {
        PaletteStore::new(
            Visual::true_color(24, 0xff0000, 0xff00, 0xff),
            Box::new(SoftColormap::new(256)),
            PaletteConfig::default(),
        )
        .unwrap()
    }

    fn pseudo_color() -> PaletteStore {
        PaletteStore::new(
            Visual::pseudo_color(8),
            Box::new(SoftColormap::new(256)),
            PaletteConfig::default(),
        )
        .unwrap()
    }

    fn rgb888() -> PixelFormat {
        PixelFormat::rgb888().with_byte_order(ByteOrder::LsbFirst)
    }

    #[test]
    fn test_pattern_fill() {
        let store = true_color();
        let mut blitter = Blitter::new(&store);
        blitter.set_brush(Brush::from(Rgb::new(0xff, 0, 0)));
        let mut pixmap = Pixmap::new(2, 2, rgb888()).unwrap();

        let dirty = blitter
            .blit_solid(&mut pixmap, Rectangle::new(1, 0, 5, 1), Rop3::PATCOPY)
            .unwrap();
        assert_eq!(pixmap.pixels(), &[0, 0xff0000, 0, 0]);
        assert_eq!(dirty.rects(), &[Rectangle::new(1, 0, 2, 1)]);

        let bounds = pixmap.bounds();
        blitter
            .blit_solid(&mut pixmap, bounds, Rop3::PATINVERT)
            .unwrap();
        assert_eq!(pixmap.pixels(), &[0xff0000, 0, 0xff0000, 0xff0000]);
    }

    #[test]
    fn test_null_brush_draws_nothing() {
        let store = true_color();
        let mut blitter = Blitter::new(&store);
        blitter.set_brush(Brush::Null);
        let mut pixmap = Pixmap::new(1, 1, rgb888()).unwrap();

        let bounds = pixmap.bounds();
        let dirty = blitter
            .blit_solid(&mut pixmap, bounds, Rop3::PATCOPY)
            .unwrap();
        assert!(dirty.is_empty());
        assert_eq!(pixmap.pixels(), &[0]);
        assert!(blitter.dirty_region().is_empty());
    }

    #[test]
    fn test_source_rop_needs_a_source() {
        let store = true_color();
        let mut pixmap = Pixmap::new(1, 1, rgb888()).unwrap();
        let bounds = pixmap.bounds();
        assert!(Blitter::new(&store)
            .blit_solid(&mut pixmap, bounds, Rop3::SRCCOPY)
            .is_err());
    }

    #[test]
    fn test_blackness_uses_palette_black() {
        let store = pseudo_color();
        let mut blitter = Blitter::new(&store);
        let mut pixmap =
            Pixmap::from_pixels(2, 1, PixelFormat::indexed(8), vec![5, 6]).unwrap();

        let bounds = pixmap.bounds();
        blitter
            .blit_solid(&mut pixmap, bounds, Rop3::BLACKNESS)
            .unwrap();
        let black = store.palette_to_native(0);
        assert_eq!(pixmap.pixels(), &[black, black]);

        blitter
            .blit_solid(&mut pixmap, bounds, Rop3::DSTINVERT)
            .unwrap();
        let inverted = black ^ store.white_pixel() ^ store.black_pixel();
        assert_eq!(pixmap.pixels(), &[inverted, inverted]);
    }

    #[test]
    fn test_mono_source_uses_text_and_background() {
        let store = true_color();
        let mut blitter = Blitter::new(&store);
        blitter.set_text_color(ColorRef::Rgb(Rgb::new(0, 0, 0xff)));
        blitter.set_bk_color(ColorRef::Rgb(Rgb::new(0, 0xff, 0)));

        let mono = Pixmap::from_pixels(2, 1, PixelFormat::mono(), vec![0, 1]).unwrap();
        let mut color = Pixmap::new(2, 1, rgb888()).unwrap();
        let bounds = color.bounds();
        blitter
            .blit_copy(&mut color, bounds, &mono, mono.bounds(), Rop3::SRCCOPY)
            .unwrap();
        assert_eq!(color.pixels(), &[0x0000ff, 0x00ff00]);

        let mut back = Pixmap::new(2, 1, PixelFormat::mono()).unwrap();
        let bounds = back.bounds();
        blitter
            .blit_copy(&mut back, bounds, &color, color.bounds(), Rop3::SRCCOPY)
            .unwrap();
        assert_eq!(back.pixels(), &[0, 1]);
    }

    #[test]
    fn test_copy_is_clipped_to_both_surfaces() {
        let store = true_color();
        let mut blitter = Blitter::new(&store);
        let src = Pixmap::from_pixels(2, 1, rgb888(), vec![1, 2]).unwrap();
        let mut dst = Pixmap::new(3, 1, rgb888()).unwrap();

        let dirty = blitter
            .blit_copy(
                &mut dst,
                Rectangle::new(1, 0, 4, 1),
                &src,
                Rectangle::new(0, 0, 3, 1),
                Rop3::SRCCOPY,
            )
            .unwrap();
        assert_eq!(dst.pixels(), &[0, 1, 2]);
        assert_eq!(dirty.rects(), &[Rectangle::new(1, 0, 3, 1)]);
    }

    #[test]
    fn test_stretch_needs_a_resampler() {
        let store = true_color();
        let src = Pixmap::from_pixels(1, 1, rgb888(), vec![7]).unwrap();
        let mut dst = Pixmap::new(2, 2, rgb888()).unwrap();

        let mut blitter = Blitter::new(&store);
        let bounds = dst.bounds();
        assert_eq!(
            blitter.blit_copy(&mut dst, bounds, &src, src.bounds(), Rop3::SRCCOPY),
            Err(Error::TransformNotSupported)
        );

        let resampler = NearestNeighbor;
        let mut blitter = Blitter::new(&store).with_resampler(&resampler);
        blitter
            .blit_copy(&mut dst, bounds, &src, src.bounds(), Rop3::SRCCOPY)
            .unwrap();
        assert_eq!(dst.pixels(), &[7; 4]);
    }

    #[test]
    fn test_copy_within_overlapping() {
        let store = true_color();
        let mut pixmap = Pixmap::from_pixels(4, 1, rgb888(), vec![1, 2, 3, 4]).unwrap();

        for &fast_paths in &[true, false] {
            let mut pixmap = pixmap.clone();
            let mut blitter = Blitter::new(&store).with_config(BlitConfig {
                fast_paths,
                ..Default::default()
            });
            blitter
                .blit_copy_within(
                    &mut pixmap,
                    Rectangle::new(1, 0, 4, 1),
                    Rectangle::new(0, 0, 3, 1),
                    Rop3::SRCCOPY,
                )
                .unwrap();
            assert_eq!(pixmap.pixels(), &[1, 1, 2, 3]);
        }

        Blitter::new(&store)
            .blit_copy_within(
                &mut pixmap,
                Rectangle::new(0, 0, 2, 1),
                Rectangle::new(2, 0, 4, 1),
                Rop3::SRCINVERT,
            )
            .unwrap();
        assert_eq!(pixmap.pixels(), &[1 ^ 3, 2 ^ 4, 3, 4]);
    }

    #[test]
    fn test_image_is_converted_to_native() {
        let store = true_color();
        let mut blitter = Blitter::new(&store);
        let mut pixmap = Pixmap::new(2, 2, rgb888()).unwrap();

        // bottom-up: the first row in memory is the bottom one
        let info = BitmapInfo::new(2, 2, 1).with_colors(vec![Rgb::BLACK, Rgb::WHITE]);
        let bits = [0x40, 0, 0, 0, 0x80, 0, 0, 0];
        let bounds = pixmap.bounds();
        blitter
            .blit_image(&mut pixmap, bounds, &info, &bits, Rop3::SRCCOPY)
            .unwrap();
        assert_eq!(pixmap.pixels(), &[0xffffff, 0, 0, 0xffffff]);
    }

    #[test]
    fn test_image_onto_byte_padded_surface() {
        let store = PaletteStore::new(
            Visual::pseudo_color(8),
            Box::new(SoftColormap::new(256)),
            PaletteConfig {
                private_color_map: true,
                ..Default::default()
            },
        )
        .unwrap();
        let mut format = PixelFormat::indexed(8);
        format.scanline_pad = 8;

        // 3x2, top-down, rows padded to four bytes
        let info = BitmapInfo::new(3, -2, 8).with_colors(store.system_color_table(8));
        let bits = [1u8, 2, 3, 0, 4, 5, 6, 0];

        for &fast_paths in &[true, false] {
            let mut blitter = Blitter::new(&store).with_config(BlitConfig {
                fast_paths,
                ..Default::default()
            });
            let mut pixmap = Pixmap::new(3, 2, format).unwrap();
            let bounds = pixmap.bounds();
            blitter
                .blit_image(&mut pixmap, bounds, &info, &bits, Rop3::SRCCOPY)
                .unwrap();
            assert_eq!(pixmap.pixels(), &[1, 2, 3, 4, 5, 6], "fast paths: {}", fast_paths);

            let (info, read) = blitter.get_image(&pixmap, bounds).unwrap();
            assert_eq!(info.stride(), 4);
            assert_eq!(read, bits.to_vec());
        }
    }

    #[test]
    fn test_unsupported_images() {
        let store = true_color();
        let mut pixmap = Pixmap::new(2, 2, rgb888()).unwrap();
        let mut info = BitmapInfo::new(2, 2, 8);
        info.compression = crate::Compression::Rle8;
        let bounds = pixmap.bounds();
        assert_eq!(
            Blitter::new(&store).blit_image(&mut pixmap, bounds, &info, &[0; 8], Rop3::SRCCOPY),
            Err(Error::UnsupportedFormat)
        );
    }

    #[test]
    fn test_get_image_with_opaque_alpha() {
        let store = true_color();
        let pixmap = Pixmap::from_pixels(2, 1, rgb888(), vec![0x123456, 0xabcdef]).unwrap();

        let (info, bits) = Blitter::new(&store)
            .with_config(BlitConfig {
                opaque_alpha: true,
                ..Default::default()
            })
            .get_image(&pixmap, pixmap.bounds())
            .unwrap();
        assert_eq!(info.height, -1);
        assert_eq!(info.bit_count, 32);
        let first = u32::from_ne_bytes([bits[0], bits[1], bits[2], bits[3]]);
        assert_eq!(first, 0xff12_3456);
    }

    #[test]
    fn test_dirty_region_accumulates() {
        let store = true_color();
        let mut blitter = Blitter::new(&store);
        let mut pixmap = Pixmap::new(4, 4, rgb888()).unwrap();

        blitter
            .blit_solid(&mut pixmap, Rectangle::new(0, 0, 1, 1), Rop3::WHITENESS)
            .unwrap();
        blitter
            .blit_solid(&mut pixmap, Rectangle::new(3, 3, 4, 4), Rop3::BLACKNESS)
            .unwrap();
        assert_eq!(blitter.dirty_region().bounds(), Rectangle::new(0, 0, 4, 4));
        assert_eq!(blitter.take_dirty_region().rects().len(), 2);
        assert!(blitter.dirty_region().is_empty());
    }
}
