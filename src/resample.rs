// MIT/Apache2 License

use crate::{error::try_alloc, Error, Result};

/// Scales a block of native pixels to another size.
///
/// Raster operations only ever combine blocks of the same size. When a blit asks for the source
/// to be stretched or shrunk, the source is run through a `Resampler` first.
pub trait Resampler {
    /// Scale `src`, `src_width` by `src_height` top-down pixels, to `dst_width` by `dst_height`.
    fn resample(
        &self,
        src: &[u32],
        src_width: u32,
        src_height: u32,
        dst_width: u32,
        dst_height: u32,
    ) -> Result<Vec<u32>>;
}

impl<R: Resampler + ?Sized> Resampler for &R {
    #[inline]
    fn resample(
        &self,
        src: &[u32],
        src_width: u32,
        src_height: u32,
        dst_width: u32,
        dst_height: u32,
    ) -> Result<Vec<u32>> {
        (**self).resample(src, src_width, src_height, dst_width, dst_height)
    }
}

/// Picks the source pixel under the center of every destination pixel.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash)]
pub struct NearestNeighbor;

#[inline]
fn nearest(i: u32, src: u32, dst: u32) -> usize {
    ((2 * i as u64 + 1) * src as u64 / (2 * dst as u64)) as usize
}

impl Resampler for NearestNeighbor {
    fn resample(
        &self,
        src: &[u32],
        src_width: u32,
        src_height: u32,
        dst_width: u32,
        dst_height: u32,
    ) -> Result<Vec<u32>> {
        if src.len() != src_width as usize * src_height as usize {
            return Err(Error::BadParameter("pixel count does not match source size"));
        }

        let mut out = try_alloc(dst_width as usize * dst_height as usize, 0u32)?;
        if src.is_empty() || out.is_empty() {
            return Ok(out);
        }

        let columns: Vec<usize> = (0..dst_width)
            .map(|x| nearest(x, src_width, dst_width))
            .collect();
        for (y, row) in out.chunks_exact_mut(dst_width as usize).enumerate() {
            let sy = nearest(y as u32, src_height, dst_height);
            let src_row = &src[sy * src_width as usize..(sy + 1) * src_width as usize];
            for (p, &sx) in row.iter_mut().zip(&columns) {
                *p = src_row[sx];
            }
        }
        Ok(out)
    }
}
