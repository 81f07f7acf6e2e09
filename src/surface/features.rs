// MIT/Apache2 License

/// Features that are enabled on the [`Surface`].
///
/// [`Surface`]: crate::Surface
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct SurfaceFeatures {
    /// `write_pixels()` combines with the existing pixels itself, so raster operations whose
    /// destination is never read back can be applied directly.
    pub in_place_combine: bool,
    /// `read_pixels()` and `get_image()` are available.
    pub read_back: bool,
}
