// MIT/Apache2 License

use crate::BitmapInfo;
use std::fmt;

/// Sum error type for raster operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The image needs to be converted to the contained native format before it can be used.
    BadFormat(BitmapInfo),
    /// A buffer or scratch surface could not be allocated.
    OutOfMemory,
    /// The image format cannot be converted to anything the destination understands.
    UnsupportedFormat,
    /// Source and destination sizes differ and no resampler is available.
    TransformNotSupported,
    /// A parameter was rejected at the API boundary.
    BadParameter(&'static str),
    /// Attempted to run an unsupported operation.
    NotSupported(NSOpType),
}

/// An operation that is not supported.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum NSOpType {
    /// The surface cannot hand out its pixels.
    ReadBack,
    /// The gamma device has no adjustable ramp.
    GammaRamp,
}

impl Error {
    /// Is this the "convert and try again" signal?
    #[inline]
    pub fn is_bad_format(&self) -> bool {
        matches!(self, Self::BadFormat(_))
    }
}

impl std::error::Error for Error {}

impl fmt::Display for Error {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BadFormat(info) => write!(
                f,
                "Image must be converted to {} bpp before transfer",
                info.bit_count
            ),
            Self::OutOfMemory => f.write_str("Out of memory while allocating pixel storage"),
            Self::UnsupportedFormat => f.write_str("Image format is not supported"),
            Self::TransformNotSupported => {
                f.write_str("Stretching requires a resampler, but none is configured")
            }
            Self::BadParameter(s) => write!(f, "Bad parameter: {}", s),
            Self::NotSupported(nsop) => {
                write!(f, "Surface does not support feature \"{:?}\"", nsop)
            }
        }
    }
}

/// Reserve room for `len` elements, reporting allocation failure instead of aborting.
#[inline]
pub(crate) fn try_alloc<T: Clone>(len: usize, fill: T) -> Result<Vec<T>> {
    let mut v = Vec::new();
    v.try_reserve_exact(len).map_err(|_| Error::OutOfMemory)?;
    v.resize(len, fill);
    Ok(v)
}

/// Convenience result type.
pub type Result<T = ()> = std::result::Result<T, Error>;
