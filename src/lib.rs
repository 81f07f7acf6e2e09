// MIT/Apache2 License

//! Raster operations, color resolution and device-independent bitmap transfer for pixel
//! surfaces.
//!
//! A [`Blitter`] carries out fills, copies and image transfers onto any [`Surface`]. Ternary
//! raster operations are broken down into programs of binary operations by [`decompose`] and run
//! by the [`RopExecutor`]. Colors are turned into native pixels by a [`ColorResolver`], backed by
//! the system palette in a [`PaletteStore`].

#![forbid(unsafe_code)]

mod error;

pub mod bitmap;
pub mod bits;
pub mod blit;
pub mod channel;
pub mod color;
pub mod fill;
pub mod format;
pub mod gamma;
pub mod geometry;
pub mod palette;
pub mod resample;
pub mod resolve;
pub mod rop;
pub mod surface;

pub use bitmap::*;
pub use bits::*;
pub use blit::*;
pub use channel::*;
pub use color::*;
pub use error::*;
pub use fill::*;
pub use format::*;
pub use gamma::*;
pub use geometry::*;
pub use palette::*;
pub use resample::*;
pub use resolve::*;
pub use rop::*;
pub use surface::*;
