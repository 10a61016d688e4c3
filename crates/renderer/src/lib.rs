//! Heatmap rendering for calendar matrices.
//!
//! - [`colormap`]: value → palette color binning
//! - [`raster`]: matrix → pixel raster, one block per cell
//! - [`png`]: PNG encoding of the raster

pub mod colormap;
pub mod png;
pub mod raster;

pub use colormap::{BinLocation, ColorBinner, ValueDomain};
pub use png::encode_png;
pub use raster::compose;
