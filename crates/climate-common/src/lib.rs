//! Common types and utilities shared across the station-heatmap crates.

pub mod error;
pub mod options;
pub mod palette;

pub use error::{ClimateError, ClimateResult};
pub use options::PipelineOptions;
pub use palette::{hex_to_rgb, Palette, PaletteTable, Rgb};
