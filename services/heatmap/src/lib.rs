//! Climate-station heatmap service library.
//!
//! This module exposes the internal modules for testing purposes.

pub mod config;
pub mod render;

pub use config::{HeatmapConfig, InputConfig, InputFormat, LoggingConfig};
pub use render::{render_file, render_observations, write_heatmap, Heatmap};
