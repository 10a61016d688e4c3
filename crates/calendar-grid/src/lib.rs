//! Calendar matrix processing for station observations.
//!
//! Stages, in pipeline order:
//! - [`builder`]: observations → year × period matrix, optional re-centering
//! - [`repair`]: fill missing cells from the neighboring years
//! - [`smooth`]: 5-wide moving averages along the day and year axes
//! - [`pipeline`]: runs the stages a set of options asks for
//!
//! Every stage reads its input matrix and returns a new one; nothing is
//! mutated while it is still being read.

pub mod builder;
pub mod matrix;
pub mod pipeline;
pub mod repair;
pub mod smooth;

pub use builder::{build_matrix, shift, BuildReport};
pub use matrix::{CalendarMatrix, Cell, Period};
pub use pipeline::{transform, GridTransform};
pub use repair::{fill_nulls, RepairReport};
pub use smooth::{smooth, smooth_horizontal, smooth_vertical};
