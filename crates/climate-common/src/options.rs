//! Per-request pipeline options.
//!
//! One `PipelineOptions` value describes a full render: which repair and
//! smoothing stages run, which palette is used and how each matrix cell is
//! drawn. Options can be read from YAML or JSON and every field has a
//! default, so partial documents are fine.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ClimateError, ClimateResult};
use crate::palette::Rgb;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineOptions {
    /// Replace missing cells from the neighboring years
    pub fill_null: bool,

    /// Smooth along the day axis
    pub smooth_horizontal: bool,

    /// Smooth along the year axis
    pub smooth_vertical: bool,

    /// Palette name in the palette table
    pub palette: String,

    /// Requested number of palette colors
    pub bins: usize,

    /// Pixel width of one matrix cell
    pub cell_width: u32,

    /// Pixel height of one matrix cell
    pub cell_height: u32,

    /// Interpolation strength between adjacent palette colors (0..=1)
    pub continuity: f64,

    /// Number of smoothing passes
    pub recursion: u32,

    /// Column that becomes column 0 after re-centering
    pub start_index: Option<usize>,

    /// Flip the palette so the first color maps to the highest values
    pub reverse_palette: bool,

    /// Color used for cells that are still missing at render time
    pub missing_color: Rgb,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            fill_null: true,
            smooth_horizontal: true,
            smooth_vertical: true,
            palette: "RdYlBu".to_string(),
            bins: 8,
            cell_width: 2,
            cell_height: 4,
            continuity: 0.4,
            recursion: 2,
            start_index: None,
            reverse_palette: true,
            missing_color: Rgb::BLACK,
        }
    }
}

impl PipelineOptions {
    /// Parse options from a YAML (or JSON) document.
    pub fn from_yaml(yaml: &str) -> ClimateResult<Self> {
        let options: Self = serde_yaml::from_str(yaml)?;
        options.validate()?;
        Ok(options)
    }

    /// Load options from a YAML or JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> ClimateResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Validate the options.
    pub fn validate(&self) -> ClimateResult<()> {
        if !(0.0..=1.0).contains(&self.continuity) {
            return Err(ClimateError::invalid_option(
                "continuity",
                format!("{} is outside 0..=1", self.continuity),
            ));
        }
        if self.cell_width == 0 {
            return Err(ClimateError::invalid_option("cell_width", "must be at least 1"));
        }
        if self.cell_height == 0 {
            return Err(ClimateError::invalid_option("cell_height", "must be at least 1"));
        }
        if self.bins < 2 {
            return Err(ClimateError::invalid_option(
                "bins",
                format!("{} colors cannot bound a bin", self.bins),
            ));
        }
        if self.palette.is_empty() {
            return Err(ClimateError::invalid_option("palette", "name is empty"));
        }
        Ok(())
    }

    /// Derive a descriptive file name for an image rendered from `source`.
    ///
    /// Format: `{source}-{palette}-{continuity}-{recursion}x{null}{x}-{y}.png`
    /// where the continuity has its decimal point replaced by `_`, `null`
    /// is `no_null` when nulls were filled, and `x`/`y` mark a disabled
    /// horizontal/vertical smoothing direction.
    pub fn image_name(&self, source: &str) -> String {
        let continuity = format!("{:?}", self.continuity).replace('.', "_");
        format!(
            "{}-{}-{}-{}x{}{}-{}.png",
            source,
            self.palette,
            continuity,
            self.recursion,
            if self.fill_null { "no_null" } else { "null" },
            if self.smooth_horizontal { "" } else { "x" },
            if self.smooth_vertical { "" } else { "y" },
        )
    }
}
