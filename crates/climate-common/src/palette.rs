//! Palette table for color binning.
//!
//! Palettes are loaded from a colorbrewer-style JSON document:
//!
//! ```json
//! {
//!   "RdYlBu": {
//!     "3": ["#fc8d59", "#ffffbf", "#91bfdb"],
//!     "4": ["d7191c", "fdae61", "abd9e9", "2c7bb6"],
//!     "type": "div"
//!   }
//! }
//! ```
//!
//! Keys that are not bin counts (like `"type"`) are ignored. Colors are parsed
//! once at load time, so a table that loads successfully never fails later on
//! a bad color.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ClimateError, ClimateResult};

/// An RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#rrggbb`, `rrggbb` or `rgb(r, g, b)`.
    pub fn parse(s: &str) -> ClimateResult<Self> {
        let trimmed = s.trim();
        let parsed = if let Some(inner) = trimmed
            .strip_prefix("rgb(")
            .and_then(|rest| rest.strip_suffix(')'))
        {
            parse_rgb_function(inner)
        } else {
            hex_to_rgb(trimmed).map(|(r, g, b)| Rgb::new(r, g, b))
        };
        parsed.ok_or_else(|| ClimateError::InvalidColor(s.to_string()))
    }

    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    pub fn channels(&self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl TryFrom<String> for Rgb {
    type Error = ClimateError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Rgb::parse(&value)
    }
}

impl From<Rgb> for String {
    fn from(color: Rgb) -> Self {
        color.to_hex()
    }
}

/// Parse hex color string to RGB
pub fn hex_to_rgb(hex: &str) -> Option<(u8, u8, u8)> {
    let hex = hex.trim_start_matches('#');
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }

    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;

    Some((r, g, b))
}

fn parse_rgb_function(inner: &str) -> Option<Rgb> {
    let mut channels = inner.split(',').map(|c| c.trim().parse::<u8>());
    let r = channels.next()?.ok()?;
    let g = channels.next()?.ok()?;
    let b = channels.next()?.ok()?;
    if channels.next().is_some() {
        return None;
    }
    Some(Rgb::new(r, g, b))
}

/// An ordered list of colors. `n` colors bound `n - 1` bins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    colors: Vec<Rgb>,
}

impl Palette {
    /// Create a palette; at least two colors are needed to bound a bin.
    pub fn new(colors: Vec<Rgb>) -> ClimateResult<Self> {
        if colors.len() < 2 {
            return Err(ClimateError::InvalidPalette(format!(
                "need at least 2 colors, got {}",
                colors.len()
            )));
        }
        Ok(Self { colors })
    }

    /// Build a palette from color strings.
    pub fn from_strs<S: AsRef<str>>(colors: &[S]) -> ClimateResult<Self> {
        let parsed = colors
            .iter()
            .map(|c| Rgb::parse(c.as_ref()))
            .collect::<ClimateResult<Vec<_>>>()?;
        Self::new(parsed)
    }

    pub fn colors(&self) -> &[Rgb] {
        &self.colors
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Number of bins spanned by this palette.
    pub fn bin_count(&self) -> usize {
        self.colors.len() - 1
    }

    pub fn get(&self, idx: usize) -> Option<Rgb> {
        self.colors.get(idx).copied()
    }

    pub fn reversed(&self) -> Self {
        let mut colors = self.colors.clone();
        colors.reverse();
        Self { colors }
    }
}

/// Palette variants keyed by color count, as they appear in the JSON file.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawVariant {
    Colors(Vec<String>),
    Other(serde_json::Value),
}

/// Named palettes, each available in one or more color counts.
///
/// Loaded once at startup and passed by reference into the renderer.
#[derive(Debug, Clone, Default)]
pub struct PaletteTable {
    palettes: BTreeMap<String, BTreeMap<usize, Palette>>,
}

impl PaletteTable {
    /// Load palette table from JSON string
    pub fn from_json(json: &str) -> ClimateResult<Self> {
        let raw: HashMap<String, HashMap<String, RawVariant>> = serde_json::from_str(json)?;

        let mut palettes = BTreeMap::new();
        for (name, variants) in raw {
            let mut by_count = BTreeMap::new();
            for (key, variant) in variants {
                let (Ok(count), RawVariant::Colors(colors)) = (key.parse::<usize>(), variant)
                else {
                    continue;
                };
                let palette = Palette::from_strs(&colors).map_err(|e| {
                    ClimateError::InvalidPalette(format!("{name}[{count}]: {e}"))
                })?;
                by_count.insert(count, palette);
            }
            if !by_count.is_empty() {
                palettes.insert(name, by_count);
            }
        }

        if palettes.is_empty() {
            return Err(ClimateError::InvalidPalette(
                "palette table defines no palettes".to_string(),
            ));
        }

        debug!(palettes = palettes.len(), "Loaded palette table");
        Ok(Self { palettes })
    }

    /// Load palette table from file
    pub fn from_file(path: impl AsRef<Path>) -> ClimateResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Build a table holding a single palette, mostly for tests.
    pub fn single(name: impl Into<String>, palette: Palette) -> Self {
        let mut by_count = BTreeMap::new();
        by_count.insert(palette.len(), palette);
        let mut palettes = BTreeMap::new();
        palettes.insert(name.into(), by_count);
        Self { palettes }
    }

    /// Palette names in sorted order.
    pub fn names(&self) -> Vec<&str> {
        self.palettes.keys().map(String::as_str).collect()
    }

    /// Available color counts for a palette.
    pub fn counts(&self, name: &str) -> Option<Vec<usize>> {
        self.palettes
            .get(name)
            .map(|variants| variants.keys().copied().collect())
    }

    /// Look up a palette with `bins` colors.
    ///
    /// Not every palette comes in every size; when the exact count is
    /// missing the next smaller variant is used.
    pub fn resolve(&self, name: &str, bins: usize) -> ClimateResult<Palette> {
        let variants = self
            .palettes
            .get(name)
            .ok_or_else(|| ClimateError::PaletteNotFound(name.to_string()))?;

        let (count, palette) = variants.range(..=bins).next_back().ok_or_else(|| {
            ClimateError::BinsNotAvailable {
                palette: name.to_string(),
                bins,
            }
        })?;

        if *count != bins {
            debug!(palette = name, requested = bins, used = count, "Palette size fallback");
        }
        Ok(palette.clone())
    }
}
