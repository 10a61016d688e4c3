//! Value → color mapping over a palette.
//!
//! The observed value domain is split into `palette.len() - 1` equal bins.
//! Bin `k` spans `[min + k * width, min + (k + 1) * width)` and blends from
//! `palette[k]` toward `palette[k + 1]`. The continuity factor scales that
//! blend: `0.0` gives flat steps, `1.0` a fully linear ramp.

use calendar_grid::{CalendarMatrix, Cell};
use climate_common::{ClimateError, ClimateResult, Palette, Rgb};

/// Observed value range of a matrix, computed once before coloring.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValueDomain {
    pub min: f64,
    pub max: f64,
}

impl ValueDomain {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Domain of the present cells, `None` when every cell is missing.
    pub fn of(matrix: &CalendarMatrix) -> Option<Self> {
        matrix
            .value_range()
            .map(|(min, max)| Self::new(min, max))
    }

    pub fn span(&self) -> f64 {
        self.max - self.min
    }
}

/// Bin a value falls into and how far across the bin it sits.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BinLocation {
    pub index: usize,
    /// Fraction of the bin width, in `[0, 1)`
    pub position: f64,
}

/// Maps cell values to palette colors.
#[derive(Debug, Clone)]
pub struct ColorBinner {
    palette: Palette,
    domain: ValueDomain,
    continuity: f64,
    missing_color: Rgb,
}

impl ColorBinner {
    pub fn new(palette: Palette, domain: ValueDomain, continuity: f64) -> ClimateResult<Self> {
        if palette.len() < 2 {
            return Err(ClimateError::InvalidPalette(format!(
                "need at least 2 colors, got {}",
                palette.len()
            )));
        }
        if !(0.0..=1.0).contains(&continuity) {
            return Err(ClimateError::invalid_option(
                "continuity",
                format!("{continuity} is outside 0..=1"),
            ));
        }
        Ok(Self {
            palette,
            domain,
            continuity,
            missing_color: Rgb::BLACK,
        })
    }

    /// Color drawn for cells that are still missing.
    pub fn with_missing_color(mut self, color: Rgb) -> Self {
        self.missing_color = color;
        self
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn domain(&self) -> ValueDomain {
        self.domain
    }

    pub fn missing_color(&self) -> Rgb {
        self.missing_color
    }

    pub fn bin_width(&self) -> f64 {
        self.domain.span() / self.palette.bin_count() as f64
    }

    /// Locate `value` among the bins.
    ///
    /// Values below the domain land at the start of bin 0. The domain
    /// maximum lands exactly on the last palette color (index
    /// `palette.len() - 1`, position 0) regardless of how the division
    /// rounds. Values above the domain run off the end of the palette.
    pub fn locate(&self, value: f64) -> BinLocation {
        let width = self.bin_width();
        if width <= 0.0 || value <= self.domain.min {
            return BinLocation {
                index: 0,
                position: 0.0,
            };
        }

        if value == self.domain.max {
            return BinLocation {
                index: self.palette.bin_count(),
                position: 0.0,
            };
        }

        let scaled = (value - self.domain.min) / width;
        let index = scaled.floor();
        BinLocation {
            index: index as usize,
            position: scaled - index,
        }
    }

    /// Color of a present value.
    pub fn color_of(&self, value: f64) -> Rgb {
        let BinLocation { index, position } = self.locate(value);
        let Some(lower) = self.palette.get(index) else {
            return Rgb::WHITE;
        };
        let upper = self.palette.get(index + 1).unwrap_or(Rgb::WHITE);

        let t = position * self.continuity;
        Rgb::new(
            blend(lower.r, upper.r, t),
            blend(lower.g, upper.g, t),
            blend(lower.b, upper.b, t),
        )
    }

    /// Color of a matrix cell; missing cells get the missing color.
    pub fn color_for(&self, cell: Cell) -> Rgb {
        match cell {
            Some(value) => self.color_of(value),
            None => self.missing_color,
        }
    }
}

/// Move `t` of the way from `lower` to `upper`, truncating toward zero.
fn blend(lower: u8, upper: u8, t: f64) -> u8 {
    let lower = lower as f64;
    (lower + t * (upper as f64 - lower)) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    fn black_white(continuity: f64) -> ColorBinner {
        let palette = Palette::new(vec![Rgb::BLACK, Rgb::WHITE]).unwrap();
        ColorBinner::new(palette, ValueDomain::new(0.0, 10.0), continuity).unwrap()
    }

    #[test]
    fn test_blend_truncates() {
        assert_eq!(blend(0, 255, 0.5), 127);
        assert_eq!(blend(255, 0, 0.5), 127);
        assert_eq!(blend(10, 10, 0.9), 10);
    }

    #[test]
    fn test_rejects_bad_continuity() {
        let palette = Palette::new(vec![Rgb::BLACK, Rgb::WHITE]).unwrap();
        assert!(ColorBinner::new(palette.clone(), ValueDomain::new(0.0, 1.0), -0.1).is_err());
        assert!(ColorBinner::new(palette, ValueDomain::new(0.0, 1.0), 1.1).is_err());
    }

    #[test]
    fn test_locate_midpoint() {
        let location = black_white(1.0).locate(5.0);
        assert_eq!(location.index, 0);
        assert_eq!(location.position, 0.5);
    }

    #[test]
    fn test_missing_cell_color() {
        let binner = black_white(1.0).with_missing_color(Rgb::new(1, 2, 3));
        assert_eq!(binner.color_for(None), Rgb::new(1, 2, 3));
    }
}
