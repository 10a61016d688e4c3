//! Year × period matrix of station values.

use climate_common::{ClimateError, ClimateResult};
use serde::{Deserialize, Serialize};

/// One matrix cell: a value, or `None` when nothing was observed.
///
/// Missing is its own state. It never stands in for `0.0` and is never
/// counted in a mean.
pub type Cell = Option<f64>;

/// Number of slots per year row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Period {
    /// 366 day-of-year slots; slot 366 only holds data in leap years
    #[default]
    Daily,
    /// 12 month slots
    Monthly,
}

impl Period {
    pub fn slots(&self) -> usize {
        match self {
            Period::Daily => 366,
            Period::Monthly => 12,
        }
    }

    /// Column of the day that only exists in leap years.
    pub fn leap_slot(&self) -> Option<usize> {
        match self {
            Period::Daily => Some(365),
            Period::Monthly => None,
        }
    }
}

/// Row-major grid: one row per year, `width` cells per row.
///
/// Rows keep the order in which their years were first seen. All rows have
/// the same width.
#[derive(Debug, Clone, PartialEq)]
pub struct CalendarMatrix {
    years: Vec<String>,
    width: usize,
    cells: Vec<Cell>,
    /// Column holding day 366, if this matrix has one
    leap_slot: Option<usize>,
}

impl CalendarMatrix {
    /// Create a matrix with every cell missing.
    pub fn missing(years: Vec<String>, width: usize, leap_slot: Option<usize>) -> Self {
        let cells = vec![None; years.len() * width];
        Self {
            years,
            width,
            cells,
            leap_slot: leap_slot.filter(|slot| *slot < width),
        }
    }

    /// Create a matrix from explicit rows. Rows are labelled by position.
    pub fn from_rows(rows: Vec<Vec<Cell>>) -> ClimateResult<Self> {
        let width = rows.first().map(Vec::len).unwrap_or(0);
        if width == 0 {
            return Err(ClimateError::EmptyInput);
        }

        let mut cells = Vec::with_capacity(rows.len() * width);
        for (row, values) in rows.iter().enumerate() {
            if values.len() != width {
                return Err(ClimateError::RaggedMatrix {
                    row,
                    expected: width,
                    found: values.len(),
                });
            }
            cells.extend_from_slice(values);
        }

        Ok(Self {
            years: (0..rows.len()).map(|i| i.to_string()).collect(),
            width,
            cells,
            leap_slot: None,
        })
    }

    /// Replace the row labels.
    pub fn with_years(mut self, years: Vec<String>) -> ClimateResult<Self> {
        if years.len() != self.height() {
            return Err(ClimateError::Parse(format!(
                "{} year labels for {} rows",
                years.len(),
                self.height()
            )));
        }
        self.years = years;
        Ok(self)
    }

    /// Mark which column holds day 366.
    pub fn with_leap_slot(mut self, leap_slot: Option<usize>) -> Self {
        self.leap_slot = leap_slot.filter(|slot| *slot < self.width);
        self
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.years.len()
    }

    pub fn years(&self) -> &[String] {
        &self.years
    }

    pub fn leap_slot(&self) -> Option<usize> {
        self.leap_slot
    }

    /// Cell at (`row`, `col`). Panics when out of bounds, like slice indexing.
    pub fn get(&self, row: usize, col: usize) -> Cell {
        assert!(col < self.width, "column {col} out of bounds");
        self.cells[row * self.width + col]
    }

    pub fn set(&mut self, row: usize, col: usize, cell: Cell) {
        assert!(col < self.width, "column {col} out of bounds");
        self.cells[row * self.width + col] = cell;
    }

    pub fn row(&self, row: usize) -> &[Cell] {
        &self.cells[row * self.width..(row + 1) * self.width]
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells.chunks_exact(self.width)
    }

    pub fn to_rows(&self) -> Vec<Vec<Cell>> {
        self.rows().map(<[Cell]>::to_vec).collect()
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn missing_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_none()).count()
    }

    /// Present values in row-major order.
    pub fn present_values(&self) -> impl Iterator<Item = f64> + '_ {
        self.cells.iter().filter_map(|c| *c)
    }

    /// Smallest and largest present value, `None` if every cell is missing.
    pub fn value_range(&self) -> Option<(f64, f64)> {
        self.present_values().fold(None, |range, v| match range {
            None => Some((v, v)),
            Some((min, max)) => Some((min.min(v), max.max(v))),
        })
    }

    /// Whether `row` has a value on day 366.
    ///
    /// Leap years are inferred from the data: a year whose leap slot is
    /// empty is treated as a 365-day year. Matrices without a leap slot
    /// report `false`.
    pub fn is_leap_row(&self, row: usize) -> bool {
        self.leap_slot
            .map_or(false, |slot| self.get(row, slot).is_some())
    }

    /// Columns of `row` that are real calendar days, in order.
    ///
    /// The leap slot is left out of non-leap rows, so walking backwards from
    /// the end of a 365-day year starts at December 31st.
    pub fn calendar_columns(&self, row: usize) -> impl DoubleEndedIterator<Item = usize> {
        let skip = self.leap_slot.filter(|_| !self.is_leap_row(row));
        (0..self.width).filter(move |col| Some(*col) != skip)
    }

    /// Build a new matrix of the same shape from a per-cell function.
    ///
    /// Each stage computes its output this way: the result is a fresh
    /// allocation and `f` can read `self` freely without seeing partially
    /// written output.
    pub fn rebuild_with<F>(&self, mut f: F) -> CalendarMatrix
    where
        F: FnMut(usize, usize) -> Cell,
    {
        let mut cells = Vec::with_capacity(self.cells.len());
        for row in 0..self.height() {
            for col in 0..self.width {
                cells.push(f(row, col));
            }
        }
        CalendarMatrix {
            years: self.years.clone(),
            width: self.width,
            cells,
            leap_slot: self.leap_slot,
        }
    }

    /// Move every row's cells left by `shift` columns, wrapping around.
    pub(crate) fn rotate_rows_left(&self, shift: usize) -> CalendarMatrix {
        let shift = shift % self.width;
        let mut rotated = self.clone();
        for row in rotated.cells.chunks_exact_mut(self.width) {
            row.rotate_left(shift);
        }
        rotated.leap_slot = self
            .leap_slot
            .map(|slot| (slot + self.width - shift) % self.width);
        rotated
    }
}
