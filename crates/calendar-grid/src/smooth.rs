//! Moving-average smoothing along the day axis and the year axis.
//!
//! Both directions average a 5-cell window centred on each cell. Every
//! pass reads its input matrix and writes a new one, so cells later in a
//! pass always see unsmoothed neighbors.
//!
//! Missing cells are excluded from the window and the mean is taken over
//! the values actually present. A missing cell stays missing: filling gaps
//! is the repair stage's job.

use tracing::debug;

use crate::matrix::{CalendarMatrix, Cell};

/// Half-width of the averaging window.
const REACH: isize = 2;

/// Smooth each row along the day axis.
///
/// The day axis runs on across year boundaries: the window of the first
/// days of a year reaches into the end of the previous year, and the window
/// of the last days reaches into the start of the next year. The previous
/// year's end is found by walking back from its last calendar day, so a
/// year without day 366 contributes December 31st and 30th. The first and
/// last rows have no such neighbor and their edge windows shrink to 3 or 4
/// cells.
pub fn smooth_horizontal(matrix: &CalendarMatrix) -> CalendarMatrix {
    matrix.rebuild_with(|row, col| {
        matrix.get(row, col)?;
        let window = (-REACH..=REACH)
            .filter_map(|offset| day_axis_cell(matrix, row, col as isize + offset));
        mean(window)
    })
}

/// Smooth each column along the year axis.
///
/// Years do not wrap: the window is clipped to the matrix, giving 3 cells
/// in the first and last rows, 4 in the rows next to them and 5 elsewhere.
pub fn smooth_vertical(matrix: &CalendarMatrix) -> CalendarMatrix {
    let last_row = matrix.height().saturating_sub(1);
    matrix.rebuild_with(|row, col| {
        matrix.get(row, col)?;
        let lo = row.saturating_sub(REACH as usize);
        let hi = (row + REACH as usize).min(last_row);
        mean((lo..=hi).filter_map(|r| matrix.get(r, col)))
    })
}

/// Run `passes` smoothing passes; each pass smooths vertically first, then
/// horizontally, skipping a direction that is disabled.
pub fn smooth(
    matrix: &CalendarMatrix,
    vertical: bool,
    horizontal: bool,
    passes: u32,
) -> CalendarMatrix {
    let mut current = matrix.clone();
    for pass in 0..passes {
        if vertical {
            current = smooth_vertical(&current);
        }
        if horizontal {
            current = smooth_horizontal(&current);
        }
        debug!(pass = pass + 1, vertical, horizontal, "Smoothing pass complete");
    }
    current
}

/// Cell at a day-axis position that may fall outside the row.
///
/// Negative columns count back from the end of the previous year, columns
/// past the end count forward from the start of the next year.
fn day_axis_cell(matrix: &CalendarMatrix, row: usize, col: isize) -> Cell {
    let width = matrix.width() as isize;

    if (0..width).contains(&col) {
        return matrix.get(row, col as usize);
    }

    if col < 0 {
        let prev = row.checked_sub(1)?;
        let steps_back = col.unsigned_abs();
        let day = matrix.calendar_columns(prev).rev().nth(steps_back - 1)?;
        matrix.get(prev, day)
    } else {
        let next = row + 1;
        if next >= matrix.height() {
            return None;
        }
        let steps_forward = (col - width) as usize;
        let day = matrix.calendar_columns(next).nth(steps_forward)?;
        matrix.get(next, day)
    }
}

fn mean(values: impl Iterator<Item = f64>) -> Cell {
    let (sum, count) = values.fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    (count > 0).then(|| sum / count as f64)
}
