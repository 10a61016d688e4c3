//! Missing-value repair from neighboring years.

use tracing::{debug, warn};

use crate::matrix::{CalendarMatrix, Cell};

/// Outcome of a repair pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RepairReport {
    /// Cells that were missing and now hold a value
    pub repaired: usize,
    /// Cells still missing afterwards
    pub residual: usize,
}

/// Replace missing cells with the same column of the adjacent years.
///
/// - first row: the value below
/// - last row: the value above
/// - other rows: the mean of above and below, or whichever of the two is
///   present
///
/// Neighbors are read from the input only, so a repaired value never feeds
/// another repair in the same pass. A cell whose neighbors are missing as
/// well (a gap of two or more years) stays missing; that residual is
/// reported, not treated as an error.
pub fn fill_nulls(matrix: &CalendarMatrix) -> (CalendarMatrix, RepairReport) {
    let before = matrix.missing_count();

    let repaired = matrix.rebuild_with(|row, col| match matrix.get(row, col) {
        Some(value) => Some(value),
        None => vertical_neighbors(matrix, row, col),
    });

    let residual = repaired.missing_count();
    let report = RepairReport {
        repaired: before - residual,
        residual,
    };

    if residual > 0 {
        warn!(
            residual,
            "Missing cells left after repair; neighboring years are missing too"
        );
    }
    debug!(repaired = report.repaired, "Filled missing cells");

    (repaired, report)
}

fn vertical_neighbors(matrix: &CalendarMatrix, row: usize, col: usize) -> Cell {
    let above = row.checked_sub(1).and_then(|r| matrix.get(r, col));
    let below = if row + 1 < matrix.height() {
        matrix.get(row + 1, col)
    } else {
        None
    };

    match (above, below) {
        (Some(a), Some(b)) => Some((a + b) / 2.0),
        (Some(v), None) | (None, Some(v)) => Some(v),
        (None, None) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_row_cannot_be_repaired() {
        let matrix = CalendarMatrix::from_rows(vec![vec![Some(1.0), None]]).unwrap();
        let (repaired, report) = fill_nulls(&matrix);
        assert_eq!(repaired, matrix);
        assert_eq!(report, RepairReport { repaired: 0, residual: 1 });
    }
}
