//! Observation stream → calendar matrix.

use std::collections::HashSet;

use climate_common::{ClimateError, ClimateResult};
use station_parser::Observation;
use tracing::{debug, warn};

use crate::matrix::{CalendarMatrix, Period};

/// What happened to the observations while building a matrix.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildReport {
    pub records: usize,
    pub written: usize,
    /// Index outside `1..=width`
    pub dropped_out_of_range: usize,
    /// Year reappeared after its rows were already closed
    pub dropped_out_of_order: usize,
    /// Written records whose value was missing
    pub missing_values: usize,
}

/// Build a year × period matrix from observations sorted by year.
///
/// Rows follow the order in which years first appear. The row of each
/// record comes from a running year-change detector, so the input must be
/// grouped by year; records of a year that shows up again after another
/// year started are dropped and counted. Records whose index does not fit
/// the period are dropped as well. Cells nobody wrote stay missing.
pub fn build_matrix(
    records: &[Observation],
    period: Period,
) -> ClimateResult<(CalendarMatrix, BuildReport)> {
    let first = records.first().ok_or(ClimateError::EmptyInput)?;

    let mut seen = HashSet::new();
    let years: Vec<String> = records
        .iter()
        .filter(|r| seen.insert(r.year.as_str()))
        .map(|r| r.year.clone())
        .collect();

    let width = period.slots();
    let mut matrix = CalendarMatrix::missing(years, width, period.leap_slot());
    let mut report = BuildReport {
        records: records.len(),
        ..Default::default()
    };

    let mut current_year = first.year.as_str();
    let mut closed: HashSet<&str> = HashSet::new();
    let mut row = 0;
    let mut skipping = false;

    for record in records {
        if record.year != current_year {
            closed.insert(current_year);
            current_year = record.year.as_str();
            skipping = closed.contains(current_year);
            if !skipping {
                row += 1;
            }
        }

        if skipping {
            report.dropped_out_of_order += 1;
            continue;
        }
        if record.index == 0 || record.index > width {
            report.dropped_out_of_range += 1;
            continue;
        }

        matrix.set(row, record.index - 1, record.value);
        report.written += 1;
        if record.value.is_none() {
            report.missing_values += 1;
        }
    }

    if report.dropped_out_of_order > 0 {
        warn!(
            dropped = report.dropped_out_of_order,
            "Input is not grouped by year; dropped records of reopened years"
        );
    }
    debug!(
        years = matrix.height(),
        width,
        written = report.written,
        out_of_range = report.dropped_out_of_range,
        missing = matrix.missing_count(),
        "Built calendar matrix"
    );

    Ok((matrix, report))
}

/// Re-center every row so that column `start_index` becomes column 0.
///
/// Rows are rotated, not truncated: the columns before `start_index` wrap
/// around to the end of the same row. `start_index` is taken modulo the
/// row width.
pub fn shift(matrix: &CalendarMatrix, start_index: usize) -> CalendarMatrix {
    if start_index % matrix.width() == 0 {
        return matrix.clone();
    }
    debug!(start_index, "Shifting calendar matrix");
    matrix.rotate_rows_left(start_index)
}
