//! Tests for missing-value repair.

use calendar_grid::{fill_nulls, CalendarMatrix, RepairReport};

fn matrix(rows: Vec<Vec<Option<f64>>>) -> CalendarMatrix {
    CalendarMatrix::from_rows(rows).unwrap()
}

fn column(values: &[Option<f64>]) -> CalendarMatrix {
    matrix(values.iter().map(|v| vec![*v]).collect())
}

#[test]
fn test_first_and_last_rows_copy_their_only_neighbor() {
    let input = matrix(vec![
        vec![Some(1.0), None, Some(3.0), Some(4.0)],
        vec![Some(5.0), Some(6.0), None, Some(8.0)],
    ]);

    let (repaired, report) = fill_nulls(&input);

    assert_eq!(
        repaired.to_rows(),
        vec![
            vec![Some(1.0), Some(6.0), Some(3.0), Some(4.0)],
            vec![Some(5.0), Some(6.0), Some(3.0), Some(8.0)],
        ]
    );
    assert_eq!(report, RepairReport { repaired: 2, residual: 0 });
}

#[test]
fn test_interior_rows_average_above_and_below() {
    let (repaired, _) = fill_nulls(&column(&[Some(2.0), None, Some(7.0)]));
    assert_eq!(repaired.get(1, 0), Some(4.5));
}

#[test]
fn test_interior_row_with_one_neighbor_uses_it() {
    let (repaired, _) = fill_nulls(&column(&[Some(1.0), None, None, Some(4.0)]));
    assert_eq!(repaired.get(1, 0), Some(1.0));
    assert_eq!(repaired.get(2, 0), Some(4.0));
}

#[test]
fn test_long_gap_leaves_residual_missing() {
    let input = column(&[Some(1.0), None, None, None, Some(5.0)]);

    let (repaired, report) = fill_nulls(&input);

    assert_eq!(
        repaired.to_rows(),
        vec![
            vec![Some(1.0)],
            vec![Some(1.0)],
            vec![None],
            vec![Some(5.0)],
            vec![Some(5.0)],
        ]
    );
    assert_eq!(report, RepairReport { repaired: 2, residual: 1 });
}

#[test]
fn test_repairs_do_not_cascade_within_a_pass() {
    // Row 1 could be filled from row 0's repaired value if the pass wrote
    // in place; it must not be.
    let input = column(&[None, None, Some(3.0)]);

    let (repaired, _) = fill_nulls(&input);

    assert_eq!(repaired.get(0, 0), None);
    assert_eq!(repaired.get(1, 0), Some(3.0));
}

#[test]
fn test_zero_is_not_repaired() {
    let input = column(&[Some(0.0), Some(0.0), Some(9.0)]);
    let (repaired, report) = fill_nulls(&input);
    assert_eq!(repaired, input);
    assert_eq!(report.repaired, 0);
}

#[test]
fn test_input_is_untouched() {
    let input = column(&[Some(1.0), None, Some(3.0)]);
    let copy = input.clone();
    let _ = fill_nulls(&input);
    assert_eq!(input, copy);
}

#[test]
fn test_every_remaining_gap_had_missing_neighbors() {
    let input = matrix(vec![
        vec![None, Some(1.0), None, None],
        vec![None, None, Some(2.0), None],
        vec![Some(3.0), None, None, None],
        vec![None, Some(4.0), None, Some(5.0)],
    ]);

    let (repaired, _) = fill_nulls(&input);

    for row in 0..input.height() {
        for col in 0..input.width() {
            if repaired.get(row, col).is_some() {
                continue;
            }
            let above = row.checked_sub(1).and_then(|r| input.get(r, col));
            let below = (row + 1 < input.height())
                .then(|| input.get(row + 1, col))
                .flatten();
            assert!(above.is_none() && below.is_none(), "cell ({row}, {col})");
        }
    }
}
