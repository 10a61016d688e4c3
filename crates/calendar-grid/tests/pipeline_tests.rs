//! End-to-end matrix stage tests.

use calendar_grid::{build_matrix, fill_nulls, shift, smooth, transform, GridTransform, Period};
use climate_common::PipelineOptions;
use station_parser::Observation;

fn monthly_records() -> Vec<Observation> {
    let mut records = Vec::new();
    for (year, offset) in [("1950", 0.0), ("1951", 10.0), ("1952", 20.0)] {
        for month in 1..=12 {
            let value = (year != "1951" || month != 4).then_some(offset + month as f64);
            records.push(Observation::new(year, month, value));
        }
    }
    records
}

#[test]
fn test_transform_runs_stages_in_order() {
    let (matrix, _) = build_matrix(&monthly_records(), Period::Monthly).unwrap();
    let options = PipelineOptions {
        start_index: Some(3),
        ..Default::default()
    };

    let result = transform(matrix.clone(), &GridTransform::from(&options));

    let (expected, _) = fill_nulls(&shift(&matrix, 3));
    let expected = smooth(&expected, true, true, options.recursion);
    assert_eq!(result, expected);
}

#[test]
fn test_repair_only() {
    let (matrix, _) = build_matrix(&monthly_records(), Period::Monthly).unwrap();
    let stages = GridTransform {
        fill_null: true,
        ..Default::default()
    };

    let result = transform(matrix, &stages);

    // April 1951 sits between 4.0 and 24.0
    assert_eq!(result.get(1, 3), Some(14.0));
    assert_eq!(result.missing_count(), 0);
}

#[test]
fn test_without_repair_gap_survives_smoothing() {
    let (matrix, _) = build_matrix(&monthly_records(), Period::Monthly).unwrap();
    let stages = GridTransform {
        smooth_vertical: true,
        smooth_horizontal: true,
        passes: 2,
        ..Default::default()
    };

    let result = transform(matrix, &stages);

    assert_eq!(result.get(1, 3), None);
    assert_eq!(result.missing_count(), 1);
}
