//! Tests for the delimited station export parser.

use station_parser::{parse_csv, CsvLayout, Observation};
use test_utils::station_csv;

// ============================================================================
// Happy path
// ============================================================================

#[test]
fn test_parse_station_export() {
    let content = station_csv(
        "BTV",
        &[(1950, 1, Some(21.0)), (1950, 2, Some(-3.5)), (1951, 1, Some(0.0))],
    );

    let parsed = parse_csv(&content, &CsvLayout::default()).unwrap();

    assert_eq!(
        parsed.records,
        vec![
            Observation::new("1950", 1, Some(21.0)),
            Observation::new("1950", 2, Some(-3.5)),
            Observation::new("1951", 1, Some(0.0)),
        ]
    );
    assert_eq!(parsed.skipped_rows, 0);
}

#[test]
fn test_zero_is_a_value_not_missing() {
    let content = station_csv("BTV", &[(1950, 1, Some(0.0))]);
    let parsed = parse_csv(&content, &CsvLayout::default()).unwrap();
    assert_eq!(parsed.records[0].value, Some(0.0));
    assert_eq!(parsed.missing_values(), 0);
}

// ============================================================================
// Data-quality handling
// ============================================================================

#[test]
fn test_unparseable_value_becomes_missing() {
    let content = station_csv("BTV", &[(1950, 1, None), (1950, 2, Some(4.0))]);

    let parsed = parse_csv(&content, &CsvLayout::default()).unwrap();

    assert_eq!(parsed.len(), 2);
    assert_eq!(parsed.records[0].value, None);
    assert_eq!(parsed.records[1].value, Some(4.0));
    assert_eq!(parsed.missing_values(), 1);
}

#[test]
fn test_rows_without_index_are_skipped() {
    let mut content = station_csv("BTV", &[(1950, 1, Some(1.0))]);
    content.push_str("BTV,x,1950-x,TMAX,1950,2\n");
    content.push_str("BTV,0,1950-0,TMAX,1950,3\n");
    content.push_str("BTV,5\n");

    let parsed = parse_csv(&content, &CsvLayout::default()).unwrap();

    assert_eq!(parsed.len(), 1);
    assert_eq!(parsed.skipped_rows, 3);
}

#[test]
fn test_large_index_is_kept_for_the_builder_to_drop() {
    // Range checks belong to the matrix builder, which knows the period
    let content = station_csv("BTV", &[(1950, 400, Some(1.0))]);
    let parsed = parse_csv(&content, &CsvLayout::default()).unwrap();
    assert_eq!(parsed.records[0].index, 400);
}

#[test]
fn test_only_headers() {
    let content = station_csv("BTV", &[]);
    let parsed = parse_csv(&content, &CsvLayout::default()).unwrap();
    assert!(parsed.is_empty());
    assert_eq!(parsed.skipped_rows, 0);
}

#[test]
fn test_fields_are_trimmed() {
    let content = "h\nh\nBTV, 3 ,x,TMAX, 1950 , 12.25 \n";
    let parsed = parse_csv(content, &CsvLayout::default()).unwrap();
    assert_eq!(parsed.records, vec![Observation::new("1950", 3, Some(12.25))]);
}
