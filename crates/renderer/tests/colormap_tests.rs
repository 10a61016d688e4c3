//! Tests for palette binning.

use calendar_grid::CalendarMatrix;
use climate_common::{Palette, Rgb};
use renderer::{ColorBinner, ValueDomain};

fn binner(colors: &[&str], min: f64, max: f64, continuity: f64) -> ColorBinner {
    let palette = Palette::from_strs(colors).unwrap();
    ColorBinner::new(palette, ValueDomain::new(min, max), continuity).unwrap()
}

// ============================================================================
// Domain
// ============================================================================

#[test]
fn test_domain_ignores_missing_cells() {
    let matrix = CalendarMatrix::from_rows(vec![
        vec![Some(3.0), None, Some(-1.5)],
        vec![None, Some(12.0), Some(0.0)],
    ])
    .unwrap();

    assert_eq!(ValueDomain::of(&matrix), Some(ValueDomain::new(-1.5, 12.0)));
}

#[test]
fn test_domain_of_all_missing_matrix() {
    let matrix = CalendarMatrix::from_rows(vec![vec![None, None]]).unwrap();
    assert_eq!(ValueDomain::of(&matrix), None);
}

// ============================================================================
// Blending
// ============================================================================

#[test]
fn test_linear_midpoint_of_single_bin() {
    let binner = binner(&["000000", "ffffff"], 0.0, 10.0, 1.0);
    assert_eq!(binner.bin_width(), 10.0);
    assert_eq!(binner.color_of(5.0), Rgb::new(127, 127, 127));
}

#[test]
fn test_zero_continuity_is_stepped() {
    let binner = binner(&["000000", "c86432", "ffffff"], 0.0, 10.0, 0.0);

    for value in [0.0, 1.0, 2.5, 4.99] {
        assert_eq!(binner.color_of(value), Rgb::BLACK, "value {value}");
    }
    for value in [5.0, 6.0, 7.9, 9.99] {
        assert_eq!(binner.color_of(value), Rgb::new(200, 100, 50), "value {value}");
    }
}

#[test]
fn test_bin_boundary_is_pure_lower_color() {
    let binner = binner(&["000000", "c86432", "ffffff"], 0.0, 10.0, 1.0);

    let location = binner.locate(5.0);
    assert_eq!(location.index, 1);
    assert_eq!(location.position, 0.0);
    assert_eq!(binner.color_of(5.0), Rgb::new(200, 100, 50));
}

#[test]
fn test_partial_continuity() {
    // 0.5 of the way across the bin, blended at 0.4 strength
    let binner = binner(&["000000", "ffffff"], 0.0, 10.0, 0.4);
    assert_eq!(binner.color_of(5.0), Rgb::new(51, 51, 51));
}

#[test]
fn test_descending_channels_truncate_toward_zero() {
    let binner = binner(&["ffffff", "000000"], 0.0, 10.0, 1.0);
    assert_eq!(binner.color_of(5.0), Rgb::new(127, 127, 127));
}

#[test]
fn test_channels_stay_between_bin_colors() {
    let binner = binner(&["d73027", "fee090", "4575b4"], -20.0, 40.0, 1.0);
    let palette = binner.palette().clone();

    for step in 0..=600 {
        let value = -20.0 + step as f64 / 10.0;
        let location = binner.locate(value);
        let color = binner.color_of(value);
        let lower = palette.get(location.index).unwrap();
        let upper = palette.get(location.index + 1).unwrap_or(Rgb::WHITE);
        for (c, (l, u)) in color
            .channels()
            .iter()
            .zip(lower.channels().iter().zip(upper.channels().iter()))
        {
            assert!(c >= l.min(u) && c <= l.max(u), "value {value}");
        }
    }
}

// ============================================================================
// Edges of the domain
// ============================================================================

#[test]
fn test_maximum_maps_to_last_color() {
    let binner = binner(&["000000", "c86432", "ffffff"], 0.0, 10.0, 1.0);
    let location = binner.locate(10.0);
    assert_eq!(location.index, 2);
    assert_eq!(binner.color_of(10.0), Rgb::WHITE);

    let binner = self::binner(&["000000", "c86432", "0000ff"], 0.0, 10.0, 1.0);
    assert_eq!(binner.color_of(10.0), Rgb::new(0, 0, 255));
}

#[test]
fn test_maximum_with_inexact_bin_width() {
    let binner = binner(&["010101", "020202", "030303", "040404"], 0.1, 0.7, 1.0);
    assert_eq!(binner.color_of(0.7), Rgb::new(4, 4, 4));
}

#[test]
fn test_outside_domain() {
    let binner = binner(&["102030", "405060"], 0.0, 10.0, 1.0);
    assert_eq!(binner.color_of(-5.0), Rgb::new(0x10, 0x20, 0x30));
    assert_eq!(binner.color_of(25.0), Rgb::WHITE);
}

#[test]
fn test_zero_width_domain_uses_first_color() {
    let binner = binner(&["102030", "405060", "708090"], 4.0, 4.0, 1.0);
    assert_eq!(binner.color_of(4.0), Rgb::new(0x10, 0x20, 0x30));
}

#[test]
fn test_missing_cells_use_missing_color() {
    let binner = binner(&["000000", "ffffff"], 0.0, 1.0, 1.0);
    assert_eq!(binner.color_for(None), Rgb::BLACK);

    let binner = binner.with_missing_color(Rgb::new(255, 0, 255));
    assert_eq!(binner.color_for(None), Rgb::new(255, 0, 255));
    assert_eq!(binner.color_for(Some(0.0)), Rgb::BLACK);
}
