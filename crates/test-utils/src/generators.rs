//! Test data generators for creating synthetic station data.
//!
//! These generators create predictable, verifiable test data patterns
//! that can be used across the test suite.

/// Number of day slots in a daily calendar row.
pub const DAYS: usize = 366;

/// Creates `height` rows of `width` cells all holding `value`.
///
/// # Example
///
/// ```
/// use test_utils::constant_rows;
///
/// let rows = constant_rows(2, 3, 7.0);
/// assert_eq!(rows, vec![vec![Some(7.0); 3]; 2]);
/// ```
pub fn constant_rows(height: usize, width: usize, value: f64) -> Vec<Vec<Option<f64>>> {
    vec![vec![Some(value); width]; height]
}

/// Creates rows where every cell holds its row index.
///
/// Useful for checking year-axis behavior: any vertical mean is easy to
/// work out by hand.
pub fn row_index_rows(height: usize, width: usize) -> Vec<Vec<Option<f64>>> {
    (0..height)
        .map(|row| vec![Some(row as f64); width])
        .collect()
}

/// Creates rows where every cell holds its column index.
pub fn column_index_rows(height: usize, width: usize) -> Vec<Vec<Option<f64>>> {
    (0..height)
        .map(|_| (0..width).map(|col| Some(col as f64)).collect())
        .collect()
}

/// Creates one daily calendar row with a sinusoidal seasonal cycle.
///
/// Non-leap years leave slot 366 missing, like real station data laid out by
/// day-of-year ordinal.
///
/// # Arguments
///
/// * `mean` - Annual mean value
/// * `amplitude` - Half the seasonal swing
/// * `leap` - Whether day 366 exists
pub fn seasonal_year(mean: f64, amplitude: f64, leap: bool) -> Vec<Option<f64>> {
    let days_in_year = if leap { 366 } else { 365 };
    (0..DAYS)
        .map(|day| {
            if day >= days_in_year {
                return None;
            }
            // Coldest around mid January, warmest around mid July
            let phase = (day as f64 - 15.0) / days_in_year as f64 * std::f64::consts::TAU;
            Some(mean - amplitude * phase.cos())
        })
        .collect()
}

/// Calendar leap-year rule.
pub fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

/// Renders station observations as the CSV export read by the station parser.
///
/// The output has the two header rows of the export, then one row per
/// `(year, day_of_year, value)`: `station,day,month_day,element,year,value`.
/// `None` values are written as `.`, the export's missing-value token.
pub fn station_csv(station: &str, rows: &[(i32, usize, Option<f64>)]) -> String {
    let mut out = String::from("station,day,date,element,year,value\n");
    out.push_str(",,,,,degF\n");
    for (year, day, value) in rows {
        let token = match value {
            Some(v) => format!("{}", v),
            None => ".".to_string(),
        };
        out.push_str(&format!("{},{},{}-{},TMAX,{},{}\n", station, day, year, day, year, token));
    }
    out
}

/// Formats one USHCN daily fixed-width line.
///
/// `values` holds up to 31 daily values; `None` and absent trailing days are
/// written as `-9999`. Flags are left blank except for days listed in
/// `qflagged`, which get quality flag `X`.
pub fn ushcn_line(
    station: &str,
    year: i32,
    month: u32,
    element: &str,
    values: &[Option<i32>],
    qflagged: &[usize],
) -> String {
    let mut line = format!("{:<6}{:04}{:02}{:<4}", station, year, month, element);
    for day in 0..31 {
        let value = values.get(day).copied().flatten().unwrap_or(-9999);
        let qflag = if qflagged.contains(&(day + 1)) { 'X' } else { ' ' };
        line.push_str(&format!("{:>5} {}{}", value, qflag, '0'));
    }
    line
}
