//! USHCN daily fixed-width format.
//!
//! Each line holds one station, one month and one element:
//!
//! | columns  | content                                     |
//! |----------|---------------------------------------------|
//! | 0..6     | COOP station id                             |
//! | 6..10    | year                                        |
//! | 10..12   | month                                       |
//! | 12..16   | element (TMAX, TMIN, PRCP, SNOW, SNWD)      |
//! | 16..264  | 31 groups of 8: value(5) mflag qflag sflag  |
//!
//! `-9999` marks a missing value. Days that do not exist in the month
//! (Feb 30, Apr 31, ...) carry `-9999` too and are dropped.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ParserError;
use crate::record::{Observation, ParsedRecords};

const HEADER_WIDTH: usize = 16;
const CHARS_PER_DAY: usize = 8;
const MISSING: i32 = -9999;

/// Observed element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Element {
    Prcp,
    Snow,
    Snwd,
    Tmax,
    Tmin,
}

impl Element {
    pub fn code(&self) -> &'static str {
        match self {
            Element::Prcp => "PRCP",
            Element::Snow => "SNOW",
            Element::Snwd => "SNWD",
            Element::Tmax => "TMAX",
            Element::Tmin => "TMIN",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Element::Prcp => "precipitation (hundredths of inches)",
            Element::Snow => "snowfall (tenths of inches)",
            Element::Snwd => "snow depth (inches)",
            Element::Tmax => "maximum temperature (degrees F)",
            Element::Tmin => "minimum temperature (degrees F)",
        }
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Element {
    type Err = ParserError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "PRCP" => Ok(Element::Prcp),
            "SNOW" => Ok(Element::Snow),
            "SNWD" => Ok(Element::Snwd),
            "TMAX" => Ok(Element::Tmax),
            "TMIN" => Ok(Element::Tmin),
            other => Err(ParserError::UnknownElement(other.to_string())),
        }
    }
}

/// Index granularity of the produced observations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Granularity {
    /// One observation per day, indexed by day-of-year ordinal (1..=366)
    #[default]
    Daily,
    /// One observation per month (1..=12): the mean of the present days
    Monthly,
}

/// Selects which lines of a USHCN file become observations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UshcnFilter {
    /// Station id to keep; `None` keeps every station
    pub station: Option<String>,
    pub element: Element,
    /// Treat values that failed a quality check as missing
    pub reject_flagged: bool,
    pub granularity: Granularity,
}

impl UshcnFilter {
    pub fn new(element: Element) -> Self {
        Self {
            station: None,
            element,
            reject_flagged: true,
            granularity: Granularity::Daily,
        }
    }

    pub fn station(mut self, station: impl Into<String>) -> Self {
        self.station = Some(station.into());
        self
    }

    pub fn granularity(mut self, granularity: Granularity) -> Self {
        self.granularity = granularity;
        self
    }

    pub fn reject_flagged(mut self, reject: bool) -> Self {
        self.reject_flagged = reject;
        self
    }

    fn matches(&self, station: &str, element: &str) -> bool {
        element == self.element.code()
            && self.station.as_deref().map_or(true, |wanted| wanted == station)
    }
}

/// Header fields of one line.
struct LineHeader<'a> {
    station: &'a str,
    year: i32,
    month: u32,
    element: &'a str,
}

fn parse_header(line: &str) -> Option<LineHeader<'_>> {
    Some(LineHeader {
        station: line.get(0..6)?.trim(),
        year: line.get(6..10)?.trim().parse().ok()?,
        month: line.get(10..12)?.trim().parse().ok()?,
        element: line.get(12..16)?.trim(),
    })
}

/// Value of one day group, `None` when missing or rejected.
fn day_value(line: &str, day: u32, reject_flagged: bool) -> Option<f64> {
    let start = HEADER_WIDTH + (day as usize - 1) * CHARS_PER_DAY;
    let value: i32 = line.get(start..start + 5)?.trim().parse().ok()?;
    if value == MISSING {
        return None;
    }
    if reject_flagged {
        let qflag = line.get(start + 6..start + 7).unwrap_or(" ");
        if !qflag.trim().is_empty() {
            return None;
        }
    }
    Some(value as f64)
}

/// Parse USHCN daily lines for one element (and optionally one station).
pub fn parse_ushcn_daily(content: &str, filter: &UshcnFilter) -> ParsedRecords {
    let mut parsed = ParsedRecords::default();

    for line in content.lines() {
        if line.trim().is_empty() {
            continue;
        }
        let Some(header) = parse_header(line) else {
            parsed.skipped_rows += 1;
            continue;
        };
        if !filter.matches(header.station, header.element) {
            continue;
        }
        if NaiveDate::from_ymd_opt(header.year, header.month, 1).is_none() {
            parsed.skipped_rows += 1;
            continue;
        }

        let year_key = header.year.to_string();
        let days = (1..=31u32).filter_map(|day| {
            NaiveDate::from_ymd_opt(header.year, header.month, day)
                .map(|date| (date, day_value(line, day, filter.reject_flagged)))
        });

        match filter.granularity {
            Granularity::Daily => {
                for (date, value) in days {
                    parsed.records.push(Observation::new(
                        year_key.clone(),
                        date.ordinal() as usize,
                        value,
                    ));
                }
            }
            Granularity::Monthly => {
                let present: Vec<f64> = days.filter_map(|(_, value)| value).collect();
                let mean = if present.is_empty() {
                    None
                } else {
                    Some(present.iter().sum::<f64>() / present.len() as f64)
                };
                parsed.records.push(Observation::new(
                    year_key,
                    header.month as usize,
                    mean,
                ));
            }
        }
    }

    debug!(
        element = %filter.element,
        station = filter.station.as_deref().unwrap_or("*"),
        records = parsed.records.len(),
        skipped = parsed.skipped_rows,
        "Parsed USHCN daily lines"
    );
    parsed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_element_from_str() {
        assert_eq!("tmax".parse::<Element>().unwrap(), Element::Tmax);
        assert_eq!(" PRCP ".parse::<Element>().unwrap(), Element::Prcp);
        assert!(matches!(
            "WIND".parse::<Element>(),
            Err(ParserError::UnknownElement(_))
        ));
    }

    #[test]
    fn test_short_line_is_skipped() {
        let parsed = parse_ushcn_daily("3000421950", &UshcnFilter::new(Element::Tmax));
        assert!(parsed.is_empty());
        assert_eq!(parsed.skipped_rows, 1);
    }
}
