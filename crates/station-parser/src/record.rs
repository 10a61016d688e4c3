//! Parsed observation records.

use serde::{Deserialize, Serialize};

/// One station observation, ready for matrix building.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    /// Year key; rows are grouped by it in first-seen order
    pub year: String,
    /// 1-based position within the year (day-of-year or month)
    pub index: usize,
    /// Observed value, `None` when missing or unparseable
    pub value: Option<f64>,
}

impl Observation {
    pub fn new(year: impl Into<String>, index: usize, value: Option<f64>) -> Self {
        Self {
            year: year.into(),
            index,
            value,
        }
    }
}

/// Output of a parser run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedRecords {
    pub records: Vec<Observation>,
    /// Rows that could not be turned into an observation at all
    pub skipped_rows: usize,
}

impl ParsedRecords {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of observations whose value is missing.
    pub fn missing_values(&self) -> usize {
        self.records.iter().filter(|r| r.value.is_none()).count()
    }
}

/// Parse a value token; anything that is not a finite number is missing.
///
/// Station exports write missing values as `.`, blanks or sentinel words,
/// so this never fails.
pub fn parse_value(token: &str) -> Option<f64> {
    token
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
}
