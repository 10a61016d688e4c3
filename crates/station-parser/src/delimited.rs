//! Delimited station exports.
//!
//! The export has a fixed number of header rows followed by one
//! observation per row. Only three columns matter: the 1-based index within
//! the year, the year, and the value (by default the last column).

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ParserError, ParserResult};
use crate::record::{parse_value, Observation, ParsedRecords};

/// Where the value sits in a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueColumn {
    /// Last field of the row, whatever the row length
    Last,
    /// Fixed 0-based column
    At(usize),
}

/// Column layout of a delimited station export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CsvLayout {
    /// Rows to skip before the data starts
    pub header_rows: usize,
    /// 0-based column holding the 1-based index within the year
    pub index_column: usize,
    /// 0-based column holding the year key
    pub year_column: usize,
    pub value_column: ValueColumn,
    pub delimiter: u8,
}

impl Default for CsvLayout {
    fn default() -> Self {
        Self {
            header_rows: 2,
            index_column: 1,
            year_column: 4,
            value_column: ValueColumn::Last,
            delimiter: b',',
        }
    }
}

impl CsvLayout {
    fn validate(&self) -> ParserResult<()> {
        if self.index_column == self.year_column {
            return Err(ParserError::InvalidLayout(format!(
                "index and year share column {}",
                self.index_column
            )));
        }
        if let ValueColumn::At(col) = self.value_column {
            if col == self.index_column || col == self.year_column {
                return Err(ParserError::InvalidLayout(format!(
                    "value column {} overlaps index or year column",
                    col
                )));
            }
        }
        Ok(())
    }

    fn reader_builder(&self) -> csv::ReaderBuilder {
        let mut builder = csv::ReaderBuilder::new();
        builder
            .has_headers(false)
            .flexible(true)
            .trim(csv::Trim::All)
            .delimiter(self.delimiter);
        builder
    }
}

/// Parse a delimited station export.
///
/// Rows too short to hold the configured columns, rows with an empty year
/// and rows whose index is not a positive integer are skipped. A value that
/// does not parse as a number yields a missing observation.
pub fn parse_csv(content: &str, layout: &CsvLayout) -> ParserResult<ParsedRecords> {
    layout.validate()?;

    let mut reader = layout.reader_builder().from_reader(content.as_bytes());
    let mut parsed = ParsedRecords::default();

    for (row_index, row) in reader.records().enumerate() {
        let row = row?;
        if row_index < layout.header_rows {
            continue;
        }

        let value_token = match layout.value_column {
            ValueColumn::Last if row.len() > layout.index_column.max(layout.year_column) + 1 => {
                row.get(row.len() - 1)
            }
            ValueColumn::Last => None,
            ValueColumn::At(col) => row.get(col),
        };

        let index = row
            .get(layout.index_column)
            .and_then(|token| token.parse::<usize>().ok())
            .filter(|index| *index > 0);
        let year = row.get(layout.year_column).filter(|year| !year.is_empty());

        match (index, year, value_token) {
            (Some(index), Some(year), Some(token)) => {
                parsed
                    .records
                    .push(Observation::new(year, index, parse_value(token)));
            }
            _ => parsed.skipped_rows += 1,
        }
    }

    debug!(
        records = parsed.records.len(),
        skipped = parsed.skipped_rows,
        missing = parsed.missing_values(),
        "Parsed delimited station export"
    );
    Ok(parsed)
}
