//! Climate-station observation parsers.
//!
//! Turns raw station files into a flat stream of [`Observation`]s, each
//! carrying a year key, a 1-based index within the year (day-of-year or
//! month) and a value that is `None` when the source had no usable number.
//!
//! Two source layouts are supported:
//! - [`delimited`]: the CSV export (header rows, one observation per row)
//! - [`ushcn`]: USHCN daily fixed-width lines (one station-month per line)
//!
//! Bad values never abort parsing; they become missing observations.
//! Rows that cannot be placed at all (no index, too few columns) are
//! skipped and counted in [`ParsedRecords::skipped_rows`].

pub mod delimited;
pub mod error;
pub mod record;
pub mod ushcn;

pub use delimited::{parse_csv, CsvLayout, ValueColumn};
pub use error::{ParserError, ParserResult};
pub use record::{parse_value, Observation, ParsedRecords};
pub use ushcn::{parse_ushcn_daily, Element, Granularity, UshcnFilter};
