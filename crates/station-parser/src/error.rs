//! Error types for station file parsing.

use thiserror::Error;

/// Errors that can occur while reading a station file.
///
/// Individual bad tokens are not errors; only problems that make the whole
/// file unreadable end up here.
#[derive(Debug, Error)]
pub enum ParserError {
    #[error("CSV error: {source}")]
    Csv {
        #[source]
        source: csv::Error,
    },

    #[error("invalid layout: {0}")]
    InvalidLayout(String),

    #[error("unknown element '{0}'")]
    UnknownElement(String),
}

impl From<csv::Error> for ParserError {
    fn from(source: csv::Error) -> Self {
        Self::Csv { source }
    }
}

/// Result type for parser operations.
pub type ParserResult<T> = std::result::Result<T, ParserError>;
