use std::path::PathBuf;

use thiserror::Error;

/// Validation and contract errors exposed by `pasiva-core`.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    #[error("symbol cannot be empty")]
    EmptySymbol,
    #[error("symbol length {len} exceeds max {max}")]
    SymbolTooLong { len: usize, max: usize },
    #[error("symbol must start with an ASCII letter: '{ch}'")]
    SymbolInvalidStart { ch: char },
    #[error("symbol contains invalid character '{ch}' at index {index}")]
    SymbolInvalidChar { ch: char, index: usize },

    #[error("date must be YYYY-MM-DD: '{value}'")]
    InvalidDate { value: String },

    #[error("weight must be a fraction in (0, 1]: {value}")]
    InvalidWeight { value: f64 },

    #[error("invalid source '{value}', expected one of yahoo, synthetic")]
    InvalidSource { value: String },

    #[error("field '{field}' must be finite")]
    NonFiniteValue { field: &'static str },
    #[error("field '{field}' must be non-negative")]
    NegativeValue { field: &'static str },

    #[error("duplicate symbol '{symbol}' in table")]
    DuplicateSymbol { symbol: String },
    #[error("dates must be strictly ascending (violated at index {index})")]
    UnsortedDates { index: usize },
    #[error("table has {actual} rows for {expected} dates")]
    RowCountMismatch { expected: usize, actual: usize },
    #[error("row {row} has {actual} cells for {expected} symbols")]
    RowWidthMismatch {
        row: usize,
        expected: usize,
        actual: usize,
    },
    #[error("price for '{symbol}' on {date} must be a finite, non-negative number")]
    InvalidPrice { symbol: String, date: String },
}

/// Errors raised while reading and normalizing an index-composition file.
#[derive(Debug, Error)]
pub enum CompositionError {
    #[error("failed to read composition file '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed composition row: {0}")]
    Csv(#[from] csv::Error),

    #[error("no usable composition rows in '{}'", path.display())]
    EmptyComposition { path: PathBuf },
}
