//! Tabular datasets of short text records
//!
//! CSV ingestion with a permissive fallback, pandas-style missing values and
//! column normalization, sample-dataset adaptation and CSV export.

mod export;
mod ingest;
mod sample;
mod table;

pub use export::{to_csv_bytes, EXPORT_FILE_NAME, EXPORT_MIME};
pub use ingest::{load_csv, parse_csv, sniff_delimiter, IngestReport, ParseMode, NA_VALUES};
pub use sample::{adapt_sample, load_sample, SAMPLE_DATASET_URL};
pub use table::{
    display_cell, normalize_column_name, Cell, DataSource, Dataset, MISSING_PLACEHOLDER,
};

use thiserror::Error;

pub type Hash32 = [u8; 32];

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("No columns to parse from file")]
    Empty,

    #[error("Could not parse CSV (strict: {strict}; permissive: {permissive})")]
    Unparseable { strict: String, permissive: String },

    #[error("Line {line}: expected {expected} fields, found {actual}")]
    TooManyFields { line: u64, expected: usize, actual: usize },

    #[error("No parseable records ({skipped} malformed lines)")]
    NoValidRows { skipped: u64 },

    #[error("Missing column: {0}")]
    MissingColumn(String),

    #[error("Column length mismatch: expected {expected} values, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("CSV write error: {0}")]
    Write(String),
}

pub type Result<T> = std::result::Result<T, DatasetError>;
