//! Error types for the data-loader crate.
//!
//! Any malformation in the on-disk dataset surfaces here, with file
//! and line context where there is one. Construction-time errors from
//! the store (out-of-range ids in otherwise well-formed files) pass
//! through via `Store`.

use thiserror::Error;

/// Errors that can occur during dataset loading and parsing
#[derive(Error, Debug)]
pub enum DataLoadError {
    /// I/O error occurred while reading a file
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Line in a data file couldn't be parsed
    #[error("Parse error at line {line} in {file}: {reason}")]
    ParseError {
        file: String,
        line: usize,
        reason: String,
    },

    /// A data field had an invalid value
    #[error("Invalid value for {field}: {value}")]
    InvalidValue { field: String, value: String },

    /// An id announced by u.info has no record in its data file
    #[error("Missing record: {entity} with id {id}")]
    MissingRecord { entity: &'static str, id: usize },

    /// Store construction rejected the parsed data
    #[error(transparent)]
    Store(#[from] dataset_store::StoreError),
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, DataLoadError>;
