use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failures raised while reading or writing the backing file. A missing file
/// is not an error and never shows up here.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to access {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{} is not a valid CSV file", .path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("{} has no '{column}' column", .path.display())]
    MissingColumn { path: PathBuf, column: &'static str },

    #[error("{} line {line}: rating '{value}' is not a whole number from 1 to 5", .path.display())]
    InvalidRating {
        path: PathBuf,
        line: u64,
        value: String,
    },
}
