//! Error types for loading the input tables.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that abort a load.
///
/// Any one of these fails the whole load; no table from a failed load is
/// ever handed to the dashboard.
#[derive(Debug, Error)]
pub enum LoadError {
    /// A required input file does not exist.
    #[error("missing input file: {}", .0.display())]
    Missing(PathBuf),

    /// The file exists but could not be opened or read.
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid CSV for its table, or a required column or
    /// value is missing or malformed.
    #[error("malformed {file}: {source}")]
    Csv {
        file: String,
        #[source]
        source: csv::Error,
    },
}
