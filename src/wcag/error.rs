//! Error types for loading the WCAG dataset.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for dataset operations.
pub type DataResult<T> = Result<T, DataError>;

/// Errors that can occur while loading the dataset artifact.
///
/// All of these are fatal at startup: the server never runs on a partial
/// dataset.
#[derive(Debug, Error)]
pub enum DataError {
    /// Failed to open or read the file.
    #[error("Failed to read dataset: {path}")]
    FileRead {
        /// Path to the file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The artifact is not a valid WCAG document.
    #[error("Failed to parse dataset: {origin}")]
    Parse {
        /// Where the document came from (a path or `<inline>`).
        origin: String,
        /// Underlying JSON error.
        #[source]
        source: serde_json::Error,
    },

    /// The artifact parsed but contains no principles.
    #[error("Dataset contains no principles: {origin}")]
    Empty {
        /// Where the document came from.
        origin: String,
    },
}

impl DataError {
    /// Creates a file read error.
    pub fn file_read(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::FileRead {
            path: path.into(),
            source,
        }
    }

    /// Creates a parse error.
    pub fn parse(origin: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Parse {
            origin: origin.into(),
            source,
        }
    }
}
