//! Error types for peakassoc.
//!
//! Every error is fatal for the run: there is no partial output mode.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Main error type for association runs.
#[derive(Debug, Error)]
pub enum AssocError {
    /// Malformed line, unknown file type or non-numeric required field
    #[error("{message} at line {line} in {}", path.display())]
    InputFormat {
        path: PathBuf,
        line: usize,
        message: String,
    },

    /// Annotation file whose format could not be determined
    #[error("Fail to open {} with unknown file extension (expected .gtf, .gff or .gff3)", path.display())]
    UnknownFormat { path: PathBuf },

    /// File with no usable (non-comment, non-blank) lines
    #[error("No valid line in {}", path.display())]
    EmptyInput { path: PathBuf },

    /// Missing or out-of-range parameter
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// I/O failure while opening or reading an input
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl AssocError {
    pub fn input_format(path: &Path, line: usize, message: impl Into<String>) -> Self {
        AssocError::InputFormat {
            path: path.to_path_buf(),
            line,
            message: message.into(),
        }
    }

    pub fn io(path: &Path, source: std::io::Error) -> Self {
        AssocError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Result type alias for association operations
pub type Result<T> = std::result::Result<T, AssocError>;
