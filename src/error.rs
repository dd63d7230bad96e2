//! Error taxonomy for a sorting run.
//!
//! Every error is fatal: the run stops at the first failure and the message is
//! reported by the binary with a non-zero exit status.

use crate::config::ConfigError;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur while sorting a directory.
#[derive(Debug, Error)]
pub enum SortError {
    /// The target path does not exist or is not a directory.
    #[error("no such directory: {}", .0.display())]
    NoSuchDirectory(PathBuf),

    /// Nothing at all was found below the target directory.
    #[error("empty directory: {}", .0.display())]
    EmptyDirectory(PathBuf),

    /// Extraction was requested for a format the extractor cannot read.
    #[error("unsupported archive format '{format}': {}", path.display())]
    UnsupportedArchive { path: PathBuf, format: String },

    /// A filesystem call failed.
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A zip archive could not be read.
    #[error("failed to read zip archive {}: {source}", path.display())]
    Zip {
        path: PathBuf,
        #[source]
        source: zip::result::ZipError,
    },

    /// The configuration could not be loaded or compiled.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl SortError {
    /// Wraps an I/O error with the path it happened on.
    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }
}

/// Result type for sorting operations.
pub type SortResult<T> = Result<T, SortError>;
