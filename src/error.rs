//! Error types for avakas.
//!
//! All operations return `Result<T>` which aliases `Result<T, AvakasError>`.

use std::path::PathBuf;
use thiserror::Error;

/// Errors from flavor detection and version operations.
#[derive(Debug, Error)]
pub enum AvakasError {
    /// Manifest exists but cannot be parsed.
    #[error("{} is malformed: {message}", path.display())]
    MalformedDocument { path: PathBuf, message: String },

    /// Manifest parses but has no version at the expected key path.
    #[error("{} does not define a version ({key})", path.display())]
    MissingVersion { path: PathBuf, key: String },

    /// Re-parsed manifest differs from the original in more than the version.
    ///
    /// The file has already been written when this is returned.
    #[error("Sanity check failed for {}: {message}", path.display())]
    SanityCheckFailed { path: PathBuf, message: String },

    /// Flavor identifier registered twice.
    #[error("Flavor '{0}' is already registered")]
    DuplicateFlavor(String),

    /// Synonym relation rejected by the registry.
    #[error("Cannot make '{synonym}' a synonym of '{base}': {reason}")]
    InvalidSynonym {
        base: String,
        synonym: String,
        reason: String,
    },

    /// Flavor identifier not present in the registry.
    #[error("Unknown flavor '{0}'")]
    UnknownFlavor(String),

    /// No registered flavor claims the directory.
    #[error("Unable to determine the project flavor of {}", .0.display())]
    NoFlavorMatched(PathBuf),

    /// Line pattern is unusable for rewriting (indicates bug).
    #[error("Invalid rewrite pattern: {0}")]
    InvalidPattern(String),

    /// File system operation failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Regex compilation failed (indicates bug).
    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),

    /// Unexpected error.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias for avakas operations.
pub type Result<T> = std::result::Result<T, AvakasError>;
