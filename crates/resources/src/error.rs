//! Error types for resource loading.

use std::path::PathBuf;
use thiserror::Error;

/// Error type for resource loading operations.
#[derive(Error, Debug)]
pub enum ResourceError {
    /// File not found.
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    /// IO error while reading an asset.
    #[error("Failed to read '{path}': {source}")]
    Io {
        /// Path to the file that failed to load.
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file was read but its contents are unusable.
    #[error("Invalid asset '{name}': {message}")]
    InvalidAsset {
        /// Name the asset was requested by.
        name: String,
        /// Error message.
        message: String,
    },
}

/// Result type alias for resource operations.
pub type ResourceResult<T> = Result<T, ResourceError>;
