//! Settings error types.

use std::path::PathBuf;

/// Result alias for settings operations.
pub type Result<T> = std::result::Result<T, SettingsError>;

/// Errors from loading or validating settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    /// The settings file exists but could not be read.
    #[error("failed to read settings at {path:?}: {source}")]
    Read {
        /// Settings file path.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
    /// The settings file is not valid JSON or has wrong field types.
    #[error("failed to parse settings at {path:?}: {source}")]
    Parse {
        /// Settings file path.
        path: PathBuf,
        /// Underlying parse error.
        source: serde_json::Error,
    },
    /// A value is out of range.
    #[error("invalid settings: {reason}")]
    Invalid {
        /// What is wrong.
        reason: String,
    },
}
