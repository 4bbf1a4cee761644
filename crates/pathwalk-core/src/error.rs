//! Error and warning types for walking operations.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while configuring or running a walk.
#[derive(Debug, Error)]
pub enum WalkError {
    /// The pathname pattern did not compile.
    #[error("bad RE {pattern:?}: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// A date-time argument matched none of the accepted formats.
    #[error("invalid date-time {value:?} (expected %Y-%m-%d %H:%M:%S, %Y-%m-%d, or %H:%M:%S)")]
    InvalidDateTime { value: String },

    /// An integer or size argument could not be parsed.
    #[error("invalid number {value:?}: {reason}")]
    InvalidNumber { value: String, reason: String },

    /// Invalid configuration.
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// Permission denied for a path.
    #[error("{path}: Permission denied")]
    PermissionDenied { path: PathBuf },

    /// Path not found.
    #[error("{path}: No such file or directory")]
    NotFound { path: PathBuf },

    /// Generic I/O error.
    #[error("{path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Writing a matched pathname to the output failed.
    #[error("could not write output: {0}")]
    Output(#[source] std::io::Error),
}

impl WalkError {
    /// Create an I/O error with path context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        match source.kind() {
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied { path },
            std::io::ErrorKind::NotFound => Self::NotFound { path },
            _ => Self::Io { path, source },
        }
    }

    /// Create a number parsing error.
    pub fn invalid_number(value: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidNumber {
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Whether this error stems from bad command-line input rather than the
    /// filesystem.
    pub fn is_usage(&self) -> bool {
        matches!(
            self,
            Self::InvalidPattern { .. }
                | Self::InvalidDateTime { .. }
                | Self::InvalidNumber { .. }
                | Self::InvalidConfig { .. }
        )
    }
}

/// Kind of walk warning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WarningKind {
    /// A directory could not be opened or read.
    ReadError,
    /// Metadata lookup on an entry failed.
    MetadataError,
    /// The joined pathname exceeds the platform limit.
    PathTooLong,
    /// The device of a root could not be determined; the root was skipped.
    DeviceLookup,
}

/// Non-fatal problem encountered during a walk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalkWarning {
    /// Path where the warning occurred.
    pub path: PathBuf,
    /// Human-readable message.
    pub message: String,
    /// Kind of warning.
    pub kind: WarningKind,
}

impl WalkWarning {
    /// Create a new walk warning.
    pub fn new(path: impl Into<PathBuf>, message: impl Into<String>, kind: WarningKind) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
            kind,
        }
    }

    /// Create a read error warning.
    pub fn read_error(path: impl Into<PathBuf>, error: &std::io::Error) -> Self {
        Self::new(path, error.to_string(), WarningKind::ReadError)
    }

    /// Create a metadata error warning.
    pub fn metadata_error(path: impl Into<PathBuf>, error: &std::io::Error) -> Self {
        Self::new(path, error.to_string(), WarningKind::MetadataError)
    }

    /// Create a warning for a pathname that does not fit the platform limit.
    pub fn path_too_long(path: impl Into<PathBuf>) -> Self {
        Self::new(path, "can't handle pathname", WarningKind::PathTooLong)
    }

    /// Create a warning for a root whose device could not be determined.
    pub fn device_lookup(path: impl Into<PathBuf>, error: &WalkError) -> Self {
        Self::new(path, error.to_string(), WarningKind::DeviceLookup)
    }
}

impl std::fmt::Display for WalkWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.path.display(), self.message)
    }
}
