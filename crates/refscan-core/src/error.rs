//! Error types for scanning operations.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Unexpected failure while resolving an asset or opening its data.
///
/// A slot that simply does not resolve is not an error; it is a finding.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// Serialized data could not be read.
    #[error("Corrupt asset data: {reason}")]
    Corrupt { reason: String },

    /// I/O error while loading asset data.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Asset data could not be parsed.
    #[error("Parse error: {message}")]
    Parse { message: String },

    /// Other error.
    #[error("{message}")]
    Other { message: String },
}

impl ResolveError {
    /// Create a corrupt-data error.
    pub fn corrupt(reason: impl Into<String>) -> Self {
        Self::Corrupt {
            reason: reason.into(),
        }
    }
}

/// Errors that end a scan without publishing results.
#[derive(Debug, Error)]
pub enum ScanError {
    /// Resolution failed while processing an asset.
    #[error("Error during missing reference search at {asset_path} -> {sub_path}: {source}")]
    Resolve {
        asset_path: String,
        sub_path: String,
        #[source]
        source: ResolveError,
    },

    /// A scan is already running on this scanner.
    #[error("Scan already in progress")]
    AlreadyRunning,

    /// The scan was cancelled between entry points. `completed` counts the
    /// assets walked before the token fired.
    #[error("Scan cancelled after walking {completed} asset(s) of {total} entries")]
    Cancelled { completed: usize, total: usize },

    /// Invalid configuration.
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },
}

/// Non-fatal warning: an asset skipped after a resolution failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanWarning {
    /// Entry point being processed.
    pub asset_path: String,
    /// Sub-path reached when the failure happened.
    pub sub_path: String,
    /// Human-readable message.
    pub message: String,
}

impl ScanWarning {
    /// Create a warning for a skipped asset.
    pub fn skipped(
        asset_path: impl Into<String>,
        sub_path: impl Into<String>,
        error: &ResolveError,
    ) -> Self {
        Self {
            asset_path: asset_path.into(),
            sub_path: sub_path.into(),
            message: error.to_string(),
        }
    }
}
