//! Error types for the refactor pipeline.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using `RefactorError`.
pub type Result<T> = std::result::Result<T, RefactorError>;

/// Failures while loading, transforming, or persisting a project file.
#[derive(Debug, Error)]
pub enum RefactorError {
    #[error("failed to read project file {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("project file {path} is not valid JSON")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to serialize project")]
    Serialize(#[source] serde_json::Error),

    #[error("failed to back up {path} to {backup}")]
    Backup {
        path: PathBuf,
        backup: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write project file {path}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("no layout named '{0}'")]
    UnknownLayout(String),

    #[error("z-orders in layout '{layout}' overflow starting at {start} with step {step}")]
    ZOrderOverflow { layout: String, start: i64, step: i64 },

    #[error("invalid pattern '{pattern}'")]
    Pattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}
