use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by the JSON document store and its backups.
///
/// Any of these makes the affected document untrusted: reconciliation skips the cycle and
/// startup aborts instead of overwriting the file with defaults.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Reading, writing or copying a file failed.
    #[error("I/O error on {path}: {source}")]
    Io {
        /// File or directory involved
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// A document is not valid JSON or does not match its typed shape.
    #[error("Malformed document {path}: {source}")]
    Json {
        /// Document path
        path: PathBuf,
        /// Underlying serde error
        #[source]
        source: serde_json::Error,
    },

    /// A document parsed but failed structural validation.
    #[error("Invalid {document} document: {reason}")]
    Invalid {
        /// Document kind name
        document: &'static str,
        /// Which check failed
        reason: String,
    },

    /// A requested backup generation does not exist.
    #[error("Backup not found: {0}")]
    BackupNotFound(String),
}

impl StoreError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn json(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        Self::Json {
            path: path.into(),
            source,
        }
    }
}
