//! Errors raised while choosing, persisting or fetching corpus chunks.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CorpusError {
    #[error("no sample files to serve in {}", .dir.display())]
    NoFiles { dir: PathBuf },

    #[error("every sample file has been served")]
    Exhausted,

    #[error("failed to access {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed record file {}: {source}", .path.display())]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("record file {} lists {file:?} more than once", .path.display())]
    DuplicateRecord { path: PathBuf, file: String },

    #[error("remote paragraph source failed: {0}")]
    Remote(String),

    #[error("corpus worker is no longer running")]
    WorkerGone,
}

impl CorpusError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// True for the soft terminal condition: nothing left to serve.
    pub fn is_exhausted(&self) -> bool {
        matches!(self, Self::Exhausted)
    }
}
