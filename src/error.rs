//! Error types for the recovery engine.
//!
//! Only conditions that stop a search surface here. A candidate that fails to
//! unlock the archive, or a stage that runs out of candidates, is normal
//! control flow and never becomes a `CrackError`.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CrackError {
    /// The archive could not be read at all. Raised before any stage runs.
    #[error("cannot open archive {}: {source}", path.display())]
    ArchiveUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The bytes were read but cannot be searched, e.g. no encrypted entry.
    #[error("invalid archive: {0}")]
    InvalidArchive(String),

    /// Stage or alphabet configuration is inconsistent.
    #[error("invalid search plan: {0}")]
    InvalidPlan(String),

    /// The run was cancelled from outside before a password was found.
    #[error("search interrupted")]
    Interrupted,

    /// The password was found but could not be written out.
    #[error("failed to save password to {}: {source}", path.display())]
    Persist {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("a worker thread panicked during the search")]
    WorkerPanic,
}

pub type Result<T> = std::result::Result<T, CrackError>;
