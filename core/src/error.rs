//! Error types shared across the core crate.

use std::path::PathBuf;
use thiserror::Error;

/// Errors from loading or persisting the lookup table.
#[derive(Debug, Error)]
pub enum TableError {
    #[error("IO error accessing {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid table data in {path:?}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to encode table: {0}")]
    Encode(#[source] serde_json::Error),
}

/// Rejections of control-flow requests. These are contention outcomes, not
/// faults: the request is refused without side effects and the requester is
/// told why.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ControlError {
    #[error("a prediction is already being verified")]
    SlotOccupied,

    #[error("a pause is already active")]
    AlreadyPaused,

    #[error("no pause is active")]
    NotPaused,
}
