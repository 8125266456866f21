// src/infra/errors.rs — Error types for parsesmith

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SmithError {
    // Backend faults abort the run: the cycle retries bad code, not an
    // unreachable model.
    #[error("Backend '{backend}' error: {message}")]
    Backend {
        backend: String,
        message: String,
        retriable: bool,
    },

    // Persisting the accepted parser failed. Kept separate from test
    // failures so a disk fault is never fed back into re-planning.
    #[error("Failed to persist parser to {}: {source}", .path.display())]
    Persist {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Workspace error: {0}")]
    Workspace(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl SmithError {
    /// True for transport-level backend faults (timeouts) where an
    /// identical rerun has a reasonable chance of succeeding.
    pub fn is_retriable(&self) -> bool {
        matches!(self, SmithError::Backend { retriable: true, .. })
    }
}
