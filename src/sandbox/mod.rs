// src/sandbox/mod.rs — Sandboxed execution of candidate parsers

pub mod python;

use std::path::Path;

use async_trait::async_trait;
use thiserror::Error;

use crate::table::Table;

/// Runs candidate code against an input document and returns the table
/// it produced.
///
/// Every way the candidate can go wrong maps to an [`ExecFailure`]; the
/// cycle absorbs those as feedback for the next planning round rather
/// than aborting the run.
#[async_trait]
pub trait Sandbox: Send + Sync {
    async fn run(&self, code: &str, input: &Path) -> Result<Table, ExecFailure>;
}

/// A candidate parser failing to produce a table.
///
/// The `Display` text is what the model sees as feedback, so each
/// variant reads as a diagnosis, not an error code.
#[derive(Debug, Clone, Error)]
pub enum ExecFailure {
    #[error("Python syntax error:\n{detail}")]
    Syntax { detail: String },

    #[error("runtime failure while executing the parser:\n{detail}")]
    Runtime { detail: String },

    #[error("execution timed out after {limit_secs}s; the parser likely loops or blocks on input")]
    Timeout { limit_secs: u64 },

    #[error("parser output was not a valid table: {detail}")]
    BadOutput { detail: String },
}
