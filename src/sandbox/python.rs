// src/sandbox/python.rs — Python subprocess sandbox
//
// Writes the candidate and a fixed harness into a scratch directory,
// runs it with a scrubbed environment under a wall-clock limit, and
// parses harness stdout as CSV. Capture of both pipes is capped.
// The scratch directory is the working directory, so any stray files
// the candidate writes vanish with it.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;

use super::{ExecFailure, Sandbox};
use crate::infra::config::SandboxConfig;
use crate::infra::errors::SmithError;
use crate::table::Table;
use crate::util::tail_str;

/// Appended after the candidate code. The candidate defines `parse`;
/// this is the only entry point that runs it.
const HARNESS: &str = r#"
if __name__ == "__main__":
    import sys as _sys
    _frame = parse(_sys.argv[1])
    _sys.stdout.write(_frame.to_csv(index=False))
"#;

pub struct PythonSandbox {
    interpreter: PathBuf,
    timeout: Duration,
    max_output_bytes: usize,
}

impl PythonSandbox {
    /// Resolve the interpreter from PATH and build the sandbox.
    pub fn from_config(cfg: &SandboxConfig) -> Result<Self, SmithError> {
        let interpreter = which::which(&cfg.interpreter).map_err(|_| {
            SmithError::Config(format!(
                "interpreter '{}' not found in PATH",
                cfg.interpreter
            ))
        })?;
        tracing::debug!("Sandbox interpreter: {}", interpreter.display());
        Ok(Self {
            interpreter,
            timeout: Duration::from_secs(cfg.timeout_secs),
            max_output_bytes: cfg.max_output_kb * 1024,
        })
    }
}

#[async_trait]
impl Sandbox for PythonSandbox {
    async fn run(&self, code: &str, input: &Path) -> Result<Table, ExecFailure> {
        let scratch = tempfile::tempdir().map_err(|e| ExecFailure::Runtime {
            detail: format!("could not create scratch directory: {e}"),
        })?;

        let script = scratch.path().join("parser.py");
        tokio::fs::write(&script, format!("{code}\n{HARNESS}"))
            .await
            .map_err(|e| ExecFailure::Runtime {
                detail: format!("could not write candidate script: {e}"),
            })?;

        // The script runs from the scratch dir, so the input path must
        // survive the cwd change.
        let input = std::fs::canonicalize(input).map_err(|e| ExecFailure::Runtime {
            detail: format!("input document not readable: {e}"),
        })?;

        // The candidate never sees this process's environment; only
        // what the interpreter itself needs crosses over.
        let mut command = Command::new(&self.interpreter);
        command
            .arg(&script)
            .arg(&input)
            .current_dir(scratch.path())
            .env_clear()
            .env("PYTHONDONTWRITEBYTECODE", "1")
            .env("PYTHONIOENCODING", "utf-8");
        for key in ["PATH", "HOME"] {
            if let Some(value) = std::env::var_os(key) {
                command.env(key, value);
            }
        }

        let mut child = command
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| ExecFailure::Runtime {
                detail: format!("failed to launch interpreter: {e}"),
            })?;

        let (Some(child_out), Some(child_err)) = (child.stdout.take(), child.stderr.take())
        else {
            return Err(ExecFailure::Runtime {
                detail: "interpreter pipes were not captured".into(),
            });
        };

        // Both pipes are drained as the candidate writes, keeping at
        // most the cap in memory no matter how much it floods.
        let cap = self.max_output_bytes;
        let capture = async {
            let (out, err, status) = tokio::join!(
                read_head(child_out, cap),
                read_tail(child_err, cap),
                child.wait(),
            );
            Ok::<_, std::io::Error>((out?, err?, status?))
        };

        let ((stdout_bytes, stdout_truncated), stderr_bytes, status) =
            match tokio::time::timeout(self.timeout, capture).await {
                Ok(Ok(parts)) => parts,
                Ok(Err(e)) => {
                    return Err(ExecFailure::Runtime {
                        detail: format!("interpreter did not complete: {e}"),
                    })
                }
                // On timeout `child` drops on return and kill_on_drop
                // reaps it.
                Err(_) => {
                    return Err(ExecFailure::Timeout {
                        limit_secs: self.timeout.as_secs(),
                    })
                }
            };

        let stderr = String::from_utf8_lossy(&stderr_bytes);
        let stderr_tail = tail_str(&stderr, self.max_output_bytes);

        if !status.success() {
            if stderr_tail.trim().is_empty() {
                return Err(ExecFailure::Runtime {
                    detail: format!("interpreter exited with {status}"),
                });
            }
            return Err(classify_failure(stderr_tail));
        }

        if stdout_truncated {
            return Err(ExecFailure::BadOutput {
                detail: format!(
                    "parser wrote more than {} KB of output",
                    self.max_output_bytes / 1024
                ),
            });
        }

        let stdout = String::from_utf8_lossy(&stdout_bytes);
        Table::from_csv_str(&stdout).map_err(|e| ExecFailure::BadOutput {
            detail: format!("{e:#}"),
        })
    }
}

/// Chunk size for draining interpreter pipes.
const READ_CHUNK: usize = 8 * 1024;

/// Capture the leading `cap` bytes of a stream and whether anything
/// was discarded. Always reads to EOF so the child never blocks on a
/// full pipe.
async fn read_head<R: AsyncRead + Unpin>(
    mut stream: R,
    cap: usize,
) -> std::io::Result<(Vec<u8>, bool)> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; READ_CHUNK];
    let mut truncated = false;
    loop {
        let n = stream.read(&mut chunk).await?;
        if n == 0 {
            return Ok((buf, truncated));
        }
        let keep = n.min(cap.saturating_sub(buf.len()));
        buf.extend_from_slice(&chunk[..keep]);
        truncated |= keep < n;
    }
}

/// Capture the trailing bytes of a stream, holding at most one chunk
/// over `cap` in memory. Tracebacks put the error last; callers clamp
/// the exact length with `tail_str`.
async fn read_tail<R: AsyncRead + Unpin>(mut stream: R, cap: usize) -> std::io::Result<Vec<u8>> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; READ_CHUNK];
    loop {
        let n = stream.read(&mut chunk).await?;
        if n == 0 {
            return Ok(buf);
        }
        buf.extend_from_slice(&chunk[..n]);
        if buf.len() > cap + READ_CHUNK {
            buf.drain(..buf.len() - cap);
        }
    }
}

/// Map an interpreter's stderr tail to a failure class.
///
/// Compile-stage diagnostics come before anything ran; everything else
/// is a runtime failure.
fn classify_failure(stderr_tail: &str) -> ExecFailure {
    let detail = stderr_tail.trim().to_string();
    let compile_stage = detail.contains("SyntaxError")
        || detail.contains("IndentationError")
        || detail.contains("TabError");
    if compile_stage {
        ExecFailure::Syntax { detail }
    } else {
        ExecFailure::Runtime { detail }
    }
}
