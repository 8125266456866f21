// src/store/mod.rs — Durable storage of accepted parsers

use std::io::Write;
use std::path::Path;

use crate::infra::errors::SmithError;

/// Persists the accepted parser source.
///
/// Invoked exactly once per run, on the success path. A persist fault
/// is a [`SmithError::Persist`], never a test failure.
pub trait ArtifactStore: Send + Sync {
    fn persist(&self, dest: &Path, code: &str) -> Result<(), SmithError>;
}

/// Filesystem store with atomic writes (temp file + rename), so a crash
/// mid-write never leaves a truncated parser behind.
pub struct FsStore;

impl ArtifactStore for FsStore {
    fn persist(&self, dest: &Path, code: &str) -> Result<(), SmithError> {
        let persist_err = |source: std::io::Error| SmithError::Persist {
            path: dest.to_path_buf(),
            source,
        };

        let dir = dest.parent().unwrap_or_else(|| Path::new("."));
        std::fs::create_dir_all(dir).map_err(persist_err)?;

        let file_name = dest
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("parser.py");
        let tmp = dir.join(format!(".{file_name}.tmp"));

        let write = || -> std::io::Result<()> {
            let mut f = std::fs::File::create(&tmp)?;
            f.write_all(code.as_bytes())?;
            if !code.ends_with('\n') {
                f.write_all(b"\n")?;
            }
            f.flush()?;
            f.sync_all()?;
            std::fs::rename(&tmp, dest)?;
            Ok(())
        };
        write().map_err(persist_err)
    }
}
