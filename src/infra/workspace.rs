// src/infra/workspace.rs — Target layout on disk
//
// A target named `icici` is a directory `data/icici/` holding
// `icici_sample.txt` (extracted statement text) and
// `icici_expected.csv` (ground truth). The accepted parser lands at
// `parsers/icici_parser.py`.

use std::path::{Path, PathBuf};

use crate::infra::config::WorkspaceConfig;
use crate::infra::errors::SmithError;
use crate::util::truncate_str;

/// Resolved file locations for one target.
#[derive(Debug, Clone)]
pub struct TargetPaths {
    pub target: String,
    pub sample_path: PathBuf,
    pub truth_path: PathBuf,
    pub parser_dest: PathBuf,
}

/// One row of `parsesmith list` output.
#[derive(Debug, Clone, PartialEq)]
pub struct TargetInfo {
    pub name: String,
    /// Both required input files are present.
    pub ready: bool,
    /// An accepted parser already exists.
    pub has_parser: bool,
}

/// Resolve and validate the file triple for `target` under `root`.
pub fn resolve(
    root: &Path,
    cfg: &WorkspaceConfig,
    target: &str,
) -> Result<TargetPaths, SmithError> {
    if target.is_empty() || target.contains(['/', '\\']) {
        return Err(SmithError::Workspace(format!(
            "invalid target name '{target}'"
        )));
    }

    let target_dir = root.join(&cfg.data_dir).join(target);
    let sample_path = target_dir.join(format!("{target}_sample.txt"));
    let truth_path = target_dir.join(format!("{target}_expected.csv"));
    let parser_dest = root
        .join(&cfg.parsers_dir)
        .join(format!("{target}_parser.py"));

    let mut missing = Vec::new();
    if !sample_path.is_file() {
        missing.push(sample_path.display().to_string());
    }
    if !truth_path.is_file() {
        missing.push(truth_path.display().to_string());
    }
    if !missing.is_empty() {
        return Err(SmithError::Workspace(format!(
            "target '{target}' is missing required file(s): {}",
            missing.join(", "),
        )));
    }

    Ok(TargetPaths {
        target: target.to_string(),
        sample_path,
        truth_path,
        parser_dest,
    })
}

/// Enumerate target directories under the data dir, sorted by name.
pub fn list_targets(root: &Path, cfg: &WorkspaceConfig) -> anyhow::Result<Vec<TargetInfo>> {
    let data_dir = root.join(&cfg.data_dir);
    if !data_dir.is_dir() {
        return Ok(Vec::new());
    }

    let mut targets = Vec::new();
    for entry in std::fs::read_dir(&data_dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_dir() {
            continue;
        }
        let Some(name) = entry.file_name().to_str().map(str::to_string) else {
            continue;
        };
        let dir = entry.path();
        let ready = dir.join(format!("{name}_sample.txt")).is_file()
            && dir.join(format!("{name}_expected.csv")).is_file();
        let has_parser = root
            .join(&cfg.parsers_dir)
            .join(format!("{name}_parser.py"))
            .is_file();
        targets.push(TargetInfo {
            name,
            ready,
            has_parser,
        });
    }
    targets.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(targets)
}

/// Read the sample document and clamp it to `limit` bytes for the
/// planner prompt.
pub fn load_excerpt(sample_path: &Path, limit: usize) -> Result<String, SmithError> {
    let text = std::fs::read_to_string(sample_path).map_err(|e| {
        SmithError::Workspace(format!(
            "could not read sample document {}: {e}",
            sample_path.display(),
        ))
    })?;
    Ok(truncate_str(&text, limit).to_string())
}
