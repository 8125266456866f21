// src/infra/config.rs — Configuration loading (TOML)

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::infra::paths;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub cycle: CycleConfig,

    #[serde(default)]
    pub backend: BackendConfig,

    #[serde(default)]
    pub sandbox: SandboxConfig,

    #[serde(default)]
    pub workspace: WorkspaceConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CycleConfig {
    /// Upper bound on plan-generate-test rounds per run.
    pub max_attempts: u32,
    /// Bytes of the sample document shown to the planner.
    pub excerpt_limit: usize,
}

impl Default for CycleConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            excerpt_limit: 4000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Short name used in logs and error messages.
    pub name: String,
    pub base_url: String,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    /// Environment variable holding the API key. The key itself never
    /// lives in the config file.
    pub api_key_env: String,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            name: "groq".into(),
            base_url: crate::backend::openai_compat::GROQ_BASE_URL.into(),
            model: "llama-3.3-70b-versatile".into(),
            temperature: 0.1,
            max_tokens: 4096,
            api_key_env: "GROQ_API_KEY".into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SandboxConfig {
    /// Interpreter binary looked up in PATH.
    pub interpreter: String,
    pub timeout_secs: u64,
    /// Per-stream cap on captured interpreter output. Stdout beyond
    /// the cap fails the attempt; stderr keeps its tail for feedback.
    pub max_output_kb: usize,
}

impl Default for SandboxConfig {
    fn default() -> Self {
        Self {
            interpreter: "python3".into(),
            timeout_secs: 30,
            max_output_kb: 64,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkspaceConfig {
    /// Directory holding one subdirectory per target.
    pub data_dir: String,
    /// Directory accepted parsers are written to.
    pub parsers_dir: String,
}

impl Default for WorkspaceConfig {
    fn default() -> Self {
        Self {
            data_dir: "data".into(),
            parsers_dir: "parsers".into(),
        }
    }
}

impl Config {
    /// Load config from the discovered file, falling back to defaults.
    pub fn load() -> anyhow::Result<Self> {
        match paths::discover_config() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }
}
