// src/backend/mod.rs — Generation backend layer

pub mod openai_compat;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::infra::errors::SmithError;

/// Core trait the cycle depends on for text generation.
///
/// The agent holds this as an injected handle; nothing below the CLI
/// constructs one. Both planning and code generation go through
/// `complete` so one mock can script an entire run.
#[async_trait]
pub trait TextBackend: Send + Sync {
    fn id(&self) -> &str;
    fn name(&self) -> &str;

    async fn complete(&self, request: CompletionRequest) -> Result<Completion, SmithError>;
}

#[derive(Debug, Clone, Default)]
pub struct CompletionRequest {
    pub model: String,
    pub prompt: String,
    pub system: Option<String>,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
}

impl CompletionRequest {
    pub fn new(model: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            prompt: prompt.into(),
            system: None,
            max_tokens: None,
            temperature: None,
        }
    }

    pub fn with_system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }
}

#[derive(Debug, Clone)]
pub struct Completion {
    pub content: String,
    pub usage: TokenUsage,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TokenUsage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

impl TokenUsage {
    pub fn total(&self) -> u32 {
        self.input_tokens + self.output_tokens
    }

    /// Accumulate another call's usage into this one.
    pub fn absorb(&mut self, other: &TokenUsage) {
        self.input_tokens += other.input_tokens;
        self.output_tokens += other.output_tokens;
    }
}
