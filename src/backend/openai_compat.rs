// src/backend/openai_compat.rs — OpenAI-compatible chat completions client
//
// Works against any endpoint speaking the /chat/completions protocol:
// Groq, DeepSeek, Together, OpenRouter, or a local server. Groq is the
// default because the stock model lives there.

use async_trait::async_trait;

use super::{Completion, CompletionRequest, TextBackend, TokenUsage};
use crate::infra::errors::SmithError;

pub const GROQ_BASE_URL: &str = "https://api.groq.com/openai/v1";

pub struct OpenAiCompatBackend {
    id_str: String,
    name_str: String,
    api_key: String,
    base_url: String,
    client: reqwest::Client,
}

impl OpenAiCompatBackend {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        api_key: String,
        base_url: String,
    ) -> Self {
        Self {
            id_str: id.into(),
            name_str: name.into(),
            api_key,
            // Trailing slash in config would double up in the URL join
            base_url: base_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    /// Groq endpoint with the conventional id/name.
    pub fn groq(api_key: String) -> Self {
        Self::new("groq", "Groq", api_key, GROQ_BASE_URL.to_string())
    }
}

/// Build the JSON request body for a completion call.
///
/// The system prompt, when present, is the first message; temperature
/// and max_tokens are included only when set so endpoint defaults apply.
fn build_body(request: &CompletionRequest) -> serde_json::Value {
    let mut messages = Vec::new();
    if let Some(ref system) = request.system {
        messages.push(serde_json::json!({"role": "system", "content": system}));
    }
    messages.push(serde_json::json!({"role": "user", "content": request.prompt}));

    let mut body = serde_json::json!({
        "model": request.model,
        "messages": messages,
    });
    if let Some(max_tokens) = request.max_tokens {
        body["max_tokens"] = serde_json::json!(max_tokens);
    }
    if let Some(temp) = request.temperature {
        body["temperature"] = serde_json::json!(temp);
    }
    body
}

#[async_trait]
impl TextBackend for OpenAiCompatBackend {
    fn id(&self) -> &str {
        &self.id_str
    }

    fn name(&self) -> &str {
        &self.name_str
    }

    async fn complete(&self, request: CompletionRequest) -> Result<Completion, SmithError> {
        let body = build_body(&request);

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header(
                "User-Agent",
                format!("parsesmith/{}", env!("CARGO_PKG_VERSION")),
            )
            .json(&body)
            .send()
            .await
            .map_err(|e| SmithError::Backend {
                backend: self.id_str.clone(),
                message: e.to_string(),
                retriable: e.is_timeout(),
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_body = response.text().await.unwrap_or_default();
            return Err(SmithError::Backend {
                backend: self.id_str.clone(),
                message: format!("HTTP {status}: {error_body}"),
                retriable: status.is_server_error(),
            });
        }

        let resp: serde_json::Value = response.json().await.map_err(|e| SmithError::Backend {
            backend: self.id_str.clone(),
            message: format!("failed to parse response: {e}"),
            retriable: false,
        })?;

        let content = resp["choices"][0]["message"]["content"]
            .as_str()
            .unwrap_or("")
            .to_string();
        if content.is_empty() {
            return Err(SmithError::Backend {
                backend: self.id_str.clone(),
                message: "response contained no message content".into(),
                retriable: false,
            });
        }

        let usage = TokenUsage {
            input_tokens: resp["usage"]["prompt_tokens"].as_u64().unwrap_or(0) as u32,
            output_tokens: resp["usage"]["completion_tokens"].as_u64().unwrap_or(0) as u32,
        };

        Ok(Completion { content, usage })
    }
}
