use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use medrag_core::error::{Error, Result};

use crate::{GenerationRequest, Generator};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub role: String,
    pub content: String,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<Message>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

/// Client for an OpenAI-compatible `chat/completions` endpoint.
pub struct OpenAiGenerator {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl OpenAiGenerator {
    pub fn new(base_url: &str, api_key: Option<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(120))
            .build()
            .map_err(|e| Error::Generation(format!("failed to create HTTP client: {e}")))?;
        Ok(Self { client, base_url: base_url.to_string(), api_key })
    }

    /// Reads `OPENAI_API_KEY` (or `APP_API_KEY`), honouring a `.env` file.
    pub fn from_env(base_url: &str) -> Result<Self> {
        let api_key = dotenv::var("OPENAI_API_KEY")
            .or_else(|_| dotenv::var("APP_API_KEY"))
            .ok()
            .filter(|k| !k.is_empty());
        Self::new(base_url, api_key)
    }

    /// Resolve the chat completions endpoint from the base URL.
    pub fn endpoint(&self) -> String {
        let base = self.base_url.trim_end_matches('/');
        if base.ends_with("/chat/completions") {
            base.to_string()
        } else if base.ends_with("/v1") {
            format!("{}/chat/completions", base)
        } else {
            format!("{}/v1/chat/completions", base)
        }
    }
}

#[async_trait]
impl Generator for OpenAiGenerator {
    async fn generate(&self, request: &GenerationRequest) -> Result<String> {
        let body = ChatRequest {
            model: &request.model,
            messages: vec![Message { role: "user".to_string(), content: request.prompt.clone() }],
            temperature: request.temperature,
            max_tokens: request.max_tokens,
        };
        let mut req = self.client.post(self.endpoint()).json(&body);
        if let Some(key) = &self.api_key {
            req = req.bearer_auth(key);
        }

        let resp = req.send().await.map_err(|e| Error::Generation(format!("request failed: {e}")))?;
        let status = resp.status();
        let text = resp
            .text()
            .await
            .map_err(|e| Error::Generation(format!("failed to read response: {e}")))?;
        if !status.is_success() {
            let snippet: String = text.chars().take(300).collect();
            return Err(Error::Generation(format!("HTTP {status}: {snippet}")));
        }
        let parsed: ChatResponse =
            serde_json::from_str(&text).map_err(|e| Error::Generation(format!("unparseable response: {e}")))?;
        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| Error::Generation("response contained no message content".to_string()))?;
        debug!(chars = content.len(), "generation complete");
        Ok(content)
    }
}
