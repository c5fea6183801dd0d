//! Anthropic native oracle implementation.
//!
//! Uses Anthropic's Messages API directly (not an OpenAI-compatible proxy):
//! - `x-api-key` header authentication (not Bearer)
//! - `anthropic-version` header
//! - Usage reported as input + output tokens

use async_trait::async_trait;
use readagent_core::error::OracleError;
use readagent_core::oracle::{Completion, Oracle};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::openai_compat::classify_status;

const ANTHROPIC_VERSION: &str = "2023-06-01";
const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";
const DEFAULT_MAX_TOKENS: u32 = 1024;

/// Anthropic native Messages API oracle.
pub struct AnthropicOracle {
    name: String,
    base_url: String,
    api_key: String,
    model: String,
    temperature: f32,
    max_tokens: u32,
    client: reqwest::Client,
}

impl AnthropicOracle {
    /// Create a new Anthropic oracle.
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            name: "anthropic".into(),
            base_url: DEFAULT_BASE_URL.into(),
            api_key: api_key.into(),
            model: model.into(),
            temperature: 0.0,
            max_tokens: DEFAULT_MAX_TOKENS,
            client,
        }
    }

    /// Create with a custom base URL (e.g., for testing or proxies).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    fn request_body(&self, prompt: &str) -> serde_json::Value {
        serde_json::json!({
            "model": self.model,
            "messages": [{ "role": "user", "content": [{ "type": "text", "text": prompt }] }],
            "max_tokens": self.max_tokens,
            "temperature": self.temperature,
        })
    }

    /// Concatenate the text blocks of a response; other block kinds are ignored.
    fn to_completion(resp: AnthropicResponse) -> Completion {
        let mut text_content = String::new();
        for block in &resp.content {
            if let ResponseContentBlock::Text { text } = block {
                if !text_content.is_empty() {
                    text_content.push('\n');
                }
                text_content.push_str(text);
            }
        }

        let tokens_used = u64::from(resp.usage.input_tokens) + u64::from(resp.usage.output_tokens);
        Completion::new(tokens_used, text_content)
    }
}

#[async_trait]
impl Oracle for AnthropicOracle {
    fn name(&self) -> &str {
        &self.name
    }

    async fn query_model(&self, prompt: &str) -> Result<Completion, OracleError> {
        let url = format!("{}/v1/messages", self.base_url);

        debug!(provider = "anthropic", model = %self.model, "Sending completion request");

        let response = self
            .client
            .post(&url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("Content-Type", "application/json")
            .json(&self.request_body(prompt))
            .send()
            .await
            .map_err(|e| OracleError::Network(e.to_string()))?;

        let status = response.status().as_u16();
        if status != 200 {
            let error_body = response.text().await.unwrap_or_default();
            warn!(status, body = %error_body, "Anthropic API error");
            return Err(classify_status(status, error_body));
        }

        let api_resp: AnthropicResponse =
            response.json().await.map_err(|e| OracleError::ApiError {
                status_code: 200,
                message: format!("Failed to parse Anthropic response: {e}"),
            })?;

        Ok(Self::to_completion(api_resp))
    }
}

// --- Anthropic API types ---

#[derive(Debug, Deserialize)]
struct AnthropicResponse {
    content: Vec<ResponseContentBlock>,
    usage: AnthropicUsage,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
enum ResponseContentBlock {
    #[serde(rename = "text")]
    Text { text: String },
    #[serde(other)]
    Other,
}

#[derive(Debug, Deserialize)]
struct AnthropicUsage {
    input_tokens: u32,
    output_tokens: u32,
}
