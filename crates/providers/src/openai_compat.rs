//! OpenAI-compatible oracle implementation.
//!
//! Works with: OpenAI, OpenRouter, Ollama, vLLM, Groq, Together AI,
//! Gemini's OpenAI endpoint, and any other `/v1/chat/completions` service.
//!
//! Each oracle call is a single-turn chat: the prompt goes out as one user
//! message and the first choice comes back as the response text.

use async_trait::async_trait;
use readagent_core::error::OracleError;
use readagent_core::oracle::{Completion, Oracle};
use serde::Deserialize;
use tracing::{debug, warn};

/// An OpenAI-compatible text generation oracle.
pub struct OpenAiCompatOracle {
    name: String,
    base_url: String,
    api_key: String,
    model: String,
    temperature: f32,
    max_tokens: u32,
    client: reqwest::Client,
}

impl OpenAiCompatOracle {
    /// Create a new OpenAI-compatible oracle.
    pub fn new(
        name: impl Into<String>,
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        // Per-call timeouts are enforced by the retry wrapper.
        let client = reqwest::Client::builder()
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            name: name.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            model: model.into(),
            temperature: 0.0,
            max_tokens: 1024,
            client,
        }
    }

    /// Create an OpenAI oracle (convenience constructor).
    pub fn openai(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self::new("openai", "https://api.openai.com/v1", api_key, model)
    }

    /// Create an OpenRouter oracle (convenience constructor).
    pub fn openrouter(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self::new("openrouter", "https://openrouter.ai/api/v1", api_key, model)
    }

    /// Create an Ollama oracle (convenience constructor).
    pub fn ollama(base_url: Option<&str>, model: impl Into<String>) -> Self {
        Self::new(
            "ollama",
            base_url.unwrap_or("http://localhost:11434/v1"),
            "ollama", // Ollama doesn't need a real key
            model,
        )
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn request_body(&self, prompt: &str) -> serde_json::Value {
        serde_json::json!({
            "model": self.model,
            "messages": [{ "role": "user", "content": prompt }],
            "temperature": self.temperature,
            "max_tokens": self.max_tokens,
            "stream": false,
        })
    }

    /// Turn a parsed API response into a completion.
    fn to_completion(api_response: ApiResponse) -> Result<Completion, OracleError> {
        let choice = api_response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| OracleError::ApiError {
                status_code: 200,
                message: "No choices in response".into(),
            })?;

        let tokens_used = api_response
            .usage
            .map(|u| u64::from(u.total_tokens))
            .unwrap_or(0);

        Ok(Completion::new(
            tokens_used,
            choice.message.content.unwrap_or_default(),
        ))
    }
}

/// Map a non-success HTTP status to an oracle error.
pub(crate) fn classify_status(status: u16, body: String) -> OracleError {
    match status {
        429 => OracleError::RateLimited {
            retry_after_secs: 5,
        },
        401 | 403 => OracleError::AuthenticationFailed(
            "Invalid API key or insufficient permissions".into(),
        ),
        _ => OracleError::ApiError {
            status_code: status,
            message: body,
        },
    }
}

#[async_trait]
impl Oracle for OpenAiCompatOracle {
    fn name(&self) -> &str {
        &self.name
    }

    async fn query_model(&self, prompt: &str) -> Result<Completion, OracleError> {
        let url = format!("{}/chat/completions", self.base_url);

        debug!(
            provider = %self.name,
            model = %self.model,
            prompt_len = prompt.len(),
            "Sending completion request"
        );

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&self.request_body(prompt))
            .send()
            .await
            .map_err(|e| OracleError::Network(e.to_string()))?;

        let status = response.status().as_u16();
        if status != 200 {
            let error_body = response.text().await.unwrap_or_default();
            warn!(status, body = %error_body, "Provider returned error");
            return Err(classify_status(status, error_body));
        }

        let api_response: ApiResponse =
            response.json().await.map_err(|e| OracleError::ApiError {
                status_code: 200,
                message: format!("Failed to parse response: {e}"),
            })?;

        Self::to_completion(api_response)
    }
}

// --- OpenAI API types (internal) ---

#[derive(Debug, Deserialize)]
struct ApiMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    choices: Vec<ApiChoice>,
    usage: Option<ApiUsage>,
}

#[derive(Debug, Deserialize)]
struct ApiChoice {
    message: ApiMessage,
}

#[derive(Debug, Deserialize)]
struct ApiUsage {
    total_tokens: u32,
}
