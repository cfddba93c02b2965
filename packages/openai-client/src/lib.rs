//! Minimal client for OpenAI-compatible chat completion APIs
//!
//! No domain logic lives here. Works against OpenAI itself or any provider that
//! exposes the same `/chat/completions` surface (Gemini's OpenAI-compatible
//! endpoint, local proxies, ...).
//!
//! # Example
//!
//! ```rust,ignore
//! use openai_client::{OpenAIClient, ChatRequest, Message};
//!
//! let client = OpenAIClient::new(api_key).with_timeout(Duration::from_secs(30));
//!
//! let response = client.chat_completion(
//!     ChatRequest::new("gpt-4o-mini")
//!         .message(Message::system("You are a grow-room assistant"))
//!         .message(Message::user("Is 65% humidity fine for flowering?")),
//! ).await?;
//! ```
//!
//! # Type-Safe Structured Output
//!
//! ```rust,ignore
//! use schemars::JsonSchema;
//! use serde::Deserialize;
//!
//! #[derive(Deserialize, JsonSchema)]
//! struct Verdict {
//!     ok: bool,
//!     reason: String,
//! }
//!
//! let verdict: Verdict = client
//!     .extract::<Verdict>("gpt-4o-mini", system_prompt, user_prompt)
//!     .await?;
//! ```

pub mod error;
pub mod schema;
pub mod types;

pub use error::{OpenAIError, Result};
pub use schema::StructuredOutput;
pub use types::*;

use std::time::Duration;

use reqwest::Client;
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, warn};

/// Default upstream timeout applied to every request.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Client for an OpenAI-compatible chat completion API.
#[derive(Clone)]
pub struct OpenAIClient {
    http_client: Client,
    api_key: String,
    base_url: String,
    timeout: Duration,
}

impl OpenAIClient {
    /// Create a new client with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            http_client: Client::new(),
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Set a custom base URL (Gemini compatibility layer, proxies, etc.).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Set the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Type-safe structured output extraction.
    ///
    /// Generates a strict JSON schema from `T`, sends it as the response format
    /// and deserializes the reply.
    pub async fn extract<T: StructuredOutput + DeserializeOwned>(
        &self,
        model: &str,
        system_prompt: impl Into<String>,
        user_prompt: impl Into<String>,
    ) -> Result<T> {
        let schema = T::openai_schema();

        debug!(type_name = T::type_name(), "Generated strict schema for extraction");

        let request = StructuredRequest::new(model, system_prompt, user_prompt, schema)
            .schema_name(T::type_name());
        let json_str = self.structured_output(request).await?;

        serde_json::from_str(strip_code_blocks(&json_str))
            .map_err(|e| OpenAIError::Parse(format!("Failed to deserialize response: {}", e)))
    }

    /// Chat completion.
    pub async fn chat_completion(&self, request: ChatRequest) -> Result<ChatResponse> {
        let start = std::time::Instant::now();
        let raw = self.post_chat(&request).await?;
        let usage = raw.usage.clone();
        let content = first_content(raw)?;

        debug!(
            model = %request.model,
            duration_ms = start.elapsed().as_millis(),
            "Chat completion finished"
        );

        Ok(ChatResponse { content, usage })
    }

    /// Structured output with JSON schema.
    ///
    /// Uses the `json_schema` response format; returns the raw JSON text.
    pub async fn structured_output(&self, request: StructuredRequest) -> Result<String> {
        let start = std::time::Instant::now();
        let raw = self.post_chat(&request).await?;
        let content = first_content(raw)?;

        debug!(
            model = %request.model,
            schema = %request.response_format.json_schema.name,
            duration_ms = start.elapsed().as_millis(),
            "Structured completion finished"
        );

        Ok(content)
    }

    async fn post_chat<B: Serialize>(&self, body: &B) -> Result<ChatResponseRaw> {
        let response = self
            .http_client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .timeout(self.timeout)
            .json(body)
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "Chat completion request failed");
                OpenAIError::from(e)
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            warn!(status = %status, error = %error_text, "Chat completion API error");
            return Err(OpenAIError::Api(format!("{}: {}", status, error_text)));
        }

        response.json::<ChatResponseRaw>().await.map_err(|e| {
            if e.is_timeout() {
                OpenAIError::Timeout(e.to_string())
            } else {
                OpenAIError::Parse(e.to_string())
            }
        })
    }
}

fn first_content(raw: ChatResponseRaw) -> Result<String> {
    raw.choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .ok_or_else(|| OpenAIError::Api("Completion returned no content".into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_builder() {
        let client = OpenAIClient::new("sk-test")
            .with_base_url("https://generativelanguage.googleapis.com/v1beta/openai/")
            .with_timeout(Duration::from_secs(5));

        assert_eq!(client.api_key(), "sk-test");
        assert_eq!(
            client.base_url(),
            "https://generativelanguage.googleapis.com/v1beta/openai"
        );
        assert_eq!(client.timeout(), Duration::from_secs(5));
    }

    #[test]
    fn test_defaults() {
        let client = OpenAIClient::new("sk-test");
        assert_eq!(client.base_url(), "https://api.openai.com/v1");
        assert_eq!(client.timeout(), DEFAULT_TIMEOUT);
    }

    #[test]
    fn test_first_content_requires_a_choice() {
        let raw: ChatResponseRaw = serde_json::from_str(r#"{"choices": []}"#).unwrap();
        assert!(matches!(first_content(raw), Err(OpenAIError::Api(_))));

        let raw: ChatResponseRaw = serde_json::from_str(
            r#"{"choices": [{"message": {"content": null}}], "usage": null}"#,
        )
        .unwrap();
        assert!(first_content(raw).is_err());

        let raw: ChatResponseRaw =
            serde_json::from_str(r#"{"choices": [{"message": {"content": "hi"}}]}"#).unwrap();
        assert_eq!(first_content(raw).unwrap(), "hi");
    }

    #[derive(serde::Deserialize, schemars::JsonSchema)]
    #[allow(dead_code)]
    struct Verdict {
        ok: bool,
    }

    #[test]
    fn test_unreachable_endpoint_is_a_network_error() {
        let client = OpenAIClient::new("sk-test")
            .with_base_url("http://127.0.0.1:9")
            .with_timeout(Duration::from_secs(2));

        let result = tokio_test::block_on(client.extract::<Verdict>("gpt-4o-mini", "system", "user"));
        assert!(matches!(
            result,
            Err(OpenAIError::Network(_)) | Err(OpenAIError::Timeout(_))
        ));
    }
}
