// Completion service backed by an OpenAI-compatible API
//
// This is the infrastructure implementation of BaseCompletionService.
// Business logic (what to prompt for) lives in domain layers.

use async_trait::async_trait;
use openai_client::{ChatRequest, Message, OpenAIClient, OpenAIError, StructuredRequest};
use tracing::debug;

use super::{BaseCompletionService, CompletionError, CompletionMode, CompletionRequest};

/// Sampling settings for the free-form pass.
#[derive(Debug, Clone)]
pub struct GenerationSettings {
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

#[derive(Clone)]
pub struct OpenAiCompletionService {
    client: OpenAIClient,
    settings: GenerationSettings,
}

impl OpenAiCompletionService {
    pub fn new(client: OpenAIClient, settings: GenerationSettings) -> Self {
        Self { client, settings }
    }
}

impl From<OpenAIError> for CompletionError {
    fn from(err: OpenAIError) -> Self {
        match err {
            OpenAIError::Timeout(_) => CompletionError::Timeout,
            OpenAIError::Parse(msg) => CompletionError::MalformedOutput(msg),
            OpenAIError::Config(msg) | OpenAIError::Network(msg) | OpenAIError::Api(msg) => {
                CompletionError::Service(msg)
            }
        }
    }
}

#[async_trait]
impl BaseCompletionService for OpenAiCompletionService {
    async fn complete(&self, request: CompletionRequest) -> Result<String, CompletionError> {
        let CompletionRequest { system, user, mode } = request;

        match mode {
            CompletionMode::Freeform => {
                let chat = ChatRequest::new(&self.settings.model)
                    .message(Message::system(system))
                    .message(Message::user(user))
                    .temperature(self.settings.temperature)
                    .max_tokens(self.settings.max_tokens);

                let response = self.client.chat_completion(chat).await?;
                if let Some(usage) = &response.usage {
                    debug!(
                        prompt_tokens = usage.prompt_tokens,
                        completion_tokens = usage.completion_tokens,
                        "Free-form completion usage"
                    );
                }
                Ok(response.content)
            }
            CompletionMode::Structured { name, schema } => {
                // Structured answers restate the whole analysis; give them room.
                let request = StructuredRequest::new(&self.settings.model, system, user, schema)
                    .schema_name(name)
                    .max_tokens(self.settings.max_tokens.saturating_mul(2));

                Ok(self.client.structured_output(request).await?)
            }
        }
    }

    fn model_name(&self) -> &str {
        &self.settings.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_client_errors_to_distinguishable_kinds() {
        assert_eq!(
            CompletionError::from(OpenAIError::Timeout("30s".into())),
            CompletionError::Timeout
        );
        assert!(matches!(
            CompletionError::from(OpenAIError::Parse("bad json".into())),
            CompletionError::MalformedOutput(_)
        ));
        assert!(matches!(
            CompletionError::from(OpenAIError::Api("429".into())),
            CompletionError::Service(_)
        ));
        assert!(matches!(
            CompletionError::from(OpenAIError::Network("refused".into())),
            CompletionError::Service(_)
        ));
    }

    #[test]
    fn reports_configured_model() {
        let service = OpenAiCompletionService::new(
            OpenAIClient::new("sk-test"),
            GenerationSettings {
                model: "gemini-2.5-flash-lite".into(),
                temperature: 0.7,
                max_tokens: 500,
            },
        );
        assert_eq!(service.model_name(), "gemini-2.5-flash-lite");
    }
}
