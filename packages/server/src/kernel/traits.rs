// Trait definitions for dependency injection
//
// These are INFRASTRUCTURE traits only - no business logic.
// What to prompt for lives in the domain layer (domains/analysis).

use async_trait::async_trait;
use thiserror::Error;

// =============================================================================
// Completion Service Trait (Infrastructure - Generic LLM capabilities)
// =============================================================================

/// How the completion service should shape its answer.
#[derive(Debug, Clone, PartialEq)]
pub enum CompletionMode {
    /// Unconstrained natural-language text
    Freeform,
    /// JSON conforming to `schema`; the raw JSON text is returned
    Structured {
        name: String,
        schema: serde_json::Value,
    },
}

/// One call to the completion service.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub system: String,
    pub user: String,
    pub mode: CompletionMode,
}

impl CompletionRequest {
    pub fn freeform(system: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            system: system.into(),
            user: user.into(),
            mode: CompletionMode::Freeform,
        }
    }

    pub fn structured(
        system: impl Into<String>,
        user: impl Into<String>,
        name: impl Into<String>,
        schema: serde_json::Value,
    ) -> Self {
        Self {
            system: system.into(),
            user: user.into(),
            mode: CompletionMode::Structured {
                name: name.into(),
                schema,
            },
        }
    }

    pub fn is_structured(&self) -> bool {
        matches!(self.mode, CompletionMode::Structured { .. })
    }
}

/// Failure kinds callers need to tell apart.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompletionError {
    #[error("completion service timed out")]
    Timeout,

    #[error("completion service error: {0}")]
    Service(String),

    #[error("completion service returned malformed output: {0}")]
    MalformedOutput(String),
}

#[async_trait]
pub trait BaseCompletionService: Send + Sync {
    /// Run one completion and return the raw text (JSON text in structured mode).
    async fn complete(&self, request: CompletionRequest) -> Result<String, CompletionError>;

    /// Model identifier, for logs and the health endpoint.
    fn model_name(&self) -> &str {
        "unknown"
    }
}
