// Mock implementations for testing
//
// Provides a scripted completion service that can be injected into ServerDeps.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use super::{BaseCompletionService, CompletionError, CompletionRequest, ServerDeps};
use crate::domains::products::ProductCatalog;

// =============================================================================
// Mock Completion Service
// =============================================================================

/// Completion service that replays queued responses in order.
///
/// Once the queue is drained every call returns `"Mock AI response"`.
#[derive(Clone, Default)]
pub struct MockCompletionService {
    responses: Arc<Mutex<VecDeque<Result<String, CompletionError>>>>,
    calls: Arc<Mutex<Vec<CompletionRequest>>>,
    delay: Option<Duration>,
}

impl MockCompletionService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a text response.
    pub fn with_response(self, response: impl Into<String>) -> Self {
        self.responses
            .lock()
            .unwrap()
            .push_back(Ok(response.into()));
        self
    }

    /// Queue a JSON response (will be serialized).
    pub fn with_json_response<T: serde::Serialize>(self, data: &T) -> Self {
        let json = serde_json::to_string(data).expect("Failed to serialize mock response");
        self.with_response(json)
    }

    /// Queue a failure.
    pub fn with_error(self, error: CompletionError) -> Self {
        self.responses.lock().unwrap().push_back(Err(error));
        self
    }

    /// Sleep this long before answering each call.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Every request received, in order.
    pub fn calls(&self) -> Vec<CompletionRequest> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn last_request(&self) -> Option<CompletionRequest> {
        self.calls.lock().unwrap().last().cloned()
    }

    /// Check if any system or user text contained `text`.
    pub fn was_called_with(&self, text: &str) -> bool {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .any(|c| c.system.contains(text) || c.user.contains(text))
    }
}

#[async_trait]
impl BaseCompletionService for MockCompletionService {
    async fn complete(&self, request: CompletionRequest) -> Result<String, CompletionError> {
        self.calls.lock().unwrap().push(request);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let next = self.responses.lock().unwrap().pop_front();
        next.unwrap_or_else(|| Ok("Mock AI response".to_string()))
    }

    fn model_name(&self) -> &str {
        "mock-model"
    }
}

// =============================================================================
// TestDependencies
// =============================================================================

/// ServerDeps wired to mocks, keeping a handle on the mock for assertions.
pub struct TestDependencies {
    pub ai: Arc<MockCompletionService>,
    pub catalog: ProductCatalog,
    pub llm_timeout: Duration,
}

impl TestDependencies {
    pub fn new(ai: MockCompletionService) -> Self {
        Self {
            ai: Arc::new(ai),
            catalog: ProductCatalog::empty(),
            llm_timeout: Duration::from_secs(5),
        }
    }

    pub fn with_catalog(mut self, catalog: ProductCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.llm_timeout = timeout;
        self
    }

    pub fn server_deps(&self) -> ServerDeps {
        ServerDeps::new(
            self.ai.clone(),
            Arc::new(self.catalog.clone()),
            self.llm_timeout,
        )
    }
}
