//! Server dependencies shared by every request.
//!
//! Constructed once at startup and handed to handlers behind an `Arc`. Nothing
//! in here is mutated after construction.

use std::sync::Arc;
use std::time::Duration;

use crate::domains::products::ProductCatalog;
use crate::kernel::BaseCompletionService;

/// Default bound on a single completion call.
pub const DEFAULT_LLM_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Clone)]
pub struct ServerDeps {
    /// Completion service used for both analysis passes
    pub ai: Arc<dyn BaseCompletionService>,
    /// Read-only product catalog, possibly empty
    pub catalog: Arc<ProductCatalog>,
    /// Upper bound on each completion call
    pub llm_timeout: Duration,
}

impl ServerDeps {
    pub fn new(
        ai: Arc<dyn BaseCompletionService>,
        catalog: Arc<ProductCatalog>,
        llm_timeout: Duration,
    ) -> Self {
        Self {
            ai,
            catalog,
            llm_timeout,
        }
    }
}
