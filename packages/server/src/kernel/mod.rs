//! Kernel module - server infrastructure and dependencies.

pub mod ai;
pub mod deps;
pub mod test_dependencies;
pub mod traits;

pub use ai::{GenerationSettings, OpenAiCompletionService};
pub use deps::{ServerDeps, DEFAULT_LLM_TIMEOUT};
pub use test_dependencies::{MockCompletionService, TestDependencies};
pub use traits::*;
