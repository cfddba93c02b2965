//! Grow-room analysis: CSV digest, prompt assembly, structured response
//! validation and the two-pass orchestration tying them together.

pub mod activities;
pub mod errors;
pub mod models;

pub use activities::{analyze, analyze_with_deps, summarize_csv, validate};
pub use errors::{AnalysisError, AnalysisPhase};
pub use models::{
    AnalysisResponse, GrowthStage, Priority, ProductLink, Recommendation, Violation,
};
