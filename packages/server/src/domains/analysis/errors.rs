use std::fmt;

use thiserror::Error;

use crate::domains::analysis::models::Violation;
use crate::kernel::CompletionError;

/// Where an analysis run currently is.
///
/// `Idle → Summarizing → Prompting → AwaitingFreeform → AwaitingStructured →
/// Validated | Failed`. No state is ever revisited; there are no retries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisPhase {
    Idle,
    Summarizing,
    Prompting,
    AwaitingFreeform,
    AwaitingStructured,
    Validated,
    Failed,
}

impl AnalysisPhase {
    pub fn is_terminal(&self) -> bool {
        matches!(self, AnalysisPhase::Validated | AnalysisPhase::Failed)
    }
}

impl fmt::Display for AnalysisPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            AnalysisPhase::Idle => "idle",
            AnalysisPhase::Summarizing => "summarizing",
            AnalysisPhase::Prompting => "prompting",
            AnalysisPhase::AwaitingFreeform => "awaiting free-form answer",
            AnalysisPhase::AwaitingStructured => "awaiting structured answer",
            AnalysisPhase::Validated => "validated",
            AnalysisPhase::Failed => "failed",
        })
    }
}

/// Terminal failure of one analysis run.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// The upload had a header row at most
    #[error("the uploaded CSV has no data rows")]
    EmptyData,

    /// Completion service unreachable, errored or timed out
    #[error("completion service failed while {phase}: {source}")]
    Upstream {
        phase: AnalysisPhase,
        source: CompletionError,
    },

    /// Structured output was not a JSON object at all
    #[error("structured output could not be parsed: {0}")]
    MalformedOutput(String),

    /// Structured output parsed but broke one or more rules
    #[error("structured output failed validation with {} violation(s)", .violations.len())]
    SchemaViolation { violations: Vec<Violation> },
}

impl AnalysisError {
    /// Short stable name for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            AnalysisError::EmptyData => "empty_data",
            AnalysisError::Upstream { .. } => "upstream",
            AnalysisError::MalformedOutput(_) => "malformed_output",
            AnalysisError::SchemaViolation { .. } => "schema_violation",
        }
    }
}
