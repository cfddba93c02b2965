//! End-to-end analysis of one upload.
//!
//! Two completion calls, strictly sequential:
//! 1. free-form: the model reads the digest and writes its advice
//! 2. structured: the model re-emits that advice as `AnalysisResponse` JSON
//!
//! The structured result is validated all-or-nothing. Every error is terminal
//! for the request; retrying is the caller's business.

use std::time::{Duration, Instant};

use openai_client::strip_code_blocks;
use serde_json::Value;
use tracing::{debug, info, warn};

use super::csv_digest::parse_csv;
use super::prompts::{build_prompts, build_restructure_prompts};
use super::validation::validate;
use crate::domains::analysis::errors::{AnalysisError, AnalysisPhase};
use crate::domains::analysis::models::{AnalysisResponse, GrowthStage};
use crate::domains::products::ProductCatalog;
use crate::kernel::{BaseCompletionService, CompletionError, CompletionRequest, ServerDeps};

/// Schema name reported in structured mode.
const SCHEMA_NAME: &str = "AnalysisResponse";

struct PhaseTracker {
    stage: GrowthStage,
    phase: AnalysisPhase,
}

impl PhaseTracker {
    fn new(stage: GrowthStage) -> Self {
        Self {
            stage,
            phase: AnalysisPhase::Idle,
        }
    }

    fn enter(&mut self, next: AnalysisPhase) {
        debug!(stage = %self.stage, from = %self.phase, to = %next, "Analysis phase change");
        self.phase = next;
    }

    fn fail(&mut self, error: AnalysisError) -> AnalysisError {
        warn!(
            stage = %self.stage,
            phase = %self.phase,
            kind = error.kind(),
            error = %error,
            "Analysis failed"
        );
        self.phase = AnalysisPhase::Failed;
        error
    }
}

/// Analyze `csv_text` for `stage`.
///
/// Zero data rows fail with [`AnalysisError::EmptyData`] before any upstream
/// call. Each completion call is bounded by `timeout`.
pub async fn analyze(
    stage: GrowthStage,
    csv_text: &str,
    catalog: Option<&ProductCatalog>,
    ai: &dyn BaseCompletionService,
    timeout: Duration,
) -> Result<AnalysisResponse, AnalysisError> {
    let started = Instant::now();
    let mut tracker = PhaseTracker::new(stage);

    tracker.enter(AnalysisPhase::Summarizing);
    let parsed = parse_csv(csv_text);
    if parsed.is_empty() {
        return Err(tracker.fail(AnalysisError::EmptyData));
    }
    let digest = parsed.digest();

    tracker.enter(AnalysisPhase::Prompting);
    let prompts = build_prompts(stage, &digest, catalog);

    tracker.enter(AnalysisPhase::AwaitingFreeform);
    let freeform = call(
        ai,
        CompletionRequest::freeform(prompts.system, prompts.user),
        timeout,
    )
    .await
    .and_then(|text| {
        if text.trim().is_empty() {
            Err(CompletionError::MalformedOutput("empty free-form answer".into()))
        } else {
            Ok(text)
        }
    })
    .map_err(|source| {
        tracker.fail(AnalysisError::Upstream {
            phase: AnalysisPhase::AwaitingFreeform,
            source,
        })
    })?;

    tracker.enter(AnalysisPhase::AwaitingStructured);
    let restructure = build_restructure_prompts(&freeform);
    let raw = call(
        ai,
        CompletionRequest::structured(
            restructure.system,
            restructure.user,
            SCHEMA_NAME,
            AnalysisResponse::json_schema(),
        ),
        timeout,
    )
    .await
    .map_err(|source| {
        tracker.fail(match source {
            CompletionError::MalformedOutput(reason) => AnalysisError::MalformedOutput(reason),
            source => AnalysisError::Upstream {
                phase: AnalysisPhase::AwaitingStructured,
                source,
            },
        })
    })?;

    let response = parse_structured_output(&raw).map_err(|e| tracker.fail(e))?;
    tracker.enter(AnalysisPhase::Validated);

    info!(
        stage = %stage,
        readings = parsed.len(),
        recommendations = response.recommendations().len(),
        duration_ms = started.elapsed().as_millis(),
        "Analysis complete"
    );

    Ok(response)
}

/// [`analyze`] using the shared catalog and timeout from `deps`.
pub async fn analyze_with_deps(
    stage: GrowthStage,
    csv_text: &str,
    deps: &ServerDeps,
) -> Result<AnalysisResponse, AnalysisError> {
    analyze(
        stage,
        csv_text,
        Some(deps.catalog.as_ref()),
        deps.ai.as_ref(),
        deps.llm_timeout,
    )
    .await
}

/// Parse and validate structured-mode text.
///
/// Also accepts free text that consists of the JSON object, optionally
/// wrapped in a markdown fence.
pub fn parse_structured_output(raw: &str) -> Result<AnalysisResponse, AnalysisError> {
    let candidate: Value = serde_json::from_str(strip_code_blocks(raw))
        .map_err(|e| AnalysisError::MalformedOutput(e.to_string()))?;

    if !candidate.is_object() {
        return Err(AnalysisError::MalformedOutput(
            "expected a JSON object".to_string(),
        ));
    }

    validate(&candidate).map_err(|violations| AnalysisError::SchemaViolation { violations })
}

async fn call(
    ai: &dyn BaseCompletionService,
    request: CompletionRequest,
    timeout: Duration,
) -> Result<String, CompletionError> {
    let structured = request.is_structured();
    let started = Instant::now();

    let result = match tokio::time::timeout(timeout, ai.complete(request)).await {
        Ok(result) => result,
        Err(_) => Err(CompletionError::Timeout),
    };

    debug!(
        model = ai.model_name(),
        structured,
        ok = result.is_ok(),
        duration_ms = started.elapsed().as_millis(),
        "Completion call finished"
    );
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::analysis::models::Violation;

    const VALID: &str = r#"{
        "summary": "Humidity is high for flowering.",
        "recommendations": [
            {"title": "Add a Dehumidifier", "description": "Bring RH to 40-50%", "priority": "high",
             "product": {"name": "Dehumidifier", "url": "https://htgsupply.com/products/dehu", "price_range": null}},
            {"title": "Raise Temperature", "description": "Aim for 75F", "priority": "medium", "product": null}
        ]
    }"#;

    #[test]
    fn parses_fenced_json() {
        let fenced = format!("```json\n{}\n```", VALID);
        let response = parse_structured_output(&fenced).unwrap();
        assert_eq!(response.summary(), "Humidity is high for flowering.");
        assert_eq!(response.recommendations().len(), 2);
    }

    #[test]
    fn non_json_is_malformed() {
        assert!(matches!(
            parse_structured_output("Sure! Here are my thoughts"),
            Err(AnalysisError::MalformedOutput(_))
        ));
        assert!(matches!(
            parse_structured_output("[1, 2]"),
            Err(AnalysisError::MalformedOutput(_))
        ));
    }

    #[test]
    fn parsed_but_invalid_is_a_schema_violation() {
        let err = parse_structured_output(r#"{"summary": "x", "recommendations": []}"#).unwrap_err();
        match err {
            AnalysisError::SchemaViolation { violations } => {
                assert!(matches!(violations[0], Violation::InvalidLength { actual: 0, .. }));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn phases_end_in_terminal_states() {
        assert!(AnalysisPhase::Validated.is_terminal());
        assert!(AnalysisPhase::Failed.is_terminal());
        assert!(!AnalysisPhase::AwaitingStructured.is_terminal());
    }
}
