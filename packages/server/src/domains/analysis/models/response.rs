//! Structured analysis returned to the grower.
//!
//! These types double as the JSON schema sent to the completion service in
//! structured mode, so field docs are written for the model.

use std::fmt;
use std::str::FromStr;

use openai_client::StructuredOutput;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::violation::Violation;
use crate::domains::analysis::activities::validation;

/// Priority level of a recommendation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = ();

    /// Case-sensitive: only the exact lowercase names are accepted.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "high" => Ok(Priority::High),
            "medium" => Ok(Priority::Medium),
            "low" => Ok(Priority::Low),
            _ => Err(()),
        }
    }
}

/// A product recommendation with purchase link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, JsonSchema)]
pub struct ProductLink {
    /// Product name
    pub name: String,
    /// Full http(s) URL where the product can be bought
    pub url: String,
    /// Estimated price range (e.g., '$40-50')
    pub price_range: Option<String>,
}

/// A single actionable recommendation for grow optimization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, JsonSchema)]
pub struct Recommendation {
    /// Short, actionable title for the recommendation
    pub title: String,
    /// Detailed explanation of the recommendation and why it helps
    pub description: String,
    /// Priority level based on impact on plant health
    pub priority: Priority,
    /// Optional product recommendation to implement this suggestion
    pub product: Option<ProductLink>,
}

/// Complete analysis: summary plus 2-3 recommendations, at least one of which
/// links a product.
///
/// Only obtainable through validation, so every instance satisfies the
/// contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, JsonSchema)]
pub struct AnalysisResponse {
    /// Brief overview of the current environmental conditions and main issues
    summary: String,
    /// Between 2-3 actionable recommendations
    #[schemars(length(min = 2, max = 3))]
    recommendations: Vec<Recommendation>,
}

impl AnalysisResponse {
    pub const MIN_RECOMMENDATIONS: usize = 2;
    pub const MAX_RECOMMENDATIONS: usize = 3;

    /// Build and validate in one step.
    pub fn new(
        summary: impl Into<String>,
        recommendations: Vec<Recommendation>,
    ) -> Result<Self, Vec<Violation>> {
        let candidate = serde_json::json!({
            "summary": summary.into(),
            "recommendations": recommendations,
        });
        validation::validate(&candidate)
    }

    /// Assemble from parts that already passed validation.
    pub(crate) fn from_validated(summary: String, recommendations: Vec<Recommendation>) -> Self {
        Self {
            summary,
            recommendations,
        }
    }

    pub fn summary(&self) -> &str {
        &self.summary
    }

    pub fn recommendations(&self) -> &[Recommendation] {
        &self.recommendations
    }

    /// Strict JSON schema for structured-mode completions.
    pub fn json_schema() -> serde_json::Value {
        <Self as StructuredOutput>::openai_schema()
    }
}
