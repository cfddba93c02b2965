// Page rendering with Askama

use askama::Template;
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use tracing::error;

use crate::domains::analysis::{AnalysisError, AnalysisResponse, GrowthStage};

/// One entry of the growth-stage dropdown.
pub struct StageOption {
    pub value: &'static str,
    pub label: &'static str,
    pub selected: bool,
}

/// Error panel shown above the form.
#[derive(Debug, Clone)]
pub struct PageError {
    pub headline: String,
    pub details: Vec<String>,
}

impl PageError {
    pub fn new(headline: impl Into<String>) -> Self {
        Self {
            headline: headline.into(),
            details: Vec::new(),
        }
    }

    pub fn with_details(mut self, details: Vec<String>) -> Self {
        self.details = details;
        self
    }
}

impl From<&AnalysisError> for PageError {
    fn from(error: &AnalysisError) -> Self {
        match error {
            AnalysisError::EmptyData => {
                PageError::new("No data found in the CSV file. Upload a header row plus at least one reading.")
            }
            AnalysisError::Upstream { source, .. } => {
                PageError::new("The analysis service is unavailable right now. Please try again.")
                    .with_details(vec![source.to_string()])
            }
            AnalysisError::MalformedOutput(reason) => {
                PageError::new("The analysis service returned an unreadable answer.")
                    .with_details(vec![reason.clone()])
            }
            AnalysisError::SchemaViolation { violations } => {
                PageError::new("The analysis service returned an answer that failed validation.")
                    .with_details(violations.iter().map(ToString::to_string).collect())
            }
        }
    }
}

#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub stages: Vec<StageOption>,
    pub growth_stage: Option<String>,
    pub csv_filename: Option<String>,
    pub result: Option<AnalysisResponse>,
    pub error: Option<PageError>,
}

impl IndexTemplate {
    pub fn new(selected: Option<GrowthStage>) -> Self {
        Self {
            stages: GrowthStage::ALL
                .iter()
                .map(|stage| StageOption {
                    value: stage.as_str(),
                    label: stage.label(),
                    selected: Some(*stage) == selected,
                })
                .collect(),
            growth_stage: selected.map(|stage| stage.label().to_string()),
            csv_filename: None,
            result: None,
            error: None,
        }
    }

    pub fn with_filename(mut self, filename: Option<String>) -> Self {
        self.csv_filename = filename;
        self
    }

    pub fn with_result(mut self, result: AnalysisResponse) -> Self {
        self.result = Some(result);
        self
    }

    pub fn with_error(mut self, error: PageError) -> Self {
        self.error = Some(error);
        self
    }

    /// Render with `status`; a template failure becomes a plain 500.
    pub fn into_response_with(self, status: StatusCode) -> Response {
        match self.render() {
            Ok(html) => (status, Html(html)).into_response(),
            Err(e) => {
                error!(error = %e, "Failed to render index page");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Html(format!("Template error: {}", e)),
                )
                    .into_response()
            }
        }
    }
}
