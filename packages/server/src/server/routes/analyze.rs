use axum::{
    extract::{multipart::MultipartError, Extension, Multipart},
    http::StatusCode,
    response::Response,
};
use tracing::{info, warn};

use crate::domains::analysis::{analyze_with_deps, AnalysisError, GrowthStage};
use crate::server::app::AppState;
use crate::server::pages::{IndexTemplate, PageError};

/// Fields read from the upload form.
#[derive(Debug, Default)]
struct UploadForm {
    growth_stage: Option<String>,
    csv_filename: Option<String>,
    csv_text: Option<String>,
}

/// Empty upload form
pub async fn index_handler() -> Response {
    IndexTemplate::new(None).into_response_with(StatusCode::OK)
}

/// Run one analysis from a multipart upload (`growth_stage`, `csv_file`)
pub async fn analyze_handler(
    Extension(state): Extension<AppState>,
    mut multipart: Multipart,
) -> Response {
    let form = match read_upload(&mut multipart).await {
        Ok(form) => form,
        Err(e) => {
            warn!(error = %e, "Rejected unreadable upload");
            return IndexTemplate::new(None)
                .with_error(PageError::new("We couldn't read your upload.").with_details(vec![e.body_text()]))
                .into_response_with(e.status());
        }
    };

    let stage = match form.growth_stage.as_deref().map(str::parse::<GrowthStage>) {
        Some(Ok(stage)) => stage,
        Some(Err(e)) => {
            return IndexTemplate::new(None)
                .with_filename(form.csv_filename)
                .with_error(PageError::new(e.to_string()))
                .into_response_with(StatusCode::BAD_REQUEST);
        }
        None => {
            return IndexTemplate::new(None)
                .with_filename(form.csv_filename)
                .with_error(PageError::new("Please choose a growth stage."))
                .into_response_with(StatusCode::BAD_REQUEST);
        }
    };

    let page = IndexTemplate::new(Some(stage)).with_filename(form.csv_filename.clone());

    let Some(csv_text) = form.csv_text else {
        return page
            .with_error(PageError::new("Please attach a CSV file."))
            .into_response_with(StatusCode::BAD_REQUEST);
    };

    info!(
        stage = %stage,
        filename = form.csv_filename.as_deref().unwrap_or("<unnamed>"),
        bytes = csv_text.len(),
        "Analysis requested"
    );

    match analyze_with_deps(stage, &csv_text, &state.deps).await {
        Ok(result) => page.with_result(result).into_response_with(StatusCode::OK),
        Err(e) => page
            .with_error(PageError::from(&e))
            .into_response_with(status_for(&e)),
    }
}

/// HTTP status for a failed analysis
pub fn status_for(error: &AnalysisError) -> StatusCode {
    match error {
        AnalysisError::EmptyData => StatusCode::UNPROCESSABLE_ENTITY,
        AnalysisError::Upstream { .. } => StatusCode::SERVICE_UNAVAILABLE,
        AnalysisError::MalformedOutput(_) | AnalysisError::SchemaViolation { .. } => {
            StatusCode::BAD_GATEWAY
        }
    }
}

async fn read_upload(multipart: &mut Multipart) -> Result<UploadForm, MultipartError> {
    let mut form = UploadForm::default();

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("growth_stage") => form.growth_stage = Some(field.text().await?),
            Some("csv_file") => {
                form.csv_filename = field.file_name().map(str::to_string);
                let bytes = field.bytes().await?;
                // Undecodable bytes are replaced rather than rejected
                form.csv_text = Some(String::from_utf8_lossy(&bytes).into_owned());
            }
            _ => {}
        }
    }

    Ok(form)
}
