use axum::{
    extract::{Form, State, rejection::FormRejection},
    http::{HeaderName, HeaderValue},
    response::{IntoResponse, Json, Response},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

use crate::core::emotion::{EmotionLabel, SentimentScores};
use crate::core::generation::SynthesisOutcome;
use crate::errors::app_error::{AppError, AppResult};
use crate::state::AppState;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Form body of `POST /generate`. Both fields are required; absence is
/// reported by the generation service rather than by the extractor.
#[derive(Debug, Deserialize)]
pub struct GenerateForm {
    pub text: Option<String>,
    pub emotion: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    pub text: String,
    pub scores: SentimentScores,
    pub detected_emotion: EmotionLabel,
    /// Caller-selected label, echoed verbatim
    pub emotion: String,
    pub audio_path: String,
}

/// Classify, synthesize and store speech for the submitted text
pub async fn generate_handler(
    State(state): State<Arc<AppState>>,
    form: Result<Form<GenerateForm>, FormRejection>,
) -> AppResult<Response> {
    let Form(form) = form.map_err(|e| {
        debug!("Rejected /generate body: {}", e);
        AppError::BadRequest(format!("Invalid form body: {}", e.body_text()))
    })?;

    let result = state
        .generation
        .handle(form.text.as_deref(), form.emotion.as_deref())
        .await?;

    let path = match result.outcome {
        SynthesisOutcome::Audio { path } => path,
        SynthesisOutcome::Failed { kind, message } => {
            return Err(AppError::from_synthesis_failure(kind, message));
        }
    };

    let mut response = Json(GenerateResponse {
        text: result.text,
        scores: result.scores,
        detected_emotion: result.detected_emotion,
        emotion: result.selected_emotion,
        audio_path: path,
    })
    .into_response();

    if let Ok(value) = HeaderValue::from_str(&result.id.to_string()) {
        response
            .headers_mut()
            .insert(HeaderName::from_static(REQUEST_ID_HEADER), value);
    }

    Ok(response)
}
