use axum::{
    extract::State,
    response::{Html, Json},
};
use serde::Serialize;
use std::sync::Arc;

use crate::core::emotion::EmotionLabel;
use crate::core::sentiment::ClassifierStatus;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct SynthesizerStatus {
    pub provider: &'static str,
    pub configured: bool,
}

#[derive(Debug, Serialize)]
pub struct StorageStatus {
    /// `local`, `s3` or `memory`
    pub backend: &'static str,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub classifier: ClassifierStatus,
    pub synthesizer: SynthesizerStatus,
    pub storage: StorageStatus,
}

/// Liveness plus the startup status of each collaborator.
///
/// Always 200: an unavailable classifier degrades requests rather than failing them.
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "OK",
        classifier: state.classifier_status.clone(),
        synthesizer: SynthesizerStatus {
            provider: state.synthesizer.provider_name(),
            configured: state.synthesizer.has_credentials(),
        },
        storage: StorageStatus {
            backend: state.generation.audio_store().backend(),
        },
    })
}

/// Minimal page with a form posting to `/generate`
pub async fn index() -> Html<String> {
    let options: String = EmotionLabel::all()
        .iter()
        .map(|label| format!("<option value=\"{label}\">{label}</option>"))
        .collect::<Vec<_>>()
        .join("\n        ");

    Html(format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <title>Emotion TTS</title>
</head>
<body>
  <h1>Emotion TTS</h1>
  <form method="post" action="/generate">
    <textarea name="text" rows="4" cols="60" placeholder="Type something..."></textarea>
    <br>
    <select name="emotion">
        {options}
    </select>
    <button type="submit">Generate</button>
  </form>
</body>
</html>
"#
    ))
}
