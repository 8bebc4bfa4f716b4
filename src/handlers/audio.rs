use axum::{
    extract::{Path, State},
    http::{HeaderMap, HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::core::storage::StorageError;
use crate::errors::app_error::{AppError, AppResult};
use crate::state::AppState;

const CONTENT_TYPE: &str = "audio/mpeg";

/// Serve a previously generated audio file by name
pub async fn serve_audio(
    State(state): State<Arc<AppState>>,
    Path(file_name): Path<String>,
) -> AppResult<Response> {
    let body = match state.generation.audio_store().load(&file_name).await {
        Ok(bytes) => bytes,
        Err(StorageError::Backend(e)) => {
            warn!("Failed to read audio {} from storage: {:?}", file_name, e);
            return Err(AppError::Internal(
                "Failed to read audio from storage".to_string(),
            ));
        }
        Err(e) => return Err(e.into()),
    };

    debug!("Serving audio {} ({} bytes)", file_name, body.len());

    let mut headers = HeaderMap::new();
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(CONTENT_TYPE));
    if let Ok(len) = HeaderValue::from_str(&body.len().to_string()) {
        headers.insert(header::CONTENT_LENGTH, len);
    }

    Ok((StatusCode::OK, headers, body).into_response())
}
