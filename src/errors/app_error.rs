use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::core::generation::{FailureKind, GenerationError};
use crate::core::storage::StorageError;

pub type AppResult<T> = Result<T, AppError>;

/// Errors surfaced by HTTP handlers. Every variant renders as `{"error": ...}`.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    /// Upstream provider failed or was unreachable
    #[error("{0}")]
    BadGateway(String),

    #[error("{0}")]
    Internal(String),

    /// Record could not be persisted under strict persistence; audio may still exist
    #[error("{message}")]
    Persistence {
        message: String,
        audio_path: Option<String>,
    },
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadGateway(_) => StatusCode::BAD_GATEWAY,
            AppError::Internal(_) | AppError::Persistence { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Maps a failed synthesis to the status the caller sees
    pub fn from_synthesis_failure(kind: FailureKind, message: String) -> Self {
        match kind {
            FailureKind::Provider | FailureKind::Network => AppError::BadGateway(message),
            FailureKind::Credentials | FailureKind::Storage | FailureKind::Configuration => {
                AppError::Internal(message)
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = match self {
            AppError::Persistence {
                message,
                audio_path: Some(path),
            } => json!({ "error": message, "audio_path": path }),
            other => json!({ "error": other.to_string() }),
        };
        (status, Json(body)).into_response()
    }
}

impl From<GenerationError> for AppError {
    fn from(err: GenerationError) -> Self {
        match err {
            GenerationError::InvalidInput(message) => AppError::BadRequest(message),
            GenerationError::Persistence { source, audio_path } => AppError::Persistence {
                message: format!("Failed to persist generation: {source}"),
                audio_path,
            },
        }
    }
}

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::InvalidName(name) => {
                AppError::BadRequest(format!("Invalid file name: {name}"))
            }
            StorageError::NotFound(name) => AppError::NotFound(format!("Audio file not found: {name}")),
            other => AppError::Internal(other.to_string()),
        }
    }
}
