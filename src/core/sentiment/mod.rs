//! Sentiment classification.
//!
//! A [`SentimentClassifier`] turns input text into a three-way
//! [`SentimentScores`] vector. The classifier is built once at startup by
//! [`build_classifier`], which never fails: when the configured backend cannot
//! be constructed the gateway falls back to [`DisabledClassifier`] and reports
//! the reason through [`ClassifierStatus`].
//!
//! # Backends
//!
//! | Backend       | Module          | Notes                                         |
//! |---------------|-----------------|-----------------------------------------------|
//! | `huggingface` | [`huggingface`] | Hosted inference endpoint, default            |
//! | `onnx`        | `onnx`          | Local inference, `sentiment-onnx` feature only |
//! | `disabled`    | this module     | Every request degrades to zero scores         |

use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{info, warn};

use crate::core::emotion::SentimentScores;

pub mod assets;
pub mod config;
pub mod huggingface;
#[cfg(feature = "sentiment-onnx")]
pub mod onnx;
#[cfg(not(feature = "sentiment-onnx"))]
mod stub;

pub use config::{SentimentBackend, SentimentConfig};
pub use huggingface::HuggingFaceClassifier;
#[cfg(feature = "sentiment-onnx")]
pub use onnx::OnnxSentimentClassifier;
#[cfg(not(feature = "sentiment-onnx"))]
pub use stub::OnnxSentimentClassifier;

/// Errors raised while classifying text
#[derive(Error, Debug)]
pub enum SentimentError {
    /// Backend is not loaded or refused to serve
    #[error("Sentiment backend unavailable: {0}")]
    Unavailable(String),

    /// Transport failure talking to a remote backend
    #[error("Sentiment request failed: {0}")]
    Request(String),

    /// Backend answered with something we could not interpret
    #[error("Unexpected sentiment response: {0}")]
    Response(String),

    /// Local model failed to load or run
    #[error("Sentiment model error: {0}")]
    Model(String),

    #[error("Tokenizer error: {0}")]
    Tokenizer(String),
}

/// Produces sentiment scores for a piece of text.
#[async_trait]
pub trait SentimentClassifier: Send + Sync {
    async fn classify(&self, text: &str) -> Result<SentimentScores, SentimentError>;

    /// Backend identifier used in logs and health output
    fn backend(&self) -> &'static str;
}

/// Shared, type-erased classifier handle
pub type BoxedClassifier = Arc<dyn SentimentClassifier>;

/// Classifier used when no backend could be loaded
pub struct DisabledClassifier {
    reason: String,
}

impl DisabledClassifier {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

#[async_trait]
impl SentimentClassifier for DisabledClassifier {
    async fn classify(&self, _text: &str) -> Result<SentimentScores, SentimentError> {
        Err(SentimentError::Unavailable(self.reason.clone()))
    }

    fn backend(&self) -> &'static str {
        "disabled"
    }
}

/// Startup outcome of classifier construction, exposed on `/health`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassifierStatus {
    /// Backend that was requested in configuration
    pub backend: SentimentBackend,
    /// Whether that backend is actually serving
    pub ready: bool,
    /// Why the backend is not ready, when it is not
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl ClassifierStatus {
    fn ready(backend: SentimentBackend) -> Self {
        Self {
            backend,
            ready: true,
            detail: None,
        }
    }

    fn unavailable(backend: SentimentBackend, detail: impl Into<String>) -> Self {
        Self {
            backend,
            ready: false,
            detail: Some(detail.into()),
        }
    }
}

/// Upper bound on the startup classification against a hosted endpoint
const WARMUP_TIMEOUT: Duration = Duration::from_secs(10);
const WARMUP_TEXT: &str = "Hello";

/// Readiness of a hosted backend. Not ready without an API key; otherwise
/// one classification is attempted and its outcome recorded.
async fn hosted_status(
    config: &SentimentConfig,
    classifier: &dyn SentimentClassifier,
) -> ClassifierStatus {
    let backend = config.backend;
    let has_key = config
        .api_key
        .as_deref()
        .is_some_and(|key| !key.trim().is_empty());
    if !has_key {
        return ClassifierStatus::unavailable(
            backend,
            "HUGGINGFACE_API_KEY is not set; the inference endpoint may reject anonymous requests",
        );
    }

    match tokio::time::timeout(WARMUP_TIMEOUT, classifier.classify(WARMUP_TEXT)).await {
        Ok(Ok(_)) => ClassifierStatus::ready(backend),
        Ok(Err(e)) => ClassifierStatus::unavailable(backend, format!("Warm-up failed: {e}")),
        Err(_) => ClassifierStatus::unavailable(
            backend,
            format!("Warm-up timed out after {}s", WARMUP_TIMEOUT.as_secs()),
        ),
    }
}

/// Construct the configured classifier, falling back to [`DisabledClassifier`].
///
/// A hosted classifier that fails its readiness check is still returned, so
/// requests keep trying it; the failure is only reflected in the status.
pub async fn build_classifier(config: &SentimentConfig) -> (BoxedClassifier, ClassifierStatus) {
    let backend = config.backend;

    let built: Result<BoxedClassifier, String> = match backend {
        SentimentBackend::HuggingFace => HuggingFaceClassifier::new(config)
            .map(|c| {
                info!(url = c.url(), "Using hosted sentiment inference");
                Arc::new(c) as BoxedClassifier
            })
            .map_err(|e| e.to_string()),
        SentimentBackend::Onnx => OnnxSentimentClassifier::new(config)
            .await
            .map(|c| Arc::new(c) as BoxedClassifier)
            .map_err(|e| e.to_string()),
        SentimentBackend::Disabled => Err("Sentiment classification disabled".to_string()),
    };

    match built {
        Ok(classifier) => {
            let status = match backend {
                SentimentBackend::HuggingFace => hosted_status(config, classifier.as_ref()).await,
                _ => ClassifierStatus::ready(backend),
            };
            match &status.detail {
                None => info!(backend = %backend, "Sentiment classifier ready"),
                Some(detail) => warn!(backend = %backend, "Sentiment classifier not ready: {}", detail),
            }
            (classifier, status)
        }
        Err(reason) => {
            if backend != SentimentBackend::Disabled {
                warn!(backend = %backend, "Sentiment classifier unavailable: {}", reason);
            }
            (
                Arc::new(DisabledClassifier::new(reason.clone())),
                ClassifierStatus::unavailable(backend, reason),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_disabled_backend() {
        let config = SentimentConfig {
            backend: SentimentBackend::Disabled,
            ..Default::default()
        };
        let (classifier, status) = build_classifier(&config).await;
        assert_eq!(classifier.backend(), "disabled");
        assert!(!status.ready);
        assert!(matches!(
            classifier.classify("hi").await,
            Err(SentimentError::Unavailable(_))
        ));
    }

    fn hosted_config(server: &MockServer, api_key: Option<&str>) -> SentimentConfig {
        SentimentConfig {
            backend: SentimentBackend::HuggingFace,
            api_url: server.uri(),
            model_id: "test/model".to_string(),
            api_key: api_key.map(str::to_string),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_huggingface_without_key_not_ready() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let (classifier, status) = build_classifier(&hosted_config(&server, None)).await;
        // Still attempted per request; only the status reflects the missing key
        assert_eq!(classifier.backend(), "huggingface");
        assert_eq!(status.backend, SentimentBackend::HuggingFace);
        assert!(!status.ready);
        assert!(status.detail.unwrap().contains("HUGGINGFACE_API_KEY"));
    }

    #[tokio::test]
    async fn test_huggingface_warmup_success_is_ready() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/test/model"))
            .and(header("authorization", "Bearer hf_test"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"label": "LABEL_0", "score": 0.1},
                {"label": "LABEL_1", "score": 0.7},
                {"label": "LABEL_2", "score": 0.2}
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let (classifier, status) = build_classifier(&hosted_config(&server, Some("hf_test"))).await;
        assert_eq!(classifier.backend(), "huggingface");
        assert_eq!(status, ClassifierStatus::ready(SentimentBackend::HuggingFace));
    }

    #[tokio::test]
    async fn test_huggingface_warmup_rejected_is_not_ready() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(401).set_body_json(json!({"error": "Invalid credentials"})),
            )
            .mount(&server)
            .await;

        let (classifier, status) = build_classifier(&hosted_config(&server, Some("bad"))).await;
        assert_eq!(classifier.backend(), "huggingface");
        assert!(!status.ready);
        let detail = status.detail.unwrap();
        assert!(detail.contains("401"));
        assert!(detail.contains("Invalid credentials"));
    }

    #[tokio::test]
    async fn test_onnx_without_assets_falls_back() {
        let temp_dir = tempfile::tempdir().unwrap();
        let config = SentimentConfig {
            backend: SentimentBackend::Onnx,
            cache_path: Some(temp_dir.path().to_path_buf()),
            ..Default::default()
        };
        let (classifier, status) = build_classifier(&config).await;
        assert_eq!(classifier.backend(), "disabled");
        assert_eq!(status.backend, SentimentBackend::Onnx);
        assert!(!status.ready);
        assert!(status.detail.is_some());
    }

    #[test]
    fn test_status_serialization() {
        let status = ClassifierStatus::unavailable(SentimentBackend::Onnx, "missing model");
        let json = serde_json::to_value(&status).unwrap();
        assert_eq!(json["backend"], "onnx");
        assert_eq!(json["ready"], false);
        assert_eq!(json["detail"], "missing model");

        let json = serde_json::to_value(ClassifierStatus::ready(SentimentBackend::HuggingFace))
            .unwrap();
        assert!(json.get("detail").is_none());
    }
}
