//! Remote sentiment classification through a Hugging Face inference endpoint.
//!
//! The endpoint returns one score per label, either nested one level
//! (`[[{label, score}, ...]]`) or flat (`[{label, score}, ...]`). Labels are
//! `LABEL_0/1/2` for the original RoBERTa checkpoint or
//! `negative/neutral/positive` for newer exports.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, warn};

use super::config::SentimentConfig;
use super::{SentimentClassifier, SentimentError};
use crate::core::emotion::SentimentScores;

#[derive(Debug, Deserialize)]
struct LabelScore {
    label: String,
    score: f32,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum InferenceResponse {
    Nested(Vec<Vec<LabelScore>>),
    Flat(Vec<LabelScore>),
}

#[derive(Debug, Deserialize)]
struct InferenceError {
    error: String,
}

/// Sentiment classifier calling a hosted RoBERTa model over HTTP
pub struct HuggingFaceClassifier {
    client: reqwest::Client,
    url: String,
    api_key: Option<String>,
}

impl HuggingFaceClassifier {
    /// Create a classifier for the configured model and endpoint
    pub fn new(config: &SentimentConfig) -> Result<Self, SentimentError> {
        url::Url::parse(&config.inference_url()).map_err(|e| {
            SentimentError::Model(format!(
                "Invalid sentiment inference URL '{}': {e}",
                config.inference_url()
            ))
        })?;

        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| SentimentError::Model(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            url: config.inference_url(),
            api_key: config.api_key.clone().filter(|k| !k.trim().is_empty()),
        })
    }

    /// Endpoint this classifier posts to
    pub fn url(&self) -> &str {
        &self.url
    }
}

/// Folds per-label scores into the three-way vector.
fn scores_from_labels(labels: &[LabelScore]) -> Result<SentimentScores, SentimentError> {
    let mut negative = None;
    let mut neutral = None;
    let mut positive = None;

    for entry in labels {
        match entry.label.to_lowercase().as_str() {
            "label_0" | "negative" => negative = Some(entry.score),
            "label_1" | "neutral" => neutral = Some(entry.score),
            "label_2" | "positive" => positive = Some(entry.score),
            other => debug!("Ignoring unexpected sentiment label: {}", other),
        }
    }

    match (negative, neutral, positive) {
        (Some(negative), Some(neutral), Some(positive)) => {
            Ok(SentimentScores::new(negative, neutral, positive))
        }
        _ => Err(SentimentError::Response(format!(
            "Expected negative, neutral and positive scores, got {} label(s)",
            labels.len()
        ))),
    }
}

#[async_trait]
impl SentimentClassifier for HuggingFaceClassifier {
    async fn classify(&self, text: &str) -> Result<SentimentScores, SentimentError> {
        let mut request = self
            .client
            .post(&self.url)
            .json(&json!({ "inputs": text }));
        if let Some(ref key) = self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| SentimentError::Request(e.to_string()))?;
        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| SentimentError::Request(e.to_string()))?;

        if !status.is_success() {
            let message = serde_json::from_slice::<InferenceError>(&body)
                .map(|e| e.error)
                .unwrap_or_else(|_| String::from_utf8_lossy(&body).trim().to_string());
            return Err(SentimentError::Unavailable(format!(
                "Inference endpoint returned HTTP {}: {message}",
                status.as_u16()
            )));
        }

        let parsed: InferenceResponse = serde_json::from_slice(&body)
            .map_err(|e| SentimentError::Response(format!("Malformed inference response: {e}")))?;

        let scores = match parsed {
            InferenceResponse::Nested(batches) => {
                let first = batches.first().ok_or_else(|| {
                    SentimentError::Response("Inference response contained no results".to_string())
                })?;
                scores_from_labels(first)?
            }
            InferenceResponse::Flat(labels) => scores_from_labels(&labels)?,
        };
        if !scores.is_normalized() {
            warn!("Inference endpoint returned scores that do not sum to one: {:?}", scores);
        }

        debug!(
            neg = scores.negative,
            neu = scores.neutral,
            pos = scores.positive,
            "Sentiment scores received"
        );
        Ok(scores)
    }

    fn backend(&self) -> &'static str {
        "huggingface"
    }
}
