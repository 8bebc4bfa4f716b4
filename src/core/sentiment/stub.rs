//! Stub implementation for when the `sentiment-onnx` feature is disabled

use anyhow::Result;
use async_trait::async_trait;

use super::{SentimentClassifier, SentimentError, config::SentimentConfig};
use crate::core::emotion::SentimentScores;

/// Placeholder that refuses to load when ONNX support is compiled out
pub struct OnnxSentimentClassifier;

impl OnnxSentimentClassifier {
    /// Always fails; rebuild with `--features sentiment-onnx` for local inference
    pub async fn new(_config: &SentimentConfig) -> Result<Self> {
        anyhow::bail!(
            "Local sentiment inference requires building with `--features sentiment-onnx`"
        )
    }
}

#[async_trait]
impl SentimentClassifier for OnnxSentimentClassifier {
    async fn classify(&self, _text: &str) -> Result<SentimentScores, SentimentError> {
        Err(SentimentError::Unavailable(
            "ONNX support not compiled in".to_string(),
        ))
    }

    fn backend(&self) -> &'static str {
        "onnx"
    }
}
