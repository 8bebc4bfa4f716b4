//! Local RoBERTa sentiment inference with ONNX Runtime

use anyhow::{Context, Result};
use async_trait::async_trait;
use ort::session::Session;
use ort::session::builder::{GraphOptimizationLevel, SessionBuilder};
use ort::value::Value;
use parking_lot::Mutex;
use std::path::Path;
use std::sync::Arc;
use tokenizers::Tokenizer;
use tracing::{debug, info, warn};

use super::{SentimentClassifier, SentimentError, assets, config::SentimentConfig};
use crate::core::emotion::SentimentScores;

/// RoBERTa sentiment classifier running in-process
pub struct OnnxSentimentClassifier {
    session: Arc<Mutex<Session>>,
    tokenizer: Arc<Tokenizer>,
    /// Cached input names
    input_names: Arc<Vec<String>>,
    /// Logits output name
    output_name: String,
    max_length: usize,
}

impl OnnxSentimentClassifier {
    /// Load the cached model and tokenizer. Fails if `init` has not been run.
    pub async fn new(config: &SentimentConfig) -> Result<Self> {
        let model_path = assets::model_path(config)?;
        let tokenizer_path = assets::tokenizer_path(config)?;

        info!("Loading sentiment model from: {:?}", model_path);

        let session = tokio::task::spawn_blocking({
            let num_threads = config.num_threads;
            move || Self::create_session(&model_path, num_threads)
        })
        .await
        .context("Failed to spawn blocking task for sentiment model loading")??;

        let tokenizer = Tokenizer::from_file(&tokenizer_path)
            .map_err(|e| anyhow::anyhow!("Failed to load tokenizer {:?}: {}", tokenizer_path, e))?;

        let input_names: Vec<String> = session
            .inputs
            .iter()
            .map(|input| input.name.clone())
            .collect();
        let output_name = session
            .outputs
            .first()
            .map(|output| output.name.clone())
            .unwrap_or_else(|| "logits".to_string());

        info!("Sentiment model input names: {:?}", input_names);
        info!("Sentiment model output: {}", output_name);

        Ok(Self {
            session: Arc::new(Mutex::new(session)),
            tokenizer: Arc::new(tokenizer),
            input_names: Arc::new(input_names),
            output_name,
            max_length: config.max_length.max(2),
        })
    }

    fn create_session(model_path: &Path, num_threads: Option<usize>) -> Result<Session> {
        let mut builder =
            SessionBuilder::new()?.with_optimization_level(GraphOptimizationLevel::Level3)?;

        if let Some(num_threads) = num_threads {
            builder = builder
                .with_intra_threads(num_threads)?
                .with_inter_threads(1)?;
        }

        let session = builder.commit_from_file(model_path)?;

        if session.outputs.is_empty() {
            anyhow::bail!("Sentiment model declares no outputs");
        }

        Ok(session)
    }

    /// Tokenize and run one forward pass. Blocking.
    fn infer(
        session: &Mutex<Session>,
        tokenizer: &Tokenizer,
        input_names: &[String],
        output_name: &str,
        max_length: usize,
        text: &str,
    ) -> Result<SentimentScores, SentimentError> {
        let encoding = tokenizer
            .encode(text, true)
            .map_err(|e| SentimentError::Tokenizer(e.to_string()))?;

        let mut ids: Vec<i64> = encoding.get_ids().iter().map(|&id| id as i64).collect();
        let mut mask: Vec<i64> = encoding
            .get_attention_mask()
            .iter()
            .map(|&m| m as i64)
            .collect();
        if ids.len() > max_length {
            warn!(
                "Truncating sentiment input from {} to {} tokens",
                ids.len(),
                max_length
            );
            ids.truncate(max_length);
            mask.truncate(max_length);
        }
        let len = ids.len();

        let inputs: Vec<(&str, Value)> = input_names
            .iter()
            .filter_map(|name| {
                let value: Option<Value> = match name.as_str() {
                    "input_ids" => Value::from_array(([1usize, len], ids.clone()))
                        .ok()
                        .map(|v| v.into()),
                    "attention_mask" => Value::from_array(([1usize, len], mask.clone()))
                        .ok()
                        .map(|v| v.into()),
                    "token_type_ids" => Value::from_array(([1usize, len], vec![0i64; len]))
                        .ok()
                        .map(|v| v.into()),
                    other => {
                        warn!("Unknown sentiment model input name: {}", other);
                        None
                    }
                };
                value.map(|v| (name.as_str(), v))
            })
            .collect();

        let mut session = session.lock();
        let outputs = session
            .run(inputs)
            .map_err(|e| SentimentError::Model(e.to_string()))?;

        let (_shape, data) = outputs
            .get(output_name)
            .ok_or_else(|| SentimentError::Model(format!("Missing output '{output_name}'")))?
            .try_extract_tensor::<f32>()
            .map_err(|e| SentimentError::Model(e.to_string()))?;

        if data.len() < 3 {
            return Err(SentimentError::Model(format!(
                "Expected 3 logits, got {}",
                data.len()
            )));
        }

        let scores = SentimentScores::from_logits([data[0], data[1], data[2]]);
        debug!(
            neg = scores.negative,
            neu = scores.neutral,
            pos = scores.positive,
            tokens = len,
            "Local sentiment inference complete"
        );
        Ok(scores)
    }
}

#[async_trait]
impl SentimentClassifier for OnnxSentimentClassifier {
    async fn classify(&self, text: &str) -> Result<SentimentScores, SentimentError> {
        let session = self.session.clone();
        let tokenizer = self.tokenizer.clone();
        let input_names = self.input_names.clone();
        let output_name = self.output_name.clone();
        let max_length = self.max_length;
        let text = text.to_string();

        tokio::task::spawn_blocking(move || {
            Self::infer(
                &session,
                &tokenizer,
                &input_names,
                &output_name,
                max_length,
                &text,
            )
        })
        .await
        .map_err(|e| SentimentError::Model(format!("Inference task failed: {e}")))?
    }

    fn backend(&self) -> &'static str {
        "onnx"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_new_without_assets_fails() {
        let temp_dir = tempdir().unwrap();
        let config = SentimentConfig {
            cache_path: Some(temp_dir.path().to_path_buf()),
            ..Default::default()
        };
        let err = OnnxSentimentClassifier::new(&config).await.err().unwrap();
        assert!(err.to_string().contains("init"));
    }
}
