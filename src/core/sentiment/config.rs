//! Sentiment classifier configuration types

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default Hugging Face model for three-way tweet sentiment
pub const DEFAULT_MODEL_ID: &str = "cardiffnlp/twitter-roberta-base-sentiment";

/// Default Hugging Face inference endpoint prefix
pub const DEFAULT_API_URL: &str = "https://router.huggingface.co/hf-inference/models";

/// ONNX export of the same RoBERTa sentiment head (labels: negative, neutral, positive)
pub const DEFAULT_ONNX_MODEL_URL: &str =
    "https://huggingface.co/Xenova/twitter-roberta-base-sentiment-latest/resolve/main/onnx/model.onnx";

/// Tokenizer matching [`DEFAULT_ONNX_MODEL_URL`]
pub const DEFAULT_TOKENIZER_URL: &str =
    "https://huggingface.co/Xenova/twitter-roberta-base-sentiment-latest/resolve/main/tokenizer.json";

/// Sentiment backend selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SentimentBackend {
    /// Remote Hugging Face inference endpoint
    #[default]
    HuggingFace,
    /// Local ONNX Runtime inference (requires the `sentiment-onnx` feature)
    Onnx,
    /// No classifier; every request degrades to zero scores
    Disabled,
}

impl SentimentBackend {
    /// Parses a backend name, accepting a few common spellings.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "huggingface" | "hugging-face" | "hf" | "http" => Some(SentimentBackend::HuggingFace),
            "onnx" | "local" => Some(SentimentBackend::Onnx),
            "disabled" | "none" | "off" => Some(SentimentBackend::Disabled),
            _ => None,
        }
    }
}

impl std::fmt::Display for SentimentBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SentimentBackend::HuggingFace => write!(f, "huggingface"),
            SentimentBackend::Onnx => write!(f, "onnx"),
            SentimentBackend::Disabled => write!(f, "disabled"),
        }
    }
}

/// Configuration for the sentiment classifier
#[derive(Debug, Clone)]
pub struct SentimentConfig {
    /// Which backend to construct at startup
    pub backend: SentimentBackend,

    /// Model identifier for the remote backend
    pub model_id: String,

    /// Inference endpoint prefix; the model id is appended
    pub api_url: String,

    /// Bearer token for the inference endpoint (optional for public models)
    pub api_key: Option<String>,

    /// Cache directory for downloaded ONNX assets
    pub cache_path: Option<PathBuf>,

    /// URL to download the ONNX model from
    pub model_url: String,

    /// URL to download the tokenizer from
    pub tokenizer_url: String,

    /// Expected SHA-256 of the ONNX model (mismatch only warns)
    pub model_sha256: Option<String>,

    /// Maximum tokens fed to the model; longer input is truncated
    pub max_length: usize,

    /// Number of intra-op threads for ONNX inference
    pub num_threads: Option<usize>,
}

impl Default for SentimentConfig {
    fn default() -> Self {
        Self {
            backend: SentimentBackend::default(),
            model_id: DEFAULT_MODEL_ID.to_string(),
            api_url: DEFAULT_API_URL.to_string(),
            api_key: None,
            cache_path: None,
            model_url: DEFAULT_ONNX_MODEL_URL.to_string(),
            tokenizer_url: DEFAULT_TOKENIZER_URL.to_string(),
            model_sha256: None,
            max_length: 512,
            num_threads: Some(1),
        }
    }
}

impl SentimentConfig {
    /// Get the cache directory for sentiment model assets
    pub fn get_cache_dir(&self) -> Result<PathBuf> {
        let cache_dir = if let Some(cache_path) = &self.cache_path {
            cache_path.join("sentiment")
        } else {
            anyhow::bail!("No cache directory specified for the sentiment model");
        };
        Ok(cache_dir)
    }

    /// Full inference URL for the configured model
    pub fn inference_url(&self) -> String {
        format!(
            "{}/{}",
            self.api_url.trim_end_matches('/'),
            self.model_id.trim_start_matches('/')
        )
    }
}
