//! Sentiment model asset management - downloading and caching

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use sha2::{Digest, Sha256};
use tokio::fs;
use tracing::{error, info, warn};

use super::config::SentimentConfig;

pub const MODEL_FILENAME: &str = "sentiment.onnx";
pub const TOKENIZER_FILENAME: &str = "tokenizer.json";

/// Download the ONNX model and tokenizer if not already cached
pub async fn download_assets(config: &SentimentConfig) -> Result<()> {
    let cache_dir = config.get_cache_dir()?;
    fs::create_dir_all(&cache_dir).await?;

    let model_path = cache_dir.join(MODEL_FILENAME);
    if model_path.exists() {
        info!("Using cached sentiment model at: {:?}", model_path);
    } else {
        info!("Downloading sentiment model from: {}", config.model_url);
        download_file(&config.model_url, &model_path, config.model_sha256.as_deref()).await?;
    }

    let tokenizer_path = cache_dir.join(TOKENIZER_FILENAME);
    if tokenizer_path.exists() {
        info!("Using cached tokenizer at: {:?}", tokenizer_path);
    } else {
        info!("Downloading tokenizer from: {}", config.tokenizer_url);
        download_file(&config.tokenizer_url, &tokenizer_path, None).await?;
    }

    info!("Sentiment assets ready in: {:?}", cache_dir);
    Ok(())
}

/// Resolve the cached ONNX model without downloading it
pub fn model_path(config: &SentimentConfig) -> Result<PathBuf> {
    cached_asset(config, MODEL_FILENAME)
}

/// Resolve the cached tokenizer without downloading it
pub fn tokenizer_path(config: &SentimentConfig) -> Result<PathBuf> {
    cached_asset(config, TOKENIZER_FILENAME)
}

fn cached_asset(config: &SentimentConfig, file_name: &str) -> Result<PathBuf> {
    let path = config.get_cache_dir()?.join(file_name);
    if path.exists() {
        Ok(path)
    } else {
        error!(
            "Sentiment asset expected at {:?} but not found. Ensure `emotts-gateway init` populated the cache.",
            path
        );
        anyhow::bail!(
            "Sentiment asset missing at {:?}. Run `emotts-gateway init` before starting the server.",
            path
        );
    }
}

async fn download_file(url: &str, path: &Path, expected_sha256: Option<&str>) -> Result<()> {
    let response = reqwest::get(url)
        .await
        .with_context(|| format!("Failed to download {url}"))?;

    if !response.status().is_success() {
        anyhow::bail!("Failed to download {}: HTTP {}", url, response.status());
    }

    let bytes = response.bytes().await?;

    if let Some(expected) = expected_sha256 {
        verify_hash(&bytes, expected);
    }

    fs::write(path, bytes).await?;
    info!("Downloaded {:?}", path);

    Ok(())
}

/// Warns on mismatch; the upstream export may have been refreshed.
fn verify_hash(data: &[u8], expected: &str) -> bool {
    let mut hasher = Sha256::new();
    hasher.update(data);
    let actual = format!("{:x}", hasher.finalize());

    let matches = actual.eq_ignore_ascii_case(expected.trim());
    if !matches {
        warn!(
            "Sentiment model hash differs from expected. Expected: {}, Actual: {}",
            expected, actual
        );
    }
    matches
}
