//! Initialization helpers for preparing runtime assets before starting the
//! gateway.
//!
//! This module hosts the logic that powers the `emotts-gateway init` CLI
//! command. The command downloads and caches the ONNX sentiment model and its
//! tokenizer so that regular server startups do not have to perform network
//! fetches.
//!
//! ```text
//! $ CACHE_PATH=/app/cache emotts-gateway init
//! ```

use anyhow::{Context, Result, anyhow};
use std::path::PathBuf;

use crate::config::ServerConfig;
use crate::core::sentiment::{SentimentBackend, assets};

/// Download and prepare all assets required for runtime execution.
pub async fn run(config_path: Option<&PathBuf>) -> Result<()> {
    let config = match config_path {
        Some(path) => ServerConfig::from_file(path),
        None => ServerConfig::from_env(),
    }
    .map_err(|e| anyhow!(e.to_string()))?;

    let mut sentiment = config.sentiment_config();
    sentiment.cache_path = Some(
        config
            .cache_path
            .clone()
            .context("CACHE_PATH environment variable must be set to run `emotts-gateway init`")?,
    );

    if config.sentiment_backend != SentimentBackend::Onnx {
        tracing::info!(
            "Sentiment backend is '{}'; the ONNX assets are only used with SENTIMENT_BACKEND=onnx",
            config.sentiment_backend
        );
    }

    tracing::info!(
        "Preparing sentiment assets using cache path: {:?}",
        sentiment.cache_path
    );
    assets::download_assets(&sentiment).await?;

    tracing::info!("Sentiment assets downloaded successfully");

    Ok(())
}
