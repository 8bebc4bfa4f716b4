use std::path::PathBuf;

use super::utils::{env_bool, env_parse, env_var};
use super::{ServerConfig, TlsConfig};
use crate::core::generation::PersistenceMode;
use crate::core::sentiment::SentimentBackend;

/// Build a [`ServerConfig`] from environment variables, falling back to defaults.
pub(crate) fn from_env() -> Result<ServerConfig, String> {
    let defaults = ServerConfig::default();

    let tls = match (env_var("TLS_CERT_PATH"), env_var("TLS_KEY_PATH")) {
        (Some(cert), Some(key)) => Some(TlsConfig {
            cert_path: PathBuf::from(cert),
            key_path: PathBuf::from(key),
        }),
        (None, None) => None,
        _ => {
            return Err(
                "TLS_CERT_PATH and TLS_KEY_PATH must both be set to enable TLS".to_string(),
            );
        }
    };

    let sentiment_backend = match env_var("SENTIMENT_BACKEND") {
        Some(value) => SentimentBackend::parse(&value).ok_or_else(|| {
            format!("Invalid SENTIMENT_BACKEND '{value}'. Expected huggingface, onnx or disabled")
        })?,
        None => defaults.sentiment_backend,
    };

    let persistence_mode = match env_var("PERSISTENCE_MODE") {
        Some(value) => PersistenceMode::parse(&value).ok_or_else(|| {
            format!("Invalid PERSISTENCE_MODE '{value}'. Expected best_effort or strict")
        })?,
        None => defaults.persistence_mode,
    };

    Ok(ServerConfig {
        host: env_var("HOST").unwrap_or_else(|| defaults.host.clone()),
        port: env_parse("PORT", defaults.port)?,
        tls,
        tts_provider: env_var("TTS_PROVIDER").unwrap_or_else(|| defaults.tts_provider.clone()),
        elevenlabs_api_key: env_var("ELEVENLABS_API_KEY"),
        elevenlabs_voice_id: env_var("ELEVENLABS_VOICE_ID"),
        elevenlabs_model_id: env_var("ELEVENLABS_MODEL_ID")
            .unwrap_or_else(|| defaults.elevenlabs_model_id.clone()),
        elevenlabs_base_url: env_var("ELEVENLABS_BASE_URL")
            .unwrap_or_else(|| defaults.elevenlabs_base_url.clone()),
        sentiment_backend,
        sentiment_model_id: env_var("SENTIMENT_MODEL_ID")
            .unwrap_or_else(|| defaults.sentiment_model_id.clone()),
        sentiment_api_url: env_var("SENTIMENT_API_URL")
            .unwrap_or_else(|| defaults.sentiment_api_url.clone()),
        huggingface_api_key: env_var("HUGGINGFACE_API_KEY"),
        sentiment_model_url: env_var("SENTIMENT_MODEL_URL"),
        sentiment_tokenizer_url: env_var("SENTIMENT_TOKENIZER_URL"),
        sentiment_model_sha256: env_var("SENTIMENT_MODEL_SHA256"),
        cache_path: env_var("CACHE_PATH").map(PathBuf::from),
        audio_dir: env_var("AUDIO_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| defaults.audio_dir.clone()),
        audio_url_prefix: env_var("AUDIO_URL_PREFIX")
            .unwrap_or_else(|| defaults.audio_url_prefix.clone()),
        audio_s3_bucket: env_var("AUDIO_S3_BUCKET"),
        audio_s3_region: env_var("AUDIO_S3_REGION"),
        audio_s3_endpoint: env_var("AUDIO_S3_ENDPOINT"),
        audio_s3_access_key: env_var("AUDIO_S3_ACCESS_KEY"),
        audio_s3_secret_key: env_var("AUDIO_S3_SECRET_KEY"),
        audio_s3_prefix: env_var("AUDIO_S3_PREFIX"),
        persistence_enabled: env_bool("PERSISTENCE_ENABLED", defaults.persistence_enabled)?,
        persistence_path: env_var("PERSISTENCE_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| defaults.persistence_path.clone()),
        persistence_mode,
        persistence_record_failures: env_bool(
            "PERSISTENCE_RECORD_FAILURES",
            defaults.persistence_record_failures,
        )?,
        cors_allowed_origins: env_var("CORS_ALLOWED_ORIGINS"),
        rate_limit_requests_per_second: env_parse(
            "RATE_LIMIT_REQUESTS_PER_SECOND",
            defaults.rate_limit_requests_per_second,
        )?,
        rate_limit_burst_size: env_parse("RATE_LIMIT_BURST_SIZE", defaults.rate_limit_burst_size)?,
    })
}
