use std::path::PathBuf;

use super::yaml::{TlsYaml, YamlConfig};
use super::{ServerConfig, TlsConfig, env};
use crate::core::generation::PersistenceMode;
use crate::core::sentiment::SentimentBackend;

/// Overwrite `target` when the YAML value is present.
fn set<T>(target: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *target = value;
    }
}

/// Overwrite an optional `target` when the YAML value is present.
fn set_opt<T>(target: &mut Option<T>, value: Option<T>) {
    if value.is_some() {
        *target = value;
    }
}

fn merge_tls(current: Option<TlsConfig>, tls: TlsYaml) -> Result<Option<TlsConfig>, String> {
    if tls.enabled == Some(false) {
        return Ok(None);
    }

    match (tls.cert_path, tls.key_path) {
        (Some(cert), Some(key)) => Ok(Some(TlsConfig {
            cert_path: PathBuf::from(cert),
            key_path: PathBuf::from(key),
        })),
        (None, None) if tls.enabled != Some(true) => Ok(current),
        (None, None) if current.is_some() => Ok(current),
        _ => Err("TLS enabled in YAML but cert_path and key_path are not both set".to_string()),
    }
}

/// Environment configuration as base, YAML values layered on top.
pub(crate) fn merge_config(
    yaml: Option<YamlConfig>,
) -> Result<ServerConfig, Box<dyn std::error::Error>> {
    let mut config = env::from_env()?;

    let Some(yaml) = yaml else {
        return Ok(config);
    };

    if let Some(server) = yaml.server {
        set(&mut config.host, server.host);
        set(&mut config.port, server.port);
        if let Some(tls) = server.tls {
            config.tls = merge_tls(config.tls.take(), tls)?;
        }
    }

    if let Some(tts) = yaml.tts {
        set(&mut config.tts_provider, tts.provider);
    }

    if let Some(el) = yaml.elevenlabs {
        set_opt(&mut config.elevenlabs_api_key, el.api_key);
        set_opt(&mut config.elevenlabs_voice_id, el.voice_id);
        set(&mut config.elevenlabs_model_id, el.model_id);
        set(&mut config.elevenlabs_base_url, el.base_url);
    }

    if let Some(sentiment) = yaml.sentiment {
        if let Some(backend) = sentiment.backend {
            config.sentiment_backend = SentimentBackend::parse(&backend).ok_or_else(|| {
                format!("Invalid sentiment.backend '{backend}'. Expected huggingface, onnx or disabled")
            })?;
        }
        set(&mut config.sentiment_model_id, sentiment.model_id);
        set(&mut config.sentiment_api_url, sentiment.api_url);
        set_opt(&mut config.huggingface_api_key, sentiment.api_key);
        set_opt(&mut config.sentiment_model_url, sentiment.model_url);
        set_opt(&mut config.sentiment_tokenizer_url, sentiment.tokenizer_url);
        set_opt(&mut config.sentiment_model_sha256, sentiment.model_sha256);
    }

    if let Some(cache) = yaml.cache {
        set_opt(&mut config.cache_path, cache.path.map(PathBuf::from));
    }

    if let Some(audio) = yaml.audio {
        set(&mut config.audio_dir, audio.dir.map(PathBuf::from));
        set(&mut config.audio_url_prefix, audio.url_prefix);
        set_opt(&mut config.audio_s3_bucket, audio.s3_bucket);
        set_opt(&mut config.audio_s3_region, audio.s3_region);
        set_opt(&mut config.audio_s3_endpoint, audio.s3_endpoint);
        set_opt(&mut config.audio_s3_access_key, audio.s3_access_key);
        set_opt(&mut config.audio_s3_secret_key, audio.s3_secret_key);
        set_opt(&mut config.audio_s3_prefix, audio.s3_prefix);
    }

    if let Some(persistence) = yaml.persistence {
        set(&mut config.persistence_enabled, persistence.enabled);
        set(&mut config.persistence_path, persistence.path.map(PathBuf::from));
        if let Some(mode) = persistence.mode {
            config.persistence_mode = PersistenceMode::parse(&mode).ok_or_else(|| {
                format!("Invalid persistence.mode '{mode}'. Expected best_effort or strict")
            })?;
        }
        set(
            &mut config.persistence_record_failures,
            persistence.record_failures,
        );
    }

    if let Some(security) = yaml.security {
        set_opt(
            &mut config.cors_allowed_origins,
            security.cors_allowed_origins,
        );
        set(
            &mut config.rate_limit_requests_per_second,
            security.rate_limit_requests_per_second,
        );
        set(
            &mut config.rate_limit_burst_size,
            security.rate_limit_burst_size,
        );
    }

    Ok(config)
}
