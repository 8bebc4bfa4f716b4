use serde::Deserialize;
use std::path::PathBuf;

/// Complete YAML configuration structure
///
/// All fields are optional to allow partial configuration. Values present here
/// override the environment.
///
/// # Example YAML structure
/// ```yaml
/// server:
///   host: "0.0.0.0"
///   port: 5000
///   tls:
///     enabled: true
///     cert_path: "/etc/ssl/gateway.pem"
///     key_path: "/etc/ssl/gateway.key"
///
/// elevenlabs:
///   api_key: "your-elevenlabs-key"
///   voice_id: "5Q0t7uMcjvnagumLfvZi"
///   model_id: "eleven_monolingual_v1"
///
/// sentiment:
///   backend: "huggingface"   # huggingface | onnx | disabled
///   model_id: "cardiffnlp/twitter-roberta-base-sentiment"
///   api_key: "hf_..."
///
/// cache:
///   path: "/var/cache/emotts-gateway"
///
/// audio:
///   dir: "static"
///   url_prefix: "static"
///   s3_bucket: "tts-audio"
///   s3_prefix: "generated"
///
/// persistence:
///   enabled: true
///   path: "data"
///   mode: "best_effort"      # best_effort | strict
///   record_failures: true
///
/// security:
///   cors_allowed_origins: "*"
///   rate_limit_requests_per_second: 60
///   rate_limit_burst_size: 10
/// ```
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct YamlConfig {
    pub server: Option<ServerYaml>,
    pub tts: Option<TtsYaml>,
    pub elevenlabs: Option<ElevenLabsYaml>,
    pub sentiment: Option<SentimentYaml>,
    pub cache: Option<CacheYaml>,
    pub audio: Option<AudioYaml>,
    pub persistence: Option<PersistenceYaml>,
    pub security: Option<SecurityYaml>,
}

/// Server configuration from YAML
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct ServerYaml {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub tls: Option<TlsYaml>,
}

/// TLS configuration from YAML
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct TlsYaml {
    pub enabled: Option<bool>,
    pub cert_path: Option<String>,
    pub key_path: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct TtsYaml {
    pub provider: Option<String>,
}

/// ElevenLabs settings from YAML
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct ElevenLabsYaml {
    pub api_key: Option<String>,
    pub voice_id: Option<String>,
    pub model_id: Option<String>,
    pub base_url: Option<String>,
}

/// Sentiment classifier settings from YAML
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct SentimentYaml {
    /// Backend name: "huggingface", "onnx" or "disabled"
    pub backend: Option<String>,
    pub model_id: Option<String>,
    pub api_url: Option<String>,
    pub api_key: Option<String>,
    pub model_url: Option<String>,
    pub tokenizer_url: Option<String>,
    pub model_sha256: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct CacheYaml {
    pub path: Option<String>,
}

/// Audio artifact storage from YAML
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AudioYaml {
    pub dir: Option<String>,
    pub url_prefix: Option<String>,
    pub s3_bucket: Option<String>,
    pub s3_region: Option<String>,
    pub s3_endpoint: Option<String>,
    pub s3_access_key: Option<String>,
    pub s3_secret_key: Option<String>,
    pub s3_prefix: Option<String>,
}

/// Generation persistence from YAML
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct PersistenceYaml {
    pub enabled: Option<bool>,
    pub path: Option<String>,
    /// "best_effort" or "strict"
    pub mode: Option<String>,
    pub record_failures: Option<bool>,
}

/// Security configuration from YAML
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct SecurityYaml {
    /// CORS allowed origins (comma-separated list or "*" for all)
    pub cors_allowed_origins: Option<String>,
    /// Maximum requests per second per IP address
    pub rate_limit_requests_per_second: Option<u32>,
    /// Maximum burst size for rate limiting
    pub rate_limit_burst_size: Option<u32>,
}

impl YamlConfig {
    /// Load configuration from a YAML file
    ///
    /// # Errors
    /// Returns an error if:
    /// - The file cannot be read
    /// - The YAML is malformed
    /// - Required fields have invalid types
    pub fn from_file(path: &PathBuf) -> Result<Self, Box<dyn std::error::Error>> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file {}: {e}", path.display()))?;

        let config: YamlConfig = serde_yaml::from_str(&contents)
            .map_err(|e| format!("Failed to parse YAML config: {e}"))?;

        Ok(config)
    }
}
