//! Configuration module for the emotion TTS gateway
//!
//! This module handles server configuration from various sources: .env files, YAML files,
//! and environment variables. Priority: YAML > ENV vars > .env values > defaults.
//!
//! # Modules
//! - `yaml`: YAML configuration file loading
//! - `env`: Environment variable loading
//! - `merge`: Merging YAML and environment configurations
//! - `validation`: Configuration validation logic
//! - `utils`: Utility functions for configuration parsing
//!
//! # Example
//! ```rust,no_run
//! use emotts_gateway::config::ServerConfig;
//! use std::path::PathBuf;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! // Load from environment variables only
//! let config = ServerConfig::from_env()?;
//!
//! // Load from YAML file with environment variable overrides
//! let config = ServerConfig::from_file(&PathBuf::from("config.yaml"))?;
//!
//! println!("Server listening on {}", config.address());
//! # Ok(())
//! # }
//! ```

use std::path::PathBuf;

mod env;
mod merge;
mod utils;
mod validation;
mod yaml;

use crate::core::generation::{GenerationOptions, PersistenceMode};
use crate::core::sentiment::{SentimentBackend, SentimentConfig};
use crate::core::storage::{AudioStorageConfig, S3Settings};
use crate::core::tts::ElevenLabsConfig;

/// TLS configuration for HTTPS
#[derive(Debug, Clone)]
pub struct TlsConfig {
    /// Path to the TLS certificate file (PEM format)
    pub cert_path: PathBuf,
    /// Path to the TLS private key file (PEM format)
    pub key_path: PathBuf,
}

/// Server configuration
///
/// Contains all configuration needed to run the gateway:
/// - Server address and TLS
/// - ElevenLabs credentials and synthesis model
/// - Sentiment backend selection
/// - Audio artifact storage (local directory or S3)
/// - Generation persistence policy
/// - Security settings (CORS, rate limiting)
#[derive(Debug, Clone)]
pub struct ServerConfig {
    // Server settings
    pub host: String,
    pub port: u16,

    // TLS configuration (optional)
    pub tls: Option<TlsConfig>,

    // Speech synthesis
    /// TTS provider name passed to the synthesizer factory
    pub tts_provider: String,
    pub elevenlabs_api_key: Option<String>,
    pub elevenlabs_voice_id: Option<String>,
    /// Model id sent with every synthesis request
    pub elevenlabs_model_id: String,
    pub elevenlabs_base_url: String,

    // Sentiment classification
    pub sentiment_backend: SentimentBackend,
    pub sentiment_model_id: String,
    pub sentiment_api_url: String,
    pub huggingface_api_key: Option<String>,
    /// Overrides for the ONNX asset download locations
    pub sentiment_model_url: Option<String>,
    pub sentiment_tokenizer_url: Option<String>,
    pub sentiment_model_sha256: Option<String>,

    /// Cache directory for downloaded model assets
    pub cache_path: Option<PathBuf>,

    // Audio artifacts
    /// Local directory for audio when no bucket is configured
    pub audio_dir: PathBuf,
    /// Prefix of the `audio_path` returned to callers
    pub audio_url_prefix: String,
    pub audio_s3_bucket: Option<String>,
    pub audio_s3_region: Option<String>,
    pub audio_s3_endpoint: Option<String>,
    pub audio_s3_access_key: Option<String>,
    pub audio_s3_secret_key: Option<String>,
    pub audio_s3_prefix: Option<String>,

    // Persistence
    pub persistence_enabled: bool,
    /// Directory that receives one JSON record per request
    pub persistence_path: PathBuf,
    pub persistence_mode: PersistenceMode,
    pub persistence_record_failures: bool,

    // Security configuration
    /// CORS allowed origins (comma-separated list or "*" for all)
    /// Default: None (CORS disabled, same-origin only)
    pub cors_allowed_origins: Option<String>,

    // Rate limiting configuration
    /// Maximum requests per second per IP address
    /// Default: 60
    pub rate_limit_requests_per_second: u32,
    /// Maximum burst size for rate limiting
    /// Default: 10
    pub rate_limit_burst_size: u32,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            tls: None,
            tts_provider: "elevenlabs".to_string(),
            elevenlabs_api_key: None,
            elevenlabs_voice_id: None,
            elevenlabs_model_id: crate::core::tts::DEFAULT_MODEL_ID.to_string(),
            elevenlabs_base_url: crate::core::tts::ELEVENLABS_BASE_URL.to_string(),
            sentiment_backend: SentimentBackend::default(),
            sentiment_model_id: crate::core::sentiment::config::DEFAULT_MODEL_ID.to_string(),
            sentiment_api_url: crate::core::sentiment::config::DEFAULT_API_URL.to_string(),
            huggingface_api_key: None,
            sentiment_model_url: None,
            sentiment_tokenizer_url: None,
            sentiment_model_sha256: None,
            cache_path: None,
            audio_dir: PathBuf::from(crate::core::storage::config::DEFAULT_AUDIO_DIR),
            audio_url_prefix: crate::core::storage::config::DEFAULT_URL_PREFIX.to_string(),
            audio_s3_bucket: None,
            audio_s3_region: None,
            audio_s3_endpoint: None,
            audio_s3_access_key: None,
            audio_s3_secret_key: None,
            audio_s3_prefix: None,
            persistence_enabled: true,
            persistence_path: PathBuf::from("data"),
            persistence_mode: PersistenceMode::BestEffort,
            persistence_record_failures: true,
            cors_allowed_origins: None,
            rate_limit_requests_per_second: 60,
            rate_limit_burst_size: 10,
        }
    }
}

/// Implement Drop to zeroize all secret fields when ServerConfig is dropped.
impl Drop for ServerConfig {
    fn drop(&mut self) {
        use zeroize::Zeroize;

        if let Some(ref mut key) = self.elevenlabs_api_key {
            key.zeroize();
        }
        if let Some(ref mut key) = self.huggingface_api_key {
            key.zeroize();
        }
        if let Some(ref mut key) = self.audio_s3_access_key {
            key.zeroize();
        }
        if let Some(ref mut secret) = self.audio_s3_secret_key {
            secret.zeroize();
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// The `.env` file is loaded by `main` before this is called, so its values
    /// are visible here unless a real environment variable overrides them.
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        let config = env::from_env()?;
        validation::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a YAML file with environment variable base
    ///
    /// Priority order (highest to lowest):
    /// 1. YAML file values
    /// 2. Environment variables (actual ENV vars override .env values)
    /// 3. .env file values
    /// 4. Default values
    ///
    /// After loading and merging, performs validation on the final configuration.
    ///
    /// # Errors
    /// Returns an error if:
    /// - The YAML file cannot be read or is malformed
    /// - Environment variables have invalid formats
    /// - Configuration validation fails
    pub fn from_file(path: &PathBuf) -> Result<Self, Box<dyn std::error::Error>> {
        let yaml_config = yaml::YamlConfig::from_file(path)?;
        let config = merge::merge_config(Some(yaml_config))?;
        validation::validate(&config)?;
        Ok(config)
    }

    /// Get the server address as a string
    ///
    /// Returns the address in the format "host:port"
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Check if TLS is enabled
    pub fn is_tls_enabled(&self) -> bool {
        self.tls.is_some()
    }

    /// ElevenLabs provider settings
    pub fn elevenlabs_config(&self) -> ElevenLabsConfig {
        ElevenLabsConfig {
            api_key: self.elevenlabs_api_key.clone(),
            voice_id: self.elevenlabs_voice_id.clone(),
            model_id: self.elevenlabs_model_id.clone(),
            base_url: self.elevenlabs_base_url.clone(),
        }
    }

    /// Sentiment classifier settings
    pub fn sentiment_config(&self) -> SentimentConfig {
        let defaults = SentimentConfig::default();
        SentimentConfig {
            backend: self.sentiment_backend,
            model_id: self.sentiment_model_id.clone(),
            api_url: self.sentiment_api_url.clone(),
            api_key: self.huggingface_api_key.clone(),
            cache_path: self.cache_path.clone(),
            model_url: self
                .sentiment_model_url
                .clone()
                .unwrap_or(defaults.model_url),
            tokenizer_url: self
                .sentiment_tokenizer_url
                .clone()
                .unwrap_or(defaults.tokenizer_url),
            model_sha256: self.sentiment_model_sha256.clone(),
            max_length: defaults.max_length,
            num_threads: defaults.num_threads,
        }
    }

    /// Audio artifact storage settings; a bucket takes precedence over the local directory
    pub fn audio_storage_config(&self) -> AudioStorageConfig {
        AudioStorageConfig {
            local_dir: self.audio_dir.clone(),
            s3: self.audio_s3_bucket.as_ref().map(|bucket| S3Settings {
                bucket: bucket.clone(),
                region: self.audio_s3_region.clone(),
                endpoint: self.audio_s3_endpoint.clone(),
                access_key: self.audio_s3_access_key.clone(),
                secret_key: self.audio_s3_secret_key.clone(),
                prefix: self.audio_s3_prefix.clone(),
            }),
            url_prefix: self.audio_url_prefix.clone(),
        }
    }

    /// Persistence behaviour for the generation service
    pub fn generation_options(&self) -> GenerationOptions {
        GenerationOptions {
            persistence_mode: self.persistence_mode,
            record_failed_synthesis: self.persistence_record_failures,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::env;
    use std::fs;
    use tempfile::TempDir;

    // Helper to clean up environment variables
    fn cleanup_env_vars() {
        unsafe {
            for key in [
                "HOST",
                "PORT",
                "TLS_CERT_PATH",
                "TLS_KEY_PATH",
                "TTS_PROVIDER",
                "ELEVENLABS_API_KEY",
                "ELEVENLABS_VOICE_ID",
                "ELEVENLABS_MODEL_ID",
                "ELEVENLABS_BASE_URL",
                "SENTIMENT_BACKEND",
                "SENTIMENT_MODEL_ID",
                "SENTIMENT_API_URL",
                "HUGGINGFACE_API_KEY",
                "CACHE_PATH",
                "AUDIO_DIR",
                "AUDIO_URL_PREFIX",
                "AUDIO_S3_BUCKET",
                "AUDIO_S3_PREFIX",
                "PERSISTENCE_ENABLED",
                "PERSISTENCE_PATH",
                "PERSISTENCE_MODE",
                "PERSISTENCE_RECORD_FAILURES",
                "CORS_ALLOWED_ORIGINS",
                "RATE_LIMIT_REQUESTS_PER_SECOND",
                "RATE_LIMIT_BURST_SIZE",
            ] {
                env::remove_var(key);
            }
        }
    }

    #[test]
    fn test_address() {
        let mut config = ServerConfig::default();
        config.host = "127.0.0.1".to_string();
        config.port = 8080;
        assert_eq!(config.address(), "127.0.0.1:8080");
        assert!(!config.is_tls_enabled());
    }

    #[test]
    fn test_elevenlabs_config_projection() {
        let mut config = ServerConfig::default();
        config.elevenlabs_api_key = Some("key".to_string());
        config.elevenlabs_voice_id = Some("voice".to_string());
        config.elevenlabs_model_id = "eleven_multilingual_v2".to_string();

        let tts = config.elevenlabs_config();
        assert_eq!(tts.api_key.as_deref(), Some("key"));
        assert_eq!(tts.voice_id.as_deref(), Some("voice"));
        assert_eq!(tts.model_id, "eleven_multilingual_v2");
        assert_eq!(tts.base_url, "https://api.elevenlabs.io");
    }

    #[test]
    fn test_audio_storage_prefers_bucket() {
        let mut config = ServerConfig::default();
        assert!(config.audio_storage_config().s3.is_none());

        config.audio_s3_bucket = Some("tts-audio".to_string());
        config.audio_s3_prefix = Some("generated".to_string());
        let storage = config.audio_storage_config();
        let s3 = storage.s3.unwrap();
        assert_eq!(s3.bucket, "tts-audio");
        assert_eq!(s3.prefix.as_deref(), Some("generated"));
        assert_eq!(storage.url_prefix, "static");
    }

    #[test]
    fn test_sentiment_config_defaults_asset_urls() {
        let mut config = ServerConfig::default();
        config.cache_path = Some(PathBuf::from("/tmp/models"));
        let sentiment = config.sentiment_config();
        assert_eq!(sentiment.backend, SentimentBackend::HuggingFace);
        assert_eq!(sentiment.cache_path, Some(PathBuf::from("/tmp/models")));
        assert!(sentiment.model_url.ends_with(".onnx"));
    }

    #[test]
    #[serial]
    fn test_from_env_defaults() {
        cleanup_env_vars();

        let config = ServerConfig::from_env().unwrap();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 5000);
        assert_eq!(config.elevenlabs_model_id, "eleven_monolingual_v1");
        assert_eq!(config.sentiment_backend, SentimentBackend::HuggingFace);
        assert_eq!(config.persistence_mode, PersistenceMode::BestEffort);
        assert!(config.persistence_record_failures);
        assert_eq!(config.rate_limit_requests_per_second, 60);

        cleanup_env_vars();
    }

    #[test]
    #[serial]
    fn test_from_env_reads_values() {
        cleanup_env_vars();

        unsafe {
            env::set_var("PORT", "8081");
            env::set_var("ELEVENLABS_API_KEY", "env-key");
            env::set_var("ELEVENLABS_VOICE_ID", "env-voice");
            env::set_var("SENTIMENT_BACKEND", "disabled");
            env::set_var("PERSISTENCE_MODE", "strict");
            env::set_var("PERSISTENCE_RECORD_FAILURES", "false");
        }

        let config = ServerConfig::from_env().unwrap();
        assert_eq!(config.port, 8081);
        assert_eq!(config.elevenlabs_api_key.as_deref(), Some("env-key"));
        assert_eq!(config.elevenlabs_voice_id.as_deref(), Some("env-voice"));
        assert_eq!(config.sentiment_backend, SentimentBackend::Disabled);
        assert_eq!(config.persistence_mode, PersistenceMode::Strict);
        assert!(!config.persistence_record_failures);

        cleanup_env_vars();
    }

    #[test]
    #[serial]
    fn test_from_env_rejects_invalid_port() {
        cleanup_env_vars();

        unsafe {
            env::set_var("PORT", "not-a-port");
        }
        let result = ServerConfig::from_env();
        assert!(result.unwrap_err().to_string().contains("PORT"));

        cleanup_env_vars();
    }

    #[test]
    #[serial]
    fn test_from_env_rejects_unknown_backend() {
        cleanup_env_vars();

        unsafe {
            env::set_var("SENTIMENT_BACKEND", "tensorflow");
        }
        let result = ServerConfig::from_env();
        assert!(result.unwrap_err().to_string().contains("SENTIMENT_BACKEND"));

        cleanup_env_vars();
    }

    #[test]
    #[serial]
    fn test_from_file_yaml_only() {
        cleanup_env_vars();

        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.yaml");

        let yaml_content = r#"
server:
  host: "127.0.0.1"
  port: 8080

elevenlabs:
  api_key: "yaml-el-key"
  voice_id: "yaml-voice"
  model_id: "eleven_turbo_v2"

sentiment:
  backend: "onnx"

cache:
  path: "/tmp/yaml-cache"

persistence:
  mode: "strict"
"#;

        fs::write(&config_path, yaml_content).unwrap();

        let config = ServerConfig::from_file(&config_path).unwrap();

        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 8080);
        assert_eq!(config.elevenlabs_api_key, Some("yaml-el-key".to_string()));
        assert_eq!(config.elevenlabs_voice_id, Some("yaml-voice".to_string()));
        assert_eq!(config.elevenlabs_model_id, "eleven_turbo_v2");
        assert_eq!(config.sentiment_backend, SentimentBackend::Onnx);
        assert_eq!(config.cache_path, Some(PathBuf::from("/tmp/yaml-cache")));
        assert_eq!(config.persistence_mode, PersistenceMode::Strict);

        cleanup_env_vars();
    }

    #[test]
    #[serial]
    fn test_from_file_yaml_overrides_env() {
        cleanup_env_vars();

        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.yaml");

        let yaml_content = r#"
server:
  host: "127.0.0.1"

elevenlabs:
  api_key: "yaml-key"
"#;

        fs::write(&config_path, yaml_content).unwrap();

        unsafe {
            env::set_var("HOST", "0.0.0.0");
            env::set_var("PORT", "9001");
            env::set_var("ELEVENLABS_API_KEY", "env-key");
            env::set_var("ELEVENLABS_VOICE_ID", "env-voice");
        }

        let config = ServerConfig::from_file(&config_path).unwrap();

        // YAML overrides ENV
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.elevenlabs_api_key, Some("yaml-key".to_string()));
        // ENV fills what YAML leaves out
        assert_eq!(config.port, 9001);
        assert_eq!(config.elevenlabs_voice_id, Some("env-voice".to_string()));

        cleanup_env_vars();
    }

    #[test]
    #[serial]
    fn test_from_file_missing_file() {
        cleanup_env_vars();

        let config_path = PathBuf::from("/nonexistent/config.yaml");
        let result = ServerConfig::from_file(&config_path);

        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("Failed to read config file")
        );

        cleanup_env_vars();
    }

    #[test]
    #[serial]
    fn test_from_file_invalid_yaml() {
        cleanup_env_vars();

        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("invalid.yaml");

        fs::write(&config_path, "invalid: yaml: [content").unwrap();

        let result = ServerConfig::from_file(&config_path);

        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("Failed to parse YAML")
        );

        cleanup_env_vars();
    }

    #[test]
    #[serial]
    fn test_from_file_tls_requires_existing_files() {
        cleanup_env_vars();

        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.yaml");
        fs::write(
            &config_path,
            r#"
server:
  tls:
    enabled: true
    cert_path: "/nonexistent/cert.pem"
    key_path: "/nonexistent/key.pem"
"#,
        )
        .unwrap();

        let result = ServerConfig::from_file(&config_path);
        assert!(result.unwrap_err().to_string().contains("TLS"));

        cleanup_env_vars();
    }
}
