use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

use crate::core::emotion::VoiceProfile;

/// Result type for TTS operations
pub type TTSResult<T> = Result<T, TTSError>;

/// Errors raised while synthesizing speech
#[derive(Error, Debug)]
pub enum TTSError {
    /// API key or voice id was not configured
    #[error("Missing credentials: {0}")]
    MissingCredentials(String),

    /// Provider configuration is unusable
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Provider answered with a non-success status
    #[error("Provider returned HTTP {status}: {message}")]
    ProviderError { status: u16, message: String },

    /// Request never completed (DNS, TLS, connection reset, ...)
    #[error("Network error: {0}")]
    NetworkError(String),

    /// Provider answered 2xx without any audio
    #[error("Provider returned an empty audio body")]
    EmptyAudio,
}

impl From<reqwest::Error> for TTSError {
    fn from(err: reqwest::Error) -> Self {
        TTSError::NetworkError(err.to_string())
    }
}

/// A text-to-speech backend that turns text plus voice settings into audio.
///
/// Implementations are shared read-only across requests.
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    /// Synthesize `text` with the given voice settings and return encoded audio.
    async fn synthesize(&self, text: &str, profile: &VoiceProfile) -> TTSResult<Bytes>;

    /// Short provider identifier used in logs and health output
    fn provider_name(&self) -> &'static str;

    /// Whether credentials are present. Synthesis still fails at call time when false.
    fn has_credentials(&self) -> bool;
}

/// Shared, type-erased synthesizer handle
pub type BoxedSynthesizer = std::sync::Arc<dyn SpeechSynthesizer>;
