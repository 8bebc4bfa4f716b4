//! ElevenLabs provider configuration.

use url::Url;

use crate::core::tts::base::{TTSError, TTSResult};

/// Default ElevenLabs API origin
pub const ELEVENLABS_BASE_URL: &str = "https://api.elevenlabs.io";

/// Default synthesis model
pub const DEFAULT_MODEL_ID: &str = "eleven_monolingual_v1";

/// Settings for the ElevenLabs text-to-speech API.
///
/// API key and voice id are supplied out-of-band (environment or YAML). A
/// missing value does not prevent construction; it is reported as
/// [`TTSError::MissingCredentials`] on the first synthesis attempt.
#[derive(Debug, Clone)]
pub struct ElevenLabsConfig {
    /// `xi-api-key` header value
    pub api_key: Option<String>,
    /// Voice to synthesize with
    pub voice_id: Option<String>,
    /// Model identifier sent with every request
    pub model_id: String,
    /// API origin, overridable for proxies and tests
    pub base_url: String,
}

impl Default for ElevenLabsConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            voice_id: None,
            model_id: DEFAULT_MODEL_ID.to_string(),
            base_url: ELEVENLABS_BASE_URL.to_string(),
        }
    }
}

impl ElevenLabsConfig {
    /// Returns the API key and voice id, or the first one missing.
    pub fn credentials(&self) -> TTSResult<(&str, &str)> {
        let api_key = self
            .api_key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| {
                TTSError::MissingCredentials("ElevenLabs API key not configured".to_string())
            })?;
        let voice_id = self
            .voice_id
            .as_deref()
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| {
                TTSError::MissingCredentials("ElevenLabs voice id not configured".to_string())
            })?;
        Ok((api_key, voice_id))
    }

    /// Builds the streaming synthesis endpoint for a voice.
    pub fn stream_url(&self, voice_id: &str) -> TTSResult<Url> {
        let mut url = Url::parse(&self.base_url).map_err(|e| {
            TTSError::InvalidConfiguration(format!(
                "Invalid ElevenLabs base URL '{}': {e}",
                self.base_url
            ))
        })?;

        url.path_segments_mut()
            .map_err(|_| {
                TTSError::InvalidConfiguration(format!(
                    "ElevenLabs base URL '{}' cannot be a base",
                    self.base_url
                ))
            })?
            .pop_if_empty()
            .extend(["v1", "text-to-speech", voice_id, "stream"]);
        Ok(url)
    }
}
