//! ElevenLabs TTS provider implementation.
//!
//! # API Reference
//!
//! - Endpoint: `POST {base_url}/v1/text-to-speech/{voice_id}/stream`
//! - Auth: `xi-api-key` header
//! - Body: `text`, `model_id`, `voice_settings` (stability, similarity_boost,
//!   style, use_speaker_boost)
//! - Output: MP3 audio bytes

use async_trait::async_trait;
use bytes::Bytes;
use serde::Serialize;
use tracing::{debug, warn};

use super::config::ElevenLabsConfig;
use crate::core::emotion::VoiceProfile;
use crate::core::tts::base::{SpeechSynthesizer, TTSError, TTSResult};

/// Longest provider error body echoed back into an error message
const MAX_ERROR_BODY_CHARS: usize = 512;

// =============================================================================
// Request Body
// =============================================================================

#[derive(Debug, Serialize)]
struct VoiceSettings {
    stability: f32,
    similarity_boost: f32,
    style: f32,
    use_speaker_boost: bool,
}

impl From<&VoiceProfile> for VoiceSettings {
    fn from(profile: &VoiceProfile) -> Self {
        Self {
            stability: profile.stability,
            similarity_boost: profile.similarity_boost,
            style: profile.style,
            use_speaker_boost: profile.speaker_boost,
        }
    }
}

#[derive(Debug, Serialize)]
struct SynthesisRequest<'a> {
    text: &'a str,
    model_id: &'a str,
    voice_settings: VoiceSettings,
}

// =============================================================================
// ElevenLabs TTS Provider
// =============================================================================

/// ElevenLabs synthesizer backed by a pooled `reqwest::Client`.
///
/// # Example
///
/// ```rust,ignore
/// use emotts_gateway::core::emotion::lookup;
/// use emotts_gateway::core::tts::{ElevenLabsConfig, ElevenLabsTTS, SpeechSynthesizer};
///
/// let tts = ElevenLabsTTS::new(ElevenLabsConfig {
///     api_key: Some("sk_...".to_string()),
///     voice_id: Some("5Q0t7uMcjvnagumLfvZi".to_string()),
///     ..Default::default()
/// })?;
/// let audio = tts.synthesize("Hello there!", &lookup("Happiness")).await?;
/// ```
pub struct ElevenLabsTTS {
    client: reqwest::Client,
    config: ElevenLabsConfig,
}

impl ElevenLabsTTS {
    /// Create a new ElevenLabs provider
    pub fn new(config: ElevenLabsConfig) -> TTSResult<Self> {
        // Surface a malformed base URL at startup rather than per request
        config.stream_url("probe")?;

        let client = reqwest::Client::builder()
            .pool_max_idle_per_host(4)
            .build()
            .map_err(|e| {
                TTSError::InvalidConfiguration(format!("Failed to build HTTP client: {e}"))
            })?;

        Ok(Self { client, config })
    }

    /// Get the configured model id
    pub fn model_id(&self) -> &str {
        &self.config.model_id
    }

    /// Build the ElevenLabs-specific HTTP request
    fn build_http_request(
        &self,
        text: &str,
        profile: &VoiceProfile,
    ) -> TTSResult<reqwest::RequestBuilder> {
        let (api_key, voice_id) = self.config.credentials()?;
        let url = self.config.stream_url(voice_id)?;

        let body = SynthesisRequest {
            text,
            model_id: &self.config.model_id,
            voice_settings: VoiceSettings::from(profile),
        };

        Ok(self
            .client
            .post(url)
            .header("xi-api-key", api_key)
            .header("Content-Type", "application/json")
            .header("Accept", "audio/mpeg")
            .json(&body))
    }
}

fn truncate_error_body(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.chars().count() <= MAX_ERROR_BODY_CHARS {
        return trimmed.to_string();
    }
    let mut out: String = trimmed.chars().take(MAX_ERROR_BODY_CHARS).collect();
    out.push('…');
    out
}

#[async_trait]
impl SpeechSynthesizer for ElevenLabsTTS {
    async fn synthesize(&self, text: &str, profile: &VoiceProfile) -> TTSResult<Bytes> {
        let request = self.build_http_request(text, profile)?;

        debug!(
            model_id = %self.config.model_id,
            stability = profile.stability,
            similarity_boost = profile.similarity_boost,
            style = profile.style,
            chars = text.chars().count(),
            "Sending ElevenLabs synthesis request"
        );

        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), "ElevenLabs synthesis failed");
            return Err(TTSError::ProviderError {
                status: status.as_u16(),
                message: truncate_error_body(&body),
            });
        }

        let audio = response.bytes().await?;
        if audio.is_empty() {
            return Err(TTSError::EmptyAudio);
        }

        debug!(bytes = audio.len(), "ElevenLabs synthesis complete");
        Ok(audio)
    }

    fn provider_name(&self) -> &'static str {
        "elevenlabs"
    }

    fn has_credentials(&self) -> bool {
        self.config.credentials().is_ok()
    }
}
