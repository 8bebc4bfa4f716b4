mod base;
pub mod elevenlabs;

pub use base::{BoxedSynthesizer, SpeechSynthesizer, TTSError, TTSResult};
pub use elevenlabs::{DEFAULT_MODEL_ID, ELEVENLABS_BASE_URL, ElevenLabsConfig, ElevenLabsTTS};

use std::sync::Arc;

/// Factory function to create a speech synthesizer.
///
/// # Supported Providers
///
/// - `"elevenlabs"` or `"eleven-labs"` - ElevenLabs streaming TTS API
///
/// # Example
///
/// ```rust,ignore
/// use emotts_gateway::core::tts::{create_synthesizer, ElevenLabsConfig};
///
/// let tts = create_synthesizer("elevenlabs", ElevenLabsConfig::default())?;
/// assert_eq!(tts.provider_name(), "elevenlabs");
/// ```
pub fn create_synthesizer(
    provider_type: &str,
    config: ElevenLabsConfig,
) -> TTSResult<BoxedSynthesizer> {
    match provider_type.to_lowercase().as_str() {
        "elevenlabs" | "eleven-labs" | "eleven_labs" => Ok(Arc::new(ElevenLabsTTS::new(config)?)),
        _ => Err(TTSError::InvalidConfiguration(format!(
            "Unsupported TTS provider: {provider_type}. Supported providers: elevenlabs"
        ))),
    }
}
