//! ElevenLabs TTS provider module.
//!
//! Emotion is expressed through voice settings (stability, similarity boost,
//! style, speaker boost) taken from the selected [`VoiceProfile`].
//!
//! [`VoiceProfile`]: crate::core::emotion::VoiceProfile

mod config;
mod provider;

pub use config::{DEFAULT_MODEL_ID, ELEVENLABS_BASE_URL, ElevenLabsConfig};
pub use provider::ElevenLabsTTS;
