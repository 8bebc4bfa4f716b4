//! Per-emotion ElevenLabs voice settings.
//!
//! ElevenLabs controls expressiveness through voice settings rather than
//! explicit emotion tags:
//!
//! - **Stability** (0.0-1.0): lower values are more expressive
//! - **Similarity Boost** (0.0-1.0): higher values stay closer to the source voice
//! - **Style** (0.0-1.0): style exaggeration
//!
//! Six labels have tuned settings. Every other string, including
//! `"Mixed Emotion"` and labels that do not exist, resolves silently to
//! [`DEFAULT_VOICE_PROFILE`].

use serde::{Deserialize, Serialize};

use super::types::EmotionLabel;

/// Synthesis parameters sent with every TTS request.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VoiceProfile {
    pub stability: f32,
    pub similarity_boost: f32,
    pub style: f32,
    pub speaker_boost: bool,
}

impl VoiceProfile {
    const fn boosted(stability: f32, similarity_boost: f32, style: f32) -> Self {
        Self {
            stability,
            similarity_boost,
            style,
            speaker_boost: true,
        }
    }
}

impl Default for VoiceProfile {
    fn default() -> Self {
        DEFAULT_VOICE_PROFILE
    }
}

/// Profile used for unmapped or unknown labels.
pub const DEFAULT_VOICE_PROFILE: VoiceProfile = VoiceProfile::boosted(0.5, 0.5, 0.5);

static VOICE_PROFILES: phf::Map<&'static str, VoiceProfile> = phf::phf_map! {
    "Happiness" => VoiceProfile::boosted(0.8, 0.9, 0.7),
    "Sadness" => VoiceProfile::boosted(0.5, 0.9, 0.3),
    "Anger" => VoiceProfile::boosted(0.7, 0.9, 0.6),
    "Exclamation" => VoiceProfile::boosted(0.6, 0.9, 0.9),
    "Distress" => VoiceProfile::boosted(0.4, 0.8, 0.3),
    "Neutral" => VoiceProfile::boosted(0.5, 0.5, 0.5),
};

/// Resolves a caller-supplied label string to its voice profile.
///
/// Matching is case-sensitive and never fails.
///
/// # Example
///
/// ```rust
/// use emotts_gateway::core::emotion::{DEFAULT_VOICE_PROFILE, lookup};
///
/// assert_eq!(lookup("Happiness").style, 0.7);
/// assert_eq!(lookup("UnknownXYZ"), DEFAULT_VOICE_PROFILE);
/// ```
pub fn lookup(label: &str) -> VoiceProfile {
    VOICE_PROFILES
        .get(label)
        .copied()
        .unwrap_or(DEFAULT_VOICE_PROFILE)
}

/// Resolves a typed label to its voice profile.
#[inline]
pub fn profile_for(label: EmotionLabel) -> VoiceProfile {
    lookup(label.as_str())
}

/// Returns the labels that carry a tuned profile, in declaration order.
pub fn mapped_profiles() -> Vec<(EmotionLabel, VoiceProfile)> {
    EmotionLabel::all()
        .iter()
        .filter_map(|label| {
            VOICE_PROFILES
                .get(label.as_str())
                .map(|profile| (*label, *profile))
        })
        .collect()
}
