use axum::response::Json;
use serde::Serialize;

use crate::core::emotion::{
    DEFAULT_VOICE_PROFILE, EmotionLabel, VoiceProfile, mapped_profiles, profile_for,
};

#[derive(Debug, Serialize)]
pub struct EmotionEntry {
    pub label: EmotionLabel,
    pub profile: VoiceProfile,
    /// False when the label falls back to the default profile
    pub mapped: bool,
}

#[derive(Debug, Serialize)]
pub struct EmotionsResponse {
    pub emotions: Vec<EmotionEntry>,
    pub default_profile: VoiceProfile,
}

/// Lists every emotion label with the voice settings it selects
pub async fn list_emotions() -> Json<EmotionsResponse> {
    let mapped = mapped_profiles();
    let emotions = EmotionLabel::all()
        .iter()
        .map(|&label| EmotionEntry {
            label,
            profile: profile_for(label),
            mapped: mapped.iter().any(|(l, _)| *l == label),
        })
        .collect();

    Json(EmotionsResponse {
        emotions,
        default_profile: DEFAULT_VOICE_PROFILE,
    })
}
