//! Emotion detection and voice selection.
//!
//! Two pieces of fixed logic live here:
//!
//! ```text
//! ┌──────────────────┐   classify()   ┌──────────────┐
//! │ SentimentScores  │───────────────▶│ EmotionLabel │  (detected, informational)
//! │ neg / neu / pos  │                └──────────────┘
//! └──────────────────┘
//!
//! ┌──────────────────┐   lookup()     ┌──────────────┐
//! │ caller "emotion" │───────────────▶│ VoiceProfile │  (drives synthesis)
//! └──────────────────┘                └──────────────┘
//! ```
//!
//! The detected label never influences synthesis. The caller's selection
//! always picks the voice profile, and unknown selections fall back to the
//! default profile without error.
//!
//! # See Also
//!
//! - [`types`] - `EmotionLabel` and `SentimentScores`
//! - [`mapper`] - The ordered threshold rules
//! - [`profiles`] - The per-label ElevenLabs voice settings

pub mod mapper;
pub mod profiles;
pub mod types;

pub use mapper::classify;
pub use profiles::{DEFAULT_VOICE_PROFILE, VoiceProfile, lookup, mapped_profiles, profile_for};
pub use types::{EmotionLabel, SentimentScores};
