//! Core emotion types.
//!
//! This module defines the two values that flow through every generation
//! request: the three-way sentiment probabilities produced by the classifier
//! and the coarse emotion label derived from them.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Tolerance used when checking that the three probabilities sum to one.
pub const SCORE_SUM_TOLERANCE: f32 = 1e-3;

// =============================================================================
// Emotion Label
// =============================================================================

/// Coarse emotion labels derived from sentiment probabilities.
///
/// The same set is accepted from callers as an explicit voice selection.
/// Wire names are exactly the strings produced by [`EmotionLabel::as_str`];
/// `MixedEmotion` is written as `"Mixed Emotion"`.
///
/// # Example
///
/// ```rust
/// use emotts_gateway::core::emotion::EmotionLabel;
///
/// assert_eq!(EmotionLabel::Happiness.to_string(), "Happiness");
/// assert_eq!(EmotionLabel::parse("Mixed Emotion"), Some(EmotionLabel::MixedEmotion));
/// assert_eq!(EmotionLabel::parse("happiness"), None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EmotionLabel {
    /// Clearly positive text
    Happiness,
    /// Negative text with a strong neutral component
    Sadness,
    /// Negative text, moderately strong
    Anger,
    /// Very strongly positive text
    Exclamation,
    /// Very strongly negative text
    Distress,
    /// Predominantly neutral text
    Neutral,
    /// No dominant sentiment
    #[serde(rename = "Mixed Emotion", alias = "MixedEmotion")]
    MixedEmotion,
}

impl EmotionLabel {
    /// Returns every label in declaration order.
    #[inline]
    pub const fn all() -> &'static [EmotionLabel] {
        &[
            EmotionLabel::Happiness,
            EmotionLabel::Sadness,
            EmotionLabel::Anger,
            EmotionLabel::Exclamation,
            EmotionLabel::Distress,
            EmotionLabel::Neutral,
            EmotionLabel::MixedEmotion,
        ]
    }

    /// Returns the wire name of the label.
    #[inline]
    pub const fn as_str(&self) -> &'static str {
        match self {
            EmotionLabel::Happiness => "Happiness",
            EmotionLabel::Sadness => "Sadness",
            EmotionLabel::Anger => "Anger",
            EmotionLabel::Exclamation => "Exclamation",
            EmotionLabel::Distress => "Distress",
            EmotionLabel::Neutral => "Neutral",
            EmotionLabel::MixedEmotion => "Mixed Emotion",
        }
    }

    /// Parses a caller-supplied label.
    ///
    /// Matching is case-sensitive. `"MixedEmotion"` is accepted as an alias
    /// of `"Mixed Emotion"`. Anything else returns `None`.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "Happiness" => Some(EmotionLabel::Happiness),
            "Sadness" => Some(EmotionLabel::Sadness),
            "Anger" => Some(EmotionLabel::Anger),
            "Exclamation" => Some(EmotionLabel::Exclamation),
            "Distress" => Some(EmotionLabel::Distress),
            "Neutral" => Some(EmotionLabel::Neutral),
            "Mixed Emotion" | "MixedEmotion" => Some(EmotionLabel::MixedEmotion),
            _ => None,
        }
    }
}

impl fmt::Display for EmotionLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Sentiment Scores
// =============================================================================

/// Negative / neutral / positive probabilities for one piece of text.
///
/// Serialized with the field names the HTTP API has always used
/// (`roberta_neg`, `roberta_neu`, `roberta_pos`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct SentimentScores {
    #[serde(rename = "roberta_neg")]
    pub negative: f32,
    #[serde(rename = "roberta_neu")]
    pub neutral: f32,
    #[serde(rename = "roberta_pos")]
    pub positive: f32,
}

impl SentimentScores {
    /// Creates a score vector from its three components.
    #[inline]
    pub const fn new(negative: f32, neutral: f32, positive: f32) -> Self {
        Self {
            negative,
            neutral,
            positive,
        }
    }

    /// The all-zero vector substituted when no classifier is available.
    #[inline]
    pub const fn zero() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }

    /// Builds probabilities from raw `[negative, neutral, positive]` logits.
    ///
    /// Uses a max-shifted softmax so large logits do not overflow.
    pub fn from_logits(logits: [f32; 3]) -> Self {
        let max = logits.iter().copied().fold(f32::NEG_INFINITY, f32::max);
        let exp = logits.map(|x| (x - max).exp());
        let sum: f32 = exp.iter().sum();
        if !sum.is_finite() || sum <= 0.0 {
            return Self::zero();
        }
        Self::new(exp[0] / sum, exp[1] / sum, exp[2] / sum)
    }

    /// Returns whether the probabilities sum to one within tolerance.
    pub fn is_normalized(&self) -> bool {
        let in_range = [self.negative, self.neutral, self.positive]
            .iter()
            .all(|p| (0.0..=1.0).contains(p));
        in_range && (self.negative + self.neutral + self.positive - 1.0).abs() <= SCORE_SUM_TOLERANCE
    }

    /// Derives the emotion label for these scores.
    #[inline]
    pub fn emotion(&self) -> EmotionLabel {
        super::mapper::classify(self.positive, self.negative, self.neutral)
    }
}
