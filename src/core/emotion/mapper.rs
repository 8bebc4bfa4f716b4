//! Sentiment-to-emotion decision table.
//!
//! Rules are evaluated in order and the first match wins. All thresholds
//! are strict, so a score sitting exactly on 0.6 or 0.8 falls through to the
//! next rule. The positive and negative branches are intentionally not
//! mirror images: the negative branch consults `neutral` before `negative`.
//!
//! | Order | Condition | Label |
//! |-------|-----------|-------|
//! | 1 | positive > 0.8 | Exclamation |
//! | 2 | positive > 0.6 | Happiness |
//! | 3a | negative > 0.6 and neutral > 0.4 | Sadness |
//! | 3b | negative > 0.8 | Distress |
//! | 3c | negative > 0.6 | Anger |
//! | 4 | neutral > 0.6 | Neutral |
//! | 5 | otherwise | Mixed Emotion |

use super::types::EmotionLabel;

const STRONG_THRESHOLD: f32 = 0.8;
const DOMINANT_THRESHOLD: f32 = 0.6;
const NEUTRAL_UNDERTONE_THRESHOLD: f32 = 0.4;

/// Maps three sentiment probabilities to an emotion label.
///
/// Pure and total: any finite input in `[0, 1]` produces a label, and the
/// all-zero vector yields [`EmotionLabel::MixedEmotion`].
///
/// # Example
///
/// ```rust
/// use emotts_gateway::core::emotion::{EmotionLabel, classify};
///
/// assert_eq!(classify(0.9, 0.05, 0.05), EmotionLabel::Exclamation);
/// assert_eq!(classify(0.5, 0.65, 0.45), EmotionLabel::Sadness);
/// assert_eq!(classify(0.0, 0.0, 0.0), EmotionLabel::MixedEmotion);
/// ```
pub fn classify(positive: f32, negative: f32, neutral: f32) -> EmotionLabel {
    if positive > STRONG_THRESHOLD {
        EmotionLabel::Exclamation
    } else if positive > DOMINANT_THRESHOLD {
        EmotionLabel::Happiness
    } else if negative > DOMINANT_THRESHOLD {
        if neutral > NEUTRAL_UNDERTONE_THRESHOLD {
            EmotionLabel::Sadness
        } else if negative > STRONG_THRESHOLD {
            EmotionLabel::Distress
        } else {
            EmotionLabel::Anger
        }
    } else if neutral > DOMINANT_THRESHOLD {
        EmotionLabel::Neutral
    } else {
        EmotionLabel::MixedEmotion
    }
}
