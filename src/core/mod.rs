pub mod emotion;
pub mod generation;
pub mod sentiment;
pub mod storage;
pub mod tts;

// Re-export commonly used types for convenience
pub use emotion::{EmotionLabel, SentimentScores, VoiceProfile, classify, lookup};

pub use generation::{
    FailureKind, GenerationError, GenerationOptions, GenerationResult, GenerationService,
    PersistenceMode, SynthesisOutcome,
};

pub use sentiment::{
    BoxedClassifier, ClassifierStatus, SentimentBackend, SentimentClassifier, SentimentConfig,
    SentimentError, build_classifier,
};

pub use storage::{AudioStore, GenerationRecord, GenerationStore, StorageError};

pub use tts::{
    BoxedSynthesizer, ElevenLabsConfig, SpeechSynthesizer, TTSError, TTSResult, create_synthesizer,
};
