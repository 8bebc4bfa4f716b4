//! Request orchestration for `/generate`.
//!
//! ```text
//!  text ──► SentimentClassifier ──► SentimentScores ──► classify() ──► detected label
//!                 │ (unavailable → zero scores)
//!  selected label ──► lookup() ──► VoiceProfile
//!  text + VoiceProfile ──► SpeechSynthesizer ──► audio ──► AudioStore ──► audio_path
//!  everything ──► GenerationStore (optional)
//! ```
//!
//! The caller-selected label always drives the voice profile; the detected
//! label is informational.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use time::OffsetDateTime;
use tracing::{Instrument, debug, info, info_span, warn};
use uuid::Uuid;

use crate::core::emotion::{EmotionLabel, SentimentScores, lookup};
use crate::core::sentiment::BoxedClassifier;
use crate::core::storage::{AudioStore, BoxedGenerationStore, GenerationRecord, PersistenceError};
use crate::core::tts::{BoxedSynthesizer, TTSError};

/// What happens when a generation record cannot be written
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PersistenceMode {
    /// Log the failure and return the result unchanged
    #[default]
    BestEffort,
    /// Fail the request, still reporting the audio path
    Strict,
}

impl PersistenceMode {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().replace('-', "_").as_str() {
            "best_effort" | "besteffort" => Some(PersistenceMode::BestEffort),
            "strict" => Some(PersistenceMode::Strict),
            _ => None,
        }
    }
}

/// Why synthesis produced no audio
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// API key or voice id missing
    Credentials,
    /// Provider rejected the request or returned nothing
    Provider,
    /// Provider unreachable
    Network,
    /// Audio produced but could not be stored
    Storage,
    /// Synthesizer is misconfigured
    Configuration,
}

impl From<&TTSError> for FailureKind {
    fn from(err: &TTSError) -> Self {
        match err {
            TTSError::MissingCredentials(_) => FailureKind::Credentials,
            TTSError::InvalidConfiguration(_) => FailureKind::Configuration,
            TTSError::ProviderError { .. } | TTSError::EmptyAudio => FailureKind::Provider,
            TTSError::NetworkError(_) => FailureKind::Network,
        }
    }
}

/// Result of the synthesis step
#[derive(Debug, Clone, PartialEq)]
pub enum SynthesisOutcome {
    Audio { path: String },
    Failed { kind: FailureKind, message: String },
}

impl SynthesisOutcome {
    pub fn audio_path(&self) -> Option<&str> {
        match self {
            SynthesisOutcome::Audio { path } => Some(path),
            SynthesisOutcome::Failed { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            SynthesisOutcome::Audio { .. } => None,
            SynthesisOutcome::Failed { message, .. } => Some(message),
        }
    }
}

/// Everything computed for one request
#[derive(Debug, Clone)]
pub struct GenerationResult {
    pub id: Uuid,
    pub text: String,
    pub scores: SentimentScores,
    pub detected_emotion: EmotionLabel,
    /// Caller-supplied label, verbatim
    pub selected_emotion: String,
    pub outcome: SynthesisOutcome,
}

impl GenerationResult {
    fn to_record(&self) -> GenerationRecord {
        GenerationRecord {
            id: self.id,
            created_at: OffsetDateTime::now_utc(),
            text: self.text.clone(),
            scores: self.scores,
            detected_emotion: self.detected_emotion,
            selected_emotion: self.selected_emotion.clone(),
            audio_path: self.outcome.audio_path().map(str::to_string),
            error: self.outcome.error().map(str::to_string),
        }
    }
}

/// Request-level failures of [`GenerationService::handle`]
#[derive(Error, Debug)]
pub enum GenerationError {
    /// Required form field missing or blank
    #[error("{0}")]
    InvalidInput(String),

    /// Strict persistence mode and the record could not be written
    #[error("Failed to persist generation: {source}")]
    Persistence {
        #[source]
        source: PersistenceError,
        audio_path: Option<String>,
    },
}

/// Persistence behaviour of the service
#[derive(Debug, Clone, Copy)]
pub struct GenerationOptions {
    pub persistence_mode: PersistenceMode,
    /// Also record requests whose synthesis failed
    pub record_failed_synthesis: bool,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            persistence_mode: PersistenceMode::BestEffort,
            record_failed_synthesis: true,
        }
    }
}

/// Orchestrates classification, synthesis, storage and persistence
#[derive(Clone)]
pub struct GenerationService {
    classifier: BoxedClassifier,
    synthesizer: BoxedSynthesizer,
    audio_store: AudioStore,
    recorder: Option<BoxedGenerationStore>,
    options: GenerationOptions,
}

fn missing(field: &str) -> GenerationError {
    GenerationError::InvalidInput(format!("Missing required field: {field}"))
}

impl GenerationService {
    pub fn new(
        classifier: BoxedClassifier,
        synthesizer: BoxedSynthesizer,
        audio_store: AudioStore,
        recorder: Option<BoxedGenerationStore>,
        options: GenerationOptions,
    ) -> Self {
        Self {
            classifier,
            synthesizer,
            audio_store,
            recorder,
            options,
        }
    }

    pub fn audio_store(&self) -> &AudioStore {
        &self.audio_store
    }

    /// Handle one request. Missing input is rejected before any collaborator
    /// is called; synthesis failures are reported in the outcome.
    pub async fn handle(
        &self,
        text: Option<&str>,
        selected_emotion: Option<&str>,
    ) -> Result<GenerationResult, GenerationError> {
        let text = text
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| missing("text"))?;
        // Any present label is accepted; unknown or empty ones select the default profile
        let selected = selected_emotion.ok_or_else(|| missing("emotion"))?;

        let id = Uuid::new_v4();
        let span = info_span!("generate", request_id = %id, emotion = %selected);

        self.run(id, text, selected).instrument(span).await
    }

    async fn run(
        &self,
        id: Uuid,
        text: &str,
        selected: &str,
    ) -> Result<GenerationResult, GenerationError> {
        let scores = match self.classifier.classify(text).await {
            Ok(scores) => scores,
            Err(e) => {
                warn!("Sentiment classification unavailable, using zero scores: {}", e);
                SentimentScores::zero()
            }
        };
        let detected_emotion = scores.emotion();
        debug!(detected = %detected_emotion, "Emotion detected");

        let profile = lookup(selected);

        let outcome = match self.synthesizer.synthesize(text, &profile).await {
            Ok(audio) => match self.audio_store.save(&id, audio).await {
                Ok(path) => {
                    info!(audio_path = %path, "Speech synthesized");
                    SynthesisOutcome::Audio { path }
                }
                Err(e) => {
                    warn!("Failed to store synthesized audio: {}", e);
                    SynthesisOutcome::Failed {
                        kind: FailureKind::Storage,
                        message: format!("Failed to store synthesized audio: {e}"),
                    }
                }
            },
            Err(e) => {
                warn!(provider = self.synthesizer.provider_name(), "Synthesis failed: {}", e);
                SynthesisOutcome::Failed {
                    kind: FailureKind::from(&e),
                    message: e.to_string(),
                }
            }
        };

        let result = GenerationResult {
            id,
            text: text.to_string(),
            scores,
            detected_emotion,
            selected_emotion: selected.to_string(),
            outcome,
        };

        self.persist(&result).await?;
        Ok(result)
    }

    async fn persist(&self, result: &GenerationResult) -> Result<(), GenerationError> {
        let Some(recorder) = &self.recorder else {
            return Ok(());
        };
        if result.outcome.audio_path().is_none() && !self.options.record_failed_synthesis {
            return Ok(());
        }

        let Err(e) = recorder.record(&result.to_record()).await else {
            return Ok(());
        };

        // A failed synthesis is reported as such; its record is best-effort in every mode
        match (self.options.persistence_mode, result.outcome.audio_path()) {
            (PersistenceMode::Strict, Some(path)) => Err(GenerationError::Persistence {
                source: e,
                audio_path: Some(path.to_string()),
            }),
            _ => {
                warn!(store = recorder.name(), "Failed to record generation: {}", e);
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::emotion::VoiceProfile;
    use crate::core::sentiment::{SentimentClassifier, SentimentError};
    use crate::core::storage::{GenerationStore, MemoryRecorder};
    use crate::core::tts::{SpeechSynthesizer, TTSResult};
    use async_trait::async_trait;
    use bytes::Bytes;
    use parking_lot::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FixedClassifier {
        scores: Option<SentimentScores>,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl SentimentClassifier for FixedClassifier {
        async fn classify(&self, _text: &str) -> Result<SentimentScores, SentimentError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.scores
                .ok_or_else(|| SentimentError::Unavailable("offline".to_string()))
        }

        fn backend(&self) -> &'static str {
            "fixed"
        }
    }

    struct RecordingSynthesizer {
        fail_with: Option<u16>,
        profiles: Mutex<Vec<VoiceProfile>>,
    }

    #[async_trait]
    impl SpeechSynthesizer for RecordingSynthesizer {
        async fn synthesize(&self, _text: &str, profile: &VoiceProfile) -> TTSResult<Bytes> {
            self.profiles.lock().push(*profile);
            match self.fail_with {
                Some(status) => Err(TTSError::ProviderError {
                    status,
                    message: "quota exceeded".to_string(),
                }),
                None => Ok(Bytes::from_static(b"ID3audio")),
            }
        }

        fn provider_name(&self) -> &'static str {
            "recording"
        }

        fn has_credentials(&self) -> bool {
            true
        }
    }

    struct BrokenRecorder;

    #[async_trait]
    impl GenerationStore for BrokenRecorder {
        async fn record(&self, _record: &GenerationRecord) -> Result<(), PersistenceError> {
            Err(PersistenceError::Unavailable("database down".to_string()))
        }

        fn name(&self) -> &'static str {
            "broken"
        }
    }

    struct Harness {
        classifier: Arc<FixedClassifier>,
        synthesizer: Arc<RecordingSynthesizer>,
        recorder: Arc<MemoryRecorder>,
        service: GenerationService,
    }

    fn harness(scores: Option<SentimentScores>, fail_with: Option<u16>) -> Harness {
        let classifier = Arc::new(FixedClassifier {
            scores,
            calls: AtomicUsize::new(0),
        });
        let synthesizer = Arc::new(RecordingSynthesizer {
            fail_with,
            profiles: Mutex::new(Vec::new()),
        });
        let recorder = Arc::new(MemoryRecorder::new());
        let service = GenerationService::new(
            classifier.clone(),
            synthesizer.clone(),
            AudioStore::in_memory("static"),
            Some(recorder.clone()),
            GenerationOptions::default(),
        );
        Harness {
            classifier,
            synthesizer,
            recorder,
            service,
        }
    }

    #[tokio::test]
    async fn test_missing_input_calls_no_collaborator() {
        let h = harness(Some(SentimentScores::new(0.1, 0.1, 0.8)), None);

        for (text, emotion) in [
            (None, Some("Happiness")),
            (Some("hi"), None),
            (Some("   "), Some("Happiness")),
        ] {
            let err = h.service.handle(text, emotion).await.unwrap_err();
            assert!(matches!(err, GenerationError::InvalidInput(_)));
        }

        assert_eq!(h.classifier.calls.load(Ordering::SeqCst), 0);
        assert!(h.synthesizer.profiles.lock().is_empty());
        assert!(h.recorder.is_empty());
    }

    #[tokio::test]
    async fn test_selected_label_drives_profile() {
        // Strongly positive text, caller asks for Sadness
        let h = harness(Some(SentimentScores::new(0.05, 0.05, 0.9)), None);

        let result = h
            .service
            .handle(Some("Best day ever!"), Some("Sadness"))
            .await
            .unwrap();

        assert_eq!(result.detected_emotion, EmotionLabel::Exclamation);
        assert_eq!(result.selected_emotion, "Sadness");
        assert_eq!(h.synthesizer.profiles.lock()[0], lookup("Sadness"));

        let path = result.outcome.audio_path().unwrap();
        assert_eq!(path, format!("static/{}.mp3", result.id));
        let stored = h
            .service
            .audio_store()
            .load(&format!("{}.mp3", result.id))
            .await
            .unwrap();
        assert_eq!(stored.as_ref(), b"ID3audio");
    }

    #[tokio::test]
    async fn test_unknown_label_uses_default_profile() {
        let h = harness(Some(SentimentScores::new(0.3, 0.4, 0.3)), None);
        h.service
            .handle(Some("hello"), Some("UnknownXYZ"))
            .await
            .unwrap();
        assert_eq!(
            h.synthesizer.profiles.lock()[0],
            crate::core::emotion::DEFAULT_VOICE_PROFILE
        );
    }

    #[tokio::test]
    async fn test_empty_emotion_uses_default_profile() {
        let h = harness(Some(SentimentScores::new(0.1, 0.1, 0.8)), None);
        let result = h.service.handle(Some("hi"), Some("")).await.unwrap();

        assert_eq!(result.selected_emotion, "");
        assert!(result.outcome.audio_path().is_some());
        assert_eq!(
            h.synthesizer.profiles.lock()[0],
            crate::core::emotion::DEFAULT_VOICE_PROFILE
        );
    }

    #[tokio::test]
    async fn test_classifier_failure_degrades_to_zero_scores() {
        let h = harness(None, None);
        let result = h
            .service
            .handle(Some("hello"), Some("Neutral"))
            .await
            .unwrap();

        assert_eq!(result.scores, SentimentScores::zero());
        assert_eq!(result.detected_emotion, EmotionLabel::MixedEmotion);
        assert!(result.outcome.audio_path().is_some());
    }

    #[tokio::test]
    async fn test_synthesis_failure_has_no_audio_path() {
        let h = harness(Some(SentimentScores::new(0.1, 0.1, 0.8)), Some(401));
        let result = h
            .service
            .handle(Some("hello"), Some("Anger"))
            .await
            .unwrap();

        match &result.outcome {
            SynthesisOutcome::Failed { kind, message } => {
                assert_eq!(*kind, FailureKind::Provider);
                assert!(message.contains("401"));
            }
            other => panic!("Expected failure, got {other:?}"),
        }

        let records = h.recorder.records();
        assert_eq!(records.len(), 1);
        assert!(records[0].audio_path.is_none());
        assert!(records[0].error.is_some());
    }

    #[tokio::test]
    async fn test_failed_synthesis_not_recorded_when_disabled() {
        let recorder = Arc::new(MemoryRecorder::new());
        let service = GenerationService::new(
            Arc::new(FixedClassifier {
                scores: None,
                calls: AtomicUsize::new(0),
            }),
            Arc::new(RecordingSynthesizer {
                fail_with: Some(500),
                profiles: Mutex::new(Vec::new()),
            }),
            AudioStore::in_memory("static"),
            Some(recorder.clone()),
            GenerationOptions {
                record_failed_synthesis: false,
                ..Default::default()
            },
        );

        service.handle(Some("x"), Some("Neutral")).await.unwrap();
        assert!(recorder.is_empty());
    }

    #[tokio::test]
    async fn test_successful_generation_is_recorded() {
        let h = harness(Some(SentimentScores::new(0.7, 0.2, 0.1)), None);
        let result = h
            .service
            .handle(Some("This is awful"), Some("Anger"))
            .await
            .unwrap();

        let records = h.recorder.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, result.id);
        assert_eq!(records[0].detected_emotion, EmotionLabel::Anger);
        assert_eq!(records[0].audio_path.as_deref(), result.outcome.audio_path());
    }

    fn with_broken_recorder(mode: PersistenceMode, fail_with: Option<u16>) -> GenerationService {
        GenerationService::new(
            Arc::new(FixedClassifier {
                scores: Some(SentimentScores::new(0.1, 0.8, 0.1)),
                calls: AtomicUsize::new(0),
            }),
            Arc::new(RecordingSynthesizer {
                fail_with,
                profiles: Mutex::new(Vec::new()),
            }),
            AudioStore::in_memory("static"),
            Some(Arc::new(BrokenRecorder)),
            GenerationOptions {
                persistence_mode: mode,
                record_failed_synthesis: true,
            },
        )
    }

    #[tokio::test]
    async fn test_best_effort_persistence_keeps_result() {
        let service = with_broken_recorder(PersistenceMode::BestEffort, None);
        let result = service.handle(Some("ok"), Some("Neutral")).await.unwrap();
        assert!(result.outcome.audio_path().is_some());
    }

    #[tokio::test]
    async fn test_strict_persistence_reports_audio_path() {
        let service = with_broken_recorder(PersistenceMode::Strict, None);
        match service.handle(Some("ok"), Some("Neutral")).await {
            Err(GenerationError::Persistence { audio_path, .. }) => {
                assert!(audio_path.unwrap().starts_with("static/"));
            }
            other => panic!("Expected persistence error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_strict_persistence_keeps_synthesis_failure() {
        let service = with_broken_recorder(PersistenceMode::Strict, Some(401));
        let result = service.handle(Some("ok"), Some("Anger")).await.unwrap();

        match result.outcome {
            SynthesisOutcome::Failed { kind, message } => {
                assert_eq!(kind, FailureKind::Provider);
                assert!(message.contains("401"));
            }
            other => panic!("Expected synthesis failure, got {other:?}"),
        }
    }

    #[test]
    fn test_persistence_mode_parse() {
        assert_eq!(
            PersistenceMode::parse("best-effort"),
            Some(PersistenceMode::BestEffort)
        );
        assert_eq!(PersistenceMode::parse("STRICT"), Some(PersistenceMode::Strict));
        assert_eq!(PersistenceMode::parse("sometimes"), None);
    }
}
