use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;

use crate::config::ServerConfig;
use crate::core::generation::GenerationService;
use crate::core::sentiment::{BoxedClassifier, ClassifierStatus, build_classifier};
use crate::core::storage::{AudioStore, BoxedGenerationStore, ObjectStoreRecorder};
use crate::core::tts::{BoxedSynthesizer, create_synthesizer};

/// Shared application state handed to every handler
pub struct AppState {
    pub config: ServerConfig,
    /// Outcome of classifier construction at startup
    pub classifier_status: ClassifierStatus,
    pub synthesizer: BoxedSynthesizer,
    pub generation: GenerationService,
}

impl AppState {
    /// Build every collaborator from configuration.
    ///
    /// The sentiment classifier never prevents startup; its readiness is
    /// reported through `classifier_status`. Storage and synthesizer
    /// misconfiguration does.
    pub async fn new(config: ServerConfig) -> Result<Arc<Self>> {
        let (classifier, classifier_status) = build_classifier(&config.sentiment_config()).await;

        let synthesizer = create_synthesizer(&config.tts_provider, config.elevenlabs_config())
            .context("Failed to create speech synthesizer")?;
        if !synthesizer.has_credentials() {
            tracing::warn!(
                "ElevenLabs API key or voice id not configured; /generate will fail until they are set"
            );
        }

        let audio_store = AudioStore::from_config(&config.audio_storage_config())
            .context("Failed to initialize audio storage")?;

        let recorder: Option<BoxedGenerationStore> = if config.persistence_enabled {
            let recorder = ObjectStoreRecorder::local(&config.persistence_path)
                .context("Failed to initialize generation persistence")?;
            info!("Generation records stored under {:?}", config.persistence_path);
            Some(Arc::new(recorder))
        } else {
            None
        };

        Ok(Self::with_components(
            config,
            classifier,
            classifier_status,
            synthesizer,
            audio_store,
            recorder,
        ))
    }

    /// Assemble state from pre-built collaborators
    pub fn with_components(
        config: ServerConfig,
        classifier: BoxedClassifier,
        classifier_status: ClassifierStatus,
        synthesizer: BoxedSynthesizer,
        audio_store: AudioStore,
        recorder: Option<BoxedGenerationStore>,
    ) -> Arc<Self> {
        let generation = GenerationService::new(
            classifier,
            synthesizer.clone(),
            audio_store,
            recorder,
            config.generation_options(),
        );

        Arc::new(Self {
            config,
            classifier_status,
            synthesizer,
            generation,
        })
    }
}
