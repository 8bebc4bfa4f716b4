//! Generation records: one document per `/generate` request.

use async_trait::async_trait;
use object_store::local::LocalFileSystem;
use object_store::{ObjectStore, PutPayload, path::Path as ObjectPath};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;
use time::OffsetDateTime;
use tracing::debug;
use uuid::Uuid;

use crate::core::emotion::{EmotionLabel, SentimentScores};

/// Errors raised while recording a generation
#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("Failed to serialize record: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Failed to write record: {0}")]
    Backend(#[from] object_store::Error),

    #[error("Persistence unavailable: {0}")]
    Unavailable(String),
}

/// Stored summary of one generation request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationRecord {
    pub id: Uuid,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    pub text: String,
    pub scores: SentimentScores,
    pub detected_emotion: EmotionLabel,
    /// Caller-supplied label, kept verbatim even when unknown
    pub selected_emotion: String,
    pub audio_path: Option<String>,
    pub error: Option<String>,
}

/// Sink for generation records
#[async_trait]
pub trait GenerationStore: Send + Sync {
    async fn record(&self, record: &GenerationRecord) -> Result<(), PersistenceError>;

    fn name(&self) -> &'static str;
}

pub type BoxedGenerationStore = Arc<dyn GenerationStore>;

/// Writes each record as `{prefix}/{id}.json` to an object store
pub struct ObjectStoreRecorder {
    store: Arc<dyn ObjectStore>,
    prefix: String,
}

impl ObjectStoreRecorder {
    pub fn new(store: Arc<dyn ObjectStore>, prefix: impl Into<String>) -> Self {
        Self {
            store,
            prefix: prefix.into().trim_matches('/').to_string(),
        }
    }

    /// Records under `dir/records`, creating the directory if needed
    pub fn local(dir: &Path) -> Result<Self, PersistenceError> {
        std::fs::create_dir_all(dir).map_err(|e| {
            PersistenceError::Unavailable(format!("Failed to create {dir:?}: {e}"))
        })?;
        let store = LocalFileSystem::new_with_prefix(dir)?;
        Ok(Self::new(Arc::new(store), "records"))
    }

    fn record_path(&self, id: &Uuid) -> Result<ObjectPath, PersistenceError> {
        let key = if self.prefix.is_empty() {
            format!("{id}.json")
        } else {
            format!("{}/{id}.json", self.prefix)
        };
        ObjectPath::parse(key).map_err(|e| PersistenceError::Unavailable(e.to_string()))
    }
}

#[async_trait]
impl GenerationStore for ObjectStoreRecorder {
    async fn record(&self, record: &GenerationRecord) -> Result<(), PersistenceError> {
        let path = self.record_path(&record.id)?;
        let body = serde_json::to_vec_pretty(record)?;
        self.store.put(&path, PutPayload::from(body)).await?;
        debug!(%path, "Generation record written");
        Ok(())
    }

    fn name(&self) -> &'static str {
        "object_store"
    }
}

/// Keeps records in process memory
#[derive(Default)]
pub struct MemoryRecorder {
    records: Mutex<Vec<GenerationRecord>>,
}

impl MemoryRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything recorded so far
    pub fn records(&self) -> Vec<GenerationRecord> {
        self.records.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.lock().is_empty()
    }
}

#[async_trait]
impl GenerationStore for MemoryRecorder {
    async fn record(&self, record: &GenerationRecord) -> Result<(), PersistenceError> {
        self.records.lock().push(record.clone());
        Ok(())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn sample() -> GenerationRecord {
        GenerationRecord {
            id: Uuid::new_v4(),
            created_at: OffsetDateTime::now_utc(),
            text: "What a day".to_string(),
            scores: SentimentScores::new(0.1, 0.2, 0.7),
            detected_emotion: EmotionLabel::Happiness,
            selected_emotion: "Sadness".to_string(),
            audio_path: Some("static/x.mp3".to_string()),
            error: None,
        }
    }

    #[test]
    fn test_record_serialization() {
        let record = sample();
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["detected_emotion"], "Happiness");
        assert_eq!(json["selected_emotion"], "Sadness");
        assert_eq!(json["scores"]["roberta_pos"].as_f64().unwrap() as f32, 0.7);
        // RFC 3339 timestamps carry a 'T' separator
        assert!(json["created_at"].as_str().unwrap().contains('T'));

        let back: GenerationRecord = serde_json::from_value(json).unwrap();
        assert_eq!(back.id, record.id);
    }

    #[tokio::test]
    async fn test_memory_recorder() {
        let recorder = MemoryRecorder::new();
        assert!(recorder.is_empty());
        recorder.record(&sample()).await.unwrap();
        recorder.record(&sample()).await.unwrap();
        assert_eq!(recorder.len(), 2);
    }

    #[tokio::test]
    async fn test_local_recorder_writes_json_document() {
        let temp_dir = tempdir().unwrap();
        let recorder = ObjectStoreRecorder::local(temp_dir.path()).unwrap();
        let record = sample();

        recorder.record(&record).await.unwrap();

        let path = temp_dir
            .path()
            .join("records")
            .join(format!("{}.json", record.id));
        let stored: GenerationRecord =
            serde_json::from_slice(&std::fs::read(path).unwrap()).unwrap();
        assert_eq!(stored.text, "What a day");
        assert_eq!(stored.audio_path.as_deref(), Some("static/x.mp3"));
    }
}
