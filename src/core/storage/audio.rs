//! Audio artifact store.
//!
//! Every synthesis gets its own object named `<request_id>.mp3`; the value
//! handed back to callers is the relative reference
//! `{url_prefix}/<request_id>.mp3`, which `GET /static/{file}` resolves.

use bytes::Bytes;
use object_store::aws::AmazonS3Builder;
use object_store::local::LocalFileSystem;
use object_store::memory::InMemory;
use object_store::{Error as ObjectStoreError, ObjectStore, PutPayload, path::Path as ObjectPath};
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

use super::StorageError;
use super::config::{AudioStorageConfig, S3Settings};

const AUDIO_EXTENSION: &str = "mp3";

/// Rejects empty names, path separators and parent references.
pub fn is_valid_file_name(name: &str) -> bool {
    !name.is_empty()
        && name.len() <= 255
        && !name.contains("..")
        && !name.contains('/')
        && !name.contains('\\')
}

fn key_prefix(prefix: Option<&str>) -> Option<String> {
    prefix
        .map(|p| p.trim().trim_matches('/'))
        .filter(|p| !p.is_empty())
        .map(str::to_string)
}

/// Object-store-backed audio artifact store
#[derive(Clone)]
pub struct AudioStore {
    store: Arc<dyn ObjectStore>,
    key_prefix: Option<String>,
    url_prefix: String,
    backend: &'static str,
}

impl std::fmt::Debug for AudioStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AudioStore")
            .field("backend", &self.backend)
            .field("key_prefix", &self.key_prefix)
            .field("url_prefix", &self.url_prefix)
            .finish()
    }
}

impl AudioStore {
    /// Build the store described by `config`: S3 when a bucket is set,
    /// otherwise the local directory (created if missing).
    pub fn from_config(config: &AudioStorageConfig) -> Result<Self, StorageError> {
        match &config.s3 {
            Some(s3) => Self::s3(s3, &config.url_prefix),
            None => {
                std::fs::create_dir_all(&config.local_dir).map_err(|e| {
                    StorageError::Configuration(format!(
                        "Failed to create audio directory {:?}: {e}",
                        config.local_dir
                    ))
                })?;
                let store = LocalFileSystem::new_with_prefix(&config.local_dir)?;
                info!("Audio artifacts stored under {:?}", config.local_dir);
                Ok(Self {
                    store: Arc::new(store),
                    key_prefix: None,
                    url_prefix: config.url_prefix.clone(),
                    backend: "local",
                })
            }
        }
    }

    fn s3(settings: &S3Settings, url_prefix: &str) -> Result<Self, StorageError> {
        if settings.bucket.trim().is_empty() {
            return Err(StorageError::Configuration(
                "S3 bucket name is empty".to_string(),
            ));
        }

        let mut builder = AmazonS3Builder::from_env().with_bucket_name(&settings.bucket);
        if let Some(region) = &settings.region {
            builder = builder.with_region(region);
        }
        if let Some(endpoint) = &settings.endpoint {
            builder = builder.with_endpoint(endpoint).with_allow_http(true);
        }
        if let Some(access_key) = &settings.access_key {
            builder = builder.with_access_key_id(access_key);
        }
        if let Some(secret_key) = &settings.secret_key {
            builder = builder.with_secret_access_key(secret_key);
        }

        let store = builder.build()?;
        info!("Audio artifacts stored in bucket {}", settings.bucket);

        Ok(Self {
            store: Arc::new(store),
            key_prefix: key_prefix(settings.prefix.as_deref()),
            url_prefix: url_prefix.to_string(),
            backend: "s3",
        })
    }

    /// In-process store, used by tests and ephemeral deployments
    pub fn in_memory(url_prefix: impl Into<String>) -> Self {
        Self {
            store: Arc::new(InMemory::new()),
            key_prefix: None,
            url_prefix: url_prefix.into(),
            backend: "memory",
        }
    }

    /// Backend name for logs and health output
    pub fn backend(&self) -> &'static str {
        self.backend
    }

    /// Artifact file name for a request
    pub fn file_name(request_id: &Uuid) -> String {
        format!("{request_id}.{AUDIO_EXTENSION}")
    }

    fn object_path(&self, file_name: &str) -> Result<ObjectPath, StorageError> {
        let key = match &self.key_prefix {
            Some(prefix) => format!("{prefix}/{file_name}"),
            None => file_name.to_string(),
        };
        ObjectPath::parse(key).map_err(|e| StorageError::InvalidName(e.to_string()))
    }

    /// Relative reference callers use to fetch `file_name`
    pub fn reference(&self, file_name: &str) -> String {
        let prefix = self.url_prefix.trim_matches('/');
        if prefix.is_empty() {
            file_name.to_string()
        } else {
            format!("{prefix}/{file_name}")
        }
    }

    /// Store the audio for a request and return its relative reference
    pub async fn save(&self, request_id: &Uuid, audio: Bytes) -> Result<String, StorageError> {
        let file_name = Self::file_name(request_id);
        let path = self.object_path(&file_name)?;
        let size = audio.len();

        self.store.put(&path, PutPayload::from(audio)).await?;
        debug!(%path, bytes = size, "Audio artifact stored");

        Ok(self.reference(&file_name))
    }

    /// Read back a stored artifact by file name
    pub async fn load(&self, file_name: &str) -> Result<Bytes, StorageError> {
        if !is_valid_file_name(file_name) {
            return Err(StorageError::InvalidName(file_name.to_string()));
        }
        let path = self.object_path(file_name)?;

        let result = match self.store.get(&path).await {
            Ok(result) => result,
            Err(ObjectStoreError::NotFound { .. }) => {
                return Err(StorageError::NotFound(file_name.to_string()));
            }
            Err(e) => return Err(e.into()),
        };

        Ok(result.bytes().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_file_name_validation() {
        assert!(is_valid_file_name("0b5c7a9e.mp3"));
        assert!(!is_valid_file_name(""));
        assert!(!is_valid_file_name("../secret"));
        assert!(!is_valid_file_name("a/b.mp3"));
        assert!(!is_valid_file_name("a\\b.mp3"));
        assert!(!is_valid_file_name(&"x".repeat(256)));
    }

    #[test]
    fn test_reference_formatting() {
        assert_eq!(AudioStore::in_memory("static").reference("a.mp3"), "static/a.mp3");
        assert_eq!(
            AudioStore::in_memory("/media/audio/").reference("a.mp3"),
            "media/audio/a.mp3"
        );
        assert_eq!(AudioStore::in_memory("").reference("a.mp3"), "a.mp3");
    }

    #[tokio::test]
    async fn test_save_and_load_in_memory() {
        let store = AudioStore::in_memory("static");
        let id = Uuid::new_v4();

        let reference = store.save(&id, Bytes::from_static(b"ID3")).await.unwrap();
        assert_eq!(reference, format!("static/{id}.mp3"));

        let loaded = store.load(&format!("{id}.mp3")).await.unwrap();
        assert_eq!(loaded.as_ref(), b"ID3");
    }

    #[tokio::test]
    async fn test_distinct_requests_do_not_collide() {
        let store = AudioStore::in_memory("static");
        let first = Uuid::new_v4();
        let second = Uuid::new_v4();

        let a = store.save(&first, Bytes::from_static(b"one")).await.unwrap();
        let b = store.save(&second, Bytes::from_static(b"two")).await.unwrap();
        assert_ne!(a, b);

        assert_eq!(store.load(&AudioStore::file_name(&first)).await.unwrap().as_ref(), b"one");
        assert_eq!(store.load(&AudioStore::file_name(&second)).await.unwrap().as_ref(), b"two");
    }

    #[tokio::test]
    async fn test_load_missing_and_invalid() {
        let store = AudioStore::in_memory("static");
        assert!(matches!(
            store.load("missing.mp3").await,
            Err(StorageError::NotFound(_))
        ));
        assert!(matches!(
            store.load("../etc/passwd").await,
            Err(StorageError::InvalidName(_))
        ));
    }

    #[tokio::test]
    async fn test_local_store_creates_directory() {
        let temp_dir = tempdir().unwrap();
        let audio_dir = temp_dir.path().join("nested").join("static");
        let config = AudioStorageConfig {
            local_dir: audio_dir.clone(),
            ..Default::default()
        };

        let store = AudioStore::from_config(&config).unwrap();
        assert_eq!(store.backend(), "local");

        let id = Uuid::new_v4();
        store.save(&id, Bytes::from_static(b"mp3")).await.unwrap();
        assert_eq!(
            std::fs::read(audio_dir.join(AudioStore::file_name(&id))).unwrap(),
            b"mp3"
        );
    }

    #[test]
    fn test_s3_requires_bucket() {
        let config = AudioStorageConfig {
            s3: Some(S3Settings::default()),
            ..Default::default()
        };
        assert!(matches!(
            AudioStore::from_config(&config),
            Err(StorageError::Configuration(_))
        ));
    }

    #[test]
    fn test_key_prefix_normalization() {
        assert_eq!(key_prefix(Some(" /audio/tts/ ")), Some("audio/tts".to_string()));
        assert_eq!(key_prefix(Some("  ")), None);
        assert_eq!(key_prefix(None), None);
    }
}
