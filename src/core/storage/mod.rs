//! Audio artifact storage and generation persistence.
//!
//! Both halves sit on [`object_store`], so the same code writes to a local
//! directory, an S3-compatible bucket, or memory in tests.

use thiserror::Error;

pub mod audio;
pub mod config;
pub mod records;

pub use audio::{AudioStore, is_valid_file_name};
pub use config::{AudioStorageConfig, S3Settings};
pub use records::{
    BoxedGenerationStore, GenerationRecord, GenerationStore, MemoryRecorder, ObjectStoreRecorder,
    PersistenceError,
};

/// Errors raised by the audio artifact store
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Invalid file name: {0}")]
    InvalidName(String),

    #[error("Audio file not found: {0}")]
    NotFound(String),

    /// Storage could not be constructed from configuration
    #[error("Storage configuration error: {0}")]
    Configuration(String),

    #[error("Storage backend error: {0}")]
    Backend(#[from] object_store::Error),
}
