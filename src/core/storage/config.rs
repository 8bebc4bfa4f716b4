use std::path::PathBuf;

/// Default URL prefix under which audio artifacts are served
pub const DEFAULT_URL_PREFIX: &str = "static";

/// Default local directory for audio artifacts
pub const DEFAULT_AUDIO_DIR: &str = "static";

/// S3-compatible bucket settings for audio artifacts
#[derive(Debug, Clone, Default)]
pub struct S3Settings {
    pub bucket: String,
    pub region: Option<String>,
    /// Custom endpoint for MinIO and other S3-compatible stores
    pub endpoint: Option<String>,
    pub access_key: Option<String>,
    pub secret_key: Option<String>,
    /// Key prefix prepended to every artifact
    pub prefix: Option<String>,
}

/// Where audio artifacts are written
#[derive(Debug, Clone)]
pub struct AudioStorageConfig {
    /// Local directory used when no bucket is configured
    pub local_dir: PathBuf,
    /// Bucket settings; takes precedence over `local_dir`
    pub s3: Option<S3Settings>,
    /// Prefix of the relative reference returned to callers
    pub url_prefix: String,
}

impl Default for AudioStorageConfig {
    fn default() -> Self {
        Self {
            local_dir: PathBuf::from(DEFAULT_AUDIO_DIR),
            s3: None,
            url_prefix: DEFAULT_URL_PREFIX.to_string(),
        }
    }
}
