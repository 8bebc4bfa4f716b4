use super::ServerConfig;

/// Checks the merged configuration before the server starts.
pub(crate) fn validate(config: &ServerConfig) -> Result<(), String> {
    validate_tls(config)?;
    validate_rate_limit(config)?;
    validate_audio_storage(config)?;
    validate_audio_url_prefix(&config.audio_url_prefix)?;
    Ok(())
}

fn validate_tls(config: &ServerConfig) -> Result<(), String> {
    if let Some(tls) = &config.tls {
        if !tls.cert_path.exists() {
            return Err(format!(
                "TLS certificate not found at {}",
                tls.cert_path.display()
            ));
        }
        if !tls.key_path.exists() {
            return Err(format!(
                "TLS private key not found at {}",
                tls.key_path.display()
            ));
        }
    }
    Ok(())
}

fn validate_rate_limit(config: &ServerConfig) -> Result<(), String> {
    if config.rate_limit_requests_per_second == 0 {
        return Err("RATE_LIMIT_REQUESTS_PER_SECOND must be greater than 0".to_string());
    }
    if config.rate_limit_burst_size == 0 {
        return Err("RATE_LIMIT_BURST_SIZE must be greater than 0".to_string());
    }
    Ok(())
}

fn validate_audio_storage(config: &ServerConfig) -> Result<(), String> {
    if config.audio_s3_access_key.is_some() != config.audio_s3_secret_key.is_some() {
        return Err(
            "AUDIO_S3_ACCESS_KEY and AUDIO_S3_SECRET_KEY must be set together".to_string(),
        );
    }
    if config.audio_s3_bucket.is_none() && config.audio_dir.as_os_str().is_empty() {
        return Err("AUDIO_DIR must not be empty when no S3 bucket is configured".to_string());
    }
    Ok(())
}

/// Relative prefixes become a route path, so they must be plain segments
fn validate_audio_url_prefix(prefix: &str) -> Result<(), String> {
    let prefix = prefix.trim();
    if prefix.contains("://") {
        return Ok(());
    }
    let trimmed = prefix.trim_matches('/');
    let invalid = trimmed.contains("//")
        || trimmed
            .split('/')
            .any(|segment| segment == ".." || segment == ".")
        || trimmed
            .chars()
            .any(|c| c.is_whitespace() || matches!(c, '{' | '}' | '*' | '?' | '#' | ':'));
    if invalid {
        return Err(format!(
            "AUDIO_URL_PREFIX '{prefix}' must be a plain path like 'static' or an absolute URL"
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TlsConfig;
    use std::path::PathBuf;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_are_valid() {
        assert!(validate(&ServerConfig::default()).is_ok());
    }

    #[test]
    fn test_tls_paths_must_exist() {
        let temp_dir = TempDir::new().unwrap();
        let cert = temp_dir.path().join("cert.pem");
        let key = temp_dir.path().join("key.pem");
        std::fs::write(&cert, "cert").unwrap();

        let mut config = ServerConfig::default();
        config.tls = Some(TlsConfig {
            cert_path: cert.clone(),
            key_path: key.clone(),
        });
        assert!(validate(&config).unwrap_err().contains("private key"));

        std::fs::write(&key, "key").unwrap();
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_zero_rate_limit_rejected() {
        let mut config = ServerConfig::default();
        config.rate_limit_requests_per_second = 0;
        assert!(validate(&config).is_err());

        let mut config = ServerConfig::default();
        config.rate_limit_burst_size = 0;
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_s3_keys_must_pair() {
        let mut config = ServerConfig::default();
        config.audio_s3_bucket = Some("bucket".to_string());
        config.audio_s3_access_key = Some("AKIA".to_string());
        assert!(validate(&config).unwrap_err().contains("AUDIO_S3_SECRET_KEY"));
    }

    #[test]
    fn test_empty_audio_dir_rejected() {
        let mut config = ServerConfig::default();
        config.audio_dir = PathBuf::new();
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_audio_url_prefix_shapes() {
        for ok in ["static", "/media/audio/", "", "https://cdn.example.com/audio"] {
            assert!(validate_audio_url_prefix(ok).is_ok(), "{ok}");
        }
        for bad in ["{file}", "a//b", "../up", "with space", "*all"] {
            assert!(validate_audio_url_prefix(bad).is_err(), "{bad}");
        }

        let mut config = ServerConfig::default();
        config.audio_url_prefix = "media/{x}".to_string();
        assert!(validate(&config).unwrap_err().contains("AUDIO_URL_PREFIX"));
    }
}
