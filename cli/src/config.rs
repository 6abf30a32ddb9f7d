use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tonecheck_core::DecoderConfig;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Load decoder tuning from a JSON file, or the defaults when no file is given.
/// Fields missing from the document keep their default values.
pub fn load_decoder_config(path: Option<&Path>) -> Result<DecoderConfig, ConfigError> {
    let Some(path) = path else {
        return Ok(DecoderConfig::default());
    };

    let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let config = serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    log::debug!("Loaded decoder config from {}: {:?}", path.display(), config);
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_file() {
        assert_eq!(load_decoder_config(None).unwrap(), DecoderConfig::default());
    }

    #[test]
    fn test_partial_document() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("decoder.json");
        fs::write(&path, r#"{ "keep_silence_ms": 50 }"#).unwrap();

        let config = load_decoder_config(Some(&path)).unwrap();
        assert_eq!(config.keep_silence_ms, 50);
        assert_eq!(config.peak_count, DecoderConfig::default().peak_count);
    }

    #[test]
    fn test_missing_and_malformed_files() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.json");
        assert!(matches!(
            load_decoder_config(Some(&missing)),
            Err(ConfigError::Read { .. })
        ));

        let broken = dir.path().join("broken.json");
        fs::write(&broken, "{ keep_silence_ms: }").unwrap();
        assert!(matches!(
            load_decoder_config(Some(&broken)),
            Err(ConfigError::Parse { .. })
        ));
    }
}
