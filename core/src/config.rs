use serde::{Deserialize, Serialize};

use crate::error::{Result, ToneCheckError};
use crate::{
    KEEP_SILENCE_MS, MAX_PAIR_DISTANCE_HZ, MIN_SILENCE_LEN_MS, PEAK_COUNT, SEEK_STEP_MS,
    SILENCE_THRESHOLD_DBFS,
};

/// Tuning for silence segmentation and tone classification
///
/// Missing fields fall back to the defaults when deserialized, so a config
/// file only needs to list what it overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecoderConfig {
    /// Shortest run of silence (ms) that separates two tones
    pub min_silence_len_ms: u32,
    /// Windows whose RMS is at or below this level (dBFS) count as silence
    pub silence_threshold_dbfs: f64,
    /// Stride (ms) between silence-detection windows
    pub seek_step_ms: u32,
    /// Silence (ms) kept on both sides of every tone segment
    pub keep_silence_ms: u32,
    /// Dominant spectral bins a segment must yield
    pub peak_count: usize,
    /// Rejection radius (Hz) for frequency-pair matches
    pub max_pair_distance_hz: f64,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            min_silence_len_ms: MIN_SILENCE_LEN_MS,
            silence_threshold_dbfs: SILENCE_THRESHOLD_DBFS,
            seek_step_ms: SEEK_STEP_MS,
            keep_silence_ms: KEEP_SILENCE_MS,
            peak_count: PEAK_COUNT,
            max_pair_distance_hz: MAX_PAIR_DISTANCE_HZ,
        }
    }
}

impl DecoderConfig {
    pub fn validate(&self) -> Result<()> {
        if self.min_silence_len_ms == 0 {
            return Err(ToneCheckError::InvalidConfig(
                "min_silence_len_ms must be positive".into(),
            ));
        }
        if self.seek_step_ms == 0 {
            return Err(ToneCheckError::InvalidConfig("seek_step_ms must be positive".into()));
        }
        if !self.silence_threshold_dbfs.is_finite() {
            return Err(ToneCheckError::InvalidConfig(
                "silence_threshold_dbfs must be finite".into(),
            ));
        }
        if self.peak_count < 2 {
            return Err(ToneCheckError::InvalidConfig(format!(
                "peak_count must be at least 2, got {}",
                self.peak_count
            )));
        }
        if self.max_pair_distance_hz.is_nan() || self.max_pair_distance_hz <= 0.0 {
            return Err(ToneCheckError::InvalidConfig(format!(
                "max_pair_distance_hz must be positive, got {}",
                self.max_pair_distance_hz
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = DecoderConfig::default();
        assert_eq!(config.min_silence_len_ms, 10);
        assert_eq!(config.silence_threshold_dbfs, -16.0);
        assert_eq!(config.seek_step_ms, 1);
        assert_eq!(config.keep_silence_ms, 100);
        assert_eq!(config.peak_count, 7);
        assert_eq!(config.max_pair_distance_hz, 15.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: DecoderConfig =
            serde_json::from_str(r#"{ "peak_count": 9, "keep_silence_ms": 0 }"#).unwrap();
        assert_eq!(config.peak_count, 9);
        assert_eq!(config.keep_silence_ms, 0);
        assert_eq!(config.min_silence_len_ms, 10);
        assert_eq!(config.max_pair_distance_hz, 15.0);
    }

    #[test]
    fn test_json_round_trip() {
        let config = DecoderConfig {
            silence_threshold_dbfs: -30.0,
            ..DecoderConfig::default()
        };
        let json = serde_json::to_string(&config).unwrap();
        let parsed: DecoderConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_validation_failures() {
        let bad = [
            DecoderConfig { min_silence_len_ms: 0, ..DecoderConfig::default() },
            DecoderConfig { seek_step_ms: 0, ..DecoderConfig::default() },
            DecoderConfig { peak_count: 1, ..DecoderConfig::default() },
            DecoderConfig { max_pair_distance_hz: 0.0, ..DecoderConfig::default() },
            DecoderConfig { max_pair_distance_hz: f64::NAN, ..DecoderConfig::default() },
            DecoderConfig { silence_threshold_dbfs: f64::INFINITY, ..DecoderConfig::default() },
        ];
        for config in bad {
            assert!(
                matches!(config.validate(), Err(ToneCheckError::InvalidConfig(_))),
                "{:?} should be rejected",
                config
            );
        }
    }
}
