use std::f64::consts::PI;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::tone_table::{DtmfSequence, DtmfSymbol};
use crate::wav::write_wav;
use crate::{DEFAULT_SPACING_SECS, DEFAULT_TONE_DURATION_SECS, SAMPLE_RATE};

/// Parameters for synthesizing a tone sequence. Durations are in seconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EncodeRequest {
    pub sequence: DtmfSequence,
    pub start_padding: f64,
    pub end_padding: f64,
    pub tone_duration: f64,
    pub spacing: f64,
    pub sample_rate: u32,
}

impl EncodeRequest {
    pub fn new(sequence: DtmfSequence) -> Self {
        Self {
            sequence,
            ..Self::default()
        }
    }

    /// Total length of the generated audio in seconds
    pub fn total_duration(&self) -> f64 {
        self.start_padding
            + self.end_padding
            + (self.tone_duration + self.spacing) * self.sequence.len() as f64
    }
}

impl Default for EncodeRequest {
    fn default() -> Self {
        Self {
            sequence: DtmfSequence::new(),
            start_padding: 0.0,
            end_padding: 0.0,
            tone_duration: DEFAULT_TONE_DURATION_SECS,
            spacing: DEFAULT_SPACING_SECS,
            sample_rate: SAMPLE_RATE,
        }
    }
}

/// Dual-tone synthesizer
///
/// Layout: start padding, then per symbol (spacing silence + tone), then
/// whatever silence remains of the requested total duration.
///
/// The two sine waves are summed without scaling, so peaks reach 2.0.
/// The decoder only looks at relative spectral magnitudes and the WAV
/// container stores raw floats, so nothing clips.
pub struct Encoder {
    sample_rate: u32,
}

impl Encoder {
    pub fn new(sample_rate: u32) -> Self {
        Self { sample_rate }
    }

    /// Synthesize the samples for a request (the request's sample rate wins)
    pub fn generate(request: &EncodeRequest) -> Vec<f32> {
        let encoder = Self::new(request.sample_rate);
        let mut remaining = request.total_duration();

        let mut samples = encoder.silence(request.start_padding);
        remaining -= request.start_padding;

        for symbol in request.sequence.iter() {
            samples.extend(encoder.silence(request.spacing));
            samples.extend(encoder.tone(symbol, request.tone_duration));
            remaining -= request.tone_duration + request.spacing;
        }

        if remaining > 0.0 {
            samples.extend(encoder.silence(remaining));
        }

        log::debug!(
            "Generated {} samples for {} symbols at {} Hz",
            samples.len(),
            request.sequence.len(),
            request.sample_rate
        );

        samples
    }

    /// Dual tone for one symbol
    pub fn tone(&self, symbol: DtmfSymbol, duration: f64) -> Vec<f32> {
        let (low, high) = symbol.frequencies();
        let rate = self.sample_rate as f64;
        let low_step = 2.0 * PI * (low / rate);
        let high_step = 2.0 * PI * (high / rate);

        (0..self.sample_count(duration))
            .map(|n| {
                let n = n as f64;
                ((low_step * n).sin() + (high_step * n).sin()) as f32
            })
            .collect()
    }

    pub fn silence(&self, duration: f64) -> Vec<f32> {
        vec![0.0f32; self.sample_count(duration)]
    }

    // Truncates toward zero; negative durations give no samples
    fn sample_count(&self, duration: f64) -> usize {
        (duration * self.sample_rate as f64) as usize
    }
}

/// Synthesize a request and write it to `path` as a WAV file
pub fn generate_file(request: &EncodeRequest, path: impl AsRef<Path>) -> Result<()> {
    let samples = Encoder::generate(request);
    write_wav(path.as_ref(), request.sample_rate, &samples)?;
    log::info!(
        "Wrote DTMF sequence {} to {}",
        request.sequence,
        path.as_ref().display()
    );
    Ok(())
}

/// Generate a WAV file for a symbol string at the default sample rate
pub fn generate(
    sequence: &str,
    path: impl AsRef<Path>,
    start_padding: f64,
    end_padding: f64,
    tone_duration: f64,
    spacing: f64,
) -> Result<()> {
    let request = EncodeRequest {
        sequence: sequence.parse()?,
        start_padding,
        end_padding,
        tone_duration,
        spacing,
        sample_rate: SAMPLE_RATE,
    };
    generate_file(&request, path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(sequence: &str) -> EncodeRequest {
        EncodeRequest::new(sequence.parse().unwrap())
    }

    #[test]
    fn test_default_request() {
        let req = EncodeRequest::default();
        assert_eq!(req.sample_rate, 16000);
        assert_eq!(req.tone_duration, 0.25);
        assert_eq!(req.spacing, 0.25);
        assert_eq!(req.start_padding, 0.0);
        assert_eq!(req.end_padding, 0.0);
    }

    #[test]
    fn test_layout_without_padding() {
        let samples = Encoder::generate(&request("1243"));
        // 4 × (0.25 s spacing + 0.25 s tone) at 16 kHz
        assert_eq!(samples.len(), 4 * 8000);

        // Spacing comes before each tone
        assert!(samples[..4000].iter().all(|&s| s == 0.0));
        assert!(samples[4001..8000].iter().any(|&s| s != 0.0));
    }

    #[test]
    fn test_padding_is_added() {
        let mut req = request("5");
        req.start_padding = 1.0;
        req.end_padding = 0.5;
        let samples = Encoder::generate(&req);

        assert_eq!(samples.len(), 16000 + 8000 + 8000);
        assert!(samples[..16000 + 4000].iter().all(|&s| s == 0.0));
        assert!(samples[samples.len() - 8000..].iter().all(|&s| s == 0.0));
    }

    #[test]
    fn test_tone_is_unnormalized_sum() {
        let encoder = Encoder::new(16000);
        let tone = encoder.tone(DtmfSymbol::D1, 0.25);
        assert_eq!(tone.len(), 4000);
        assert_eq!(tone[0], 0.0);

        let peak = tone.iter().fold(0.0f32, |acc, &s| acc.max(s.abs()));
        assert!(peak > 1.5, "peak {} should exceed a single sine", peak);
        assert!(peak <= 2.0);

        let rate = 16000.0;
        let n = 37.0;
        let expected =
            (2.0 * PI * (697.0 / rate) * n).sin() + (2.0 * PI * (1209.0 / rate) * n).sin();
        assert!((tone[37] as f64 - expected).abs() < 1e-6);
    }

    #[test]
    fn test_empty_sequence_is_padding_only() {
        let mut req = request("");
        req.start_padding = 0.5;
        req.end_padding = 0.5;
        let samples = Encoder::generate(&req);
        assert_eq!(samples.len(), 16000);
        assert!(samples.iter().all(|&s| s == 0.0));
    }

    #[test]
    fn test_custom_sample_rate() {
        let mut req = request("9");
        req.sample_rate = 8000;
        let samples = Encoder::generate(&req);
        assert_eq!(samples.len(), 4000);

        // Tone and silence lengths follow the encoder's own rate
        let encoder = Encoder::new(8000);
        assert_eq!(encoder.tone(DtmfSymbol::D9, 0.25).len(), 2000);
        assert_eq!(encoder.silence(0.25).len(), 2000);
    }

    #[test]
    fn test_negative_duration_yields_no_samples() {
        let encoder = Encoder::new(16000);
        assert!(encoder.silence(-1.0).is_empty());
    }
}
