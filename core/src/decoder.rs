use std::path::Path;

use crate::analyzer::SpectralAnalyzer;
use crate::audio_file::load_audio;
use crate::config::DecoderConfig;
use crate::error::{Result, ToneCheckError};
use crate::pcm::PcmAudio;
use crate::report::{DecodeReporter, LogReporter};
use crate::segmenter::SilenceSegmenter;
use crate::tone_table::{DtmfSequence, DtmfSymbol};
use crate::verifier::SequenceVerifier;

/// Decoder for recorded DTMF sequences
///
/// Pipeline: sample width check, downmix to mono, split on silence,
/// classify each segment. Segments without a confident match are skipped.
pub struct ToneDecoder {
    config: DecoderConfig,
    analyzer: SpectralAnalyzer,
}

impl ToneDecoder {
    pub fn new(config: DecoderConfig) -> Result<Self> {
        config.validate()?;
        let analyzer = SpectralAnalyzer::new(&config);
        Ok(Self { config, analyzer })
    }

    pub fn config(&self) -> &DecoderConfig {
        &self.config
    }

    /// Decode every recognizable symbol in `audio`
    pub fn decode(
        &mut self,
        audio: &PcmAudio,
        reporter: &mut dyn DecodeReporter,
    ) -> Result<DtmfSequence> {
        let mut decoded = DtmfSequence::new();
        self.run(audio, reporter, |symbol| {
            decoded.push(symbol);
            Ok(())
        })?;

        reporter.finished(&decoded, None);
        log::info!("Decoded DTMF sequence: {}", decoded);
        Ok(decoded)
    }

    /// Decode `audio` and compare it symbol by symbol against `expected`
    ///
    /// Fails on the first surplus or divergent symbol, or at the end when
    /// the decoded sequence is shorter than the expectation.
    pub fn verify(
        &mut self,
        expected: &DtmfSequence,
        audio: &PcmAudio,
        reporter: &mut dyn DecodeReporter,
    ) -> Result<DtmfSequence> {
        let mut verifier = SequenceVerifier::new(expected.clone());
        let outcome = self.run(audio, reporter, |symbol| Ok(verifier.push(symbol)?));

        // Report what was captured even when the stream failed fast
        if matches!(outcome, Ok(()) | Err(ToneCheckError::Mismatch(_))) {
            reporter.finished(verifier.decoded(), Some(expected));
        }
        outcome?;

        let decoded = verifier.finish()?;
        log::info!("Verified DTMF sequence: {}", decoded);
        Ok(decoded)
    }

    fn run<F>(
        &mut self,
        audio: &PcmAudio,
        reporter: &mut dyn DecodeReporter,
        mut on_symbol: F,
    ) -> Result<()>
    where
        F: FnMut(DtmfSymbol) -> Result<()>,
    {
        audio.check_sample_width()?;
        reporter.audio_loaded(audio);

        let mono = audio.to_mono();
        let segmenter = SilenceSegmenter::new(&self.config, audio.sample_rate, audio.full_scale());
        let segments = segmenter.segment(&mono);
        reporter.segments_found(segments.len());

        for (index, segment) in segments.iter().enumerate() {
            let classification = self.analyzer.classify(segment.samples, audio.sample_rate);
            reporter.peaks(index, &classification.peaks);

            let symbol = classification.symbol();
            reporter.symbol(index, symbol);

            if let Some(symbol) = symbol {
                on_symbol(symbol)?;
            }
        }

        Ok(())
    }
}

/// Load and decode an audio file
pub fn decode_file(path: impl AsRef<Path>, config: &DecoderConfig) -> Result<DtmfSequence> {
    let audio = load_audio(path)?;
    ToneDecoder::new(config.clone())?.decode(&audio, &mut LogReporter)
}

/// Load an audio file and verify it carries `expected`
pub fn verify_file(
    expected: &DtmfSequence,
    path: impl AsRef<Path>,
    config: &DecoderConfig,
) -> Result<DtmfSequence> {
    let audio = load_audio(path)?;
    ToneDecoder::new(config.clone())?.verify(expected, &audio, &mut LogReporter)
}

/// Verify a recording against a symbol string with default tuning
pub fn verify(expected: &str, path: impl AsRef<Path>) -> Result<DtmfSequence> {
    let expected: DtmfSequence = expected.parse()?;
    verify_file(&expected, path, &DecoderConfig::default())
}
