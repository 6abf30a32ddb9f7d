//! Diagnostic sinks for the decode pipeline
//!
//! Reporters observe the pipeline and never influence the outcome.

use serde::Serialize;

use crate::pcm::PcmAudio;
use crate::tone_table::{DtmfSequence, DtmfSymbol};

pub trait DecodeReporter {
    fn audio_loaded(&mut self, _audio: &PcmAudio) {}

    fn segments_found(&mut self, _count: usize) {}

    /// Dominant frequencies of a segment, weakest first
    fn peaks(&mut self, _segment: usize, _frequencies: &[f64]) {}

    /// Classification of a segment; `None` when it was dropped
    fn symbol(&mut self, _segment: usize, _symbol: Option<DtmfSymbol>) {}

    fn finished(&mut self, _decoded: &DtmfSequence, _expected: Option<&DtmfSequence>) {}
}

/// Discards everything
pub struct NullReporter;

impl DecodeReporter for NullReporter {}

/// Forwards diagnostics to the `log` facade
pub struct LogReporter;

impl DecodeReporter for LogReporter {
    fn audio_loaded(&mut self, audio: &PcmAudio) {
        log::info!(
            "Audio: {} Hz, {} bytes/sample, {} channels, {:.2}s",
            audio.sample_rate,
            audio.sample_width,
            audio.channels,
            audio.duration_secs()
        );
    }

    fn segments_found(&mut self, count: usize) {
        log::debug!("Found {} tone segments", count);
    }

    fn peaks(&mut self, segment: usize, frequencies: &[f64]) {
        log::debug!("Segment {}: peaks {:?}", segment, frequencies);
    }

    fn symbol(&mut self, segment: usize, symbol: Option<DtmfSymbol>) {
        match symbol {
            Some(symbol) => log::debug!("Segment {}: detected {}", segment, symbol),
            None => log::debug!("Segment {}: no symbol", segment),
        }
    }

    fn finished(&mut self, decoded: &DtmfSequence, expected: Option<&DtmfSequence>) {
        log::info!("Captured sequence: {}", decoded);
        if let Some(expected) = expected {
            log::info!("Expected sequence: {}", expected);
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SegmentReport {
    pub index: usize,
    pub peaks: Vec<f64>,
    pub symbol: Option<DtmfSymbol>,
}

/// Collects the whole decode trace, serializable for machine-readable output
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DecodeReport {
    pub sample_rate: u32,
    pub sample_width: u16,
    pub channels: u16,
    pub segments: Vec<SegmentReport>,
    pub decoded: Option<DtmfSequence>,
    pub expected: Option<DtmfSequence>,
}

impl DecodeReport {
    pub fn new() -> Self {
        Self::default()
    }

    // Segment events arrive in index order, so only the last entry can match
    fn segment_mut(&mut self, index: usize) -> &mut SegmentReport {
        if self.segments.last().map_or(true, |s| s.index != index) {
            self.segments.push(SegmentReport {
                index,
                peaks: Vec::new(),
                symbol: None,
            });
        }
        let last = self.segments.len() - 1;
        &mut self.segments[last]
    }
}

impl DecodeReporter for DecodeReport {
    fn audio_loaded(&mut self, audio: &PcmAudio) {
        self.sample_rate = audio.sample_rate;
        self.sample_width = audio.sample_width;
        self.channels = audio.channels;
    }

    fn peaks(&mut self, segment: usize, frequencies: &[f64]) {
        self.segment_mut(segment).peaks = frequencies.to_vec();
    }

    fn symbol(&mut self, segment: usize, symbol: Option<DtmfSymbol>) {
        self.segment_mut(segment).symbol = symbol;
    }

    fn finished(&mut self, decoded: &DtmfSequence, expected: Option<&DtmfSequence>) {
        self.decoded = Some(decoded.clone());
        self.expected = expected.cloned();
    }
}

/// Forwards every event to two reporters
pub struct Tee<'a, A: ?Sized, B: ?Sized> {
    pub first: &'a mut A,
    pub second: &'a mut B,
}

impl<A: DecodeReporter + ?Sized, B: DecodeReporter + ?Sized> DecodeReporter for Tee<'_, A, B> {
    fn audio_loaded(&mut self, audio: &PcmAudio) {
        self.first.audio_loaded(audio);
        self.second.audio_loaded(audio);
    }

    fn segments_found(&mut self, count: usize) {
        self.first.segments_found(count);
        self.second.segments_found(count);
    }

    fn peaks(&mut self, segment: usize, frequencies: &[f64]) {
        self.first.peaks(segment, frequencies);
        self.second.peaks(segment, frequencies);
    }

    fn symbol(&mut self, segment: usize, symbol: Option<DtmfSymbol>) {
        self.first.symbol(segment, symbol);
        self.second.symbol(segment, symbol);
    }

    fn finished(&mut self, decoded: &DtmfSequence, expected: Option<&DtmfSequence>) {
        self.first.finished(decoded, expected);
        self.second.finished(decoded, expected);
    }
}
