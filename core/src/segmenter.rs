//! Silence-based segmentation
//!
//! A fixed window slides over the buffer in `seek_step` strides; windows
//! whose RMS sits at or below the threshold mark silence. Runs of silent
//! windows merge into silent ranges and everything between them is a tone
//! segment. Segments are widened by `keep_silence` on both sides, and
//! neighbours that would overlap are split at their midpoint.

use std::ops::Range;

use crate::config::DecoderConfig;

/// Contiguous non-silent span of a mono buffer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToneSegment<'a> {
    /// Offset of the first sample in the source buffer
    pub start: usize,
    pub samples: &'a [f64],
}

impl ToneSegment<'_> {
    pub fn end(&self) -> usize {
        self.start + self.samples.len()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct SilenceSegmenter {
    /// Window length in samples
    min_silence: usize,
    seek_step: usize,
    keep_silence: usize,
    /// Absolute RMS threshold
    threshold: f64,
}

impl SilenceSegmenter {
    /// `full_scale` is the 0 dBFS amplitude of the buffer's sample format
    pub fn new(config: &DecoderConfig, sample_rate: u32, full_scale: f64) -> Self {
        let to_samples = |ms: u32| (ms as u64 * sample_rate as u64 / 1000) as usize;

        Self {
            min_silence: to_samples(config.min_silence_len_ms).max(1),
            seek_step: to_samples(config.seek_step_ms).max(1),
            keep_silence: to_samples(config.keep_silence_ms),
            threshold: full_scale * 10f64.powf(config.silence_threshold_dbfs / 20.0),
        }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Split `samples` into ordered tone segments
    pub fn segment<'a>(&self, samples: &'a [f64]) -> Vec<ToneSegment<'a>> {
        let ranges = self.nonsilent_ranges(samples);
        let len = samples.len() as i64;
        let keep = self.keep_silence as i64;

        let mut widened: Vec<(i64, i64)> = ranges
            .iter()
            .map(|r| (r.start as i64 - keep, r.end as i64 + keep))
            .collect();

        for i in 1..widened.len() {
            let last_end = widened[i - 1].1;
            let next_start = widened[i].0;
            if next_start < last_end {
                let mid = (last_end + next_start).div_euclid(2);
                widened[i - 1].1 = mid;
                widened[i].0 = mid;
            }
        }

        widened
            .into_iter()
            .map(|(start, end)| {
                let start = start.clamp(0, len) as usize;
                let end = end.clamp(0, len) as usize;
                ToneSegment {
                    start,
                    samples: &samples[start..end.max(start)],
                }
            })
            .collect()
    }

    /// Spans between silent ranges, without the `keep_silence` widening
    pub fn nonsilent_ranges(&self, samples: &[f64]) -> Vec<Range<usize>> {
        let len = samples.len();
        if len == 0 {
            return Vec::new();
        }

        let silent = self.silent_ranges(samples);
        if silent.is_empty() {
            return vec![0..len];
        }
        if silent[0] == (0..len) {
            return Vec::new();
        }

        let mut ranges = Vec::with_capacity(silent.len() + 1);
        let mut prev_end = 0;
        for range in &silent {
            ranges.push(prev_end..range.start);
            prev_end = range.end;
        }
        if prev_end != len {
            ranges.push(prev_end..len);
        }
        if ranges.first().map_or(false, |r| r.is_empty()) {
            ranges.remove(0);
        }

        ranges
    }

    /// Ranges covered by silent windows
    pub fn silent_ranges(&self, samples: &[f64]) -> Vec<Range<usize>> {
        let window = self.min_silence;
        if samples.len() < window {
            return Vec::new();
        }

        let last_start = samples.len() - window;
        let mut starts: Vec<usize> = (0..=last_start).step_by(self.seek_step).collect();
        if last_start % self.seek_step != 0 {
            starts.push(last_start);
        }

        let mut silent = starts
            .into_iter()
            .filter(|&start| rms(&samples[start..start + window]) <= self.threshold);

        let mut ranges = Vec::new();
        let Some(first) = silent.next() else {
            return ranges;
        };

        let mut range_start = first;
        let mut prev = first;
        for start in silent {
            let continuous = start == prev + self.seek_step;
            let has_gap = start > prev + window;
            if !continuous && has_gap {
                ranges.push(range_start..prev + window);
                range_start = start;
            }
            prev = start;
        }
        ranges.push(range_start..prev + window);

        ranges
    }
}

fn rms(samples: &[f64]) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    (samples.iter().map(|s| s * s).sum::<f64>() / samples.len() as f64).sqrt()
}
