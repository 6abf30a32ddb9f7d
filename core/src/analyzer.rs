use rustfft::{num_complex::Complex, FftPlanner};

use crate::config::DecoderConfig;
use crate::tone_table::{DtmfSymbol, TONE_TABLE};

/// Best table entry for a set of candidate frequencies
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToneMatch {
    pub symbol: DtmfSymbol,
    /// Summed distance in Hz between the candidate pair and the entry
    pub distance: f64,
}

/// Outcome of analysing one segment
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Classification {
    /// Frequencies of the dominant bins, weakest first. Empty when the
    /// segment did not produce the required number of distinct peaks.
    pub peaks: Vec<f64>,
    pub matched: Option<ToneMatch>,
}

impl Classification {
    pub fn symbol(&self) -> Option<DtmfSymbol> {
        self.matched.map(|m| m.symbol)
    }
}

/// Spectral peak classifier
///
/// Takes the magnitude spectrum of a whole segment, keeps the strongest
/// `peak_count` bins and matches every pair of them against the frequency
/// plan. Segments that do not produce exactly `peak_count` distinct bins,
/// or whose best pair lies outside the rejection radius, yield no symbol.
pub struct SpectralAnalyzer {
    planner: FftPlanner<f64>,
    peak_count: usize,
    max_distance: f64,
}

impl SpectralAnalyzer {
    pub fn new(config: &DecoderConfig) -> Self {
        Self {
            planner: FftPlanner::new(),
            peak_count: config.peak_count,
            max_distance: config.max_pair_distance_hz,
        }
    }

    pub fn classify(&mut self, samples: &[f64], sample_rate: u32) -> Classification {
        let spectrum = self.magnitude_spectrum(samples);
        let Some(bins) = dominant_bins(&spectrum, self.peak_count) else {
            return Classification::default();
        };

        let resolution = sample_rate as f64 / samples.len() as f64;
        let peaks: Vec<f64> = bins.iter().map(|&bin| bin as f64 * resolution).collect();
        let matched = nearest_symbol(&peaks, self.max_distance);

        Classification { peaks, matched }
    }

    /// Magnitudes of the non-negative frequency half of the DFT
    pub fn magnitude_spectrum(&mut self, samples: &[f64]) -> Vec<f64> {
        let n = samples.len();
        if n == 0 {
            return Vec::new();
        }

        let fft = self.planner.plan_fft_forward(n);
        let mut buffer: Vec<Complex<f64>> =
            samples.iter().map(|&s| Complex::new(s, 0.0)).collect();
        fft.process(&mut buffer);

        buffer[..n / 2].iter().map(|c| c.norm()).collect()
    }
}

/// Bin indices holding the `count` largest magnitudes, weakest first
///
/// Every bin whose magnitude equals one of the top values is collected, so
/// ties produce more than `count` indices; anything other than exactly
/// `count` indices is rejected.
pub fn dominant_bins(magnitudes: &[f64], count: usize) -> Option<Vec<usize>> {
    if count == 0 || magnitudes.len() < count {
        return None;
    }

    let mut sorted = magnitudes.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let mut bins = Vec::with_capacity(count);
    for &value in &sorted[sorted.len() - count..] {
        bins.extend(
            magnitudes
                .iter()
                .enumerate()
                .filter(|(_, m)| **m == value)
                .map(|(i, _)| i),
        );
    }

    if bins.len() == count {
        Some(bins)
    } else {
        None
    }
}

/// Summed distance of a frequency pair to a table entry, in either order
pub fn pair_distance(f1: f64, f2: f64, low: f64, high: f64) -> f64 {
    let direct = (f1 - low).abs() + (f2 - high).abs();
    let swapped = (f1 - high).abs() + (f2 - low).abs();
    direct.min(swapped)
}

/// Nearest table entry over all unordered candidate pairs
///
/// Starts from `max_distance` and only accepts strictly closer matches, so
/// a match exactly at the radius is rejected and ties keep the first pair
/// and table row found.
pub fn nearest_symbol(candidates: &[f64], max_distance: f64) -> Option<ToneMatch> {
    let mut best: Option<ToneMatch> = None;
    let mut best_distance = max_distance;

    for (i, &f1) in candidates.iter().enumerate() {
        for &f2 in &candidates[i + 1..] {
            for entry in TONE_TABLE.iter() {
                let distance = pair_distance(f1, f2, entry.low, entry.high);
                if distance < best_distance {
                    best_distance = distance;
                    best = Some(ToneMatch {
                        symbol: entry.symbol,
                        distance,
                    });
                }
            }
        }
    }

    best
}
