//! Raw PCM buffers handed to the decoder by an audio loader
//!
//! Integer samples keep their raw signed values (an 8-bit sample ranges
//! -128..=127, a 16-bit one -32768..=32767 and so on); float samples keep
//! their nominal [-1.0, 1.0] scale. Multi-channel audio is interleaved.

use crate::error::{Result, ToneCheckError};
use crate::SUPPORTED_SAMPLE_WIDTHS;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleFormat {
    Int,
    Float,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PcmAudio {
    pub sample_rate: u32,
    /// Bytes per sample as reported by the source
    pub sample_width: u16,
    pub format: SampleFormat,
    pub channels: u16,
    pub samples: Vec<f64>,
}

impl PcmAudio {
    /// Mono integer PCM
    pub fn from_ints(sample_rate: u32, sample_width: u16, samples: &[i32]) -> Self {
        Self {
            sample_rate,
            sample_width,
            format: SampleFormat::Int,
            channels: 1,
            samples: samples.iter().map(|&s| s as f64).collect(),
        }
    }

    /// Mono float PCM
    pub fn from_floats(sample_rate: u32, samples: &[f32]) -> Self {
        Self {
            sample_rate,
            sample_width: 4,
            format: SampleFormat::Float,
            channels: 1,
            samples: samples.iter().map(|&s| s as f64).collect(),
        }
    }

    /// Reject widths other than 8, 16 or 32 bits
    pub fn check_sample_width(&self) -> Result<()> {
        if SUPPORTED_SAMPLE_WIDTHS.contains(&self.sample_width) {
            Ok(())
        } else {
            Err(ToneCheckError::UnsupportedSampleWidth(self.sample_width))
        }
    }

    /// Largest representable amplitude, the 0 dBFS reference
    pub fn full_scale(&self) -> f64 {
        match self.format {
            SampleFormat::Float => 1.0,
            SampleFormat::Int => {
                let bits = (self.sample_width as i32 * 8).clamp(1, 64);
                2f64.powi(bits - 1)
            }
        }
    }

    /// Number of frames (samples per channel)
    pub fn frames(&self) -> usize {
        self.samples.len() / self.channels.max(1) as usize
    }

    pub fn duration_secs(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.frames() as f64 / self.sample_rate as f64
    }

    /// Average interleaved channels down to a single channel.
    /// A trailing partial frame is dropped.
    pub fn to_mono(&self) -> Vec<f64> {
        let channels = self.channels.max(1) as usize;
        if channels == 1 {
            return self.samples.clone();
        }

        self.samples
            .chunks_exact(channels)
            .map(|frame| frame.iter().sum::<f64>() / channels as f64)
            .collect()
    }
}
