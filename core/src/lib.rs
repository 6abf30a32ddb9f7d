//! DTMF tone codec for hardware-in-the-loop audio verification
//!
//! Synthesizes dual-tone sequences into a minimal WAV container and decodes
//! recorded audio back into symbols by splitting on silence and classifying
//! the dominant spectral peaks of every tone segment.

pub mod error;
pub mod tone_table;
pub mod encoder;
pub mod wav;
pub mod pcm;
pub mod audio_file;
pub mod segmenter;
pub mod analyzer;
pub mod verifier;
pub mod report;
pub mod config;
pub mod decoder;

pub use analyzer::{nearest_symbol, Classification, SpectralAnalyzer, ToneMatch};
pub use audio_file::load_audio;
pub use config::DecoderConfig;
pub use decoder::{decode_file, verify, verify_file, ToneDecoder};
pub use encoder::{generate, generate_file, EncodeRequest, Encoder};
pub use error::{Result, ToneCheckError};
pub use pcm::{PcmAudio, SampleFormat};
pub use report::{DecodeReport, DecodeReporter, LogReporter, NullReporter, Tee};
pub use segmenter::{SilenceSegmenter, ToneSegment};
pub use tone_table::{DtmfSequence, DtmfSymbol, TONE_TABLE};
pub use verifier::{SequenceMismatch, SequenceVerifier};

// Synthesis defaults
pub const SAMPLE_RATE: u32 = 16000;
pub const DEFAULT_TONE_DURATION_SECS: f64 = 0.25;
pub const DEFAULT_SPACING_SECS: f64 = 0.25;

// Silence segmentation
pub const MIN_SILENCE_LEN_MS: u32 = 10;
pub const SILENCE_THRESHOLD_DBFS: f64 = -16.0;
pub const SEEK_STEP_MS: u32 = 1;
pub const KEEP_SILENCE_MS: u32 = 100;

// Spectral classification
/// Number of dominant bins a segment must yield to be classified.
/// Empirical; validate against recorded fixtures before changing.
pub const PEAK_COUNT: usize = 7;
/// Rejection radius in Hz for the summed distance of a frequency pair
pub const MAX_PAIR_DISTANCE_HZ: f64 = 15.0;

/// Sample widths (bytes) accepted by the decoder
pub const SUPPORTED_SAMPLE_WIDTHS: [u16; 3] = [1, 2, 4];
