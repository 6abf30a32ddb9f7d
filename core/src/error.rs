use thiserror::Error;

use crate::verifier::SequenceMismatch;

#[derive(Debug, Error)]
pub enum ToneCheckError {
    #[error("Unsupported audio sample width: {0} bytes")]
    UnsupportedSampleWidth(u16),

    #[error("Unknown DTMF symbol: {0:?}")]
    UnknownSymbol(char),

    #[error("DTMF verification failed: {0}")]
    Mismatch(#[from] SequenceMismatch),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("No supported audio track found")]
    NoAudioTrack,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("WAV error: {0}")]
    Wav(#[from] hound::Error),

    #[error("Audio decode error: {0}")]
    Decode(#[from] symphonia::core::errors::Error),
}

pub type Result<T> = std::result::Result<T, ToneCheckError>;
