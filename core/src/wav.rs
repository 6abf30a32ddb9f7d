//! Minimal WAV container for synthesized tones
//!
//! The header declares PCM format code 1, one channel and 32 bits per
//! sample while the payload holds raw little-endian `f32` samples. The RIFF
//! size field is `data size + 44`. Readers therefore see 32-bit integer PCM
//! whose values are the float bit patterns; silence stays zero and the tone
//! fundamentals survive. Keep the layout byte-exact so existing fixtures stay
//! comparable.
//!
//! The reinterpreted signal is close to a square wave of the tone sum, so its
//! spectrum carries intermodulation peaks the float signal does not have.
//! For `*` (941 + 1209 Hz) one of them lands at 1477 Hz, and a `*` followed
//! by another symbol reads back from the file as `#`. A `*` that ends the
//! sequence, or a `*` decoded from the float samples, is unaffected.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::{Result, ToneCheckError};

pub const HEADER_LEN: usize = 44;
const FMT_CHUNK_LEN: u32 = 16;
const FORMAT_PCM: u16 = 1;
const CHANNELS: u16 = 1;
const BYTES_PER_SAMPLE: u16 = 4;
const BITS_PER_SAMPLE: u16 = 32;

/// Size fields of the header: (RIFF size, byte rate, data size)
fn header_fields(sample_rate: u32, sample_count: usize) -> Result<(u32, u32, u32)> {
    let data_len = sample_count
        .checked_mul(BYTES_PER_SAMPLE as usize)
        .and_then(|len| u32::try_from(len).ok())
        .ok_or_else(|| {
            ToneCheckError::InvalidConfig(format!(
                "{} samples do not fit in a WAV data chunk",
                sample_count
            ))
        })?;
    let riff_len = data_len.checked_add(HEADER_LEN as u32).ok_or_else(|| {
        ToneCheckError::InvalidConfig(format!("{} samples do not fit in a WAV file", sample_count))
    })?;
    let byte_rate = sample_rate
        .checked_mul(BYTES_PER_SAMPLE as u32)
        .ok_or_else(|| {
            ToneCheckError::InvalidConfig(format!("sample rate {} Hz is too high", sample_rate))
        })?;

    Ok((riff_len, byte_rate, data_len))
}

/// Serialize samples into the container layout
pub fn encode_wav(sample_rate: u32, samples: &[f32]) -> Result<Vec<u8>> {
    let (riff_len, byte_rate, data_len) = header_fields(sample_rate, samples.len())?;
    let mut bytes = Vec::with_capacity(HEADER_LEN + data_len as usize);

    bytes.extend_from_slice(b"RIFF");
    bytes.extend_from_slice(&riff_len.to_le_bytes());
    bytes.extend_from_slice(b"WAVE");

    bytes.extend_from_slice(b"fmt ");
    bytes.extend_from_slice(&FMT_CHUNK_LEN.to_le_bytes());
    bytes.extend_from_slice(&FORMAT_PCM.to_le_bytes());
    bytes.extend_from_slice(&CHANNELS.to_le_bytes());
    bytes.extend_from_slice(&sample_rate.to_le_bytes());
    bytes.extend_from_slice(&byte_rate.to_le_bytes());
    bytes.extend_from_slice(&BYTES_PER_SAMPLE.to_le_bytes());
    bytes.extend_from_slice(&BITS_PER_SAMPLE.to_le_bytes());

    bytes.extend_from_slice(b"data");
    bytes.extend_from_slice(&data_len.to_le_bytes());
    for sample in samples {
        bytes.extend_from_slice(&sample.to_le_bytes());
    }

    Ok(bytes)
}

/// Write samples to `path`, replacing any existing file
pub fn write_wav(path: &Path, sample_rate: u32, samples: &[f32]) -> Result<()> {
    let bytes = encode_wav(sample_rate, samples)?;
    let mut writer = BufWriter::new(File::create(path)?);
    writer.write_all(&bytes)?;
    writer.flush()?;
    Ok(())
}
