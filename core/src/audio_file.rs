//! Audio file loading
//!
//! WAV files go through `hound` (falling back to `symphonia` for layouts
//! hound refuses); every other container is probed with `symphonia`. Both
//! paths report the stored sample width untouched so the decoder can reject
//! widths it does not support.

use std::fs::File;
use std::path::Path;

use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

use crate::error::{Result, ToneCheckError};
use crate::pcm::{PcmAudio, SampleFormat};

/// Width reported for lossy sources without a native bit depth
const DEFAULT_DECODED_WIDTH: u16 = 2;

/// Load an audio file into a PCM buffer
pub fn load_audio(path: impl AsRef<Path>) -> Result<PcmAudio> {
    let path = path.as_ref();
    let audio = if is_wav(path) {
        match load_wav(path) {
            Ok(audio) => audio,
            // hound only accepts the canonical PCM layouts; symphonia is
            // more lenient with 32-bit integer PCM in a plain fmt chunk
            Err(ToneCheckError::Wav(
                err @ (hound::Error::FormatError(_) | hound::Error::Unsupported),
            )) => {
                log::debug!("hound rejected {}: {}, retrying with symphonia", path.display(), err);
                load_with_symphonia(path)?
            }
            Err(e) => return Err(e),
        }
    } else {
        load_with_symphonia(path)?
    };

    log::debug!(
        "Loaded {}: {} Hz, {} channels, {} bytes/sample, {} samples",
        path.display(),
        audio.sample_rate,
        audio.channels,
        audio.sample_width,
        audio.samples.len()
    );

    Ok(audio)
}

fn is_wav(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("wav") || e.eq_ignore_ascii_case("wave"))
        .unwrap_or(false)
}

fn load_wav(path: &Path) -> Result<PcmAudio> {
    let mut reader = hound::WavReader::open(path)?;
    let spec = reader.spec();

    let (format, samples) = match spec.sample_format {
        hound::SampleFormat::Int => {
            let ints: std::result::Result<Vec<i32>, _> = reader.samples::<i32>().collect();
            (SampleFormat::Int, ints?.into_iter().map(|s| s as f64).collect())
        }
        hound::SampleFormat::Float => {
            let floats: std::result::Result<Vec<f32>, _> = reader.samples::<f32>().collect();
            (SampleFormat::Float, floats?.into_iter().map(|s| s as f64).collect())
        }
    };

    Ok(PcmAudio {
        sample_rate: spec.sample_rate,
        sample_width: bits_to_width(spec.bits_per_sample as u32),
        format,
        channels: spec.channels,
        samples,
    })
}

fn load_with_symphonia(path: &Path) -> Result<PcmAudio> {
    let file = File::open(path)?;
    let mss = MediaSourceStream::new(Box::new(file), Default::default());

    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(ext);
    }

    let mut probed = symphonia::default::get_probe().format(
        &hint,
        mss,
        &FormatOptions::default(),
        &MetadataOptions::default(),
    )?;

    let track = probed
        .format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .ok_or(ToneCheckError::NoAudioTrack)?;

    let track_id = track.id;
    let mut sample_rate = track.codec_params.sample_rate;
    let mut channels = track.codec_params.channels.map(|c| c.count() as u16);
    let sample_width = track
        .codec_params
        .bits_per_sample
        .map(bits_to_width)
        .unwrap_or(DEFAULT_DECODED_WIDTH);

    let mut decoder =
        symphonia::default::get_codecs().make(&track.codec_params, &DecoderOptions::default())?;

    let mut raw: Vec<i32> = Vec::new();
    let mut sample_buf: Option<SampleBuffer<i32>> = None;

    loop {
        let packet = match probed.format.next_packet() {
            Ok(packet) => packet,
            Err(SymphoniaError::IoError(ref e)) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                break
            }
            Err(SymphoniaError::ResetRequired) => {
                decoder.reset();
                continue;
            }
            Err(e) => return Err(e.into()),
        };

        if packet.track_id() != track_id {
            continue;
        }

        let decoded = match decoder.decode(&packet) {
            Ok(buf) => buf,
            Err(SymphoniaError::DecodeError(e)) => {
                log::warn!("Skipping undecodable packet: {}", e);
                continue;
            }
            Err(e) => return Err(e.into()),
        };

        if sample_buf.is_none() {
            let spec = *decoded.spec();
            sample_rate.get_or_insert(spec.rate);
            channels.get_or_insert(spec.channels.count() as u16);
            sample_buf = Some(SampleBuffer::new(decoded.capacity() as u64, spec));
        }

        if let Some(ref mut buf) = sample_buf {
            buf.copy_interleaved_ref(decoded);
            raw.extend_from_slice(buf.samples());
        }
    }

    let sample_rate = sample_rate.ok_or(ToneCheckError::NoAudioTrack)?;
    let shift = 32u32.saturating_sub(sample_width as u32 * 8);

    Ok(PcmAudio {
        sample_rate,
        sample_width,
        format: SampleFormat::Int,
        channels: channels.unwrap_or(1),
        samples: raw.into_iter().map(|s| (s >> shift) as f64).collect(),
    })
}

fn bits_to_width(bits: u32) -> u16 {
    ((bits + 7) / 8) as u16
}
