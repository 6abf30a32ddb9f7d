// Full round trips through the file system: synthesize to WAV, load the file
// back and decode or verify it.

use std::path::Path;

use hound::{SampleFormat, WavSpec, WavWriter};
use rand::{rngs::StdRng, Rng, SeedableRng};
use tempfile::TempDir;
use tonecheck_core::{
    decode_file, generate, generate_file, load_audio, verify, verify_file, DecoderConfig,
    DtmfSequence, DtmfSymbol, EncodeRequest, Encoder, NullReporter, PcmAudio, SequenceMismatch,
    ToneCheckError, ToneDecoder, SAMPLE_RATE,
};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Write `request` as a conventional integer PCM file
fn write_int_wav(path: &Path, request: &EncodeRequest, bits: u16, amplitude: f32) {
    let spec = WavSpec {
        channels: 1,
        sample_rate: request.sample_rate,
        bits_per_sample: bits,
        sample_format: SampleFormat::Int,
    };
    let mut writer = WavWriter::create(path, spec).expect("Failed to create WAV writer");
    for sample in Encoder::generate(request) {
        // Tones peak at 2.0
        writer
            .write_sample((sample * amplitude / 2.0) as i32)
            .expect("Failed to write sample");
    }
    writer.finalize().expect("Failed to finalize WAV");
}

#[test]
fn test_generate_then_verify() {
    init_logging();
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("1243.wav");

    generate("1243", &path, 0.0, 0.0, 0.25, 0.25).expect("Failed to generate");
    let decoded = verify("1243", &path).expect("Verification failed");

    assert_eq!(decoded.to_compact_string(), "1243");
}

#[test]
fn test_every_symbol_round_trip() {
    init_logging();
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("all.wav");

    // `*` last: mid-sequence it reads back from the file as `#`
    let sequence: DtmfSequence = DtmfSymbol::ALL
        .into_iter()
        .filter(|&s| s != DtmfSymbol::Star)
        .chain([DtmfSymbol::Star])
        .collect();
    assert_eq!(sequence.len(), 16);
    generate_file(&EncodeRequest::new(sequence.clone()), &path).unwrap();

    let decoded = decode_file(&path, &DecoderConfig::default()).unwrap();
    assert_eq!(decoded, sequence);
}

#[test]
fn test_random_sequences_round_trip() {
    init_logging();
    let dir = TempDir::new().unwrap();
    let mut rng = StdRng::seed_from_u64(0x7e57);
    let alphabet: Vec<DtmfSymbol> = DtmfSymbol::ALL
        .into_iter()
        .filter(|&s| s != DtmfSymbol::Star)
        .collect();

    for round in 0..3 {
        let len = rng.gen_range(1..=10);
        let sequence: DtmfSequence = (0..len)
            .map(|_| alphabet[rng.gen_range(0..alphabet.len())])
            .collect();

        let path = dir.path().join(format!("random_{}.wav", round));
        let request = EncodeRequest {
            end_padding: 0.25,
            ..EncodeRequest::new(sequence.clone())
        };
        generate_file(&request, &path).unwrap();

        let decoded = verify_file(&sequence, &path, &DecoderConfig::default())
            .unwrap_or_else(|e| panic!("Round {} ({}) failed: {}", round, sequence, e));
        assert_eq!(decoded, sequence);
    }
}

#[test]
fn test_star_before_another_symbol_reads_back_as_pound() {
    let dir = TempDir::new().unwrap();
    let config = DecoderConfig::default();

    let cases = [
        ("*7#B", "#7#B"),
        ("*7", "#7"),
        ("**", "#*"),
        ("7#B*", "7#B*"),
        ("*", "*"),
    ];
    for (index, (sequence, from_file)) in cases.into_iter().enumerate() {
        let path = dir.path().join(format!("star_{}.wav", index));
        let request = EncodeRequest::new(sequence.parse().unwrap());
        generate_file(&request, &path).unwrap();

        let decoded = decode_file(&path, &config).unwrap();
        assert_eq!(decoded.to_compact_string(), from_file, "file decode of {}", sequence);

        // The float samples themselves decode correctly
        let audio = PcmAudio::from_floats(request.sample_rate, &Encoder::generate(&request));
        let decoded = ToneDecoder::new(config.clone())
            .unwrap()
            .decode(&audio, &mut NullReporter)
            .unwrap();
        assert_eq!(decoded.to_compact_string(), sequence, "float decode of {}", sequence);
    }
}

#[test]
fn test_padding_and_custom_timing() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("padded.wav");

    let request = EncodeRequest {
        start_padding: 0.5,
        end_padding: 0.75,
        tone_duration: 0.1,
        spacing: 0.15,
        ..EncodeRequest::new("*159#".parse().unwrap())
    };
    generate_file(&request, &path).unwrap();

    let audio = load_audio(&path).unwrap();
    assert_eq!(audio.samples.len(), Encoder::generate(&request).len());
    assert!((audio.duration_secs() - request.total_duration()).abs() < 0.001);

    let decoded = verify_file(&request.sequence, &path, &DecoderConfig::default()).unwrap();
    assert_eq!(decoded.to_compact_string(), "*159#");
}

#[test]
fn test_generated_file_layout() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("layout.wav");

    generate("5", &path, 0.0, 0.0, 0.25, 0.25).unwrap();
    let bytes = std::fs::read(&path).unwrap();

    let samples = 8000usize;
    assert_eq!(bytes.len(), 44 + samples * 4);
    assert_eq!(&bytes[0..4], b"RIFF");
    assert_eq!(u32::from_le_bytes(bytes[4..8].try_into().unwrap()), (samples * 4 + 44) as u32);
    assert_eq!(&bytes[8..16], b"WAVEfmt ");
    assert_eq!(u16::from_le_bytes([bytes[20], bytes[21]]), 1);
    assert_eq!(u16::from_le_bytes([bytes[34], bytes[35]]), 32);
    assert_eq!(u32::from_le_bytes(bytes[40..44].try_into().unwrap()), (samples * 4) as u32);

    // Payload holds the raw float samples
    let expected = Encoder::generate(&EncodeRequest::new("5".parse().unwrap()));
    let first_tone = 4000;
    let stored = f32::from_le_bytes(
        bytes[44 + (first_tone + 1) * 4..44 + (first_tone + 2) * 4]
            .try_into()
            .unwrap(),
    );
    assert_eq!(stored, expected[first_tone + 1]);
}

#[test]
fn test_sixteen_bit_recording() {
    init_logging();
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("recording16.wav");

    let request = EncodeRequest {
        start_padding: 0.2,
        end_padding: 0.2,
        ..EncodeRequest::new("0A8D".parse().unwrap())
    };
    write_int_wav(&path, &request, 16, 20000.0);

    let audio = load_audio(&path).unwrap();
    assert_eq!(audio.sample_width, 2);
    assert_eq!(audio.sample_rate, SAMPLE_RATE);

    let decoded = verify("0A8D", &path).unwrap();
    assert_eq!(decoded, request.sequence);
}

#[test]
fn test_eight_bit_recording() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("recording8.wav");

    let request = EncodeRequest::new("369".parse().unwrap());
    write_int_wav(&path, &request, 8, 100.0);

    let decoded = decode_file(&path, &DecoderConfig::default()).unwrap();
    assert_eq!(decoded.to_compact_string(), "369");
}

#[test]
fn test_twenty_four_bit_recording_rejected() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("recording24.wav");

    let request = EncodeRequest::new("1".parse().unwrap());
    write_int_wav(&path, &request, 24, 4_000_000.0);

    let err = verify("1", &path).unwrap_err();
    assert!(
        matches!(err, ToneCheckError::UnsupportedSampleWidth(3)),
        "unexpected error: {}",
        err
    );
}

#[test]
fn test_mismatch_reports_both_sequences() {
    init_logging();
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("1243.wav");
    generate("1243", &path, 0.0, 0.0, 0.25, 0.25).unwrap();

    let mismatch = match verify("1234", &path) {
        Err(ToneCheckError::Mismatch(mismatch)) => mismatch,
        other => panic!("expected a mismatch, got {:?}", other),
    };

    assert_eq!(mismatch.position(), Some(2));
    assert_eq!(mismatch.decoded().to_compact_string(), "124");
    assert_eq!(mismatch.expected().to_compact_string(), "1234");
    assert!(matches!(
        mismatch,
        SequenceMismatch::Divergent {
            wanted: DtmfSymbol::D3,
            decoded: DtmfSymbol::D4,
            ..
        }
    ));
}

#[test]
fn test_short_recording_is_incomplete() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("12.wav");
    generate("12", &path, 0.0, 0.0, 0.25, 0.25).unwrap();

    let err = verify("123", &path).unwrap_err();
    assert!(matches!(
        err,
        ToneCheckError::Mismatch(SequenceMismatch::Incomplete { .. })
    ));
}

#[test]
fn test_unknown_symbol_rejected() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("unused.wav");

    let err = generate("12X", &path, 0.0, 0.0, 0.25, 0.25).unwrap_err();
    assert!(matches!(err, ToneCheckError::UnknownSymbol('X')));
    assert!(!path.exists());
}

#[test]
fn test_missing_file() {
    let err = verify("1", "/nonexistent/recording.wav").unwrap_err();
    assert!(matches!(err, ToneCheckError::Io(_) | ToneCheckError::Wav(_)));
}
