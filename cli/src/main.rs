mod config;

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tonecheck_core::{
    generate_file, load_audio, DecodeReport, DtmfSequence, EncodeRequest, LogReporter, Tee,
    ToneCheckError, ToneDecoder, DEFAULT_SPACING_SECS, DEFAULT_TONE_DURATION_SECS, SAMPLE_RATE,
};

use crate::config::load_decoder_config;

#[derive(Parser)]
#[command(name = "tonecheck")]
#[command(about = "Generate and verify DTMF tone sequences")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Synthesize a DTMF sequence into a WAV file
    Generate {
        /// Symbols to encode (0-9, *, #, A-D)
        #[arg(value_name = "SEQUENCE")]
        sequence: String,

        /// Output WAV file
        #[arg(value_name = "OUTPUT.WAV")]
        output: PathBuf,

        /// Silence before the first tone, in seconds
        #[arg(long, default_value_t = 0.0)]
        start_padding: f64,

        /// Silence after the last tone, in seconds
        #[arg(long, default_value_t = 0.0)]
        end_padding: f64,

        /// Length of every tone, in seconds
        #[arg(long, default_value_t = DEFAULT_TONE_DURATION_SECS)]
        tone_duration: f64,

        /// Silence before every tone, in seconds
        #[arg(long, default_value_t = DEFAULT_SPACING_SECS)]
        spacing: f64,

        /// Output sample rate in Hz
        #[arg(long, default_value_t = SAMPLE_RATE)]
        sample_rate: u32,
    },

    /// Check that a recording carries the expected sequence
    Verify {
        /// Expected symbols
        #[arg(value_name = "SEQUENCE")]
        sequence: String,

        /// Recorded audio file
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Decoder tuning as JSON
        #[arg(long, value_name = "FILE.JSON")]
        config: Option<PathBuf>,

        /// Print the decode report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Decode every DTMF symbol in a recording
    Decode {
        /// Recorded audio file
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Decoder tuning as JSON
        #[arg(long, value_name = "FILE.JSON")]
        config: Option<PathBuf>,

        /// Print the decode report as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Generate {
            sequence,
            output,
            start_padding,
            end_padding,
            tone_duration,
            spacing,
            sample_rate,
        } => {
            let request = EncodeRequest {
                sequence: sequence.parse()?,
                start_padding,
                end_padding,
                tone_duration,
                spacing,
                sample_rate,
            };
            generate_command(&request, &output)?
        }
        Commands::Verify {
            sequence,
            input,
            config,
            json,
        } => verify_command(&sequence.parse::<DtmfSequence>()?, &input, config.as_deref(), json)?,
        Commands::Decode {
            input,
            config,
            json,
        } => decode_command(&input, config.as_deref(), json)?,
    }

    Ok(())
}

fn generate_command(
    request: &EncodeRequest,
    output_path: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    generate_file(request, output_path)?;
    println!(
        "Generated {} symbols ({:.2}s at {} Hz) to {}",
        request.sequence.len(),
        request.total_duration(),
        request.sample_rate,
        output_path.display()
    );
    Ok(())
}

fn verify_command(
    expected: &DtmfSequence,
    input_path: &Path,
    config_path: Option<&Path>,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_decoder_config(config_path)?;
    let audio = load_audio(input_path)?;
    let mut decoder = ToneDecoder::new(config)?;

    let mut report = DecodeReport::new();
    let result = {
        let mut log = LogReporter;
        let mut reporter = Tee {
            first: &mut log,
            second: &mut report,
        };
        decoder.verify(expected, &audio, &mut reporter)
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    }

    match result {
        Ok(decoded) => {
            if !json {
                println!("Verified: {}", decoded);
            }
            Ok(())
        }
        Err(ToneCheckError::Mismatch(mismatch)) => {
            if !json {
                println!("Decoded:  {}", mismatch.decoded());
                println!("Expected: {}", mismatch.expected());
            }
            Err(mismatch.into())
        }
        Err(e) => Err(e.into()),
    }
}

fn decode_command(
    input_path: &Path,
    config_path: Option<&Path>,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_decoder_config(config_path)?;
    let audio = load_audio(input_path)?;
    let mut decoder = ToneDecoder::new(config)?;

    let mut report = DecodeReport::new();
    let decoded = {
        let mut log = LogReporter;
        let mut reporter = Tee {
            first: &mut log,
            second: &mut report,
        };
        decoder.decode(&audio, &mut reporter)?
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("Decoded: {}", decoded);
    }
    Ok(())
}
