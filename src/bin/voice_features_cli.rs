use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::Level;
use voice_features::audio::{read_wav, sine, write_wav};
use voice_features::error::log_analysis_error;
use voice_features::{AnalysisConfig, FeatureExtractor, FeatureSummary, SampleBuffer};

#[derive(Parser, Debug)]
#[command(
    name = "voice_features_cli",
    about = "Amplitude, pitch and spectral features for recorded audio"
)]
struct Cli {
    /// Log pipeline stages at debug level on stderr
    #[arg(long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Analyze one WAV file and print its feature report as JSON
    Analyze {
        #[arg(long)]
        input: PathBuf,
        /// JSON analysis configuration (window_size, hop_size, ...)
        #[arg(long)]
        config: Option<PathBuf>,
        #[arg(long)]
        output: Option<PathBuf>,
        /// Include the spectrogram and per-frame dominant frequencies
        #[arg(long)]
        full: bool,
    },
    /// Analyze several WAV files concurrently, one JSON summary per line
    Batch {
        #[arg(required = true)]
        inputs: Vec<PathBuf>,
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Write a sine test tone as 16-bit PCM WAV
    Tone {
        #[arg(long)]
        frequency: f32,
        #[arg(long, default_value_t = 1.0)]
        duration: f32,
        #[arg(long, default_value_t = 44100)]
        sample_rate: u32,
        #[arg(long, default_value_t = 0.8)]
        amplitude: f32,
        #[arg(long)]
        output: PathBuf,
    },
}

fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {err:?}");
            ExitCode::from(1)
        }
    }
}

fn run() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Analyze {
            input,
            config,
            output,
            full,
        } => run_analyze(&input, config, output, full),
        Commands::Batch { inputs, config } => run_batch(&inputs, config),
        Commands::Tone {
            frequency,
            duration,
            sample_rate,
            amplitude,
            output,
        } => run_tone(frequency, duration, sample_rate, amplitude, &output),
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::WARN };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn build_extractor(config_path: Option<PathBuf>) -> Result<FeatureExtractor> {
    let config = config_path
        .map(AnalysisConfig::load_from_file)
        .unwrap_or_default();
    FeatureExtractor::new(config).context("invalid analysis configuration")
}

fn run_analyze(
    input: &Path,
    config: Option<PathBuf>,
    output_path: Option<PathBuf>,
    full: bool,
) -> Result<ExitCode> {
    let extractor = build_extractor(config)?;
    let buffer = read_wav(input)?;
    let report = extractor
        .extract(&buffer)
        .map_err(|err| {
            log_analysis_error(&err, "analyze");
            err
        })
        .with_context(|| format!("analyzing {}", input.display()))?;

    let json = if full {
        serde_json::to_string_pretty(&report)?
    } else {
        serde_json::to_string_pretty(&report.summary())?
    };

    if let Some(path) = output_path {
        fs::write(&path, json).with_context(|| format!("writing {}", path.display()))?;
    } else {
        println!("{json}");
    }

    Ok(ExitCode::from(0))
}

fn run_batch(inputs: &[PathBuf], config: Option<PathBuf>) -> Result<ExitCode> {
    let extractor = build_extractor(config)?;

    // Decode failures keep their slot so output order matches the arguments
    let mut buffers: Vec<SampleBuffer> = Vec::new();
    let mut slots: Vec<std::result::Result<usize, String>> = Vec::new();
    for path in inputs {
        match read_wav(path) {
            Ok(buffer) => {
                slots.push(Ok(buffers.len()));
                buffers.push(buffer);
            }
            Err(err) => slots.push(Err(format!("{err:#}"))),
        }
    }

    let results = extractor.extract_batch(&buffers);
    let mut failures = 0;

    for (path, slot) in inputs.iter().zip(slots) {
        let line = match slot.map(|index| &results[index]) {
            Ok(Ok(report)) => BatchLine::summary(path, report.summary()),
            Ok(Err(err)) => {
                log_analysis_error(err, "batch");
                failures += 1;
                BatchLine::error(path, err.to_string())
            }
            Err(message) => {
                failures += 1;
                BatchLine::error(path, message)
            }
        };
        println!("{}", serde_json::to_string(&line)?);
    }

    Ok(ExitCode::from(if failures == 0 { 0 } else { 1 }))
}

fn run_tone(
    frequency: f32,
    duration: f32,
    sample_rate: u32,
    amplitude: f32,
    output: &Path,
) -> Result<ExitCode> {
    let tone = sine(frequency, duration, sample_rate, amplitude).context("invalid tone")?;
    write_wav(output, &tone)?;
    tracing::info!(
        "wrote {} Hz tone ({} samples) to {}",
        frequency,
        tone.frame_count(),
        output.display()
    );
    Ok(ExitCode::from(0))
}

#[derive(Serialize)]
struct BatchLine {
    input: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<FeatureSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl BatchLine {
    fn summary(path: &Path, summary: FeatureSummary) -> Self {
        Self {
            input: path.display().to_string(),
            summary: Some(summary),
            error: None,
        }
    }

    fn error(path: &Path, message: String) -> Self {
        Self {
            input: path.display().to_string(),
            summary: None,
            error: Some(message),
        }
    }
}
