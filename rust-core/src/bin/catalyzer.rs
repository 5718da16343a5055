//! catalyzer - streaming spectral downsampler CLI
//!
//! Samples are raw host-order i32 on stdin/stdout; logs go to stderr.

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use spectral_downsampler::audio::{SampleWriter, ToneGenerator};
use spectral_downsampler::{ChannelConfig, ConverterConfig, EofPolicy, StreamConverter, WindowType};
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "catalyzer")]
#[command(author, version, about = "Streaming spectral sample-rate converter", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Downsample a sample stream by folding FFT bins
    Convert(ConvertArgs),

    /// Emit a fixed-frequency test tone
    Tone(ToneArgs),
}

#[derive(Args)]
struct ConvertArgs {
    /// TOML config file (flags below override it)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Read samples from FILE instead of stdin
    #[arg(long, short, value_name = "FILE")]
    input: Option<PathBuf>,

    /// Write samples to FILE instead of stdout
    #[arg(long, short, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Input samples per block
    #[arg(long)]
    sample_size: Option<usize>,

    /// Integer downsample factor
    #[arg(long)]
    factor: Option<usize>,

    /// Output samples retained on each side of a block
    #[arg(long)]
    overlap: Option<usize>,

    /// Apply a Hann window before the forward transform
    #[arg(long)]
    hann: bool,

    /// Reads per input sample
    #[arg(long)]
    source_dup: Option<usize>,

    /// Writes per output sample
    #[arg(long)]
    sink_dup: Option<usize>,

    /// Keep retrying when the source has no data (live capture)
    #[arg(long, conflicts_with = "fail_fast")]
    retry: bool,

    /// Stop when the source has no data (files)
    #[arg(long)]
    fail_fast: bool,
}

#[derive(Args)]
struct ToneArgs {
    /// Tone frequency in Hz
    #[arg(long, default_value = "1000.0")]
    frequency: f64,

    /// Sample rate in Hz
    #[arg(long, default_value = "48000.0")]
    sample_rate: f64,

    /// Duration in seconds
    #[arg(long, default_value = "1.0")]
    seconds: f64,

    /// Writes per sample
    #[arg(long, default_value = "1")]
    dup: usize,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Convert(args) => convert(args),
        Commands::Tone(args) => tone(args),
    }
}

fn convert(args: ConvertArgs) -> anyhow::Result<()> {
    let mut config = match &args.config {
        Some(path) => ConverterConfig::load(path)?,
        None => ConverterConfig::default(),
    };

    if let Some(sample_size) = args.sample_size {
        config.sample_size = sample_size;
    }
    if let Some(factor) = args.factor {
        config.downsample_factor = factor;
    }
    if let Some(overlap) = args.overlap {
        config.overlap = overlap;
    }
    if args.hann {
        config.window = WindowType::Hann;
    }
    if let Some(dup) = args.source_dup {
        config.source.duplication = dup;
    }
    if let Some(dup) = args.sink_dup {
        config.sink.duplication = dup;
    }
    if args.retry {
        config.source.eof_policy = EofPolicy::Retry;
    }
    if args.fail_fast {
        config.source.eof_policy = EofPolicy::FailFast;
    }

    let source: Box<dyn Read> = match &args.input {
        Some(path) => Box::new(BufReader::new(
            File::open(path).with_context(|| format!("opening {}", path.display()))?,
        )),
        None => Box::new(io::stdin().lock()),
    };
    let sink: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("creating {}", path.display()))?,
        )),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };

    let mut converter = StreamConverter::new(config, source, sink)?;
    let stats = converter.run()?;
    info!(blocks = stats.blocks, "done");
    Ok(())
}

fn tone(args: ToneArgs) -> anyhow::Result<()> {
    let count = ToneGenerator::samples_for(args.sample_rate, args.seconds);
    info!(
        frequency = args.frequency,
        sample_rate = args.sample_rate,
        samples = count,
        "generating tone"
    );

    let config = ChannelConfig::new(args.dup.max(1), EofPolicy::FailFast);
    let mut writer = SampleWriter::new(BufWriter::new(io::stdout().lock()), config);

    let mut tone = ToneGenerator::new(args.frequency, args.sample_rate).take(count as usize);
    let mut block = Vec::with_capacity(4096);
    loop {
        block.clear();
        block.extend(tone.by_ref().take(4096));
        if block.is_empty() {
            break;
        }
        writer.write(&block)?;
    }
    Ok(())
}
