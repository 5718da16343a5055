//! Converter main loop
//!
//! Single-threaded and blocking: slide → read → transform → write, one block
//! at a time, reusing the same buffers every iteration. The loop only ends
//! when the source reports exhaustion (or on an error).

use super::buffer::{InputWindow, OutputWindow};
use super::channel::{SampleReader, SampleWriter};
use crate::config::ConverterConfig;
use crate::error::{ChannelError, ConvertError};
use crate::spectrum::fft::{SpectralEngine, TransformOptions};
use std::io::{Read, Write};
use tracing::{info, trace};

/// Outcome of a single iteration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// A block was converted and written
    Converted,
    /// The source ran dry before a full block was read
    Exhausted,
}

/// Counters reported when a run ends
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunStats {
    pub blocks: u64,
    pub samples_in: u64,
    pub samples_out: u64,
}

/// Streaming spectral downsampler
pub struct StreamConverter<R, W> {
    config: ConverterConfig,
    options: TransformOptions,
    engine: SpectralEngine,
    input: InputWindow,
    output: OutputWindow,
    reader: SampleReader<R>,
    writer: SampleWriter<W>,
    stats: RunStats,
}

impl<R: Read, W: Write> StreamConverter<R, W> {
    /// Validate `config`, prepare the engine and size the windows
    ///
    /// # Arguments
    /// * `config` - Block sizes, window, normalization and channel settings
    /// * `source` - Byte stream of input samples
    /// * `sink` - Byte stream receiving converted samples
    pub fn new(config: ConverterConfig, source: R, sink: W) -> Result<Self, ConvertError> {
        config.validate()?;

        let engine = SpectralEngine::prepare(config.input_buffer_size(), config.output_buffer_size())?;
        let input = InputWindow::new(config.sample_size, config.input_overlap());
        let output = OutputWindow::new(config.output_block_size(), config.overlap);

        info!(
            sample_size = config.sample_size,
            factor = config.downsample_factor,
            overlap = config.overlap,
            input_len = input.len(),
            output_len = output.len(),
            window = ?config.window,
            "converter ready"
        );

        Ok(Self {
            options: config.transform_options(),
            reader: SampleReader::new(source, config.source),
            writer: SampleWriter::new(sink, config.sink),
            config,
            engine,
            input,
            output,
            stats: RunStats::default(),
        })
    }

    /// Run until the source is exhausted
    pub fn run(&mut self) -> Result<RunStats, ConvertError> {
        while self.step()? == Step::Converted {}

        info!(
            blocks = self.stats.blocks,
            samples_in = self.stats.samples_in,
            samples_out = self.stats.samples_out,
            "source exhausted"
        );
        Ok(self.stats)
    }

    /// One iteration of the loop
    ///
    /// Only the source ending is a normal stop ([`Step::Exhausted`]). A
    /// fail-fast sink that stops accepting bytes means converted output was
    /// lost, so it comes back as `Err(ConvertError::Channel(ChannelError::Exhausted))`.
    pub fn step(&mut self) -> Result<Step, ConvertError> {
        self.input.slide();

        match self.reader.read(self.input.fresh_mut()) {
            Ok(()) => {}
            Err(ChannelError::Exhausted) => return Ok(Step::Exhausted),
            Err(e) => return Err(e.into()),
        }

        self.engine
            .transform(self.input.as_slice(), self.output.as_mut_slice(), &self.options)?;

        let center = self.output.center();
        self.writer.write(center)?;

        self.stats.blocks += 1;
        self.stats.samples_in += self.config.sample_size as u64;
        self.stats.samples_out += center.len() as u64;
        trace!(block = self.stats.blocks, "block converted");

        Ok(Step::Converted)
    }

    pub fn config(&self) -> &ConverterConfig {
        &self.config
    }

    pub fn stats(&self) -> RunStats {
        self.stats
    }

    pub fn input_window(&self) -> &InputWindow {
        &self.input
    }

    pub fn output_window(&self) -> &OutputWindow {
        &self.output
    }

    pub fn sink(&self) -> &W {
        self.writer.get_ref()
    }

    /// Give back the sink (e.g. an in-memory buffer)
    pub fn into_sink(self) -> W {
        self.writer.into_inner()
    }
}
