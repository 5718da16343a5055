//! Error types for the converter
//!
//! Configuration problems are caught before any sample is read; channel
//! exhaustion is the normal way a converter run ends.

use std::io;
use thiserror::Error;

/// Invalid converter or channel configuration
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("sample_size must be greater than zero")]
    ZeroSampleSize,

    #[error("downsample_factor must be greater than zero")]
    ZeroDownsampleFactor,

    #[error("sample_size {sample_size} is not divisible by downsample_factor {factor}")]
    IndivisibleSampleSize { sample_size: usize, factor: usize },

    #[error("overlap {overlap} with factor {factor} and sample_size {sample_size} overflows the buffer size")]
    SizeOverflow {
        sample_size: usize,
        factor: usize,
        overlap: usize,
    },

    #[error("{channel} duplication factor must be at least 1")]
    ZeroDuplication { channel: &'static str },

    #[error("invalid transform lengths: input {input_len}, output {output_len} (need 0 < output <= input)")]
    TransformLengths { input_len: usize, output_len: usize },

    #[error("custom normalization gain must be finite, got {0}")]
    InvalidGain(f64),

    #[error("failed to read config file: {0}")]
    Read(String),

    #[error("failed to parse config: {0}")]
    Parse(String),
}

/// Spectral engine failures
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("failed to allocate {what} ({len} elements)")]
    Allocation { what: &'static str, len: usize },

    #[error("{which} buffer has {actual} samples, engine expects {expected}")]
    BufferLength {
        which: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("FFT processing failed: {0}")]
    Fft(#[from] realfft::FftError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Sample channel failures
#[derive(Error, Debug)]
pub enum ChannelError {
    /// A zero-length transfer under the fail-fast policy
    #[error("channel exhausted")]
    Exhausted,

    #[error("channel I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Errors surfaced by the converter main loop
#[derive(Error, Debug)]
pub enum ConvertError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error(transparent)]
    Channel(#[from] ChannelError),
}
