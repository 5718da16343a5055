//! Spectral Downsampler - streaming sample-rate reduction in the frequency domain
//!
//! Reads a continuous stream of 32-bit PCM samples, folds each block's
//! spectrum into fewer bins, and writes the shorter inverse transform back
//! out with saturating fixed-point conversion.

pub mod audio;
pub mod config;
pub mod error;
pub mod spectrum;

pub use audio::{ChannelConfig, EofPolicy, StreamConverter};
pub use config::ConverterConfig;
pub use error::{ChannelError, ConfigError, ConvertError, EngineError};
pub use spectrum::{Normalization, SpectralEngine, TransformOptions, WindowType};
