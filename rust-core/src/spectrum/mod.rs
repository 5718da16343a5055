//! Spectral rate conversion with FFT bin remapping

pub mod fft;
pub mod remap;
pub mod windowing;

pub use fft::{saturate, Normalization, SpectralEngine, TransformOptions};
pub use remap::BinRemapper;
pub use windowing::WindowType;
