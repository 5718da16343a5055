//! Sample channels, overlap windows and the converter loop

pub mod channel;
pub mod buffer;
pub mod processor;
pub mod tone;

pub use channel::{ChannelConfig, EofPolicy, SampleReader, SampleWriter};
pub use buffer::{InputWindow, OutputWindow};
pub use processor::{RunStats, Step, StreamConverter};
pub use tone::ToneGenerator;
