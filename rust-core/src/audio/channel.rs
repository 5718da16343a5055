//! Blocking sample channels over byte streams
//!
//! The wire format is an unframed run of 4-byte signed integers in host
//! byte order. Each logical sample is transferred `duplication` times: on
//! read the repeats overwrite the same slot (the last one wins), on write
//! the same value is emitted repeatedly.

use crate::error::ChannelError;
use serde::{Deserialize, Serialize};
use std::io::{ErrorKind, Read, Write};

/// Bytes per sample on the wire
pub const SAMPLE_BYTES: usize = 4;

/// What to do when a transfer moves zero bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EofPolicy {
    /// Report [`ChannelError::Exhausted`]
    #[default]
    FailFast,

    /// Keep retrying until data moves
    ///
    /// Only meant for live capture sources that stall without ending; a file
    /// source under this policy never terminates.
    Retry,
}

/// Channel settings, fixed once a channel is built
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChannelConfig {
    /// Transfers per logical sample (at least 1)
    pub duplication: usize,
    pub eof_policy: EofPolicy,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            duplication: 1,
            eof_policy: EofPolicy::FailFast,
        }
    }
}

impl ChannelConfig {
    pub fn new(duplication: usize, eof_policy: EofPolicy) -> Self {
        Self {
            duplication,
            eof_policy,
        }
    }
}

/// Reads samples from a byte source
pub struct SampleReader<R> {
    inner: R,
    config: ChannelConfig,
}

impl<R: Read> SampleReader<R> {
    pub fn new(inner: R, config: ChannelConfig) -> Self {
        Self { inner, config }
    }

    /// Fill `buffer` completely, reading each slot `duplication` times
    ///
    /// On [`ChannelError::Exhausted`] the contents of `buffer` are unspecified.
    pub fn read(&mut self, buffer: &mut [i32]) -> Result<(), ChannelError> {
        let repeats = self.config.duplication.max(1);
        let mut record = [0u8; SAMPLE_BYTES];

        for slot in buffer.iter_mut() {
            for _ in 0..repeats {
                self.read_record(&mut record)?;
                *slot = i32::from_ne_bytes(record);
            }
        }

        Ok(())
    }

    /// Read one whole 4-byte record
    fn read_record(&mut self, record: &mut [u8; SAMPLE_BYTES]) -> Result<(), ChannelError> {
        let mut filled = 0;
        while filled < SAMPLE_BYTES {
            match self.inner.read(&mut record[filled..]) {
                Ok(0) => match self.config.eof_policy {
                    EofPolicy::FailFast => return Err(ChannelError::Exhausted),
                    EofPolicy::Retry => std::thread::yield_now(),
                },
                Ok(n) => filled += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => {}
                Err(e) => return Err(e.into()),
            }
        }
        Ok(())
    }

    pub fn config(&self) -> &ChannelConfig {
        &self.config
    }

    pub fn into_inner(self) -> R {
        self.inner
    }
}

/// Writes samples to a byte sink
pub struct SampleWriter<W> {
    inner: W,
    config: ChannelConfig,
}

impl<W: Write> SampleWriter<W> {
    pub fn new(inner: W, config: ChannelConfig) -> Self {
        Self { inner, config }
    }

    /// Write every sample of `buffer` `duplication` times, then flush
    pub fn write(&mut self, buffer: &[i32]) -> Result<(), ChannelError> {
        let repeats = self.config.duplication.max(1);

        for &sample in buffer {
            let record = sample.to_ne_bytes();
            for _ in 0..repeats {
                self.write_record(&record)?;
            }
        }

        self.inner.flush()?;
        Ok(())
    }

    fn write_record(&mut self, record: &[u8; SAMPLE_BYTES]) -> Result<(), ChannelError> {
        let mut written = 0;
        while written < SAMPLE_BYTES {
            match self.inner.write(&record[written..]) {
                Ok(0) => match self.config.eof_policy {
                    EofPolicy::FailFast => return Err(ChannelError::Exhausted),
                    EofPolicy::Retry => std::thread::yield_now(),
                },
                Ok(n) => written += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => {}
                Err(e) => return Err(e.into()),
            }
        }
        Ok(())
    }

    pub fn config(&self) -> &ChannelConfig {
        &self.config
    }

    pub fn get_ref(&self) -> &W {
        &self.inner
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

/// Encode samples in wire format (host byte order)
pub fn encode_samples(samples: &[i32]) -> Vec<u8> {
    samples.iter().flat_map(|s| s.to_ne_bytes()).collect()
}

/// Decode wire-format bytes, dropping a trailing partial record
pub fn decode_samples(bytes: &[u8]) -> Vec<i32> {
    bytes
        .chunks_exact(SAMPLE_BYTES)
        .map(|c| i32::from_ne_bytes([c[0], c[1], c[2], c[3]]))
        .collect()
}
