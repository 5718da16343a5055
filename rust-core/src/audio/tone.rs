//! Fixed-frequency test tone source
//!
//! Produces a full-scale sine offset into the non-negative half of the
//! sample range, handy for piping straight into the converter.

use std::f64::consts::PI;

/// Endless sine tone iterator
#[derive(Debug, Clone)]
pub struct ToneGenerator {
    phase: f64,
    increment: f64,
}

impl ToneGenerator {
    /// # Arguments
    /// * `frequency` - Tone frequency in Hz
    /// * `sample_rate` - Output sample rate in Hz
    pub fn new(frequency: f64, sample_rate: f64) -> Self {
        Self {
            phase: 0.0,
            increment: 2.0 * PI * frequency / sample_rate,
        }
    }

    /// Number of samples in `seconds` of output
    pub fn samples_for(sample_rate: f64, seconds: f64) -> u64 {
        (sample_rate * seconds).ceil().max(0.0) as u64
    }
}

impl Iterator for ToneGenerator {
    type Item = i32;

    fn next(&mut self) -> Option<i32> {
        let value = (self.phase.sin() + 1.0) * (i32::MAX as f64 / 2.0);

        self.phase += self.increment;
        if self.phase > 2.0 * PI {
            self.phase -= 2.0 * PI;
        }

        Some(value as i32)
    }
}
