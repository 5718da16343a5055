//! Spectral engine: real FFT → bin remap → inverse real FFT
//!
//! Plans and scratch buffers are built once per (input, output) length pair
//! and reused for every block, so `transform` never allocates.

use super::remap::BinRemapper;
use super::windowing::{apply_window_inplace, coherent_gain, generate_window, WindowType};
use crate::error::EngineError;
use num_complex::Complex;
use realfft::{ComplexToReal, RealFftPlanner, RealToComplex};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

/// Largest magnitude an output sample may take
///
/// The range is symmetric, so `i32::MIN` is never produced.
pub const SAMPLE_CEILING: i32 = i32::MAX;

/// Scale applied to inverse-transform output
///
/// The transforms are unnormalized, so some divisor is required; which one
/// is "right" depends on both lengths and the window, and is left to the user.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Normalization {
    /// Divide by the input length (identity for equal lengths, no window)
    #[default]
    InputLength,

    /// Divide by the sum of the active window's coefficients
    WindowGain,

    /// Multiply by an explicit calibration gain
    Custom(f64),
}

/// Per-call transform options
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TransformOptions {
    pub window: WindowType,
    pub normalization: Normalization,
}

/// Owns the forward/inverse plans and all scratch storage
pub struct SpectralEngine {
    input_len: usize,
    output_len: usize,

    r2c: Arc<dyn RealToComplex<f64>>,
    c2r: Arc<dyn ComplexToReal<f64>>,

    remapper: BinRemapper,

    /// Hann coefficients for `input_len`, and their sum
    hann: Vec<f64>,
    hann_gain: f64,

    real_input: Vec<f64>,
    spectrum_in: Vec<Complex<f64>>,
    /// Full `output_len` spectrum; only the first `output_len/2 + 1` bins
    /// feed the inverse transform
    spectrum_out: Vec<Complex<f64>>,
    real_output: Vec<f64>,

    forward_scratch: Vec<Complex<f64>>,
    inverse_scratch: Vec<Complex<f64>>,
}

impl SpectralEngine {
    /// Plan both transforms and allocate scratch storage
    ///
    /// # Arguments
    /// * `input_len` - Samples per input block (forward transform length)
    /// * `output_len` - Samples per output block, `0 < output_len <= input_len`
    pub fn prepare(input_len: usize, output_len: usize) -> Result<Self, EngineError> {
        let remapper = BinRemapper::new(input_len, output_len)?;

        // Buffers are reserved fallibly; the plans and the Hann table are not
        // and abort the process on exhaustion.
        let zero = Complex::new(0.0, 0.0);
        let real_input = alloc_buffer("real input buffer", input_len, 0.0)?;
        let spectrum_in = alloc_buffer("input spectrum", input_len / 2 + 1, zero)?;
        let spectrum_out = alloc_buffer("output spectrum", output_len, zero)?;
        let real_output = alloc_buffer("real output buffer", output_len, 0.0)?;

        let mut planner = RealFftPlanner::<f64>::new();
        let r2c = planner.plan_fft_forward(input_len);
        let c2r = planner.plan_fft_inverse(output_len);

        let forward_scratch = alloc_buffer("forward scratch", r2c.get_scratch_len(), zero)?;
        let inverse_scratch = alloc_buffer("inverse scratch", c2r.get_scratch_len(), zero)?;

        let hann = generate_window(WindowType::Hann, input_len);
        let hann_gain = coherent_gain(&hann);

        debug!(input_len, output_len, "spectral engine prepared");

        Ok(Self {
            input_len,
            output_len,
            r2c,
            c2r,
            remapper,
            hann,
            hann_gain,
            real_input,
            spectrum_in,
            spectrum_out,
            real_output,
            forward_scratch,
            inverse_scratch,
        })
    }

    /// Convert one block of `input_len` samples into `output_len` samples
    ///
    /// # Arguments
    /// * `input` - Raw input block, exactly `input_len` samples
    /// * `output` - Destination, exactly `output_len` samples
    /// * `options` - Window and normalization for this call
    pub fn transform(
        &mut self,
        input: &[i32],
        output: &mut [i32],
        options: &TransformOptions,
    ) -> Result<(), EngineError> {
        check_len("input", self.input_len, input.len())?;
        check_len("output", self.output_len, output.len())?;

        for (dst, &src) in self.real_input.iter_mut().zip(input.iter()) {
            *dst = src as f64;
        }

        if options.window == WindowType::Hann {
            apply_window_inplace(&mut self.real_input, &self.hann);
        }

        self.r2c.process_with_scratch(
            &mut self.real_input,
            &mut self.spectrum_in,
            &mut self.forward_scratch,
        )?;

        self.remapper.remap(&self.spectrum_in, &mut self.spectrum_out);

        // A real signal's DC and Nyquist bins are purely real; the folded sums
        // generally are not, and the inverse only accepts the real part
        let half = &mut self.spectrum_out[..self.output_len / 2 + 1];
        half[0].im = 0.0;
        if self.output_len % 2 == 0 {
            if let Some(nyquist) = half.last_mut() {
                nyquist.im = 0.0;
            }
        }

        self.c2r
            .process_with_scratch(half, &mut self.real_output, &mut self.inverse_scratch)?;

        let scale = self.scale(options);
        for (dst, &raw) in output.iter_mut().zip(self.real_output.iter()) {
            *dst = saturate(raw * scale);
        }

        Ok(())
    }

    /// Multiplier applied to raw inverse-transform output
    pub fn scale(&self, options: &TransformOptions) -> f64 {
        let n = self.input_len as f64;
        match options.normalization {
            Normalization::InputLength => 1.0 / n,
            Normalization::WindowGain => match options.window {
                WindowType::Hann if self.hann_gain > 0.0 => 1.0 / self.hann_gain,
                _ => 1.0 / n,
            },
            Normalization::Custom(gain) => gain,
        }
    }

    pub fn input_len(&self) -> usize {
        self.input_len
    }

    pub fn output_len(&self) -> usize {
        self.output_len
    }

    pub fn remapper(&self) -> &BinRemapper {
        &self.remapper
    }
}

/// Clamp to `[-SAMPLE_CEILING, SAMPLE_CEILING]` and round to the nearest integer
///
/// This rounds rather than truncating toward zero the way a plain integer
/// cast narrows, so `-12.6` becomes `-13`, not `-12`. NaN maps to 0.
pub fn saturate(value: f64) -> i32 {
    let ceiling = SAMPLE_CEILING as f64;
    if value > ceiling {
        SAMPLE_CEILING
    } else if value < -ceiling {
        -SAMPLE_CEILING
    } else {
        value.round() as i32
    }
}

fn alloc_buffer<T: Clone>(what: &'static str, len: usize, fill: T) -> Result<Vec<T>, EngineError> {
    let mut buffer = Vec::new();
    buffer
        .try_reserve_exact(len)
        .map_err(|_| EngineError::Allocation { what, len })?;
    buffer.resize(len, fill);
    Ok(buffer)
}

fn check_len(which: &'static str, expected: usize, actual: usize) -> Result<(), EngineError> {
    if expected == actual {
        Ok(())
    } else {
        Err(EngineError::BufferLength {
            which,
            expected,
            actual,
        })
    }
}
