//! Frequency bin remapping between transform sizes
//!
//! Every bin of the (conceptually full) input spectrum is added into output
//! bin `floor(i * output_len / input_len)`. When the output is shorter,
//! several source bins land in the same target; that fold is the only
//! anti-aliasing this converter does.

use crate::error::ConfigError;
use num_complex::Complex;

/// Precomputed source→target bin table for one (input, output) length pair
#[derive(Debug, Clone)]
pub struct BinRemapper {
    input_len: usize,
    output_len: usize,
    targets: Vec<usize>,
}

impl BinRemapper {
    /// Build the table, rejecting pairs whose targets could leave the output
    ///
    /// # Arguments
    /// * `input_len` - Forward transform length (number of input bins)
    /// * `output_len` - Inverse transform length, must satisfy `0 < output_len <= input_len`
    pub fn new(input_len: usize, output_len: usize) -> Result<Self, ConfigError> {
        if output_len == 0 || output_len > input_len {
            return Err(ConfigError::TransformLengths {
                input_len,
                output_len,
            });
        }

        let targets: Vec<usize> = (0..input_len)
            .map(|i| target_bin(i, input_len, output_len))
            .collect();

        // i < input_len implies i * output_len / input_len < output_len
        debug_assert!(targets.iter().all(|&t| t < output_len));

        Ok(Self {
            input_len,
            output_len,
            targets,
        })
    }

    /// Target bin of source bin `index`
    pub fn target(&self, index: usize) -> usize {
        self.targets[index]
    }

    pub fn input_len(&self) -> usize {
        self.input_len
    }

    pub fn output_len(&self) -> usize {
        self.output_len
    }

    /// Fold a half spectrum into a full-length output spectrum
    ///
    /// `half_spectrum` holds the `input_len/2 + 1` bins a real forward
    /// transform produces; bins above Nyquist are taken as the conjugate of
    /// their mirror. `output` is zeroed first and must hold `output_len` bins.
    pub fn remap(&self, half_spectrum: &[Complex<f64>], output: &mut [Complex<f64>]) {
        debug_assert_eq!(half_spectrum.len(), self.input_len / 2 + 1);
        debug_assert_eq!(output.len(), self.output_len);

        output.fill(Complex::new(0.0, 0.0));

        for (i, &target) in self.targets.iter().enumerate() {
            let bin = source_bin(half_spectrum, self.input_len, i);
            output[target] += bin;
        }
    }
}

/// `floor(index * output_len / input_len)` in exact integer arithmetic
pub fn target_bin(index: usize, input_len: usize, output_len: usize) -> usize {
    ((index as u128 * output_len as u128) / input_len as u128) as usize
}

/// Bin `index` of the full spectrum, recovered from the stored half
fn source_bin(half_spectrum: &[Complex<f64>], input_len: usize, index: usize) -> Complex<f64> {
    if index < half_spectrum.len() {
        half_spectrum[index]
    } else {
        half_spectrum[input_len - index].conj()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rustfft::FftPlanner;

    #[test]
    fn test_target_bins_for_quarter_rate() {
        let remapper = BinRemapper::new(3072, 768).unwrap();
        assert_eq!(remapper.target(0), 0);
        assert_eq!(remapper.target(3), 0);
        assert_eq!(remapper.target(4), 1);
        assert_eq!(remapper.target(3071), 767);
    }

    #[test]
    fn test_identity_table() {
        let remapper = BinRemapper::new(512, 512).unwrap();
        for i in 0..512 {
            assert_eq!(remapper.target(i), i);
        }
    }

    #[test]
    fn test_rejects_invalid_pairs() {
        assert!(BinRemapper::new(768, 3072).is_err());
        assert!(BinRemapper::new(768, 0).is_err());
        assert!(BinRemapper::new(0, 0).is_err());
    }

    #[test]
    fn test_accumulates_instead_of_overwriting() {
        let remapper = BinRemapper::new(8, 2).unwrap();
        let half: Vec<Complex<f64>> = (0..5).map(|k| Complex::new(1.0, k as f64)).collect();
        let mut output = vec![Complex::new(99.0, 99.0); 2];
        remapper.remap(&half, &mut output);

        // Bins 0..4 → 0, bins 4..8 → 1 (5, 6, 7 are mirrors of 3, 2, 1)
        assert_eq!(output[0], Complex::new(4.0, 0.0 + 1.0 + 2.0 + 3.0));
        assert_eq!(output[1], Complex::new(4.0, 4.0 - 3.0 - 2.0 - 1.0));
    }

    #[test]
    fn test_mirror_matches_full_complex_fft() {
        let n = 16;
        let signal: Vec<f64> = (0..n).map(|i| ((i * 7) % 5) as f64 - 2.0).collect();

        let mut full: Vec<Complex<f64>> = signal.iter().map(|&x| Complex::new(x, 0.0)).collect();
        FftPlanner::<f64>::new().plan_fft_forward(n).process(&mut full);

        let half = &full[..n / 2 + 1];
        for (i, expected) in full.iter().enumerate() {
            let got = source_bin(half, n, i);
            assert!((got - expected).norm() < 1e-9, "bin {}", i);
        }
    }
}
