//! Window functions applied to an input block before the forward transform
//!
//! Tapering the block edges reduces the discontinuity between consecutive
//! blocks; it does not make the overlap scheme an exact reconstruction.

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Window function types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WindowType {
    /// No weighting (every coefficient is 1)
    #[default]
    Rectangular,

    /// Hann window: w[n] = 0.5*(1 - cos(2πn/(M-1)))
    /// Edge samples go to zero, the center passes unweighted
    Hann,
}

/// Generate window coefficients
///
/// # Arguments
/// * `window_type` - Type of window function
/// * `length` - Number of samples (M)
///
/// # Returns
/// Vector of window coefficients w[n] for n = 0..M-1
pub fn generate_window(window_type: WindowType, length: usize) -> Vec<f64> {
    match window_type {
        WindowType::Rectangular => vec![1.0; length],
        // A single-sample Hann window has no edges to taper
        WindowType::Hann if length < 2 => vec![1.0; length],
        WindowType::Hann => {
            let denom = (length - 1) as f64;
            (0..length)
                .map(|n| 0.5 * (1.0 - (2.0 * PI * n as f64 / denom).cos()))
                .collect()
        }
    }
}

/// Multiply a signal by precomputed window coefficients in place
pub fn apply_window_inplace(signal: &mut [f64], window: &[f64]) {
    for (s, w) in signal.iter_mut().zip(window.iter()) {
        *s *= w;
    }
}

/// Coherent gain of a window (sum of its coefficients)
///
/// Dividing by this instead of the block length compensates the amplitude
/// a taper removes.
pub fn coherent_gain(window: &[f64]) -> f64 {
    window.iter().sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hann_tapers_constant_signal() {
        let length = 3072;
        let value = 1_000_000.0;
        let window = generate_window(WindowType::Hann, length);
        let mut signal = vec![value; length];
        apply_window_inplace(&mut signal, &window);

        assert_eq!(signal[0], 0.0);
        assert!(signal[length - 1].abs() < 1e-6);

        // Center of an even-length window sits half a sample off the peak
        let center = signal[length / 2];
        assert!((center - value).abs() / value < 1e-5);
    }

    #[test]
    fn test_hann_symmetry() {
        let window = generate_window(WindowType::Hann, 161);
        for n in 0..161 {
            assert!((window[n] - window[160 - n]).abs() < 1e-12);
        }
        assert!((window[80] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_rectangular_window() {
        let window = generate_window(WindowType::Rectangular, 100);
        assert_eq!(window.len(), 100);
        assert!(window.iter().all(|&w| w == 1.0));
        assert_eq!(coherent_gain(&window), 100.0);
    }

    #[test]
    fn test_degenerate_lengths() {
        assert!(generate_window(WindowType::Hann, 0).is_empty());
        assert_eq!(generate_window(WindowType::Hann, 1), vec![1.0]);
    }

    #[test]
    fn test_hann_gain_is_about_half() {
        let window = generate_window(WindowType::Hann, 1024);
        let ratio = coherent_gain(&window) / 1024.0;
        assert!((ratio - 0.5).abs() < 0.01);
    }
}
