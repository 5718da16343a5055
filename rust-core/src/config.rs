//! Converter configuration
//!
//! All block sizes derive from three tunables: `sample_size` (samples read
//! per iteration), `downsample_factor` and `overlap` (output samples kept on
//! each side of the emitted center).

use crate::audio::channel::{ChannelConfig, EofPolicy};
use crate::error::ConfigError;
use crate::spectrum::fft::{Normalization, TransformOptions};
use crate::spectrum::windowing::WindowType;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Full converter configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConverterConfig {
    /// Input samples read per iteration
    pub sample_size: usize,

    /// Integer rate reduction; must divide `sample_size`
    pub downsample_factor: usize,

    /// Output samples discarded at each edge of a transformed block
    pub overlap: usize,

    pub window: WindowType,

    pub normalization: Normalization,

    pub source: ChannelConfig,

    pub sink: ChannelConfig,
}

impl Default for ConverterConfig {
    /// 3072 → 768 samples per transform, emitting the center 256.
    /// The source keeps one channel of an interleaved stereo pair; the sink
    /// repeats each sample so both sides run on the same clock.
    fn default() -> Self {
        Self {
            sample_size: 1024,
            downsample_factor: 4,
            overlap: 256,
            window: WindowType::Rectangular,
            normalization: Normalization::InputLength,
            source: ChannelConfig::new(2, EofPolicy::Retry),
            sink: ChannelConfig::new(8, EofPolicy::FailFast),
        }
    }
}

impl ConverterConfig {
    /// Check every sizing invariant
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sample_size == 0 {
            return Err(ConfigError::ZeroSampleSize);
        }
        if self.downsample_factor == 0 {
            return Err(ConfigError::ZeroDownsampleFactor);
        }
        if self.sample_size % self.downsample_factor != 0 {
            return Err(ConfigError::IndivisibleSampleSize {
                sample_size: self.sample_size,
                factor: self.downsample_factor,
            });
        }
        if self.checked_buffer_sizes().is_none() {
            return Err(ConfigError::SizeOverflow {
                sample_size: self.sample_size,
                factor: self.downsample_factor,
                overlap: self.overlap,
            });
        }
        if self.source.duplication == 0 {
            return Err(ConfigError::ZeroDuplication { channel: "source" });
        }
        if self.sink.duplication == 0 {
            return Err(ConfigError::ZeroDuplication { channel: "sink" });
        }
        if let Normalization::Custom(gain) = self.normalization {
            if !gain.is_finite() {
                return Err(ConfigError::InvalidGain(gain));
            }
        }
        Ok(())
    }

    /// (input_buffer_size, output_buffer_size), or `None` if either overflows
    fn checked_buffer_sizes(&self) -> Option<(usize, usize)> {
        let output_overlap = self.overlap.checked_mul(2)?;
        let input_overlap = output_overlap.checked_mul(self.downsample_factor)?;
        let input = self.sample_size.checked_add(input_overlap)?;
        let output = (self.sample_size / self.downsample_factor).checked_add(output_overlap)?;
        Some((input, output))
    }

    /// Parse and validate a TOML document
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Read(format!("{}: {}", path.display(), e)))?;
        Self::from_toml_str(&text)
    }

    // The derived sizes below assume a config that passed `validate`

    /// Input samples retained across iterations
    pub fn input_overlap(&self) -> usize {
        2 * self.overlap * self.downsample_factor
    }

    /// Output samples discarded per block (both edges)
    pub fn output_overlap(&self) -> usize {
        2 * self.overlap
    }

    /// Forward transform length
    pub fn input_buffer_size(&self) -> usize {
        self.sample_size + self.input_overlap()
    }

    /// Samples emitted per iteration
    pub fn output_block_size(&self) -> usize {
        self.sample_size / self.downsample_factor
    }

    /// Inverse transform length
    pub fn output_buffer_size(&self) -> usize {
        self.output_block_size() + self.output_overlap()
    }

    pub fn transform_options(&self) -> TransformOptions {
        TransformOptions {
            window: self.window,
            normalization: self.normalization,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_sizes() {
        let config = ConverterConfig::default();
        config.validate().unwrap();
        assert_eq!(config.input_overlap(), 2048);
        assert_eq!(config.output_overlap(), 512);
        assert_eq!(config.input_buffer_size(), 3072);
        assert_eq!(config.output_buffer_size(), 768);
        assert_eq!(config.output_block_size(), 256);
    }

    #[test]
    fn test_indivisible_sample_size() {
        let config = ConverterConfig {
            sample_size: 1000,
            downsample_factor: 3,
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::IndivisibleSampleSize {
                sample_size: 1000,
                factor: 3
            })
        );
    }

    #[test]
    fn test_zero_values_rejected() {
        let zero_size = ConverterConfig {
            sample_size: 0,
            ..Default::default()
        };
        assert_eq!(zero_size.validate(), Err(ConfigError::ZeroSampleSize));

        let zero_factor = ConverterConfig {
            downsample_factor: 0,
            ..Default::default()
        };
        assert_eq!(zero_factor.validate(), Err(ConfigError::ZeroDownsampleFactor));

        let zero_dup = ConverterConfig {
            sink: ChannelConfig::new(0, EofPolicy::FailFast),
            ..Default::default()
        };
        assert_eq!(
            zero_dup.validate(),
            Err(ConfigError::ZeroDuplication { channel: "sink" })
        );
    }

    #[test]
    fn test_overflowing_overlap_rejected() {
        let config = ConverterConfig {
            overlap: usize::MAX / 4,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::SizeOverflow { .. })
        ));

        // 2 * overlap fits, but the input side adds sample_size on top
        let config = ConverterConfig {
            sample_size: 4,
            downsample_factor: 1,
            overlap: usize::MAX / 2,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::SizeOverflow { .. })
        ));

        let err = ConverterConfig::from_toml_str("overlap = 4611686018427387904").unwrap_err();
        assert!(matches!(err, ConfigError::SizeOverflow { .. }));
    }

    #[test]
    fn test_toml_overrides_and_defaults() {
        let config = ConverterConfig::from_toml_str(
            r#"
            sample_size = 8192
            overlap = 0
            window = "hann"
            normalization = { custom = 0.5 }

            [sink]
            duplication = 4
            "#,
        )
        .unwrap();

        assert_eq!(config.sample_size, 8192);
        assert_eq!(config.downsample_factor, 4);
        assert_eq!(config.overlap, 0);
        assert_eq!(config.window, WindowType::Hann);
        assert_eq!(config.normalization, Normalization::Custom(0.5));
        assert_eq!(config.sink, ChannelConfig::new(4, EofPolicy::FailFast));
        assert_eq!(config.source, ChannelConfig::new(2, EofPolicy::Retry));
    }

    #[test]
    fn test_toml_invalid_config_rejected() {
        let err = ConverterConfig::from_toml_str("sample_size = 1023").unwrap_err();
        assert!(matches!(err, ConfigError::IndivisibleSampleSize { .. }));

        let err = ConverterConfig::from_toml_str("window = \"kaiser\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "downsample_factor = 2\nnormalization = \"window-gain\"").unwrap();
        writeln!(file, "[source]\nduplication = 3\neof_policy = \"fail-fast\"").unwrap();

        let config = ConverterConfig::load(file.path()).unwrap();
        assert_eq!(config.downsample_factor, 2);
        assert_eq!(config.normalization, Normalization::WindowGain);
        assert_eq!(config.source.eof_policy, EofPolicy::FailFast);
        assert_eq!(config.source.duplication, 3);
    }

    #[test]
    fn test_load_missing_file() {
        let err = ConverterConfig::load("/nonexistent/catalyzer.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Read(_)));
    }
}
