//! Audio analysis configuration and feature-mapping ranges.

use std::ops::Range;

use crate::error::{TremoloError, TremoloResult};

/// Spectrum analyzer configuration with frequency band mappings
#[derive(Debug, Clone)]
pub struct AnalyzerConfig {
    /// Sample rate of the analyzed stream (Hz); overwritten with the
    /// output device's actual rate when the stream is built
    pub sample_rate_hz: usize,

    /// FFT window size (must be power of 2)
    pub fft_size: usize,

    /// Analysis interval (milliseconds)
    pub update_interval_ms: u64,

    /// Low band frequency range (Hz)
    pub low_range_hz: (f32, f32),

    /// Mid band frequency range (Hz)
    pub mid_range_hz: (f32, f32),

    /// High band frequency range (Hz)
    pub high_range_hz: (f32, f32),

    /// Scale from mean FFT magnitude to the 8-bit band energy range.
    /// Tuned so loud passages approach full scale (255).
    pub band_scale: f32,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            sample_rate_hz: 44100,
            fft_size: 1024,
            update_interval_ms: 50,
            low_range_hz: (20.0, 200.0),
            mid_range_hz: (200.0, 1000.0),
            high_range_hz: (1000.0, 4000.0),
            band_scale: 48.0,
        }
    }
}

impl AnalyzerConfig {
    /// Convert frequency (Hz) to FFT bin index
    pub fn hz_to_bin(&self, hz: f32) -> usize {
        ((hz * self.fft_size as f32) / self.sample_rate_hz as f32) as usize
    }

    /// Get FFT bin range for the low band
    pub fn low_bins(&self) -> Range<usize> {
        self.hz_to_bin(self.low_range_hz.0)..self.hz_to_bin(self.low_range_hz.1)
    }

    /// Get FFT bin range for the mid band
    pub fn mid_bins(&self) -> Range<usize> {
        self.hz_to_bin(self.mid_range_hz.0)..self.hz_to_bin(self.mid_range_hz.1)
    }

    /// Get FFT bin range for the high band
    pub fn high_bins(&self) -> Range<usize> {
        self.hz_to_bin(self.high_range_hz.0)..self.hz_to_bin(self.high_range_hz.1)
    }

    /// Validate configuration (FFT size must be power of 2, etc.)
    pub fn validate(&self) -> TremoloResult<()> {
        if !self.fft_size.is_power_of_two() {
            return Err(TremoloError::config(format!(
                "FFT size must be power of 2, got {}",
                self.fft_size
            )));
        }
        if self.sample_rate_hz == 0 {
            return Err(TremoloError::config("sample rate must be > 0"));
        }
        for (name, range) in [
            ("low", self.low_range_hz),
            ("mid", self.mid_range_hz),
            ("high", self.high_range_hz),
        ] {
            if range.0 >= range.1 {
                return Err(TremoloError::config(format!(
                    "{} band range must be ascending, got {:?}",
                    name, range
                )));
            }
        }
        Ok(())
    }
}

/// Mapping of raw analyzer readings into per-frame features
#[derive(Debug, Clone)]
pub struct AudioParams {
    /// Loudness input domain (analyzer RMS units); readings above the
    /// ceiling saturate rather than extrapolate
    pub level_in: (f32, f32),

    /// Loudness multiplier output interval applied to every region offset
    pub energy_out: (f32, f32),

    /// Band energy full scale on the analyzer's 8-bit range
    pub band_in_max: f32,

    /// Mean normalized band energy above which the surge multiplier engages
    pub surge_threshold: f32,

    /// Surge multiplier ceiling, reached when every band saturates
    pub surge_max: f32,
}

impl Default for AudioParams {
    fn default() -> Self {
        Self {
            level_in: (0.0, 0.2),
            energy_out: (0.8, 4.0),
            band_in_max: 255.0,
            surge_threshold: 0.7,
            surge_max: 2.5,
        }
    }
}

impl AudioParams {
    /// Validate mapping ranges
    pub fn validate(&self) -> TremoloResult<()> {
        if self.level_in.0 >= self.level_in.1 {
            return Err(TremoloError::config("loudness input domain must be ascending"));
        }
        if self.energy_out.0 > self.energy_out.1 {
            return Err(TremoloError::config("energy output interval must be ascending"));
        }
        if self.band_in_max <= 0.0 {
            return Err(TremoloError::config("band full scale must be > 0"));
        }
        if !(0.0..1.0).contains(&self.surge_threshold) {
            return Err(TremoloError::config(format!(
                "surge threshold must be in [0, 1), got {}",
                self.surge_threshold
            )));
        }
        if self.surge_max < 1.0 {
            return Err(TremoloError::config("surge ceiling must be >= 1"));
        }
        Ok(())
    }
}
