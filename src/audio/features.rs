//! Conversion of raw analyzer readings into per-frame features.

use super::{BandEnergies, FrameFeatures, RawReading};
use crate::error::TremoloResult;
use crate::params::AudioParams;

/// Converts one analyzer snapshot per frame into the feature set the
/// motion resolver consumes
pub struct FeatureExtractor {
    params: AudioParams,
}

impl FeatureExtractor {
    pub fn new(params: AudioParams) -> TremoloResult<Self> {
        params.validate()?;
        Ok(Self { params })
    }

    /// Extract features from a raw reading.
    ///
    /// Loudness maps linearly from the analyzer domain into the energy
    /// interval; each band maps independently onto 0-1; the surge
    /// multiplier engages only above the mean-band threshold. Every map
    /// clamps its input first, so spikes saturate instead of extrapolating.
    pub fn extract(&self, reading: &RawReading) -> FrameFeatures {
        let p = &self.params;

        let energy = remap(
            reading.level,
            p.level_in.0,
            p.level_in.1,
            p.energy_out.0,
            p.energy_out.1,
        );

        let bands = BandEnergies {
            low: remap(reading.bands[0], 0.0, p.band_in_max, 0.0, 1.0),
            mid: remap(reading.bands[1], 0.0, p.band_in_max, 0.0, 1.0),
            high: remap(reading.bands[2], 0.0, p.band_in_max, 0.0, 1.0),
        };

        let mean = bands.mean();
        let surge = if mean > p.surge_threshold {
            remap(mean, p.surge_threshold, 1.0, 1.0, p.surge_max)
        } else {
            1.0
        };

        FrameFeatures {
            energy,
            bands,
            surge,
        }
    }
}

/// Clamped linear remap from [in_lo, in_hi] onto [out_lo, out_hi]
pub(crate) fn remap(value: f32, in_lo: f32, in_hi: f32, out_lo: f32, out_hi: f32) -> f32 {
    let t = ((value - in_lo) / (in_hi - in_lo)).clamp(0.0, 1.0);
    out_lo + t * (out_hi - out_lo)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extractor() -> FeatureExtractor {
        FeatureExtractor::new(AudioParams::default()).unwrap()
    }

    fn reading(level: f32, bands: [f32; 3]) -> RawReading {
        RawReading { level, bands }
    }

    #[test]
    fn silence_maps_to_the_energy_floor() {
        let features = extractor().extract(&reading(0.0, [0.0; 3]));
        assert_eq!(features.energy, 0.8);
        assert_eq!(features.bands, BandEnergies::default());
        assert_eq!(features.surge, 1.0);
    }

    #[test]
    fn loudness_spikes_clamp_instead_of_extrapolating() {
        // 0.5 is well above the analyzer's nominal 0.2 ceiling
        let features = extractor().extract(&reading(0.5, [0.0; 3]));
        assert_eq!(features.energy, 4.0);
    }

    #[test]
    fn energy_is_monotonic_in_loudness() {
        let e = extractor();
        let mut last = 0.0f32;
        for step in 0..=100 {
            let level = step as f32 * 0.003; // sweeps past the domain ceiling
            let energy = e.extract(&reading(level, [0.0; 3])).energy;
            assert!(energy >= last);
            assert!((0.8..=4.0).contains(&energy));
            last = energy;
        }
    }

    #[test]
    fn band_normalization_hits_both_endpoints() {
        let e = extractor();
        let zero = e.extract(&reading(0.0, [0.0, 0.0, 0.0]));
        assert_eq!(zero.bands.low, 0.0);

        let full = e.extract(&reading(0.0, [255.0, 255.0, 255.0]));
        assert_eq!(full.bands.low, 1.0);
        assert_eq!(full.bands.mid, 1.0);
        assert_eq!(full.bands.high, 1.0);
    }

    #[test]
    fn saturated_bands_drive_full_surge() {
        let features = extractor().extract(&reading(0.0, [255.0; 3]));
        assert_eq!(features.surge, 2.5);
    }

    #[test]
    fn surge_is_exactly_one_at_or_below_threshold() {
        let e = extractor();
        // Mean of 0.7 exactly: all bands at 0.7 * 255
        let at = e.extract(&reading(0.0, [178.5; 3]));
        assert_eq!(at.surge, 1.0);

        let below = e.extract(&reading(0.0, [100.0; 3]));
        assert_eq!(below.surge, 1.0);
    }

    #[test]
    fn surge_is_monotonic_above_threshold() {
        let e = extractor();
        let mut last = 1.0f32;
        for step in 0..=60 {
            let value = 178.5 + step as f32 * 1.275; // mean sweeps 0.7 → 1.0
            let surge = e.extract(&reading(0.0, [value; 3])).surge;
            assert!(surge >= last);
            assert!((1.0..=2.5).contains(&surge));
            last = surge;
        }
    }

    #[test]
    fn remap_clamps_both_sides() {
        assert_eq!(remap(-1.0, 0.0, 1.0, 10.0, 20.0), 10.0);
        assert_eq!(remap(2.0, 0.0, 1.0, 10.0, 20.0), 20.0);
        assert_eq!(remap(0.5, 0.0, 1.0, 10.0, 20.0), 15.0);
    }
}
