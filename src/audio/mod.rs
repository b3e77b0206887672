//! Audio playback, spectrum analysis, and per-frame feature extraction.

mod analysis;
mod features;
mod system;
mod wav;

pub use features::FeatureExtractor;
pub use system::AudioSystem;
pub use wav::WavAudio;

pub(crate) use features::remap;

/// Normalized frequency band energies (0-1 per band)
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BandEnergies {
    /// Bass (roughly 20-200 Hz)
    pub low: f32,
    /// Mids (roughly 200-1000 Hz)
    pub mid: f32,
    /// Highs (roughly 1000-4000 Hz)
    pub high: f32,
}

impl BandEnergies {
    /// Mean of the three bands
    pub fn mean(&self) -> f32 {
        (self.low + self.mid + self.high) / 3.0
    }
}

/// One analyzer snapshot in native units: RMS loudness (nominal 0-0.2)
/// plus band magnitudes on an 8-bit scale (0-255)
#[derive(Debug, Clone, Copy, Default)]
pub struct RawReading {
    pub level: f32,
    pub bands: [f32; 3],
}

/// Per-frame features broadcast identically to every point
#[derive(Debug, Clone, Copy)]
pub struct FrameFeatures {
    /// Loudness multiplier applied to every region offset (0.8-4.0)
    pub energy: f32,

    /// Normalized band energies
    pub bands: BandEnergies,

    /// Surge multiplier for climactic passages; exactly 1.0 below the
    /// high-energy threshold, up to 2.5 when every band saturates
    pub surge: f32,
}

/// Source of analyzer snapshots.
///
/// Implementations copy current state and never block the frame loop.
pub trait SpectrumSource {
    fn reading(&self) -> RawReading;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn band_mean_averages_all_three() {
        let bands = BandEnergies {
            low: 0.3,
            mid: 0.6,
            high: 0.9,
        };
        assert!((bands.mean() - 0.6).abs() < 1e-6);
        assert_eq!(BandEnergies::default().mean(), 0.0);
    }
}
