//! Per-region motion constants, color shift, and smoothing parameters.

/// Sky sway: coupled sine/cosine driven by the high band
#[derive(Debug, Clone)]
pub struct SkyMotion {
    /// Spatial frequency of the sway (radians per pixel)
    pub spatial_freq: f32,

    /// Temporal frequency applied to the phase accumulator
    pub temporal_freq: f32,

    /// Peak sway amplitude at unit band drive (pixels)
    pub amplitude_px: f32,
}

impl Default for SkyMotion {
    fn default() -> Self {
        Self {
            spatial_freq: 0.045,
            temporal_freq: 1.6,
            amplitude_px: 2.6,
        }
    }
}

/// Water ripple: horizontal-biased, driven by the mid band
#[derive(Debug, Clone)]
pub struct WaterMotion {
    /// Spatial frequency of the ripple (radians per pixel)
    pub spatial_freq: f32,

    /// Temporal frequency applied to the phase accumulator
    pub temporal_freq: f32,

    /// Peak horizontal amplitude at unit band drive (pixels)
    pub amplitude_px: f32,

    /// Vertical amplitude as a fraction of horizontal (< 1 keeps the
    /// ripple horizontal-biased)
    pub vertical_ratio: f32,
}

impl Default for WaterMotion {
    fn default() -> Self {
        Self {
            spatial_freq: 0.08,
            temporal_freq: 2.2,
            amplitude_px: 2.2,
            vertical_ratio: 0.35,
        }
    }
}

/// Figure motion: slow low-band distortion plus a fast high-band pulse
#[derive(Debug, Clone)]
pub struct FigureMotion {
    /// Distortion spatial frequency (radians per pixel)
    pub distort_spatial_freq: f32,

    /// Distortion temporal frequency
    pub distort_temporal_freq: f32,

    /// Distortion amplitude at unit low-band drive (pixels)
    pub distort_amplitude_px: f32,

    /// Pulse spatial frequency (radians per pixel)
    pub pulse_spatial_freq: f32,

    /// Pulse temporal frequency (faster than the distortion layer)
    pub pulse_temporal_freq: f32,

    /// Pulse amplitude at unit high-band drive (pixels)
    pub pulse_amplitude_px: f32,

    /// High band's share of the figure size drive (low band counts fully)
    pub size_high_weight: f32,
}

impl Default for FigureMotion {
    fn default() -> Self {
        Self {
            distort_spatial_freq: 0.06,
            distort_temporal_freq: 1.2,
            distort_amplitude_px: 2.8,
            pulse_spatial_freq: 0.02,
            pulse_temporal_freq: 4.5,
            pulse_amplitude_px: 1.4,
            size_high_weight: 0.5,
        }
    }
}

/// Earth roll: long-wavelength sine/cosine driven by the low band
#[derive(Debug, Clone)]
pub struct EarthMotion {
    /// Spatial frequency of the roll (radians per pixel; much lower than
    /// the sky sway so hills move as long slow waves)
    pub spatial_freq: f32,

    /// Temporal frequency applied to the phase accumulator
    pub temporal_freq: f32,

    /// Peak roll amplitude at unit band drive (pixels)
    pub amplitude_px: f32,

    /// Vertical amplitude as a fraction of horizontal
    pub vertical_ratio: f32,
}

impl Default for EarthMotion {
    fn default() -> Self {
        Self {
            spatial_freq: 0.012,
            temporal_freq: 0.9,
            amplitude_px: 2.0,
            vertical_ratio: 0.6,
        }
    }
}

/// Bright highlights: radial push from the field center plus shimmer
#[derive(Debug, Clone)]
pub struct BrightMotion {
    /// Peak radial push at unit band drive (pixels)
    pub push_amplitude_px: f32,

    /// Mid band's share of the radial drive (high band counts fully)
    pub mid_weight: f32,

    /// Shimmer spatial frequency (radians per pixel)
    pub jitter_spatial_freq: f32,

    /// Shimmer temporal frequency
    pub jitter_temporal_freq: f32,

    /// Shimmer amplitude (pixels)
    pub jitter_amplitude_px: f32,
}

impl Default for BrightMotion {
    fn default() -> Self {
        Self {
            push_amplitude_px: 3.2,
            mid_weight: 0.5,
            jitter_spatial_freq: 0.09,
            jitter_temporal_freq: 3.0,
            jitter_amplitude_px: 0.8,
        }
    }
}

/// Neutral ambience: small time-only shimmer, no band coupling
#[derive(Debug, Clone)]
pub struct NeutralMotion {
    /// Shimmer spatial frequency (radians per pixel)
    pub spatial_freq: f32,

    /// Shimmer temporal frequency
    pub temporal_freq: f32,

    /// Shimmer amplitude (pixels)
    pub amplitude_px: f32,

    /// Scales the loudness multiplier into a 0-1 size drive
    pub size_energy_scale: f32,
}

impl Default for NeutralMotion {
    fn default() -> Self {
        Self {
            spatial_freq: 0.07,
            temporal_freq: 1.0,
            amplitude_px: 0.5,
            size_energy_scale: 0.25,
        }
    }
}

/// Warm color shift on high-band energy (heuristic classifier runs only)
#[derive(Debug, Clone)]
pub struct WarmShift {
    /// Disabled on mask-classified runs, where colors stay literal
    pub enabled: bool,

    /// High-band level where the shift begins (normalized)
    pub threshold: f32,

    /// Knee of the piecewise ramp: band level at the segment break
    pub knee_level: f32,

    /// Blend fraction reached at the knee (full blend only at band 1.0)
    pub knee_blend: f32,

    /// Warm target color (full red, reduced green/blue)
    pub target: [u8; 3],
}

impl Default for WarmShift {
    fn default() -> Self {
        Self {
            enabled: true,
            threshold: 0.15,
            knee_level: 0.5,
            knee_blend: 0.35,
            target: [255, 80, 36],
        }
    }
}

/// Smoothed random displacement tracking musical intensity
#[derive(Debug, Clone)]
pub struct TrembleParams {
    /// Peak random offset per axis at full surge (pixels)
    pub max_offset_px: f32,

    /// Exponential smoothing factor toward the target per frame (0-1)
    pub smoothing: f32,

    /// Surge range mapped onto the 0-1 tremble drive
    /// (surge 1.0 → no tremble, 1.0 + span → full reach)
    pub surge_span: f32,
}

impl Default for TrembleParams {
    fn default() -> Self {
        Self {
            max_offset_px: 6.0,
            smoothing: 0.1,
            surge_span: 1.5,
        }
    }
}

/// Time accumulator pacing
#[derive(Debug, Clone)]
pub struct PhaseParams {
    /// Phase advance per frame in silence (radians)
    pub base_step: f32,

    /// Additional advance per unit low-band energy (radians)
    pub low_boost: f32,
}

impl Default for PhaseParams {
    fn default() -> Self {
        Self {
            base_step: 0.02,
            low_boost: 0.05,
        }
    }
}

/// Point size law
#[derive(Debug, Clone)]
pub struct SizeParams {
    /// Diameter with no audio drive (pixels)
    pub base_px: f32,

    /// Diameter added per unit driving-band energy (pixels)
    pub gain_px: f32,
}

impl Default for SizeParams {
    fn default() -> Self {
        Self {
            base_px: 2.2,
            gain_px: 2.6,
        }
    }
}

/// All motion/color resolution parameters
#[derive(Debug, Clone, Default)]
pub struct MotionParams {
    pub sky: SkyMotion,
    pub water: WaterMotion,
    pub figure: FigureMotion,
    pub earth: EarthMotion,
    pub bright: BrightMotion,
    pub neutral: NeutralMotion,
    pub warm_shift: WarmShift,
    pub tremble: TrembleParams,
    pub phase: PhaseParams,
    pub size: SizeParams,
}
