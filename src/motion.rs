//! Per-region motion and color resolution.
//!
//! One pure-ish function per frame per point: region label picks the
//! displacement formula, the band energies drive it, and the loudness and
//! surge multipliers scale it. The only side effect is the point's
//! smoothed tremble state.

use glam::Vec2;
use rand::rngs::SmallRng;
use rand::Rng;

use crate::audio::{remap, FrameFeatures};
use crate::classify::Region;
use crate::field::FieldPoint;
use crate::params::{
    BrightMotion, EarthMotion, FigureMotion, MotionParams, NeutralMotion, SkyMotion, WarmShift,
    WaterMotion,
};

/// One resolved point, ready to draw
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawPoint {
    /// Final position (image-space pixels)
    pub position: Vec2,

    /// Final color (linear 0-1 RGBA)
    pub color: [f32; 4],

    /// Final diameter (pixels)
    pub size: f32,
}

/// Resolves position, color, and size for every point each frame
pub struct MotionResolver {
    params: MotionParams,
}

impl MotionResolver {
    pub fn new(params: MotionParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &MotionParams {
        &self.params
    }

    /// A point at rest: base position, dimmed color, base size.
    /// Used for the idle prompt; touches no state.
    pub fn rest(&self, point: &FieldPoint, dim: f32) -> DrawPoint {
        let c = point.color.to_f32();
        DrawPoint {
            position: point.position,
            color: [c[0] * dim, c[1] * dim, c[2] * dim, c[3]],
            size: self.params.size.base_px,
        }
    }

    /// Resolve one point for an active frame, updating its tremble state.
    ///
    /// position = base + region offset × energy × surge + tremble
    /// size     = (base + driving band × gain) × surge
    pub fn resolve(
        &self,
        point: &mut FieldPoint,
        features: &FrameFeatures,
        phase: f32,
        center: Vec2,
        rng: &mut SmallRng,
    ) -> DrawPoint {
        let offset = self.region_offset(point, features, phase, center);
        self.update_tremble(point, features.surge, rng);

        let position = point.position + offset * features.energy * features.surge + point.tremble;

        let driving = self.driving_level(point.region, features);
        let size = (self.params.size.base_px + driving * self.params.size.gain_px) * features.surge;

        let color = self.resolve_color(point, features.bands.high);

        DrawPoint {
            position,
            color,
            size,
        }
    }

    fn region_offset(
        &self,
        point: &FieldPoint,
        features: &FrameFeatures,
        phase: f32,
        center: Vec2,
    ) -> Vec2 {
        let pos = point.position;
        let bands = features.bands;
        match point.region {
            Region::Sky => Self::sky_offset(&self.params.sky, pos, bands.high, phase),
            Region::Water => Self::water_offset(&self.params.water, pos, bands.mid, phase),
            Region::Figure => {
                Self::figure_offset(&self.params.figure, pos, bands.low, bands.high, phase)
            }
            Region::Earth => Self::earth_offset(&self.params.earth, pos, bands.low, phase),
            Region::Bright => {
                Self::bright_offset(&self.params.bright, pos, center, bands.high, bands.mid, phase)
            }
            Region::Neutral => Self::neutral_offset(&self.params.neutral, pos, phase),
        }
    }

    /// Sky sways in a coupled sine/cosine spiral keyed on the cross axis
    fn sky_offset(p: &SkyMotion, pos: Vec2, high: f32, phase: f32) -> Vec2 {
        let t = phase * p.temporal_freq;
        Vec2::new(
            (pos.y * p.spatial_freq + t).sin(),
            (pos.x * p.spatial_freq + t).cos(),
        ) * (p.amplitude_px * high)
    }

    /// Water ripples horizontally with a damped vertical component
    fn water_offset(p: &WaterMotion, pos: Vec2, mid: f32, phase: f32) -> Vec2 {
        let t = phase * p.temporal_freq;
        Vec2::new(
            (pos.y * p.spatial_freq + t).sin(),
            (pos.x * p.spatial_freq + t).sin() * p.vertical_ratio,
        ) * (p.amplitude_px * mid)
    }

    /// Figure distorts slowly with the low band and pulses with the high
    /// band; both terms land on both axes, the mid band plays no part
    fn figure_offset(p: &FigureMotion, pos: Vec2, low: f32, high: f32, phase: f32) -> Vec2 {
        let slow = phase * p.distort_temporal_freq;
        let distort = Vec2::new(
            (pos.y * p.distort_spatial_freq + slow).sin(),
            (pos.x * p.distort_spatial_freq + slow).cos(),
        ) * (p.distort_amplitude_px * low);

        let fast = phase * p.pulse_temporal_freq;
        let pulse = Vec2::new(
            (fast + pos.x * p.pulse_spatial_freq).sin(),
            (fast + pos.y * p.pulse_spatial_freq).cos(),
        ) * (p.pulse_amplitude_px * high);

        distort + pulse
    }

    /// Earth rolls in long slow waves keyed on the horizontal position
    fn earth_offset(p: &EarthMotion, pos: Vec2, low: f32, phase: f32) -> Vec2 {
        let t = phase * p.temporal_freq;
        Vec2::new(
            (pos.x * p.spatial_freq + t).sin(),
            (pos.x * p.spatial_freq + t).cos() * p.vertical_ratio,
        ) * (p.amplitude_px * low)
    }

    /// Bright highlights push outward from the field center and shimmer
    fn bright_offset(
        p: &BrightMotion,
        pos: Vec2,
        center: Vec2,
        high: f32,
        mid: f32,
        phase: f32,
    ) -> Vec2 {
        let radial = pos - center;
        let dir = if radial.length_squared() > f32::EPSILON {
            radial.normalize()
        } else {
            Vec2::ZERO
        };
        let push = dir * ((high + mid * p.mid_weight) * p.push_amplitude_px);

        let t = phase * p.jitter_temporal_freq;
        let jitter = Vec2::new(
            (t + pos.x * p.jitter_spatial_freq).sin(),
            (t + pos.y * p.jitter_spatial_freq).cos(),
        ) * p.jitter_amplitude_px;

        push + jitter
    }

    /// Neutral points carry only a small time-driven shimmer
    fn neutral_offset(p: &NeutralMotion, pos: Vec2, phase: f32) -> Vec2 {
        let t = phase * p.temporal_freq;
        Vec2::new(
            (t + pos.x * p.spatial_freq).sin(),
            (t + pos.y * p.spatial_freq).cos(),
        ) * p.amplitude_px
    }

    fn driving_level(&self, region: Region, features: &FrameFeatures) -> f32 {
        let bands = features.bands;
        match region {
            Region::Sky | Region::Bright => bands.high,
            Region::Water => bands.mid,
            Region::Figure => bands.low + bands.high * self.params.figure.size_high_weight,
            Region::Earth => bands.low,
            Region::Neutral => features.energy * self.params.neutral.size_energy_scale,
        }
    }

    /// Draw a fresh tremble target scaled by the surge drive and smooth
    /// the stored state toward it. The rng is consumed every call so
    /// seeded runs stay reproducible frame for frame.
    fn update_tremble(&self, point: &mut FieldPoint, surge: f32, rng: &mut SmallRng) {
        let p = &self.params.tremble;
        let drive = ((surge - 1.0) / p.surge_span).clamp(0.0, 1.0);
        let reach = p.max_offset_px * drive;

        let target = Vec2::new(
            rng.random_range(-1.0..=1.0),
            rng.random_range(-1.0..=1.0),
        ) * reach;

        point.tremble += (target - point.tremble) * p.smoothing;
    }

    fn resolve_color(&self, point: &FieldPoint, high: f32) -> [f32; 4] {
        let base = point.color.to_f32();
        let w = &self.params.warm_shift;
        if !w.enabled {
            return base;
        }
        let blend = warm_blend(w, high);
        if blend <= 0.0 {
            return base;
        }

        let target = [
            w.target[0] as f32 / 255.0,
            w.target[1] as f32 / 255.0,
            w.target[2] as f32 / 255.0,
        ];
        [
            base[0] + (target[0] - base[0]) * blend,
            base[1] + (target[1] - base[1]) * blend,
            base[2] + (target[2] - base[2]) * blend,
            base[3],
        ]
    }
}

/// Piecewise-linear warm blend: zero through the threshold, ramping to
/// the knee blend at the knee level, full only when the band saturates
fn warm_blend(w: &WarmShift, high: f32) -> f32 {
    if high <= w.threshold {
        0.0
    } else if high <= w.knee_level {
        remap(high, w.threshold, w.knee_level, 0.0, w.knee_blend)
    } else {
        remap(high, w.knee_level, 1.0, w.knee_blend, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::BandEnergies;
    use crate::classify::Rgba8;
    use rand::SeedableRng;

    fn resolver() -> MotionResolver {
        MotionResolver::new(MotionParams::default())
    }

    fn features(low: f32, mid: f32, high: f32) -> FrameFeatures {
        FrameFeatures {
            energy: 1.0,
            bands: BandEnergies { low, mid, high },
            surge: 1.0,
        }
    }

    fn point_at(x: f32, y: f32, region: Region) -> FieldPoint {
        FieldPoint::new(Vec2::new(x, y), Rgba8::new(40, 40, 40, 255), region)
    }

    #[test]
    fn figure_ignores_the_mid_band() {
        let r = resolver();
        let point = point_at(37.0, 81.0, Region::Figure);

        let quiet = r.region_offset(&point, &features(0.0, 0.0, 0.0), 2.0, Vec2::ZERO);
        let mid_only = r.region_offset(&point, &features(0.0, 1.0, 0.0), 2.0, Vec2::ZERO);

        assert_eq!(quiet, Vec2::ZERO);
        assert_eq!(mid_only, Vec2::ZERO);
    }

    #[test]
    fn figure_sums_low_and_high_terms_on_both_axes() {
        let r = resolver();
        let point = point_at(37.0, 81.0, Region::Figure);
        let phase = 2.0;

        let low_only = r.region_offset(&point, &features(0.6, 0.0, 0.0), phase, Vec2::ZERO);
        let high_only = r.region_offset(&point, &features(0.0, 0.0, 0.9), phase, Vec2::ZERO);
        let both = r.region_offset(&point, &features(0.6, 0.0, 0.9), phase, Vec2::ZERO);

        assert!(low_only.x != 0.0 && low_only.y != 0.0);
        assert!(high_only.x != 0.0 && high_only.y != 0.0);
        assert!((both.x - (low_only.x + high_only.x)).abs() < 1e-6);
        assert!((both.y - (low_only.y + high_only.y)).abs() < 1e-6);
    }

    #[test]
    fn band_silence_stills_band_driven_regions() {
        let r = resolver();
        let silent = features(0.0, 0.0, 0.0);
        for region in [Region::Sky, Region::Water, Region::Earth] {
            let point = point_at(20.0, 30.0, region);
            assert_eq!(
                r.region_offset(&point, &silent, 5.0, Vec2::new(50.0, 50.0)),
                Vec2::ZERO
            );
        }
    }

    #[test]
    fn bright_pushes_away_from_center() {
        let mut params = MotionParams::default();
        params.bright.jitter_amplitude_px = 0.0; // isolate the radial term
        let r = MotionResolver::new(params);

        let center = Vec2::new(100.0, 100.0);
        let point = point_at(150.0, 100.0, Region::Bright);
        let offset = r.region_offset(&point, &features(0.0, 0.0, 1.0), 0.0, center);

        assert!(offset.x > 0.0);
        assert!(offset.y.abs() < 1e-6);
    }

    #[test]
    fn neutral_shimmer_ignores_bands() {
        let r = resolver();
        let point = point_at(10.0, 10.0, Region::Neutral);

        let quiet = r.region_offset(&point, &features(0.0, 0.0, 0.0), 1.0, Vec2::ZERO);
        let loud = r.region_offset(&point, &features(1.0, 1.0, 1.0), 1.0, Vec2::ZERO);
        assert_eq!(quiet, loud);
    }

    #[test]
    fn tremble_decays_to_zero_without_surge() {
        let r = resolver();
        let mut point = point_at(0.0, 0.0, Region::Figure);
        point.tremble = Vec2::new(4.0, -4.0);
        let mut rng = SmallRng::seed_from_u64(3);

        let mut last = point.tremble.length();
        for _ in 0..50 {
            r.update_tremble(&mut point, 1.0, &mut rng);
            let len = point.tremble.length();
            assert!(len <= last);
            last = len;
        }
        assert!(last < 0.05);
    }

    #[test]
    fn tremble_stays_within_the_surge_reach() {
        let r = resolver();
        let mut point = point_at(0.0, 0.0, Region::Figure);
        let mut rng = SmallRng::seed_from_u64(9);
        let max = r.params().tremble.max_offset_px;

        for _ in 0..200 {
            r.update_tremble(&mut point, 2.5, &mut rng);
            assert!(point.tremble.x.abs() <= max);
            assert!(point.tremble.y.abs() <= max);
        }
        // With full surge the tremble actually moves
        assert!(point.tremble != Vec2::ZERO);
    }

    #[test]
    fn still_point_resolves_to_its_base() {
        let r = resolver();
        let mut point = point_at(12.0, 34.0, Region::Figure);
        let mut rng = SmallRng::seed_from_u64(1);

        let draw = r.resolve(&mut point, &features(0.0, 0.0, 0.0), 3.0, Vec2::ZERO, &mut rng);

        assert_eq!(draw.position, point.position);
        assert_eq!(draw.size, r.params().size.base_px);
    }

    #[test]
    fn surge_scales_size() {
        let r = resolver();
        let mut point = point_at(0.0, 0.0, Region::Sky);
        let mut rng = SmallRng::seed_from_u64(1);

        let mut surged = features(0.0, 0.0, 1.0);
        surged.surge = 2.0;
        let draw = r.resolve(&mut point, &surged, 0.0, Vec2::ZERO, &mut rng);

        let p = r.params();
        let expected = (p.size.base_px + 1.0 * p.size.gain_px) * 2.0;
        assert!((draw.size - expected).abs() < 1e-6);
    }

    #[test]
    fn warm_blend_is_piecewise_and_saturates_only_at_full_band() {
        let w = WarmShift::default();

        assert_eq!(warm_blend(&w, 0.0), 0.0);
        assert_eq!(warm_blend(&w, 0.15), 0.0);

        let below_knee = warm_blend(&w, 0.49);
        let at_knee = warm_blend(&w, 0.5);
        let above_knee = warm_blend(&w, 0.51);
        assert!(below_knee < at_knee && at_knee < above_knee);
        assert!((at_knee - w.knee_blend).abs() < 1e-6);
        // Continuous across the knee
        assert!((above_knee - below_knee) < 0.05);

        assert!(warm_blend(&w, 0.99) < 1.0);
        assert_eq!(warm_blend(&w, 1.0), 1.0);
    }

    #[test]
    fn warm_shift_reddens_high_band_frames() {
        let r = resolver();
        let point = point_at(0.0, 0.0, Region::Water);

        let calm = r.resolve_color(&point, 0.1);
        assert_eq!(calm, point.color.to_f32());

        let hot = r.resolve_color(&point, 0.9);
        assert!(hot[0] > calm[0]); // toward full red
        assert_eq!(hot[3], calm[3]); // alpha untouched
    }

    #[test]
    fn warm_shift_stays_off_for_mask_runs() {
        let mut params = MotionParams::default();
        params.warm_shift.enabled = false;
        let r = MotionResolver::new(params);
        let point = point_at(0.0, 0.0, Region::Sky);

        assert_eq!(r.resolve_color(&point, 1.0), point.color.to_f32());
    }

    #[test]
    fn rest_dims_the_base_color() {
        let r = resolver();
        let point = point_at(5.0, 6.0, Region::Neutral);

        let draw = r.rest(&point, 0.5);
        let base = point.color.to_f32();
        assert_eq!(draw.position, point.position);
        assert!((draw.color[0] - base[0] * 0.5).abs() < 1e-6);
        assert_eq!(draw.color[3], base[3]);
    }
}
