//! Session lifecycle and the per-frame driver.
//!
//! A session owns the point fields, the motion resolver, and the running
//! state (phase, fade volume, rng). Each frame it either composes the
//! dimmed idle prompt or pulls one feature snapshot and animates the
//! whole field from it.

use glam::Vec2;
use rand::rngs::SmallRng;
use tracing::info;

use crate::audio::{FeatureExtractor, FrameFeatures, SpectrumSource};
use crate::field::PointField;
use crate::motion::{DrawPoint, MotionResolver};
use crate::params::SessionParams;

/// Lifecycle of one viewing session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Dimmed still field; audio and analysis stay untouched
    Idle,
    /// Audio playing, field animating
    Active,
}

/// Per-frame draw lists, reused across frames to avoid reallocation
#[derive(Default)]
pub struct FrameSketch {
    pub field: Vec<DrawPoint>,
    pub overlay: Vec<DrawPoint>,
}

/// One viewing session: fields, resolver, and running state
pub struct Session {
    field: PointField,
    overlay: Option<PointField>,
    resolver: MotionResolver,
    params: SessionParams,
    state: SessionState,
    phase: f32,
    volume: f32,
    rng: SmallRng,
}

impl Session {
    pub fn new(
        field: PointField,
        overlay: Option<PointField>,
        resolver: MotionResolver,
        params: SessionParams,
        rng: SmallRng,
    ) -> Self {
        Self {
            field,
            overlay,
            resolver,
            params,
            state: SessionState::Idle,
            phase: 0.0,
            volume: 0.0,
            rng,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Phase accumulator (radians); advances only on active ticks
    pub fn phase(&self) -> f32 {
        self.phase
    }

    /// Current fade-in volume (0-1); the caller mirrors this into the
    /// audio gain
    pub fn volume(&self) -> f32 {
        self.volume
    }

    /// Enter the active state. No-op when already active.
    pub fn begin(&mut self) {
        if self.state != SessionState::Active {
            self.state = SessionState::Active;
            self.volume = 0.0;
            info!("Session active");
        }
    }

    /// Flip between idle and active, returning the new state. The
    /// active-to-idle direction is a full reset.
    pub fn toggle(&mut self) -> SessionState {
        match self.state {
            SessionState::Idle => self.begin(),
            SessionState::Active => self.reset(),
        }
        self.state
    }

    /// Return to a cold idle: phase and volume back to zero, every
    /// tremble stilled
    pub fn reset(&mut self) {
        self.state = SessionState::Idle;
        self.phase = 0.0;
        self.volume = 0.0;
        for point in self.field.points.iter_mut() {
            point.tremble = Vec2::ZERO;
        }
        if let Some(overlay) = self.overlay.as_mut() {
            for point in overlay.points.iter_mut() {
                point.tremble = Vec2::ZERO;
            }
        }
        info!("Session reset");
    }

    /// Compose one frame into the sketch.
    ///
    /// Idle frames never touch the source or the extractor and repeat
    /// bit for bit. Active frames pull exactly one reading, advance the
    /// fade and the phase accumulator, and resolve every point from the
    /// same feature snapshot.
    pub fn tick(
        &mut self,
        source: &impl SpectrumSource,
        extractor: &FeatureExtractor,
        sketch: &mut FrameSketch,
    ) {
        match self.state {
            SessionState::Idle => self.compose_idle(sketch),
            SessionState::Active => {
                let features = extractor.extract(&source.reading());

                self.volume = (self.volume + self.params.fade_step).min(self.params.fade_target);

                let phase_params = &self.resolver.params().phase;
                self.phase += phase_params.base_step + features.bands.low * phase_params.low_boost;

                self.compose_active(&features, sketch);
            }
        }
    }

    fn compose_idle(&self, sketch: &mut FrameSketch) {
        let dim = self.params.idle_dim;

        sketch.field.clear();
        for point in &self.field.points {
            sketch.field.push(self.resolver.rest(point, dim));
        }

        sketch.overlay.clear();
        if let Some(overlay) = &self.overlay {
            for point in &overlay.points {
                sketch.overlay.push(self.resolver.rest(point, dim));
            }
        }
    }

    fn compose_active(&mut self, features: &FrameFeatures, sketch: &mut FrameSketch) {
        let resolver = &self.resolver;
        let rng = &mut self.rng;
        let phase = self.phase;

        sketch.field.clear();
        let center = self.field.center;
        for point in self.field.points.iter_mut() {
            sketch
                .field
                .push(resolver.resolve(point, features, phase, center, rng));
        }

        sketch.overlay.clear();
        if let Some(overlay) = self.overlay.as_mut() {
            let center = overlay.center;
            for point in overlay.points.iter_mut() {
                sketch
                    .overlay
                    .push(resolver.resolve(point, features, phase, center, rng));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::RawReading;
    use crate::classify::{Region, Rgba8};
    use crate::field::FieldPoint;
    use crate::params::{AudioParams, MotionParams};
    use rand::SeedableRng;
    use std::cell::Cell;

    struct StubSource {
        reading: RawReading,
        calls: Cell<u32>,
    }

    impl StubSource {
        fn silent() -> Self {
            Self {
                reading: RawReading::default(),
                calls: Cell::new(0),
            }
        }

        fn with_bands(bands: [f32; 3]) -> Self {
            Self {
                reading: RawReading { level: 0.1, bands },
                calls: Cell::new(0),
            }
        }
    }

    impl SpectrumSource for StubSource {
        fn reading(&self) -> RawReading {
            self.calls.set(self.calls.get() + 1);
            self.reading
        }
    }

    fn small_field() -> PointField {
        let points = vec![
            FieldPoint::new(
                Vec2::new(10.0, 10.0),
                Rgba8::new(220, 140, 60, 255),
                Region::Sky,
            ),
            FieldPoint::new(
                Vec2::new(20.0, 30.0),
                Rgba8::new(40, 80, 160, 255),
                Region::Water,
            ),
            FieldPoint::new(
                Vec2::new(40.0, 40.0),
                Rgba8::new(40, 40, 40, 255),
                Region::Figure,
            ),
        ];
        PointField {
            points,
            width: 60,
            height: 60,
            center: Vec2::new(30.0, 30.0),
        }
    }

    fn session() -> Session {
        Session::new(
            small_field(),
            None,
            MotionResolver::new(MotionParams::default()),
            SessionParams::default(),
            SmallRng::seed_from_u64(7),
        )
    }

    fn extractor() -> FeatureExtractor {
        FeatureExtractor::new(AudioParams::default()).unwrap()
    }

    #[test]
    fn idle_frames_repeat_and_never_touch_audio() {
        let mut session = session();
        let source = StubSource::with_bands([255.0; 3]);
        let extractor = extractor();

        let mut first = FrameSketch::default();
        let mut second = FrameSketch::default();
        session.tick(&source, &extractor, &mut first);
        session.tick(&source, &extractor, &mut second);

        assert_eq!(source.calls.get(), 0);
        assert!(!first.field.is_empty());
        assert_eq!(first.field, second.field);
        assert_eq!(session.phase(), 0.0);
        assert_eq!(session.volume(), 0.0);
    }

    #[test]
    fn idle_frames_leave_point_state_alone() {
        let mut session = session();
        session.field.points[0].tremble = Vec2::new(1.5, -2.0);
        let source = StubSource::silent();
        let extractor = extractor();
        let mut sketch = FrameSketch::default();

        session.tick(&source, &extractor, &mut sketch);

        assert_eq!(session.field.points[0].tremble, Vec2::new(1.5, -2.0));
    }

    #[test]
    fn idle_dims_the_field() {
        let mut session = session();
        let source = StubSource::silent();
        let extractor = extractor();
        let mut sketch = FrameSketch::default();

        session.tick(&source, &extractor, &mut sketch);

        let base = session.field.points[0].color.to_f32();
        let dim = session.params.idle_dim;
        assert!((sketch.field[0].color[0] - base[0] * dim).abs() < 1e-6);
        assert_eq!(sketch.field[0].position, session.field.points[0].position);
    }

    #[test]
    fn toggle_flips_and_begin_is_idempotent() {
        let mut session = session();
        assert_eq!(session.state(), SessionState::Idle);

        assert_eq!(session.toggle(), SessionState::Active);
        assert_eq!(session.toggle(), SessionState::Idle);

        session.begin();
        assert_eq!(session.state(), SessionState::Active);
        session.begin();
        assert_eq!(session.state(), SessionState::Active);
    }

    #[test]
    fn toggle_out_returns_to_a_cold_idle() {
        let mut session = session();
        session.begin();
        let source = StubSource::with_bands([255.0; 3]);
        let extractor = extractor();
        let mut sketch = FrameSketch::default();

        for _ in 0..30 {
            session.tick(&source, &extractor, &mut sketch);
        }
        assert!(session.phase() > 0.0);
        assert!(session
            .field
            .points
            .iter()
            .any(|p| p.tremble != Vec2::ZERO));

        assert_eq!(session.toggle(), SessionState::Idle);

        assert_eq!(session.phase(), 0.0);
        assert_eq!(session.volume(), 0.0);
        assert!(session
            .field
            .points
            .iter()
            .all(|p| p.tremble == Vec2::ZERO));
    }

    #[test]
    fn active_ticks_advance_phase_by_the_low_band() {
        let mut session = session();
        session.begin();
        // 127.5 normalizes to exactly 0.5
        let source = StubSource::with_bands([127.5, 0.0, 0.0]);
        let extractor = extractor();
        let mut sketch = FrameSketch::default();

        session.tick(&source, &extractor, &mut sketch);
        assert_eq!(source.calls.get(), 1);
        let expected = 0.02f32 + 0.5 * 0.05;
        assert!((session.phase() - expected).abs() < 1e-6);

        session.tick(&source, &extractor, &mut sketch);
        assert!((session.phase() - 2.0 * expected).abs() < 1e-6);
    }

    #[test]
    fn fade_saturates_at_the_target() {
        let mut session = session();
        session.begin();
        let source = StubSource::silent();
        let extractor = extractor();
        let mut sketch = FrameSketch::default();

        session.tick(&source, &extractor, &mut sketch);
        assert!((session.volume() - session.params.fade_step).abs() < 1e-6);

        for _ in 0..200 {
            session.tick(&source, &extractor, &mut sketch);
        }
        assert_eq!(session.volume(), session.params.fade_target);
    }

    #[test]
    fn active_sketch_covers_every_point() {
        let mut session = session();
        session.begin();
        let source = StubSource::silent();
        let extractor = extractor();
        let mut sketch = FrameSketch::default();

        session.tick(&source, &extractor, &mut sketch);

        assert_eq!(sketch.field.len(), session.field.points.len());
        assert!(sketch.overlay.is_empty());
    }

    #[test]
    fn overlay_composes_alongside_the_field() {
        let mut session = Session::new(
            small_field(),
            Some(small_field()),
            MotionResolver::new(MotionParams::default()),
            SessionParams::default(),
            SmallRng::seed_from_u64(3),
        );
        session.begin();
        let source = StubSource::silent();
        let extractor = extractor();
        let mut sketch = FrameSketch::default();

        session.tick(&source, &extractor, &mut sketch);
        assert_eq!(sketch.overlay.len(), 3);
    }

    #[test]
    fn reset_returns_to_a_cold_idle() {
        let mut session = session();
        session.begin();
        let source = StubSource::with_bands([255.0; 3]);
        let extractor = extractor();
        let mut sketch = FrameSketch::default();

        for _ in 0..10 {
            session.tick(&source, &extractor, &mut sketch);
        }
        assert!(session.phase() > 0.0);
        assert!(session
            .field
            .points
            .iter()
            .any(|p| p.tremble != Vec2::ZERO));

        session.reset();

        assert_eq!(session.state(), SessionState::Idle);
        assert_eq!(session.phase(), 0.0);
        assert_eq!(session.volume(), 0.0);
        assert!(session
            .field
            .points
            .iter()
            .all(|p| p.tremble == Vec2::ZERO));
    }
}
