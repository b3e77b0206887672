//! Point field construction: a jittered sampling grid over a painting.

use glam::Vec2;
use image::RgbaImage;
use rand::rngs::SmallRng;
use rand::Rng;

use crate::classify::{Region, RegionClassifier, Rgba8};
use crate::error::TremoloResult;
use crate::params::FieldParams;

/// One animated point sampled from the painting
#[derive(Debug, Clone)]
pub struct FieldPoint {
    /// Resting position (image-space pixels); immutable after construction
    pub position: Vec2,

    /// Color sampled at construction; immutable
    pub color: Rgba8,

    /// Region label driving the motion formula; immutable
    pub region: Region,

    /// Smoothed random displacement carried across frames; the only
    /// mutable per-point state
    pub tremble: Vec2,
}

impl FieldPoint {
    pub fn new(position: Vec2, color: Rgba8, region: Region) -> Self {
        Self {
            position,
            color,
            region,
            tremble: Vec2::ZERO,
        }
    }
}

/// The full set of points sampled from one image
pub struct PointField {
    /// Points in sampling order (row-major over the grid)
    pub points: Vec<FieldPoint>,

    /// Source image width (pixels)
    pub width: u32,

    /// Source image height (pixels)
    pub height: u32,

    /// Field center, used by radial motion terms
    pub center: Vec2,
}

impl PointField {
    /// Sample a jittered grid over the image and classify every survivor.
    ///
    /// Each grid cell draws uniform jitter in ±jitter per axis, clamps the
    /// jittered coordinate into the image bounds, samples the pixel at the
    /// truncated coordinate, applies the optional alpha filter, and emits a
    /// point with zero tremble. Jitter comes from the injected rng, so a
    /// seeded rng reproduces the exact same field.
    pub fn build(
        image: &RgbaImage,
        params: &FieldParams,
        classifier: &RegionClassifier,
        rng: &mut SmallRng,
    ) -> TremoloResult<Self> {
        params.validate()?;

        let (width, height) = image.dimensions();
        let jitter = params.jitter();
        let max_x = (width - 1) as f32;
        let max_y = (height - 1) as f32;
        let mut points = Vec::new();

        let mut y = 0.0f32;
        while y < height as f32 {
            let mut x = 0.0f32;
            while x < width as f32 {
                // Always draw both axes so seeded builds are reproducible
                // regardless of the visibility filter.
                let jx: f32 = rng.random_range(-jitter..=jitter);
                let jy: f32 = rng.random_range(-jitter..=jitter);

                let sx = (x + jx).clamp(0.0, max_x);
                let sy = (y + jy).clamp(0.0, max_y);

                let color = Rgba8::from(*image.get_pixel(sx as u32, sy as u32));

                let visible = match params.min_alpha {
                    Some(min_alpha) => color.a > min_alpha,
                    None => true,
                };
                if visible {
                    let region = classifier.classify(color, sx as u32, sy as u32);
                    points.push(FieldPoint::new(Vec2::new(sx, sy), color, region));
                }

                x += params.spacing_px;
            }
            y += params.spacing_px;
        }

        Ok(Self {
            points,
            width,
            height,
            center: Vec2::new(width as f32 / 2.0, height as f32 / 2.0),
        })
    }

    /// Count points per region, in label order
    pub fn region_counts(&self) -> Vec<(Region, usize)> {
        Region::ALL
            .iter()
            .map(|&region| {
                let count = self.points.iter().filter(|p| p.region == region).count();
                (region, count)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::HeuristicThresholds;
    use rand::SeedableRng;

    fn heuristic() -> RegionClassifier {
        RegionClassifier::Heuristic(HeuristicThresholds::default())
    }

    fn flat_image(width: u32, height: u32, color: [u8; 4]) -> RgbaImage {
        RgbaImage::from_pixel(width, height, image::Rgba(color))
    }

    #[test]
    fn point_count_matches_grid_bound() {
        let image = flat_image(300, 200, [120, 120, 120, 255]);
        let params = FieldParams {
            spacing_px: 3.0,
            ..FieldParams::default()
        };
        let mut rng = SmallRng::seed_from_u64(7);

        let field = PointField::build(&image, &params, &heuristic(), &mut rng).unwrap();

        // ⌈300/3⌉ × ⌈200/3⌉ cells, none filtered
        assert_eq!(field.points.len(), 100 * 67);
        assert!(field.points.len() <= 6700);
    }

    #[test]
    fn samples_stay_inside_image_bounds() {
        let image = flat_image(64, 48, [200, 80, 40, 255]);
        let params = FieldParams {
            spacing_px: 5.0,
            jitter_px: Some(50.0), // far beyond the spacing, forces clamping
            ..FieldParams::default()
        };
        let mut rng = SmallRng::seed_from_u64(99);

        let field = PointField::build(&image, &params, &heuristic(), &mut rng).unwrap();

        assert!(!field.points.is_empty());
        for point in &field.points {
            assert!(point.position.x >= 0.0 && point.position.x <= 63.0);
            assert!(point.position.y >= 0.0 && point.position.y <= 47.0);
        }
    }

    #[test]
    fn seeded_builds_are_reproducible() {
        let image = flat_image(80, 60, [40, 80, 160, 255]);
        let params = FieldParams::default();

        let mut rng_a = SmallRng::seed_from_u64(42);
        let mut rng_b = SmallRng::seed_from_u64(42);
        let field_a = PointField::build(&image, &params, &heuristic(), &mut rng_a).unwrap();
        let field_b = PointField::build(&image, &params, &heuristic(), &mut rng_b).unwrap();

        assert_eq!(field_a.points.len(), field_b.points.len());
        for (a, b) in field_a.points.iter().zip(&field_b.points) {
            assert_eq!(a.position, b.position);
            assert_eq!(a.region, b.region);
        }
    }

    #[test]
    fn alpha_filter_skips_transparent_cells() {
        let image = flat_image(30, 30, [100, 100, 100, 0]);
        let params = FieldParams {
            spacing_px: 3.0,
            min_alpha: Some(8),
            ..FieldParams::default()
        };
        let mut rng = SmallRng::seed_from_u64(1);

        let field = PointField::build(&image, &params, &heuristic(), &mut rng).unwrap();
        assert!(field.points.is_empty());
    }

    #[test]
    fn new_points_start_at_rest() {
        let image = flat_image(20, 20, [40, 40, 40, 255]);
        let mut rng = SmallRng::seed_from_u64(5);

        let field =
            PointField::build(&image, &FieldParams::default(), &heuristic(), &mut rng).unwrap();

        assert!(field.points.iter().all(|p| p.tremble == Vec2::ZERO));
        assert!(field.points.iter().all(|p| p.region == Region::Figure));
        assert_eq!(field.center, Vec2::new(10.0, 10.0));
    }

    #[test]
    fn region_counts_cover_the_field() {
        let image = flat_image(30, 30, [220, 140, 60, 255]);
        let mut rng = SmallRng::seed_from_u64(11);
        let field =
            PointField::build(&image, &FieldParams::default(), &heuristic(), &mut rng).unwrap();

        let counts = field.region_counts();
        let total: usize = counts.iter().map(|(_, n)| n).sum();
        assert_eq!(total, field.points.len());
        assert_eq!(counts[0], (Region::Sky, field.points.len()));
    }
}
