//! Rendering configuration.

/// Rendering configuration
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Background clear color (linear RGBA, 0-1)
    pub clear_color: [f64; 4],

    /// Extra scale applied to every point's diameter (dimensionless)
    pub point_scale: f32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            clear_color: [0.02, 0.02, 0.03, 1.0],
            point_scale: 1.0,
        }
    }
}
