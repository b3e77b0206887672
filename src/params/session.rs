//! Session pacing configuration.

/// Fade-in and idle presentation parameters
#[derive(Debug, Clone)]
pub struct SessionParams {
    /// Volume ramp per frame while fading in (gain units, 0-1)
    pub fade_step: f32,

    /// Fade-in ceiling (output gain, 0-1)
    pub fade_target: f32,

    /// Brightness factor applied to the idle resting prompt (0-1)
    pub idle_dim: f32,
}

impl Default for SessionParams {
    fn default() -> Self {
        Self {
            fade_step: 0.01,
            fade_target: 1.0,
            idle_dim: 0.35,
        }
    }
}
