//! Point field sampling configuration.

use crate::error::{TremoloError, TremoloResult};

/// Point field sampling parameters
#[derive(Debug, Clone)]
pub struct FieldParams {
    /// Grid spacing between sample cells (pixels)
    ///
    /// Dominant density control: halving it roughly quadruples the point
    /// count and the per-frame work.
    pub spacing_px: f32,

    /// Max jitter applied per axis when sampling (pixels, uniform in ±this).
    /// `None` uses spacing_px / 3.
    pub jitter_px: Option<f32>,

    /// Skip samples whose alpha is at or below this value (0-255).
    /// `None` keeps every sample.
    pub min_alpha: Option<u8>,
}

impl Default for FieldParams {
    fn default() -> Self {
        Self {
            spacing_px: 6.0,
            jitter_px: None,
            min_alpha: None,
        }
    }
}

impl FieldParams {
    /// Effective jitter magnitude (pixels)
    pub fn jitter(&self) -> f32 {
        self.jitter_px.unwrap_or(self.spacing_px / 3.0)
    }

    /// Validate sampling parameters
    pub fn validate(&self) -> TremoloResult<()> {
        if !(self.spacing_px > 0.0) {
            return Err(TremoloError::config(format!(
                "spacing must be > 0, got {}",
                self.spacing_px
            )));
        }
        if self.jitter() < 0.0 {
            return Err(TremoloError::config(format!(
                "jitter must be >= 0, got {}",
                self.jitter()
            )));
        }
        Ok(())
    }
}

/// Placement of the overlay field above the main field
#[derive(Debug, Clone)]
pub struct OverlayPlacement {
    /// Uniform scale applied to overlay coordinates
    pub scale: f32,

    /// Rotation about the overlay origin (radians)
    pub rotation_rad: f32,

    /// Translation applied after scale and rotation (pixels)
    pub offset: [f32; 2],
}

impl Default for OverlayPlacement {
    fn default() -> Self {
        Self {
            scale: 1.0,
            rotation_rad: 0.0,
            offset: [0.0, 0.0],
        }
    }
}
