//! Parameter definitions with units and documented semantics.
//!
//! All manually tuned constants live here with:
//! - Units (pixels, radians, Hz, etc.)
//! - Documented ranges and meanings
//! - `Default` impls carrying the tuned values

mod audio;
mod classify;
mod field;
mod motion;
mod render;
mod session;

// Re-export all types
pub use audio::{AnalyzerConfig, AudioParams};
pub use classify::{HeuristicThresholds, MaskParams};
pub use field::{FieldParams, OverlayPlacement};
pub use motion::{
    BrightMotion, EarthMotion, FigureMotion, MotionParams, NeutralMotion, PhaseParams, SizeParams,
    SkyMotion, TrembleParams, WarmShift, WaterMotion,
};
pub use render::RenderConfig;
pub use session::SessionParams;
