//! Command-line argument parsing.

use std::path::PathBuf;

use clap::Parser;
use tracing::warn;

use crate::classify::Region;
use crate::params::OverlayPlacement;

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "Tremolo")]
#[command(about = "Audio-reactive point rendition of a painting", long_about = None)]
pub struct Args {
    /// Painting to re-render as animated points
    #[arg(long, value_name = "PATH")]
    pub image: PathBuf,

    /// WAV file driving the animation
    #[arg(long, value_name = "PATH")]
    pub audio: PathBuf,

    /// Optional figure overlay image drawn on top of the field
    #[arg(long, value_name = "PATH")]
    pub overlay: Option<PathBuf>,

    /// Region mask as REGION:PATH (repeatable; listed order is priority)
    #[arg(long = "mask", value_name = "REGION:PATH")]
    pub masks: Vec<String>,

    /// Region for points no mask claims
    #[arg(long, value_name = "REGION", default_value = "neutral")]
    pub default_region: String,

    /// Grid spacing between sampled points (pixels)
    #[arg(long, value_name = "PIXELS", default_value = "6")]
    pub spacing: f32,

    /// Seed for reproducible point placement
    #[arg(long, value_name = "SEED")]
    pub seed: Option<u64>,

    /// Overlay scale factor
    #[arg(long, value_name = "FACTOR", default_value = "1")]
    pub overlay_scale: f32,

    /// Overlay rotation (degrees)
    #[arg(long, value_name = "DEGREES", default_value = "0")]
    pub overlay_rotation: f32,

    /// Overlay offset as X,Y (pixels)
    #[arg(long, value_name = "X,Y", default_value = "0,0")]
    pub overlay_offset: String,
}

impl Args {
    /// Parse --mask rules, keeping the listed order as mask priority
    pub fn parse_masks(&self) -> Vec<(Region, PathBuf)> {
        let mut rules = Vec::new();
        for raw in &self.masks {
            match raw.split_once(':') {
                Some((region, path)) if !path.is_empty() => match region.parse::<Region>() {
                    Ok(region) => rules.push((region, PathBuf::from(path))),
                    Err(e) => warn!("Skipping mask '{}': {}", raw, e),
                },
                _ => warn!("Skipping mask '{}': expected REGION:PATH", raw),
            }
        }
        rules
    }

    /// Region assigned where no mask claims a point
    pub fn parse_default_region(&self) -> Region {
        match self.default_region.parse() {
            Ok(region) => region,
            Err(e) => {
                warn!("{}; using neutral", e);
                Region::Neutral
            }
        }
    }

    /// Overlay placement from the scale, rotation, and offset flags
    pub fn parse_overlay_placement(&self) -> OverlayPlacement {
        OverlayPlacement {
            scale: self.overlay_scale,
            rotation_rad: self.overlay_rotation.to_radians(),
            offset: parse_offset(&self.overlay_offset),
        }
    }
}

fn parse_offset(raw: &str) -> [f32; 2] {
    if let Some((x, y)) = raw.split_once(',') {
        if let (Ok(x), Ok(y)) = (x.trim().parse(), y.trim().parse()) {
            return [x, y];
        }
    }
    warn!("Invalid offset '{}', using 0,0", raw);
    [0.0, 0.0]
}
