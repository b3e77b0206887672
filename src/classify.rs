//! Region classification for sampled painting colors.
//!
//! Runs only during field construction. Two interchangeable strategies:
//! color-threshold heuristics over the sampled pixel, or lookup into
//! co-registered mask images. Both are total and deterministic.

use std::fmt;
use std::str::FromStr;

use image::RgbaImage;

use crate::params::HeuristicThresholds;

/// Painting region labels; each drives its own motion formula
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Region {
    /// Warm sky tones
    Sky,
    /// Blue water tones
    Water,
    /// Dark figure silhouettes
    Figure,
    /// Earthen hills
    Earth,
    /// Highlights
    Bright,
    /// Everything else
    Neutral,
}

impl Region {
    /// All labels in dispatch order
    pub const ALL: [Region; 6] = [
        Region::Sky,
        Region::Water,
        Region::Figure,
        Region::Earth,
        Region::Bright,
        Region::Neutral,
    ];
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Region::Sky => "sky",
            Region::Water => "water",
            Region::Figure => "figure",
            Region::Earth => "earth",
            Region::Bright => "bright",
            Region::Neutral => "neutral",
        };
        f.write_str(name)
    }
}

impl FromStr for Region {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "sky" => Ok(Region::Sky),
            "water" => Ok(Region::Water),
            "figure" => Ok(Region::Figure),
            "earth" | "hills" => Ok(Region::Earth),
            "bright" => Ok(Region::Bright),
            "neutral" => Ok(Region::Neutral),
            other => Err(format!("unknown region '{}'", other)),
        }
    }
}

/// 8-bit RGBA color sampled from an image
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8 {
    pub fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Mean of the r/g/b channels
    pub fn brightness(&self) -> u8 {
        ((self.r as u16 + self.g as u16 + self.b as u16) / 3) as u8
    }

    /// Channels as 0-1 floats
    pub fn to_f32(&self) -> [f32; 4] {
        [
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
            self.a as f32 / 255.0,
        ]
    }
}

impl From<image::Rgba<u8>> for Rgba8 {
    fn from(px: image::Rgba<u8>) -> Self {
        Self::new(px.0[0], px.0[1], px.0[2], px.0[3])
    }
}

/// Region classifier strategy, selectable per run
pub enum RegionClassifier {
    /// Pure color-threshold tests on the sampled pixel
    Heuristic(HeuristicThresholds),
    /// Ordered lookup into precomputed mask images
    Masks(MaskClassifier),
}

impl RegionClassifier {
    /// Classify a sampled color at a pixel coordinate.
    ///
    /// Total and deterministic: identical input always yields the same label.
    pub fn classify(&self, color: Rgba8, x: u32, y: u32) -> Region {
        match self {
            RegionClassifier::Heuristic(thresholds) => Self::classify_color(thresholds, color),
            RegionClassifier::Masks(masks) => masks.classify(x, y),
        }
    }

    pub fn is_heuristic(&self) -> bool {
        matches!(self, RegionClassifier::Heuristic(_))
    }

    /// Ordered threshold tests; first match wins, neutral is the fallback
    fn classify_color(t: &HeuristicThresholds, c: Rgba8) -> Region {
        let (r, g, b) = (c.r as i32, c.g as i32, c.b as i32);
        let brightness = c.brightness() as i32;

        if r >= t.warm_red_floor as i32 && r > b + t.warm_red_margin as i32 && g > b {
            return Region::Sky;
        }
        if b >= t.water_blue_floor as i32 && b > r + t.water_blue_margin as i32 && b >= g {
            return Region::Water;
        }
        if brightness < t.figure_brightness_max as i32 {
            return Region::Figure;
        }
        if r > g && g > b && brightness < t.earth_brightness_max as i32 {
            return Region::Earth;
        }
        if brightness > t.bright_brightness_min as i32 {
            return Region::Bright;
        }
        Region::Neutral
    }
}

/// One mask layer: membership image plus the label it assigns
pub struct MaskLayer {
    pub region: Region,
    pub image: RgbaImage,
    /// Mask sample brightness above this counts as membership (0-255)
    pub brightness_min: u8,
}

/// Mask-lookup classifier. Layers are checked in order; the first whose
/// sample exceeds its brightness threshold wins.
pub struct MaskClassifier {
    layers: Vec<MaskLayer>,
    default_region: Region,
}

impl MaskClassifier {
    pub fn new(layers: Vec<MaskLayer>, default_region: Region) -> Self {
        Self {
            layers,
            default_region,
        }
    }

    /// Label for a pixel coordinate. A coordinate outside a layer's bounds
    /// is not a member of that layer; when no layer matches, the configured
    /// default applies.
    fn classify(&self, x: u32, y: u32) -> Region {
        for layer in &self.layers {
            if x >= layer.image.width() || y >= layer.image.height() {
                continue;
            }
            let sample = Rgba8::from(*layer.image.get_pixel(x, y));
            if sample.brightness() > layer.brightness_min {
                return layer.region;
            }
        }
        self.default_region
    }
}
