//! Region classifier thresholds.

/// Thresholds for the color-heuristic classifier.
///
/// Tests run in a fixed priority order (warm, water, figure, earth, bright);
/// the first match wins and anything unmatched is neutral. Brightness is the
/// mean of the r/g/b channels.
#[derive(Debug, Clone)]
pub struct HeuristicThresholds {
    /// Minimum red channel for the warm test (0-255)
    pub warm_red_floor: u8,

    /// Red must exceed blue by this margin for the warm test
    pub warm_red_margin: u8,

    /// Minimum blue channel for the water test (0-255)
    pub water_blue_floor: u8,

    /// Blue must exceed red by this margin for the water test
    pub water_blue_margin: u8,

    /// Brightness below this reads as a dark figure (0-255)
    pub figure_brightness_max: u8,

    /// Brightness ceiling for the earth channel-order test (0-255)
    pub earth_brightness_max: u8,

    /// Brightness above this reads as a highlight (0-255)
    pub bright_brightness_min: u8,
}

impl Default for HeuristicThresholds {
    fn default() -> Self {
        Self {
            warm_red_floor: 150,
            warm_red_margin: 40,
            water_blue_floor: 90,
            water_blue_margin: 20,
            figure_brightness_max: 70,
            earth_brightness_max: 160,
            bright_brightness_min: 200,
        }
    }
}

/// Mask-lookup classifier parameters
#[derive(Debug, Clone)]
pub struct MaskParams {
    /// Mask sample brightness above this counts as membership (0-255)
    pub brightness_min: u8,
}

impl Default for MaskParams {
    fn default() -> Self {
        Self { brightness_min: 128 }
    }
}
