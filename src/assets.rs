//! Image loading for paintings and region masks.

use std::path::Path;

use image::RgbaImage;
use tracing::{info, warn};

use crate::error::{TremoloError, TremoloResult};

/// Load any supported image format as RGBA8
pub fn load_rgba(path: &Path) -> TremoloResult<RgbaImage> {
    let image = image::open(path)
        .map_err(|e| TremoloError::asset(format!("{}: {}", path.display(), e)))?
        .to_rgba8();
    info!(
        "Loaded image {:?}: {}x{}",
        path,
        image.width(),
        image.height()
    );
    Ok(image)
}

/// Load a region mask. A mask may be any size; coordinates outside it
/// fall through to the classifier default, so a mismatch is only worth
/// a warning.
pub fn load_mask(path: &Path, painting: (u32, u32)) -> TremoloResult<RgbaImage> {
    let mask = load_rgba(path)?;
    if mask.dimensions() != painting {
        warn!(
            "Mask {:?} is {}x{} but the painting is {}x{}; uncovered points use the default region",
            path,
            mask.width(),
            mask.height(),
            painting.0,
            painting.1
        );
    }
    Ok(mask)
}
