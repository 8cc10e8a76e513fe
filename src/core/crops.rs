//! Crop rectangles around scanpath points.
//!
//! Used by front-ends that show the image patch under each fixation. Only the
//! pixel geometry is computed here; no image data is touched.

use crate::error::{require_positive, FixationError};
use serde::{Deserialize, Serialize};

/// Pixel rectangle `[x1, x2) × [y1, y2)` clamped to the image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CropRegion {
    pub x1: i64,
    pub y1: i64,
    pub x2: i64,
    pub y2: i64,
}

impl CropRegion {
    pub fn width(&self) -> i64 {
        (self.x2 - self.x1).max(0)
    }

    pub fn height(&self) -> i64 {
        (self.y2 - self.y1).max(0)
    }

    /// True when clamping left nothing of the region.
    pub fn is_empty(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }
}

/// One crop region per scanpath point.
///
/// Each region spans `field_of_view / 2` pixels (integer division) on every
/// side of the point. Edges are truncated toward zero and then clamped to
/// `[0, image_width] × [0, image_height]`.
pub fn crop_regions(
    avg_x: &[f64],
    avg_y: &[f64],
    field_of_view: u32,
    image_width: u32,
    image_height: u32,
) -> Result<Vec<CropRegion>, FixationError> {
    if avg_x.len() != avg_y.len() {
        return Err(FixationError::length_mismatch(
            "avg_x",
            avg_x.len(),
            "avg_y",
            avg_y.len(),
        ));
    }
    require_positive("field_of_view", field_of_view as f64)?;
    require_positive("image_width", image_width as f64)?;
    require_positive("image_height", image_height as f64)?;

    let half = (field_of_view / 2) as f64;
    let width = image_width as i64;
    let height = image_height as i64;

    Ok(avg_x
        .iter()
        .zip(avg_y.iter())
        .map(|(&fx, &fy)| CropRegion {
            x1: ((fx - half) as i64).max(0),
            x2: ((fx + half) as i64).min(width),
            y1: ((fy - half) as i64).max(0),
            y2: ((fy + half) as i64).min(height),
        })
        .collect())
}
