use std::fmt;

use image::{imageops, RgbaImage};
use log::{debug, warn};

use crate::image_utils::is_visible;

/// Inclusive pixel bounds of the visible (alpha > 0) area
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundingBox {
    pub min_x: u32,
    pub min_y: u32,
    pub max_x: u32,
    pub max_y: u32,
}

impl BoundingBox {
    pub fn width(&self) -> u32 {
        self.max_x - self.min_x + 1
    }

    pub fn height(&self) -> u32 {
        self.max_y - self.min_y + 1
    }
}

impl fmt::Display for BoundingBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {}, {})", self.min_x, self.min_y, self.max_x, self.max_y)
    }
}

/// What the trim stage did to the image
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrimOutcome {
    /// Cropped to this box (possibly the full image)
    Cropped(BoundingBox),
    /// Nothing visible was left; the image is returned unchanged
    FullyTransparent,
}

/// Single pass over the image; `None` when every pixel is transparent
pub fn bounding_box(image: &RgbaImage) -> Option<BoundingBox> {
    let mut bbox: Option<BoundingBox> = None;

    for (x, y, pixel) in image.enumerate_pixels() {
        if !is_visible(pixel) {
            continue;
        }
        bbox = Some(match bbox {
            None => BoundingBox { min_x: x, min_y: y, max_x: x, max_y: y },
            Some(b) => BoundingBox {
                min_x: b.min_x.min(x),
                min_y: b.min_y.min(y),
                max_x: b.max_x.max(x),
                max_y: b.max_y.max(y),
            },
        });
    }

    bbox
}

/// Crop away fully transparent borders.
///
/// A fully transparent image is not an error: it comes back untouched
/// together with `TrimOutcome::FullyTransparent`.
pub fn trim_transparent(image: RgbaImage) -> (RgbaImage, TrimOutcome) {
    let Some(bbox) = bounding_box(&image) else {
        warn!(
            "Image is fully transparent, nothing to trim ({}x{})",
            image.width(),
            image.height()
        );
        return (image, TrimOutcome::FullyTransparent);
    };

    if bbox.width() == image.width() && bbox.height() == image.height() {
        debug!("Trim: no transparent border");
        return (image, TrimOutcome::Cropped(bbox));
    }

    let cropped =
        imageops::crop_imm(&image, bbox.min_x, bbox.min_y, bbox.width(), bbox.height()).to_image();
    debug!(
        "Trim: {}x{} -> {}x{} at {}",
        image.width(),
        image.height(),
        cropped.width(),
        cropped.height(),
        bbox
    );

    (cropped, TrimOutcome::Cropped(bbox))
}
