use image::Rgba;

use crate::errors::{FloodfillError, Result};
use crate::image_utils::rgb_of;

/// Lower bound of the threshold range
pub const MIN_THRESHOLD: f64 = 0.0;

/// Upper bound of the threshold range
pub const MAX_THRESHOLD: f64 = 441.0;

/// sqrt(3 * 255^2), the distance between black and white
pub const MAX_COLOR_DISTANCE: f64 = 441.672_955_930_063_7;

/// Squared Euclidean distance over R, G and B
#[inline]
pub fn distance_squared(a: [u8; 3], b: [u8; 3]) -> u32 {
    a.iter()
        .zip(b.iter())
        .map(|(&ca, &cb)| {
            let d = ca as i32 - cb as i32;
            (d * d) as u32
        })
        .sum()
}

/// Euclidean distance between two pixels. Alpha is ignored.
pub fn color_distance(a: &Rgba<u8>, b: &Rgba<u8>) -> f64 {
    (distance_squared(rgb_of(a), rgb_of(b)) as f64).sqrt()
}

/// Reject thresholds outside [0, 441] (NaN included)
pub fn validate_threshold(threshold: f64) -> Result<f64> {
    if (MIN_THRESHOLD..=MAX_THRESHOLD).contains(&threshold) {
        Ok(threshold)
    } else {
        Err(FloodfillError::ThresholdOutOfRange(threshold))
    }
}

/// Decides whether a pixel is background-like: within `threshold` of at
/// least one seed color.
///
/// Both region growth and global purge classify through this type, so the
/// two modes can never disagree about a single pixel.
#[derive(Debug, Clone)]
pub struct ColorMatcher {
    colors: Vec<[u8; 3]>,
    limit_sq: f64,
}

impl ColorMatcher {
    /// Build a matcher from seed colors. Duplicate colors are collapsed,
    /// first occurrence wins the position.
    pub fn new<I>(seed_colors: I, threshold: f64) -> Result<Self>
    where
        I: IntoIterator<Item = Rgba<u8>>,
    {
        let threshold = validate_threshold(threshold)?;

        let mut colors: Vec<[u8; 3]> = Vec::new();
        for color in seed_colors {
            let rgb = rgb_of(&color);
            if !colors.contains(&rgb) {
                colors.push(rgb);
            }
        }

        // The top of the range covers the whole RGB cube
        let limit_sq = if threshold >= MAX_THRESHOLD {
            f64::INFINITY
        } else {
            threshold * threshold
        };

        Ok(Self { colors, limit_sq })
    }

    /// Distinct seed colors in first-seen order
    pub fn colors(&self) -> &[[u8; 3]] {
        &self.colors
    }

    #[inline]
    pub fn matches_rgb(&self, rgb: [u8; 3]) -> bool {
        self.colors
            .iter()
            .any(|&seed| distance_squared(seed, rgb) as f64 <= self.limit_sq)
    }

    #[inline]
    pub fn matches(&self, pixel: &Rgba<u8>) -> bool {
        self.matches_rgb(rgb_of(pixel))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;
    use proptest::prelude::*;

    #[test]
    fn black_to_white_is_max_distance() {
        let black = Rgba([0, 0, 0, 255]);
        let white = Rgba([255, 255, 255, 255]);
        assert_approx_eq!(color_distance(&black, &white), MAX_COLOR_DISTANCE, 1e-9);
    }

    #[test]
    fn alpha_does_not_contribute() {
        let opaque = Rgba([12, 34, 56, 255]);
        let clear = Rgba([12, 34, 56, 0]);
        assert_eq!(color_distance(&opaque, &clear), 0.0);
    }

    #[test]
    fn single_channel_difference() {
        let a = Rgba([100, 0, 0, 255]);
        let b = Rgba([103, 4, 0, 255]);
        assert_approx_eq!(color_distance(&a, &b), 5.0, 1e-12);
    }

    #[test]
    fn threshold_range_is_enforced() {
        assert!(validate_threshold(0.0).is_ok());
        assert!(validate_threshold(441.0).is_ok());
        assert!(matches!(
            validate_threshold(-0.5),
            Err(FloodfillError::ThresholdOutOfRange(_))
        ));
        assert!(validate_threshold(441.5).is_err());
        assert!(validate_threshold(f64::NAN).is_err());
    }

    #[test]
    fn matcher_boundary_is_inclusive() {
        let matcher = ColorMatcher::new([Rgba([100, 0, 0, 255])], 5.0).unwrap();
        assert!(matcher.matches(&Rgba([103, 4, 0, 255])));
        assert!(!matcher.matches(&Rgba([104, 4, 0, 255])));
    }

    #[test]
    fn matcher_collapses_duplicate_colors() {
        let seeds = [
            Rgba([1, 2, 3, 255]),
            Rgba([1, 2, 3, 0]),
            Rgba([9, 9, 9, 255]),
        ];
        let matcher = ColorMatcher::new(seeds, 0.0).unwrap();
        assert_eq!(matcher.colors(), &[[1, 2, 3], [9, 9, 9]]);
    }

    #[test]
    fn max_threshold_matches_opposite_corner() {
        let matcher = ColorMatcher::new([Rgba([0, 0, 0, 255])], MAX_THRESHOLD).unwrap();
        assert!(matcher.matches(&Rgba([255, 255, 255, 255])));
    }

    proptest! {
        #[test]
        fn distance_is_symmetric(a in any::<[u8; 4]>(), b in any::<[u8; 4]>()) {
            let (a, b) = (Rgba(a), Rgba(b));
            prop_assert_eq!(color_distance(&a, &b), color_distance(&b, &a));
        }

        #[test]
        fn distance_to_self_is_zero(c in any::<[u8; 4]>()) {
            let c = Rgba(c);
            prop_assert_eq!(color_distance(&c, &c), 0.0);
        }

        #[test]
        fn distance_stays_in_range(a in any::<[u8; 4]>(), b in any::<[u8; 4]>()) {
            let d = color_distance(&Rgba(a), &Rgba(b));
            prop_assert!(d >= 0.0 && d <= MAX_COLOR_DISTANCE + 1e-9);
        }
    }
}
