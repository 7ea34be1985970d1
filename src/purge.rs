use image::RgbaImage;
use log::debug;
use rayon::prelude::*;

use crate::color::ColorMatcher;
use crate::image_utils::ERASED_ALPHA;

/// Erase every pixel whose color is within threshold of a seed color,
/// wherever it is in the image.
///
/// With `parallel` the rows are scanned on the rayon pool; each pixel is
/// independent so the result is identical to the sequential scan.
///
/// Returns the number of pixels erased.
pub fn global_purge(image: &mut RgbaImage, matcher: &ColorMatcher, parallel: bool) -> usize {
    let (width, height) = image.dimensions();
    let row_len = width as usize * 4;
    if row_len == 0 {
        return 0;
    }

    let removed: usize = if parallel {
        image
            .par_chunks_mut(row_len)
            .map(|row| purge_row(row, matcher))
            .sum()
    } else {
        image
            .chunks_mut(row_len)
            .map(|row| purge_row(row, matcher))
            .sum()
    };

    debug!(
        "Global purge erased {} of {} pixels ({} seed colors)",
        removed,
        width as usize * height as usize,
        matcher.colors().len()
    );

    removed
}

/// Clear alpha on matching pixels of one packed RGBA row
fn purge_row(row: &mut [u8], matcher: &ColorMatcher) -> usize {
    let mut removed = 0;
    for px in row.chunks_exact_mut(4) {
        if matcher.matches_rgb([px[0], px[1], px[2]]) {
            px[3] = ERASED_ALPHA;
            removed += 1;
        }
    }
    removed
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    const BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);
    const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);

    fn islands() -> RgbaImage {
        // Black border, white band, black island in the middle
        RgbaImage::from_fn(7, 7, |x, y| {
            let ring = x.min(y).min(6 - x).min(6 - y);
            if ring == 1 { WHITE } else { BLACK }
        })
    }

    #[test]
    fn purges_disconnected_matches() {
        let mut image = islands();
        let matcher = ColorMatcher::new([BLACK], 0.0).unwrap();
        let removed = global_purge(&mut image, &matcher, false);
        // 24 border + 9 island
        assert_eq!(removed, 33);
        assert_eq!(image.get_pixel(3, 3)[3], 0);
        assert_eq!(image.get_pixel(1, 1)[3], 255);
    }

    #[test]
    fn parallel_matches_sequential() {
        let source = RgbaImage::from_fn(33, 17, |x, y| {
            Rgba([(x * 7 % 256) as u8, (y * 13 % 256) as u8, ((x + y) % 256) as u8, 255])
        });
        let matcher = ColorMatcher::new([Rgba([70, 130, 20, 255])], 90.0).unwrap();

        let mut seq = source.clone();
        let mut par = source;
        let removed_seq = global_purge(&mut seq, &matcher, false);
        let removed_par = global_purge(&mut par, &matcher, true);

        assert_eq!(removed_seq, removed_par);
        assert_eq!(seq, par);
    }

    #[test]
    fn keeps_rgb_of_erased_pixels() {
        let mut image = RgbaImage::from_pixel(2, 2, Rgba([5, 6, 7, 255]));
        let matcher = ColorMatcher::new([Rgba([5, 6, 7, 255])], 0.0).unwrap();
        global_purge(&mut image, &matcher, true);
        assert!(image.pixels().all(|p| *p == Rgba([5, 6, 7, 0])));
    }

    #[test]
    fn zero_width_image_purges_nothing() {
        let matcher = ColorMatcher::new([BLACK], 0.0).unwrap();
        let mut image = RgbaImage::new(0, 5);
        assert_eq!(global_purge(&mut image, &matcher, true), 0);
        assert_eq!(global_purge(&mut image, &matcher, false), 0);
    }
}
