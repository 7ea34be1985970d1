use image::{Rgba, RgbaImage};

pub const BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);
pub const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// Builds an image from rows of characters: '.' black, '#' white,
/// any other character a fixed gray.
pub fn from_ascii(rows: &[&str]) -> RgbaImage {
    assert!(!rows.is_empty(), "image needs at least one row");
    let width = rows[0].len() as u32;
    assert!(width > 0, "image needs at least one column");
    assert!(
        rows.iter().all(|r| r.len() as u32 == width),
        "all rows must have the same length"
    );

    RgbaImage::from_fn(width, rows.len() as u32, |x, y| {
        match rows[y as usize].as_bytes()[x as usize] {
            b'.' => BLACK,
            b'#' => WHITE,
            _ => Rgba([128, 128, 128, 255]),
        }
    })
}

/// Positions of transparent pixels, row-major
pub fn erased(image: &RgbaImage) -> Vec<(u32, u32)> {
    image
        .enumerate_pixels()
        .filter(|(_, _, p)| p[3] == 0)
        .map(|(x, y, _)| (x, y))
        .collect()
}

/// Black/white pattern from a repeating bit list, for property tests
pub fn two_tone(width: u32, height: u32, bits: &[bool]) -> RgbaImage {
    RgbaImage::from_fn(width, height, |x, y| {
        if bits[(y * width + x) as usize % bits.len()] {
            WHITE
        } else {
            BLACK
        }
    })
}
