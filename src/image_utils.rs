use image::Rgba;

/// Alpha value written to erased pixels
pub const ERASED_ALPHA: u8 = 0;

/// Up, left, right, down
pub const FOUR_WAY_OFFSETS: [(i32, i32); 4] = [(0, -1), (-1, 0), (1, 0), (0, 1)];

/// The four orthogonal offsets followed by the four diagonals
pub const EIGHT_WAY_OFFSETS: [(i32, i32); 8] = [
    (0, -1),
    (-1, 0),
    (1, 0),
    (0, 1),
    (-1, -1),
    (1, -1),
    (-1, 1),
    (1, 1),
];

/// Check if a pixel has any opacity at all
#[inline]
pub fn is_visible(pixel: &Rgba<u8>) -> bool {
    pixel[3] > 0
}

/// RGB channels of a pixel (alpha dropped)
#[inline]
pub fn rgb_of(pixel: &Rgba<u8>) -> [u8; 3] {
    [pixel[0], pixel[1], pixel[2]]
}

/// Make a pixel transparent without touching its color channels
#[inline]
pub fn erase(pixel: &mut Rgba<u8>) {
    pixel[3] = ERASED_ALPHA;
}

/// Check if a point is inside the image bounds
#[inline]
pub fn in_bounds(x: i32, y: i32, width: u32, height: u32) -> bool {
    x >= 0 && y >= 0 && (x as u32) < width && (y as u32) < height
}
