use std::collections::VecDeque;

use image::RgbaImage;
use log::debug;

use crate::color::ColorMatcher;
use crate::image_utils::{erase, in_bounds, EIGHT_WAY_OFFSETS, FOUR_WAY_OFFSETS};
use crate::seeds::ResolvedSeed;

/// Which neighbors a flood may step to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Connectivity {
    /// Up, down, left, right
    #[default]
    Four,
    /// Orthogonal plus diagonal neighbors
    Eight,
}

impl Connectivity {
    pub fn from_eight_way(eight_way: bool) -> Self {
        if eight_way {
            Connectivity::Eight
        } else {
            Connectivity::Four
        }
    }

    pub fn offsets(self) -> &'static [(i32, i32)] {
        match self {
            Connectivity::Four => &FOUR_WAY_OFFSETS,
            Connectivity::Eight => &EIGHT_WAY_OFFSETS,
        }
    }
}

/// Erase every pixel connected to a seed through background-like pixels.
///
/// Multi-source BFS seeded with all seed positions at once. Each pixel is
/// tested at most once; a pixel that fails the color test is kept and the
/// flood does not continue through it. Erasing only clears alpha, so the
/// RGB test for later pixels sees the same colors regardless of order.
///
/// Returns the number of pixels erased.
pub fn flood_fill_remove(
    image: &mut RgbaImage,
    seeds: &[ResolvedSeed],
    matcher: &ColorMatcher,
    connectivity: Connectivity,
) -> usize {
    let (width, height) = image.dimensions();
    let index = |x: u32, y: u32| y as usize * width as usize + x as usize;

    let mut visited = vec![false; width as usize * height as usize];
    let mut queue: VecDeque<(u32, u32)> = seeds.iter().map(|s| (s.x, s.y)).collect();
    let offsets = connectivity.offsets();
    let mut removed = 0;

    while let Some((x, y)) = queue.pop_front() {
        let idx = index(x, y);
        if visited[idx] {
            continue;
        }
        visited[idx] = true;

        let pixel = image.get_pixel_mut(x, y);
        if !matcher.matches(pixel) {
            continue;
        }
        erase(pixel);
        removed += 1;

        for &(dx, dy) in offsets {
            let nx = x as i32 + dx;
            let ny = y as i32 + dy;
            if in_bounds(nx, ny, width, height) && !visited[index(nx as u32, ny as u32)] {
                queue.push_back((nx as u32, ny as u32));
            }
        }
    }

    debug!(
        "Flood fill ({:?}) erased {} of {} pixels",
        connectivity,
        removed,
        visited.len()
    );

    removed
}
