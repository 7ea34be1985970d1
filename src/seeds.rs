use std::fmt;
use std::str::FromStr;

use image::{Rgba, RgbaImage};
use log::debug;

use crate::errors::{FloodfillError, Result};

/// One axis of a seed: a pixel index or a percentage of the axis
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SeedCoord {
    Absolute(u32),
    /// 0-100, where 100% lands on the last pixel
    Percent(f64),
}

impl SeedCoord {
    /// Map onto a concrete index along an axis of `len` pixels
    fn resolve(self, len: u32) -> u32 {
        match self {
            SeedCoord::Absolute(v) => v,
            SeedCoord::Percent(pct) => {
                let max_index = len.saturating_sub(1) as f64;
                ((pct / 100.0) * max_index).round() as u32
            }
        }
    }

    fn parse(part: &str, seed: &str) -> Result<Self> {
        let invalid = |reason: String| FloodfillError::InvalidSeed {
            seed: seed.to_string(),
            reason,
        };

        if let Some(pct) = part.strip_suffix('%') {
            let pct: f64 = pct
                .trim()
                .parse()
                .map_err(|_| invalid(format!("Invalid number: {}", pct)))?;
            if !(0.0..=100.0).contains(&pct) {
                return Err(invalid(format!("Percentage must be 0-100, got: {}", part)));
            }
            Ok(SeedCoord::Percent(pct))
        } else {
            part.parse::<u32>()
                .map(SeedCoord::Absolute)
                .map_err(|_| invalid(format!("Invalid number: {}", part)))
        }
    }
}

impl fmt::Display for SeedCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SeedCoord::Absolute(v) => write!(f, "{}", v),
            SeedCoord::Percent(p) => write!(f, "{}%", p),
        }
    }
}

/// A seed as written by the user, before it is bound to an image
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeedSpec {
    pub x: SeedCoord,
    pub y: SeedCoord,
}

impl SeedSpec {
    pub fn absolute(x: u32, y: u32) -> Self {
        Self {
            x: SeedCoord::Absolute(x),
            y: SeedCoord::Absolute(y),
        }
    }

    pub fn percent(x: f64, y: f64) -> Result<Self> {
        for pct in [x, y] {
            if !(0.0..=100.0).contains(&pct) {
                return Err(FloodfillError::InvalidSeed {
                    seed: format!("{}%,{}%", x, y),
                    reason: format!("Percentage must be 0-100, got: {}%", pct),
                });
            }
        }
        Ok(Self {
            x: SeedCoord::Percent(x),
            y: SeedCoord::Percent(y),
        })
    }
}

/// Parses `"x,y"`; each component is either an index (`12`) or a
/// percentage (`50%`), and the two may be mixed.
impl FromStr for SeedSpec {
    type Err = FloodfillError;

    fn from_str(s: &str) -> Result<Self> {
        let parts: Vec<&str> = s.trim().split(',').map(str::trim).collect();
        if parts.len() != 2 {
            return Err(FloodfillError::InvalidSeed {
                seed: s.to_string(),
                reason: "Seed must be \"x,y\" or \"x%,y%\" format".to_string(),
            });
        }

        Ok(Self {
            x: SeedCoord::parse(parts[0], s)?,
            y: SeedCoord::parse(parts[1], s)?,
        })
    }
}

impl fmt::Display for SeedSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.x, self.y)
    }
}

/// A seed bound to a pixel, with the color sampled before any erasure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedSeed {
    pub x: u32,
    pub y: u32,
    pub color: Rgba<u8>,
}

/// Top-left, top-right, bottom-left, bottom-right
pub fn corner_points(width: u32, height: u32) -> [(u32, u32); 4] {
    let (right, bottom) = (width.saturating_sub(1), height.saturating_sub(1));
    [(0, 0), (right, 0), (0, bottom), (right, bottom)]
}

/// Bind seed specs to concrete pixels of `image` and sample their colors.
///
/// Explicit seeds keep their order; corner seeds are appended when
/// `auto_corners` is set. Absolute coordinates outside the image are an
/// error rather than being clamped. Fails with `NoSeeds` when nothing
/// resolves and with `EmptyImage` on an image without pixels. Never
/// mutates the image.
pub fn resolve_seeds(
    image: &RgbaImage,
    specs: &[SeedSpec],
    auto_corners: bool,
) -> Result<Vec<ResolvedSeed>> {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return Err(FloodfillError::EmptyImage { width, height });
    }

    let mut points = Vec::with_capacity(specs.len() + if auto_corners { 4 } else { 0 });
    for spec in specs {
        let x = spec.x.resolve(width);
        let y = spec.y.resolve(height);
        if x >= width || y >= height {
            return Err(FloodfillError::SeedOutOfBounds { x, y, width, height });
        }
        points.push((x, y));
    }

    if auto_corners {
        points.extend_from_slice(&corner_points(width, height));
    }

    if points.is_empty() {
        return Err(FloodfillError::NoSeeds);
    }

    let seeds: Vec<ResolvedSeed> = points
        .into_iter()
        .map(|(x, y)| ResolvedSeed {
            x,
            y,
            color: *image.get_pixel(x, y),
        })
        .collect();

    debug!("Resolved {} seeds on {}x{} image", seeds.len(), width, height);

    Ok(seeds)
}
