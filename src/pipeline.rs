use image::RgbaImage;
use log::{debug, info, warn};

use crate::color::{validate_threshold, ColorMatcher};
use crate::config::ProcessingMode;
use crate::errors::{FloodfillError, Result};
use crate::flood::{flood_fill_remove, Connectivity};
use crate::purge::global_purge;
use crate::seeds::{resolve_seeds, ResolvedSeed, SeedSpec};
use crate::trim::{trim_transparent, TrimOutcome};

/// Everything one run needs. Built once, never mutated by the pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct RemovalOptions {
    pub seeds: Vec<SeedSpec>,
    pub auto_corners: bool,
    pub threshold: f64,
    pub mode: ProcessingMode,
    /// Only consulted in flood mode
    pub connectivity: Connectivity,
    /// Crop transparent borders afterwards. Trim-only mode always trims.
    pub trim: bool,
    /// Let the global purge use the rayon pool
    pub parallel: bool,
}

impl Default for RemovalOptions {
    fn default() -> Self {
        Self {
            seeds: Vec::new(),
            auto_corners: false,
            threshold: 50.0,
            mode: ProcessingMode::Flood,
            connectivity: Connectivity::Four,
            trim: false,
            parallel: false,
        }
    }
}

impl RemovalOptions {
    /// Checks that don't need the image
    pub fn validate(&self) -> Result<()> {
        validate_threshold(self.threshold)?;
        Ok(())
    }

    fn trims(&self) -> bool {
        self.trim || self.mode == ProcessingMode::TrimOnly
    }
}

/// Dimensions reported by an info-only request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageInfo {
    pub width: u32,
    pub height: u32,
}

/// Result of a processing run
#[derive(Debug, Clone)]
pub struct RemovalReport {
    pub image: RgbaImage,
    pub initial_dimensions: (u32, u32),
    /// Empty in trim-only mode
    pub seeds: Vec<ResolvedSeed>,
    pub removed: usize,
    /// `None` when trimming was not requested
    pub trim: Option<TrimOutcome>,
}

impl RemovalReport {
    pub fn final_dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }
}

/// What the caller wants from the pipeline
#[derive(Debug, Clone)]
pub enum Request {
    Info,
    Remove(RemovalOptions),
}

#[derive(Debug, Clone)]
pub enum Outcome {
    Info(ImageInfo),
    Processed(RemovalReport),
}

pub fn image_info(image: &RgbaImage) -> ImageInfo {
    let (width, height) = image.dimensions();
    ImageInfo { width, height }
}

/// Dispatch a request. Info requests never look at seeds or touch pixels.
pub fn run(image: RgbaImage, request: &Request) -> Result<Outcome> {
    match request {
        Request::Info => Ok(Outcome::Info(image_info(&image))),
        Request::Remove(options) => remove_background(image, options).map(Outcome::Processed),
    }
}

/// Resolve seeds, erase background, then optionally trim.
///
/// All configuration errors surface before the first pixel is changed, so a
/// failed run never leaves a half-processed image behind.
pub fn remove_background(mut image: RgbaImage, options: &RemovalOptions) -> Result<RemovalReport> {
    options.validate()?;
    let initial_dimensions = image.dimensions();
    let (width, height) = initial_dimensions;
    if width == 0 || height == 0 {
        return Err(FloodfillError::EmptyImage { width, height });
    }

    let (seeds, removed) = match options.mode {
        ProcessingMode::TrimOnly => {
            debug!("Trim-only mode, skipping seed resolution");
            (Vec::new(), 0)
        }
        ProcessingMode::Flood | ProcessingMode::Global => {
            let seeds = resolve_seeds(&image, &options.seeds, options.auto_corners)?;
            let matcher = ColorMatcher::new(seeds.iter().map(|s| s.color), options.threshold)?;
            info!(
                "Seeds resolved: {} positions, {} distinct colors",
                seeds.len(),
                matcher.colors().len()
            );

            let removed = if options.mode == ProcessingMode::Global {
                if options.connectivity == Connectivity::Eight {
                    warn!("8-way connectivity has no effect in global mode");
                }
                global_purge(&mut image, &matcher, options.parallel)
            } else {
                flood_fill_remove(&mut image, &seeds, &matcher, options.connectivity)
            };
            info!("Removed {} pixels", removed);

            (seeds, removed)
        }
    };

    let (image, trim) = if options.trims() {
        let (image, outcome) = trim_transparent(image);
        (image, Some(outcome))
    } else {
        (image, None)
    };

    Ok(RemovalReport {
        image,
        initial_dimensions,
        seeds,
        removed,
        trim,
    })
}
