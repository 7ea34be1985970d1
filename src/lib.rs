// src/lib.rs - Library interface for floodfill-bg

pub mod color;
pub mod config;
pub mod errors;
pub mod flood;
pub mod image_io;
pub mod image_utils;
pub mod output;
pub mod pipeline;
pub mod purge;
pub mod seeds;
pub mod trim;

// Re-export commonly used types and functions
pub use errors::{FloodfillError, Result};
pub use config::{Config, ProcessingMode};
pub use image_io::{InputImage, load_image, save_image};
pub use pipeline::{
    image_info,
    remove_background,
    run,
    ImageInfo,
    Outcome,
    RemovalOptions,
    RemovalReport,
    Request,
};

// Re-export the processing stages
pub use color::{color_distance, ColorMatcher, MAX_THRESHOLD};
pub use seeds::{resolve_seeds, ResolvedSeed, SeedCoord, SeedSpec};
pub use flood::{flood_fill_remove, Connectivity};
pub use purge::global_purge;
pub use trim::{bounding_box, trim_transparent, BoundingBox, TrimOutcome};
