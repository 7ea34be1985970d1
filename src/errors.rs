use thiserror::Error;
use std::io;
use std::path::PathBuf;

/// Custom error types for floodfill-bg
#[derive(Error, Debug)]
pub enum FloodfillError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Image processing error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to load configuration from {path}: {source}")]
    ConfigLoad {
        source: toml::de::Error,
        path: PathBuf,
    },

    #[error("Invalid seed '{seed}': {reason}")]
    InvalidSeed { seed: String, reason: String },

    #[error("Seed ({x}, {y}) is outside the {width}x{height} image")]
    SeedOutOfBounds { x: u32, y: u32, width: u32, height: u32 },

    #[error("Threshold must be 0-441, got: {0}")]
    ThresholdOutOfRange(f64),

    #[error("Must specify at least one seed and/or use auto-corners")]
    NoSeeds,

    #[error("Invalid input path: {0}")]
    InvalidPath(PathBuf),

    #[error("Image has no pixels ({width}x{height})")]
    EmptyImage { width: u32, height: u32 },

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("{failed} of {total} images failed to process")]
    BatchFailed { failed: usize, total: usize },

    #[error("CSV output error: {0}")]
    CsvOutput(#[from] csv::Error),
}

impl FloodfillError {
    /// True for caller input problems detected before any pixel is touched.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            FloodfillError::Config(_)
                | FloodfillError::ConfigLoad { .. }
                | FloodfillError::InvalidSeed { .. }
                | FloodfillError::SeedOutOfBounds { .. }
                | FloodfillError::ThresholdOutOfRange(_)
                | FloodfillError::NoSeeds
        )
    }
}

/// Type alias for Result with our custom error type
pub type Result<T> = std::result::Result<T, FloodfillError>;
