use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::color::validate_threshold;
use crate::errors::{FloodfillError, Result};
use crate::flood::Connectivity;
use crate::pipeline::RemovalOptions;
use crate::seeds::SeedSpec;

/// Configuration for floodfill-bg, loadable from a TOML file
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Config {
    /// Color distance 0-441
    #[serde(default = "default_threshold")]
    pub threshold: f64,

    #[serde(default)]
    pub mode: ProcessingMode,

    /// Include diagonal neighbors (flood mode only)
    #[serde(default)]
    pub eight_way: bool,

    #[serde(default)]
    pub trim: bool,

    #[serde(default)]
    pub auto_corners: bool,

    /// Seed strings, "x,y" or "x%,y%"
    #[serde(default)]
    pub seeds: Vec<String>,

    /// Where cleaned images go when no explicit output path is given
    #[serde(default)]
    pub output_dir: Option<String>,

    #[serde(default = "default_parallel")]
    pub use_parallel: bool,

    /// Optional CSV summary of every processed file
    #[serde(default)]
    pub report_csv: Option<String>,
}

/// How background pixels are found
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum ProcessingMode {
    /// Erase pixels connected to a seed
    #[default]
    Flood,
    /// Erase every matching pixel anywhere in the image
    Global,
    /// No erasure, only crop transparent borders
    TrimOnly,
}

impl ProcessingMode {
    pub fn label(&self) -> &'static str {
        match self {
            ProcessingMode::Flood => "flood-fill",
            ProcessingMode::Global => "GLOBAL purge",
            ProcessingMode::TrimOnly => "trim-only",
        }
    }
}

fn default_threshold() -> f64 {
    50.0
}

fn default_parallel() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            threshold: default_threshold(),
            mode: ProcessingMode::Flood,
            eight_way: false,
            trim: false,
            auto_corners: false,
            seeds: Vec::new(),
            output_dir: None,
            use_parallel: default_parallel(),
            report_csv: None,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            io::Error::new(e.kind(), format!("Failed to read config file '{}': {}", path.display(), e))
        })?;

        toml::from_str(&content).map_err(|source| FloodfillError::ConfigLoad {
            source,
            path: path.to_path_buf(),
        })
    }

    /// Parse the seed strings
    pub fn seed_specs(&self) -> Result<Vec<SeedSpec>> {
        self.seeds.iter().map(|s| s.parse()).collect()
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        validate_threshold(self.threshold)?;
        self.seed_specs()?;

        if self.mode != ProcessingMode::TrimOnly && self.seeds.is_empty() && !self.auto_corners {
            return Err(FloodfillError::NoSeeds);
        }

        if let Some(dir) = &self.output_dir {
            let dir = PathBuf::from(dir);
            if dir.exists() && !dir.is_dir() {
                return Err(FloodfillError::Config(format!(
                    "output_dir '{}' is not a directory",
                    dir.display()
                )));
            }
        }

        Ok(())
    }

    /// Immutable per-run options derived from this configuration
    pub fn to_options(&self) -> Result<RemovalOptions> {
        self.validate()?;

        Ok(RemovalOptions {
            seeds: self.seed_specs()?,
            auto_corners: self.auto_corners,
            threshold: self.threshold,
            mode: self.mode,
            connectivity: Connectivity::from_eight_way(self.eight_way),
            trim: self.trim,
            parallel: self.use_parallel,
        })
    }

    /// Save configuration to a TOML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self).map_err(|e| {
            FloodfillError::Config(format!("Failed to serialize config: {}", e))
        })?;

        fs::write(path, content)?;

        Ok(())
    }
}
