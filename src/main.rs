use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;

use clap::Parser;
use log::{error, info};
use rayon::prelude::*;

use floodfill_bg_lib::config::{Config, ProcessingMode};
use floodfill_bg_lib::errors::{FloodfillError, Result};
use floodfill_bg_lib::image_io::{
    default_output_path, get_image_files_in_dir, load_image, plan_batch_outputs, save_image, InputImage,
};
use floodfill_bg_lib::output::{print_report, write_report_csv, ReportRow};
use floodfill_bg_lib::pipeline::{self, Outcome, RemovalOptions, Request};

/// Command-line arguments
#[derive(Parser, Debug)]
#[clap(
    author,
    version,
    about = "floodfill-bg - Remove background using flood-fill from seed points",
    after_help = "Examples:\n  \
        floodfill_bg_cli image.png --auto-corners\n  \
        floodfill_bg_cli image.png --seed 0,0 --seed 100%,100%\n  \
        floodfill_bg_cli image.png -c -t 30 -o cleaned.png\n  \
        floodfill_bg_cli image.png -c --global -t 40"
)]
struct Args {
    /// Input image, or a directory of images
    input: PathBuf,

    /// Output path (a directory when INPUT is a directory, mirroring its sub-directories).
    /// Default: /tmp/<name>_cleaned.png
    #[clap(short, long)]
    output: Option<PathBuf>,

    /// Seed point 'x,y' or 'x%,y%'. Can repeat.
    #[clap(short = 's', long = "seed")]
    seeds: Vec<String>,

    /// Use all 4 corners as seeds
    #[clap(short = 'c', long)]
    auto_corners: bool,

    /// Color distance 0-441 (overwrites config, default 50)
    #[clap(short, long)]
    threshold: Option<f64>,

    /// Use 8-way neighbors (includes diagonals)
    #[clap(long = "8-way")]
    eight_way: bool,

    /// Global purge: remove ALL matching pixels
    #[clap(short = 'g', long = "global")]
    global: bool,

    /// Trim transparent edges after processing
    #[clap(long)]
    trim: bool,

    /// Print image info and exit
    #[clap(short, long)]
    info: bool,

    /// Path to an optional TOML configuration file
    #[clap(long)]
    config: Option<PathBuf>,

    /// Write a CSV summary of all processed files
    #[clap(long)]
    report: Option<PathBuf>,

    /// Enable debug logging
    #[clap(short, long)]
    debug: bool,
}

/// Fold command-line flags over the loaded configuration; flags win
fn merge_args(mut config: Config, args: &Args) -> Config {
    if !args.seeds.is_empty() {
        config.seeds = args.seeds.clone();
    }
    if let Some(threshold) = args.threshold {
        config.threshold = threshold;
    }
    if let Some(report) = &args.report {
        config.report_csv = Some(report.display().to_string());
    }
    config.auto_corners |= args.auto_corners;
    config.eight_way |= args.eight_way;
    config.trim |= args.trim;
    if args.global {
        config.mode = ProcessingMode::Global;
    }

    // Nothing to seed from but a trim was asked for
    if config.mode == ProcessingMode::Flood
        && config.seeds.is_empty()
        && !config.auto_corners
        && config.trim
    {
        config.mode = ProcessingMode::TrimOnly;
    }

    config
}

fn print_info(path: &Path) -> Result<()> {
    let input = load_image(path)?;
    let name = input
        .path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| input.filename.clone());

    if let Outcome::Info(info) = pipeline::run(input.image, &Request::Info)? {
        println!("{}: {}x{}, {}", name, info.width, info.height, input.color_mode);
    }

    Ok(())
}

fn process_file(input: InputImage, output: &Path, options: &RemovalOptions) -> Result<ReportRow> {
    let report = pipeline::remove_background(input.image, options)?;
    save_image(&report.image, output)?;

    print_report(&input.path, output, options, &report)?;

    Ok(ReportRow::new(&input.path, output, options, &report))
}

fn process_directory(
    dir: &Path,
    output_dir: Option<&str>,
    options: &RemovalOptions,
    parallel: bool,
) -> Result<Vec<ReportRow>> {
    let files = get_image_files_in_dir(dir)?;
    info!("Found {} images in {}", files.len(), dir.display());

    let jobs = plan_batch_outputs(dir, &files, output_dir)?;

    let handle = |(path, output): &(PathBuf, PathBuf)| -> Result<ReportRow> {
        load_image(path)
            .and_then(|input| process_file(input, output, options))
            .map_err(|e| {
                error!("Error processing {}: {}", path.display(), e);
                e
            })
    };

    let results: Vec<Result<ReportRow>> = if parallel {
        jobs.par_iter().map(handle).collect()
    } else {
        jobs.iter().map(handle).collect()
    };

    let total = results.len();
    let rows: Vec<ReportRow> = results.into_iter().filter_map(|r| r.ok()).collect();
    if rows.len() < total {
        return Err(FloodfillError::BatchFailed { failed: total - rows.len(), total });
    }

    Ok(rows)
}

fn run(args: Args) -> Result<()> {
    if args.info {
        if args.input.is_dir() {
            for path in get_image_files_in_dir(&args.input)? {
                print_info(&path)?;
            }
            return Ok(());
        }
        return print_info(&args.input);
    }

    let config = match &args.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };
    let config = merge_args(config, &args);

    let options = config.to_options()?;
    let start_time = Instant::now();

    let rows = if args.input.is_file() {
        let input = load_image(&args.input)?;
        let output = match &args.output {
            Some(path) => path.clone(),
            None => default_output_path(&input.filename, config.output_dir.as_deref()),
        };
        vec![process_file(input, &output, &options)?]
    } else if args.input.is_dir() {
        let output_dir = args
            .output
            .as_ref()
            .map(|p| p.display().to_string())
            .or_else(|| config.output_dir.clone());
        process_directory(&args.input, output_dir.as_deref(), &options, config.use_parallel)?
    } else {
        return Err(FloodfillError::InvalidPath(args.input.clone()));
    };

    if let Some(report_path) = &config.report_csv {
        write_report_csv(&rows, report_path)?;
        info!("Report written to {}", report_path);
    }

    info!(
        "Processed {} image(s) in {:.2} seconds",
        rows.len(),
        start_time.elapsed().as_secs_f64()
    );

    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();

    let default_filter = if args.debug { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter)).init();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(argv: &[&str]) -> Args {
        Args::try_parse_from(argv).unwrap()
    }

    #[test]
    fn flags_override_config() {
        let args = parse(&["floodfill_bg_cli", "in.png", "-s", "1,2", "-s", "50%,50%", "-t", "12", "-g", "--8-way"]);
        let config = merge_args(Config { threshold: 99.0, ..Config::default() }, &args);

        assert_eq!(config.seeds, vec!["1,2".to_string(), "50%,50%".to_string()]);
        assert_eq!(config.threshold, 12.0);
        assert_eq!(config.mode, ProcessingMode::Global);
        assert!(config.eight_way);
    }

    #[test]
    fn config_seeds_survive_without_flags() {
        let args = parse(&["floodfill_bg_cli", "in.png"]);
        let config = merge_args(Config { seeds: vec!["0,0".to_string()], ..Config::default() }, &args);
        assert_eq!(config.seeds, vec!["0,0".to_string()]);
        assert_eq!(config.mode, ProcessingMode::Flood);
    }

    #[test]
    fn trim_without_seeds_becomes_trim_only() {
        let args = parse(&["floodfill_bg_cli", "in.png", "--trim"]);
        let config = merge_args(Config::default(), &args);
        assert_eq!(config.mode, ProcessingMode::TrimOnly);
        assert!(config.to_options().is_ok());
    }

    #[test]
    fn no_seeds_no_trim_is_rejected() {
        let args = parse(&["floodfill_bg_cli", "in.png"]);
        let config = merge_args(Config::default(), &args);
        assert!(matches!(config.to_options(), Err(FloodfillError::NoSeeds)));
    }
}
