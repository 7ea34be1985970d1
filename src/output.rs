use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use csv::Writer;

use crate::config::ProcessingMode;
use crate::errors::Result;
use crate::flood::Connectivity;
use crate::pipeline::{RemovalOptions, RemovalReport};
use crate::seeds::ResolvedSeed;
use crate::trim::TrimOutcome;

const RULE_WIDTH: usize = 50;

/// One processed file, as it appears in the CSV batch report
#[derive(Debug, Clone)]
pub struct ReportRow {
    pub input: PathBuf,
    pub output: PathBuf,
    pub mode: ProcessingMode,
    pub threshold: f64,
    pub initial_dimensions: (u32, u32),
    pub final_dimensions: (u32, u32),
    pub removed: usize,
    pub trim: Option<TrimOutcome>,
}

impl ReportRow {
    pub fn new(input: &Path, output: &Path, options: &RemovalOptions, report: &RemovalReport) -> Self {
        Self {
            input: input.to_path_buf(),
            output: output.to_path_buf(),
            mode: options.mode,
            threshold: options.threshold,
            initial_dimensions: report.initial_dimensions,
            final_dimensions: report.final_dimensions(),
            removed: report.removed,
            trim: report.trim,
        }
    }
}

/// "1.50 MB" above a mebibyte, whole kilobytes below
pub fn format_file_size(bytes: u64) -> String {
    if bytes > 1024 * 1024 {
        format!("{:.2} MB", bytes as f64 / (1024.0 * 1024.0))
    } else {
        format!("{} KB", bytes / 1024)
    }
}

/// Thousands separators for pixel counts
pub fn format_count(n: usize) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

fn format_seeds(seeds: &[ResolvedSeed]) -> String {
    let points: Vec<String> = seeds.iter().map(|s| format!("({}, {})", s.x, s.y)).collect();
    format!("[{}]", points.join(", "))
}

/// Processing header with all parameters
pub fn format_header(
    input: &Path,
    output: &Path,
    dimensions: (u32, u32),
    options: &RemovalOptions,
    seeds: &[ResolvedSeed],
) -> String {
    let heavy = "=".repeat(RULE_WIDTH);
    let lines = [
        String::new(),
        heavy.clone(),
        "floodfill-bg".to_string(),
        heavy,
        format!("Input:      {}", input.display()),
        format!("Output:     {}", output.display()),
        format!("Initial:    {}x{}", dimensions.0, dimensions.1),
        format!("Mode:       {}", options.mode.label()),
        format!("Threshold:  {}", options.threshold),
        format!("8-way:      {}", options.connectivity == Connectivity::Eight),
        format!("Trim:       {}", options.trim || options.mode == ProcessingMode::TrimOnly),
        format!("Seeds:      {}", format_seeds(seeds)),
        "-".repeat(RULE_WIDTH),
    ];

    lines.join("\n") + "\n"
}

/// Processing results; the output file must already be written
pub fn format_results(report: &RemovalReport, output: &Path) -> Result<String> {
    let mut lines = vec![format!("Removed:    {} pixels", format_count(report.removed))];

    match report.trim {
        Some(TrimOutcome::Cropped(bbox)) => lines.push(format!("Trimmed:    bbox={}", bbox)),
        Some(TrimOutcome::FullyTransparent) => {
            lines.push("Trimmed:    nothing left, image fully transparent".to_string())
        }
        None => {}
    }

    let (width, height) = report.final_dimensions();
    lines.push(format!("Final:      {}x{}", width, height));
    lines.push("-".repeat(RULE_WIDTH));

    let file_size = fs::metadata(output)?.len();
    lines.push(format!("Saved:      {} ({})", output.display(), format_file_size(file_size)));
    lines.push("=".repeat(RULE_WIDTH));

    Ok(lines.join("\n") + "\n")
}

/// Header and results for one file, written to stdout under a single lock
pub fn print_report(
    input: &Path,
    output: &Path,
    options: &RemovalOptions,
    report: &RemovalReport,
) -> Result<()> {
    let mut text = format_header(input, output, report.initial_dimensions, options, &report.seeds);
    text.push_str(&format_results(report, output)?);

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    handle.write_all(text.as_bytes())?;
    handle.flush()?;

    Ok(())
}

/// Write one CSV row per processed file
pub fn write_report_csv<P: AsRef<Path>>(rows: &[ReportRow], path: P) -> Result<()> {
    let path = path.as_ref();

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let mut writer = Writer::from_path(path)?;

    writer.write_record([
        "Input",
        "Output",
        "Mode",
        "Threshold",
        "Initial_Width",
        "Initial_Height",
        "Final_Width",
        "Final_Height",
        "Removed_Pixels",
        "Trim",
    ])?;

    for row in rows {
        let trim = match row.trim {
            Some(TrimOutcome::Cropped(bbox)) => bbox.to_string(),
            Some(TrimOutcome::FullyTransparent) => "fully-transparent".to_string(),
            None => String::new(),
        };

        writer.write_record([
            row.input.display().to_string(),
            row.output.display().to_string(),
            row.mode.label().to_string(),
            format!("{}", row.threshold),
            row.initial_dimensions.0.to_string(),
            row.initial_dimensions.1.to_string(),
            row.final_dimensions.0.to_string(),
            row.final_dimensions.1.to_string(),
            row.removed.to_string(),
            trim,
        ])?;
    }

    writer.flush()?;

    Ok(())
}
