use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::fs;
use image::{ColorType, ImageFormat, RgbaImage};

use crate::errors::{FloodfillError, Result};

/// File extensions accepted as input
pub const SUPPORTED_EXTENSIONS: [&str; 6] = ["bmp", "gif", "jpeg", "jpg", "png", "webp"];

/// Represents an input image with its metadata
pub struct InputImage {
    pub image: RgbaImage,
    pub path: PathBuf,
    pub filename: String,
    /// Color mode of the file before conversion to RGBA, e.g. "RGB"
    pub color_mode: String,
}

/// Short color mode name for a decoded color type ("L", "RGB", "RGBA", ...)
pub fn color_mode_name(color: ColorType) -> String {
    let name = match color {
        ColorType::L8 => "L",
        ColorType::La8 => "LA",
        ColorType::Rgb8 => "RGB",
        ColorType::Rgba8 => "RGBA",
        ColorType::L16 => "I;16",
        ColorType::La16 => "LA;16",
        ColorType::Rgb16 => "RGB;16",
        ColorType::Rgba16 => "RGBA;16",
        ColorType::Rgb32F => "RGB;F",
        ColorType::Rgba32F => "RGBA;F",
        other => return format!("{:?}", other),
    };
    name.to_string()
}

/// True if the path carries one of the supported image extensions
pub fn has_supported_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| SUPPORTED_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

/// Get all supported image files from a directory (recursively), sorted
pub fn get_image_files_in_dir<P: AsRef<Path>>(dir_path: P) -> Result<Vec<PathBuf>> {
    let dir_path = dir_path.as_ref();

    if !dir_path.exists() {
        return Err(FloodfillError::InvalidPath(dir_path.to_path_buf()));
    }

    if !dir_path.is_dir() {
        return Err(FloodfillError::InvalidPath(dir_path.to_path_buf()));
    }

    let mut files = Vec::new();
    find_image_files_recursive(dir_path, &mut files)?;
    files.sort();

    Ok(files)
}

fn find_image_files_recursive(dir_path: &Path, result: &mut Vec<PathBuf>) -> Result<()> {
    for entry in fs::read_dir(dir_path)? {
        let path = entry?.path();

        if path.is_dir() {
            find_image_files_recursive(&path, result)?;
        } else if path.is_file() && has_supported_extension(&path) {
            result.push(path);
        }
    }

    Ok(())
}

/// Load an image ensuring RGBA format
pub fn load_image<P: AsRef<Path>>(path: P) -> Result<InputImage> {
    let path = path.as_ref();

    if !path.is_file() {
        return Err(FloodfillError::InvalidPath(path.to_path_buf()));
    }

    if !has_supported_extension(path) {
        let ext = path.extension()
            .and_then(|s| s.to_str())
            .unwrap_or("")
            .to_string();
        return Err(FloodfillError::UnsupportedFormat(format!(
            ".{} (supported: {})", ext, SUPPORTED_EXTENSIONS.join(", ")
        )));
    }

    let filename = path.file_stem()
        .and_then(|s| s.to_str())
        .ok_or_else(|| FloodfillError::InvalidPath(path.to_path_buf()))?
        .to_string();

    let img = image::open(path)?;
    let color_mode = color_mode_name(img.color());

    Ok(InputImage {
        image: img.to_rgba8(),
        path: path.to_path_buf(),
        filename,
        color_mode,
    })
}

/// Save an RGBA image as PNG
pub fn save_image<P: AsRef<Path>>(image: &RgbaImage, path: P) -> Result<()> {
    let path = path.as_ref();

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    image.save_with_format(path, ImageFormat::Png)?;

    Ok(())
}

/// `<dir>/<stem>_cleaned.png`, with `/tmp` when no directory is configured
pub fn default_output_path(filename: &str, output_dir: Option<&str>) -> PathBuf {
    PathBuf::from(output_dir.unwrap_or("/tmp")).join(format!("{}_cleaned.png", filename))
}

/// Output path for one file of a directory batch.
///
/// The file's sub-directory below `input_root` is kept under the output
/// directory, so `in/a.png` and `in/sub/a.png` land in different places.
/// Inputs that are not PNG keep their extension in the name
/// (`a.jpg` -> `a_jpg_cleaned.png`).
pub fn batch_output_path(input_root: &Path, file: &Path, output_dir: Option<&str>) -> PathBuf {
    let relative_dir = file
        .parent()
        .and_then(|parent| parent.strip_prefix(input_root).ok())
        .unwrap_or_else(|| Path::new(""));

    let stem = file.file_stem().and_then(|s| s.to_str()).unwrap_or("image");
    let name = match file.extension().and_then(|e| e.to_str()) {
        Some(ext) if !ext.eq_ignore_ascii_case("png") => format!("{}_{}", stem, ext.to_ascii_lowercase()),
        _ => stem.to_string(),
    };

    PathBuf::from(output_dir.unwrap_or("/tmp"))
        .join(relative_dir)
        .join(format!("{}_cleaned.png", name))
}

/// Pair every batch input with its output path, failing if two inputs
/// would be written to the same file
pub fn plan_batch_outputs(
    input_root: &Path,
    files: &[PathBuf],
    output_dir: Option<&str>,
) -> Result<Vec<(PathBuf, PathBuf)>> {
    let mut claimed: HashMap<PathBuf, &Path> = HashMap::with_capacity(files.len());
    let mut plan = Vec::with_capacity(files.len());

    for file in files {
        let output = batch_output_path(input_root, file, output_dir);
        if let Some(previous) = claimed.insert(output.clone(), file) {
            return Err(FloodfillError::Config(format!(
                "{} and {} would both be written to {}",
                previous.display(),
                file.display(),
                output.display()
            )));
        }
        plan.push((file.clone(), output));
    }

    Ok(plan)
}
