mod common;

use assert_cmd::Command;
use common::synthetic_image::{from_ascii, WHITE};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn write_input(dir: &Path, name: &str) -> PathBuf {
    let image = from_ascii(&[
        ".....",
        ".##..",
        ".##..",
        ".....",
    ]);
    let path = dir.join(name);
    image.save(&path).unwrap();
    path
}

#[test]
fn auto_corners_with_trim_writes_cropped_png() {
    let temp_dir = TempDir::new().unwrap();
    let input = write_input(temp_dir.path(), "square.png");
    let output = temp_dir.path().join("out.png");

    let mut cmd = Command::cargo_bin("floodfill_bg_cli").unwrap();
    cmd.arg(&input)
        .arg("-o")
        .arg(&output)
        .args(["--auto-corners", "-t", "0", "--trim"]);

    let stdout = cmd.assert().success().get_output().stdout.clone();
    let stdout = String::from_utf8_lossy(&stdout);
    assert!(stdout.contains("Removed:    16 pixels"));
    assert!(stdout.contains("Final:      2x2"));

    let result = image::open(&output).unwrap().to_rgba8();
    assert_eq!(result.dimensions(), (2, 2));
    assert!(result.pixels().all(|p| *p == WHITE));
}

#[test]
fn info_prints_dimensions_without_seeds() {
    let temp_dir = TempDir::new().unwrap();
    let input = write_input(temp_dir.path(), "info.png");

    let mut cmd = Command::cargo_bin("floodfill_bg_cli").unwrap();
    cmd.arg(&input).arg("--info");

    let stdout = cmd.assert().success().get_output().stdout.clone();
    assert!(String::from_utf8_lossy(&stdout).contains("info.png: 5x4, RGBA"));
}

#[test]
fn missing_seeds_fail() {
    let temp_dir = TempDir::new().unwrap();
    let input = write_input(temp_dir.path(), "noseed.png");

    Command::cargo_bin("floodfill_bg_cli")
        .unwrap()
        .arg(&input)
        .arg("-o")
        .arg(temp_dir.path().join("never.png"))
        .assert()
        .failure();

    assert!(!temp_dir.path().join("never.png").exists());
}

#[test]
fn out_of_range_threshold_fails() {
    let temp_dir = TempDir::new().unwrap();
    let input = write_input(temp_dir.path(), "thresh.png");

    Command::cargo_bin("floodfill_bg_cli")
        .unwrap()
        .arg(&input)
        .args(["-c", "-t", "500"])
        .assert()
        .failure();
}

#[test]
fn directory_batch_writes_report() {
    let temp_dir = TempDir::new().unwrap();
    let input_dir = temp_dir.path().join("in");
    std::fs::create_dir_all(&input_dir).unwrap();
    write_input(&input_dir, "a.png");
    write_input(&input_dir, "b.png");
    let out_dir = temp_dir.path().join("out");
    let report = temp_dir.path().join("report.csv");

    Command::cargo_bin("floodfill_bg_cli")
        .unwrap()
        .arg(&input_dir)
        .arg("-o")
        .arg(&out_dir)
        .arg("--report")
        .arg(&report)
        .args(["-c", "--global", "-t", "0"])
        .assert()
        .success();

    assert!(out_dir.join("a_cleaned.png").exists());
    assert!(out_dir.join("b_cleaned.png").exists());
    let csv = std::fs::read_to_string(&report).unwrap();
    assert_eq!(csv.lines().count(), 3);
    assert!(csv.contains("GLOBAL purge"));
}

#[test]
fn batch_with_repeated_names_keeps_every_output() {
    let temp_dir = TempDir::new().unwrap();
    let input_dir = temp_dir.path().join("in");
    std::fs::create_dir_all(input_dir.join("sub")).unwrap();
    write_input(&input_dir, "a.png");
    write_input(&input_dir, "a.bmp");
    write_input(&input_dir.join("sub"), "a.png");
    let out_dir = temp_dir.path().join("out");
    let report = temp_dir.path().join("report.csv");

    let assert = Command::cargo_bin("floodfill_bg_cli")
        .unwrap()
        .arg(&input_dir)
        .arg("-o")
        .arg(&out_dir)
        .arg("--report")
        .arg(&report)
        .args(["-c", "-t", "0", "--trim"])
        .assert()
        .success();

    let outputs = [
        out_dir.join("a_cleaned.png"),
        out_dir.join("a_bmp_cleaned.png"),
        out_dir.join("sub").join("a_cleaned.png"),
    ];
    for output in &outputs {
        assert!(output.exists(), "missing {}", output.display());
    }

    let csv = std::fs::read_to_string(&report).unwrap();
    let written: std::collections::HashSet<&str> =
        csv.lines().skip(1).filter_map(|line| line.split(',').nth(1)).collect();
    assert_eq!(written.len(), 3);

    // Each file's console block stays contiguous: Input, Output, ..., Saved
    let stdout = String::from_utf8_lossy(&assert.get_output().stdout).into_owned();
    let lines: Vec<&str> = stdout.lines().collect();
    let mut blocks = 0;
    for (i, line) in lines.iter().enumerate() {
        if let Some(output) = line.strip_prefix("Output:     ") {
            let saved = lines[i + 1..]
                .iter()
                .find(|l| l.starts_with("Saved:") || l.starts_with("Output:"))
                .unwrap();
            assert!(saved.starts_with(&format!("Saved:      {} ", output)), "{}", stdout);
            blocks += 1;
        }
    }
    assert_eq!(blocks, 3);
}
