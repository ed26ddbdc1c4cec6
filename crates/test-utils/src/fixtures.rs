//! On-disk fixtures for pipeline tests.

use std::fs;
use std::path::{Path, PathBuf};

use risk_common::Grid;
use tempfile::TempDir;

/// File names of the five risk input layers, in pipeline order.
pub const RISK_INPUT_FILES: [&str; 5] = [
    "flood.csv",
    "landslide.csv",
    "water.csv",
    "urban.csv",
    "pixeles_areas_protegidas.csv",
];

/// Write a grid as a bare CSV (no header, no labels).
pub fn write_bare_csv(dir: &Path, name: &str, grid: &Grid) -> PathBuf {
    let mut text = String::new();
    for row in grid.iter_rows().take(grid.rows()) {
        let line: Vec<String> = row.iter().map(|v| v.to_string()).collect();
        text.push_str(&line.join(","));
        text.push('\n');
    }
    write_file(dir, name, &text)
}

/// Write a grid with a header row and `Y_n` row labels.
pub fn write_labelled_csv(dir: &Path, name: &str, grid: &Grid) -> PathBuf {
    let header: Vec<String> = (0..grid.cols()).map(|c| format!("X_{}", c)).collect();
    let mut text = format!(",{}\n", header.join(","));
    for (r, row) in grid.iter_rows().take(grid.rows()).enumerate() {
        let line: Vec<String> = row.iter().map(|v| v.to_string()).collect();
        text.push_str(&format!("Y_{},{}\n", r, line.join(",")));
    }
    write_file(dir, name, &text)
}

/// A temp directory holding the five risk input layers.
///
/// `layers` is in the order of [`RISK_INPUT_FILES`].
pub fn risk_input_dir(layers: [&Grid; 5]) -> TempDir {
    let dir = tempfile::tempdir().expect("create temp dir");
    for (name, grid) in RISK_INPUT_FILES.iter().zip(layers) {
        write_bare_csv(dir.path(), name, grid);
    }
    dir
}

fn write_file(dir: &Path, name: &str, text: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, text).expect("write fixture");
    path
}
