//! Render every labelled layer CSV in a directory to its own JPEG.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use renderer::legend::write_layer_summaries;
use renderer::{make_gradient, render_layer, save_jpeg, GradientFactors, LayerSummary, Rgb};
use risk_common::{LayerScheme, RiskError, RiskResult};
use risk_processor::csv::read_grid;
use risk_processor::CsvLayout;
use tracing::{info, warn};

/// Summary file written next to the layer images.
pub const SUMMARY_FILE: &str = "conversion_summary.json";

/// Outcome of a layer conversion run.
#[derive(Debug, Default)]
pub struct LayerReport {
    /// Rendered layers keyed by source file name
    pub converted: BTreeMap<String, LayerSummary>,
    /// Files that could not be converted
    pub failed: Vec<(String, RiskError)>,
    /// Set once the summary file has been written
    pub summary_path: Option<PathBuf>,
}

/// CSV files directly inside `dir`, sorted by name.
pub fn find_layer_files(dir: &Path) -> RiskResult<Vec<PathBuf>> {
    let entries = std::fs::read_dir(dir).map_err(|e| RiskError::ReadError {
        path: dir.display().to_string(),
        message: e.to_string(),
    })?;

    let mut files: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_file() && path.extension().is_some_and(|ext| ext == "csv"))
        .collect();
    files.sort();
    Ok(files)
}

/// Render one labelled layer CSV to `{output_dir}/{data_type}.jpeg`.
pub fn convert_layer(path: &Path, output_dir: &Path, quality: u8) -> RiskResult<LayerSummary> {
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .ok_or_else(|| RiskError::ReadError {
            path: path.display().to_string(),
            message: "file name is not valid UTF-8".to_string(),
        })?;
    let scheme = LayerScheme::resolve(stem);

    let grid = read_grid(path, CsvLayout::labelled())?;
    let gradient = make_gradient(scheme.base_color(), GradientFactors::LAYER)?;
    let image = render_layer(&grid, &gradient, Rgb::WHITE)?;

    let jpeg_path = output_dir.join(format!("{}.jpeg", scheme.data_type()));
    save_jpeg(&image, &jpeg_path, quality)?;

    info!(
        layer = scheme.data_type(),
        scheme = %scheme.description(),
        dimensions = %grid.dimensions_label(),
        "Converted layer"
    );
    Ok(LayerSummary::new(
        jpeg_path.display().to_string(),
        &grid,
        &scheme,
    ))
}

/// Convert every CSV in `input_dir` and write the summary file.
///
/// A file that fails to convert is logged and skipped.
pub fn convert_layers(input_dir: &Path, output_dir: &Path, quality: u8) -> RiskResult<LayerReport> {
    let files = find_layer_files(input_dir)?;
    info!(count = files.len(), dir = %input_dir.display(), "Found layer files");

    std::fs::create_dir_all(output_dir).map_err(|e| RiskError::WriteError {
        path: output_dir.display().to_string(),
        message: e.to_string(),
    })?;

    let mut report = LayerReport::default();
    for path in files {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        match convert_layer(&path, output_dir, quality) {
            Ok(summary) => {
                report.converted.insert(name, summary);
            }
            Err(e) => {
                warn!(file = %name, error = %e, "Skipping layer");
                report.failed.push((name, e));
            }
        }
    }

    // Written even when nothing converted, as an empty object
    let summary_path = output_dir.join(SUMMARY_FILE);
    write_layer_summaries(&report.converted, &summary_path)?;
    report.summary_path = Some(summary_path);

    info!(
        converted = report.converted.len(),
        failed = report.failed.len(),
        "Layer conversion complete"
    );
    Ok(report)
}
