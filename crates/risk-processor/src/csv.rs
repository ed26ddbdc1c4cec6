//! Delimited-text grid reading and writing.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use risk_common::{Grid, RiskError, RiskResult};
use tracing::debug;

/// How a grid is laid out in a text file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CsvLayout {
    /// First non-blank line is a header and is skipped
    pub has_header: bool,
    /// First field of every row is a label (`Y_0`, `Y_1`, ...) and is skipped
    pub has_row_labels: bool,
}

impl CsvLayout {
    /// Plain numeric matrix with no header or label column.
    pub fn bare() -> Self {
        Self::default()
    }

    /// Header row plus a leading row-label column.
    pub fn labelled() -> Self {
        Self {
            has_header: true,
            has_row_labels: true,
        }
    }
}

/// Read a grid from a comma-separated file.
pub fn read_grid(path: impl AsRef<Path>, layout: CsvLayout) -> RiskResult<Grid> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| RiskError::ReadError {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;

    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    let grid = parse_grid(&content, layout, &name)?;
    debug!(file = %name, rows = grid.rows(), cols = grid.cols(), "Loaded grid");
    Ok(grid)
}

/// Parse a grid from comma-separated text.
///
/// Blank lines are skipped. Empty fields and `nan` parse as NaN, while
/// infinite values are rejected. With row labels, a row holding a single
/// field is read as data. `source_name` is only used in error messages.
pub fn parse_grid(text: &str, layout: CsvLayout, source_name: &str) -> RiskResult<Grid> {
    let mut rows: Vec<Vec<f64>> = Vec::new();
    let mut header_pending = layout.has_header;

    for (line_idx, line) in text.lines().enumerate() {
        let line = line.trim_end_matches('\r');
        if line.trim().is_empty() {
            continue;
        }
        if header_pending {
            header_pending = false;
            continue;
        }

        let fields: Vec<&str> = line.split(',').collect();
        // A single-column file has no label column to drop
        let skip = usize::from(layout.has_row_labels && fields.len() > 1);

        let row = fields
            .into_iter()
            .enumerate()
            .skip(skip)
            .map(|(col_idx, field)| {
                parse_value(field).ok_or_else(|| RiskError::ParseError {
                    source_name: source_name.to_string(),
                    line: line_idx + 1,
                    column: col_idx + 1,
                    token: field.trim().to_string(),
                })
            })
            .collect::<RiskResult<Vec<f64>>>()?;

        rows.push(row);
    }

    if rows.is_empty() {
        return Err(RiskError::EmptyGrid(format!("{} has no data rows", source_name)));
    }

    let grid = Grid::from_rows(rows)?;
    if grid.is_empty() {
        return Err(RiskError::EmptyGrid(format!("{} has no data columns", source_name)));
    }
    Ok(grid)
}

fn parse_value(field: &str) -> Option<f64> {
    let field = field.trim().trim_matches('"');
    if field.is_empty() || field.eq_ignore_ascii_case("nan") {
        return Some(f64::NAN);
    }
    field.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Format a grid as comma-separated text, one row per line, no header.
pub fn format_grid(grid: &Grid) -> String {
    let mut out = String::with_capacity(grid.len() * 4);
    for row in grid.iter_rows().take(grid.rows()) {
        let line: Vec<String> = row.iter().map(|v| format!("{:?}", v)).collect();
        out.push_str(&line.join(","));
        out.push('\n');
    }
    out
}

/// Write a grid as comma-separated text.
pub fn write_grid(path: impl AsRef<Path>, grid: &Grid) -> RiskResult<()> {
    let path = path.as_ref();
    let to_write_error = |e: std::io::Error| RiskError::WriteError {
        path: path.display().to_string(),
        message: e.to_string(),
    };

    let file = File::create(path).map_err(to_write_error)?;
    let mut writer = BufWriter::new(file);
    writer
        .write_all(format_grid(grid).as_bytes())
        .map_err(to_write_error)?;
    writer.flush().map_err(to_write_error)?;

    debug!(path = %path.display(), dimensions = %grid.dimensions_label(), "Wrote grid");
    Ok(())
}
