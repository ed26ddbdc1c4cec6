//! Raster rendering of risk and input-layer grids.
//!
//! A risk grid is painted as three layers composited in order:
//! 1. the continuous gradient over `[0, 10]` for every cell that is not no-data
//! 2. the zero color wherever the value is exactly 0
//! 3. the no-data color wherever the value is 99 or NaN
//!
//! Each layer is transparent where it has nothing to paint, so later layers
//! only override earlier ones at their own cells. One pixel per grid cell.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use image::codecs::jpeg::JpegEncoder;
use image::{Rgb as Pixel, RgbImage};
use rayon::prelude::*;
use risk_common::{is_no_data, Grid, RiskError, RiskResult, RISK_MAX, RISK_MIN};
use tracing::debug;

use crate::gradient::Gradient;
use crate::style::{RiskPalette, Rgb};

/// Default JPEG quality (0-100 scale).
pub const DEFAULT_JPEG_QUALITY: u8 = 95;

/// Minimum cells to benefit from parallel painting
const PARALLEL_THRESHOLD: usize = 4096; // 64x64 or larger

/// One paint layer: `None` cells are transparent.
#[derive(Debug, Clone, PartialEq)]
pub struct PaintLayer {
    pub width: usize,
    pub height: usize,
    pub cells: Vec<Option<Rgb>>,
}

impl PaintLayer {
    /// Paint `f(value)` for every cell of `grid`.
    pub fn from_grid<F>(grid: &Grid, f: F) -> Self
    where
        F: Fn(f64) -> Option<Rgb> + Sync,
    {
        let values = grid.values();
        let cells = if values.len() >= PARALLEL_THRESHOLD {
            values.par_iter().map(|&v| f(v)).collect()
        } else {
            values.iter().map(|&v| f(v)).collect()
        };

        Self {
            width: grid.cols(),
            height: grid.rows(),
            cells,
        }
    }

    /// Number of opaque cells.
    pub fn painted(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }
}

/// Build the three risk layers: gradient, zero overlay and no-data overlay.
pub fn risk_layers(grid: &Grid, gradient: &Gradient, palette: &RiskPalette) -> RiskResult<[PaintLayer; 3]> {
    let zero = palette.zero()?;
    let no_data = palette.no_data()?;

    let base = PaintLayer::from_grid(grid, |v| {
        if is_no_data(v) {
            None
        } else {
            let t = v.clamp(RISK_MIN, RISK_MAX) / RISK_MAX;
            Some(gradient.color_at(t))
        }
    });
    let zeros = PaintLayer::from_grid(grid, |v| (v == 0.0).then_some(zero));
    let missing = PaintLayer::from_grid(grid, |v| is_no_data(v).then_some(no_data));

    Ok([base, zeros, missing])
}

/// Composite layers bottom-to-top over `background`.
pub fn composite(layers: &[PaintLayer], width: usize, height: usize, background: Rgb) -> RiskResult<RgbImage> {
    if width == 0 || height == 0 {
        return Err(RiskError::RenderError("cannot render an empty grid".into()));
    }
    for layer in layers {
        if layer.width != width || layer.height != height {
            return Err(RiskError::RenderError(format!(
                "layer is {}x{}, image is {}x{}",
                layer.height, layer.width, height, width
            )));
        }
    }

    let img_width = u32::try_from(width)
        .map_err(|_| RiskError::RenderError(format!("width {} too large", width)))?;
    let img_height = u32::try_from(height)
        .map_err(|_| RiskError::RenderError(format!("height {} too large", height)))?;

    let mut buffer = vec![0u8; width * height * 3];
    let paint_row = |(row, out): (usize, &mut [u8])| {
        for col in 0..width {
            let idx = row * width + col;
            let color = layers
                .iter()
                .rev()
                .find_map(|layer| layer.cells[idx])
                .unwrap_or(background);
            out[col * 3..col * 3 + 3].copy_from_slice(&color.to_array());
        }
    };

    if width * height >= PARALLEL_THRESHOLD {
        buffer.par_chunks_mut(width * 3).enumerate().for_each(paint_row);
    } else {
        buffer.chunks_mut(width * 3).enumerate().for_each(paint_row);
    }

    RgbImage::from_raw(img_width, img_height, buffer)
        .ok_or_else(|| RiskError::RenderError("pixel buffer does not match image size".into()))
}

/// Render a risk grid to an RGB image.
pub fn render_risk(grid: &Grid, gradient: &Gradient, palette: &RiskPalette) -> RiskResult<RgbImage> {
    let layers = risk_layers(grid, gradient, palette)?;
    debug!(
        gradient = layers[0].painted(),
        zero = layers[1].painted(),
        no_data = layers[2].painted(),
        "Painted risk layers"
    );
    composite(&layers, grid.cols(), grid.rows(), Rgb::WHITE)
}

/// Render a single input layer over its own finite value range.
///
/// Non-finite cells show the background.
pub fn render_layer(grid: &Grid, gradient: &Gradient, background: Rgb) -> RiskResult<RgbImage> {
    let (min, max) = grid
        .finite_range()
        .ok_or_else(|| RiskError::RenderError("layer has no numeric cells".into()))?;

    let layer = PaintLayer::from_grid(grid, |v| {
        if v.is_finite() {
            Some(gradient.color_for_value(v, min, max))
        } else {
            None
        }
    });
    composite(&[layer], grid.cols(), grid.rows(), background)
}

/// Encode an image as JPEG.
pub fn encode_jpeg(image: &RgbImage, quality: u8) -> RiskResult<Vec<u8>> {
    let mut bytes = Vec::new();
    let mut encoder = JpegEncoder::new_with_quality(&mut bytes, quality.clamp(1, 100));
    encoder
        .encode_image(image)
        .map_err(|e| RiskError::RenderError(format!("JPEG encoding failed: {}", e)))?;
    Ok(bytes)
}

/// Encode an image as JPEG and write it to `path`.
pub fn save_jpeg(image: &RgbImage, path: impl AsRef<Path>, quality: u8) -> RiskResult<u64> {
    let path = path.as_ref();
    let bytes = encode_jpeg(image, quality)?;

    let file = File::create(path).map_err(|e| RiskError::WriteError {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    let mut writer = BufWriter::new(file);
    std::io::Write::write_all(&mut writer, &bytes)
        .and_then(|_| std::io::Write::flush(&mut writer))
        .map_err(|e| RiskError::WriteError {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

    debug!(path = %path.display(), bytes = bytes.len(), "Wrote JPEG");
    Ok(bytes.len() as u64)
}

/// Pixel at (row, col) as a color.
pub fn pixel_at(image: &RgbImage, row: usize, col: usize) -> Option<Rgb> {
    let (x, y) = (u32::try_from(col).ok()?, u32::try_from(row).ok()?);
    if x >= image.width() || y >= image.height() {
        return None;
    }
    let Pixel([r, g, b]) = *image.get_pixel(x, y);
    Some(Rgb::new(r, g, b))
}
