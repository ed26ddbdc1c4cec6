//! Tests for raster compositing and JPEG output.

use renderer::raster::{encode_jpeg, pixel_at, render_layer, render_risk, risk_layers, save_jpeg};
use renderer::{make_gradient, GradientFactors, Rgb, RiskPalette, DEFAULT_JPEG_QUALITY};
use risk_common::{Grid, RiskError};
use test_utils::create_flood_grid;

fn risk_setup() -> (renderer::Gradient, RiskPalette) {
    let palette = RiskPalette::default();
    let gradient = make_gradient(&palette.base_color, palette.factors).unwrap();
    (gradient, palette)
}

// ============================================================================
// Risk rendering
// ============================================================================

#[test]
fn test_image_matches_grid_dimensions() {
    let (gradient, palette) = risk_setup();
    let grid = create_flood_grid(3, 7);

    let img = render_risk(&grid, &gradient, &palette).unwrap();
    assert_eq!(img.width(), 7);
    assert_eq!(img.height(), 3);
}

#[test]
fn test_special_values_use_fixed_colors() {
    let (gradient, palette) = risk_setup();
    let grid = Grid::new(1, 4, vec![0.0, 99.0, f64::NAN, 5.0]).unwrap();

    let img = render_risk(&grid, &gradient, &palette).unwrap();

    assert_eq!(pixel_at(&img, 0, 0), Some(Rgb::new(0xea, 0xfe, 0x07)));
    assert_eq!(pixel_at(&img, 0, 1), Some(Rgb::new(0x00, 0x42, 0xa6)));
    assert_eq!(pixel_at(&img, 0, 2), Some(Rgb::new(0x00, 0x42, 0xa6)));
    assert_eq!(pixel_at(&img, 0, 3), Some(gradient.base));
}

#[test]
fn test_gradient_is_clamped_to_risk_scale() {
    let (gradient, palette) = risk_setup();
    let grid = Grid::new(2, 2, vec![10.0, 14.0, -3.0, 2.5]).unwrap();

    let img = render_risk(&grid, &gradient, &palette).unwrap();

    assert_eq!(pixel_at(&img, 0, 0), Some(gradient.dark));
    assert_eq!(pixel_at(&img, 0, 1), Some(gradient.dark));
    assert_eq!(pixel_at(&img, 1, 0), Some(gradient.light));
    assert_eq!(pixel_at(&img, 1, 1), Some(gradient.color_at(0.25)));
}

#[test]
fn test_pixels_follow_row_major_cells() {
    let (gradient, palette) = risk_setup();
    let grid = Grid::from_rows(vec![vec![0.0, 10.0], vec![99.0, 5.0]]).unwrap();

    let img = render_risk(&grid, &gradient, &palette).unwrap();

    assert_eq!(pixel_at(&img, 0, 1), Some(gradient.dark));
    assert_eq!(pixel_at(&img, 1, 0), Some(palette.no_data().unwrap()));
    assert_eq!(pixel_at(&img, 1, 1), Some(gradient.base));
}

#[test]
fn test_layer_coverage() {
    let (gradient, palette) = risk_setup();
    let grid = Grid::new(1, 5, vec![0.0, 99.0, f64::NAN, 3.0, 0.0]).unwrap();

    let [base, zeros, missing] = risk_layers(&grid, &gradient, &palette).unwrap();

    // Zero cells are painted by the gradient too, then covered by the overlay
    assert_eq!(base.painted(), 3);
    assert_eq!(zeros.painted(), 2);
    assert_eq!(missing.painted(), 2);
}

#[test]
fn test_large_grid_renders_same_as_cellwise() {
    // Large enough to take the parallel path
    let (gradient, palette) = risk_setup();
    let (rows, cols) = (80, 90);
    let data: Vec<f64> = (0..rows * cols).map(|i| (i % 13) as f64).collect();
    let grid = Grid::new(rows, cols, data).unwrap();

    let img = render_risk(&grid, &gradient, &palette).unwrap();

    for (r, c) in [(0, 0), (17, 42), (79, 89), (40, 1)] {
        let v = grid.get(r, c).unwrap();
        let expected = match v {
            x if x == 0.0 => palette.zero().unwrap(),
            x if x > 10.0 => gradient.dark,
            x => gradient.color_at(x / 10.0),
        };
        assert_eq!(pixel_at(&img, r, c), Some(expected), "cell ({}, {})", r, c);
    }
}

#[test]
fn test_empty_grid_is_render_error() {
    let (gradient, palette) = risk_setup();
    let err = render_risk(&Grid::filled(0, 0, 0.0), &gradient, &palette).unwrap_err();
    assert!(matches!(err, RiskError::RenderError(_)));
}

#[test]
fn test_invalid_palette_color() {
    let (gradient, mut palette) = risk_setup();
    palette.zero_color = "#zzzzzz".to_string();
    let err = render_risk(&Grid::filled(1, 1, 0.0), &gradient, &palette).unwrap_err();
    assert!(matches!(err, RiskError::InvalidColor(_)));
}

// ============================================================================
// Single-layer rendering
// ============================================================================

#[test]
fn test_layer_uses_own_range() {
    let gradient = make_gradient("#666666", GradientFactors::LAYER).unwrap();
    let grid = Grid::new(1, 4, vec![2.0, 4.0, 6.0, f64::NAN]).unwrap();

    let img = render_layer(&grid, &gradient, Rgb::WHITE).unwrap();

    assert_eq!(pixel_at(&img, 0, 0), Some(gradient.light));
    assert_eq!(pixel_at(&img, 0, 1), Some(gradient.base));
    assert_eq!(pixel_at(&img, 0, 2), Some(gradient.dark));
    assert_eq!(pixel_at(&img, 0, 3), Some(Rgb::WHITE));
}

#[test]
fn test_layer_infinite_cells_do_not_stretch_range() {
    let gradient = make_gradient("#666666", GradientFactors::LAYER).unwrap();
    let grid = Grid::new(1, 3, vec![2.0, f64::INFINITY, 6.0]).unwrap();

    let img = render_layer(&grid, &gradient, Rgb::WHITE).unwrap();

    assert_eq!(pixel_at(&img, 0, 0), Some(gradient.light));
    assert_eq!(pixel_at(&img, 0, 1), Some(Rgb::WHITE));
    assert_eq!(pixel_at(&img, 0, 2), Some(gradient.dark));
}

#[test]
fn test_constant_layer_is_midpoint() {
    let gradient = make_gradient("#FF6B35", GradientFactors::LAYER).unwrap();
    let img = render_layer(&Grid::filled(2, 2, 7.0), &gradient, Rgb::WHITE).unwrap();
    assert_eq!(pixel_at(&img, 1, 1), Some(gradient.base));
}

#[test]
fn test_all_nan_layer_is_error() {
    let gradient = make_gradient("#FF6B35", GradientFactors::LAYER).unwrap();
    assert!(render_layer(&Grid::filled(2, 2, f64::NAN), &gradient, Rgb::WHITE).is_err());
}

// ============================================================================
// JPEG output
// ============================================================================

#[test]
fn test_encode_jpeg_decodes_to_same_size() {
    let (gradient, palette) = risk_setup();
    let img = render_risk(&create_flood_grid(5, 3), &gradient, &palette).unwrap();

    let bytes = encode_jpeg(&img, DEFAULT_JPEG_QUALITY).unwrap();
    assert_eq!(&bytes[..2], &[0xFF, 0xD8]);

    let decoded = image::load_from_memory(&bytes).unwrap();
    assert_eq!(decoded.width(), 3);
    assert_eq!(decoded.height(), 5);
}

#[test]
fn test_save_jpeg_writes_file() {
    let (gradient, palette) = risk_setup();
    let img = render_risk(&create_flood_grid(4, 4), &gradient, &palette).unwrap();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("riesgo.jpeg");

    let size = save_jpeg(&img, &path, DEFAULT_JPEG_QUALITY).unwrap();

    assert!(path.exists());
    assert_eq!(std::fs::metadata(&path).unwrap().len(), size);
}

#[test]
fn test_save_jpeg_missing_directory() {
    let (gradient, palette) = risk_setup();
    let img = render_risk(&Grid::filled(1, 1, 3.0), &gradient, &palette).unwrap();
    let dir = tempfile::tempdir().unwrap();

    let err = save_jpeg(&img, dir.path().join("missing/riesgo.jpeg"), 95).unwrap_err();
    assert!(matches!(err, RiskError::WriteError { .. }));
}
