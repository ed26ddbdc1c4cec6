//! Synthetic hazard layers with predictable values.
//!
//! Every generator is deterministic so failures reproduce exactly.

use risk_common::Grid;

/// Creates a test grid with predictable values.
///
/// Each cell value is calculated as: `col * 1000 + row`
///
/// # Example
///
/// ```
/// use test_utils::create_test_grid;
///
/// let grid = create_test_grid(5, 10);
/// assert_eq!(grid.len(), 50);
/// assert_eq!(grid.get(0, 1), Some(1000.0)); // row=0, col=1
/// assert_eq!(grid.get(1, 0), Some(1.0));    // row=1, col=0
/// ```
pub fn create_test_grid(rows: usize, cols: usize) -> Grid {
    let mut data = Vec::with_capacity(rows * cols);
    for row in 0..rows {
        for col in 0..cols {
            data.push((col * 1000 + row) as f64);
        }
    }
    grid(rows, cols, data)
}

/// Flood susceptibility on `[0, 10]`, increasing left to right.
///
/// The first column is exactly 0 so the no-data override can be exercised.
pub fn create_flood_grid(rows: usize, cols: usize) -> Grid {
    let mut data = Vec::with_capacity(rows * cols);
    for _row in 0..rows {
        for col in 0..cols {
            let t = col as f64 / (cols.max(2) - 1) as f64;
            data.push((t * 10.0).min(10.0));
        }
    }
    grid(rows, cols, data)
}

/// Raw landslide susceptibility, roughly slope-like values in `[0, 450]`.
pub fn create_landslide_grid(rows: usize, cols: usize) -> Grid {
    let mut data = Vec::with_capacity(rows * cols);
    for row in 0..rows {
        for col in 0..cols {
            let t = (row + col) as f64 / (rows + cols).max(2) as f64;
            data.push(t * 450.0);
        }
    }
    grid(rows, cols, data)
}

/// Water presence: 1 except for a deterministic scatter of dry cells.
pub fn create_water_grid(rows: usize, cols: usize, seed: u32) -> Grid {
    binary_grid(rows, cols, seed, |hash| hash % 5 != 0)
}

/// Urban fraction on `[0, 1]`, concentrated in the top-left corner.
pub fn create_urban_grid(rows: usize, cols: usize) -> Grid {
    let mut data = Vec::with_capacity(rows * cols);
    for row in 0..rows {
        for col in 0..cols {
            let urban = if row < rows / 4 && col < cols / 4 { 1.0 } else { 0.0 };
            data.push(urban);
        }
    }
    grid(rows, cols, data)
}

/// Protected-area mask: 0 or 1.
pub fn create_protected_grid(rows: usize, cols: usize, seed: u32) -> Grid {
    binary_grid(rows, cols, seed, |hash| hash % 3 != 0)
}

/// Creates a grid filled with a constant value.
pub fn create_constant_grid(rows: usize, cols: usize, value: f64) -> Grid {
    Grid::filled(rows, cols, value)
}

fn binary_grid(rows: usize, cols: usize, seed: u32, on: impl Fn(u32) -> bool) -> Grid {
    let mut data = Vec::with_capacity(rows * cols);
    for row in 0..rows {
        for col in 0..cols {
            let hash = simple_hash(col as u32, row as u32, seed);
            data.push(if on(hash) { 1.0 } else { 0.0 });
        }
    }
    grid(rows, cols, data)
}

fn grid(rows: usize, cols: usize, data: Vec<f64>) -> Grid {
    Grid::new(rows, cols, data).expect("generator produced a rectangular grid")
}

/// Simple deterministic hash for reproducible test data.
fn simple_hash(x: u32, y: u32, seed: u32) -> u32 {
    let mut h = seed;
    h = h.wrapping_mul(31).wrapping_add(x);
    h = h.wrapping_mul(31).wrapping_add(y);
    h ^= h >> 16;
    h = h.wrapping_mul(0x85ebca6b);
    h ^= h >> 13;
    h = h.wrapping_mul(0xc2b2ae35);
    h ^= h >> 16;
    h
}
