//! Test data generators for creating synthetic weather-like fields.
//!
//! These generators create predictable, verifiable test data patterns
//! that can be used across the test suite. All grids are row-major with
//! row 0 first.

/// Creates a grid whose values are their own flat index.
///
/// # Example
///
/// ```
/// use test_utils::create_index_grid;
///
/// let grid = create_index_grid(10, 3);
/// assert_eq!(grid.len(), 30);
/// assert_eq!(grid[11], 11.0);
/// ```
pub fn create_index_grid(width: usize, height: usize) -> Vec<f32> {
    (0..width * height).map(|i| i as f32).collect()
}

/// Creates a grid with predictable values: `col + row * stride`.
///
/// Used for partial windows, where each row restarts at a multiple of the
/// full grid width.
pub fn create_strided_grid(width: usize, height: usize, stride: usize) -> Vec<f32> {
    let mut data = Vec::with_capacity(width * height);
    for row in 0..height {
        for col in 0..width {
            data.push((col + row * stride) as f32);
        }
    }
    data
}

/// Creates a cone-shaped field peaking at `peak` in the grid center and
/// falling off linearly to zero at the corners.
///
/// Any threshold strictly between 0 and `peak` crosses it in one closed
/// loop.
pub fn create_cone_grid(width: usize, height: usize, peak: f32) -> Vec<f32> {
    let center_x = (width as f32 - 1.0) / 2.0;
    let center_y = (height as f32 - 1.0) / 2.0;
    let max_dist = (center_x * center_x + center_y * center_y).sqrt().max(f32::EPSILON);

    let mut data = Vec::with_capacity(width * height);
    for row in 0..height {
        for col in 0..width {
            let dx = col as f32 - center_x;
            let dy = row as f32 - center_y;
            let dist = (dx * dx + dy * dy).sqrt();
            data.push(peak * (1.0 - dist / max_dist));
        }
    }
    data
}

/// Creates a grid filled with a constant value.
pub fn create_constant_grid(width: usize, height: usize, value: f32) -> Vec<f32> {
    vec![value; width * height]
}

/// Replaces the values at the given `(col, row)` positions with NaN.
///
/// Useful for testing missing data handling.
pub fn with_nans(mut data: Vec<f32>, width: usize, nan_positions: &[(usize, usize)]) -> Vec<f32> {
    for &(col, row) in nan_positions {
        if let Some(value) = data.get_mut(row * width + col) {
            *value = f32::NAN;
        }
    }
    data
}
