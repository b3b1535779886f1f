//! Bilinear sampling over a windowed, row-major sample array.

/// Cell index and fractional position of a geographic point inside a grid
/// window. `index` is `None` when the point falls outside the window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndexAndFractions {
    pub index: Option<usize>,
    pub x_fraction: f64,
    pub y_fraction: f64,
}

impl IndexAndFractions {
    pub fn outside() -> Self {
        Self {
            index: None,
            x_fraction: 0.0,
            y_fraction: 0.0,
        }
    }

    pub fn new(index: usize, x_fraction: f64, y_fraction: f64) -> Self {
        Self {
            index: Some(index),
            x_fraction,
            y_fraction,
        }
    }
}

#[inline]
fn read(values: &[f32], index: usize) -> f64 {
    values.get(index).map_or(f64::NAN, |v| *v as f64)
}

/// Bilinear interpolation between the cell at `index` and its right, lower
/// and lower-right neighbours in a window `nx` columns wide.
///
/// Neighbours past the end of the array read as `NaN`, and any `NaN` corner
/// propagates into the result.
pub fn interpolate_linear(values: &[f32], position: IndexAndFractions, nx: usize) -> f64 {
    let Some(index) = position.index else {
        return f64::NAN;
    };
    let xf = position.x_fraction;
    let yf = position.y_fraction;

    let p0 = read(values, index);
    let p1 = read(values, index + 1);
    let p2 = read(values, index + nx);
    let p3 = read(values, index + nx + 1);

    p0 * (1.0 - xf) * (1.0 - yf) + p1 * xf * (1.0 - yf) + p2 * (1.0 - xf) * yf + p3 * xf * yf
}

/// Value of the cell at `index` without blending.
pub fn nearest(values: &[f32], position: IndexAndFractions) -> f64 {
    position.index.map_or(f64::NAN, |index| read(values, index))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bilinear_corners() {
        #[rustfmt::skip]
        let data: Vec<f32> = vec![
            1.0, 2.0,
            3.0, 4.0,
            5.0, 6.0,
        ];

        assert_eq!(interpolate_linear(&data, IndexAndFractions::new(0, 0.0, 0.0), 2), 1.0);
        assert_eq!(interpolate_linear(&data, IndexAndFractions::new(2, 0.0, 0.0), 2), 3.0);
        assert_eq!(interpolate_linear(&data, IndexAndFractions::new(0, 0.5, 0.5), 2), 2.5);
        assert_eq!(interpolate_linear(&data, IndexAndFractions::new(2, 0.5, 1.0), 2), 5.5);
    }

    #[test]
    fn test_bilinear_outside() {
        let data = vec![1.0f32; 4];
        assert!(interpolate_linear(&data, IndexAndFractions::outside(), 2).is_nan());
        assert!(nearest(&data, IndexAndFractions::outside()).is_nan());
    }

    #[test]
    fn test_bilinear_missing_neighbour() {
        let data = vec![1.0f32, 2.0, 3.0, 4.0];
        // Last row: the lower neighbours do not exist.
        assert!(interpolate_linear(&data, IndexAndFractions::new(2, 0.0, 0.0), 2).is_nan());
    }

    #[test]
    fn test_bilinear_nan_corner() {
        let data = vec![1.0f32, f32::NAN, 3.0, 4.0];
        assert!(interpolate_linear(&data, IndexAndFractions::new(0, 0.5, 0.5), 2).is_nan());
    }
}
