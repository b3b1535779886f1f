//! Small numeric helpers shared by the projection, grid and renderer crates.

use std::f64::consts::PI;

/// Degrees to radians, computed as `deg * (PI / 180)`.
#[inline]
pub fn degrees_to_radians(degrees: f64) -> f64 {
    degrees * (PI / 180.0)
}

/// Radians to degrees, computed as `rad * (180 / PI)`.
#[inline]
pub fn radians_to_degrees(radians: f64) -> f64 {
    radians * (180.0 / PI)
}

/// Remainder that is always in `[0, m)` for positive `m`.
#[inline]
pub fn mod_positive(n: f64, m: f64) -> f64 {
    ((n % m) + m) % m
}

/// Rotate `(x, y)` around `(cx, cy)` by `theta` radians.
pub fn rotate_point(cx: f64, cy: f64, theta: f64, x: f64, y: f64) -> (f64, f64) {
    let (sin, cos) = theta.sin_cos();
    let xt = cos * (x - cx) - sin * (y - cy) + cx;
    let yt = sin * (x - cx) + cos * (y - cy) + cy;
    (xt, yt)
}

/// Round to the nearest integer with ties going towards positive infinity.
///
/// `f64::round` sends `-0.5` to `-1`; tile coordinates need `-0.5 -> 0` so
/// that lines on both sides of a pixel edge snap to the same integer.
#[inline]
pub fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_angle_conversions() {
        assert!((degrees_to_radians(180.0) - PI).abs() < 1e-15);
        assert!((radians_to_degrees(PI / 2.0) - 90.0).abs() < 1e-12);
        assert_eq!(degrees_to_radians(-8.0), -0.13962634015954636);
    }

    #[test]
    fn test_mod_positive() {
        assert_eq!(mod_positive(-1.0, 10.0), 9.0);
        assert_eq!(mod_positive(11.0, 10.0), 1.0);
        assert!((mod_positive(-0.25, 1.0) - 0.75).abs() < 1e-15);
    }

    #[test]
    fn test_rotate_point() {
        let (x, y) = rotate_point(0.0, 0.0, PI / 2.0, 1.0, 0.0);
        assert!(x.abs() < 1e-12);
        assert!((y - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_round_half_up() {
        assert_eq!(round_half_up(-0.5), 0.0);
        assert_eq!(round_half_up(0.5), 1.0);
        assert_eq!(round_half_up(-1.5), -1.0);
        assert_eq!(round_half_up(2.4), 2.0);
    }
}
