//! Oblique and polar stereographic projection.

use crate::params::{require, ProjectionParams};
use crate::{Project, Result};
use tile_common::math::{degrees_to_radians, radians_to_degrees};

/// Sphere radius used when the parameters carry none.
pub const DEFAULT_RADIUS: f64 = 6371229.0;

const NAME: &str = "StereographicProjection";

#[derive(Debug, Clone, PartialEq)]
pub struct Stereographic {
    /// Central longitude in radians.
    pub lambda0: f64,
    sin_phi1: f64,
    cos_phi1: f64,
    pub radius: f64,
}

impl Stereographic {
    /// Build from the center `(latitude, longitude)` in degrees.
    pub fn new(latitude: f64, longitude: f64, radius: Option<f64>) -> Self {
        let (sin_phi1, cos_phi1) = degrees_to_radians(latitude).sin_cos();
        Self {
            lambda0: degrees_to_radians(longitude),
            sin_phi1,
            cos_phi1,
            radius: radius.unwrap_or(DEFAULT_RADIUS),
        }
    }

    pub fn from_params(params: &ProjectionParams) -> Result<Self> {
        Ok(Self::new(
            require(params.latitude, NAME, "latitude")?,
            require(params.longitude, NAME, "longitude")?,
            params.radius.filter(|r| *r != 0.0),
        ))
    }
}

impl Project for Stereographic {
    fn forward(&self, lat: f64, lon: f64) -> (f64, f64) {
        let phi = degrees_to_radians(lat);
        let dl = degrees_to_radians(lon) - self.lambda0;

        let k = (2.0 * self.radius)
            / (1.0 + self.sin_phi1 * phi.sin() + self.cos_phi1 * phi.cos() * dl.cos());
        let x = k * phi.cos() * dl.sin();
        let y = k * (self.cos_phi1 * phi.sin() - self.sin_phi1 * phi.cos() * dl.cos());
        (x, y)
    }

    fn reverse(&self, x: f64, y: f64) -> (f64, f64) {
        let p = (x * x + y * y).sqrt();
        let c = 2.0 * p.atan2(2.0 * self.radius);
        let (sin_c, cos_c) = c.sin_cos();

        let phi = (cos_c * self.sin_phi1 + (y * sin_c * self.cos_phi1) / p).asin();
        let lambda = self.lambda0
            + (x * sin_c).atan2(p * self.cos_phi1 * cos_c - y * self.sin_phi1 * sin_c);

        (radians_to_degrees(phi), radians_to_degrees(lambda))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_polar_roundtrip() {
        let proj = Stereographic::new(90.0, -105.0, None);
        for (lat, lon) in [(60.0, -105.0), (45.0, -150.0), (70.0, -30.0)] {
            let (x, y) = proj.forward(lat, lon);
            let (lat2, lon2) = proj.reverse(x, y);
            assert!((lat - lat2).abs() < 1e-6, "lat {} vs {}", lat, lat2);
            assert!((lon - lon2).abs() < 1e-6, "lon {} vs {}", lon, lon2);
        }
    }

    #[test]
    fn test_missing_center() {
        let mut params = ProjectionParams::named("StereographicProjection");
        params.latitude = Some(90.0);
        assert!(Stereographic::from_params(&params).is_err());
    }
}
