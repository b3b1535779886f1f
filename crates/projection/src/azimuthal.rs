//! Lambert Azimuthal Equal-Area projection.

use crate::params::{require, ProjectionParams};
use crate::{Project, Result};
use tile_common::math::{degrees_to_radians, radians_to_degrees};

/// Sphere radius used when the parameters carry none.
pub const DEFAULT_RADIUS: f64 = 6371229.0;

const NAME: &str = "LambertAzimuthalEqualAreaProjection";

/// Lambert Azimuthal Equal-Area projection centered at `(ϕ1, λ0)`.
///
/// The projection center itself is singular on the reverse path (`ρ = 0`).
#[derive(Debug, Clone, PartialEq)]
pub struct LambertAzimuthalEqualArea {
    /// Central longitude in radians.
    pub lambda0: f64,
    /// Central latitude in radians.
    pub phi1: f64,
    pub radius: f64,
}

impl LambertAzimuthalEqualArea {
    pub fn new(lambda0: f64, phi1: f64, radius: Option<f64>) -> Self {
        Self {
            lambda0: degrees_to_radians(lambda0),
            phi1: degrees_to_radians(phi1),
            radius: radius.unwrap_or(DEFAULT_RADIUS),
        }
    }

    pub fn from_params(params: &ProjectionParams) -> Result<Self> {
        Ok(Self::new(
            require(params.lambda0, NAME, "λ0")?,
            require(params.phi1, NAME, "ϕ1")?,
            params.radius.filter(|r| *r != 0.0),
        ))
    }
}

impl Project for LambertAzimuthalEqualArea {
    fn forward(&self, lat: f64, lon: f64) -> (f64, f64) {
        let lambda = degrees_to_radians(lon);
        let phi = degrees_to_radians(lat);
        let (sin_phi1, cos_phi1) = self.phi1.sin_cos();
        let dl = lambda - self.lambda0;

        let k = (2.0 / (1.0 + sin_phi1 * phi.sin() + cos_phi1 * phi.cos() * dl.cos())).sqrt();

        let x = self.radius * k * phi.cos() * dl.sin();
        let y = self.radius * k * (cos_phi1 * phi.sin() - sin_phi1 * phi.cos() * dl.cos());
        (x, y)
    }

    fn reverse(&self, x: f64, y: f64) -> (f64, f64) {
        let x = x / self.radius;
        let y = y / self.radius;
        let (sin_phi1, cos_phi1) = self.phi1.sin_cos();

        let rho = (x * x + y * y).sqrt();
        let c = 2.0 * (0.5 * rho).asin();
        let (sin_c, cos_c) = c.sin_cos();

        let phi = (cos_c * sin_phi1 + (y * sin_c * cos_phi1) / rho).asin();
        // atan, not atan2: longitudes more than 90° from λ0 fold back.
        let lambda = self.lambda0
            + ((x * sin_c) / (rho * cos_phi1 * cos_c - y * sin_phi1 * sin_c)).atan();

        (radians_to_degrees(phi), radians_to_degrees(lambda))
    }
}
