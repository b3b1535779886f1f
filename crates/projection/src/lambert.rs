//! Lambert Conformal Conic projection.
//!
//! Used by most regional models (DMI HARMONIE, HRRR, AROME). A cone secant
//! to the sphere at two standard parallels is unrolled onto the plane; when
//! both parallels coincide the cone is tangent and the one-parallel form is
//! used.
//!
//! Projected coordinates are in the unit of `R` (meters for the usual
//! `radius = 6371229`).

use crate::params::{require, ProjectionParams};
use crate::{Project, Result};
use std::f64::consts::{FRAC_PI_2, FRAC_PI_4};
use tile_common::math::{degrees_to_radians, radians_to_degrees};

/// Sphere radius used when the parameters carry none.
pub const DEFAULT_RADIUS: f64 = 6370.997;

const NAME: &str = "LambertConformalConicProjection";

/// Lambert Conformal Conic projection on a sphere.
#[derive(Debug, Clone, PartialEq)]
pub struct LambertConformalConic {
    /// Central meridian in radians, normalized to `[-π, π)`.
    pub lambda0: f64,
    /// Cone constant.
    pub n: f64,
    /// Scale constant.
    pub f: f64,
    /// Radius of the reference parallel on the unit sphere.
    pub rho0: f64,
    /// Sphere radius.
    pub radius: f64,
}

impl LambertConformalConic {
    /// Build from degrees: central meridian, reference latitude and the two
    /// standard parallels.
    pub fn new(lambda0: f64, phi0: f64, phi1: f64, phi2: f64, radius: Option<f64>) -> Self {
        let lambda0 = degrees_to_radians(((lambda0 + 180.0) % 360.0) - 180.0);
        let phi0 = degrees_to_radians(phi0);
        let phi1 = degrees_to_radians(phi1);
        let phi2 = degrees_to_radians(phi2);

        let n = if phi1 == phi2 {
            phi1.sin()
        } else {
            (phi1.cos() / phi2.cos()).ln()
                / ((FRAC_PI_4 + phi2 / 2.0).tan() / (FRAC_PI_4 + phi1 / 2.0).tan()).ln()
        };
        let f = (phi1.cos() * (FRAC_PI_4 + phi1 / 2.0).tan().powf(n)) / n;
        let rho0 = f / (FRAC_PI_4 + phi0 / 2.0).tan().powf(n);

        Self {
            lambda0,
            n,
            f,
            rho0,
            radius: radius.unwrap_or(DEFAULT_RADIUS),
        }
    }

    pub fn from_params(params: &ProjectionParams) -> Result<Self> {
        Ok(Self::new(
            require(params.lambda0, NAME, "λ0")?,
            require(params.phi0, NAME, "ϕ0")?,
            require(params.phi1, NAME, "ϕ1")?,
            require(params.phi2, NAME, "ϕ2")?,
            params.radius.filter(|r| *r != 0.0),
        ))
    }
}

impl Project for LambertConformalConic {
    fn forward(&self, lat: f64, lon: f64) -> (f64, f64) {
        let phi = degrees_to_radians(lat);
        let lambda = degrees_to_radians(lon);

        let theta = self.n * (lambda - self.lambda0);
        let p = self.f / (FRAC_PI_4 + phi / 2.0).tan().powf(self.n);

        let x = self.radius * p * theta.sin();
        let y = self.radius * (self.rho0 - p * theta.cos());
        (x, y)
    }

    fn reverse(&self, x: f64, y: f64) -> (f64, f64) {
        let xs = x / self.radius;
        let ys = y / self.radius;

        let theta = if self.n >= 0.0 {
            xs.atan2(self.rho0 - ys)
        } else {
            (-xs).atan2(ys - self.rho0)
        };
        let sign = if self.n > 0.0 { 1.0 } else { -1.0 };
        let rho = sign * (xs * xs + (self.rho0 - ys).powi(2)).sqrt();

        let phi = 2.0 * (self.f / rho).powf(1.0 / self.n).atan() - FRAC_PI_2;
        let lambda = radians_to_degrees(self.lambda0 + theta / self.n);

        let lon = if lambda > 180.0 { lambda - 360.0 } else { lambda };
        (radians_to_degrees(phi), lon)
    }
}
