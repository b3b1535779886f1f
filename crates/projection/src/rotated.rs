//! Rotated latitude/longitude grid (rotated pole) projection.
//!
//! Used by limited-area models such as COSMO and HARMONIE. The sphere is
//! rotated so that the model domain sits near the rotated equator, which
//! keeps grid cells close to square.

use crate::params::ProjectionParams;
use crate::{ProjectionError, Project, Result};
use nalgebra::{Matrix3, Vector3};
use tile_common::math::{degrees_to_radians, radians_to_degrees};

/// Rotated pole projection.
///
/// Projected coordinates are rotated `(longitude, latitude)` in degrees.
#[derive(Debug, Clone, PartialEq)]
pub struct RotatedLatLon {
    /// Polar angle of the rotation in radians (`90° + rotation[0]`).
    pub theta: f64,
    /// Azimuthal angle of the rotation in radians (`rotation[1]`).
    pub phi: f64,
    rotation: Matrix3<f64>,
}

impl RotatedLatLon {
    /// Build from the `(rotatedLat, rotatedLon)` pair in degrees.
    pub fn new(rotated_lat: f64, rotated_lon: f64) -> Self {
        let theta = degrees_to_radians(90.0 + rotated_lat);
        let phi = degrees_to_radians(rotated_lon);
        let (sin_t, cos_t) = theta.sin_cos();
        let (sin_p, cos_p) = phi.sin_cos();

        #[rustfmt::skip]
        let rotation = Matrix3::new(
            cos_t * cos_p,  cos_t * sin_p, sin_t,
            -sin_p,         cos_p,         0.0,
            -sin_t * cos_p, -sin_t * sin_p, cos_t,
        );

        Self {
            theta,
            phi,
            rotation,
        }
    }

    pub fn from_params(params: &ProjectionParams) -> Result<Self> {
        let [lat, lon] = params.rotation_pair().ok_or(ProjectionError::missing(
            "RotatedLatLonProjection",
            "rotatedLat/rotatedLon",
        ))?;
        Ok(Self::new(lat, lon))
    }
}

impl Project for RotatedLatLon {
    fn forward(&self, lat: f64, lon: f64) -> (f64, f64) {
        let lon = degrees_to_radians(lon);
        let lat = degrees_to_radians(lat);

        let cartesian = Vector3::new(lon.cos() * lat.cos(), lon.sin() * lat.cos(), lat.sin());
        let rotated = self.rotation * cartesian;

        let x = -radians_to_degrees(rotated.y.atan2(rotated.x));
        let y = -radians_to_degrees(rotated.z.asin());
        (x, y)
    }

    fn reverse(&self, x: f64, y: f64) -> (f64, f64) {
        let lon1 = degrees_to_radians(x);
        let lat1 = degrees_to_radians(y);
        let (sin_t, cos_t) = self.theta.sin_cos();

        // Closed-form inverse, no round trip through cartesian space.
        let lat2 = -(cos_t * lat1.sin() - lon1.cos() * sin_t * lat1.cos()).asin();
        let lon2 = -(lon1
            .sin()
            .atan2(lat1.tan() * sin_t + lon1.cos() * cos_t)
            - self.phi);

        let lon = ((radians_to_degrees(lon2) + 180.0) % 360.0) - 180.0;
        (radians_to_degrees(lat2), lon)
    }
}
