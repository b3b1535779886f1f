//! Coordinate reference system transformations.
//!
//! Implements the map projections used by regional weather models from
//! scratch, plus the reduced Gaussian grid used by global models.
//!
//! Every projection maps geographic `(lat, lon)` in degrees to a projected
//! `(x, y)` pair and back. Parameters are fixed at construction; a
//! [`Projection`] is immutable and cheap to share between threads.

pub mod azimuthal;
pub mod error;
pub mod gaussian;
pub mod lambert;
pub mod mercator;
pub mod params;
pub mod rotated;
pub mod stereographic;

pub use azimuthal::LambertAzimuthalEqualArea;
pub use error::{ProjectionError, Result};
pub use gaussian::GaussianGrid;
pub use lambert::LambertConformalConic;
pub use mercator::MercatorProjection;
pub use params::{ProjectionKind, ProjectionParams};
pub use rotated::RotatedLatLon;
pub use stereographic::Stereographic;

/// Forward and reverse transform between geographic and projected space.
pub trait Project {
    /// Geographic `(lat, lon)` in degrees to projected `(x, y)`.
    fn forward(&self, lat: f64, lon: f64) -> (f64, f64);

    /// Projected `(x, y)` back to geographic `(lat, lon)` in degrees.
    fn reverse(&self, x: f64, y: f64) -> (f64, f64);
}

/// One of the supported projections, resolved once from its parameters.
#[derive(Debug, Clone, PartialEq)]
pub enum Projection {
    Mercator(MercatorProjection),
    RotatedLatLon(RotatedLatLon),
    LambertConformalConic(LambertConformalConic),
    LambertAzimuthalEqualArea(LambertAzimuthalEqualArea),
    Stereographic(Stereographic),
}

impl Projection {
    /// Build a projection from its parameter record.
    ///
    /// Fails when the `name` tag is unknown or a parameter the selected
    /// projection needs is absent.
    pub fn from_params(params: &ProjectionParams) -> Result<Self> {
        let kind: ProjectionKind = params.name.parse()?;
        let projection = match kind {
            ProjectionKind::Mercator => Projection::Mercator(MercatorProjection),
            ProjectionKind::RotatedLatLon => {
                Projection::RotatedLatLon(RotatedLatLon::from_params(params)?)
            }
            ProjectionKind::LambertConformalConic => {
                Projection::LambertConformalConic(LambertConformalConic::from_params(params)?)
            }
            ProjectionKind::LambertAzimuthalEqualArea => Projection::LambertAzimuthalEqualArea(
                LambertAzimuthalEqualArea::from_params(params)?,
            ),
            ProjectionKind::Stereographic => {
                Projection::Stereographic(Stereographic::from_params(params)?)
            }
        };
        Ok(projection)
    }

    /// Which variant this is.
    pub fn kind(&self) -> ProjectionKind {
        match self {
            Projection::Mercator(_) => ProjectionKind::Mercator,
            Projection::RotatedLatLon(_) => ProjectionKind::RotatedLatLon,
            Projection::LambertConformalConic(_) => ProjectionKind::LambertConformalConic,
            Projection::LambertAzimuthalEqualArea(_) => ProjectionKind::LambertAzimuthalEqualArea,
            Projection::Stereographic(_) => ProjectionKind::Stereographic,
        }
    }
}

impl Project for Projection {
    #[inline]
    fn forward(&self, lat: f64, lon: f64) -> (f64, f64) {
        match self {
            Projection::Mercator(p) => p.forward(lat, lon),
            Projection::RotatedLatLon(p) => p.forward(lat, lon),
            Projection::LambertConformalConic(p) => p.forward(lat, lon),
            Projection::LambertAzimuthalEqualArea(p) => p.forward(lat, lon),
            Projection::Stereographic(p) => p.forward(lat, lon),
        }
    }

    #[inline]
    fn reverse(&self, x: f64, y: f64) -> (f64, f64) {
        match self {
            Projection::Mercator(p) => p.reverse(x, y),
            Projection::RotatedLatLon(p) => p.reverse(x, y),
            Projection::LambertConformalConic(p) => p.reverse(x, y),
            Projection::LambertAzimuthalEqualArea(p) => p.reverse(x, y),
            Projection::Stereographic(p) => p.reverse(x, y),
        }
    }
}

impl TryFrom<&ProjectionParams> for Projection {
    type Error = ProjectionError;

    fn try_from(params: &ProjectionParams) -> Result<Self> {
        Projection::from_params(params)
    }
}
