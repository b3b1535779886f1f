//! Grid descriptors as they appear in domain metadata.
//!
//! The JSON shape is tagged by `type`:
//!
//! ```json
//! {"type": "regular", "nx": 10, "ny": 3, "lonMin": 10, "latMin": 50, "dx": 1, "dy": 2}
//! ```

use crate::error::{GridError, Result};
use projection::ProjectionParams;
use serde::{Deserialize, Serialize};

/// One grid definition, selected by its `type` tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum GridDescriptor {
    Regular(RegularGridData),
    ProjectedFromBounds(ProjectedFromBounds),
    ProjectedFromGeographicOrigin(ProjectedFromGeographicOrigin),
    ProjectedFromProjectedOrigin(ProjectedFromProjectedOrigin),
    Gaussian(GaussianGridData),
}

/// Equirectangular grid with a south-west origin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegularGridData {
    pub nx: usize,
    pub ny: usize,
    pub lon_min: f64,
    pub lat_min: f64,
    pub dx: f64,
    pub dy: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zoom: Option<f64>,
}

/// Projected grid spanning two geographic corners; cell size is derived.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectedFromBounds {
    pub nx: usize,
    pub ny: usize,
    pub projection: ProjectionParams,
    /// `[south, north]`.
    pub latitude_bounds: [f64; 2],
    /// `[west, east]`.
    pub longitude_bounds: [f64; 2],
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zoom: Option<f64>,
}

/// Projected grid whose origin is a geographic point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectedFromGeographicOrigin {
    pub nx: usize,
    pub ny: usize,
    pub projection: ProjectionParams,
    pub dx: f64,
    pub dy: f64,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zoom: Option<f64>,
}

/// Projected grid whose origin is already in projected coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectedFromProjectedOrigin {
    pub nx: usize,
    pub ny: usize,
    pub projection: ProjectionParams,
    pub dx: f64,
    pub dy: f64,
    /// Projected `y` of the origin.
    pub projected_latitude_origin: f64,
    /// Projected `x` of the origin.
    pub projected_longitude_origin: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zoom: Option<f64>,
}

/// Reduced Gaussian grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GaussianGridData {
    #[serde(default)]
    pub nx: usize,
    #[serde(default)]
    pub ny: usize,
    pub gaussian_grid_latitude_lines: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zoom: Option<f64>,
}

impl GridDescriptor {
    /// Parse and validate a descriptor from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        let descriptor: GridDescriptor = serde_json::from_str(json)?;
        descriptor.validate()?;
        Ok(descriptor)
    }

    /// Reject shapes no grid can be built from.
    pub fn validate(&self) -> Result<()> {
        match self {
            GridDescriptor::Gaussian(data) => {
                if data.gaussian_grid_latitude_lines == 0 {
                    return Err(GridError::invalid_descriptor(
                        "gaussianGridLatitudeLines must be > 0",
                    ));
                }
            }
            _ => {
                let (nx, ny) = self.dimensions();
                if nx == 0 || ny == 0 {
                    return Err(GridError::invalid_descriptor(format!(
                        "grid dimensions must be non-zero, got {}x{}",
                        nx, ny
                    )));
                }
                if let Some((dx, dy)) = self.spacing() {
                    if dx == 0.0 || dy == 0.0 || !dx.is_finite() || !dy.is_finite() {
                        return Err(GridError::invalid_descriptor(format!(
                            "grid spacing must be finite and non-zero, got {}x{}",
                            dx, dy
                        )));
                    }
                }
            }
        }
        Ok(())
    }

    /// `(nx, ny)` as declared.
    pub fn dimensions(&self) -> (usize, usize) {
        match self {
            GridDescriptor::Regular(d) => (d.nx, d.ny),
            GridDescriptor::ProjectedFromBounds(d) => (d.nx, d.ny),
            GridDescriptor::ProjectedFromGeographicOrigin(d) => (d.nx, d.ny),
            GridDescriptor::ProjectedFromProjectedOrigin(d) => (d.nx, d.ny),
            GridDescriptor::Gaussian(d) => (d.nx, d.ny),
        }
    }

    /// Declared `(dx, dy)`, absent for shapes that derive or do not use it.
    pub fn spacing(&self) -> Option<(f64, f64)> {
        match self {
            GridDescriptor::Regular(d) => Some((d.dx, d.dy)),
            GridDescriptor::ProjectedFromGeographicOrigin(d) => Some((d.dx, d.dy)),
            GridDescriptor::ProjectedFromProjectedOrigin(d) => Some((d.dx, d.dy)),
            GridDescriptor::ProjectedFromBounds(_) | GridDescriptor::Gaussian(_) => None,
        }
    }

    /// Projection parameters of the projected shapes.
    pub fn projection(&self) -> Option<&ProjectionParams> {
        match self {
            GridDescriptor::ProjectedFromBounds(d) => Some(&d.projection),
            GridDescriptor::ProjectedFromGeographicOrigin(d) => Some(&d.projection),
            GridDescriptor::ProjectedFromProjectedOrigin(d) => Some(&d.projection),
            GridDescriptor::Regular(_) | GridDescriptor::Gaussian(_) => None,
        }
    }

    pub fn zoom(&self) -> Option<f64> {
        match self {
            GridDescriptor::Regular(d) => d.zoom,
            GridDescriptor::ProjectedFromBounds(d) => d.zoom,
            GridDescriptor::ProjectedFromGeographicOrigin(d) => d.zoom,
            GridDescriptor::ProjectedFromProjectedOrigin(d) => d.zoom,
            GridDescriptor::Gaussian(d) => d.zoom,
        }
    }
}
