//! Grid abstraction over weather model sample arrays.
//!
//! A grid maps geographic coordinates onto a flat, row-major `f32` array and
//! answers four questions about it: the interpolated value at a point, its
//! geographic bounds and center, and which index window covers a bbox.
//!
//! Three layouts are supported:
//! - [`RegularGrid`]: constant spacing in degrees
//! - [`ProjectedGrid`]: constant spacing on a projected plane
//! - [`GaussianSampler`]: the reduced Gaussian grid of global models
//!
//! # Example
//!
//! ```
//! use grid::{Grid, GridDescriptor, SampleGrid};
//!
//! let descriptor = GridDescriptor::from_json(
//!     r#"{"type":"regular","nx":10,"ny":3,"lonMin":10,"latMin":50,"dx":1,"dy":2}"#,
//! ).unwrap();
//! let grid = Grid::from_descriptor(&descriptor, None).unwrap();
//! let values: Vec<f32> = (0..30).map(|v| v as f32).collect();
//! assert_eq!(grid.value_at(&values, 52.0, 11.0), 11.0);
//! ```

pub mod descriptor;
pub mod error;
pub mod gaussian;
pub mod interpolation;
pub mod precision;
pub mod projected;
pub mod regular;

pub use descriptor::{
    GaussianGridData, GridDescriptor, ProjectedFromBounds, ProjectedFromGeographicOrigin,
    ProjectedFromProjectedOrigin, RegularGridData,
};
pub use error::{GridError, Result};
pub use gaussian::GaussianSampler;
pub use interpolation::IndexAndFractions;
pub use projected::{OriginSpec, ProjectedGrid};
pub use regular::RegularGrid;

use std::ops::ControlFlow;
use tile_common::{BoundingBox, Center, DimensionRange};

/// Operations every grid layout provides.
pub trait SampleGrid {
    /// Bilinearly interpolated value at `(lat, lon)`, `NaN` outside the
    /// materialized window or next to missing data.
    fn value_at(&self, values: &[f32], lat: f64, lon: f64) -> f64;

    /// Geographic bounds of the materialized window.
    fn bounds(&self) -> BoundingBox;

    fn center(&self) -> Center;

    /// `[rows, columns]` index window covering the bbox plus one cell of
    /// margin, clamped to the grid.
    fn covering_range(&self, south: f64, west: f64, north: f64, east: f64) -> [DimensionRange; 2];

    /// Visit every grid point of the window as `(index, lat, lon)` until the
    /// callback breaks.
    fn for_each_point<F>(&self, f: F)
    where
        F: FnMut(usize, f64, f64) -> ControlFlow<()>;
}

/// A grid of any supported layout.
#[derive(Debug)]
pub enum Grid {
    Regular(RegularGrid),
    Projected(ProjectedGrid),
    Gaussian(GaussianSampler),
}

impl Grid {
    /// Build the grid a descriptor describes, materialized over `ranges`
    /// (`[rows, columns]`) or over the whole grid when `None`.
    pub fn from_descriptor(
        descriptor: &GridDescriptor,
        ranges: Option<[DimensionRange; 2]>,
    ) -> Result<Self> {
        descriptor.validate()?;
        let grid = match descriptor {
            GridDescriptor::Regular(data) => Grid::Regular(RegularGrid::new(data.clone(), ranges)),
            GridDescriptor::ProjectedFromBounds(data) => {
                Grid::Projected(ProjectedGrid::from_bounds(data, ranges)?)
            }
            GridDescriptor::ProjectedFromGeographicOrigin(data) => {
                Grid::Projected(ProjectedGrid::from_geographic_origin(data, ranges)?)
            }
            GridDescriptor::ProjectedFromProjectedOrigin(data) => {
                Grid::Projected(ProjectedGrid::from_projected_origin(data, ranges)?)
            }
            GridDescriptor::Gaussian(data) => Grid::Gaussian(GaussianSampler::new(data.clone())),
        };
        Ok(grid)
    }
}

impl SampleGrid for Grid {
    fn value_at(&self, values: &[f32], lat: f64, lon: f64) -> f64 {
        match self {
            Grid::Regular(g) => g.value_at(values, lat, lon),
            Grid::Projected(g) => g.value_at(values, lat, lon),
            Grid::Gaussian(g) => g.value_at(values, lat, lon),
        }
    }

    fn bounds(&self) -> BoundingBox {
        match self {
            Grid::Regular(g) => g.bounds(),
            Grid::Projected(g) => g.bounds(),
            Grid::Gaussian(g) => g.bounds(),
        }
    }

    fn center(&self) -> Center {
        match self {
            Grid::Regular(g) => g.center(),
            Grid::Projected(g) => g.center(),
            Grid::Gaussian(g) => g.center(),
        }
    }

    fn covering_range(&self, south: f64, west: f64, north: f64, east: f64) -> [DimensionRange; 2] {
        match self {
            Grid::Regular(g) => g.covering_range(south, west, north, east),
            Grid::Projected(g) => g.covering_range(south, west, north, east),
            Grid::Gaussian(g) => g.covering_range(south, west, north, east),
        }
    }

    fn for_each_point<F>(&self, f: F)
    where
        F: FnMut(usize, f64, f64) -> ControlFlow<()>,
    {
        match self {
            Grid::Regular(g) => g.for_each_point(f),
            Grid::Projected(g) => g.for_each_point(f),
            Grid::Gaussian(g) => g.for_each_point(f),
        }
    }
}
