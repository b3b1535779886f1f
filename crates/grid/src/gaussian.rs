//! Reduced Gaussian grids exposed through [`SampleGrid`].
//!
//! No windowing is implemented: bounds are global and the covering range is
//! always the whole array.

use crate::descriptor::GaussianGridData;
use crate::SampleGrid;
use projection::GaussianGrid;
use std::ops::ControlFlow;
use tile_common::{BoundingBox, Center, DimensionRange};

#[derive(Debug, Clone, PartialEq)]
pub struct GaussianSampler {
    data: GaussianGridData,
    grid: GaussianGrid,
}

impl GaussianSampler {
    pub fn new(data: GaussianGridData) -> Self {
        let grid = GaussianGrid::new(data.gaussian_grid_latitude_lines);
        Self { data, grid }
    }

    pub fn grid(&self) -> &GaussianGrid {
        &self.grid
    }
}

impl SampleGrid for GaussianSampler {
    fn value_at(&self, values: &[f32], lat: f64, lon: f64) -> f64 {
        self.grid.interpolate_linear(values, lat, lon)
    }

    fn bounds(&self) -> BoundingBox {
        BoundingBox::global()
    }

    fn center(&self) -> Center {
        Center { lng: 0.0, lat: 0.0 }
    }

    fn covering_range(&self, _south: f64, _west: f64, _north: f64, _east: f64) -> [DimensionRange; 2] {
        // Descriptors that omit nx/ny address the flat array as one row.
        if self.data.nx == 0 || self.data.ny == 0 {
            return [DimensionRange::full(1), DimensionRange::full(self.grid.count())];
        }
        [
            DimensionRange::full(self.data.ny),
            DimensionRange::full(self.data.nx),
        ]
    }

    fn for_each_point<F>(&self, mut f: F)
    where
        F: FnMut(usize, f64, f64) -> ControlFlow<()>,
    {
        for gridpoint in 0..self.grid.count() {
            let (lat, lon) = self.grid.coordinates(gridpoint);
            if f(gridpoint, lat, lon).is_break() {
                return;
            }
        }
    }
}
