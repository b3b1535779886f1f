//! Grids laid out on a projected plane.
//!
//! The grid is axis aligned in projected space, so a geographic bbox maps to
//! a curved quadrilateral. Bounds and covering windows are found by
//! projecting sampled outlines rather than corners.

use crate::descriptor::{
    ProjectedFromBounds, ProjectedFromGeographicOrigin, ProjectedFromProjectedOrigin,
};
use crate::error::Result;
use crate::interpolation::{interpolate_linear, IndexAndFractions};
use crate::precision::{axis_precision, to_fixed};
use crate::SampleGrid;
use projection::{Project, Projection};
use std::ops::ControlFlow;
use std::sync::OnceLock;
use tile_common::{full_ranges, BoundingBox, Center, DimensionRange};
use tracing::trace;

/// Step, in degrees, used when tracing a bbox outline into projected space.
pub const OUTLINE_STEP: f64 = 0.01;

/// How the grid origin and cell size are obtained.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OriginSpec {
    /// Two geographic corners `(lat, lon)`; cell size is derived from them.
    Bounds { south_west: (f64, f64), north_east: (f64, f64) },
    /// A geographic point that is projected to become the origin.
    Geographic { lat: f64, lon: f64, dx: f64, dy: f64 },
    /// An origin already in projected coordinates.
    Projected { x: f64, y: f64, dx: f64, dy: f64 },
}

/// Grid on a projected plane, restricted to an index window.
#[derive(Debug)]
pub struct ProjectedGrid {
    projection: Projection,
    /// Declared grid size.
    full_nx: usize,
    full_ny: usize,
    /// Window size.
    nx: usize,
    ny: usize,
    origin: (f64, f64),
    dx: f64,
    dy: f64,
    /// Projected coordinates of the window's first cell.
    min_x: f64,
    min_y: f64,
    bounds: OnceLock<BoundingBox>,
}

impl ProjectedGrid {
    pub fn new(
        projection: Projection,
        origin: OriginSpec,
        nx: usize,
        ny: usize,
        ranges: Option<[DimensionRange; 2]>,
    ) -> Self {
        let [rows, cols] = ranges.unwrap_or_else(|| full_ranges(nx, ny));

        let (origin, dx, dy) = match origin {
            OriginSpec::Bounds {
                south_west,
                north_east,
            } => {
                let sw = projection.forward(south_west.0, south_west.1);
                let ne = projection.forward(north_east.0, north_east.1);
                (sw, (ne.0 - sw.0) / nx as f64, (ne.1 - sw.1) / ny as f64)
            }
            OriginSpec::Geographic { lat, lon, dx, dy } => (projection.forward(lat, lon), dx, dy),
            OriginSpec::Projected { x, y, dx, dy } => ((x, y), dx, dy),
        };

        let min_x = origin.0 + dx * cols.start as f64;
        let min_y = origin.1 + dy * rows.start as f64;
        trace!(
            projection = %projection.kind(),
            origin_x = origin.0,
            origin_y = origin.1,
            dx,
            dy,
            nx = cols.len(),
            ny = rows.len(),
            "projected grid resolved"
        );

        Self {
            projection,
            full_nx: nx,
            full_ny: ny,
            nx: cols.len(),
            ny: rows.len(),
            origin,
            dx,
            dy,
            min_x,
            min_y,
            bounds: OnceLock::new(),
        }
    }

    pub fn from_bounds(
        data: &ProjectedFromBounds,
        ranges: Option<[DimensionRange; 2]>,
    ) -> Result<Self> {
        let projection = Projection::from_params(&data.projection)?;
        let origin = OriginSpec::Bounds {
            south_west: (data.latitude_bounds[0], data.longitude_bounds[0]),
            north_east: (data.latitude_bounds[1], data.longitude_bounds[1]),
        };
        Ok(Self::new(projection, origin, data.nx, data.ny, ranges))
    }

    pub fn from_geographic_origin(
        data: &ProjectedFromGeographicOrigin,
        ranges: Option<[DimensionRange; 2]>,
    ) -> Result<Self> {
        let projection = Projection::from_params(&data.projection)?;
        let origin = OriginSpec::Geographic {
            lat: data.latitude,
            lon: data.longitude,
            dx: data.dx,
            dy: data.dy,
        };
        Ok(Self::new(projection, origin, data.nx, data.ny, ranges))
    }

    pub fn from_projected_origin(
        data: &ProjectedFromProjectedOrigin,
        ranges: Option<[DimensionRange; 2]>,
    ) -> Result<Self> {
        let projection = Projection::from_params(&data.projection)?;
        let origin = OriginSpec::Projected {
            x: data.projected_longitude_origin,
            y: data.projected_latitude_origin,
            dx: data.dx,
            dy: data.dy,
        };
        Ok(Self::new(projection, origin, data.nx, data.ny, ranges))
    }

    /// Cell index and fractions of `(lat, lon)` within the window.
    pub fn find_point_interpolated(&self, lat: f64, lon: f64) -> IndexAndFractions {
        let (px, py) = self.projection.forward(lat, lon);
        let x = (px - self.min_x) / self.dx;
        let y = (py - self.min_y) / self.dy;

        let inside = x >= 0.0 && x < self.nx as f64 && y >= 0.0 && y < self.ny as f64;
        if !inside {
            return IndexAndFractions::outside();
        }

        let index = y.floor() as usize * self.nx + x.floor() as usize;
        IndexAndFractions::new(index, x - x.floor(), y - y.floor())
    }

    /// Projected points along the window border, counter-clockwise from the
    /// south-west corner.
    pub fn border_points(&self) -> Vec<(f64, f64)> {
        let (x0, y0) = (self.min_x, self.min_y);
        let (dx, dy) = (self.dx, self.dy);
        let (nx, ny) = (self.nx, self.ny);

        let mut points = Vec::with_capacity(2 * (nx + ny) + 2);
        points.extend((0..ny).map(|i| (x0, y0 + i as f64 * dy)));
        points.extend((0..nx).map(|i| (x0 + i as f64 * dx, y0 + ny as f64 * dy)));
        points.extend((0..=ny).rev().map(|i| (x0 + nx as f64 * dx, y0 + i as f64 * dy)));
        points.extend((0..=nx).rev().map(|i| (x0 + i as f64 * dx, y0)));
        points
    }

    fn compute_bounds(&self) -> BoundingBox {
        let mut bounds = BoundingBox::new(180.0, 90.0, -180.0, -90.0);
        for (x, y) in self.border_points() {
            let (lat, lon) = self.projection.reverse(x, y);
            bounds.min_y = bounds.min_y.min(lat);
            bounds.max_y = bounds.max_y.max(lat);
            bounds.min_x = bounds.min_x.min(lon);
            bounds.max_x = bounds.max_x.max(lon);
        }
        bounds
    }
}

/// Local `(south, west, north, east)` extent in projected coordinates of a
/// geographic bbox, found by walking its outline.
///
/// Latitudes are clamped to the poles and the longitude span to one turn.
/// `None` for non-finite or empty input.
pub fn projected_extent<P: Project>(
    projection: &P,
    south: f64,
    west: f64,
    north: f64,
    east: f64,
) -> Option<(f64, f64, f64, f64)> {
    if ![south, west, north, east].iter().all(|v| v.is_finite()) {
        return None;
    }
    let south = south.max(-90.0);
    let north = north.min(90.0);
    let east = east.min(west + 360.0);

    let mut xs = Vec::new();
    let mut ys = Vec::new();
    let mut push = |lat: f64, lon: f64| {
        let (x, y) = projection.forward(lat, lon);
        xs.push(x);
        ys.push(y);
    };

    for lat in outline_steps(south, north) {
        push(lat, west);
    }
    for lon in outline_steps(west, east) {
        push(north, lon);
    }
    for lat in outline_steps(north, south) {
        push(lat, east);
    }
    for lon in outline_steps(east, west) {
        push(south, lon);
    }

    if xs.is_empty() {
        return None;
    }
    let min = |v: &[f64]| v.iter().copied().fold(f64::INFINITY, f64::min);
    let max = |v: &[f64]| v.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    Some((min(&ys), min(&xs), max(&ys), max(&xs)))
}

/// Positions from `from` towards `to` in `OUTLINE_STEP` increments, `to`
/// excluded.
fn outline_steps(from: f64, to: f64) -> impl Iterator<Item = f64> {
    let step = if to >= from { OUTLINE_STEP } else { -OUTLINE_STEP };
    let count = ((to - from) / step).ceil().max(0.0) as usize;
    (0..count).map(move |i| from + step * i as f64)
}

/// Index window along one axis for a snapped `[low, high]` extent.
fn axis_window(low: f64, high: f64, origin: f64, step: f64, len: usize) -> DimensionRange {
    let len_f = len as f64;
    // A negative step walks the axis backwards, so the extent ends swap.
    let (from, to) = if step > 0.0 { (low, high) } else { (high, low) };
    let start = ((from - origin) / step - 1.0).floor().max(0.0).min(len_f);
    let end = ((to - origin) / step + 1.0).ceil().min(len_f).max(0.0);
    DimensionRange::new(start as usize, end as usize)
}

impl SampleGrid for ProjectedGrid {
    fn value_at(&self, values: &[f32], lat: f64, lon: f64) -> f64 {
        interpolate_linear(values, self.find_point_interpolated(lat, lon), self.nx)
    }

    fn bounds(&self) -> BoundingBox {
        *self.bounds.get_or_init(|| self.compute_bounds())
    }

    fn center(&self) -> Center {
        self.bounds().center()
    }

    fn covering_range(&self, south: f64, west: f64, north: f64, east: f64) -> [DimensionRange; 2] {
        let (dx, dy) = (self.dx, self.dy);
        let (x_precision, y_precision) = axis_precision(dx, dy);
        let Some((s, w, n, e)) = projected_extent(&self.projection, south, west, north, east)
        else {
            return [DimensionRange::new(0, 0), DimensionRange::new(0, 0)];
        };

        let s = to_fixed(s - s % dy, y_precision);
        let w = to_fixed(w - w % dx, x_precision);
        let n = to_fixed(n - n % dy + dy, y_precision);
        let e = to_fixed(e - e % dx + dx, x_precision);

        let (origin_x, origin_y) = self.origin;
        [
            axis_window(s, n, origin_y, dy, self.full_ny),
            axis_window(w, e, origin_x, dx, self.full_nx),
        ]
    }

    fn for_each_point<F>(&self, mut f: F)
    where
        F: FnMut(usize, f64, f64) -> ControlFlow<()>,
    {
        for row in 0..self.ny {
            let y = self.min_y + self.dy * row as f64;
            for col in 0..self.nx {
                let x = self.min_x + self.dx * col as f64;
                let (lat, lon) = self.projection.reverse(x, y);
                if f(row * self.nx + col, lat, lon).is_break() {
                    return;
                }
            }
        }
    }
}
