//! Equirectangular grids with constant spacing in degrees.

use crate::descriptor::RegularGridData;
use crate::interpolation::{interpolate_linear, IndexAndFractions};
use crate::precision::{axis_precision, to_fixed};
use crate::SampleGrid;
use std::ops::ControlFlow;
use tile_common::{full_ranges, BoundingBox, Center, DimensionRange};
use tracing::trace;

/// Regular latitude/longitude grid restricted to an index window.
#[derive(Debug, Clone, PartialEq)]
pub struct RegularGrid {
    data: RegularGridData,
    ranges: [DimensionRange; 2],
    bounds: BoundingBox,
}

impl RegularGrid {
    /// Grid over `ranges` (`[rows, columns]`), or the whole grid when `None`.
    pub fn new(data: RegularGridData, ranges: Option<[DimensionRange; 2]>) -> Self {
        let ranges = ranges.unwrap_or_else(|| full_ranges(data.nx, data.ny));
        let [rows, cols] = ranges;

        let bounds = BoundingBox::new(
            data.lon_min + data.dx * cols.start as f64,
            data.lat_min + data.dy * rows.start as f64,
            data.lon_min + data.dx * cols.end as f64,
            data.lat_min + data.dy * rows.end as f64,
        );
        trace!(
            nx = cols.len(),
            ny = rows.len(),
            min_lon = bounds.min_x,
            min_lat = bounds.min_y,
            "regular grid window"
        );

        Self {
            data,
            ranges,
            bounds,
        }
    }

    /// Columns in the materialized window.
    fn window_nx(&self) -> usize {
        self.ranges[1].len()
    }

    /// Cell index and fractions of `(lat, lon)` within the window.
    pub fn find_point_interpolated(&self, lat: f64, lon: f64) -> IndexAndFractions {
        let b = &self.bounds;
        let inside = lat >= b.min_y && lat < b.max_y && lon >= b.min_x && lon < b.max_x;
        if !inside {
            return IndexAndFractions::outside();
        }

        let dx = self.data.dx;
        let dy = self.data.dy;
        let x = ((lon - b.min_x) / dx).floor() as usize;
        let y = ((lat - b.min_y) / dy).floor() as usize;
        let x_fraction = ((lon - b.min_x) % dx) / dx;
        let y_fraction = ((lat - b.min_y) % dy) / dy;

        IndexAndFractions::new(y * self.window_nx() + x, x_fraction, y_fraction)
    }
}

impl SampleGrid for RegularGrid {
    fn value_at(&self, values: &[f32], lat: f64, lon: f64) -> f64 {
        interpolate_linear(values, self.find_point_interpolated(lat, lon), self.window_nx())
    }

    fn bounds(&self) -> BoundingBox {
        self.bounds
    }

    fn center(&self) -> Center {
        self.bounds.center()
    }

    fn covering_range(&self, south: f64, west: f64, north: f64, east: f64) -> [DimensionRange; 2] {
        let RegularGridData {
            nx,
            ny,
            lon_min: origin_x,
            lat_min: origin_y,
            dx,
            dy,
            ..
        } = self.data;
        let (x_precision, y_precision) = axis_precision(dx, dy);

        // Snap to cell boundaries, one cell outward on the north/east side.
        let s = to_fixed(south - south % dy, y_precision);
        let w = to_fixed(west - west % dx, x_precision);
        let n = to_fixed(north - north % dy + dy, y_precision);
        let e = to_fixed(east - east % dx + dx, x_precision);

        let min_y = if s - origin_y < 0.0 {
            0
        } else {
            ((s - origin_y) / dy - 1.0).max(0.0).floor() as usize
        };
        let min_x = if w - origin_x < 0.0 {
            0
        } else {
            ((w - origin_x) / dx - 1.0).max(0.0).floor() as usize
        };
        let max_y = if n - origin_y < 0.0 {
            ny
        } else {
            ((n - origin_y) / dy + 1.0).min(ny as f64).ceil() as usize
        };
        let max_x = if e - origin_x < 0.0 {
            nx
        } else {
            ((e - origin_x) / dx + 1.0).min(nx as f64).ceil() as usize
        };

        [
            DimensionRange::new(min_y.min(ny), max_y),
            DimensionRange::new(min_x.min(nx), max_x),
        ]
    }

    fn for_each_point<F>(&self, mut f: F)
    where
        F: FnMut(usize, f64, f64) -> ControlFlow<()>,
    {
        let [rows, cols] = self.ranges;
        let nx = cols.len();
        for row in 0..rows.len() {
            let lat = self.bounds.min_y + self.data.dy * row as f64;
            for col in 0..nx {
                let lon = self.bounds.min_x + self.data.dx * col as f64;
                if f(row * nx + col, lat, lon).is_break() {
                    return;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid_data() -> RegularGridData {
        RegularGridData {
            nx: 10,
            ny: 3,
            lon_min: 10.0,
            lat_min: 50.0,
            dx: 1.0,
            dy: 2.0,
            zoom: None,
        }
    }

    #[test]
    fn test_find_point_fractions() {
        let grid = RegularGrid::new(grid_data(), None);
        let point = grid.find_point_interpolated(53.0, 11.25);
        assert_eq!(point.index, Some(11));
        assert!((point.x_fraction - 0.25).abs() < 1e-12);
        assert!((point.y_fraction - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_find_point_upper_edge_is_outside() {
        let grid = RegularGrid::new(grid_data(), None);
        assert_eq!(grid.find_point_interpolated(56.0, 11.0).index, None);
        assert_eq!(grid.find_point_interpolated(52.0, 20.0).index, None);
        assert_eq!(grid.find_point_interpolated(f64::NAN, 11.0).index, None);
    }

    #[test]
    fn test_for_each_point_stops_early() {
        let grid = RegularGrid::new(grid_data(), None);
        let mut visited = Vec::new();
        grid.for_each_point(|index, lat, lon| {
            visited.push((index, lat, lon));
            if index == 11 {
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        });
        assert_eq!(visited.len(), 12);
        assert_eq!(visited[11], (11, 52.0, 11.0));
    }

    #[test]
    fn test_covering_range_outside_grid() {
        let grid = RegularGrid::new(grid_data(), None);
        let [rows, cols] = grid.covering_range(60.0, 30.0, 61.0, 31.0);
        assert!(rows.is_empty());
        assert!(cols.is_empty());
        assert!(rows.end <= 3 && cols.end <= 10);
    }
}
