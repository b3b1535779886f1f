//! Reduced (octahedral) Gaussian grid, as used by ECMWF IFS (O1280, O320).
//!
//! The grid has `2N` latitude rows. Row `y` in the northern half holds
//! `20 + 4y` points; the southern half mirrors it. Values are stored row by
//! row, north to south, in one flat array.

use tile_common::math::{mod_positive, round_half_up};

/// Reduced Gaussian grid with `N` latitude lines per hemisphere.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GaussianGrid {
    latitude_lines: usize,
}

/// Row/column position of a flat grid point index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GaussianPosition {
    pub y: usize,
    pub x: usize,
    pub nx: usize,
}

impl GaussianGrid {
    /// `latitude_lines` is `N`, e.g. 1280 for O1280.
    pub fn new(latitude_lines: usize) -> Self {
        Self { latitude_lines }
    }

    pub fn latitude_lines(&self) -> usize {
        self.latitude_lines
    }

    /// Total number of grid points, `4N(N + 9)`.
    pub fn count(&self) -> usize {
        4 * self.latitude_lines * (self.latitude_lines + 9)
    }

    /// Number of points on latitude row `y`.
    pub fn nx_of(&self, y: usize) -> usize {
        let n = self.latitude_lines;
        if y < n {
            20 + y * 4
        } else {
            // Saturates one row past the south pole so lookups fall out of range.
            (2 * n).saturating_sub(y + 1) * 4 + 20
        }
    }

    /// Flat index of the first point on row `y`.
    pub fn integral(&self, y: usize) -> usize {
        let n = self.latitude_lines;
        if y < n {
            2 * y * y + 18 * y
        } else {
            let mirrored = (2 * n).saturating_sub(y);
            self.count() - (2 * mirrored * mirrored + 18 * mirrored)
        }
    }

    fn dy(&self) -> f64 {
        180.0 / (2.0 * self.latitude_lines as f64 + 0.5)
    }

    /// Fractional row coordinate of a latitude, 0 at the northernmost row.
    fn row_coordinate(&self, lat: f64) -> f64 {
        let dy = self.dy();
        self.latitude_lines as f64 - 1.0 - (lat - dy / 2.0) / dy
    }

    fn rows(&self) -> f64 {
        2.0 * self.latitude_lines as f64
    }

    /// Bilinear interpolation between the two bracketing latitude rows.
    ///
    /// Each row uses its own longitude spacing, so the four neighbours do not
    /// form a rectangle in index space. Reads past the last row yield `NaN`.
    pub fn interpolate_linear(&self, values: &[f32], lat: f64, lon: f64) -> f64 {
        let row = self.row_coordinate(lat);
        let y_lower = mod_positive(row.floor(), self.rows()) as usize;
        let y_fraction = mod_positive(row, 1.0);
        let y_upper = y_lower + 1;

        let (lower0, lower1, xf_lower) = self.row_neighbours(y_lower, lon);
        let (upper0, upper1, xf_upper) = self.row_neighbours(y_upper, lon);

        let p0 = read(values, lower0);
        let p1 = read(values, lower1);
        let p2 = read(values, upper0);
        let p3 = read(values, upper1);

        p0 * (1.0 - xf_lower) * (1.0 - y_fraction)
            + p1 * xf_lower * (1.0 - y_fraction)
            + p2 * (1.0 - xf_upper) * y_fraction
            + p3 * xf_upper * y_fraction
    }

    /// Flat indices of the two points bracketing `lon` on row `y`, plus the
    /// fractional position between them.
    fn row_neighbours(&self, y: usize, lon: f64) -> (usize, usize, f64) {
        let nx = self.nx_of(y);
        let dx = 360.0 / nx as f64;
        let x0 = mod_positive((lon / dx).floor(), nx as f64) as usize;
        let fraction = mod_positive(lon / dx, 1.0);
        let start = self.integral(y);
        (start + x0, start + (x0 + 1) % nx, fraction)
    }

    /// Value of the closest row, flooring along the row.
    pub fn nearest_neighbour(&self, values: &[f32], lat: f64, lon: f64) -> f64 {
        let y = mod_positive(round_half_up(self.row_coordinate(lat)), self.rows()) as usize;
        let nx = self.nx_of(y);
        let dx = 360.0 / nx as f64;
        let x = mod_positive((lon / dx).floor(), nx as f64) as usize;
        read(values, self.integral(y) + x)
    }

    /// Flat index of the grid point closest to `(lat, lon)`.
    pub fn find_point(&self, lat: f64, lon: f64) -> usize {
        let y = mod_positive(round_half_up(self.row_coordinate(lat)), self.rows()) as usize;
        let nx = self.nx_of(y);
        let dx = 360.0 / nx as f64;
        let x = mod_positive(round_half_up(lon / dx), nx as f64) as usize;
        self.integral(y) + x
    }

    /// Row and column of a flat index; closed-form inverse of [`integral`].
    ///
    /// [`integral`]: GaussianGrid::integral
    pub fn position(&self, gridpoint: usize) -> GaussianPosition {
        let count = self.count();
        let y = if gridpoint < count / 2 {
            row_from_offset(gridpoint)
        } else {
            (2 * self.latitude_lines - 1)
                .saturating_sub(row_from_offset(count.saturating_sub(gridpoint + 1)))
        };
        GaussianPosition {
            y,
            x: gridpoint - self.integral(y),
            nx: self.nx_of(y),
        }
    }

    /// Center `(lat, lon)` of a grid point, longitude in `[-180, 180)`.
    pub fn coordinates(&self, gridpoint: usize) -> (f64, f64) {
        let GaussianPosition { y, x, nx } = self.position(gridpoint);
        let dx = 360.0 / nx as f64;
        let dy = self.dy();

        let lon = x as f64 * dx;
        let lon = if lon >= 180.0 { lon - 360.0 } else { lon };
        let lat = (self.latitude_lines as f64 - y as f64 - 1.0) * dy + dy / 2.0;
        (lat, lon)
    }
}

/// Solves `2y² + 18y <= offset` for the largest row `y`.
fn row_from_offset(offset: usize) -> usize {
    (((2.0 * offset as f64 + 81.0).sqrt() - 9.0) / 2.0).floor() as usize
}

#[inline]
fn read(values: &[f32], index: usize) -> f64 {
    values.get(index).map_or(f64::NAN, |v| *v as f64)
}
