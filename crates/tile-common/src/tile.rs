//! Slippy-map tile addressing and Web Mercator tile math.
//!
//! Tile fractions are expressed in tile units at the given zoom: `x` grows
//! eastward from the antimeridian, `y` grows southward from ~85.05°N.

use crate::math::{degrees_to_radians, radians_to_degrees};
use crate::BoundingBox;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// A tile coordinate (z/x/y).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TileCoord {
    /// Zoom level
    pub z: u32,
    /// Column (x)
    pub x: u32,
    /// Row (y)
    pub y: u32,
}

impl TileCoord {
    pub fn new(z: u32, x: u32, y: u32) -> Self {
        Self { z, x, y }
    }

    /// Generate a cache key string.
    pub fn cache_key(&self) -> String {
        format!("{}/{}/{}", self.z, self.x, self.y)
    }

    /// Get the parent tile (zoom - 1).
    pub fn parent(&self) -> Option<TileCoord> {
        if self.z == 0 {
            return None;
        }
        Some(TileCoord {
            z: self.z - 1,
            x: self.x / 2,
            y: self.y / 2,
        })
    }

    /// Get the four children tiles (zoom + 1).
    pub fn children(&self) -> [TileCoord; 4] {
        let x = self.x * 2;
        let y = self.y * 2;
        let z = self.z + 1;
        [
            TileCoord { z, x, y },
            TileCoord { z, x: x + 1, y },
            TileCoord { z, x, y: y + 1 },
            TileCoord {
                z,
                x: x + 1,
                y: y + 1,
            },
        ]
    }

    /// Longitude of a fractional position inside this tile (`0.0..=1.0`).
    pub fn lon_at(&self, fraction: f64) -> f64 {
        tile2lon(self.x as f64 + fraction, self.z)
    }

    /// Latitude of a fractional position inside this tile (`0.0..=1.0`).
    pub fn lat_at(&self, fraction: f64) -> f64 {
        tile2lat(self.y as f64 + fraction, self.z)
    }

    /// Geographic bounds of the tile.
    pub fn bbox(&self) -> BoundingBox {
        BoundingBox::new(
            self.lon_at(0.0),
            self.lat_at(1.0),
            self.lon_at(1.0),
            self.lat_at(0.0),
        )
    }
}

#[inline]
fn tiles_at(z: u32) -> f64 {
    2f64.powi(z as i32)
}

/// Longitude of the fractional tile column `x` at zoom `z`.
pub fn tile2lon(x: f64, z: u32) -> f64 {
    (x / tiles_at(z)) * 360.0 - 180.0
}

/// Latitude of the fractional tile row `y` at zoom `z`.
pub fn tile2lat(y: f64, z: u32) -> f64 {
    let n = PI - (2.0 * PI * y) / tiles_at(z);
    radians_to_degrees((0.5 * (n.exp() - (-n).exp())).atan())
}

/// Fractional tile column of `lon` at zoom `z`.
pub fn lon2tile(lon: f64, z: u32) -> f64 {
    tiles_at(z) * ((lon + 180.0) / 360.0)
}

/// Fractional tile row of `lat` at zoom `z`.
pub fn lat2tile(lat: f64, z: u32) -> f64 {
    let rad = degrees_to_radians(lat);
    (tiles_at(z) * (1.0 - (rad.tan() + 1.0 / rad.cos()).ln() / PI)) / 2.0
}
