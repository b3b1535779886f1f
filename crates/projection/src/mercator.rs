//! Web Mercator expressed in zoom-0 tile fractions.

use crate::Project;
use tile_common::{lat2tile, lon2tile, tile2lat, tile2lon};

/// Web Mercator projection whose projected space is the single zoom-0 tile:
/// `x` and `y` both run from 0 to 1.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MercatorProjection;

impl Project for MercatorProjection {
    fn forward(&self, lat: f64, lon: f64) -> (f64, f64) {
        (lon2tile(lon, 0), lat2tile(lat, 0))
    }

    fn reverse(&self, x: f64, y: f64) -> (f64, f64) {
        (tile2lat(y, 0), tile2lon(x, 0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_origin_maps_to_tile_center() {
        let (x, y) = MercatorProjection.forward(0.0, 0.0);
        assert!((x - 0.5).abs() < 1e-15);
        assert!((y - 0.5).abs() < 1e-15);
    }

    #[test]
    fn test_roundtrip() {
        let (x, y) = MercatorProjection.forward(47.3, 8.5);
        let (lat, lon) = MercatorProjection.reverse(x, y);
        assert!((lat - 47.3).abs() < 1e-9);
        assert!((lon - 8.5).abs() < 1e-9);
    }
}
