//! Bounding box types and operations.

use serde::{Deserialize, Serialize};

/// A geographic bounding box in degrees.
///
/// Longitudes are stored in `min_x`/`max_x`, latitudes in `min_y`/`max_y`,
/// which matches the `[minLon, minLat, maxLon, maxLat]` ordering used by
/// map clients.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

/// Center point of a grid or bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Center {
    pub lng: f64,
    pub lat: f64,
}

impl BoundingBox {
    /// Create a new bounding box from corner coordinates.
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// The bounding box covering the whole globe.
    pub fn global() -> Self {
        Self::new(-180.0, -90.0, 180.0, 90.0)
    }

    /// Midpoint of the box.
    pub fn center(&self) -> Center {
        Center {
            lng: (self.max_x - self.min_x) / 2.0 + self.min_x,
            lat: (self.max_y - self.min_y) / 2.0 + self.min_y,
        }
    }

    /// Check if `other` lies completely inside this box.
    pub fn contains(&self, other: &BoundingBox) -> bool {
        other.min_x >= self.min_x
            && other.min_y >= self.min_y
            && other.max_x <= self.max_x
            && other.max_y <= self.max_y
    }

    /// Check if a point is contained within this bbox.
    pub fn contains_point(&self, x: f64, y: f64) -> bool {
        x >= self.min_x && x <= self.max_x && y >= self.min_y && y <= self.max_y
    }

    /// Dateline-aware point test.
    ///
    /// When `max_x < min_x` the box wraps across the antimeridian and the
    /// valid longitudes are `[min_x, 180] ∪ [-180, max_x]`.
    pub fn contains_point_wrapped(&self, lon: f64, lat: f64) -> bool {
        if lat < self.min_y || lat > self.max_y {
            return false;
        }
        if self.max_x >= self.min_x {
            lon >= self.min_x && lon <= self.max_x
        } else {
            lon >= self.min_x || lon <= self.max_x
        }
    }

    /// `[minLon, minLat, maxLon, maxLat]`.
    pub fn to_array(&self) -> [f64; 4] {
        [self.min_x, self.min_y, self.max_x, self.max_y]
    }
}

impl From<[f64; 4]> for BoundingBox {
    fn from(b: [f64; 4]) -> Self {
        Self::new(b[0], b[1], b[2], b[3])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_center() {
        let center = BoundingBox::new(10.0, 50.0, 14.0, 56.0).center();
        assert_eq!(center.lng, 12.0);
        assert_eq!(center.lat, 53.0);
    }

    #[test]
    fn test_contains() {
        let a = BoundingBox::new(0.0, 0.0, 10.0, 10.0);
        let b = BoundingBox::new(5.0, 5.0, 15.0, 15.0);
        let c = BoundingBox::new(2.0, 2.0, 3.0, 3.0);

        assert!(a.contains(&c));
        assert!(!a.contains(&b));
    }

    #[test]
    fn test_wrapped_point() {
        let pacific = BoundingBox::new(160.0, -50.0, -140.0, 50.0);
        assert!(pacific.contains_point_wrapped(170.0, 0.0));
        assert!(pacific.contains_point_wrapped(-150.0, 0.0));
        assert!(!pacific.contains_point_wrapped(0.0, 0.0));
        assert!(!pacific.contains_point_wrapped(170.0, 60.0));
    }
}
