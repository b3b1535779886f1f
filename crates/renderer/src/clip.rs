//! Clip polygons restricting which parts of a tile are rendered.
//!
//! Polygons arrive either as plain `[lon, lat]` rings or inside a GeoJSON
//! document. Rings that cross the antimeridian are split into one ring per
//! side, and the overall bounds are computed in an unwrapped longitude frame
//! so a region spanning the dateline gets `min_lon > max_lon`.
//!
//! Each supplied polygon is kept whole with its holes. A point is clipped
//! in when it lies inside every supplied polygon.

use crate::error::{RenderError, Result};
use serde::{Deserialize, Serialize};
use tile_common::math::{mod_positive, round_half_up};
use tile_common::BoundingBox;
use tracing::warn;

/// A closed ring of `[lon, lat]` positions.
pub type Ring = Vec<[f64; 2]>;

/// GeoJSON objects understood as clip input. Other geometry types parse
/// and are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GeoJson {
    FeatureCollection {
        features: Vec<GeoJson>,
    },
    Feature {
        #[serde(default)]
        geometry: Option<Box<GeoJson>>,
    },
    GeometryCollection {
        geometries: Vec<GeoJson>,
    },
    Polygon {
        coordinates: Vec<Vec<Vec<f64>>>,
    },
    MultiPolygon {
        coordinates: Vec<Vec<Vec<Vec<f64>>>>,
    },
    #[serde(other)]
    Other,
}

impl GeoJson {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Calls `f` once per polygonal geometry with its member polygons.
    /// A `Polygon` has one member, a `MultiPolygon` one per polygon.
    fn for_each_shape(&self, f: &mut impl FnMut(&[Vec<Vec<Vec<f64>>>])) {
        match self {
            GeoJson::FeatureCollection { features } => {
                for feature in features {
                    feature.for_each_shape(f);
                }
            }
            GeoJson::Feature { geometry } => {
                if let Some(geometry) = geometry {
                    geometry.for_each_shape(f);
                }
            }
            GeoJson::GeometryCollection { geometries } => {
                for geometry in geometries {
                    geometry.for_each_shape(f);
                }
            }
            GeoJson::Polygon { coordinates } => f(std::slice::from_ref(coordinates)),
            GeoJson::MultiPolygon { coordinates } => f(coordinates),
            GeoJson::Other => {}
        }
    }
}

/// Clip input as supplied by the caller.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClippingOptions {
    /// Rings without holes, each one shape.
    #[serde(default)]
    pub polygons: Option<Vec<Ring>>,
    /// GeoJSON whose polygonal geometries become shapes.
    #[serde(default)]
    pub geojson: Option<GeoJson>,
    /// `[min_lon, min_lat, max_lon, max_lat]`; computed from the rings when absent.
    #[serde(default)]
    pub bounds: Option<[f64; 4]>,
}

/// One polygon after dateline splitting. The outer ring may become two
/// pieces, as may each hole.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClipPolygon {
    pub outer: Vec<Ring>,
    pub holes: Vec<Ring>,
}

impl ClipPolygon {
    fn from_rings(rings: &[Ring]) -> Option<Self> {
        let (outer, holes) = rings.split_first()?;
        let outer = split_ring_at_dateline(outer);
        if outer.is_empty() {
            return None;
        }
        Some(Self {
            outer,
            holes: holes.iter().flat_map(|h| split_ring_at_dateline(h)).collect(),
        })
    }

    /// Inside one outer piece and outside every hole.
    pub fn contains(&self, lon: f64, lat: f64) -> bool {
        self.outer.iter().any(|ring| point_in_ring(lon, lat, ring))
            && !self.holes.iter().any(|ring| point_in_ring(lon, lat, ring))
    }
}

/// One supplied polygon: a direct ring, a GeoJSON `Polygon`, or a
/// `MultiPolygon` whose members form a union.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClipShape {
    pub polygons: Vec<ClipPolygon>,
}

impl ClipShape {
    pub fn contains(&self, lon: f64, lat: f64) -> bool {
        self.polygons.iter().any(|polygon| polygon.contains(lon, lat))
    }
}

/// Shapes and bounds ready for testing.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedClipping {
    pub shapes: Vec<ClipShape>,
    pub bounds: Option<[f64; 4]>,
}

/// Longitude in `[-180, 180]`; values already in range are returned as is.
pub fn normalize_lon(lon: f64) -> f64 {
    if (-180.0..=180.0).contains(&lon) {
        lon
    } else {
        mod_positive(lon + 180.0, 360.0) - 180.0
    }
}

/// Shift longitudes so consecutive points never jump by more than 180°.
pub fn unwrap_longitudes(ring: &[[f64; 2]]) -> Ring {
    let Some(&first) = ring.first() else {
        return Vec::new();
    };
    let mut out = Vec::with_capacity(ring.len());
    out.push(first);
    let mut prev = first[0];
    for &[lon, lat] in &ring[1..] {
        let shift = round_half_up((lon - prev) / 360.0) * -360.0;
        let lon = lon + shift;
        out.push([lon, lat]);
        prev = lon;
    }
    out
}

fn close_ring(mut ring: Ring) -> Ring {
    if let (Some(&first), Some(&last)) = (ring.first(), ring.last()) {
        if first != last {
            ring.push(first);
        }
    }
    ring
}

/// Split a ring crossing ±180° into rings on either side of the meridian.
pub fn split_ring_at_dateline(ring: &[[f64; 2]]) -> Vec<Ring> {
    if ring.len() < 2 {
        return Vec::new();
    }
    let unwrapped = unwrap_longitudes(&close_ring(ring.to_vec()));

    let (min_lon, max_lon) = unwrapped
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| {
            (lo.min(p[0]), hi.max(p[0]))
        });

    if max_lon <= 180.0 && min_lon >= -180.0 {
        let normalized = unwrapped
            .into_iter()
            .map(|[lon, lat]| [normalize_lon(lon), lat])
            .collect();
        return vec![close_ring(normalized)];
    }

    let meridian = if max_lon > 180.0 { 180.0 } else { -180.0 };
    let wrap = if meridian > 0.0 { -360.0 } else { 360.0 };
    let mut near = Vec::new();
    let mut far = Vec::new();
    let mut add = |lon: f64, lat: f64, near_side: bool| {
        if near_side {
            near.push([lon, lat]);
        } else {
            far.push([lon + wrap, lat]);
        }
    };

    for (i, pair) in unwrapped.windows(2).enumerate() {
        let [lon1, lat1] = pair[0];
        let [lon2, lat2] = pair[1];
        let side1 = lon1 <= meridian;
        let side2 = lon2 <= meridian;

        if i == 0 {
            add(lon1, lat1, side1);
        }
        if side1 == side2 {
            add(lon2, lat2, side2);
            continue;
        }

        let t = (meridian - lon1) / (lon2 - lon1);
        let lat = lat1 + t * (lat2 - lat1);
        add(meridian, lat, true);
        add(meridian, lat, false);
        add(lon2, lat2, side2);
    }

    [near, far]
        .into_iter()
        .filter(|r| r.len() >= 4)
        .map(close_ring)
        .collect()
}

/// Bounds accumulated across rings in one unwrapped longitude frame.
#[derive(Debug, Clone, Copy)]
struct BoundsAccumulator {
    min_lon: f64,
    max_lon: f64,
    min_lat: f64,
    max_lat: f64,
}

impl BoundsAccumulator {
    fn new() -> Self {
        Self {
            min_lon: f64::INFINITY,
            max_lon: f64::NEG_INFINITY,
            min_lat: f64::INFINITY,
            max_lat: f64::NEG_INFINITY,
        }
    }

    fn extend(&mut self, ring: &[[f64; 2]]) {
        let unwrapped = unwrap_longitudes(ring);
        if unwrapped.is_empty() {
            return;
        }
        let mut ring_min = f64::INFINITY;
        let mut ring_max = f64::NEG_INFINITY;
        for &[lon, lat] in &unwrapped {
            ring_min = ring_min.min(lon);
            ring_max = ring_max.max(lon);
            self.min_lat = self.min_lat.min(lat);
            self.max_lat = self.max_lat.max(lat);
        }

        if self.min_lon.is_infinite() {
            self.min_lon = ring_min;
            self.max_lon = ring_max;
        } else {
            // Move the ring next to what has been seen so far.
            let mid = (self.min_lon + self.max_lon) / 2.0;
            let ring_mid = (ring_min + ring_max) / 2.0;
            let shift = round_half_up((mid - ring_mid) / 360.0) * 360.0;
            self.min_lon = self.min_lon.min(ring_min + shift);
            self.max_lon = self.max_lon.max(ring_max + shift);
        }
    }

    fn finish(&self) -> Option<[f64; 4]> {
        if self.min_lon.is_infinite() {
            return None;
        }
        if self.max_lon - self.min_lon >= 360.0 {
            return Some([-180.0, self.min_lat, 180.0, self.max_lat]);
        }
        Some([
            normalize_lon(self.min_lon),
            self.min_lat,
            normalize_lon(self.max_lon),
            self.max_lat,
        ])
    }
}

impl ClippingOptions {
    /// Options from a GeoJSON document.
    pub fn from_geojson(json: &str) -> Result<Self> {
        Ok(Self {
            geojson: Some(GeoJson::from_json(json)?),
            ..Default::default()
        })
    }

    /// Collect shapes and bounds. `None` when nothing constrains the tile.
    pub fn resolve(&self) -> Result<Option<ResolvedClipping>> {
        if let Some([_, min_lat, _, max_lat]) = self.bounds {
            if min_lat > max_lat {
                return Err(RenderError::Clipping(format!(
                    "bounds have min_lat {} above max_lat {}",
                    min_lat, max_lat
                )));
            }
        }

        let mut shapes = Vec::new();
        let mut accumulator = BoundsAccumulator::new();

        if let Some(rings) = &self.polygons {
            for ring in rings {
                if ring.len() < 3 {
                    return Err(RenderError::Clipping(format!(
                        "ring has {} positions, need at least 3",
                        ring.len()
                    )));
                }
                accumulator.extend(ring);
                if let Some(polygon) = ClipPolygon::from_rings(std::slice::from_ref(ring)) {
                    shapes.push(ClipShape {
                        polygons: vec![polygon],
                    });
                }
            }
        }

        if let Some(geojson) = &self.geojson {
            let before = shapes.len();
            geojson.for_each_shape(&mut |members: &[Vec<Vec<Vec<f64>>>]| {
                let mut shape = ClipShape::default();
                for member in members {
                    let rings: Vec<Ring> = member.iter().map(|r| to_ring(r)).collect();
                    if let Some(outer) = rings.first() {
                        accumulator.extend(outer);
                    }
                    shape.polygons.extend(ClipPolygon::from_rings(&rings));
                }
                if !shape.polygons.is_empty() {
                    shapes.push(shape);
                }
            });
            if shapes.len() == before {
                warn!("clip GeoJSON contains no polygonal geometry");
            }
        }

        let bounds = self.bounds.or_else(|| accumulator.finish());
        if bounds.is_none() && shapes.is_empty() {
            return Ok(None);
        }
        Ok(Some(ResolvedClipping { shapes, bounds }))
    }
}

fn to_ring(positions: &[Vec<f64>]) -> Ring {
    positions
        .iter()
        .map(|p| [p.first().copied().unwrap_or(0.0), p.get(1).copied().unwrap_or(0.0)])
        .collect()
}

/// Ray-casting point-in-polygon test on `[lon, lat]` rings.
pub fn point_in_ring(lon: f64, lat: f64, ring: &[[f64; 2]]) -> bool {
    let n = ring.len();
    if n < 3 {
        return false;
    }

    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let [xi, yi] = ring[i];
        let [xj, yj] = ring[j];
        if ((yi > lat) != (yj > lat)) && (lon < (xj - xi) * (lat - yi) / (yj - yi) + xi) {
            inside = !inside;
        }
        j = i;
    }
    inside
}

/// Fast repeated membership tests against resolved clipping.
///
/// A point passes when it lies inside the bounds and inside every shape.
#[derive(Debug, Clone)]
pub struct ClipTester {
    shapes: Vec<ClipShape>,
    bounds: Option<[f64; 4]>,
}

impl ClipTester {
    /// `None` when there is nothing to test against.
    pub fn new(resolved: ResolvedClipping) -> Option<Self> {
        if resolved.shapes.is_empty() && resolved.bounds.is_none() {
            return None;
        }
        Some(Self {
            shapes: resolved.shapes,
            bounds: resolved.bounds,
        })
    }

    pub fn from_options(options: &ClippingOptions) -> Result<Option<Self>> {
        Ok(options.resolve()?.and_then(Self::new))
    }

    pub fn bounds(&self) -> Option<[f64; 4]> {
        self.bounds
    }

    pub fn contains(&self, lon: f64, lat: f64) -> bool {
        if let Some(bounds) = self.bounds {
            if !BoundingBox::from(bounds).contains_point_wrapped(lon, lat) {
                return false;
            }
        }
        self.shapes.iter().all(|shape| shape.contains(lon, lat))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_lon() {
        assert_eq!(normalize_lon(10.0), 10.0);
        assert_eq!(normalize_lon(180.0), 180.0);
        assert_eq!(normalize_lon(190.0), -170.0);
        assert_eq!(normalize_lon(-190.0), 170.0);
        assert_eq!(normalize_lon(540.0), -180.0);
    }

    #[test]
    fn test_point_in_ring() {
        let square = [[0.0, 0.0], [10.0, 0.0], [10.0, 10.0], [0.0, 10.0], [0.0, 0.0]];
        assert!(point_in_ring(5.0, 5.0, &square));
        assert!(!point_in_ring(15.0, 5.0, &square));
        assert!(!point_in_ring(5.0, -1.0, &square));
        assert!(!point_in_ring(5.0, 5.0, &square[..2]));
    }

    #[test]
    fn test_close_ring() {
        let ring = close_ring(vec![[0.0, 0.0], [1.0, 0.0], [1.0, 1.0]]);
        assert_eq!(ring.len(), 4);
        assert_eq!(ring[0], ring[3]);
        let already = close_ring(ring.clone());
        assert_eq!(already, ring);
    }
}
