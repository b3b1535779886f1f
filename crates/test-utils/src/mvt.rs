//! Vector tile decoding for round-trip checks, backed by geozero.
//!
//! Tiles are decoded with geozero's protobuf schema. Geometries go through
//! `geozero::ToGeo` and are flattened back to integer tile coordinates.

use std::collections::HashMap;

use geo_types::{Geometry, LineString};
use geozero::mvt::{tile, Message, Tile};
use geozero::ToGeo;

pub use geozero::mvt::tile::{Feature, GeomType, Layer};

/// A decoded property value, one variant per protobuf field.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    String(String),
    Float(f32),
    Double(f64),
    Int(i64),
    Uint(u64),
    Sint(i64),
    Bool(bool),
}

impl Value {
    pub fn as_f64(&self) -> Option<f64> {
        match *self {
            Value::Float(v) => Some(v as f64),
            Value::Double(v) => Some(v),
            Value::Int(v) | Value::Sint(v) => Some(v as f64),
            Value::Uint(v) => Some(v as f64),
            _ => None,
        }
    }
}

impl From<&tile::Value> for Value {
    fn from(value: &tile::Value) -> Self {
        if let Some(v) = &value.string_value {
            Value::String(v.clone())
        } else if let Some(v) = value.float_value {
            Value::Float(v)
        } else if let Some(v) = value.double_value {
            Value::Double(v)
        } else if let Some(v) = value.int_value {
            Value::Int(v)
        } else if let Some(v) = value.uint_value {
            Value::Uint(v)
        } else if let Some(v) = value.sint_value {
            Value::Sint(v)
        } else if let Some(v) = value.bool_value {
            Value::Bool(v)
        } else {
            panic!("tile value without a set field: {:?}", value)
        }
    }
}

/// Decode an encoded tile into its layers.
pub fn read_tile(bytes: &[u8]) -> Vec<Layer> {
    Tile::decode(bytes)
        .unwrap_or_else(|e| panic!("tile does not decode: {}", e))
        .layers
}

/// Layer extent, defaulting to 4096 when the field is absent.
pub fn extent(layer: &Layer) -> u32 {
    layer.extent.unwrap_or(4096)
}

pub fn geom_type(feature: &Feature) -> GeomType {
    feature
        .r#type
        .and_then(GeomType::from_i32)
        .unwrap_or(GeomType::Unknown)
}

/// Resolve a feature's tag pairs against the layer dictionaries.
pub fn properties(layer: &Layer, feature: &Feature) -> HashMap<String, Value> {
    assert_eq!(feature.tags.len() % 2, 0, "odd number of tags");
    feature
        .tags
        .chunks(2)
        .map(|pair| {
            let key = &layer.keys[pair[0] as usize];
            let value = &layer.values[pair[1] as usize];
            (key.clone(), Value::from(value))
        })
        .collect()
}

/// The feature geometry as geo-types.
pub fn geometry(feature: &Feature) -> Geometry<f64> {
    feature
        .to_geo()
        .unwrap_or_else(|e| panic!("geometry does not decode: {}", e))
}

/// Geometry parts in tile coordinates: one entry per point, line or ring.
pub fn parts(feature: &Feature) -> Vec<Vec<(i64, i64)>> {
    fn coords(line: &LineString<f64>) -> Vec<(i64, i64)> {
        line.coords().map(|c| (c.x as i64, c.y as i64)).collect()
    }

    match geometry(feature) {
        Geometry::Point(p) => vec![vec![(p.x() as i64, p.y() as i64)]],
        Geometry::MultiPoint(mp) => mp
            .iter()
            .map(|p| vec![(p.x() as i64, p.y() as i64)])
            .collect(),
        Geometry::LineString(line) => vec![coords(&line)],
        Geometry::MultiLineString(lines) => lines.iter().map(coords).collect(),
        Geometry::Polygon(polygon) => std::iter::once(polygon.exterior())
            .chain(polygon.interiors())
            .map(coords)
            .collect(),
        Geometry::MultiPolygon(polygons) => polygons
            .iter()
            .flat_map(|p| std::iter::once(p.exterior()).chain(p.interiors()))
            .map(coords)
            .collect(),
        other => panic!("unexpected geometry {:?}", other),
    }
}
