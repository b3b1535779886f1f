//! Mapbox Vector Tile writer.
//!
//! Encodes the subset of the vector tile protobuf schema the renderer needs:
//!
//! ```text
//! Tile    { layers = 3 }
//! Layer   { version = 15, name = 1, features = 2, keys = 3, values = 4, extent = 5 }
//! Feature { id = 1, tags = 2 (packed), type = 3, geometry = 4 (packed) }
//! Value   { string = 1, float = 2, double = 3, int = 4, uint = 5, sint = 6, bool = 7 }
//! ```
//!
//! Geometry is a stream of command integers followed by zigzag-encoded
//! deltas relative to a cursor that starts at `(0, 0)` for every feature.

use bytes::BufMut;
use std::collections::HashMap;

const WIRE_VARINT: u8 = 0;
const WIRE_FIXED64: u8 = 1;
const WIRE_LEN: u8 = 2;

/// Geometry command ids.
pub const MOVE_TO: u32 = 1;
pub const LINE_TO: u32 = 2;
pub const CLOSE_PATH: u32 = 7;

/// Pack a command id and repeat count into one command integer.
#[inline]
pub fn command(cmd: u32, count: u32) -> u32 {
    (count << 3) | (cmd & 0x7)
}

/// Map a signed parameter onto the unsigned range: `0, -1, 1, -2` become `0, 1, 2, 3`.
#[inline]
pub fn zigzag(n: i32) -> u32 {
    ((n << 1) ^ (n >> 31)) as u32
}

/// Append `value` as a base-128 varint.
pub fn write_varint<B: BufMut>(buf: &mut B, mut value: u64) {
    while value >= 0x80 {
        buf.put_u8((value as u8 & 0x7f) | 0x80);
        value >>= 7;
    }
    buf.put_u8(value as u8);
}

fn write_key<B: BufMut>(buf: &mut B, field: u32, wire: u8) {
    write_varint(buf, ((field as u64) << 3) | wire as u64);
}

fn write_varint_field<B: BufMut>(buf: &mut B, field: u32, value: u64) {
    write_key(buf, field, WIRE_VARINT);
    write_varint(buf, value);
}

fn write_bytes_field<B: BufMut>(buf: &mut B, field: u32, bytes: &[u8]) {
    write_key(buf, field, WIRE_LEN);
    write_varint(buf, bytes.len() as u64);
    buf.put_slice(bytes);
}

fn write_packed_field<B: BufMut>(buf: &mut B, field: u32, values: &[u32]) {
    let mut packed = Vec::with_capacity(values.len() * 2);
    for &v in values {
        write_varint(&mut packed, v as u64);
    }
    write_bytes_field(buf, field, &packed);
}

/// Geometry type of a feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeomType {
    Point = 1,
    LineString = 2,
    Polygon = 3,
}

/// A property value.
///
/// Numbers are classified the way they are stored: fractional (and
/// non-finite) values as doubles, negative integers as zigzag `sint`,
/// everything else as `uint`.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    String(String),
    Double(f64),
    Uint(u64),
    Sint(i64),
    Bool(bool),
}

impl PropertyValue {
    /// Integral values that fit `i64`/`u64` become `Sint`/`Uint`.
    /// Everything else stays `Double`.
    pub fn number(value: f64) -> Self {
        // `u64::MAX as f64` rounds up to 2^64, so the upper bound is exclusive.
        if value % 1.0 != 0.0 || !value.is_finite() {
            PropertyValue::Double(value)
        } else if value < 0.0 {
            if value >= i64::MIN as f64 {
                PropertyValue::Sint(value as i64)
            } else {
                PropertyValue::Double(value)
            }
        } else if value < u64::MAX as f64 {
            PropertyValue::Uint(value as u64)
        } else {
            PropertyValue::Double(value)
        }
    }

    fn cache_key(&self) -> ValueKey {
        match self {
            PropertyValue::String(s) => ValueKey::String(s.clone()),
            PropertyValue::Double(v) => ValueKey::Double(v.to_bits()),
            PropertyValue::Uint(v) => ValueKey::Uint(*v),
            PropertyValue::Sint(v) => ValueKey::Sint(*v),
            PropertyValue::Bool(v) => ValueKey::Bool(*v),
        }
    }

    fn encode(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        match self {
            PropertyValue::String(s) => write_bytes_field(&mut buf, 1, s.as_bytes()),
            PropertyValue::Double(v) => {
                write_key(&mut buf, 3, WIRE_FIXED64);
                buf.put_f64_le(*v);
            }
            PropertyValue::Uint(v) => write_varint_field(&mut buf, 5, *v),
            PropertyValue::Sint(v) => {
                write_varint_field(&mut buf, 6, ((v << 1) ^ (v >> 63)) as u64)
            }
            PropertyValue::Bool(v) => write_varint_field(&mut buf, 7, *v as u64),
        }
        buf
    }
}

impl From<f64> for PropertyValue {
    fn from(value: f64) -> Self {
        PropertyValue::number(value)
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        PropertyValue::String(value.to_string())
    }
}

impl From<bool> for PropertyValue {
    fn from(value: bool) -> Self {
        PropertyValue::Bool(value)
    }
}

/// Type-tagged dictionary key so `1` and `"1"` get separate slots.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum ValueKey {
    String(String),
    Double(u64),
    Uint(u64),
    Sint(i64),
    Bool(bool),
}

/// Builds a command stream with a cursor local to one feature.
#[derive(Debug, Default)]
pub struct GeometryBuilder {
    cursor: (i32, i32),
    commands: Vec<u32>,
}

impl GeometryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    fn push_point(&mut self, (x, y): (i32, i32)) {
        self.commands.push(zigzag(x - self.cursor.0));
        self.commands.push(zigzag(y - self.cursor.1));
        self.cursor = (x, y);
    }

    /// MoveTo every point, as used for (multi)point features.
    pub fn points(&mut self, points: &[(i32, i32)]) -> &mut Self {
        if points.is_empty() {
            return self;
        }
        self.commands.push(command(MOVE_TO, points.len() as u32));
        for &p in points {
            self.push_point(p);
        }
        self
    }

    /// One line part: MoveTo the first point, LineTo the rest.
    pub fn line(&mut self, points: &[(i32, i32)]) -> &mut Self {
        let Some((&first, rest)) = points.split_first() else {
            return self;
        };
        self.commands.push(command(MOVE_TO, 1));
        self.push_point(first);
        if !rest.is_empty() {
            self.commands.push(command(LINE_TO, rest.len() as u32));
            for &p in rest {
                self.push_point(p);
            }
        }
        self
    }

    /// One polygon ring. A repeated closing point is dropped in favour of ClosePath.
    pub fn ring(&mut self, points: &[(i32, i32)]) -> &mut Self {
        let open = match points {
            [first, .., last] if first == last => &points[..points.len() - 1],
            _ => points,
        };
        if open.is_empty() {
            return self;
        }
        self.line(open);
        self.commands.push(command(CLOSE_PATH, 1));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn finish(&mut self) -> Vec<u32> {
        self.cursor = (0, 0);
        std::mem::take(&mut self.commands)
    }
}

/// A feature ready for encoding.
#[derive(Debug, Clone, PartialEq)]
pub struct Feature {
    pub id: Option<u64>,
    pub geom_type: GeomType,
    pub properties: Vec<(String, PropertyValue)>,
    pub geometry: Vec<u32>,
}

impl Feature {
    pub fn new(id: Option<u64>, geom_type: GeomType, geometry: Vec<u32>) -> Self {
        Self {
            id,
            geom_type,
            properties: Vec::new(),
            geometry,
        }
    }

    pub fn with_property(mut self, key: &str, value: impl Into<PropertyValue>) -> Self {
        self.properties.push((key.to_string(), value.into()));
        self
    }
}

/// A named layer of features sharing one coordinate extent.
#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    pub name: String,
    pub extent: u32,
    pub version: u32,
    pub features: Vec<Feature>,
}

impl Layer {
    pub fn new(name: impl Into<String>, extent: u32) -> Self {
        Self {
            name: name.into(),
            extent,
            version: 2,
            features: Vec::new(),
        }
    }

    pub fn push(&mut self, feature: Feature) {
        self.features.push(feature);
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Encode the layer message body with keys and values deduplicated.
    pub fn encode(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        write_varint_field(&mut buf, 15, self.version as u64);
        write_bytes_field(&mut buf, 1, self.name.as_bytes());
        write_varint_field(&mut buf, 5, self.extent as u64);

        let mut dictionary = Dictionary::default();
        for feature in &self.features {
            let encoded = encode_feature(feature, &mut dictionary);
            write_bytes_field(&mut buf, 2, &encoded);
        }

        for key in &dictionary.keys {
            write_bytes_field(&mut buf, 3, key.as_bytes());
        }
        for value in &dictionary.values {
            write_bytes_field(&mut buf, 4, &value.encode());
        }
        buf
    }
}

#[derive(Default)]
struct Dictionary {
    keys: Vec<String>,
    values: Vec<PropertyValue>,
    key_index: HashMap<String, u32>,
    value_index: HashMap<ValueKey, u32>,
}

impl Dictionary {
    fn key(&mut self, key: &str) -> u32 {
        if let Some(&i) = self.key_index.get(key) {
            return i;
        }
        let i = self.keys.len() as u32;
        self.keys.push(key.to_string());
        self.key_index.insert(key.to_string(), i);
        i
    }

    fn value(&mut self, value: &PropertyValue) -> u32 {
        let cache_key = value.cache_key();
        if let Some(&i) = self.value_index.get(&cache_key) {
            return i;
        }
        let i = self.values.len() as u32;
        self.values.push(value.clone());
        self.value_index.insert(cache_key, i);
        i
    }
}

fn encode_feature(feature: &Feature, dictionary: &mut Dictionary) -> Vec<u8> {
    let mut buf = Vec::new();
    if let Some(id) = feature.id {
        write_varint_field(&mut buf, 1, id);
    }

    let mut tags = Vec::with_capacity(feature.properties.len() * 2);
    for (key, value) in &feature.properties {
        tags.push(dictionary.key(key));
        tags.push(dictionary.value(value));
    }
    write_packed_field(&mut buf, 2, &tags);
    write_varint_field(&mut buf, 3, feature.geom_type as u64);
    write_packed_field(&mut buf, 4, &feature.geometry);
    buf
}

/// Accumulates layers into one encoded tile.
#[derive(Debug, Default)]
pub struct TileWriter {
    buf: Vec<u8>,
    layers: usize,
}

impl TileWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn write_layer(&mut self, layer: &Layer) {
        write_bytes_field(&mut self.buf, 3, &layer.encode());
        self.layers += 1;
    }

    pub fn layer_count(&self) -> usize {
        self.layers
    }

    pub fn finish(self) -> Vec<u8> {
        self.buf
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zigzag() {
        assert_eq!(zigzag(0), 0);
        assert_eq!(zigzag(-1), 1);
        assert_eq!(zigzag(1), 2);
        assert_eq!(zigzag(-2), 3);
        assert_eq!(zigzag(2147483647), 4294967294);
        assert_eq!(zigzag(-2147483648), 4294967295);
    }

    #[test]
    fn test_command() {
        assert_eq!(command(MOVE_TO, 1), 9);
        assert_eq!(command(LINE_TO, 3), 26);
        assert_eq!(command(CLOSE_PATH, 1), 15);
    }

    #[test]
    fn test_write_varint() {
        let mut buf = Vec::new();
        write_varint(&mut buf, 1);
        write_varint(&mut buf, 300);
        write_varint(&mut buf, 0);
        assert_eq!(buf, vec![0x01, 0xac, 0x02, 0x00]);
    }

    #[test]
    fn test_number_classification() {
        assert_eq!(PropertyValue::number(1.5), PropertyValue::Double(1.5));
        assert_eq!(PropertyValue::number(-3.0), PropertyValue::Sint(-3));
        assert_eq!(PropertyValue::number(7.0), PropertyValue::Uint(7));
        assert!(matches!(PropertyValue::number(f64::NAN), PropertyValue::Double(_)));
    }

    #[test]
    fn test_number_out_of_integer_range_stays_double() {
        assert_eq!(PropertyValue::number(1e20), PropertyValue::Double(1e20));
        assert_eq!(PropertyValue::number(-1e20), PropertyValue::Double(-1e20));
        assert_eq!(
            PropertyValue::number(18446744073709551616.0),
            PropertyValue::Double(18446744073709551616.0)
        );
        assert_eq!(
            PropertyValue::number(18446744073709549568.0),
            PropertyValue::Uint(18446744073709549568)
        );
        assert_eq!(
            PropertyValue::number(-9223372036854775808.0),
            PropertyValue::Sint(i64::MIN)
        );
        assert!(matches!(
            PropertyValue::number(f64::INFINITY),
            PropertyValue::Double(_)
        ));
    }

    #[test]
    fn test_polygon_geometry_matches_reference_encoding() {
        // Polygon example from the MVT 2.1 encoding rules.
        let mut builder = GeometryBuilder::new();
        builder.ring(&[(3, 6), (8, 12), (20, 34), (3, 6)]);
        assert_eq!(builder.finish(), vec![9, 6, 12, 18, 10, 12, 24, 44, 15]);
    }

    #[test]
    fn test_cursor_resets_between_features() {
        let mut builder = GeometryBuilder::new();
        builder.line(&[(10, 10), (20, 20)]);
        let first = builder.finish();
        builder.line(&[(10, 10), (20, 20)]);
        assert_eq!(builder.finish(), first);
    }

    #[test]
    fn test_cursor_carries_across_parts() {
        let mut builder = GeometryBuilder::new();
        builder.line(&[(0, 0), (2, 0)]).line(&[(2, 2), (4, 2)]);
        assert_eq!(
            builder.finish(),
            vec![9, 0, 0, 10, 4, 0, 9, 0, 4, 10, 4, 0]
        );
    }

    #[test]
    fn test_dictionary_shares_slots() {
        let mut layer = Layer::new("t", 4096);
        for _ in 0..3 {
            layer.push(
                Feature::new(None, GeomType::Point, vec![9, 0, 0])
                    .with_property("value", 2.0)
                    .with_property("name", "2"),
            );
        }
        let mut dictionary = Dictionary::default();
        for feature in &layer.features {
            encode_feature(feature, &mut dictionary);
        }
        assert_eq!(dictionary.keys, vec!["value", "name"]);
        assert_eq!(dictionary.values.len(), 2);
    }
}
